pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod model;
pub mod util;
