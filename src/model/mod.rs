pub mod pls;
pub mod spec;
