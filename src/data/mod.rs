pub mod dataset;
pub mod day_group;
pub mod normalize;
pub mod reading;
pub mod split;
pub mod window;
