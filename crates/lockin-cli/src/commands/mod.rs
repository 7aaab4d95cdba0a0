pub mod coach;
pub mod config;
pub mod timer;
