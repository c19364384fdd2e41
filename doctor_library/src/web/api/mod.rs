pub mod config;
pub mod default;
pub mod diagnosis;
pub mod log;
