pub mod diagnosis;
pub mod utils;
