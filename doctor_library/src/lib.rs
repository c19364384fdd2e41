pub mod detection;
pub mod diagnosis;
pub mod fetcher;
pub mod management;
pub mod utils;
pub mod web;
