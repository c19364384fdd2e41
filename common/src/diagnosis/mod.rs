pub mod bounding_box;
pub mod detection;
pub mod disease_info;
pub mod search_result;
