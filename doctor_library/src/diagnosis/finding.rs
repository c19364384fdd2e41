use common::diagnosis::detection::Detection;
use common::diagnosis::disease_info::DiseaseInfo;
use common::diagnosis::search_result::SearchResult;
use serde::Serialize;

/// Everything gathered for one distinct disease label.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Finding {
    pub label: String,
    pub detections: Vec<Detection>,
    pub disease_info: DiseaseInfo,
    pub prevention_query: String,
    pub prevention: Vec<SearchResult>,
    pub product_query: String,
    pub products: Vec<SearchResult>,
}

impl Finding {
    pub fn best_confidence(&self) -> f32 {
        self.detections.iter().map(|detection| detection.confidence).fold(0.0, f32::max)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", content = "findings", rename_all = "snake_case")]
pub enum Diagnosis {
    NoDetections,
    Findings(Vec<Finding>),
}
