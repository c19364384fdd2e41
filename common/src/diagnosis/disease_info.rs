use serde::{Deserialize, Serialize};

/// Encyclopedia text for one disease name; `summary` holds a fallback message when the lookup failed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiseaseInfo {
    pub name: String,
    pub summary: String,
}

impl DiseaseInfo {
    pub fn new<T: Into<String>, U: Into<String>>(name: T, summary: U) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
        }
    }
}
