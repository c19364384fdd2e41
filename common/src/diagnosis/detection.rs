use crate::diagnosis::bounding_box::BoundingBox;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection {
    pub bounding_box: BoundingBox,
    pub class_id: usize,
    pub label: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new<T: Into<String>>(bounding_box: BoundingBox, class_id: usize, label: T, confidence: f32) -> Self {
        Self {
            bounding_box,
            class_id,
            label: label.into(),
            confidence,
        }
    }
}
