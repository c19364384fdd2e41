use common::diagnosis::detection::Detection;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Failed to load model {0}: {1}")]
    ModelLoad(String, String),
    #[error("Failed to load labels {0}: {1}")]
    LabelLoad(String, String),
    #[error("Uploaded file is not a readable image: {0}")]
    InvalidImage(String),
    #[error("Confidence threshold {0} is outside [0, 1]")]
    InvalidThreshold(f32),
    #[error("Model output has unexpected shape {0:?}")]
    UnexpectedOutput(Vec<i64>),
    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Runs a pretrained model over one image and reports every detection scoring at least `threshold`.
pub trait Detector: Send + Sync + 'static {
    fn detect(&self, image: &DynamicImage, threshold: f32) -> Result<Vec<Detection>, DetectionError>;
}

/// Only PNG and JPEG uploads are accepted, whatever the file is named.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, DetectionError> {
    let format = image::guess_format(bytes).map_err(|err| DetectionError::InvalidImage(err.to_string()))?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(DetectionError::InvalidImage(format!("unsupported format {format:?}")));
    }
    image::load_from_memory_with_format(bytes, format).map_err(|err| DetectionError::InvalidImage(err.to_string()))
}

pub fn validate_threshold(threshold: f32) -> Result<(), DetectionError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(DetectionError::InvalidThreshold(threshold))
    }
}
