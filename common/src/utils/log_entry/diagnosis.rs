use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagnosisEntry {
    #[error("Received image {0} ({1} bytes) with confidence threshold {2}")]
    UploadReceived(String, usize, f32),
    #[error("{0} detections at or above confidence {1}")]
    Detected(usize, f32),
    #[error("No diseases detected at confidence {0}")]
    NoDetections(f32),
    #[error("Looking up \"{0}\"")]
    Investigating(String),
    #[error("Summary for \"{0}\" replaced by fallback: {1}")]
    SummaryFallback(String, String),
    #[error("Diagnosis completed with {0} distinct diseases")]
    Complete(usize),
    #[error("Diagnosis rejected: {0}")]
    Rejected(String),
}

impl From<DiagnosisEntry> for String {
    #[inline(always)]
    fn from(value: DiagnosisEntry) -> Self {
        value.to_string()
    }
}
