use thiserror::Error;

#[derive(Error, Debug)]
pub enum IOEntry {
    #[error("Invalid file name")]
    InvalidFileNameError,
    #[error("Unsupported file extension \"{0}\"")]
    UnsupportedExtension(String),
    #[error("Upload exceeds the limit of {0} bytes")]
    UploadTooLarge(usize),
    #[error("Missing field \"{0}\" in upload")]
    MissingField(&'static str),
    #[error("Invalid value for field \"{0}\"")]
    InvalidField(&'static str),
    #[error("Failed to read upload payload: {0}")]
    PayloadError(String),
}

impl From<IOEntry> for String {
    #[inline(always)]
    fn from(value: IOEntry) -> Self {
        value.to_string()
    }
}
