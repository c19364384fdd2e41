use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SystemEntry {
    #[error("Online now")]
    Online,
    #[error("Initializing")]
    Initializing,
    #[error("Initialization completed")]
    InitializeComplete,
    #[error("Termination in process")]
    Terminating,
    #[error("Termination completed")]
    TerminateComplete,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Configuration loaded")]
    ConfigLoaded,
    #[error("Model {0} loaded with {1} classes")]
    ModelReady(String, usize),
    #[error("Failed to load model: {0}")]
    ModelLoadError(String),
    #[error("Failed to build HTTP client: {0}")]
    HttpClientError(String),
    #[error("Web service ready on port {0}")]
    WebReady(u16),
    #[error("Web service panic: {0}")]
    WebPanic(IoError),
    #[error("Task panic while execution: {0}")]
    TaskPanickedError(String),
}

impl From<SystemEntry> for String {
    #[inline(always)]
    fn from(value: SystemEntry) -> Self {
        value.to_string()
    }
}
