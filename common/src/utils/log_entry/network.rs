use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkEntry {
    #[error("Failed to bind port: {0}")]
    BindPortError(IoError),
    #[error("Request to {0} failed: {1}")]
    RequestError(String, String),
    #[error("{0} responded with status {1}")]
    UnexpectedStatus(String, u16),
    #[error("Malformed response from {0}: {1}")]
    MalformedResponse(String, String),
    #[error("{0} reported an error: {1}")]
    ApiError(String, String),
    #[error("No results found or an error occurred for query \"{0}\"")]
    NoSearchItems(String),
}

impl From<NetworkEntry> for String {
    #[inline(always)]
    fn from(value: NetworkEntry) -> Self {
        value.to_string()
    }
}
