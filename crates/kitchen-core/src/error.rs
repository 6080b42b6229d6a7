//! Error types for Kitchen core operations

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while building or parsing order data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Difficulty outside the playable range
    #[error("Difficulty must be between 1 and 3, got {0}")]
    InvalidDifficulty(u8),

    /// Unknown order status text
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    /// Bytes were not valid UTF-8
    #[error("Invalid UTF-8 in ledger value: {0}")]
    InvalidUtf8(String),

    /// JSON could not be parsed or produced
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Stored value had an unexpected shape
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for CoreError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::InvalidUtf8(err.to_string())
    }
}
