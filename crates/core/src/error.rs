//! Error types for spanscope collaborators
//!
//! Indexing itself is total: `ingest`, `clear` and every query succeed on
//! well-typed input. Errors only arise at the I/O boundary (fetching history,
//! decoding live events, loading configuration).

use thiserror::Error;

/// All spanscope errors.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed or returned a non-success status
    #[error("http error: {0}")]
    Http(String),

    /// A live event or history record could not be decoded
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// Configuration could not be parsed or is inconsistent
    #[error("config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for spanscope operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is transient.
    ///
    /// Transient errors (network, I/O) may succeed on retry; decode and
    /// config errors will not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Io(_))
    }

    /// Check if this is a decode error for a single record.
    pub fn is_invalid_event(&self) -> bool {
        matches!(self, Error::InvalidEvent(_))
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
