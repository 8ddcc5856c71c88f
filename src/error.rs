//! Error types for parchment

use thiserror::Error;

/// Result type alias for parchment operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in parchment operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed record: {0}")]
    Record(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Metadata store {op} failed: {source}")]
    Meta {
        op: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("Content store {op} failed: {source}")]
    Content {
        op: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error as a metadata-store failure for the given operation
    pub fn meta(op: &'static str, source: Error) -> Self {
        Error::Meta {
            op,
            source: Box::new(source),
        }
    }

    /// Wrap an error as a content-store failure for the given operation
    pub fn content(op: &'static str, source: Error) -> Self {
        Error::Content {
            op,
            source: Box::new(source),
        }
    }

    /// Check for not-found, looking through the store wrappers
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Meta { source, .. } | Error::Content { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}
