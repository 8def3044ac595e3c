//! Error types for the minical ecosystem.

use thiserror::Error;

/// Errors that can occur in minical operations.
#[derive(Error, Debug)]
pub enum MinicalError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("A reminder offset of {0} minutes already exists")]
    DuplicateOffset(i64),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for minical operations.
pub type MinicalResult<T> = Result<T, MinicalError>;
