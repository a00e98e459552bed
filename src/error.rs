//! Error types for SkyDrive.

use thiserror::Error;

/// Common error type for SkyDrive.
#[derive(Error, Debug)]
pub enum DriveError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A unique field is already taken.
    ///
    /// The message is surfaced to the client as-is.
    #[error("{0}")]
    Duplicate(String),

    /// Resource not found (or not visible to the caller).
    #[error("{0} not found")]
    NotFound(String),

    /// Blob storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected failure with no better home, such as password hashing.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DriveError {
    fn from(e: sqlx::Error) -> Self {
        DriveError::Database(e.to_string())
    }
}

/// Result type alias for SkyDrive operations.
pub type Result<T> = std::result::Result<T, DriveError>;
