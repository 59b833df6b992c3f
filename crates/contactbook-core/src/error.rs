//! Error types for the contact book
//!
//! Validation failures are not errors: they are reported as
//! [`ValidationResult`](crate::validation::ValidationResult) values.
//! This module covers the failures that are not the user's fault.

use thiserror::Error;

/// Result type alias for contact book operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the contact book
#[derive(Error, Debug)]
pub enum Error {
    /// Persisting the collections failed; the in-memory change is kept
    #[error("Changes not saved: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A contact references a group that does not exist
    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unknown group error
    pub fn unknown_group(group_id: impl Into<String>) -> Self {
        Self::UnknownGroup(group_id.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error means data was kept in memory but not persisted
    pub fn is_not_saved(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
