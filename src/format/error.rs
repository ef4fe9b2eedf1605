//! Error types for snapshot save/load.

use thiserror::Error;

/// Errors that can occur while saving or loading a session snapshot.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot parsed but its content is inconsistent
    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot {
        /// Description of the problem
        message: String,
    },
}

impl FormatError {
    /// Create an invalid snapshot error with a message.
    pub fn invalid_snapshot(message: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            message: message.into(),
        }
    }
}
