//! Error types for policy handling.

use thiserror::Error;

/// Result type for redaction policy operations.
pub type Result<T> = std::result::Result<T, RedactionError>;

/// Errors that can occur while loading or saving a redaction policy.
///
/// Classification itself never fails; these only surface at configuration time.
#[derive(Error, Debug)]
pub enum RedactionError {
    /// The policy content is semantically invalid.
    #[error("policy error: {0}")]
    PolicyError(String),

    /// I/O error during policy file operations.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RedactionError {
    /// Create a policy error.
    pub fn policy(msg: impl Into<String>) -> Self {
        RedactionError::PolicyError(msg.into())
    }
}
