//! Error types for configuration handling.
//!
//! Logging calls never return errors. These only surface while loading or
//! validating a [`LoggerConfig`](crate::LoggerConfig).

use thiserror::Error;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported config file extension: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("invalid redaction policy: {0}")]
    Redaction(#[from] sl_redact::RedactionError),
}

impl ConfigError {
    /// Error code for structured error reporting.
    ///
    /// - 10-19: parsing and I/O
    /// - 20-29: semantic validation
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::Io(_) => 10,
            ConfigError::Json(_) => 11,
            ConfigError::Toml(_) => 12,
            ConfigError::UnsupportedFormat(_) => 13,
            ConfigError::InvalidValue { .. } => 20,
            ConfigError::Redaction(_) => 21,
        }
    }

    /// Shorthand for an invalid field value.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
