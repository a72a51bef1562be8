//! Semantic validation for logger configuration.

use super::LoggerConfig;
use crate::error::{ConfigError, Result};

/// Validate a configuration.
///
/// Checks:
/// - metadata strings contain no control characters (they are written
///   unescaped in plain records and must keep the record on one line)
/// - the redaction policy's own rules (non-empty masks for enabled categories)
pub fn validate_config(config: &LoggerConfig) -> Result<()> {
    validate_metadata("component", &config.component)?;
    validate_metadata("version", &config.version)?;
    validate_mask("redaction.pii_mask", &config.redaction.pii_mask)?;
    validate_mask("redaction.sensitive_mask", &config.redaction.sensitive_mask)?;
    config.redaction.validate()?;
    Ok(())
}

fn validate_metadata(field: &str, value: &str) -> Result<()> {
    if value.chars().any(char::is_control) {
        return Err(ConfigError::invalid(
            field,
            "must not contain control characters",
        ));
    }
    Ok(())
}

fn validate_mask(field: &str, value: &str) -> Result<()> {
    if value.chars().any(|c| c == '\n' || c == '\r') {
        return Err(ConfigError::invalid(field, "must be a single line"));
    }
    Ok(())
}
