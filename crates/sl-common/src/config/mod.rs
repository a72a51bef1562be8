//! Logger configuration snapshot.
//!
//! A [`LoggerConfig`] is an immutable value consumed read-only by the
//! encoder. Reconfiguring a logger means building a new value and swapping
//! it in; an encode already in progress keeps the snapshot it started with.
//!
//! Files may be JSON (`.json`) or TOML (`.toml`). Every field has a default,
//! so partial files are accepted.

pub mod validate;

use crate::error::{ConfigError, Result};
use crate::{FloatMode, Level, OutputFormat, TimestampResolution};
use serde::{Deserialize, Serialize};
use sl_redact::RedactionPolicy;
use std::path::Path;

/// Configuration consumed by the encoder for every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level; records below it are dropped before any work.
    pub level: Level,
    /// Record layout.
    pub format: OutputFormat,
    /// Component name written as record metadata. Empty means omitted.
    pub component: String,
    /// Component version written as record metadata. Empty means omitted.
    pub version: String,
    /// Include file/line/function of the logging call.
    pub show_caller: bool,
    /// Terminal supports ANSI color; only affects plain records.
    pub ansi: bool,
    /// Granularity of the cached timestamp.
    pub timestamp_resolution: TimestampResolution,
    /// Float formatting mode.
    pub float_mode: FloatMode,
    /// Masking patterns, toggles, and replacement strings.
    pub redaction: RedactionPolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            level: Level::Info,
            format: OutputFormat::Json,
            component: String::new(),
            version: String::new(),
            show_caller: false,
            ansi: false,
            timestamp_resolution: TimestampResolution::Seconds,
            float_mode: FloatMode::Exact,
            redaction: RedactionPolicy::default(),
        }
    }
}

impl LoggerConfig {
    /// Load from a `.json` or `.toml` file and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let config = match ext.as_str() {
            "json" => Self::from_json_str(&content)?,
            "toml" => Self::from_toml_str(&content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse from JSON text without validating.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse from TOML text without validating.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Semantic validation; see [`validate::validate_config`].
    pub fn validate(&self) -> Result<()> {
        validate::validate_config(self)
    }

    /// Whether a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level.enabled_at(self.level)
    }

    /// Set the minimum level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set component and version metadata.
    pub fn with_component(mut self, component: impl Into<String>, version: impl Into<String>) -> Self {
        self.component = component.into();
        self.version = version.into();
        self
    }

    /// Enable caller info.
    pub fn with_caller(mut self, enabled: bool) -> Self {
        self.show_caller = enabled;
        self
    }

    /// Declare ANSI color support for plain records.
    pub fn with_ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }

    /// Set the timestamp resolution.
    pub fn with_timestamp_resolution(mut self, resolution: TimestampResolution) -> Self {
        self.timestamp_resolution = resolution;
        self
    }

    /// Set the float formatting mode.
    pub fn with_float_mode(mut self, mode: FloatMode) -> Self {
        self.float_mode = mode;
        self
    }

    /// Replace the redaction policy.
    pub fn with_redaction(mut self, policy: RedactionPolicy) -> Self {
        self.redaction = policy;
        self
    }
}
