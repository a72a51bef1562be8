//! scrublog shared types.
//!
//! This crate provides the types shared by the encoder and its callers:
//! - Severity levels
//! - Output format options
//! - The immutable logger configuration snapshot and its loading/validation
//! - Configuration error types

pub mod config;
pub mod error;
pub mod level;
pub mod output;

pub use config::LoggerConfig;
pub use error::{ConfigError, Result};
pub use level::{Level, ANSI_RESET};
pub use output::{FloatMode, OutputFormat, TimestampResolution};
