//! Severity levels.

use serde::{Deserialize, Serialize};

/// Severity of a log record, ordered `Debug < Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Diagnostic detail.
    Debug,
    /// Standard operational info (default).
    #[default]
    Info,
    /// Something unexpected that did not fail.
    Warn,
    /// A failure.
    Error,
}

impl Level {
    /// All levels in ascending order.
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warn, Level::Error];

    /// Lowercase name used in JSON records.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    /// Uppercase name right-padded to seven columns, used in plain records.
    pub const fn padded(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG  ",
            Level::Info => "INFO   ",
            Level::Warn => "WARN   ",
            Level::Error => "ERROR  ",
        }
    }

    /// ANSI color escape for terminal display.
    pub const fn ansi_color(&self) -> &'static str {
        match self {
            Level::Debug => "\x1b[36m",
            Level::Info => "\x1b[32m",
            Level::Warn => "\x1b[33m",
            Level::Error => "\x1b[31m",
        }
    }

    /// Parse a level, falling back to `Info` for anything unrecognized.
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or(Level::Info)
    }

    /// Whether a record at this level passes a `minimum` threshold.
    pub fn enabled_at(&self, minimum: Level) -> bool {
        *self >= minimum
    }
}

/// ANSI reset sequence.
pub const ANSI_RESET: &str = "\x1b[0m";

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" | "trace" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" | "err" | "fatal" => Ok(Level::Error),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
