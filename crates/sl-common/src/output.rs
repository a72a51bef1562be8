//! Record format options.

use serde::{Deserialize, Serialize};

/// Layout of an encoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line (default).
    #[default]
    Json,
    /// `timestamp | LEVEL | component version: message [k=v ...]`.
    Plain,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" | "structured" => Ok(OutputFormat::Json),
            "plain" | "text" | "human" | "console" => Ok(OutputFormat::Plain),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Plain => write!(f, "plain"),
        }
    }
}

/// Granularity of the cached record timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampResolution {
    /// `2026-10-19T08:15:02Z`; reformatted at most once per second.
    #[default]
    Seconds,
    /// `2026-10-19T08:15:02.417Z`; reformatted at most once per millisecond.
    Millis,
}

impl TimestampResolution {
    /// Length of one time unit in milliseconds.
    pub const fn unit_millis(&self) -> i64 {
        match self {
            TimestampResolution::Seconds => 1_000,
            TimestampResolution::Millis => 1,
        }
    }
}

/// How float fields are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatMode {
    /// Shortest representation that round-trips exactly (default).
    #[default]
    Exact,
    /// Best-effort: rounded to one decimal place. Lossy.
    OneDecimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert_eq!("Console".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Plain.to_string(), "plain");
    }

    #[test]
    fn test_resolution_units() {
        assert_eq!(TimestampResolution::Seconds.unit_millis(), 1000);
        assert_eq!(TimestampResolution::Millis.unit_millis(), 1);
    }

    #[test]
    fn test_float_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&FloatMode::OneDecimal).unwrap(),
            "\"one_decimal\""
        );
        assert_eq!(FloatMode::default(), FloatMode::Exact);
    }
}
