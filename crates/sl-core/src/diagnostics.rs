//! Global `tracing` setup.
//!
//! scrublog reports on itself (overflow retries, fallback encodes, the first
//! sink failure) through `tracing` under [`INTERNAL_TARGET`]. Host
//! applications that already install a subscriber see those events there;
//! [`init_diagnostics`] installs a stderr subscriber for the ones that don't.
//! [`init_tracing_bridge`] instead routes all tracing events through a
//! [`Logger`] so they get redacted like direct calls.
//!
//! Both honour `RUST_LOG` and never panic when a global subscriber is already
//! set; they return whether installation happened.

use crate::layer::RedactingLayer;
use crate::logger::Logger;
use serde::{Deserialize, Serialize};
use sl_common::{Level, OutputFormat};
use sl_redact::INTERNAL_TARGET;
use std::io::{self, IsTerminal};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Settings for scrublog's own diagnostics subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Minimum level for scrublog's own events when `RUST_LOG` is unset.
    pub level: Level,
    /// `Plain` for the human console format, `Json` for JSON lines.
    pub format: OutputFormat,
    /// Include timestamps in plain output.
    pub timestamps: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        DiagnosticsConfig {
            level: Level::Warn,
            format: OutputFormat::Plain,
            timestamps: true,
        }
    }
}

impl DiagnosticsConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub fn directive(&self) -> String {
        let target = INTERNAL_TARGET.split("::").next().unwrap_or(INTERNAL_TARGET);
        format!("{}={}", target, self.level)
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }
}

/// Install a stderr subscriber for scrublog's diagnostics.
pub fn init_diagnostics(config: &DiagnosticsConfig) -> bool {
    let filter = config.filter();

    let result = match config.format {
        OutputFormat::Plain => {
            let fmt_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_ansi(io::stderr().is_terminal());

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        OutputFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
    };
    result.is_ok()
}

/// Install a global subscriber that writes every tracing event through
/// `logger`. `RUST_LOG` narrows what reaches it; the logger's own level still
/// applies.
pub fn init_tracing_bridge(logger: Arc<Logger>) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));
    tracing_subscriber::registry()
        .with(filter)
        .with(RedactingLayer::new(logger))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(DiagnosticsConfig::default().directive(), "scrublog=warn");
        let config = DiagnosticsConfig {
            level: Level::Debug,
            ..Default::default()
        };
        assert_eq!(config.directive(), "scrublog=debug");
    }

    #[test]
    fn test_config_from_json() {
        let config: DiagnosticsConfig = serde_json::from_str(r#"{"format":"json"}"#).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.level, Level::Warn);
        assert!(config.timestamps);
    }
}
