//! Structured logging via `tracing`.
//!
//! Logs always go to stderr so the diff report on stdout stays clean for
//! piping. The `DRIVEDIFF_LOG` environment variable overrides the
//! configured level with a full `EnvFilter` directive string.

use crate::error::DiffError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored log output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

/// Initialize the logging system.
///
/// Precedence: `DRIVEDIFF_LOG` environment variable, then the supplied
/// config (already merged from CLI flags and the config file by the
/// caller).
pub fn init_logging(config: &LoggingConfig) -> Result<(), DiffError> {
    let filter = build_env_filter(config)?;
    let base = Registry::default().with(filter);

    match config.format.as_str() {
        "json" => {
            base.with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .init();
        }
        "text" => {
            base.with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .init();
        }
        other => {
            return Err(DiffError::Config(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                other
            )))
        }
    }

    Ok(())
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, DiffError> {
    if let Ok(filter) = EnvFilter::try_from_env("DRIVEDIFF_LOG") {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| DiffError::Config(format!("Invalid log level {:?}: {}", config.level, e)))
}
