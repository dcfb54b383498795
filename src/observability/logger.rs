//! Log subscriber setup
//!
//! - One log line = one event
//! - JSON or human-readable output
//! - Always written to stderr; stdout carries command responses
//!
//! `RUST_LOG` overrides the configured level when set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::{ObservabilityError, ObservabilityResult};

/// Output format of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable lines
    Pretty,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(ObservabilityError::new(format!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                other
            ))),
        }
    }
}

/// Parses a level or filter directive such as `info` or `salesdw=debug`.
pub fn parse_filter(level: &str) -> ObservabilityResult<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| ObservabilityError::new(format!("invalid log level '{}': {}", level, e)))
}

/// Installs the global subscriber.
///
/// Fails if the level does not parse or a subscriber is already installed.
pub fn init(format: LogFormat, level: &str) -> ObservabilityResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    installed.map_err(|e| ObservabilityError::new(format!("failed to install logger: {}", e)))
}
