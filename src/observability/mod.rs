//! Observability subsystem for salesdw
//!
//! This module provides:
//! - Structured logging through `tracing`
//! - Typed lifecycle event names
//! - Scope-based begin/complete logging
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on loading or query results
//! 3. Logs go to stderr only
//!
//! # Usage
//!
//! ```ignore
//! use salesdw::observability::{Event, ObservationScope};
//!
//! tracing::info!(event = %Event::QueryExecuted, query = "monthly_summary");
//!
//! let scope = ObservationScope::new("LOAD");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{init, parse_filter, LogFormat};
pub use scope::ObservationScope;

use std::fmt;

/// Observability error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservabilityErrorCode {
    /// Logger setup failed
    DwObservabilityFailed,
}

impl ObservabilityErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservabilityErrorCode::DwObservabilityFailed => "DW_OBSERVABILITY_FAILED",
        }
    }
}

impl fmt::Display for ObservabilityErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observability error
///
/// Only raised while configuring logging; emitting events never fails.
#[derive(Debug)]
pub struct ObservabilityError {
    code: ObservabilityErrorCode,
    message: String,
}

impl ObservabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: ObservabilityErrorCode::DwObservabilityFailed,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ObservabilityErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ObservabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ObservabilityError {}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_error_display() {
        let err = ObservabilityError::new("test message");
        let display = format!("{}", err);
        assert!(display.contains("ERROR"));
        assert!(display.contains("DW_OBSERVABILITY_FAILED"));
        assert!(display.contains("test message"));
        assert_eq!(err.code(), ObservabilityErrorCode::DwObservabilityFailed);
    }
}
