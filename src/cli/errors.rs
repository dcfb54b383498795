//! CLI-specific error types
//!
//! Every CLI error ends the command with exit code 1. Record-level load
//! problems are not CLI errors; they are part of the load report.

use std::fmt;
use std::io;

use crate::etl::SourceError;
use crate::observability::ObservabilityError;
use crate::query::QueryError;
use crate::schema::SchemaError;
use crate::storage::StorageError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, data directory)
    IoError,
    /// Data directory already initialized
    AlreadyInitialized,
    /// Data directory not initialized
    NotInitialized,
    /// No warehouse has been loaded yet
    NotLoaded,
    /// Source file could not be read
    SourceError,
    /// Stored warehouse unreadable or corrupt
    StorageError,
    /// Schema files missing or malformed
    SchemaError,
    /// Unknown query name
    QueryError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DW_CLI_CONFIG_ERROR",
            Self::IoError => "DW_CLI_IO_ERROR",
            Self::AlreadyInitialized => "DW_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "DW_CLI_NOT_INITIALIZED",
            Self::NotLoaded => "DW_CLI_NOT_LOADED",
            Self::SourceError => "DW_CLI_SOURCE_ERROR",
            Self::StorageError => "DW_CLI_STORAGE_ERROR",
            Self::SchemaError => "DW_CLI_SCHEMA_ERROR",
            Self::QueryError => "DW_CLI_QUERY_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Data directory already initialized",
        )
    }

    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Data directory not initialized. Run 'salesdw init' first.",
        )
    }

    pub fn not_loaded() -> Self {
        Self::new(
            CliErrorCode::NotLoaded,
            "No warehouse loaded. Run 'salesdw load' first.",
        )
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        Self::new(CliErrorCode::SourceError, e.to_string())
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(_) => Self::not_loaded(),
            other => Self::new(
                CliErrorCode::StorageError,
                format!("{} ({})", other, other.code()),
            ),
        }
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, e.to_string())
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::new(CliErrorCode::QueryError, e.to_string())
    }
}

impl From<ObservabilityError> for CliError {
    fn from(e: ObservabilityError) -> Self {
        Self::config_error(e.message().to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
