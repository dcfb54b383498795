//! Schema error types
//!
//! Error codes:
//! - DW_UNKNOWN_TABLE (REJECT)
//! - DW_SCHEMA_IMMUTABLE (REJECT)
//! - DW_ROW_VALIDATION_FAILED (REJECT)
//! - DW_MALFORMED_SCHEMA (FATAL)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation rejected
    Reject,
    /// Warehouse cannot be opened
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Table name not registered
    DwUnknownTable,
    /// Attempt to redefine a registered table
    DwSchemaImmutable,
    /// Row violates its table schema
    DwRowValidationFailed,
    /// Schema file or definition is unusable
    DwMalformedSchema,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::DwUnknownTable => "DW_UNKNOWN_TABLE",
            SchemaErrorCode::DwSchemaImmutable => "DW_SCHEMA_IMMUTABLE",
            SchemaErrorCode::DwRowValidationFailed => "DW_ROW_VALIDATION_FAILED",
            SchemaErrorCode::DwMalformedSchema => "DW_MALFORMED_SCHEMA",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::DwMalformedSchema => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Row validation failure details
#[derive(Debug, Clone)]
pub struct ValidationDetails {
    /// Column name
    pub column: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(column: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::new(column, "column to be present", "missing")
    }

    pub fn extra_column(column: impl Into<String>) -> Self {
        Self::new(column, "no undeclared columns", "extra column present")
    }

    pub fn null_value(column: impl Into<String>) -> Self {
        Self::new(column, "non-null value", "null")
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column '{}': expected {}, got {}", self.column, self.expected, self.actual)
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    table: Option<String>,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Create an unknown table error
    pub fn unknown_table(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            code: SchemaErrorCode::DwUnknownTable,
            message: format!("Table '{}' not found", table),
            table: Some(table),
            details: None,
        }
    }

    /// Create a schema immutable error
    pub fn schema_immutable(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            code: SchemaErrorCode::DwSchemaImmutable,
            message: format!("Table '{}' is already defined", table),
            table: Some(table),
            details: None,
        }
    }

    /// Create a row validation error
    pub fn row_invalid(table: impl Into<String>, details: ValidationDetails) -> Self {
        let table = table.into();
        Self {
            code: SchemaErrorCode::DwRowValidationFailed,
            message: format!("Row validation failed for '{}': {}", table, details),
            table: Some(table),
            details: Some(details),
        }
    }

    /// Create an error for a malformed schema file or definition
    pub fn malformed_schema(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::DwMalformedSchema,
            message: format!("Malformed schema '{}': {}", source.into(), reason.into()),
            table: None,
            details: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the table name if applicable
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
