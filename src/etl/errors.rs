//! Load error types
//!
//! Error codes:
//! - DW_MALFORMED_RECORD (REJECT): the single record is dropped, the load continues
//! - DW_ATTRIBUTE_CONFLICT (WARN): reported, first-seen dimension attributes kept
//! - DW_REFERENTIAL_VIOLATION (WARN): orphaned facts counted after the load
//!
//! No load error is fatal to the batch.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Severity levels for load errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Record excluded from the warehouse
    Reject,
    /// Reported, record kept
    Warn,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Reject => "REJECT",
            Severity::Warn => "WARN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorCode {
    /// Unparseable, missing or out-of-range field
    DwMalformedRecord,
    /// Fact references a dimension row that does not exist
    DwReferentialViolation,
    /// Same natural key seen with different descriptive attributes
    DwAttributeConflict,
}

impl LoadErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            LoadErrorCode::DwMalformedRecord => "DW_MALFORMED_RECORD",
            LoadErrorCode::DwReferentialViolation => "DW_REFERENTIAL_VIOLATION",
            LoadErrorCode::DwAttributeConflict => "DW_ATTRIBUTE_CONFLICT",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            LoadErrorCode::DwMalformedRecord => Severity::Reject,
            LoadErrorCode::DwReferentialViolation | LoadErrorCode::DwAttributeConflict => Severity::Warn,
        }
    }
}

impl fmt::Display for LoadErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A record-level load error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    code: LoadErrorCode,
    message: String,
    field: Option<String>,
}

impl LoadError {
    /// A required field is absent or empty
    pub fn missing_field(field: &str) -> Self {
        Self {
            code: LoadErrorCode::DwMalformedRecord,
            message: format!("missing required field '{}'", field),
            field: Some(field.to_string()),
        }
    }

    /// A field could not be parsed
    pub fn malformed_field(field: &str, value: &str, expected: &str) -> Self {
        Self {
            code: LoadErrorCode::DwMalformedRecord,
            message: format!("field '{}': expected {}, got '{}'", field, expected, value),
            field: Some(field.to_string()),
        }
    }

    /// A numeric field that must be non-negative was negative
    pub fn negative_value(field: &str, value: &str) -> Self {
        Self {
            code: LoadErrorCode::DwMalformedRecord,
            message: format!("field '{}' must be non-negative, got '{}'", field, value),
            field: Some(field.to_string()),
        }
    }

    /// The source row could not be decoded at all
    pub fn unreadable_row(reason: impl Into<String>) -> Self {
        Self {
            code: LoadErrorCode::DwMalformedRecord,
            message: format!("unreadable source row: {}", reason.into()),
            field: None,
        }
    }

    /// The OrderID was already loaded
    pub fn duplicate_order(order_id: &str) -> Self {
        Self {
            code: LoadErrorCode::DwMalformedRecord,
            message: format!("duplicate OrderID '{}'", order_id),
            field: Some("OrderID".to_string()),
        }
    }

    /// A product appeared again with different attributes
    pub fn attribute_conflict(product_id: &str, differing: &[&str]) -> Self {
        Self {
            code: LoadErrorCode::DwAttributeConflict,
            message: format!(
                "product '{}' seen with different {}; first-seen attributes kept",
                product_id,
                differing.join(", ")
            ),
            field: None,
        }
    }

    /// Fact rows whose foreign key has no matching dimension row
    pub fn referential_violation(relationship: &str, orphans: u64) -> Self {
        Self {
            code: LoadErrorCode::DwReferentialViolation,
            message: format!("{}: {} orphaned fact rows", relationship, orphans),
            field: None,
        }
    }

    pub fn code(&self) -> LoadErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source column the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn is_rejection(&self) -> bool {
        self.severity() == Severity::Reject
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for LoadError {}

impl Serialize for LoadError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LoadError", 4)?;
        state.serialize_field("code", self.code.code())?;
        state.serialize_field("severity", self.code.severity().as_str())?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("field", &self.field)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LoadErrorCode::DwMalformedRecord.code(), "DW_MALFORMED_RECORD");
        assert_eq!(LoadErrorCode::DwReferentialViolation.code(), "DW_REFERENTIAL_VIOLATION");
        assert_eq!(LoadErrorCode::DwAttributeConflict.code(), "DW_ATTRIBUTE_CONFLICT");
    }

    #[test]
    fn test_only_malformed_rejects() {
        assert!(LoadError::missing_field("OrderID").is_rejection());
        assert!(LoadError::duplicate_order("1001").is_rejection());
        assert!(!LoadError::attribute_conflict("P1", &["cost"]).is_rejection());
        assert!(!LoadError::referential_violation("Missing Product References", 2).is_rejection());
    }

    #[test]
    fn test_display() {
        let err = LoadError::negative_value("Quantity", "-1");
        let display = err.to_string();
        assert!(display.starts_with("[REJECT] DW_MALFORMED_RECORD"));
        assert!(display.contains("Quantity"));
        assert_eq!(err.field(), Some("Quantity"));
    }

    #[test]
    fn test_serialize() {
        let err = LoadError::attribute_conflict("P1", &["category", "cost"]);
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["code"], "DW_ATTRIBUTE_CONFLICT");
        assert_eq!(value["severity"], "WARN");
        assert!(value["message"].as_str().unwrap().contains("category, cost"));
        assert!(value["field"].is_null());
    }
}
