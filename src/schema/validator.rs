//! Row validator for stored warehouse tables
//!
//! Validation semantics:
//! - All declared columns are present
//! - No undeclared columns exist
//! - Non-nullable columns are not null
//! - Values match the column type exactly (decimals as strings or numbers)
//! - Primary key values are non-empty

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use super::catalog::SchemaCatalog;
use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{ColumnType, TableSchema};

/// Validates serialized rows against the catalog.
///
/// Validator does not mutate rows and is deterministic.
pub struct SchemaValidator<'a> {
    catalog: &'a SchemaCatalog,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(catalog: &'a SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Validates a single row of `table`.
    ///
    /// # Errors
    ///
    /// - `DW_UNKNOWN_TABLE` if the table is not registered
    /// - `DW_ROW_VALIDATION_FAILED` if the row violates the table schema
    pub fn validate_row(&self, table: &str, row: &Value) -> SchemaResult<()> {
        let schema = self.catalog.require(table)?;

        let obj = row.as_object().ok_or_else(|| {
            SchemaError::row_invalid(table, ValidationDetails::new("$row", "object", json_type_name(row)))
        })?;

        for key in obj.keys() {
            if schema.column(key).is_none() {
                return Err(SchemaError::row_invalid(table, ValidationDetails::extra_column(key)));
            }
        }

        for column in &schema.columns {
            match obj.get(&column.name) {
                None => {
                    return Err(SchemaError::row_invalid(
                        table,
                        ValidationDetails::missing_column(&column.name),
                    ))
                }
                Some(Value::Null) if column.nullable => {}
                Some(Value::Null) => {
                    return Err(SchemaError::row_invalid(table, ValidationDetails::null_value(&column.name)))
                }
                Some(value) => {
                    if let Some(expected) = type_mismatch(column.column_type, value) {
                        return Err(SchemaError::row_invalid(
                            table,
                            ValidationDetails::new(&column.name, expected, describe(value)),
                        ));
                    }
                }
            }
        }

        check_primary_key(schema, obj)
    }

    /// Validates every row of a table, stopping at the first violation.
    pub fn validate_rows(&self, table: &str, rows: &[Value]) -> SchemaResult<()> {
        rows.iter().try_for_each(|row| self.validate_row(table, row))
    }
}

fn check_primary_key(schema: &TableSchema, obj: &serde_json::Map<String, Value>) -> SchemaResult<()> {
    match obj.get(&schema.primary_key) {
        Some(Value::String(s)) if s.trim().is_empty() => Err(SchemaError::row_invalid(
            &schema.name,
            ValidationDetails::new(&schema.primary_key, "non-empty key", "empty string"),
        )),
        _ => Ok(()),
    }
}

/// Returns the expected description when `value` does not fit `column_type`.
fn type_mismatch(column_type: ColumnType, value: &Value) -> Option<&'static str> {
    let ok = match column_type {
        ColumnType::Text => value.is_string(),
        ColumnType::Integer => value.is_i64() || value.is_u64(),
        ColumnType::Decimal => match value {
            Value::String(s) => Decimal::from_str(s).is_ok(),
            Value::Number(_) => true,
            _ => false,
        },
        ColumnType::Date => value
            .as_str()
            .map_or(false, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
    };

    if ok {
        None
    } else {
        Some(column_type.type_name())
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("string '{}'", s),
        other => json_type_name(other).to_string(),
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{DIM_DATE, DIM_PRODUCT, FACT_SALES};
    use serde_json::json;
    use tempfile::TempDir;

    fn setup_catalog() -> (TempDir, SchemaCatalog) {
        let temp_dir = TempDir::new().unwrap();
        let catalog = SchemaCatalog::star(temp_dir.path()).unwrap();
        (temp_dir, catalog)
    }

    fn product_row() -> Value {
        json!({
            "product_id": "P001",
            "product_name": "Keyboard",
            "category": "Peripherals",
            "cost": "10.00"
        })
    }

    #[test]
    fn test_valid_row_passes() {
        let (_tmp, catalog) = setup_catalog();
        let validator = SchemaValidator::new(&catalog);

        assert!(validator.validate_row(DIM_PRODUCT, &product_row()).is_ok());
    }

    #[test]
    fn test_missing_column_fails() {
        let (_tmp, catalog) = setup_catalog();
        let validator = SchemaValidator::new(&catalog);

        let mut row = product_row();
        row.as_object_mut().unwrap().remove("category");

        let err = validator.validate_row(DIM_PRODUCT, &row).unwrap_err();
        assert_eq!(err.code().code(), "DW_ROW_VALIDATION_FAILED");
        assert_eq!(err.details().unwrap().column, "category");
    }

    #[test]
    fn test_extra_column_fails() {
        let (_tmp, catalog) = setup_catalog();
        let validator = SchemaValidator::new(&catalog);

        let mut row = product_row();
        row["supplier"] = json!("Acme");

        let err = validator.validate_row(DIM_PRODUCT, &row).unwrap_err();
        assert!(err.details().unwrap().column.contains("supplier"));
    }

    #[test]
    fn test_decimal_must_parse() {
        let (_tmp, catalog) = setup_catalog();
        let validator = SchemaValidator::new(&catalog);

        let mut row = product_row();
        row["cost"] = json!("ten dollars");

        let err = validator.validate_row(DIM_PRODUCT, &row).unwrap_err();
        let details = err.details().unwrap();
        assert_eq!(details.column, "cost");
        assert_eq!(details.expected, "decimal");
    }

    #[test]
    fn test_null_rejected() {
        let (_tmp, catalog) = setup_catalog();
        let validator = SchemaValidator::new(&catalog);

        let mut row = product_row();
        row["product_name"] = Value::Null;

        let err = validator.validate_row(DIM_PRODUCT, &row).unwrap_err();
        assert!(err.details().unwrap().actual.contains("null"));
    }

    #[test]
    fn test_empty_primary_key_rejected() {
        let (_tmp, catalog) = setup_catalog();
        let validator = SchemaValidator::new(&catalog);

        let mut row = product_row();
        row["product_id"] = json!("  ");

        let err = validator.validate_row(DIM_PRODUCT, &row).unwrap_err();
        assert_eq!(err.details().unwrap().column, "product_id");
    }

    #[test]
    fn test_integer_column_rejects_float() {
        let (_tmp, catalog) = setup_catalog();
        let validator = SchemaValidator::new(&catalog);

        let row = json!({
            "order_id": "1001",
            "product_id": "P001",
            "customer_id": "C101",
            "date_key": "2024-01-05",
            "quantity": 2.5,
            "price": "15.50",
            "revenue": "38.75"
        });

        let err = validator.validate_row(FACT_SALES, &row).unwrap_err();
        assert_eq!(err.details().unwrap().column, "quantity");
        assert_eq!(err.details().unwrap().actual, "float");
    }

    #[test]
    fn test_date_column_format() {
        let (_tmp, catalog) = setup_catalog();
        let validator = SchemaValidator::new(&catalog);

        let row = json!({
            "date_key": "2024-01-05",
            "full_date": "05/01/2024",
            "year": 2024,
            "month": 1,
            "day": 5,
            "month_name": "January",
            "quarter": 1
        });

        let err = validator.validate_row(DIM_DATE, &row).unwrap_err();
        assert_eq!(err.details().unwrap().column, "full_date");
    }

    #[test]
    fn test_unknown_table_rejected() {
        let (_tmp, catalog) = setup_catalog();
        let validator = SchemaValidator::new(&catalog);

        let err = validator.validate_row("dim_store", &json!({})).unwrap_err();
        assert_eq!(err.code().code(), "DW_UNKNOWN_TABLE");
    }
}
