//! Table and column definitions for the star schema
//!
//! Supported column types:
//! - text: UTF-8 string
//! - integer: 64-bit integer
//! - decimal: exact decimal, serialized as a string
//! - date: calendar date in `YYYY-MM-DD` form

use serde::{Deserialize, Serialize};

/// Table name of the fact table
pub const FACT_SALES: &str = "fact_sales";
/// Table name of the product dimension
pub const DIM_PRODUCT: &str = "dim_product";
/// Table name of the date dimension
pub const DIM_DATE: &str = "dim_date";
/// Table name of the customer dimension
pub const DIM_CUSTOMER: &str = "dim_customer";

/// Supported column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// UTF-8 string
    Text,
    /// 64-bit integer
    Integer,
    /// Exact decimal
    Decimal,
    /// Calendar date
    Date,
}

impl ColumnType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Decimal => "decimal",
            ColumnType::Date => "date",
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Column data type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Whether the column may hold null
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnDef {
    /// Create a non-null column
    pub fn required(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
        }
    }

    /// Create a nullable column
    pub fn nullable(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
        }
    }
}

/// A foreign key from a column of this table to another table's column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
}

impl ForeignKey {
    pub fn new(
        column: impl Into<String>,
        references_table: impl Into<String>,
        references_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            references_table: references_table.into(),
            references_column: references_column.into(),
        }
    }
}

/// Complete table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Unique table name
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<ColumnDef>,
    /// Primary key column
    pub primary_key: String,
    /// Foreign keys (fact table only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableSchema {
    /// Create a new table schema without foreign keys
    pub fn new(name: impl Into<String>, primary_key: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
            primary_key: primary_key.into(),
            foreign_keys: Vec::new(),
        }
    }

    /// Adds a foreign key
    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Looks up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Validates the table structure itself (not a row)
    pub fn validate_structure(&self) -> Result<(), String> {
        let pk = self
            .column(&self.primary_key)
            .ok_or_else(|| format!("Primary key column '{}' is not declared", self.primary_key))?;

        if pk.nullable {
            return Err(format!("Primary key column '{}' must not be nullable", pk.name));
        }

        for (i, col) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == col.name) {
                return Err(format!("Column '{}' declared twice", col.name));
            }
        }

        for fk in &self.foreign_keys {
            if self.column(&fk.column).is_none() {
                return Err(format!("Foreign key column '{}' is not declared", fk.column));
            }
        }

        Ok(())
    }
}

/// The four tables of the sales star schema.
pub fn star_schema() -> Vec<TableSchema> {
    use ColumnType::*;

    let dim_product = TableSchema::new(
        DIM_PRODUCT,
        "product_id",
        vec![
            ColumnDef::required("product_id", Text),
            ColumnDef::required("product_name", Text),
            ColumnDef::required("category", Text),
            ColumnDef::required("cost", Decimal),
        ],
    );

    let dim_date = TableSchema::new(
        DIM_DATE,
        "date_key",
        vec![
            ColumnDef::required("date_key", Text),
            ColumnDef::required("full_date", Date),
            ColumnDef::required("year", Integer),
            ColumnDef::required("month", Integer),
            ColumnDef::required("day", Integer),
            ColumnDef::required("month_name", Text),
            ColumnDef::required("quarter", Integer),
        ],
    );

    let dim_customer = TableSchema::new(
        DIM_CUSTOMER,
        "customer_id",
        vec![ColumnDef::required("customer_id", Text)],
    );

    let fact_sales = TableSchema::new(
        FACT_SALES,
        "order_id",
        vec![
            ColumnDef::required("order_id", Text),
            ColumnDef::required("product_id", Text),
            ColumnDef::required("customer_id", Text),
            ColumnDef::required("date_key", Text),
            ColumnDef::required("quantity", Integer),
            ColumnDef::required("price", Decimal),
            ColumnDef::required("revenue", Decimal),
        ],
    )
    .with_foreign_key(ForeignKey::new("product_id", DIM_PRODUCT, "product_id"))
    .with_foreign_key(ForeignKey::new("customer_id", DIM_CUSTOMER, "customer_id"))
    .with_foreign_key(ForeignKey::new("date_key", DIM_DATE, "date_key"));

    vec![dim_product, dim_date, dim_customer, fact_sales]
}
