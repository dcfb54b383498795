//! Star schema definitions for the sales warehouse
//!
//! Declares the four tables (`fact_sales`, `dim_product`, `dim_date`,
//! `dim_customer`), their column types and the fact table's foreign keys.
//!
//! # Design Principles
//!
//! - Table definitions are immutable once registered
//! - Stored rows are validated against their table before use
//! - No implicit coercion between column types

mod catalog;
mod errors;
mod types;
mod validator;

pub use catalog::SchemaCatalog;
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use types::{
    star_schema, ColumnDef, ColumnType, ForeignKey, TableSchema, DIM_CUSTOMER, DIM_DATE, DIM_PRODUCT,
    FACT_SALES,
};
pub use validator::SchemaValidator;
