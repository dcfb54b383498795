//! Extract and load
//!
//! Turns flat sale records into the star schema:
//! - `source` reads CSV files into raw records
//! - `loader` validates each record and upserts dimensions and facts
//! - `report` describes what was accepted, rejected and orphaned
//!
//! Record-level problems are reported, never fatal.

mod errors;
mod loader;
mod record;
mod report;
mod source;

pub use errors::{LoadError, LoadErrorCode, Severity};
pub use loader::Loader;
pub use record::{OrderRecord, ProductRecord, RawSaleRecord};
pub use report::{AttributeConflict, LoadReport, RejectedRecord};
pub use source::{
    read_orders_and_products, read_sales_file, write_sample_data, SourceError, SourceResult,
    SourceRow,
};
