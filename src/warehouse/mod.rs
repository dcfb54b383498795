//! The loaded star schema
//!
//! Holds `fact_sales` and its three dimensions in memory. The warehouse is
//! mutated only by the loader; queries borrow it immutably.

mod integrity;
mod money;
mod tables;
mod warehouse;

pub use integrity::{IntegrityReport, MISSING_CUSTOMER, MISSING_DATE, MISSING_PRODUCT};
pub use money::{round_currency, rounded_average, rounded_percent, CURRENCY_SCALE};
pub use tables::{
    date_key, quarter_of, revenue_for, DimCustomer, DimDate, DimProduct, FactSales, DATE_KEY_FORMAT,
};
pub use warehouse::{DuplicateKey, ProductUpsert, SaleView, TableCounts, Warehouse};
