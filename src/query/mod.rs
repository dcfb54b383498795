//! Analytical query set
//!
//! A fixed library of read-only aggregations over the loaded star schema.
//!
//! # Invariants
//!
//! - No query mutates the warehouse
//! - Output order is fully determined by the data (ties broken by key)
//! - Currency values rounded to two places at output only

mod aggregate;
mod errors;
mod kind;
mod rows;
mod runner;

pub use aggregate::{
    category_comparison, customer_analysis, daily_trend, data_quality, monthly_summary,
    product_performance, revenue_breakdown, revenue_by_category_month,
};
pub use errors::{QueryError, QueryResult};
pub use kind::QueryKind;
pub use rows::{
    CategoryComparison, CategoryMonthRevenue, CustomerAnalysis, DailyTrend, DataQualityCheck,
    MonthlySummary, ProductPerformance, RevenueBreakdown, BREAKDOWN_QUARTER, BREAKDOWN_TOTAL,
};
pub use runner::{QueryRunner, ResultSet};
