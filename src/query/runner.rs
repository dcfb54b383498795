//! Query runner
//!
//! Runs queries by kind and returns their rows as JSON objects together
//! with the column order, ready for output.

use serde::Serialize;
use serde_json::Value;

use crate::observability::Event;
use crate::warehouse::Warehouse;

use super::aggregate;
use super::errors::{QueryError, QueryResult};
use super::kind::QueryKind;

/// Rows produced by one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub query: &'static str,
    pub description: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Value>,
    pub row_count: usize,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs the query library against one loaded warehouse
pub struct QueryRunner<'a> {
    warehouse: &'a Warehouse,
}

impl<'a> QueryRunner<'a> {
    pub fn new(warehouse: &'a Warehouse) -> Self {
        Self { warehouse }
    }

    /// Runs a single query.
    pub fn run(&self, kind: QueryKind) -> QueryResult<ResultSet> {
        let wh = self.warehouse;
        let rows = match kind {
            QueryKind::RevenueByCategoryMonth => encode(kind, aggregate::revenue_by_category_month(wh)?),
            QueryKind::MonthlySummary => encode(kind, aggregate::monthly_summary(wh)?),
            QueryKind::ProductPerformance => encode(kind, aggregate::product_performance(wh)?),
            QueryKind::CustomerAnalysis => encode(kind, aggregate::customer_analysis(wh)?),
            QueryKind::DailyTrend => encode(kind, aggregate::daily_trend(wh)?),
            QueryKind::CategoryComparison => encode(kind, aggregate::category_comparison(wh)?),
            QueryKind::DataQuality => encode(kind, aggregate::data_quality(wh)),
            QueryKind::RevenueBreakdown => encode(kind, aggregate::revenue_breakdown(wh)?),
        }?;

        tracing::info!(
            event = %Event::QueryExecuted,
            query = kind.name(),
            rows = rows.len(),
        );

        Ok(ResultSet {
            query: kind.name(),
            description: kind.description(),
            columns: kind.columns().to_vec(),
            row_count: rows.len(),
            rows,
        })
    }

    /// Runs a query given by name.
    pub fn run_named(&self, name: &str) -> QueryResult<ResultSet> {
        let kind = name.parse::<QueryKind>().map_err(|err| {
            tracing::warn!(event = %Event::QueryRejected, query = name);
            err
        })?;
        self.run(kind)
    }

    /// Runs every query in the fixed order.
    pub fn run_all(&self) -> QueryResult<Vec<ResultSet>> {
        QueryKind::all().into_iter().map(|kind| self.run(kind)).collect()
    }
}

fn encode<T: Serialize>(kind: QueryKind, rows: Vec<T>) -> QueryResult<Vec<Value>> {
    rows.iter()
        .map(|row| {
            serde_json::to_value(row).map_err(|source| QueryError::Encode {
                query: kind.name(),
                source,
            })
        })
        .collect()
}
