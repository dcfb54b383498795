//! Typed result rows
//!
//! Field names serialize to the column names listed by `QueryKind::columns`.
//! Currency values serialize as exact decimal strings.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryMonthRevenue {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub category: String,
    pub total_revenue: Decimal,
    pub number_of_orders: u64,
    pub total_quantity_sold: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub unique_products: u64,
    pub total_orders: u64,
    pub total_quantity: u64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductPerformance {
    #[serde(rename = "ProductID")]
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub times_ordered: u64,
    pub total_quantity_sold: u64,
    pub total_revenue: Decimal,
    pub average_selling_price: Decimal,
    /// Revenue minus cost of goods sold
    pub total_profit: Decimal,
    /// `None` when the product earned no revenue
    pub profit_margin_percent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerAnalysis {
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    pub number_of_orders: u64,
    pub total_items_purchased: u64,
    pub total_spent: Decimal,
    pub average_order_value: Decimal,
    pub unique_products_purchased: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DailyTrend {
    pub date_key: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub number_of_orders: u64,
    pub total_quantity: u64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub unique_customers: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryComparison {
    pub category: String,
    pub total_orders: u64,
    pub unique_customers: u64,
    pub total_quantity_sold: u64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub revenue_per_customer: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataQualityCheck {
    pub check_type: String,
    pub count: u64,
}

/// Row label of the grand total in `revenue_breakdown`
pub const BREAKDOWN_TOTAL: &str = "Total";
/// Row label of a per-quarter row in `revenue_breakdown`
pub const BREAKDOWN_QUARTER: &str = "Quarter";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RevenueBreakdown {
    pub breakdown: String,
    /// `None` on the grand-total row
    pub year: Option<i32>,
    /// `None` on the grand-total row
    pub quarter: Option<u32>,
    pub total_revenue: Decimal,
    pub number_of_orders: u64,
}

impl RevenueBreakdown {
    pub fn is_total(&self) -> bool {
        self.breakdown == BREAKDOWN_TOTAL
    }
}
