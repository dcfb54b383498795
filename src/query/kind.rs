//! The fixed query library

use std::fmt;
use std::str::FromStr;

use super::errors::QueryError;

/// One of the eight analytical queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKind {
    RevenueByCategoryMonth,
    MonthlySummary,
    ProductPerformance,
    CustomerAnalysis,
    DailyTrend,
    CategoryComparison,
    DataQuality,
    RevenueBreakdown,
}

impl QueryKind {
    /// Every query in run order
    pub fn all() -> [QueryKind; 8] {
        [
            QueryKind::RevenueByCategoryMonth,
            QueryKind::MonthlySummary,
            QueryKind::ProductPerformance,
            QueryKind::CustomerAnalysis,
            QueryKind::DailyTrend,
            QueryKind::CategoryComparison,
            QueryKind::DataQuality,
            QueryKind::RevenueBreakdown,
        ]
    }

    /// Name accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::RevenueByCategoryMonth => "revenue_by_category_month",
            QueryKind::MonthlySummary => "monthly_summary",
            QueryKind::ProductPerformance => "product_performance",
            QueryKind::CustomerAnalysis => "customer_analysis",
            QueryKind::DailyTrend => "daily_trend",
            QueryKind::CategoryComparison => "category_comparison",
            QueryKind::DataQuality => "data_quality",
            QueryKind::RevenueBreakdown => "revenue_breakdown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            QueryKind::RevenueByCategoryMonth => {
                "Total revenue for each product category for each month"
            }
            QueryKind::MonthlySummary => "Monthly sales summary",
            QueryKind::ProductPerformance => "Product performance analysis",
            QueryKind::CustomerAnalysis => "Customer analysis",
            QueryKind::DailyTrend => "Daily sales trend",
            QueryKind::CategoryComparison => "Category performance comparison",
            QueryKind::DataQuality => "Data quality check",
            QueryKind::RevenueBreakdown => "Revenue by grand total and by quarter",
        }
    }

    /// Output columns in display order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            QueryKind::RevenueByCategoryMonth => &[
                "Year",
                "Month",
                "MonthName",
                "Category",
                "TotalRevenue",
                "NumberOfOrders",
                "TotalQuantitySold",
            ],
            QueryKind::MonthlySummary => &[
                "Year",
                "Month",
                "MonthName",
                "UniqueProducts",
                "TotalOrders",
                "TotalQuantity",
                "TotalRevenue",
                "AverageOrderValue",
            ],
            QueryKind::ProductPerformance => &[
                "ProductID",
                "ProductName",
                "Category",
                "TimesOrdered",
                "TotalQuantitySold",
                "TotalRevenue",
                "AverageSellingPrice",
                "TotalProfit",
                "ProfitMarginPercent",
            ],
            QueryKind::CustomerAnalysis => &[
                "CustomerID",
                "NumberOfOrders",
                "TotalItemsPurchased",
                "TotalSpent",
                "AverageOrderValue",
                "UniqueProductsPurchased",
            ],
            QueryKind::DailyTrend => &[
                "DateKey",
                "Year",
                "Month",
                "Day",
                "NumberOfOrders",
                "TotalQuantity",
                "TotalRevenue",
                "AverageOrderValue",
                "UniqueCustomers",
            ],
            QueryKind::CategoryComparison => &[
                "Category",
                "TotalOrders",
                "UniqueCustomers",
                "TotalQuantitySold",
                "TotalRevenue",
                "AverageOrderValue",
                "RevenuePerCustomer",
            ],
            QueryKind::DataQuality => &["CheckType", "Count"],
            QueryKind::RevenueBreakdown => &[
                "Breakdown",
                "Year",
                "Quarter",
                "TotalRevenue",
                "NumberOfOrders",
            ],
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QueryKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryKind::all()
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| QueryError::UnknownQuery {
                name: s.to_string(),
                expected: QueryKind::all().map(|k| k.name()).join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_name() {
        for kind in QueryKind::all() {
            assert_eq!(kind.name().parse::<QueryKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "revenue".parse::<QueryKind>().unwrap_err();
        assert_eq!(err.code(), "DW_UNKNOWN_QUERY");
        assert!(err.to_string().contains("daily_trend"));
    }

    #[test]
    fn test_run_order_is_fixed() {
        let names: Vec<_> = QueryKind::all().iter().map(|k| k.name()).collect();
        assert_eq!(names.first(), Some(&"revenue_by_category_month"));
        assert_eq!(names.last(), Some(&"revenue_breakdown"));
        assert_eq!(names.len(), 8);
    }
}
