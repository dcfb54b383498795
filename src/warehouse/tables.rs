//! Row types for the four star-schema tables

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::round_currency;

/// Canonical `DateKey` format
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// One row of `dim_product`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimProduct {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub cost: Decimal,
}

impl DimProduct {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        category: impl Into<String>,
        cost: Decimal,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            category: category.into(),
            cost,
        }
    }

    /// Names of descriptive attributes that differ from `other`, in column order.
    pub fn differing_attributes(&self, other: &DimProduct) -> Vec<&'static str> {
        let mut diffs = Vec::new();
        if self.product_name != other.product_name {
            diffs.push("product_name");
        }
        if self.category != other.category {
            diffs.push("category");
        }
        if self.cost != other.cost {
            diffs.push("cost");
        }
        diffs
    }
}

/// One row of `dim_date`. Every attribute is derived from the date itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimDate {
    pub date_key: String,
    pub full_date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub month_name: String,
    pub quarter: u32,
}

impl DimDate {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date_key: date_key(date),
            full_date: date,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            month_name: date.format("%B").to_string(),
            quarter: quarter_of(date.month()),
        }
    }
}

/// Formats the `DateKey` for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Calendar quarter (1-4) of a month (1-12).
pub fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

/// One row of `dim_customer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimCustomer {
    pub customer_id: String,
}

impl DimCustomer {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
        }
    }
}

/// One row of `fact_sales`. Grain: one row per order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactSales {
    pub order_id: String,
    pub product_id: String,
    pub customer_id: String,
    pub date_key: String,
    pub quantity: u32,
    pub price: Decimal,
    pub revenue: Decimal,
}

impl FactSales {
    /// Builds a fact row, deriving `revenue = round(quantity * price, 2)`.
    ///
    /// Returns `None` when the product of quantity and price is out of range.
    pub fn new(
        order_id: impl Into<String>,
        product_id: impl Into<String>,
        customer_id: impl Into<String>,
        date_key: impl Into<String>,
        quantity: u32,
        price: Decimal,
    ) -> Option<Self> {
        Some(Self {
            order_id: order_id.into(),
            product_id: product_id.into(),
            customer_id: customer_id.into(),
            date_key: date_key.into(),
            quantity,
            price,
            revenue: revenue_for(quantity, price)?,
        })
    }

    /// Whether the stored revenue matches its quantity and price.
    pub fn revenue_consistent(&self) -> bool {
        revenue_for(self.quantity, self.price) == Some(self.revenue)
    }
}

/// `round(quantity * price, 2)`, or `None` on overflow
pub fn revenue_for(quantity: u32, price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(price).map(round_currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_dim_date_derivation() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 17).unwrap();
        let dim = DimDate::from_date(date);

        assert_eq!(dim.date_key, "2024-08-17");
        assert_eq!(dim.year, 2024);
        assert_eq!(dim.month, 8);
        assert_eq!(dim.day, 17);
        assert_eq!(dim.month_name, "August");
        assert_eq!(dim.quarter, 3);
    }

    #[test]
    fn test_quarter_boundaries() {
        assert_eq!(quarter_of(1), 1);
        assert_eq!(quarter_of(3), 1);
        assert_eq!(quarter_of(4), 2);
        assert_eq!(quarter_of(9), 3);
        assert_eq!(quarter_of(10), 4);
        assert_eq!(quarter_of(12), 4);
    }

    #[test]
    fn test_fact_revenue_derived() {
        let fact = FactSales::new("1001", "P001", "C101", "2024-01-05", 3, Decimal::from_str("15.50").unwrap()).unwrap();
        assert_eq!(fact.revenue, Decimal::from_str("46.50").unwrap());
        assert!(fact.revenue_consistent());
    }

    #[test]
    fn test_fact_revenue_rounded() {
        let fact = FactSales::new("1", "P1", "C1", "2024-01-01", 3, Decimal::from_str("0.335").unwrap()).unwrap();
        // 1.005 rounds away from zero
        assert_eq!(fact.revenue, Decimal::from_str("1.01").unwrap());
    }

    #[test]
    fn test_fact_revenue_out_of_range() {
        assert!(FactSales::new("1", "P1", "C1", "2024-01-01", 2, Decimal::MAX).is_none());
        assert_eq!(revenue_for(1, Decimal::MAX), Some(round_currency(Decimal::MAX)));
    }

    #[test]
    fn test_product_differing_attributes() {
        let a = DimProduct::new("P1", "Keyboard", "Peripherals", Decimal::from(10));
        let b = DimProduct::new("P1", "Keyboard", "Accessories", Decimal::from(12));
        assert_eq!(a.differing_attributes(&b), vec!["category", "cost"]);
        assert!(a.differing_attributes(&a.clone()).is_empty());
    }

    #[test]
    fn test_fact_serializes_snake_case_columns() {
        let fact = FactSales::new("1", "P1", "C1", "2024-01-01", 2, Decimal::from_str("10.00").unwrap()).unwrap();
        let value = serde_json::to_value(&fact).unwrap();
        assert_eq!(value["order_id"], "1");
        assert_eq!(value["quantity"], 2);
        assert_eq!(value["revenue"], "20.00");
    }
}
