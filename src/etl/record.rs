//! Raw source records
//!
//! Fields are kept as the untyped strings read from the source; parsing and
//! validation happen in the loader so a bad field rejects only its record.

use serde::{Deserialize, Serialize};

/// One raw sale as read from the source, before validation.
///
/// Column names follow the source CSV headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSaleRecord {
    #[serde(rename = "OrderID")]
    pub order_id: Option<String>,
    #[serde(rename = "ProductID")]
    pub product_id: Option<String>,
    #[serde(rename = "ProductName")]
    pub product_name: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Cost")]
    pub cost: Option<String>,
    #[serde(rename = "CustomerID")]
    pub customer_id: Option<String>,
    #[serde(rename = "OrderDate", alias = "DateKey")]
    pub order_date: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Month")]
    pub month: Option<String>,
    #[serde(rename = "Day")]
    pub day: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<String>,
}

impl RawSaleRecord {
    /// Builder for a record dated by a `YYYY-MM-DD` string.
    pub fn new(
        order_id: &str,
        product_id: &str,
        customer_id: &str,
        order_date: &str,
        quantity: &str,
        price: &str,
    ) -> Self {
        Self {
            order_id: Some(order_id.to_string()),
            product_id: Some(product_id.to_string()),
            customer_id: Some(customer_id.to_string()),
            order_date: Some(order_date.to_string()),
            quantity: Some(quantity.to_string()),
            price: Some(price.to_string()),
            ..Self::default()
        }
    }

    /// Attaches product attributes.
    pub fn with_product(mut self, name: &str, category: &str, cost: &str) -> Self {
        self.product_name = Some(name.to_string());
        self.category = Some(category.to_string());
        self.cost = Some(cost.to_string());
        self
    }

    /// Attaches product attributes from a catalog row.
    pub fn with_product_row(mut self, product: &ProductRecord) -> Self {
        self.product_name = product.product_name.clone();
        self.category = product.category.clone();
        self.cost = product.cost.clone();
        self
    }

    /// Whether any product attribute column carries a value.
    pub fn has_product_attributes(&self) -> bool {
        [&self.product_name, &self.category, &self.cost]
            .iter()
            .any(|f| present(f).is_some())
    }
}

/// One row of the orders file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrderRecord {
    #[serde(rename = "OrderID")]
    pub order_id: Option<String>,
    #[serde(rename = "ProductID")]
    pub product_id: Option<String>,
    #[serde(rename = "CustomerID")]
    pub customer_id: Option<String>,
    #[serde(rename = "OrderDate", alias = "DateKey")]
    pub order_date: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<String>,
}

impl From<OrderRecord> for RawSaleRecord {
    fn from(order: OrderRecord) -> Self {
        Self {
            order_id: order.order_id,
            product_id: order.product_id,
            customer_id: order.customer_id,
            order_date: order.order_date,
            quantity: order.quantity,
            price: order.price,
            ..Self::default()
        }
    }
}

/// One row of the products file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductRecord {
    #[serde(rename = "ProductID")]
    pub product_id: Option<String>,
    #[serde(rename = "ProductName")]
    pub product_name: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Cost")]
    pub cost: Option<String>,
}

/// Trimmed, non-empty field value.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_trims_and_drops_empty() {
        assert_eq!(present(&Some("  P001 ".into())), Some("P001"));
        assert_eq!(present(&Some("   ".into())), None);
        assert_eq!(present(&None), None);
    }

    #[test]
    fn test_product_attributes_detection() {
        let bare = RawSaleRecord::new("1", "P1", "C1", "2024-01-05", "1", "10.00");
        assert!(!bare.has_product_attributes());

        let full = bare.clone().with_product("Mouse", "Peripherals", "18.00");
        assert!(full.has_product_attributes());
    }

    #[test]
    fn test_order_into_raw() {
        let order = OrderRecord {
            order_id: Some("1001".into()),
            product_id: Some("P001".into()),
            customer_id: Some("C101".into()),
            order_date: Some("2024-01-05".into()),
            quantity: Some("2".into()),
            price: Some("15.50".into()),
        };
        let raw: RawSaleRecord = order.into();
        assert_eq!(raw.order_id.as_deref(), Some("1001"));
        assert!(raw.product_name.is_none());
    }
}
