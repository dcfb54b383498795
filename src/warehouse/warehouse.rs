//! In-memory star schema
//!
//! Dimensions are keyed and ordered by their natural key so every listing is
//! deterministic. Facts keep their load order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::tables::{date_key, DimCustomer, DimDate, DimProduct, FactSales};

/// Outcome of upserting a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductUpsert {
    /// First occurrence, row inserted
    Inserted,
    /// Already present with identical attributes
    Unchanged,
    /// Already present with different attributes; the stored row is kept
    Conflict {
        existing: DimProduct,
        differing: Vec<&'static str>,
    },
}

/// A duplicate natural key found while assembling a warehouse from stored tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub table: &'static str,
    pub key: String,
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate key '{}' in {}", self.key, self.table)
    }
}

/// Row counts per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub fact_sales: usize,
    pub dim_product: usize,
    pub dim_date: usize,
    pub dim_customer: usize,
}

/// A fact joined with the dimensions it references, if present
#[derive(Debug, Clone, Copy)]
pub struct SaleView<'a> {
    pub fact: &'a FactSales,
    pub product: Option<&'a DimProduct>,
    pub date: Option<&'a DimDate>,
    pub customer: Option<&'a DimCustomer>,
}

/// The loaded warehouse: one fact table and three dimensions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Warehouse {
    products: BTreeMap<String, DimProduct>,
    dates: BTreeMap<String, DimDate>,
    customers: BTreeMap<String, DimCustomer>,
    facts: Vec<FactSales>,
    order_ids: BTreeSet<String>,
}

impl Warehouse {
    /// Creates an empty warehouse
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a warehouse from stored table rows.
    ///
    /// Fails on the first duplicate dimension key or OrderID. Foreign keys are
    /// not checked here; orphans are reported by the integrity check.
    pub fn from_tables(
        products: Vec<DimProduct>,
        dates: Vec<DimDate>,
        customers: Vec<DimCustomer>,
        facts: Vec<FactSales>,
    ) -> Result<Self, DuplicateKey> {
        let mut warehouse = Self::new();

        for product in products {
            if warehouse.products.contains_key(&product.product_id) {
                return Err(DuplicateKey {
                    table: crate::schema::DIM_PRODUCT,
                    key: product.product_id,
                });
            }
            warehouse.products.insert(product.product_id.clone(), product);
        }

        for date in dates {
            if warehouse.dates.contains_key(&date.date_key) {
                return Err(DuplicateKey {
                    table: crate::schema::DIM_DATE,
                    key: date.date_key,
                });
            }
            warehouse.dates.insert(date.date_key.clone(), date);
        }

        for customer in customers {
            if warehouse.customers.contains_key(&customer.customer_id) {
                return Err(DuplicateKey {
                    table: crate::schema::DIM_CUSTOMER,
                    key: customer.customer_id,
                });
            }
            warehouse.customers.insert(customer.customer_id.clone(), customer);
        }

        for fact in facts {
            if !warehouse.order_ids.insert(fact.order_id.clone()) {
                return Err(DuplicateKey {
                    table: crate::schema::FACT_SALES,
                    key: fact.order_id,
                });
            }
            warehouse.facts.push(fact);
        }

        Ok(warehouse)
    }

    /// Upserts a product. First-seen attributes win.
    pub fn upsert_product(&mut self, product: DimProduct) -> ProductUpsert {
        match self.products.get(&product.product_id) {
            None => {
                self.products.insert(product.product_id.clone(), product);
                ProductUpsert::Inserted
            }
            Some(existing) => {
                let differing = existing.differing_attributes(&product);
                if differing.is_empty() {
                    ProductUpsert::Unchanged
                } else {
                    ProductUpsert::Conflict {
                        existing: existing.clone(),
                        differing,
                    }
                }
            }
        }
    }

    /// Upserts the date row for `date` and returns its key.
    pub fn upsert_date(&mut self, date: NaiveDate) -> String {
        let key = date_key(date);
        self.dates
            .entry(key.clone())
            .or_insert_with(|| DimDate::from_date(date));
        key
    }

    /// Upserts a customer. Returns true if the customer was new.
    pub fn upsert_customer(&mut self, customer_id: &str) -> bool {
        if self.customers.contains_key(customer_id) {
            return false;
        }
        self.customers
            .insert(customer_id.to_string(), DimCustomer::new(customer_id));
        true
    }

    /// Appends a fact row. Returns the row back if its OrderID already exists.
    pub fn append_fact(&mut self, fact: FactSales) -> Result<(), FactSales> {
        if self.order_ids.contains(&fact.order_id) {
            return Err(fact);
        }
        self.order_ids.insert(fact.order_id.clone());
        self.facts.push(fact);
        Ok(())
    }

    pub fn contains_order(&self, order_id: &str) -> bool {
        self.order_ids.contains(order_id)
    }

    pub fn product(&self, product_id: &str) -> Option<&DimProduct> {
        self.products.get(product_id)
    }

    pub fn date(&self, date_key: &str) -> Option<&DimDate> {
        self.dates.get(date_key)
    }

    pub fn customer(&self, customer_id: &str) -> Option<&DimCustomer> {
        self.customers.get(customer_id)
    }

    /// Products ordered by ProductID
    pub fn products(&self) -> impl Iterator<Item = &DimProduct> {
        self.products.values()
    }

    /// Dates ordered by DateKey
    pub fn dates(&self) -> impl Iterator<Item = &DimDate> {
        self.dates.values()
    }

    /// Customers ordered by CustomerID
    pub fn customers(&self) -> impl Iterator<Item = &DimCustomer> {
        self.customers.values()
    }

    /// Facts in load order
    pub fn facts(&self) -> &[FactSales] {
        &self.facts
    }

    /// Every fact with its dimensions resolved (left join).
    pub fn sales(&self) -> impl Iterator<Item = SaleView<'_>> {
        self.facts.iter().map(move |fact| SaleView {
            fact,
            product: self.products.get(&fact.product_id),
            date: self.dates.get(&fact.date_key),
            customer: self.customers.get(&fact.customer_id),
        })
    }

    pub fn counts(&self) -> TableCounts {
        TableCounts {
            fact_sales: self.facts.len(),
            dim_product: self.products.len(),
            dim_date: self.dates.len(),
            dim_customer: self.customers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
            && self.products.is_empty()
            && self.dates.is_empty()
            && self.customers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn keyboard() -> DimProduct {
        DimProduct::new("P001", "Keyboard", "Peripherals", Decimal::from(10))
    }

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_product_first_seen_wins() {
        let mut wh = Warehouse::new();
        assert_eq!(wh.upsert_product(keyboard()), ProductUpsert::Inserted);
        assert_eq!(wh.upsert_product(keyboard()), ProductUpsert::Unchanged);

        let drifted = DimProduct::new("P001", "Keyboard", "Accessories", Decimal::from(10));
        match wh.upsert_product(drifted) {
            ProductUpsert::Conflict { existing, differing } => {
                assert_eq!(existing.category, "Peripherals");
                assert_eq!(differing, vec!["category"]);
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        assert_eq!(wh.product("P001").unwrap().category, "Peripherals");
        assert_eq!(wh.counts().dim_product, 1);
    }

    #[test]
    fn test_date_upsert_deduplicates() {
        let mut wh = Warehouse::new();
        assert_eq!(wh.upsert_date(jan(5)), "2024-01-05");
        assert_eq!(wh.upsert_date(jan(5)), "2024-01-05");
        wh.upsert_date(jan(6));

        assert_eq!(wh.counts().dim_date, 2);
        assert_eq!(wh.date("2024-01-05").unwrap().month_name, "January");
    }

    #[test]
    fn test_customer_upsert() {
        let mut wh = Warehouse::new();
        assert!(wh.upsert_customer("C101"));
        assert!(!wh.upsert_customer("C101"));
        assert_eq!(wh.counts().dim_customer, 1);
    }

    #[test]
    fn test_duplicate_order_returned() {
        let mut wh = Warehouse::new();
        let fact = FactSales::new("1001", "P001", "C101", "2024-01-05", 1, Decimal::from(10)).unwrap();
        assert!(wh.append_fact(fact.clone()).is_ok());
        assert_eq!(wh.append_fact(fact.clone()), Err(fact));
        assert_eq!(wh.facts().len(), 1);
        assert!(wh.contains_order("1001"));
    }

    #[test]
    fn test_sales_left_join() {
        let mut wh = Warehouse::new();
        wh.upsert_product(keyboard());
        let key = wh.upsert_date(jan(5));
        wh.append_fact(FactSales::new("1", "P001", "C1", key.clone(), 1, Decimal::from(10)).unwrap())
            .unwrap();
        wh.append_fact(FactSales::new("2", "P999", "C1", key, 1, Decimal::from(10)).unwrap())
            .unwrap();

        let views: Vec<_> = wh.sales().collect();
        assert!(views[0].product.is_some());
        assert!(views[1].product.is_none());
        assert!(views[0].date.is_some());
        assert!(views[0].customer.is_none());
    }

    #[test]
    fn test_from_tables_rejects_duplicates() {
        let result = Warehouse::from_tables(vec![keyboard(), keyboard()], vec![], vec![], vec![]);
        let err = result.unwrap_err();
        assert_eq!(err.table, "dim_product");
        assert_eq!(err.key, "P001");
    }

    #[test]
    fn test_listing_is_ordered_by_key() {
        let mut wh = Warehouse::new();
        wh.upsert_customer("C3");
        wh.upsert_customer("C1");
        wh.upsert_customer("C2");

        let ids: Vec<_> = wh.customers().map(|c| c.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2", "C3"]);
    }
}
