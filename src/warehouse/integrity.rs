//! Referential-integrity check
//!
//! Left-joins every fact foreign key against its dimension and counts the
//! fact rows with no matching dimension row. A clean load reports zero for
//! all three relationships.

use serde::Serialize;

use super::warehouse::Warehouse;

/// Label of the product relationship check
pub const MISSING_PRODUCT: &str = "Missing Product References";
/// Label of the date relationship check
pub const MISSING_DATE: &str = "Missing Date References";
/// Label of the customer relationship check
pub const MISSING_CUSTOMER: &str = "Missing Customer References";

/// Orphaned fact rows per foreign-key relationship
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub missing_product_refs: u64,
    pub missing_date_refs: u64,
    pub missing_customer_refs: u64,
}

impl IntegrityReport {
    /// Runs the check over every fact row.
    pub fn check(warehouse: &Warehouse) -> Self {
        let mut report = Self::default();
        for sale in warehouse.sales() {
            if sale.product.is_none() {
                report.missing_product_refs += 1;
            }
            if sale.date.is_none() {
                report.missing_date_refs += 1;
            }
            if sale.customer.is_none() {
                report.missing_customer_refs += 1;
            }
        }
        report
    }

    /// Labelled counts in the fixed order product, date, customer.
    pub fn checks(&self) -> [(&'static str, u64); 3] {
        [
            (MISSING_PRODUCT, self.missing_product_refs),
            (MISSING_DATE, self.missing_date_refs),
            (MISSING_CUSTOMER, self.missing_customer_refs),
        ]
    }

    pub fn total(&self) -> u64 {
        self.missing_product_refs + self.missing_date_refs + self.missing_customer_refs
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}
