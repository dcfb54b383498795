//! Star-schema loader
//!
//! For each source record, in input order:
//! 1. Validate every field; a bad record is rejected before it touches
//!    any table
//! 2. Upsert the product (first-seen attributes win)
//! 3. Upsert the date and the customer
//! 4. Append the fact with `revenue = round(quantity * price, 2)`
//!
//! After the batch the referential-integrity check runs over the whole
//! warehouse. No record-level error stops the batch.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::observability::{Event, ObservationScope};
use crate::warehouse::{
    date_key, DimProduct, FactSales, IntegrityReport, ProductUpsert, Warehouse, DATE_KEY_FORMAT,
};

use super::errors::LoadError;
use super::record::{present, RawSaleRecord};
use super::report::{AttributeConflict, LoadReport, RejectedRecord};
use super::source::SourceRow;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// A record whose fields all parsed
#[derive(Debug, Clone, PartialEq)]
struct ValidSale {
    fact: FactSales,
    product: Option<DimProduct>,
    date: NaiveDate,
}

/// Loads raw sale records into a warehouse
#[derive(Debug, Clone)]
pub struct Loader {
    load_id: Uuid,
}

impl Loader {
    /// Creates a loader with a fresh load id
    pub fn new() -> Self {
        Self {
            load_id: Uuid::new_v4(),
        }
    }

    pub fn with_load_id(load_id: Uuid) -> Self {
        Self { load_id }
    }

    pub fn load_id(&self) -> Uuid {
        self.load_id
    }

    /// Loads `rows` into a new, empty warehouse.
    pub fn load<I>(&self, rows: I) -> (Warehouse, LoadReport)
    where
        I: IntoIterator,
        I::Item: Into<SourceRow>,
    {
        let mut warehouse = Warehouse::new();
        let report = self.load_into(&mut warehouse, rows);
        (warehouse, report)
    }

    /// Loads `rows` into an existing warehouse.
    ///
    /// OrderIDs already present are rejected as duplicates. The integrity
    /// check and table counts cover the whole warehouse.
    pub fn load_into<I>(&self, warehouse: &mut Warehouse, rows: I) -> LoadReport
    where
        I: IntoIterator,
        I::Item: Into<SourceRow>,
    {
        let span = tracing::info_span!("load", load_id = %self.load_id);
        let _guard = span.enter();
        let scope = ObservationScope::new("LOAD");

        let mut report = LoadReport::new(self.load_id);

        for (index, row) in rows.into_iter().enumerate() {
            let position = index + 1;
            report.records_seen += 1;

            let record = match row.into() {
                SourceRow::Record(record) => record,
                SourceRow::Unreadable { reason } => {
                    reject(&mut report, position, None, LoadError::unreadable_row(reason));
                    continue;
                }
            };

            let order_id = present(&record.order_id).map(str::to_string);
            let sale = match validate(&record) {
                Ok(sale) => sale,
                Err(err) => {
                    reject(&mut report, position, order_id, err);
                    continue;
                }
            };

            if warehouse.contains_order(&sale.fact.order_id) {
                let err = LoadError::duplicate_order(&sale.fact.order_id);
                reject(&mut report, position, order_id, err);
                continue;
            }

            if let Some(product) = sale.product {
                if let ProductUpsert::Conflict { existing, differing } =
                    warehouse.upsert_product(product.clone())
                {
                    let conflict = AttributeConflict {
                        position,
                        product_id: product.product_id.clone(),
                        differing,
                        kept: existing,
                        ignored: product,
                    };
                    tracing::warn!(
                        event = %Event::AttributeConflict,
                        position,
                        product_id = %conflict.product_id,
                        differing = %conflict.differing.join(","),
                    );
                    report.conflicts.push(conflict);
                }
            }

            warehouse.upsert_date(sale.date);
            warehouse.upsert_customer(&sale.fact.customer_id);

            match warehouse.append_fact(sale.fact) {
                Ok(()) => report.facts_loaded += 1,
                Err(fact) => {
                    let err = LoadError::duplicate_order(&fact.order_id);
                    reject(&mut report, position, Some(fact.order_id), err);
                }
            }
        }

        report.integrity = IntegrityReport::check(warehouse);
        report.counts = warehouse.counts();

        for violation in report.violations() {
            tracing::warn!(
                event = %Event::ReferentialViolation,
                code = %violation.code(),
                message = %violation.message(),
            );
        }
        tracing::info!(
            event = %Event::IntegrityCheckComplete,
            missing_product_refs = report.integrity.missing_product_refs,
            missing_date_refs = report.integrity.missing_date_refs,
            missing_customer_refs = report.integrity.missing_customer_refs,
        );

        let elapsed_ms = scope.complete();
        tracing::debug!(
            records_seen = report.records_seen,
            facts_loaded = report.facts_loaded,
            rejected = report.rejected.len(),
            conflicts = report.conflicts.len(),
            elapsed_ms,
        );

        report
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn reject(report: &mut LoadReport, position: usize, order_id: Option<String>, error: LoadError) {
    tracing::warn!(
        event = %Event::RecordRejected,
        position,
        order_id = order_id.as_deref().unwrap_or(""),
        code = %error.code(),
        message = %error.message(),
    );
    report.rejected.push(RejectedRecord {
        position,
        order_id,
        error,
    });
}

fn validate(record: &RawSaleRecord) -> Result<ValidSale, LoadError> {
    let order_id = required(&record.order_id, "OrderID")?;
    let product_id = required(&record.product_id, "ProductID")?;
    let customer_id = required(&record.customer_id, "CustomerID")?;
    let date = parse_order_date(record)?;
    let quantity = parse_quantity(&record.quantity)?;
    let price = parse_amount(&record.price, "Price")?;

    let fact = FactSales::new(order_id, product_id, customer_id, date_key(date), quantity, price)
        .ok_or_else(|| {
            let raw = present(&record.price).unwrap_or_default();
            LoadError::malformed_field("Price", raw, "an amount within range")
        })?;

    let product = if record.has_product_attributes() {
        Some(DimProduct::new(
            product_id,
            required(&record.product_name, "ProductName")?,
            required(&record.category, "Category")?,
            parse_amount(&record.cost, "Cost")?,
        ))
    } else {
        None
    };

    Ok(ValidSale { fact, product, date })
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, LoadError> {
    present(field).ok_or_else(|| LoadError::missing_field(name))
}

fn parse_quantity(field: &Option<String>) -> Result<u32, LoadError> {
    let raw = required(field, "Quantity")?;
    let value: i64 = raw
        .parse()
        .map_err(|_| LoadError::malformed_field("Quantity", raw, "an integer"))?;
    if value < 0 {
        return Err(LoadError::negative_value("Quantity", raw));
    }
    u32::try_from(value).map_err(|_| LoadError::malformed_field("Quantity", raw, "an integer in range"))
}

fn parse_amount(field: &Option<String>, name: &str) -> Result<Decimal, LoadError> {
    let raw = required(field, name)?;
    let value = Decimal::from_str(raw)
        .map_err(|_| LoadError::malformed_field(name, raw, "a decimal amount"))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(LoadError::negative_value(name, raw));
    }
    Ok(value)
}

/// Reads the order date from `OrderDate`, or from `Year`/`Month`/`Day`
/// when no date string is present.
fn parse_order_date(record: &RawSaleRecord) -> Result<NaiveDate, LoadError> {
    if let Some(raw) = present(&record.order_date) {
        if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_KEY_FORMAT) {
            return Ok(date);
        }
        return DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|datetime| datetime.date())
            .ok_or_else(|| LoadError::malformed_field("OrderDate", raw, "a YYYY-MM-DD date"));
    }

    let parts = [
        ("Year", present(&record.year)),
        ("Month", present(&record.month)),
        ("Day", present(&record.day)),
    ];
    if parts.iter().all(|(_, value)| value.is_none()) {
        return Err(LoadError::missing_field("OrderDate"));
    }

    let mut numbers = [0i64; 3];
    for (slot, (name, value)) in numbers.iter_mut().zip(parts) {
        let raw = value.ok_or_else(|| LoadError::missing_field(name))?;
        *slot = raw
            .parse()
            .map_err(|_| LoadError::malformed_field(name, raw, "an integer"))?;
    }

    let [year, month, day] = numbers;
    let calendar = format!("{}-{}-{}", year, month, day);
    i32::try_from(year)
        .ok()
        .zip(u32::try_from(month).ok())
        .zip(u32::try_from(day).ok())
        .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d))
        .ok_or_else(|| LoadError::malformed_field("OrderDate", &calendar, "a valid calendar date"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etl::errors::LoadErrorCode;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sale(order: &str, product: &str, qty: &str, price: &str) -> RawSaleRecord {
        RawSaleRecord::new(order, product, "C1", "2024-01-05", qty, price)
            .with_product("Mouse", "Peripherals", "18.00")
    }

    #[test]
    fn test_basic_load() {
        let (wh, report) = Loader::new().load(vec![
            sale("1", "P1", "2", "10.00"),
            sale("2", "P1", "1", "10.00"),
        ]);

        assert!(report.is_clean());
        assert_eq!(report.records_seen, 2);
        assert_eq!(report.facts_loaded, 2);
        assert_eq!(wh.counts().dim_product, 1);
        assert_eq!(wh.counts().dim_date, 1);
        assert_eq!(wh.counts().dim_customer, 1);

        let total: Decimal = wh.facts().iter().map(|f| f.revenue).sum();
        assert_eq!(total, dec("30.00"));
    }

    #[test]
    fn test_negative_quantity_rejected_without_side_effects() {
        let bad = RawSaleRecord::new("9", "P9", "C9", "2024-02-01", "-1", "5.00")
            .with_product("Cable", "Accessories", "1.00");
        let (wh, report) = Loader::new().load(vec![sale("1", "P1", "1", "10.00"), bad]);

        assert_eq!(report.facts_loaded, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].position, 2);
        assert_eq!(report.rejected[0].order_id.as_deref(), Some("9"));
        assert_eq!(report.rejected[0].error.field(), Some("Quantity"));

        // Nothing from the rejected record reached a dimension
        assert!(wh.product("P9").is_none());
        assert!(wh.customer("C9").is_none());
        assert!(wh.date("2024-02-01").is_none());
    }

    #[test]
    fn test_malformed_fields() {
        let cases = vec![
            (RawSaleRecord::new("", "P1", "C1", "2024-01-05", "1", "1.00"), "OrderID"),
            (RawSaleRecord::new("1", "P1", " ", "2024-01-05", "1", "1.00"), "CustomerID"),
            (RawSaleRecord::new("1", "P1", "C1", "2024-13-05", "1", "1.00"), "OrderDate"),
            (RawSaleRecord::new("1", "P1", "C1", "2024-01-05", "two", "1.00"), "Quantity"),
            (RawSaleRecord::new("1", "P1", "C1", "2024-01-05", "1.5", "1.00"), "Quantity"),
            (RawSaleRecord::new("1", "P1", "C1", "2024-01-05", "1", "abc"), "Price"),
            (RawSaleRecord::new("1", "P1", "C1", "2024-01-05", "1", "-0.01"), "Price"),
            (
                RawSaleRecord::new("1", "P1", "C1", "2024-01-05", "1", "1.00")
                    .with_product("Mouse", "Peripherals", "-3"),
                "Cost",
            ),
            (
                RawSaleRecord::new("1", "P1", "C1", "2024-01-05", "1", "1.00")
                    .with_product("", "Peripherals", "3"),
                "ProductName",
            ),
        ];

        for (record, field) in cases {
            let (wh, report) = Loader::new().load(vec![record]);
            assert_eq!(report.rejected.len(), 1, "expected rejection on {}", field);
            assert_eq!(report.rejected[0].error.field(), Some(field));
            assert_eq!(report.rejected[0].error.code(), LoadErrorCode::DwMalformedRecord);
            assert!(wh.is_empty());
        }
    }

    #[test]
    fn test_duplicate_order_rejected() {
        let (wh, report) = Loader::new().load(vec![
            sale("1", "P1", "1", "10.00"),
            sale("1", "P1", "5", "10.00"),
        ]);

        assert_eq!(wh.facts().len(), 1);
        assert_eq!(wh.facts()[0].quantity, 1);
        assert_eq!(report.rejected.len(), 1);
        assert!(report.rejected[0].error.message().contains("duplicate OrderID"));
    }

    #[test]
    fn test_attribute_conflict_keeps_first_seen() {
        let drifted = RawSaleRecord::new("2", "P1", "C1", "2024-01-06", "1", "10.00")
            .with_product("Mouse", "Accessories", "18.00");
        let (wh, report) = Loader::new().load(vec![sale("1", "P1", "1", "10.00"), drifted]);

        assert_eq!(report.facts_loaded, 2);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].position, 2);
        assert_eq!(report.conflicts[0].differing, vec!["category"]);
        assert_eq!(report.conflicts[0].kept.category, "Peripherals");
        assert_eq!(wh.product("P1").unwrap().category, "Peripherals");
        assert!(!report.is_clean());
    }

    #[test]
    fn test_reference_only_product_is_orphan() {
        let bare = RawSaleRecord::new("1", "P404", "C1", "2024-01-05", "1", "9.99");
        let (wh, report) = Loader::new().load(vec![bare]);

        assert_eq!(report.facts_loaded, 1);
        assert!(wh.product("P404").is_none());
        assert_eq!(report.integrity.missing_product_refs, 1);
        assert_eq!(report.violations().len(), 1);
        assert_eq!(report.violations()[0].code(), LoadErrorCode::DwReferentialViolation);
    }

    #[test]
    fn test_unreadable_row_rejected() {
        let rows = vec![
            SourceRow::from(sale("1", "P1", "1", "10.00")),
            SourceRow::Unreadable {
                reason: "found record with 3 fields".into(),
            },
        ];
        let (_, report) = Loader::new().load(rows);

        assert_eq!(report.records_seen, 2);
        assert_eq!(report.rejected[0].position, 2);
        assert!(report.rejected[0].order_id.is_none());
    }

    #[test]
    fn test_date_with_time_part() {
        let mut record = sale("1", "P1", "1", "10.00");
        record.order_date = Some("2024-03-09 14:22:01".into());
        let (wh, report) = Loader::new().load(vec![record]);

        assert!(report.rejected.is_empty());
        assert_eq!(wh.facts()[0].date_key, "2024-03-09");
    }

    #[test]
    fn test_date_from_parts() {
        let mut record = sale("1", "P1", "1", "10.00");
        record.order_date = None;
        record.year = Some("2024".into());
        record.month = Some("2".into());
        record.day = Some("29".into());
        let (wh, _) = Loader::new().load(vec![record.clone()]);
        assert_eq!(wh.date("2024-02-29").unwrap().quarter, 1);

        record.day = Some("30".into());
        let (_, report) = Loader::new().load(vec![record.clone()]);
        assert_eq!(report.rejected[0].error.field(), Some("OrderDate"));

        record.day = None;
        let (_, report) = Loader::new().load(vec![record]);
        assert_eq!(report.rejected[0].error.field(), Some("Day"));
    }

    #[test]
    fn test_revenue_overflow_rejected() {
        let (wh, report) = Loader::new().load(vec![
            sale("1", "P1", "2", "79228162514264337593543950335"),
            sale("2", "P1", "1", "10.00"),
        ]);

        assert_eq!(report.facts_loaded, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].position, 1);
        assert_eq!(report.rejected[0].error.field(), Some("Price"));
        assert_eq!(report.rejected[0].error.code(), LoadErrorCode::DwMalformedRecord);
        assert!(!wh.contains_order("1"));

        let (wh, report) = Loader::new().load(vec![sale("1", "P1", "2", "79228162514264337593543950335")]);
        assert_eq!(report.facts_loaded, 0);
        assert!(wh.is_empty());
    }

    #[test]
    fn test_zero_quantity_and_price_accepted() {
        let (wh, report) = Loader::new().load(vec![sale("1", "P1", "0", "0")]);
        assert!(report.rejected.is_empty());
        assert_eq!(wh.facts()[0].revenue, Decimal::ZERO);
    }

    #[test]
    fn test_load_into_existing_rejects_seen_orders() {
        let loader = Loader::new();
        let (mut wh, _) = loader.load(vec![sale("1", "P1", "1", "10.00")]);
        let report = loader.load_into(&mut wh, vec![sale("1", "P1", "1", "10.00"), sale("2", "P1", "1", "10.00")]);

        assert_eq!(report.facts_loaded, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.counts.fact_sales, 2);
    }

    #[test]
    fn test_load_id_carried_into_report() {
        let id = Uuid::new_v4();
        let (_, report) = Loader::with_load_id(id).load(Vec::<RawSaleRecord>::new());
        assert_eq!(report.load_id, id);
        assert!(report.is_clean());
    }
}
