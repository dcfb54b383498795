//! CSV source readers
//!
//! Two layouts are accepted:
//! - a flat sales file carrying order and product columns on every row
//! - an orders file plus a products file, left-joined on `ProductID`
//!
//! A row the CSV decoder cannot read becomes `SourceRow::Unreadable` so the
//! loader can reject it individually. Only file-level failures are errors.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::observability::Event;

use super::record::{present, OrderRecord, ProductRecord, RawSaleRecord};

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// File-level source errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One row as delivered to the loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRow {
    Record(RawSaleRecord),
    Unreadable { reason: String },
}

impl From<RawSaleRecord> for SourceRow {
    fn from(record: RawSaleRecord) -> Self {
        SourceRow::Record(record)
    }
}

/// Reads a flat sales file.
pub fn read_sales_file(path: &Path) -> SourceResult<Vec<SourceRow>> {
    Ok(read_rows::<RawSaleRecord>(path)?
        .into_iter()
        .map(|row| match row {
            Ok(record) => SourceRow::Record(record),
            Err(reason) => SourceRow::Unreadable { reason },
        })
        .collect())
}

/// Reads an orders file and enriches each order with its product row.
///
/// Orders whose product is absent from the products file keep only the
/// `ProductID` reference. Duplicate product rows keep the first occurrence.
pub fn read_orders_and_products(orders: &Path, products: &Path) -> SourceResult<Vec<SourceRow>> {
    let mut catalog: BTreeMap<String, ProductRecord> = BTreeMap::new();
    for (line, row) in read_rows::<ProductRecord>(products)?.into_iter().enumerate() {
        match row {
            Ok(product) => {
                if let Some(id) = present(&product.product_id).map(str::to_string) {
                    catalog.entry(id).or_insert(product);
                }
            }
            Err(reason) => {
                tracing::warn!(
                    event = %Event::ProductRowUnreadable,
                    file = %products.display(),
                    row = line + 1,
                    %reason,
                );
            }
        }
    }

    Ok(read_rows::<OrderRecord>(orders)?
        .into_iter()
        .map(|row| match row {
            Ok(order) => {
                let product = present(&order.product_id).and_then(|id| catalog.get(id)).cloned();
                let record = RawSaleRecord::from(order);
                match product {
                    Some(product) => SourceRow::Record(record.with_product_row(&product)),
                    None => SourceRow::Record(record),
                }
            }
            Err(reason) => SourceRow::Unreadable { reason },
        })
        .collect())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> SourceResult<Vec<Result<T, String>>> {
    if !path.exists() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| SourceError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(reader
        .deserialize::<T>()
        .map(|row| row.map_err(|e| e.to_string()))
        .collect())
}

const SAMPLE_ORDERS: &str = "\
OrderID,ProductID,CustomerID,OrderDate,Quantity,Price
1001,P001,C101,2024-01-05,2,15.50
1002,P002,C102,2024-01-05,1,25.00
1003,P001,C103,2024-01-06,3,15.50
1004,P003,C101,2024-01-07,1,50.00
1005,P002,C104,2024-01-08,2,25.00
1006,P004,C105,2024-01-08,1,120.00
1007,P001,C102,2024-01-09,1,15.50
";

const SAMPLE_PRODUCTS: &str = "\
ProductID,ProductName,Category,Cost
P001,Keyboard,Peripherals,10.00
P002,Mouse,Peripherals,18.00
P003,Monitor,Displays,40.00
P004,Webcam,Peripherals,80.00
";

/// Writes the sample `orders.csv` and `products.csv` into `dir`.
///
/// Returns the (orders, products) paths.
pub fn write_sample_data(dir: &Path) -> SourceResult<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).map_err(|source| SourceError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let orders = dir.join("orders.csv");
    let products = dir.join("products.csv");

    for (path, content) in [(&orders, SAMPLE_ORDERS), (&products, SAMPLE_PRODUCTS)] {
        fs::write(path, content).map_err(|source| SourceError::Write {
            path: path.clone(),
            source,
        })?;
    }

    Ok((orders, products))
}
