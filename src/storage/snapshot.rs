//! Warehouse snapshot store
//!
//! Layout under `<data_dir>/warehouse/`:
//! - one `<table>.json` file per star-schema table (a JSON array of rows)
//! - `manifest.json` with per-file CRC32 checksums, written last
//!
//! Every write drops and recreates the directory. Every read verifies each
//! checksum and validates every row against the schema catalog before the
//! warehouse is rebuilt.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::observability::{Event, ObservationScope};
use crate::schema::{SchemaCatalog, SchemaValidator, DIM_CUSTOMER, DIM_DATE, DIM_PRODUCT, FACT_SALES};
use crate::warehouse::{FactSales, Warehouse};

use super::checksum::{compute_checksum, format_checksum, parse_checksum};
use super::errors::{StorageError, StorageResult};
use super::manifest::{TableEntry, WarehouseManifest};

const SNAPSHOT_DIR: &str = "warehouse";
const MANIFEST_FILE: &str = "manifest.json";

/// Reads and writes warehouse snapshots in one data directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join(SNAPSHOT_DIR),
        }
    }

    /// Directory holding the table files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    /// Whether a complete snapshot exists
    pub fn exists(&self) -> bool {
        self.manifest_path().exists()
    }

    /// Replaces any stored snapshot with `warehouse`.
    pub fn write(&self, warehouse: &Warehouse, load_id: Uuid) -> StorageResult<WarehouseManifest> {
        let scope = ObservationScope::new("SNAPSHOT_WRITE");
        match self.write_snapshot(warehouse, load_id) {
            Ok(manifest) => {
                scope.complete();
                Ok(manifest)
            }
            Err(err) => {
                scope.fail(&err.to_string());
                Err(err)
            }
        }
    }

    /// Reads the manifest without touching table files.
    pub fn manifest(&self) -> StorageResult<WarehouseManifest> {
        WarehouseManifest::read_from_file(&self.manifest_path())
    }

    /// Verifies every table checksum and returns the manifest.
    pub fn verify(&self) -> StorageResult<WarehouseManifest> {
        let manifest = self.manifest()?;
        for table in manifest.tables.keys() {
            self.read_verified(&manifest, table)?;
        }
        Ok(manifest)
    }

    /// Reads, verifies and validates the stored tables and rebuilds the warehouse.
    ///
    /// Every fact must carry the revenue derived from its quantity and price.
    pub fn read(&self, catalog: &SchemaCatalog) -> StorageResult<(Warehouse, WarehouseManifest)> {
        let scope = ObservationScope::new("SNAPSHOT_READ");
        match self.read_snapshot(catalog) {
            Ok(loaded) => {
                scope.complete();
                Ok(loaded)
            }
            Err(StorageError::NotFound(path)) => {
                // Nothing stored yet
                scope.complete();
                Err(StorageError::NotFound(path))
            }
            Err(err) => {
                scope.fail(&err.to_string());
                Err(err)
            }
        }
    }

    fn write_snapshot(&self, warehouse: &Warehouse, load_id: Uuid) -> StorageResult<WarehouseManifest> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;
        }
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;

        let products: Vec<_> = warehouse.products().collect();
        let dates: Vec<_> = warehouse.dates().collect();
        let customers: Vec<_> = warehouse.customers().collect();

        let mut tables = BTreeMap::new();
        tables.insert(DIM_PRODUCT.to_string(), self.write_table(DIM_PRODUCT, &products)?);
        tables.insert(DIM_DATE.to_string(), self.write_table(DIM_DATE, &dates)?);
        tables.insert(DIM_CUSTOMER.to_string(), self.write_table(DIM_CUSTOMER, &customers)?);
        tables.insert(FACT_SALES.to_string(), self.write_table(FACT_SALES, warehouse.facts())?);

        let manifest = WarehouseManifest::new(load_id, tables);
        manifest.write_to_file(&self.manifest_path())?;

        tracing::info!(
            event = %Event::SnapshotWritten,
            load_id = %load_id,
            dir = %self.dir.display(),
            fact_rows = warehouse.facts().len(),
        );

        Ok(manifest)
    }

    fn read_snapshot(&self, catalog: &SchemaCatalog) -> StorageResult<(Warehouse, WarehouseManifest)> {
        let manifest = self.manifest()?;
        let validator = SchemaValidator::new(catalog);

        let products = self.read_table(&manifest, DIM_PRODUCT, &validator)?;
        let dates = self.read_table(&manifest, DIM_DATE, &validator)?;
        let customers = self.read_table(&manifest, DIM_CUSTOMER, &validator)?;
        let facts: Vec<FactSales> = self.read_table(&manifest, FACT_SALES, &validator)?;

        if let Some(fact) = facts.iter().find(|fact| !fact.revenue_consistent()) {
            return Err(StorageError::Inconsistent(format!(
                "fact {} stores revenue {} for {} x {}",
                fact.order_id, fact.revenue, fact.quantity, fact.price
            )));
        }

        let warehouse = Warehouse::from_tables(products, dates, customers, facts)
            .map_err(|e| StorageError::Inconsistent(e.to_string()))?;

        tracing::info!(
            event = %Event::SnapshotLoaded,
            load_id = %manifest.load_id,
            fact_rows = warehouse.facts().len(),
        );

        Ok((warehouse, manifest))
    }

    fn write_table<T: Serialize>(&self, table: &str, rows: &[T]) -> StorageResult<TableEntry> {
        let file = format!("{}.json", table);
        let path = self.dir.join(&file);

        let bytes = serde_json::to_vec_pretty(rows).map_err(|e| StorageError::json(&path, e))?;

        let mut handle = File::create(&path).map_err(|e| StorageError::io(&path, e))?;
        handle.write_all(&bytes).map_err(|e| StorageError::io(&path, e))?;
        handle.sync_all().map_err(|e| StorageError::io(&path, e))?;

        Ok(TableEntry {
            file,
            checksum: format_checksum(compute_checksum(&bytes)),
            rows: rows.len(),
        })
    }

    fn read_verified(&self, manifest: &WarehouseManifest, table: &str) -> StorageResult<Vec<u8>> {
        let entry = manifest.table(table)?;
        let path = self.dir.join(&entry.file);
        let bytes = fs::read(&path).map_err(|e| StorageError::io(&path, e))?;

        let expected = parse_checksum(&entry.checksum).ok_or_else(|| {
            StorageError::Inconsistent(format!("malformed checksum '{}' for {}", entry.checksum, table))
        })?;
        let actual = compute_checksum(&bytes);
        if actual != expected {
            let actual = format_checksum(actual);
            tracing::error!(
                event = %Event::SnapshotChecksumMismatch,
                table,
                expected = %entry.checksum,
                actual = %actual,
            );
            return Err(StorageError::ChecksumMismatch {
                table: table.to_string(),
                expected: entry.checksum.clone(),
                actual,
            });
        }
        Ok(bytes)
    }

    fn read_table<T: DeserializeOwned>(
        &self,
        manifest: &WarehouseManifest,
        table: &str,
        validator: &SchemaValidator<'_>,
    ) -> StorageResult<Vec<T>> {
        let bytes = self.read_verified(manifest, table)?;
        let path = self.dir.join(&manifest.table(table)?.file);

        let rows: Vec<Value> = serde_json::from_slice(&bytes).map_err(|e| StorageError::json(&path, e))?;
        validator.validate_rows(table, &rows)?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| StorageError::json(&path, e)))
            .collect()
    }
}
