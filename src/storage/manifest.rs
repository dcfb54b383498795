//! Warehouse snapshot manifest
//!
//! The manifest is the authoritative descriptor of the stored tables and is
//! written last, so a snapshot without one is incomplete.
//!
//! Format:
//! ```json
//! {
//!   "load_id": "6f1c...",
//!   "created_at": "2026-02-04T11:30:00Z",
//!   "tables": {
//!     "fact_sales": { "file": "fact_sales.json", "checksum": "crc32:deadbeef", "rows": 7 }
//!   },
//!   "format_version": 1
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{StorageError, StorageResult};

/// Current manifest format version
pub const FORMAT_VERSION: u8 = 1;

/// One stored table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableEntry {
    /// File name relative to the snapshot directory
    pub file: String,
    /// `crc32:xxxxxxxx` of the file bytes
    pub checksum: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarehouseManifest {
    /// Id of the load that produced the tables
    pub load_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Table name -> entry
    pub tables: BTreeMap<String, TableEntry>,
    pub format_version: u8,
}

impl WarehouseManifest {
    pub fn new(load_id: Uuid, tables: BTreeMap<String, TableEntry>) -> Self {
        Self {
            load_id,
            created_at: Utc::now(),
            tables,
            format_version: FORMAT_VERSION,
        }
    }

    pub fn table(&self, name: &str) -> StorageResult<&TableEntry> {
        self.tables
            .get(name)
            .ok_or_else(|| StorageError::MissingTable(name.to_string()))
    }

    /// Writes the manifest as pretty-printed JSON and fsyncs it.
    pub fn write_to_file(&self, path: &Path) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| StorageError::json(path, e))?;

        let mut file = File::create(path).map_err(|e| StorageError::io(path, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| StorageError::io(path, e))?;
        file.sync_all().map_err(|e| StorageError::io(path, e))?;

        Ok(())
    }

    pub fn read_from_file(path: &Path) -> StorageResult<Self> {
        if !path.exists() {
            let dir = path.parent().unwrap_or(path);
            return Err(StorageError::NotFound(dir.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        let manifest: Self =
            serde_json::from_str(&content).map_err(|e| StorageError::json(path, e))?;

        if manifest.format_version != FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion(manifest.format_version));
        }
        Ok(manifest)
    }
}
