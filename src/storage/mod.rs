//! Warehouse persistence
//!
//! The loaded star schema is stored as one JSON file per table plus a
//! manifest. Queries run against a warehouse rebuilt from this store.
//!
//! # Design Principles
//!
//! - Each load fully replaces the stored tables
//! - Checksums verified on every read
//! - Stored rows validated against the schema catalog
//! - Any failure aborts the read; nothing is partially loaded

mod checksum;
mod errors;
mod manifest;
mod snapshot;

pub use checksum::{compute_checksum, format_checksum, parse_checksum};
pub use errors::{StorageError, StorageResult};
pub use manifest::{TableEntry, WarehouseManifest, FORMAT_VERSION};
pub use snapshot::SnapshotStore;
