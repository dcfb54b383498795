//! Storage error types
//!
//! Every variant aborts the read or write that raised it. A checksum
//! mismatch means the stored tables can no longer be trusted and must be
//! reloaded from source.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No warehouse snapshot at {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O failure at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Checksum mismatch for {table}: manifest has {expected}, file has {actual}")]
    ChecksumMismatch {
        table: String,
        expected: String,
        actual: String,
    },

    #[error("Table {0} is not listed in the manifest")]
    MissingTable(String),

    #[error("Unsupported snapshot format version {0}")]
    UnsupportedVersion(u8),

    #[error("Stored rows failed validation: {0}")]
    Schema(#[from] SchemaError),

    #[error("Stored tables are inconsistent: {0}")]
    Inconsistent(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StorageError::Json {
            path: path.into(),
            source,
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::NotFound(_) => "DW_STORAGE_NOT_FOUND",
            StorageError::Io { .. } => "DW_STORAGE_IO",
            StorageError::Json { .. } => "DW_STORAGE_MALFORMED",
            StorageError::ChecksumMismatch { .. } => "DW_STORAGE_CHECKSUM_MISMATCH",
            StorageError::MissingTable(_) => "DW_STORAGE_MISSING_TABLE",
            StorageError::UnsupportedVersion(_) => "DW_STORAGE_UNSUPPORTED_VERSION",
            StorageError::Schema(_) => "DW_STORAGE_INVALID_ROW",
            StorageError::Inconsistent(_) => "DW_STORAGE_INCONSISTENT",
        }
    }

    /// Whether the stored data itself is damaged, as opposed to missing or unreadable
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            StorageError::ChecksumMismatch { .. }
                | StorageError::Json { .. }
                | StorageError::Schema(_)
                | StorageError::Inconsistent(_)
        )
    }
}
