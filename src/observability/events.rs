//! Observable events for salesdw
//!
//! Every log line carries one of these names in its `event` field.
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Schema catalog loaded or written
    SchemasLoaded,
    /// Sample source files written
    SampleDataWritten,

    // Load
    /// Source file read
    SourceRead,
    /// Products file row skipped
    ProductRowUnreadable,
    /// Record rejected as malformed
    RecordRejected,
    /// Product seen again with different attributes
    AttributeConflict,
    /// Orphaned fact rows found for one relationship
    ReferentialViolation,
    /// Post-load integrity check finished
    IntegrityCheckComplete,

    // Snapshot
    /// Tables and manifest written
    SnapshotWritten,
    /// Tables read and verified
    SnapshotLoaded,
    /// Stored table does not match its manifest checksum
    SnapshotChecksumMismatch,

    // Query
    /// Query executed
    QueryExecuted,
    /// Unknown query name
    QueryRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SampleDataWritten => "SAMPLE_DATA_WRITTEN",

            Event::SourceRead => "SOURCE_READ",
            Event::ProductRowUnreadable => "PRODUCT_ROW_UNREADABLE",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::AttributeConflict => "ATTRIBUTE_CONFLICT",
            Event::ReferentialViolation => "REFERENTIAL_VIOLATION",
            Event::IntegrityCheckComplete => "INTEGRITY_CHECK_COMPLETE",

            Event::SnapshotWritten => "SNAPSHOT_WRITTEN",
            Event::SnapshotLoaded => "SNAPSHOT_LOADED",
            Event::SnapshotChecksumMismatch => "SNAPSHOT_CHECKSUM_MISMATCH",

            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryRejected => "QUERY_REJECTED",
        }
    }

    /// Returns true if the event reports a problem with the data
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::RecordRejected
                | Event::ProductRowUnreadable
                | Event::AttributeConflict
                | Event::ReferentialViolation
                | Event::SnapshotChecksumMismatch
                | Event::QueryRejected
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
