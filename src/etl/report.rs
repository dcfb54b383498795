//! Load report
//!
//! Everything the loader learned about one batch: what was accepted, what
//! was rejected and why, which product attributes drifted, and the
//! post-load integrity counts.

use serde::Serialize;
use uuid::Uuid;

use crate::warehouse::{DimProduct, IntegrityReport, TableCounts};

use super::errors::LoadError;

/// A source record excluded from the warehouse
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    /// 1-based position in the input sequence
    pub position: usize,
    /// OrderID, when the record carried one
    pub order_id: Option<String>,
    pub error: LoadError,
}

/// A product seen again with attributes differing from the stored row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeConflict {
    /// 1-based position of the later, conflicting record
    pub position: usize,
    pub product_id: String,
    /// Attribute names that differ, in column order
    pub differing: Vec<&'static str>,
    /// The first-seen row, still stored
    pub kept: DimProduct,
    /// The attributes carried by the later record
    pub ignored: DimProduct,
}

impl AttributeConflict {
    pub fn to_error(&self) -> LoadError {
        LoadError::attribute_conflict(&self.product_id, &self.differing)
    }
}

/// Outcome of one load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub load_id: Uuid,
    pub records_seen: usize,
    pub facts_loaded: usize,
    pub rejected: Vec<RejectedRecord>,
    pub conflicts: Vec<AttributeConflict>,
    pub integrity: IntegrityReport,
    pub counts: TableCounts,
}

impl LoadReport {
    pub(crate) fn new(load_id: Uuid) -> Self {
        Self {
            load_id,
            records_seen: 0,
            facts_loaded: 0,
            rejected: Vec::new(),
            conflicts: Vec::new(),
            integrity: IntegrityReport::default(),
            counts: TableCounts::default(),
        }
    }

    /// No rejections, no conflicts, no orphans
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.conflicts.is_empty() && self.integrity.is_clean()
    }

    /// One referential-violation error per relationship with orphans
    pub fn violations(&self) -> Vec<LoadError> {
        self.integrity
            .checks()
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(label, count)| LoadError::referential_violation(label, *count))
            .collect()
    }

    /// Every reported error in order: rejections, conflicts, violations
    pub fn errors(&self) -> Vec<LoadError> {
        self.rejected
            .iter()
            .map(|r| r.error.clone())
            .chain(self.conflicts.iter().map(AttributeConflict::to_error))
            .chain(self.violations())
            .collect()
    }
}
