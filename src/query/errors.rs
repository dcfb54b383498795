//! Query error types

use thiserror::Error;

use super::kind::QueryKind;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Unknown query '{name}', expected one of: {expected}")]
    UnknownQuery { name: String, expected: String },

    #[error("Decimal overflow while aggregating {query}")]
    Overflow { query: &'static str },

    #[error("Failed to encode rows of {query}: {source}")]
    Encode {
        query: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl QueryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::UnknownQuery { .. } => "DW_UNKNOWN_QUERY",
            QueryError::Overflow { .. } => "DW_QUERY_OVERFLOW",
            QueryError::Encode { .. } => "DW_QUERY_ENCODE",
        }
    }

    pub(crate) fn overflow(kind: QueryKind) -> Self {
        QueryError::Overflow { query: kind.name() }
    }
}
