//! Error types for the dashboard engine.

use crate::models::Column;
use thiserror::Error;

/// Errors raised while building the catalog or computing views.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The dataset has no records, so no column has any distinct value.
    #[error("dataset is empty: no distinct values for required columns")]
    DatasetEmpty,

    /// A code that the catalog does not know for this column.
    #[error("unknown code '{code}' for column {column}")]
    UnknownCategoryCode { column: Column, code: String },

    /// Year-range bounds outside `[0, year_count - 1]` or reversed.
    #[error("invalid year range {lo}..={hi} for {year_count} indexed years")]
    InvalidSelectionRange {
        lo: usize,
        hi: usize,
        year_count: usize,
    },

    /// A top-N or ranking limit below 1.
    #[error("invalid limit {limit}: must be at least 1")]
    InvalidLimit { limit: usize },
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
