//! Selection state: one atomic snapshot of every control value.

use crate::catalog::CategoryCatalog;
use crate::error::{EngineError, Result};
use crate::models::Column;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Inclusive bounds into the year index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub lo: usize,
    pub hi: usize,
}

impl YearRange {
    pub fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }
}

/// Snapshot of all control values.
///
/// A selection is replaced wholesale on every control change: the `with_*`
/// helpers return a new value and leave the receiver untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionState {
    /// Year-range slider bounds.
    pub year_range: YearRange,
    /// Allowed codes per filtered column. Columns absent from the map are not filtered.
    pub categorical_filters: BTreeMap<Column, BTreeSet<String>>,
    /// Top-N slider value.
    pub top_n: usize,
}

impl SelectionState {
    /// Full year range, every category selected, the given top-N.
    pub fn defaults(catalog: &CategoryCatalog, top_n: usize) -> Self {
        Self {
            year_range: YearRange::new(0, catalog.years().len().saturating_sub(1)),
            categorical_filters: catalog.all_selected(),
            top_n,
        }
    }

    pub fn with_year_range(&self, lo: usize, hi: usize) -> Self {
        Self {
            year_range: YearRange::new(lo, hi),
            ..self.clone()
        }
    }

    /// Replace the allowed set of one column.
    pub fn with_filter<I, S>(&self, column: Column, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.categorical_filters
            .insert(column, codes.into_iter().map(Into::into).collect());
        next
    }

    /// Drop the filter on one column entirely.
    pub fn without_filter(&self, column: Column) -> Self {
        let mut next = self.clone();
        next.categorical_filters.remove(&column);
        next
    }

    pub fn with_top_n(&self, top_n: usize) -> Self {
        Self {
            top_n,
            ..self.clone()
        }
    }

    /// Keeps only the filters on the given columns. The year range and top-N
    /// are carried over.
    pub fn restricted_to(&self, columns: &[Column]) -> Self {
        Self {
            year_range: self.year_range,
            categorical_filters: self
                .categorical_filters
                .iter()
                .filter(|(column, _)| columns.contains(column))
                .map(|(column, codes)| (*column, codes.clone()))
                .collect(),
            top_n: self.top_n,
        }
    }

    /// Check the selection against the catalog.
    ///
    /// Range and limit violations are errors. Unknown filter codes are not:
    /// they simply match nothing.
    pub fn validate(&self, catalog: &CategoryCatalog) -> Result<()> {
        let year_count = catalog.years().len();
        let YearRange { lo, hi } = self.year_range;
        if lo > hi || hi >= year_count {
            return Err(EngineError::InvalidSelectionRange { lo, hi, year_count });
        }

        if self.top_n < 1 {
            return Err(EngineError::InvalidLimit { limit: self.top_n });
        }

        for (column, codes) in &self.categorical_filters {
            for code in codes.iter().filter(|c| !catalog.contains(*column, c)) {
                debug!("Selection references unknown code '{}' for {}", code, column);
            }
        }

        Ok(())
    }
}
