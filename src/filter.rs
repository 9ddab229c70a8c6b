//! Filter engine: the shared row-subset primitive every aggregation builds on.

use crate::catalog::CategoryCatalog;
use crate::error::Result;
use crate::models::{Dataset, Record};
use crate::selection::SelectionState;
use tracing::debug;

/// Ordered subset of dataset records matching a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    rows: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    /// Wraps already-selected rows.
    pub fn from_rows(rows: Vec<&'a Record>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().copied()
    }

    /// Salary values in row order.
    pub fn salaries(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.salary_usd).collect()
    }
}

/// Select the records matching `selection`.
///
/// The year range is decoded to its set of work years through the catalog's
/// year index; inclusion is by index span, not by calendar comparison. Every
/// categorical filter present in the selection must then accept the record's
/// code. An empty allowed set rejects every record. Input order is preserved.
pub fn filter<'a>(
    dataset: &'a Dataset,
    catalog: &CategoryCatalog,
    selection: &SelectionState,
) -> Result<FilteredView<'a>> {
    selection.validate(catalog)?;

    let years = catalog
        .years()
        .span(selection.year_range.lo, selection.year_range.hi)?;

    let rows: Vec<&Record> = dataset
        .records()
        .iter()
        .filter(|record| years.contains(&record.work_year))
        .filter(|record| {
            selection
                .categorical_filters
                .iter()
                .all(|(column, allowed)| allowed.contains(&*record.code(*column)))
        })
        .collect();

    debug!(
        "Filtered {} of {} records (years {}..={}, {} filters)",
        rows.len(),
        dataset.len(),
        selection.year_range.lo,
        selection.year_range.hi,
        selection.categorical_filters.len()
    );

    Ok(FilteredView::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::fixtures::{record, six_records};
    use crate::models::Column;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_default_selection_keeps_everything() {
        let ds = six_records();
        let catalog = CategoryCatalog::build(&ds).unwrap();
        let selection = SelectionState::defaults(&catalog, 25);

        let view = filter(&ds, &catalog, &selection).unwrap();
        assert_eq!(view.len(), ds.len());
    }

    #[test]
    fn test_year_and_size_filter() {
        let ds = six_records();
        let catalog = CategoryCatalog::build(&ds).unwrap();
        let selection = SelectionState::defaults(&catalog, 25)
            .with_year_range(0, 1)
            .with_filter(Column::CompanySize, ["M", "L"]);

        let view = filter(&ds, &catalog, &selection).unwrap();
        let salaries = view.salaries();
        // 2020 M, 2021 L, 2021 M in input order
        assert_eq!(salaries, vec![110000.0, 95000.0, 180000.0]);
    }

    #[test]
    fn test_year_span_uses_index_order() {
        let ds = Dataset::new(vec![
            record(2022, "SE", "M", "US", 0, "A", 1.0),
            record(2020, "SE", "M", "US", 0, "A", 2.0),
            record(2021, "SE", "M", "US", 0, "A", 3.0),
        ]);
        let catalog = CategoryCatalog::build(&ds).unwrap();
        // First-seen indices: 0 -> 2022, 1 -> 2020, 2 -> 2021
        let selection = SelectionState::defaults(&catalog, 1).with_year_range(0, 1);

        let view = filter(&ds, &catalog, &selection).unwrap();
        assert_eq!(view.salaries(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_empty_allowed_set_excludes_all() {
        let ds = six_records();
        let catalog = CategoryCatalog::build(&ds).unwrap();
        let selection = SelectionState::defaults(&catalog, 25)
            .with_filter(Column::ExperienceLevel, Vec::<String>::new());

        let view = filter(&ds, &catalog, &selection).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn test_unknown_code_matches_nothing() {
        let ds = six_records();
        let catalog = CategoryCatalog::build(&ds).unwrap();
        let selection =
            SelectionState::defaults(&catalog, 25).with_filter(Column::CompanySize, ["XL", "S"]);

        let view = filter(&ds, &catalog, &selection).unwrap();
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_invalid_selection_is_reported() {
        let ds = six_records();
        let catalog = CategoryCatalog::build(&ds).unwrap();
        let selection = SelectionState::defaults(&catalog, 25).with_year_range(1, 5);

        assert_eq!(
            filter(&ds, &catalog, &selection).unwrap_err(),
            EngineError::InvalidSelectionRange {
                lo: 1,
                hi: 5,
                year_count: 3
            }
        );
    }

    fn subset_of(codes: &[String], mask: u8) -> BTreeSet<String> {
        codes
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, c)| c.clone())
            .collect()
    }

    proptest! {
        #[test]
        fn prop_filter_is_monotonic(
            lo in 0usize..3,
            inner_len in 0usize..3,
            widen_lo in 0usize..3,
            widen_hi in 0usize..3,
            inner_mask in 0u8..8,
            extra_mask in 0u8..8,
        ) {
            let ds = six_records();
            let catalog = CategoryCatalog::build(&ds).unwrap();
            let hi = (lo + inner_len).min(2);
            let sizes = catalog.distinct(Column::CompanySize).to_vec();

            let inner_sizes = subset_of(&sizes, inner_mask);
            let outer_sizes = subset_of(&sizes, inner_mask | extra_mask);

            let s1 = SelectionState::defaults(&catalog, 5)
                .with_year_range(lo, hi)
                .with_filter(Column::CompanySize, inner_sizes);
            let s2 = SelectionState::defaults(&catalog, 5)
                .with_year_range(lo.saturating_sub(widen_lo), (hi + widen_hi).min(2))
                .with_filter(Column::CompanySize, outer_sizes);

            let small = filter(&ds, &catalog, &s1).unwrap();
            let large = filter(&ds, &catalog, &s2).unwrap();
            prop_assert!(small.len() <= large.len());
        }

        #[test]
        fn prop_filter_is_idempotent(lo in 0usize..3, span in 0usize..3, mask in 0u8..8) {
            let ds = six_records();
            let catalog = CategoryCatalog::build(&ds).unwrap();
            let sizes = catalog.distinct(Column::CompanySize).to_vec();
            let selection = SelectionState::defaults(&catalog, 5)
                .with_year_range(lo, (lo + span).min(2))
                .with_filter(Column::CompanySize, subset_of(&sizes, mask));

            let first = filter(&ds, &catalog, &selection).unwrap();
            let second = filter(&ds, &catalog, &selection).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
