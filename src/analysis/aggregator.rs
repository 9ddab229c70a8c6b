//! Aggregations over a filtered view.
//!
//! Every function here is pure: it reads the view and the catalog and returns
//! a fresh view model. Grouping is always keyed by the raw code; display
//! labels are applied after the statistics are computed.

use super::stats::{five_number_summary, median};
use crate::catalog::CategoryCatalog;
use crate::error::{EngineError, Result};
use crate::filter::FilteredView;
use crate::models::Column;
use crate::view::{
    DistributionGroup, DistributionView, FrequencyBar, FrequencyBarView, RankedBar,
    RankedBarView, ShareSlice, ShareView,
};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Caller-supplied group order and labels for a distribution view.
///
/// Codes listed in `order` come first, in that order; the rest follow in
/// descending code order. Codes missing from `labels` keep their raw code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOverride {
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl OrderOverride {
    /// Descending code order, relabelled through `labels`.
    pub fn descending_code<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            order: Vec::new(),
            labels: labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        let rank = |code: &str| self.order.iter().position(|c| c == code);
        match (rank(a), rank(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.cmp(a),
        }
    }

    fn label(&self, code: String) -> String {
        self.labels.get(&code).cloned().unwrap_or(code)
    }
}

/// Group salaries by code, groups in first-occurrence order.
pub fn group_salaries(view: &FilteredView<'_>, column: Column) -> Vec<(String, Vec<f64>)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();

    for record in view.iter() {
        let code = record.code(column);
        match positions.get(&*code) {
            Some(&i) => groups[i].1.push(record.salary_usd),
            None => {
                positions.insert(code.to_string(), groups.len());
                groups.push((code.into_owned(), vec![record.salary_usd]));
            }
        }
    }

    groups
}

/// Count rows by code, values in first-occurrence order.
pub fn count_by_code(view: &FilteredView<'_>, column: Column) -> Vec<(String, usize)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for record in view.iter() {
        let code = record.code(column);
        match positions.get(&*code) {
            Some(&i) => counts[i].1 += 1,
            None => {
                positions.insert(code.to_string(), counts.len());
                counts.push((code.into_owned(), 1));
            }
        }
    }

    counts
}

/// Salary distribution per group.
///
/// Without an override, groups follow the canonical order of the column when
/// it has one, otherwise descending lexical order of the raw code, and are
/// labelled through the catalog. An override replaces both.
pub fn grouped_distribution(
    view: &FilteredView<'_>,
    catalog: &CategoryCatalog,
    column: Column,
    order_override: Option<&OrderOverride>,
) -> DistributionView {
    let mut groups = group_salaries(view, column);
    match order_override {
        Some(o) => groups.sort_by(|(a, _), (b, _)| o.compare(a, b)),
        None => {
            let order = catalog.order();
            groups.sort_by(|(a, _), (b, _)| order.compare(column, a, b));
        }
    }

    let groups: Vec<DistributionGroup> = groups
        .into_iter()
        .filter_map(|(code, values)| {
            let summary = five_number_summary(&values)?;
            let label = match order_override {
                Some(o) => o.label(code),
                None => catalog.display_label(column, &code),
            };
            Some(DistributionGroup {
                label,
                min: summary.min,
                q1: summary.q1,
                median: summary.median,
                q3: summary.q3,
                max: summary.max,
                raw_values: values,
            })
        })
        .collect();

    debug!("Distribution by {}: {} groups", column, groups.len());
    DistributionView { groups }
}

/// Median salary per group, highest first, limited to `limit` groups.
///
/// Ties in the median keep the first-occurrence order of the groups.
pub fn ranked_group_median(
    view: &FilteredView<'_>,
    catalog: &CategoryCatalog,
    column: Column,
    limit: usize,
) -> Result<RankedBarView> {
    if limit < 1 {
        return Err(EngineError::InvalidLimit { limit });
    }

    let mut ranked: Vec<(String, f64)> = group_salaries(view, column)
        .into_iter()
        .filter_map(|(code, values)| median(&values).map(|m| (code, m)))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit.min(ranked.len()));

    let bars = ranked
        .into_iter()
        .map(|(code, value)| RankedBar {
            label: catalog.display_label(column, &code),
            value,
        })
        .collect();

    Ok(RankedBarView { bars })
}

/// The `n` most frequent values, returned ascending by count.
///
/// Ties in frequency keep first-occurrence order, both when choosing the top
/// `n` and in the final ascending order.
pub fn top_n_frequency(
    view: &FilteredView<'_>,
    catalog: &CategoryCatalog,
    column: Column,
    n: usize,
) -> Result<FrequencyBarView> {
    if n < 1 {
        return Err(EngineError::InvalidLimit { limit: n });
    }

    let mut counts = count_by_code(view, column);
    counts.sort_by_key(|(_, count)| Reverse(*count));
    counts.truncate(n);
    counts.sort_by_key(|(_, count)| *count);

    let bars = counts
        .into_iter()
        .map(|(code, count)| FrequencyBar {
            label: catalog.display_label(column, &code),
            count,
        })
        .collect();

    Ok(FrequencyBarView { bars })
}

/// Share of rows per value, most frequent first.
pub fn category_share(
    view: &FilteredView<'_>,
    catalog: &CategoryCatalog,
    column: Column,
) -> ShareView {
    let total = view.len();
    if total == 0 {
        return ShareView::default();
    }

    let mut counts = count_by_code(view, column);
    counts.sort_by_key(|(_, count)| Reverse(*count));

    let slices = counts
        .into_iter()
        .map(|(code, count)| ShareSlice {
            label: catalog.display_label(column, &code),
            count,
            fraction: count as f64 / total as f64,
        })
        .collect();

    ShareView { slices }
}
