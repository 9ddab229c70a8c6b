//! Order statistics over salary values.

use serde::{Deserialize, Serialize};

/// Minimum, quartiles, median and maximum of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Sorted copy of the values in IEEE total order; NaN sorts last.
fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile `p` in `[0, 1]` of sorted data, by linear interpolation between
/// the closest ranks.
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let pos = last as f64 * p;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(last);
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Median of a sample; `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(quantile_sorted(&sorted(values), 0.5))
}

/// Five-number summary of a sample; `None` when empty.
pub fn five_number_summary(values: &[f64]) -> Option<FiveNumberSummary> {
    if values.is_empty() {
        return None;
    }

    let sorted = sorted(values);
    Some(FiveNumberSummary {
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}
