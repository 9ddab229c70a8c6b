//! View models handed to the rendering layer.
//!
//! Every view carries plain labels and numbers only, never dataset rows, so it
//! can be serialized as-is.

use serde::{Deserialize, Serialize};

/// Five-number summary of one group plus its raw values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionGroup {
    pub label: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Salary values of the group in row order (for box/violin rendering).
    pub raw_values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionView {
    pub groups: Vec<DistributionGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBar {
    pub label: String,
    pub value: f64,
}

/// Groups ranked by a statistic, already limited and ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedBarView {
    pub bars: Vec<RankedBar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyBar {
    pub label: String,
    pub count: usize,
}

/// Most frequent values, ascending by count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyBarView {
    pub bars: Vec<FrequencyBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareSlice {
    pub label: String,
    pub count: usize,
    /// `count / total rows`, in `[0, 1]`.
    pub fraction: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareView {
    pub slices: Vec<ShareSlice>,
}

/// Any view produced by an aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewModel {
    Distribution(DistributionView),
    RankedBar(RankedBarView),
    FrequencyBar(FrequencyBarView),
    Share(ShareView),
}

impl ViewModel {
    /// True when the view has no groups, bars, or slices.
    pub fn is_empty(&self) -> bool {
        match self {
            ViewModel::Distribution(v) => v.groups.is_empty(),
            ViewModel::RankedBar(v) => v.bars.is_empty(),
            ViewModel::FrequencyBar(v) => v.bars.is_empty(),
            ViewModel::Share(v) => v.slices.is_empty(),
        }
    }

    /// Labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            ViewModel::Distribution(v) => v.groups.iter().map(|g| g.label.as_str()).collect(),
            ViewModel::RankedBar(v) => v.bars.iter().map(|b| b.label.as_str()).collect(),
            ViewModel::FrequencyBar(v) => v.bars.iter().map(|b| b.label.as_str()).collect(),
            ViewModel::Share(v) => v.slices.iter().map(|s| s.label.as_str()).collect(),
        }
    }
}

impl From<DistributionView> for ViewModel {
    fn from(view: DistributionView) -> Self {
        ViewModel::Distribution(view)
    }
}

impl From<RankedBarView> for ViewModel {
    fn from(view: RankedBarView) -> Self {
        ViewModel::RankedBar(view)
    }
}

impl From<FrequencyBarView> for ViewModel {
    fn from(view: FrequencyBarView) -> Self {
        ViewModel::FrequencyBar(view)
    }
}

impl From<ShareView> for ViewModel {
    fn from(view: ShareView) -> Self {
        ViewModel::Share(view)
    }
}
