//! Option lists for the dashboard controls, derived from the catalog.

use crate::catalog::CategoryCatalog;
use crate::models::Column;
use crate::selection::YearRange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub label: String,
    pub value: String,
}

/// Year range slider over the year index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSlider {
    pub min: usize,
    pub max: usize,
    /// Index to calendar-year label.
    pub marks: BTreeMap<usize, String>,
    pub value: YearRange,
}

/// Single-value slider for the top-N bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopNSlider {
    pub min: usize,
    pub max: usize,
    pub value: usize,
}

/// Everything the control layer needs to populate its widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlOptions {
    pub year_slider: YearSlider,
    pub experience_levels: Vec<OptionItem>,
    pub company_sizes: Vec<OptionItem>,
    pub remote_ratios: Vec<OptionItem>,
    pub top_n: TopNSlider,
}

impl ControlOptions {
    /// Build control options. The top-N slider spans the number of distinct
    /// company locations; its default is `default_top_n` capped to that span.
    pub fn from_catalog(catalog: &CategoryCatalog, default_top_n: usize) -> Self {
        let years = catalog.years();
        let max_index = years.len().saturating_sub(1);
        let marks = (0..years.len())
            .filter_map(|i| years.label(i).map(|label| (i, label)))
            .collect();

        let locations = catalog.distinct(Column::CompanyLocation).len().max(1);

        Self {
            year_slider: YearSlider {
                min: 0,
                max: max_index,
                marks,
                value: YearRange::new(0, max_index),
            },
            experience_levels: options(catalog, Column::ExperienceLevel, true),
            company_sizes: options(catalog, Column::CompanySize, true),
            remote_ratios: options(catalog, Column::RemoteRatio, false),
            top_n: TopNSlider {
                min: 1,
                max: locations,
                value: default_top_n.clamp(1, locations),
            },
        }
    }

    /// Dropdown options for any categorical column, in display order.
    pub fn for_column(catalog: &CategoryCatalog, column: Column) -> Vec<OptionItem> {
        options(catalog, column, true)
    }
}

fn options(catalog: &CategoryCatalog, column: Column, display_order: bool) -> Vec<OptionItem> {
    let mut codes: Vec<&str> = catalog.distinct(column).iter().map(String::as_str).collect();
    if display_order {
        catalog.order().sort_codes(column, &mut codes);
    }

    codes
        .into_iter()
        .map(|code| OptionItem {
            label: catalog.display_label(column, code),
            value: code.to_string(),
        })
        .collect()
}
