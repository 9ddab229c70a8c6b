//! The engine: single owner of the dataset and its catalog.
//!
//! Both are built once and only read afterwards, so an `Engine` can be shared
//! by reference across threads and serve any number of selections at once.

use crate::catalog::CategoryCatalog;
use crate::config::Config;
use crate::controls::ControlOptions;
use crate::dashboard::{Dashboard, DashboardSnapshot};
use crate::error::Result;
use crate::filter::{filter, FilteredView};
use crate::models::Dataset;
use crate::selection::SelectionState;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Engine {
    dataset: Dataset,
    catalog: CategoryCatalog,
    dashboard: Dashboard,
    default_top_n: usize,
}

impl Engine {
    /// Build the catalog for `dataset` using the given configuration.
    pub fn new(dataset: Dataset, config: &Config) -> Result<Self> {
        let catalog = CategoryCatalog::build_with(&dataset, config.selection.year_order)?;
        let dashboard = config.dashboard();

        info!(
            "Engine ready: {} records, {} panels",
            dataset.len(),
            dashboard.panels().len()
        );

        Ok(Self {
            dataset,
            catalog,
            dashboard,
            default_top_n: config.selection.default_top_n,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Initial selection: full year range, everything selected, default top-N
    /// capped to the number of company locations.
    pub fn default_selection(&self) -> SelectionState {
        let controls = self.controls();
        SelectionState::defaults(&self.catalog, controls.top_n.value)
    }

    pub fn controls(&self) -> ControlOptions {
        ControlOptions::from_catalog(&self.catalog, self.default_top_n)
    }

    /// Rows matching a selection.
    pub fn filter(&self, selection: &SelectionState) -> Result<FilteredView<'_>> {
        filter(&self.dataset, &self.catalog, selection)
    }

    /// Every panel of the configured dashboard for a selection.
    pub fn compute(&self, selection: &SelectionState) -> Result<DashboardSnapshot> {
        self.dashboard
            .compute(&self.dataset, &self.catalog, selection)
    }
}
