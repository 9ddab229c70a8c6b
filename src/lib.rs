//! PayDash - filter-and-aggregate engine for salary dashboards
//!
//! Given an immutable salary dataset and a selection of control values
//! (year range, categorical filters, top-N), the engine derives the filtered
//! subset and the aggregate view models each dashboard panel renders:
//! salary distributions, ranked medians, top-N frequencies and category
//! shares. Loading the data and drawing the charts are left to the host.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod controls;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod report;
pub mod selection;
pub mod view;

pub use analysis::OrderOverride;
pub use catalog::{CanonicalOrder, CategoryCatalog, LabelMap, YearIndex, YearOrder};
pub use config::Config;
pub use controls::ControlOptions;
pub use dashboard::{Dashboard, DashboardSnapshot, PanelKind, PanelSpec, PanelView};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use filter::{filter, FilteredView};
pub use models::{Column, CompanySize, Dataset, ExperienceLevel, Record};
pub use selection::{SelectionState, YearRange};
pub use view::{
    DistributionGroup, DistributionView, FrequencyBar, FrequencyBarView, RankedBar,
    RankedBarView, ShareSlice, ShareView, ViewModel,
};
