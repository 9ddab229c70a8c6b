//! Dashboard wiring: which aggregation runs over which column, and which
//! controls each panel listens to.
//!
//! A dashboard variant is only a list of [`PanelSpec`]s; the filter engine and
//! aggregations are shared by all of them.

use crate::analysis::{
    category_share, grouped_distribution, ranked_group_median, top_n_frequency, OrderOverride,
};
use crate::catalog::CategoryCatalog;
use crate::error::Result;
use crate::filter::filter;
use crate::models::{Column, Dataset};
use crate::selection::SelectionState;
use crate::view::ViewModel;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Aggregation run by a panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PanelKind {
    /// Salary distribution per group of `column`. Groups follow the catalog's
    /// order and labels unless `order_override` is set.
    Distribution {
        column: Column,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        order_override: Option<OrderOverride>,
    },
    /// Median salary per group of `column`, limited by the selection's top-N.
    RankedMedian { column: Column },
    /// Most frequent values of `column`; `n` falls back to the selection's top-N.
    TopFrequency {
        column: Column,
        #[serde(default)]
        n: Option<usize>,
    },
    /// Share of rows per value of `column`.
    Share { column: Column },
}

/// One chart of a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub id: String,
    pub title: String,
    pub kind: PanelKind,
    /// Categorical filters this panel reacts to. The year range always applies.
    #[serde(default)]
    pub listens_to: Vec<Column>,
}

impl PanelSpec {
    pub fn new(id: &str, title: &str, kind: PanelKind, listens_to: &[Column]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            listens_to: listens_to.to_vec(),
        }
    }

    /// Compute this panel's view for a selection.
    pub fn compute(
        &self,
        dataset: &Dataset,
        catalog: &CategoryCatalog,
        selection: &SelectionState,
    ) -> Result<PanelView> {
        let scoped = selection.restricted_to(&self.listens_to);
        let view = filter(dataset, catalog, &scoped)?;

        let model: ViewModel = match &self.kind {
            PanelKind::Distribution {
                column,
                order_override,
            } => grouped_distribution(&view, catalog, *column, order_override.as_ref()).into(),
            PanelKind::RankedMedian { column } => {
                ranked_group_median(&view, catalog, *column, scoped.top_n)?.into()
            }
            PanelKind::TopFrequency { column, n } => {
                top_n_frequency(&view, catalog, *column, n.unwrap_or(scoped.top_n))?.into()
            }
            PanelKind::Share { column } => category_share(&view, catalog, *column).into(),
        };

        debug!("Panel '{}': {} rows in view", self.id, view.len());

        Ok(PanelView {
            id: self.id.clone(),
            title: self.title.clone(),
            view: model,
        })
    }
}

/// Computed output of one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelView {
    pub id: String,
    pub title: String,
    pub view: ViewModel,
}

/// Computed output of a whole dashboard for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Calendar-year label of the lower slider bound.
    pub year_from: String,
    /// Calendar-year label of the upper slider bound.
    pub year_to: String,
    pub panels: Vec<PanelView>,
}

impl DashboardSnapshot {
    pub fn panel(&self, id: &str) -> Option<&PanelView> {
        self.panels.iter().find(|p| p.id == id)
    }
}

/// A dashboard variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    panels: Vec<PanelSpec>,
}

impl Dashboard {
    pub fn new(panels: Vec<PanelSpec>) -> Self {
        Self { panels }
    }

    /// The salary overview: three share charts, two distributions with their
    /// own category filters, a ranked location chart and the most frequent
    /// job titles.
    pub fn salary_overview(job_titles_limit: usize) -> Self {
        Self::new(vec![
            PanelSpec::new(
                "countries",
                "Country Distribution of Companies",
                PanelKind::Share {
                    column: Column::CompanyLocation,
                },
                &[],
            ),
            PanelSpec::new(
                "remote",
                "Remote Ratio Distribution",
                PanelKind::Share {
                    column: Column::RemoteRatio,
                },
                &[],
            ),
            PanelSpec::new(
                "employment_type",
                "Employment Type Distribution",
                PanelKind::Share {
                    column: Column::EmploymentType,
                },
                &[],
            ),
            PanelSpec::new(
                "salary_by_experience",
                "Salary distribution by Experience Level",
                PanelKind::Distribution {
                    column: Column::ExperienceLevel,
                    order_override: None,
                },
                &[Column::ExperienceLevel],
            ),
            PanelSpec::new(
                "salary_by_company_size",
                "Salary distribution by Company Size",
                PanelKind::Distribution {
                    column: Column::CompanySize,
                    order_override: None,
                },
                &[Column::CompanySize],
            ),
            PanelSpec::new(
                "median_by_location",
                "Median salary in USD by Company Location",
                PanelKind::RankedMedian {
                    column: Column::CompanyLocation,
                },
                &[],
            ),
            PanelSpec::new(
                "job_titles",
                &format!("Top {} Most Frequent Job Titles", job_titles_limit),
                PanelKind::TopFrequency {
                    column: Column::JobTitle,
                    n: Some(job_titles_limit),
                },
                &[],
            ),
        ])
    }

    pub fn panels(&self) -> &[PanelSpec] {
        &self.panels
    }

    /// Compute every panel for one selection.
    pub fn compute(
        &self,
        dataset: &Dataset,
        catalog: &CategoryCatalog,
        selection: &SelectionState,
    ) -> Result<DashboardSnapshot> {
        selection.validate(catalog)?;

        let panels = self
            .panels
            .iter()
            .map(|panel| panel.compute(dataset, catalog, selection))
            .collect::<Result<Vec<_>>>()?;

        let years = catalog.years();
        Ok(DashboardSnapshot {
            year_from: years.label(selection.year_range.lo).unwrap_or_default(),
            year_to: years.label(selection.year_range.hi).unwrap_or_default(),
            panels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::fixtures::six_records;

    #[test]
    fn test_salary_overview_panels() {
        let dashboard = Dashboard::salary_overview(10);
        assert_eq!(dashboard.panels().len(), 7);
        assert_eq!(
            dashboard.panels()[6].title,
            "Top 10 Most Frequent Job Titles"
        );
    }

    #[test]
    fn test_panels_only_listen_to_their_filters() {
        let ds = six_records();
        let catalog = CategoryCatalog::build(&ds).unwrap();
        let selection = SelectionState::defaults(&catalog, 25)
            .with_filter(Column::CompanySize, ["L"])
            .with_filter(Column::ExperienceLevel, ["SE"]);

        let snapshot = Dashboard::salary_overview(10)
            .compute(&ds, &catalog, &selection)
            .unwrap();

        let by_size = snapshot.panel("salary_by_company_size").unwrap();
        assert_eq!(by_size.view.labels(), vec!["Large"]);

        let by_level = snapshot.panel("salary_by_experience").unwrap();
        assert_eq!(by_level.view.labels(), vec!["Senior"]);

        // share charts ignore the categorical filters
        let countries = snapshot.panel("countries").unwrap();
        assert_eq!(countries.view.labels().len(), 4);
        assert_eq!(snapshot.year_from, "2020");
        assert_eq!(snapshot.year_to, "2022");
    }

    #[test]
    fn test_ranked_panel_uses_selection_top_n() {
        let ds = six_records();
        let catalog = CategoryCatalog::build(&ds).unwrap();
        let selection = SelectionState::defaults(&catalog, 2);

        let snapshot = Dashboard::salary_overview(10)
            .compute(&ds, &catalog, &selection)
            .unwrap();
        let ranked = snapshot.panel("median_by_location").unwrap();
        // GB 180000, US median 95000, DE 110000, IN 40000
        assert_eq!(ranked.view.labels(), vec!["GB", "DE"]);
    }

    #[test]
    fn test_invalid_selection_fails_whole_snapshot() {
        let ds = six_records();
        let catalog = CategoryCatalog::build(&ds).unwrap();
        let selection = SelectionState::defaults(&catalog, 0);

        let err = Dashboard::salary_overview(10)
            .compute(&ds, &catalog, &selection)
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidLimit { limit: 0 });
    }

    #[test]
    fn test_parallel_compute_is_independent() {
        let ds = six_records();
        let catalog = CategoryCatalog::build(&ds).unwrap();
        let dashboard = Dashboard::salary_overview(10);
        let selections: Vec<_> = (0..3)
            .map(|lo| SelectionState::defaults(&catalog, 3).with_year_range(lo, 2))
            .collect();

        let (ds_ref, catalog_ref, dashboard_ref) = (&ds, &catalog, &dashboard);
        let parallel: Vec<DashboardSnapshot> = std::thread::scope(|scope| {
            let handles: Vec<_> = selections
                .iter()
                .map(|s| {
                    scope.spawn(move || dashboard_ref.compute(ds_ref, catalog_ref, s).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (selection, snapshot) in selections.iter().zip(&parallel) {
            let sequential = dashboard.compute(&ds, &catalog, selection).unwrap();
            assert_eq!(&sequential, snapshot);
        }
    }

    #[test]
    fn test_panel_spec_from_toml() {
        let spec: PanelSpec = toml::from_str(
            r#"
id = "titles"
title = "Titles"
listens_to = ["experience_level"]

[kind]
op = "top_frequency"
column = "job_title"
n = 5
"#,
        )
        .unwrap();

        assert_eq!(
            spec.kind,
            PanelKind::TopFrequency {
                column: Column::JobTitle,
                n: Some(5)
            }
        );
        assert_eq!(spec.listens_to, vec![Column::ExperienceLevel]);
    }

    #[test]
    fn test_distribution_order_override_from_toml() {
        let spec: PanelSpec = toml::from_str(
            r#"
id = "sizes"
title = "Sizes"
listens_to = ["company_size"]

[kind]
op = "distribution"
column = "company_size"

[kind.order_override]
labels = { S = "Small", M = "Medium", L = "Large" }
"#,
        )
        .unwrap();

        let ds = six_records();
        let catalog = CategoryCatalog::build(&ds).unwrap();
        let selection = SelectionState::defaults(&catalog, 5);

        let view = spec.compute(&ds, &catalog, &selection).unwrap().view;
        assert_eq!(view.labels(), vec!["Small", "Medium", "Large"]);

        let default_spec = PanelSpec::new(
            "sizes",
            "Sizes",
            PanelKind::Distribution {
                column: Column::CompanySize,
                order_override: None,
            },
            &[Column::CompanySize],
        );
        let view = default_spec.compute(&ds, &catalog, &selection).unwrap().view;
        assert_eq!(view.labels(), vec!["Large", "Medium", "Small"]);
    }
}
