//! Category catalog derived once per dataset load.
//!
//! The catalog owns the year index, the code-to-label mapping, the canonical
//! display orders, and the distinct codes of every categorical column. It is
//! built once and then passed by reference into every engine call.

use crate::error::{EngineError, Result};
use crate::models::{Column, CompanySize, Dataset, ExperienceLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{info, warn};

/// How the year index assigns slider positions to work years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearOrder {
    /// Index = order of first appearance in the dataset.
    #[default]
    FirstSeen,
    /// Index = ascending calendar order.
    Chronological,
}

/// Bijection between slider indices `0..K` and distinct work years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearIndex {
    years: Vec<NaiveDate>,
    positions: HashMap<NaiveDate, usize>,
}

impl YearIndex {
    fn from_dataset(dataset: &Dataset, order: YearOrder) -> Self {
        let mut years = Vec::new();
        let mut seen = HashSet::new();
        for record in dataset.records() {
            if seen.insert(record.work_year) {
                years.push(record.work_year);
            }
        }
        if order == YearOrder::Chronological {
            years.sort();
        }

        let positions = years.iter().enumerate().map(|(i, y)| (*y, i)).collect();
        Self { years, positions }
    }

    /// Number of indexed years (K).
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Index to work year.
    pub fn decode(&self, index: usize) -> Option<NaiveDate> {
        self.years.get(index).copied()
    }

    /// Work year to index.
    pub fn encode(&self, year: NaiveDate) -> Option<usize> {
        self.positions.get(&year).copied()
    }

    /// Calendar year shown on the slider mark for an index.
    pub fn label(&self, index: usize) -> Option<String> {
        self.decode(index).map(|y| y.format("%Y").to_string())
    }

    /// Decodes the inclusive index span `lo..=hi` to its set of work years.
    pub fn span(&self, lo: usize, hi: usize) -> Result<HashSet<NaiveDate>> {
        if lo > hi || hi >= self.years.len() {
            return Err(EngineError::InvalidSelectionRange {
                lo,
                hi,
                year_count: self.years.len(),
            });
        }
        Ok(self.years[lo..=hi].iter().copied().collect())
    }

    /// Indexed years in index order.
    pub fn years(&self) -> &[NaiveDate] {
        &self.years
    }
}

/// Fixed code-to-label mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelMap;

impl LabelMap {
    /// Label for a code. Codes outside the known set of a labelled column are
    /// reported as [`EngineError::UnknownCategoryCode`].
    pub fn label(&self, column: Column, code: &str) -> Result<String> {
        match column {
            Column::ExperienceLevel => {
                ExperienceLevel::from_code(code).map(|l| l.label().to_string())
            }
            Column::CompanySize => CompanySize::from_code(code).map(|s| s.label().to_string()),
            Column::RemoteRatio => Ok(format!("{}%", code)),
            Column::EmploymentType | Column::CompanyLocation | Column::JobTitle => {
                Ok(code.to_string())
            }
        }
    }

    /// Label for a code, falling back to the raw code for unknown values.
    pub fn display_label(&self, column: Column, code: &str) -> String {
        self.label(column, code).unwrap_or_else(|e| {
            warn!("{}; showing raw code", e);
            code.to_string()
        })
    }
}

/// Fixed display order for ordered columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalOrder;

impl CanonicalOrder {
    /// Position of a code in the canonical order of its column, if it has one.
    pub fn rank(&self, column: Column, code: &str) -> Option<usize> {
        match column {
            Column::ExperienceLevel => ExperienceLevel::from_code(code)
                .ok()
                .and_then(|l| ExperienceLevel::ALL.iter().position(|x| *x == l)),
            Column::CompanySize => CompanySize::from_code(code)
                .ok()
                .and_then(|s| CompanySize::ALL.iter().position(|x| *x == s)),
            _ => None,
        }
    }

    /// Whether the column has a canonical order.
    pub fn is_ordered(&self, column: Column) -> bool {
        matches!(column, Column::ExperienceLevel | Column::CompanySize)
    }

    /// Display comparison of two raw codes: canonical rank first, then
    /// descending lexical order for codes without a rank.
    pub fn compare(&self, column: Column, a: &str, b: &str) -> Ordering {
        if !self.is_ordered(column) {
            return b.cmp(a);
        }
        match (self.rank(column, a), self.rank(column, b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.cmp(a),
        }
    }

    /// Sorts raw codes for display.
    pub fn sort_codes<S: AsRef<str>>(&self, column: Column, codes: &mut [S]) {
        codes.sort_by(|a, b| self.compare(column, a.as_ref(), b.as_ref()));
    }
}

/// Read-only metadata about the dataset's categorical and ordinal columns.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    years: YearIndex,
    labels: LabelMap,
    order: CanonicalOrder,
    distinct: BTreeMap<Column, Vec<String>>,
    known: HashMap<Column, HashSet<String>>,
}

impl CategoryCatalog {
    /// Build the catalog with the default (first-seen) year order.
    pub fn build(dataset: &Dataset) -> Result<Self> {
        Self::build_with(dataset, YearOrder::default())
    }

    /// Build the catalog with an explicit year order.
    pub fn build_with(dataset: &Dataset, year_order: YearOrder) -> Result<Self> {
        if dataset.is_empty() {
            return Err(EngineError::DatasetEmpty);
        }

        let years = YearIndex::from_dataset(dataset, year_order);
        let labels = LabelMap;

        let mut distinct = BTreeMap::new();
        let mut known = HashMap::new();
        for column in Column::ALL {
            let mut values = Vec::new();
            let mut seen = HashSet::new();
            for record in dataset.records() {
                let code = record.code(column);
                if !seen.contains(&*code) {
                    seen.insert(code.to_string());
                    values.push(code.into_owned());
                }
            }
            if values.is_empty() {
                return Err(EngineError::DatasetEmpty);
            }

            for code in &values {
                if let Err(e) = labels.label(column, code) {
                    warn!("Data quality: {}", e);
                }
            }

            distinct.insert(column, values);
            known.insert(column, seen);
        }

        info!(
            "Built category catalog: {} records, {} years, {} locations, {} job titles",
            dataset.len(),
            years.len(),
            distinct.get(&Column::CompanyLocation).map_or(0, Vec::len),
            distinct.get(&Column::JobTitle).map_or(0, Vec::len),
        );

        Ok(Self {
            years,
            labels,
            order: CanonicalOrder,
            distinct,
            known,
        })
    }

    pub fn years(&self) -> &YearIndex {
        &self.years
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    pub fn order(&self) -> &CanonicalOrder {
        &self.order
    }

    /// Distinct codes of a column in first-occurrence order.
    pub fn distinct(&self, column: Column) -> &[String] {
        self.distinct.get(&column).map_or(&[], Vec::as_slice)
    }

    /// Whether a code occurs in the column.
    pub fn contains(&self, column: Column, code: &str) -> bool {
        self.known
            .get(&column)
            .is_some_and(|codes| codes.contains(code))
    }

    /// Display label for a code (raw code when unknown).
    pub fn display_label(&self, column: Column, code: &str) -> String {
        self.labels.display_label(column, code)
    }

    /// Filter map with every code of every column selected.
    pub fn all_selected(&self) -> BTreeMap<Column, BTreeSet<String>> {
        self.distinct
            .iter()
            .map(|(column, codes)| (*column, codes.iter().cloned().collect()))
            .collect()
    }
}
