//! Data models for the salary dataset.
//!
//! This module contains the record type loaded by an external collaborator,
//! the immutable dataset wrapper, and the fixed code enumerations used for
//! labelling and ordering categorical columns.

use crate::error::{EngineError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Categorical columns that can be filtered on or grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    ExperienceLevel,
    EmploymentType,
    CompanySize,
    CompanyLocation,
    RemoteRatio,
    JobTitle,
}

impl Column {
    /// Every categorical column, in dataset header order.
    pub const ALL: [Column; 6] = [
        Column::ExperienceLevel,
        Column::EmploymentType,
        Column::CompanySize,
        Column::CompanyLocation,
        Column::RemoteRatio,
        Column::JobTitle,
    ];
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::ExperienceLevel => write!(f, "Experience Level"),
            Column::EmploymentType => write!(f, "Employment Type"),
            Column::CompanySize => write!(f, "Company Size"),
            Column::CompanyLocation => write!(f, "Company Location"),
            Column::RemoteRatio => write!(f, "Remote Ratio"),
            Column::JobTitle => write!(f, "Job Title"),
        }
    }
}

/// Experience level of the employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    /// Entry level (EN)
    Entry,
    /// Mid level (MI)
    Mid,
    /// Senior level (SE)
    Senior,
    /// Executive level (EX)
    Executive,
}

impl ExperienceLevel {
    /// All levels in display order.
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Executive,
    ];

    /// Parse a dataset code.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "EN" => Ok(ExperienceLevel::Entry),
            "MI" => Ok(ExperienceLevel::Mid),
            "SE" => Ok(ExperienceLevel::Senior),
            "EX" => Ok(ExperienceLevel::Executive),
            other => Err(EngineError::UnknownCategoryCode {
                column: Column::ExperienceLevel,
                code: other.to_string(),
            }),
        }
    }

    /// The dataset code for this level.
    pub fn code(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "EN",
            ExperienceLevel::Mid => "MI",
            ExperienceLevel::Senior => "SE",
            ExperienceLevel::Executive => "EX",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Executive => "Executive",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Size of the employing company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompanySize {
    Large,
    Medium,
    Small,
}

impl CompanySize {
    /// All sizes in display order (largest first).
    pub const ALL: [CompanySize; 3] = [CompanySize::Large, CompanySize::Medium, CompanySize::Small];

    /// Parse a dataset code.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "L" => Ok(CompanySize::Large),
            "M" => Ok(CompanySize::Medium),
            "S" => Ok(CompanySize::Small),
            other => Err(EngineError::UnknownCategoryCode {
                column: Column::CompanySize,
                code: other.to_string(),
            }),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CompanySize::Large => "L",
            CompanySize::Medium => "M",
            CompanySize::Small => "S",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompanySize::Large => "Large",
            CompanySize::Medium => "Medium",
            CompanySize::Small => "Small",
        }
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of the salary dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Yearly bucket, stored as the first day of the year.
    #[serde(rename = "Work Year")]
    pub work_year: NaiveDate,
    /// Experience level code (EN, MI, SE, EX).
    #[serde(rename = "Experience Level")]
    pub experience_level: String,
    /// Employment type code (e.g. FT, PT).
    #[serde(rename = "Employment Type")]
    pub employment_type: String,
    /// Company size code (S, M, L).
    #[serde(rename = "Company Size")]
    pub company_size: String,
    /// Country code of the company.
    #[serde(rename = "Company Location")]
    pub company_location: String,
    /// Share of remote work in percent (0, 50, 100).
    #[serde(rename = "Remote Ratio")]
    pub remote_ratio: u32,
    /// Job title.
    #[serde(rename = "Job Title")]
    pub job_title: String,
    /// Salary converted to USD.
    #[serde(rename = "Salary in USD")]
    pub salary_usd: f64,
}

impl Record {
    /// Returns the raw code of this record for a categorical column.
    pub fn code(&self, column: Column) -> Cow<'_, str> {
        match column {
            Column::ExperienceLevel => Cow::Borrowed(&self.experience_level),
            Column::EmploymentType => Cow::Borrowed(&self.employment_type),
            Column::CompanySize => Cow::Borrowed(&self.company_size),
            Column::CompanyLocation => Cow::Borrowed(&self.company_location),
            Column::RemoteRatio => Cow::Owned(self.remote_ratio.to_string()),
            Column::JobTitle => Cow::Borrowed(&self.job_title),
        }
    }
}

/// Immutable in-memory table of records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wraps loaded records. Order is kept as the source of first occurrence.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_codes() {
        for level in ExperienceLevel::ALL {
            assert_eq!(ExperienceLevel::from_code(level.code()), Ok(level));
        }
        assert_eq!(ExperienceLevel::Executive.to_string(), "Executive");
        assert_eq!(
            ExperienceLevel::from_code("XX"),
            Err(EngineError::UnknownCategoryCode {
                column: Column::ExperienceLevel,
                code: "XX".to_string(),
            })
        );
    }

    #[test]
    fn test_company_size_codes() {
        assert_eq!(CompanySize::from_code("M"), Ok(CompanySize::Medium));
        assert_eq!(CompanySize::Large.label(), "Large");
        assert!(CompanySize::from_code("XL").is_err());
        let labels: Vec<_> = CompanySize::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["Large", "Medium", "Small"]);
    }

    #[test]
    fn test_record_code() {
        let r = fixtures::record(2021, "SE", "L", "US", 50, "Data Scientist", 1.0);
        assert_eq!(r.code(Column::CompanySize), "L");
        assert_eq!(r.code(Column::RemoteRatio), "50");
        assert_eq!(r.code(Column::JobTitle), "Data Scientist");
    }

    #[test]
    fn test_record_deserialize() {
        let json = r#"{
            "Work Year": "2023-01-01",
            "Experience Level": "SE",
            "Employment Type": "FT",
            "Company Size": "M",
            "Company Location": "US",
            "Remote Ratio": 100,
            "Job Title": "Data Scientist",
            "Salary in USD": 150000.0
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.work_year, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(record.remote_ratio, 100);
        assert_eq!(record.salary_usd, 150000.0);
    }

    #[test]
    fn test_dataset_len() {
        let ds = fixtures::six_records();
        assert_eq!(ds.len(), 6);
        assert!(!ds.is_empty());
        assert!(Dataset::default().is_empty());
    }
}
