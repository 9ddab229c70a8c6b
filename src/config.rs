//! Configuration file handling.
//!
//! This module handles loading dashboard settings from `.paydash.toml` files.

use crate::catalog::YearOrder;
use crate::dashboard::{Dashboard, PanelKind, PanelSpec};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".paydash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Default control values.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Panel settings.
    #[serde(default)]
    pub panels: PanelsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable debug logging.
    #[serde(default)]
    pub verbose: bool,

    /// Only log errors.
    #[serde(default)]
    pub quiet: bool,
}

/// Defaults for the selection controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Initial value of the top-N slider.
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// How the year slider indexes work years.
    #[serde(default)]
    pub year_order: YearOrder,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            year_order: YearOrder::default(),
        }
    }
}

fn default_top_n() -> usize {
    25
}

/// Panel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelsConfig {
    /// Number of job titles in the frequency panel.
    #[serde(default = "default_job_titles_limit")]
    pub job_titles_limit: usize,

    /// Custom panel list. When empty the salary overview is used.
    #[serde(default)]
    pub custom: Vec<PanelSpec>,
}

impl Default for PanelsConfig {
    fn default() -> Self {
        Self {
            job_titles_limit: default_job_titles_limit(),
            custom: Vec::new(),
        }
    }
}

fn default_job_titles_limit() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Reject limits the engine would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        if self.selection.default_top_n < 1 {
            bail!("selection.default_top_n must be at least 1");
        }
        if self.panels.job_titles_limit < 1 {
            bail!("panels.job_titles_limit must be at least 1");
        }
        if self.general.verbose && self.general.quiet {
            bail!("general.verbose and general.quiet are mutually exclusive");
        }

        let mut ids = HashSet::new();
        for panel in &self.panels.custom {
            if let PanelKind::TopFrequency { n: Some(0), .. } = panel.kind {
                bail!("panels.custom '{}': n must be at least 1", panel.id);
            }
            if !ids.insert(panel.id.as_str()) {
                bail!("panels.custom: duplicate panel id '{}'", panel.id);
            }
        }
        Ok(())
    }

    /// The dashboard described by this configuration.
    pub fn dashboard(&self) -> Dashboard {
        if self.panels.custom.is_empty() {
            Dashboard::salary_overview(self.panels.job_titles_limit)
        } else {
            Dashboard::new(self.panels.custom.clone())
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.selection.default_top_n, 25);
        assert_eq!(config.selection.year_order, YearOrder::FirstSeen);
        assert_eq!(config.panels.job_titles_limit, 10);
        assert!(config.validate().is_ok());
        assert_eq!(config.dashboard().panels().len(), 7);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[selection]
default_top_n = 5
year_order = "chronological"

[panels]
job_titles_limit = 3

[[panels.custom]]
id = "remote"
title = "Remote"

[panels.custom.kind]
op = "share"
column = "remote_ratio"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.selection.default_top_n, 5);
        assert_eq!(config.selection.year_order, YearOrder::Chronological);
        assert_eq!(config.panels.job_titles_limit, 3);

        let dashboard = config.dashboard();
        assert_eq!(dashboard.panels().len(), 1);
        assert_eq!(
            dashboard.panels()[0].kind,
            PanelKind::Share {
                column: Column::RemoteRatio
            }
        );
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = Config::default();
        config.selection.default_top_n = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.verbose = true;
        config.general.quiet = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_panel_limit() {
        let config: Config = toml::from_str(
            r#"
[[panels.custom]]
id = "titles"
title = "Job Titles"

[panels.custom.kind]
op = "top_frequency"
column = "job_title"
n = 0
"#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'titles'"));
    }

    #[test]
    fn test_validate_rejects_duplicate_panel_ids() {
        let share = |id: &str| {
            PanelSpec::new(
                id,
                "Share",
                PanelKind::Share {
                    column: Column::RemoteRatio,
                },
                &[],
            )
        };
        let mut config = Config::default();
        config.panels.custom = vec![share("remote"), share("countries"), share("remote")];

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate panel id 'remote'"));

        config.panels.custom.pop();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[selection]\ndefault_top_n = 7\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.selection.default_top_n, 7);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[selection]\ndefault_top_n = 0\n")
            .unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[selection]"));
        assert!(toml_str.contains("year_order = \"first_seen\""));
    }
}
