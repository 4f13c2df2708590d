//! Application Configuration
//! Source file locations and chart settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "SUBURB_INSIGHTS_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Locations of the three input datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub census_csv: PathBuf,
    pub geography_workbook: PathBuf,
    pub geography_sheet: String,
    pub crime_csv: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            census_csv: PathBuf::from("2021Census_G02_NSW_SAL.csv"),
            geography_workbook: PathBuf::from("2021Census_geog_desc_1st_2nd_3rd_release.xlsx"),
            geography_sheet: "2021_ASGS_Non_ABS_Structures".to_string(),
            crime_csv: PathBuf::from("SuburbData25Q1.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sources: SourceConfig,
    /// Number of suburbs shown in the bar chart
    pub top_suburbs: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: SourceConfig::default(),
            top_suburbs: 20,
        }
    }
}

impl AppConfig {
    /// Load from the file named by `SUBURB_INSIGHTS_CONFIG`, or fall back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
