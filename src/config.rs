//! Runtime configuration
//!
//! Defaults match the files shipped next to the dashboard. A JSON config file
//! may override any subset of fields; the CLI applies its flags on top.

use crate::categories::CategoryTableVersion;
use crate::error::DashboardError;
use crate::stats::{DEFAULT_HISTOGRAM_BINS, MAX_HISTOGRAM_BINS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default dataset location
pub const DEFAULT_DATASET_PATH: &str = "clustering_results.csv";

/// Default classifier artifact location
pub const DEFAULT_MODEL_PATH: &str = "decision_tree_model.json";

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Clustering results CSV
    pub dataset_path: PathBuf,
    /// Classifier artifact (JSON decision tree)
    pub model_path: PathBuf,
    /// Bins used by the distribution view
    pub histogram_bins: usize,
    /// Category table used to decode primary-use codes
    pub category_table: CategoryTableVersion,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            category_table: CategoryTableVersion::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.histogram_bins == 0 || self.histogram_bins > MAX_HISTOGRAM_BINS {
            return Err(DashboardError::Config(format!(
                "histogram_bins must be between 1 and {MAX_HISTOGRAM_BINS}, got {}",
                self.histogram_bins
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.dataset_path, PathBuf::from("clustering_results.csv"));
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.category_table, CategoryTableVersion::Full);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            DashboardConfig::from_json(r#"{"model_path": "models/tree.json", "category_table": "legacy"}"#)
                .unwrap();

        assert_eq!(
            config,
            DashboardConfig {
                model_path: PathBuf::from("models/tree.json"),
                category_table: CategoryTableVersion::Legacy,
                ..DashboardConfig::default()
            }
        );
    }

    #[test]
    fn test_rejects_zero_bins_and_unknown_fields() {
        assert!(matches!(
            DashboardConfig::from_json(r#"{"histogram_bins": 0}"#),
            Err(DashboardError::Config(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{"bins": 10}"#),
            Err(DashboardError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_bins() {
        let json = format!(r#"{{"histogram_bins": {}}}"#, MAX_HISTOGRAM_BINS + 1);
        let err = DashboardConfig::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("histogram_bins must be between 1 and 1000"));

        let json = format!(r#"{{"histogram_bins": {}}}"#, MAX_HISTOGRAM_BINS);
        assert!(DashboardConfig::from_json(&json).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{"histogram_bins": 12}"#).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.histogram_bins, 12);

        assert!(matches!(
            DashboardConfig::load(&dir.path().join("missing.json")),
            Err(DashboardError::Io(_))
        ));
    }
}
