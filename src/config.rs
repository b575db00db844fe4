use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::dataset::features::RegionTable;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const CLEANED_TABLE_FILE: &str = "cleaned_travel_data.csv";
pub const MODEL_ARTIFACT_FILE: &str = "model/travel_model.json";

/// Locations and lookup tables shared by every pipeline component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub cleaned_table: PathBuf,
    pub model_artifact: PathBuf,
    pub regions: RegionTable,
}

impl PipelineConfig {
    /// Conventional layout under a single data directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            cleaned_table: dir.join(CLEANED_TABLE_FILE),
            model_artifact: dir.join(MODEL_ARTIFACT_FILE),
            regions: RegionTable::default(),
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let defaults = Self::in_dir(DEFAULT_DATA_DIR);
        let regions = match &cli.regions {
            Some(path) => RegionTable::from_path(path)?,
            None => defaults.regions,
        };

        Ok(Self {
            cleaned_table: cli.cleaned_table.clone().unwrap_or(defaults.cleaned_table),
            model_artifact: cli.model.clone().unwrap_or(defaults.model_artifact),
            regions,
        })
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.cleaned_table.as_os_str().is_empty(),
            "cleaned table path must not be empty"
        );
        ensure!(
            !self.model_artifact.as_os_str().is_empty(),
            "model artifact path must not be empty"
        );
        ensure!(
            self.cleaned_table != self.model_artifact,
            "cleaned table and model artifact must be different files ({})",
            self.cleaned_table.display()
        );
        self.regions.validate()
    }

    pub fn summary(&self) -> String {
        format!(
            concat!("Cleaned table: {}\n", "Model artifact: {}\n", "Regions: {}"),
            self.cleaned_table.display(),
            self.model_artifact.display(),
            self.regions
                .regions
                .iter()
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_live_under_data_dir() {
        let cli = Cli::parse_from(["trip-duration", "train"]);
        let config = PipelineConfig::from_cli(&cli).unwrap();

        assert_eq!(
            config.cleaned_table,
            Path::new("data").join("cleaned_travel_data.csv")
        );
        assert_eq!(
            config.model_artifact,
            Path::new("data").join("model/travel_model.json")
        );
        config.validate().unwrap();
    }

    #[test]
    fn cli_paths_override_defaults() {
        let cli = Cli::parse_from([
            "trip-duration",
            "train",
            "--cleaned-table",
            "/tmp/t.csv",
            "--model",
            "/tmp/m.json",
        ]);
        let config = PipelineConfig::from_cli(&cli).unwrap();

        assert_eq!(config.cleaned_table, PathBuf::from("/tmp/t.csv"));
        assert_eq!(config.model_artifact, PathBuf::from("/tmp/m.json"));
    }

    #[test]
    fn identical_paths_fail_validation() {
        let mut config = PipelineConfig::in_dir("data");
        config.model_artifact = config.cleaned_table.clone();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must be different files"));
    }

    #[test]
    fn summary_lists_regions() {
        let summary = PipelineConfig::in_dir("data").summary();
        assert!(summary.contains("Europe, North America, Asia, Oceania"));
    }
}
