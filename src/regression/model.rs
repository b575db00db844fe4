use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::record::{
    ACCOMMODATION_COST_COLUMN, AGE_COLUMN, DURATION_COLUMN, TRANSPORTATION_COST_COLUMN,
};
use crate::error::PipelineError;
use crate::storage::write_atomically;

pub const FEATURE_COLUMNS: [&str; 3] = [
    AGE_COLUMN,
    ACCOMMODATION_COST_COLUMN,
    TRANSPORTATION_COST_COLUMN,
];
pub const TARGET_COLUMN: &str = DURATION_COLUMN;

/// Fitted duration model. The MAE travels in the same artifact as the
/// coefficients so the two are always replaced together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub features: Vec<String>,
    pub target: String,
    /// Weights for age, accommodation cost and transportation cost, in that order.
    pub coefficients: [f64; 3],
    pub intercept: f64,
    /// Mean absolute error on the held-out split, in days.
    pub mae: f64,
    pub rmse: f64,
    pub r2: Option<f64>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub trained_at: DateTime<Utc>,
}

impl TrainedModel {
    pub fn predict_raw(&self, features: [f64; 3]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(weight, value)| weight * value)
                .sum::<f64>()
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.coefficients.iter().all(|c| c.is_finite())
            && self.intercept.is_finite()
            && self.mae.is_finite()
            && self.rmse.is_finite()
    }

    #[cfg(test)]
    pub(crate) fn blank(trained_at: DateTime<Utc>) -> Self {
        Self {
            features: FEATURE_COLUMNS.iter().map(|f| f.to_string()).collect(),
            target: TARGET_COLUMN.to_string(),
            coefficients: [0.0; 3],
            intercept: 0.0,
            mae: 0.0,
            rmse: 0.0,
            r2: None,
            train_rows: 0,
            test_rows: 0,
            trained_at,
        }
    }
}

/// File-backed home of the single trained model.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` when no model has been trained yet.
    pub fn load(&self) -> Result<Option<TrainedModel>, PipelineError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw =
            fs::read_to_string(&self.path).map_err(|err| PipelineError::io(&self.path, err))?;
        let model: TrainedModel =
            serde_json::from_str(&raw).map_err(|err| PipelineError::format(&self.path, err))?;
        Ok(Some(model))
    }

    pub fn save(&self, model: &TrainedModel) -> Result<(), PipelineError> {
        let body = serde_json::to_vec_pretty(model)
            .map_err(|err| PipelineError::format(&self.path, err))?;
        write_atomically(&self.path, |out| {
            out.write_all(&body)
                .map_err(|err| PipelineError::io(&self.path, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tempfile::tempdir;

    #[test]
    fn predict_raw_is_dot_product_plus_intercept() {
        let model = TrainedModel {
            coefficients: [2.0, 0.01, 0.02],
            intercept: 1.5,
            ..TrainedModel::blank(Utc::now())
        };
        assert_abs_diff_eq!(model.predict_raw([30.0, 500.0, 300.0]), 72.5, epsilon = 1e-12);
    }

    #[test]
    fn absent_artifact_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn saved_model_loads_back() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model").join("travel_model.json"));
        let model = TrainedModel {
            coefficients: [0.25, -0.5, 0.125],
            intercept: 3.0,
            mae: 1.5,
            r2: Some(0.75),
            train_rows: 8,
            test_rows: 2,
            ..TrainedModel::blank(Utc::now())
        };

        store.save(&model).unwrap();
        assert_eq!(store.load().unwrap(), Some(model));
    }

    #[test]
    fn corrupt_artifact_is_an_io_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "not json").unwrap();

        let err = ModelStore::new(&path).load().unwrap_err();
        assert_eq!(err.kind(), "io_failure");
    }
}
