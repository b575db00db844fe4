mod model;
mod preprocess;
pub mod report;
mod solve;
mod split;

use std::path::PathBuf;

use chrono::Utc;
use nalgebra::DVector;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::dataset::{load_cleaned_table, TravelRecord};
use crate::error::PipelineError;

pub use model::{ModelStore, TrainedModel, FEATURE_COLUMNS, TARGET_COLUMN};
pub use report::RegressionMetrics;

/// Smallest table that still leaves a held-out row after the split.
pub const MIN_TRAINING_ROWS: usize = 5;
pub const TEST_FRACTION: f64 = 0.2;
pub const SPLIT_SEED: u64 = 42;

/// Fits the duration model from the cleaned table and stores it.
#[derive(Debug, Clone)]
pub struct RegressionTrainer {
    cleaned_table: PathBuf,
    store: ModelStore,
}

impl RegressionTrainer {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            cleaned_table: config.cleaned_table.clone(),
            store: ModelStore::new(&config.model_artifact),
        }
    }

    /// Refits from the full current cleaned table and replaces the stored model.
    ///
    /// Any failure leaves the previously stored model untouched.
    pub fn retrain(&self) -> Result<TrainedModel, PipelineError> {
        let records = load_cleaned_table(&self.cleaned_table)?;
        let model = fit(&records)?;
        self.store.save(&model)?;
        info!(
            artifact = %self.store.path().display(),
            mae = model.mae,
            train_rows = model.train_rows,
            test_rows = model.test_rows,
            "duration model stored"
        );
        Ok(model)
    }
}

/// Seeded 80/20 split, OLS on the training rows, MAE on the held-out rows.
pub fn fit(records: &[TravelRecord]) -> Result<TrainedModel, PipelineError> {
    let rows = preprocess::select_training_rows(records);
    if rows.len() < records.len() {
        warn!(
            skipped = records.len() - rows.len(),
            "rows with non-finite training values skipped"
        );
    }
    if rows.len() < MIN_TRAINING_ROWS {
        return Err(PipelineError::InsufficientData {
            required: MIN_TRAINING_ROWS,
            actual: rows.len(),
        });
    }

    let (train_idx, test_idx) = split::train_test_indices(rows.len(), TEST_FRACTION, SPLIT_SEED);
    let train = rows.subset(&train_idx);
    let test = rows.subset(&test_idx);
    debug!(train = train.len(), test = test.len(), "split training rows");

    let design = preprocess::build_design_matrix(&train.features);
    let beta = solve::solve_linear(&design, &train.target_vector())?;

    let test_design = preprocess::build_design_matrix(&test.features);
    let predictions: DVector<f64> = &test_design * &beta;
    let metrics = solve::compute_metrics(&test.target_vector(), &predictions)?;

    let model = TrainedModel {
        features: FEATURE_COLUMNS.iter().map(|f| f.to_string()).collect(),
        target: TARGET_COLUMN.to_string(),
        coefficients: [beta[1], beta[2], beta[3]],
        intercept: beta[0],
        mae: metrics.mae,
        rmse: metrics.rmse,
        r2: metrics.r2,
        train_rows: train.len(),
        test_rows: test.len(),
        trained_at: Utc::now(),
    };

    if !model.is_finite() {
        return Err(PipelineError::Fit(
            "fit produced non-finite coefficients or error".to_string(),
        ));
    }
    Ok(model)
}
