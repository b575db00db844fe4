//! Per-request duration inference on top of the stored model.

use serde::{Deserialize, Serialize, Serializer};
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::regression::{ModelStore, RegressionTrainer, TrainedModel};

/// Display constant; not derived from the fit.
pub const CONFIDENCE_LABEL: &str = "95%";
pub const MIN_DURATION_DAYS: f64 = 1.0;
pub const MAX_AGE: f64 = 120.0;

const HIGH_ACCOMMODATION_COST: f64 = 1500.0;
const HIGH_TRANSPORTATION_COST: f64 = 1000.0;
const OLDER_TRAVELER_AGE: f64 = 40.0;

/// Prediction request fields as they arrive from a form or command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub age: Option<String>,
    pub accommodation_cost: Option<String>,
    pub transportation_cost: Option<String>,
}

impl PredictionRequest {
    pub fn into_input(self) -> Result<PredictionInput, PipelineError> {
        let age = required_number(self.age, "age")?;
        let accommodation_cost = required_number(self.accommodation_cost, "accommodation_cost")?;
        let transportation_cost =
            required_number(self.transportation_cost, "transportation_cost")?;
        PredictionInput::new(age, accommodation_cost, transportation_cost)
    }
}

fn required_number(raw: Option<String>, field: &str) -> Result<f64, PipelineError> {
    let text = raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PipelineError::MissingInput(format!("'{}' is required", field)))?;
    text.parse::<f64>()
        .map_err(|_| PipelineError::invalid(field, format!("'{}' is not a number", text)))
}

/// Validated model inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionInput {
    age: f64,
    accommodation_cost: f64,
    transportation_cost: f64,
}

impl PredictionInput {
    pub fn new(
        age: f64,
        accommodation_cost: f64,
        transportation_cost: f64,
    ) -> Result<Self, PipelineError> {
        if !age.is_finite() || age <= 0.0 || age > MAX_AGE {
            return Err(PipelineError::invalid(
                "age",
                format!("{} is outside (0, {}]", age, MAX_AGE),
            ));
        }
        for (field, value) in [
            ("accommodation_cost", accommodation_cost),
            ("transportation_cost", transportation_cost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PipelineError::invalid(
                    field,
                    format!("{} must be a non-negative number", value),
                ));
            }
        }

        Ok(Self {
            age,
            accommodation_cost,
            transportation_cost,
        })
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn accommodation_cost(&self) -> f64 {
        self.accommodation_cost
    }

    pub fn transportation_cost(&self) -> f64 {
        self.transportation_cost
    }

    fn as_features(&self) -> [f64; 3] {
        [self.age, self.accommodation_cost, self.transportation_cost]
    }
}

/// Canned reading of a prediction, chosen by a fixed priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripAnalysis {
    HighLodgingCost,
    HighTransportCost,
    OlderTraveler,
    Typical,
}

impl TripAnalysis {
    pub fn for_input(input: &PredictionInput) -> Self {
        if input.accommodation_cost() > HIGH_ACCOMMODATION_COST {
            TripAnalysis::HighLodgingCost
        } else if input.transportation_cost() > HIGH_TRANSPORTATION_COST {
            TripAnalysis::HighTransportCost
        } else if input.age() > OLDER_TRAVELER_AGE {
            TripAnalysis::OlderTraveler
        } else {
            TripAnalysis::Typical
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            TripAnalysis::HighLodgingCost => {
                "Short trip expected: high accommodation cost tends to compress the stay"
            }
            TripAnalysis::HighTransportCost => {
                "Short trip expected: high transportation cost tends to reduce time at the destination"
            }
            TripAnalysis::OlderTraveler => {
                "Longer trip expected: older travelers tend to travel at a slower pace"
            }
            TripAnalysis::Typical => "Typical trip length for comparable travelers",
        }
    }
}

impl Serialize for TripAnalysis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub predicted_duration: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub analysis: TripAnalysis,
    pub confidence: &'static str,
}

impl Prediction {
    /// Clamps to at least one day and widens by the model's MAE on both sides.
    pub fn from_model(model: &TrainedModel, input: &PredictionInput) -> Self {
        let raw = model.predict_raw(input.as_features());
        let predicted_duration = round1(raw).max(MIN_DURATION_DAYS);
        let lower_bound = round1(predicted_duration - model.mae).max(MIN_DURATION_DAYS);
        let upper_bound = round1(predicted_duration + model.mae);

        Self {
            predicted_duration,
            lower_bound,
            upper_bound,
            analysis: TripAnalysis::for_input(input),
            confidence: CONFIDENCE_LABEL,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    /// A stored model was already present.
    Ready,
    /// No model existed, so one was trained from the cleaned table.
    Trained,
}

pub struct PredictionService {
    store: ModelStore,
    trainer: RegressionTrainer,
}

impl PredictionService {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            store: ModelStore::new(&config.model_artifact),
            trainer: RegressionTrainer::new(config),
        }
    }

    /// Trains once when no model is stored; otherwise leaves the store alone.
    pub fn ensure_model_trained(&self) -> Result<ModelStatus, PipelineError> {
        if self.store.load()?.is_some() {
            return Ok(ModelStatus::Ready);
        }
        info!(artifact = %self.store.path().display(), "no stored model, training one");
        self.trainer.retrain()?;
        Ok(ModelStatus::Trained)
    }

    /// Read-only: fails with `DataUnavailable` when no model is stored.
    pub fn predict(&self, input: &PredictionInput) -> Result<Prediction, PipelineError> {
        let model = self.store.load()?.ok_or_else(|| {
            PipelineError::DataUnavailable(format!(
                "no trained model at '{}'; train one first",
                self.store.path().display()
            ))
        })?;
        Ok(Prediction::from_model(&model, input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::Utc;
    use tempfile::tempdir;

    fn model(coefficients: [f64; 3], intercept: f64, mae: f64) -> TrainedModel {
        TrainedModel {
            coefficients,
            intercept,
            mae,
            ..TrainedModel::blank(Utc::now())
        }
    }

    fn input(age: f64, acc: f64, trans: f64) -> PredictionInput {
        PredictionInput::new(age, acc, trans).unwrap()
    }

    #[test]
    fn interval_is_prediction_plus_minus_mae() {
        let m = model([0.1, 0.0, 0.0], 4.0, 1.5);
        let p = Prediction::from_model(&m, &input(30.0, 100.0, 100.0));

        assert_abs_diff_eq!(p.predicted_duration, 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.lower_bound, 5.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p.upper_bound, 8.5, epsilon = 1e-12);
        assert_eq!(p.confidence, "95%");
    }

    #[test]
    fn negative_predictions_clamp_to_one_day() {
        let m = model([0.0, -0.01, -0.01], 2.0, 3.0);
        let p = Prediction::from_model(&m, &input(30.0, 5000.0, 5000.0));

        assert_eq!(p.predicted_duration, 1.0);
        assert_eq!(p.lower_bound, 1.0);
        assert_abs_diff_eq!(p.upper_bound, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn analysis_follows_priority_order() {
        assert_eq!(
            TripAnalysis::for_input(&input(50.0, 1600.0, 2000.0)),
            TripAnalysis::HighLodgingCost
        );
        assert_eq!(
            TripAnalysis::for_input(&input(50.0, 1500.0, 1001.0)),
            TripAnalysis::HighTransportCost
        );
        assert_eq!(
            TripAnalysis::for_input(&input(41.0, 100.0, 1000.0)),
            TripAnalysis::OlderTraveler
        );
        assert_eq!(
            TripAnalysis::for_input(&input(40.0, 100.0, 100.0)),
            TripAnalysis::Typical
        );
    }

    #[test]
    fn input_validation_rejects_out_of_range_values() {
        for (age, acc, trans) in [
            (0.0, 1.0, 1.0),
            (121.0, 1.0, 1.0),
            (f64::NAN, 1.0, 1.0),
            (30.0, -1.0, 1.0),
            (30.0, 1.0, f64::INFINITY),
        ] {
            let err = PredictionInput::new(age, acc, trans).unwrap_err();
            assert_eq!(err.kind(), "invalid_input");
        }
        assert!(PredictionInput::new(120.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn request_distinguishes_missing_from_malformed() {
        let missing = PredictionRequest {
            age: Some("30".to_string()),
            accommodation_cost: None,
            transportation_cost: Some("100".to_string()),
        };
        assert_eq!(missing.into_input().unwrap_err().kind(), "missing_input");

        let malformed = PredictionRequest {
            age: Some("thirty".to_string()),
            accommodation_cost: Some("100".to_string()),
            transportation_cost: Some("100".to_string()),
        };
        assert_eq!(malformed.into_input().unwrap_err().kind(), "invalid_input");
    }

    #[test]
    fn predict_without_model_reports_data_unavailable() {
        let dir = tempdir().unwrap();
        let service = PredictionService::new(&PipelineConfig::in_dir(dir.path()));

        let err = service.predict(&input(30.0, 100.0, 100.0)).unwrap_err();
        assert_eq!(err.kind(), "data_unavailable");
    }

    #[test]
    fn stored_model_is_used_without_retraining() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::in_dir(dir.path());
        ModelStore::new(&config.model_artifact)
            .save(&model([0.0, 0.0, 0.0], 6.0, 0.5))
            .unwrap();

        let service = PredictionService::new(&config);
        assert_eq!(service.ensure_model_trained().unwrap(), ModelStatus::Ready);

        let p = service.predict(&input(30.0, 100.0, 100.0)).unwrap();
        assert_abs_diff_eq!(p.predicted_duration, 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.lower_bound, 5.5, epsilon = 1e-12);
    }

    #[test]
    fn response_serializes_analysis_as_text() {
        let m = model([0.0, 0.0, 0.0], 5.0, 1.0);
        let p = Prediction::from_model(&m, &input(50.0, 100.0, 100.0));
        let body = serde_json::to_value(&p).unwrap();

        assert_eq!(body["analysis"], TripAnalysis::OlderTraveler.message());
        assert_eq!(body["confidence"], "95%");
        assert_eq!(body["predicted_duration"], 5.0);
    }
}
