use nalgebra::{DMatrix, DVector};

use crate::dataset::TravelRecord;

/// Feature rows and targets ready for fitting.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TrainingRows {
    pub features: Vec<[f64; 3]>,
    pub targets: Vec<f64>,
}

impl TrainingRows {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn subset(&self, indices: &[usize]) -> TrainingRows {
        TrainingRows {
            features: indices.iter().map(|&i| self.features[i]).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }

    pub fn target_vector(&self) -> DVector<f64> {
        DVector::from_vec(self.targets.clone())
    }
}

/// Picks age and both costs against duration, skipping rows with non-finite values.
pub(crate) fn select_training_rows(records: &[TravelRecord]) -> TrainingRows {
    let mut rows = TrainingRows::default();
    for record in records {
        let features = [
            record.age,
            record.accommodation_cost,
            record.transportation_cost,
        ];
        if features.iter().all(|v| v.is_finite()) && record.duration.is_finite() {
            rows.features.push(features);
            rows.targets.push(record.duration);
        }
    }
    rows
}

pub(crate) fn build_design_matrix(features: &[[f64; 3]]) -> DMatrix<f64> {
    let rows = features.len();
    let mut buffer = Vec::with_capacity(rows * 4);

    for row in features {
        buffer.push(1.0); // intercept
        buffer.extend(row.iter().copied());
    }

    DMatrix::from_row_slice(rows, 4, &buffer)
}
