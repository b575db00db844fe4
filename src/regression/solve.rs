use nalgebra::{DMatrix, DVector};

use crate::error::PipelineError;

use super::report::RegressionMetrics;

const SVD_EPSILON: f64 = 1e-12;

/// Ordinary least squares on a design matrix whose first column is the intercept.
pub(crate) fn solve_linear(
    design: &DMatrix<f64>,
    target: &DVector<f64>,
) -> Result<DVector<f64>, PipelineError> {
    let gram = design.transpose() * design;
    let rhs = design.transpose() * target;

    if let Some(chol) = gram.cholesky() {
        return Ok(chol.solve(&rhs));
    }

    // Collinear or constant columns: take the minimum-norm least-squares solution.
    design
        .clone()
        .svd(true, true)
        .solve(target, SVD_EPSILON)
        .map_err(|reason| PipelineError::Fit(reason.to_string()))
}

pub(crate) fn compute_metrics(
    actual: &DVector<f64>,
    predicted: &DVector<f64>,
) -> Result<RegressionMetrics, PipelineError> {
    let n = actual.len();
    if n == 0 || predicted.len() != n {
        return Err(PipelineError::Fit(
            "cannot compute metrics without matching observations".to_string(),
        ));
    }

    let residuals = actual - predicted;
    let ss_res = residuals.iter().map(|r| r * r).sum::<f64>();

    let mean_actual = actual.iter().sum::<f64>() / n as f64;
    let ss_tot = actual
        .iter()
        .map(|value| {
            let diff = value - mean_actual;
            diff * diff
        })
        .sum::<f64>();

    let r2 = (ss_tot.is_finite() && ss_tot > 0.0).then(|| 1.0 - (ss_res / ss_tot));
    let rmse = (ss_res / n as f64).sqrt();
    let mae = residuals.iter().map(|r| r.abs()).sum::<f64>() / n as f64;

    Ok(RegressionMetrics { r2, rmse, mae })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample_design_and_target() -> (DMatrix<f64>, DVector<f64>) {
        let design = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let target = DVector::from_vec(vec![1.0, 3.0, 5.0]);
        (design, target)
    }

    #[test]
    fn solve_linear_recovers_exact_coefficients() {
        let (design, target) = sample_design_and_target();
        let beta = solve_linear(&design, &target).expect("ols solution");

        assert_abs_diff_eq!(beta[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(beta[1], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn solve_linear_handles_constant_feature_column() {
        // Second feature is all zeros, so the Gram matrix is singular.
        let design = DMatrix::from_row_slice(
            3,
            3,
            &[1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 2.0, 0.0],
        );
        let target = DVector::from_vec(vec![1.0, 3.0, 5.0]);
        let beta = solve_linear(&design, &target).expect("least-squares solution");

        let fitted = &design * &beta;
        for (fit, actual) in fitted.iter().zip(target.iter()) {
            assert_abs_diff_eq!(*fit, *actual, epsilon = 1e-8);
        }
        assert_abs_diff_eq!(beta[2], 0.0, epsilon = 1e-8);
    }

    #[test]
    fn compute_metrics_handles_perfect_fit() {
        let actual = DVector::from_vec(vec![1.0, 3.0, 5.0]);
        let predicted = actual.clone();
        let metrics = compute_metrics(&actual, &predicted).expect("metrics");

        assert_eq!(metrics.r2, Some(1.0));
        assert_abs_diff_eq!(metrics.rmse, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.mae, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn mae_averages_absolute_residuals() {
        let actual = DVector::from_vec(vec![2.0, 4.0, 6.0, 8.0]);
        let predicted = DVector::from_vec(vec![3.0, 3.0, 6.0, 10.0]);
        let metrics = compute_metrics(&actual, &predicted).expect("metrics");

        assert_abs_diff_eq!(metrics.mae, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn single_observation_has_no_r2() {
        let actual = DVector::from_vec(vec![7.0]);
        let predicted = DVector::from_vec(vec![6.5]);
        let metrics = compute_metrics(&actual, &predicted).expect("metrics");

        assert_eq!(metrics.r2, None);
        assert_abs_diff_eq!(metrics.mae, 0.5, epsilon = 1e-12);
    }
}
