use super::model::TrainedModel;

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionMetrics {
    /// Undefined when the test targets have zero variance.
    pub r2: Option<f64>,
    pub rmse: f64,
    pub mae: f64,
}

/// Human-readable training summary, one line per item.
pub fn render(model: &TrainedModel) -> String {
    let mut lines = Vec::new();
    lines.push("Model: ordinary least squares".to_string());
    lines.push(format!("Target: {}", model.target));
    lines.push(format!("Features: {}", model.features.join(", ")));
    lines.push(format!(
        "Rows: {} train / {} test",
        model.train_rows, model.test_rows
    ));
    lines.push(format!(
        "Trained at: {}",
        model
            .trained_at
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    ));

    lines.push(String::new());
    lines.push("Metrics (held-out):".to_string());
    lines.push(format!("  MAE: {:.6}", model.mae));
    lines.push(format!("  RMSE: {:.6}", model.rmse));
    match model.r2 {
        Some(r2) => lines.push(format!("  R^2: {:.6}", r2)),
        None => lines.push("  R^2: n/a".to_string()),
    }

    lines.push(String::new());
    lines.push("Coefficients:".to_string());
    lines.push(format!("  {:<20} {:>12.6}", "intercept", model.intercept));
    for (name, value) in model.features.iter().zip(model.coefficients.iter()) {
        lines.push(format!("  {:<20} {:>12.6}", name, value));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn render_lists_metrics_and_coefficients() {
        let model = TrainedModel {
            coefficients: [0.1, -0.001, 0.002],
            intercept: 5.0,
            mae: 1.25,
            rmse: 1.5,
            r2: None,
            ..TrainedModel::blank(Utc::now())
        };

        let text = render(&model);
        assert!(text.contains("MAE: 1.250000"));
        assert!(text.contains("R^2: n/a"));
        assert!(text.contains("Traveler age"));
        assert!(text.contains("intercept"));
    }
}
