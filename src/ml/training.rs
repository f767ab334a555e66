//! Goodness-of-fit metrics recorded after each training run

use serde::{Deserialize, Serialize};

/// In-sample fit quality of a trained model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub mae: f64,  // Mean Absolute Error
    pub rmse: f64, // Root Mean Square Error
    /// Mean Absolute Percentage Error over rows with non-zero profit
    pub mape: Option<f64>,
    pub r2: f64, // R-squared
}

/// Compare fitted values against the training target.
///
/// Returns `None` when the slices are empty or of different lengths.
pub fn calculate_metrics(predictions: &[f64], targets: &[f64]) -> Option<TrainingMetrics> {
    if predictions.len() != targets.len() || predictions.is_empty() {
        return None;
    }

    let n = predictions.len() as f64;
    let pairs = || predictions.iter().zip(targets.iter());

    let mae = pairs().map(|(p, t)| (p - t).abs()).sum::<f64>() / n;

    let mse = pairs().map(|(p, t)| (p - t).powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    // Zero-profit rows have no defined percentage error
    let percentage_errors: Vec<f64> = pairs()
        .filter(|(_, t)| t.abs() > 1e-10)
        .map(|(p, t)| ((p - t) / t).abs() * 100.0)
        .collect();
    let mape = if percentage_errors.is_empty() {
        None
    } else {
        Some(percentage_errors.iter().sum::<f64>() / percentage_errors.len() as f64)
    };

    let mean_target = targets.iter().sum::<f64>() / n;
    let ss_tot: f64 = targets.iter().map(|t| (t - mean_target).powi(2)).sum();
    let ss_res: f64 = pairs().map(|(p, t)| (t - p).powi(2)).sum();

    let r2 = if ss_tot.abs() < 1e-10 {
        0.0
    } else {
        1.0 - (ss_res / ss_tot)
    };

    Some(TrainingMetrics { mae, rmse, mape, r2 })
}
