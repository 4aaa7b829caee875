//! Accuracy metrics for evaluating forecasts against observed values

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    Ok(())
}

/// Mean Absolute Percentage Error, in percent
///
/// Entries with a zero actual value are excluded from the mean rather than
/// zero-padded. An empty input, or one where every actual value is zero,
/// yields 0.0: a floor to avoid division by zero, not a claim of perfect
/// accuracy.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let mut sum = 0.0;
    let mut count = 0usize;
    for (&a, &p) in actual.iter().zip(predicted.iter()) {
        if a != 0.0 {
            sum += ((a - p) / a).abs() * 100.0;
            count += 1;
        }
    }

    if count == 0 {
        return Ok(0.0);
    }
    Ok(sum / count as f64)
}

/// Mean Absolute Error
pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    if actual.is_empty() {
        return Ok(0.0);
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Root Mean Squared Error
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    if actual.is_empty() {
        return Ok(0.0);
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Ok((sum / actual.len() as f64).sqrt())
}

/// The three accuracy metrics computed together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean Absolute Percentage Error, in percent
    pub mape: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
}

/// Calculate all three metrics at once
///
/// Every caller in this crate goes through here so each sees consistent
/// values computed from the same pair of sequences.
pub fn calculate_all(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    Ok(AccuracyMetrics {
        mape: mape(actual, predicted)?,
        mae: mae(actual, predicted)?,
        rmse: rmse(actual, predicted)?,
    })
}

impl std::fmt::Display for AccuracyMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAPE:  {:.4}%", self.mape)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        Ok(())
    }
}
