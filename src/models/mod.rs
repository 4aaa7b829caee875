//! Exponential smoothing models for monthly revenue series

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Smoothing parameters, fitted or supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    /// Level smoothing weight
    pub alpha: f64,
    /// Trend smoothing weight (DES/TES)
    pub beta: Option<f64>,
    /// Seasonal smoothing weight (TES)
    pub gamma: Option<f64>,
    /// Length of the seasonal cycle (TES)
    pub seasonal_periods: Option<usize>,
}

impl SmoothingParams {
    /// Parameters for a simple (level-only) model
    pub fn simple(alpha: f64) -> Self {
        Self {
            alpha,
            beta: None,
            gamma: None,
            seasonal_periods: None,
        }
    }

    /// Parameters for a level + trend model
    pub fn double(alpha: f64, beta: f64) -> Self {
        Self {
            alpha,
            beta: Some(beta),
            gamma: None,
            seasonal_periods: None,
        }
    }

    /// Parameters for a level + trend + seasonal model
    pub fn triple(alpha: f64, beta: f64, gamma: f64, seasonal_periods: usize) -> Self {
        Self {
            alpha,
            beta: Some(beta),
            gamma: Some(gamma),
            seasonal_periods: Some(seasonal_periods),
        }
    }
}

/// Validate a smoothing weight against its `[0, 1]` bounds
pub(crate) fn validate_weight(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ForecastError::InvalidParameter(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(value)
}

/// Result of fitting a smoothing model and forecasting ahead
///
/// Produced fresh per request and never mutated afterwards. The orchestrator
/// extracts fields from it into the persisted forecast record; the result
/// itself is not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingResult {
    /// Point forecast for the final requested step
    pub forecast: f64,
    /// Parameters actually used (fitted or supplied)
    pub parameters: SmoothingParams,
    /// One-step-ahead in-sample estimates, one per observation
    pub fitted_values: Vec<f64>,
    /// Forecasts for steps 1..=horizon beyond the series
    pub future_forecasts: Vec<f64>,
}

impl SmoothingResult {
    /// Serialize the result to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ForecastError::InvalidParameter(format!("serialization failed: {}", e)))
    }
}

/// Validate the requested forecast horizon
pub(crate) fn validate_steps(steps: usize) -> Result<usize> {
    if steps == 0 {
        return Err(ForecastError::InvalidParameter(
            "forecast horizon must be at least 1 step".to_string(),
        ));
    }
    Ok(steps)
}

pub mod double;
pub mod simple;
pub mod triple;
