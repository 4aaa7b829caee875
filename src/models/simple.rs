//! Simple Exponential Smoothing (SES)
//!
//! Level-only smoothing for series without trend or seasonality. The SES
//! forecast function is flat: every future step equals the one-step-ahead
//! forecast from the last observation.

use crate::error::{ForecastError, Result};
use crate::models::{validate_steps, validate_weight, SmoothingParams, SmoothingResult};
use crate::optimize::minimize_bounded;

/// Simple exponential smoothing model
#[derive(Debug, Clone, Copy)]
pub struct SimpleExponentialSmoothing;

impl SimpleExponentialSmoothing {
    /// Minimum number of observations SES can fit
    pub const MIN_PERIODS: usize = 2;

    /// Fit and forecast `steps` periods ahead
    ///
    /// When `optimize` is set or `alpha` is missing, alpha is fitted by
    /// minimizing the in-sample sum of squared one-step errors; otherwise the
    /// supplied value is used as-is after bounds validation.
    pub fn predict(
        data: &[f64],
        alpha: Option<f64>,
        optimize: bool,
        steps: usize,
    ) -> Result<SmoothingResult> {
        validate_steps(steps)?;
        if data.len() < Self::MIN_PERIODS {
            return Err(ForecastError::InsufficientData {
                required: Self::MIN_PERIODS,
                available: data.len(),
            });
        }

        let alpha = match alpha {
            Some(a) if !optimize => validate_weight("alpha", a)?,
            _ => {
                let best = minimize_bounded(|p| Self::sse(data, p[0]), 1)?;
                best[0]
            }
        };

        let fitted = Self::fitted_values(data, alpha);

        // Flat forecast function: the level after the last observation
        let next = alpha * data[data.len() - 1] + (1.0 - alpha) * fitted[fitted.len() - 1];
        let future_forecasts = vec![next; steps];

        Ok(SmoothingResult {
            forecast: next,
            parameters: SmoothingParams::simple(alpha),
            fitted_values: fitted,
            future_forecasts,
        })
    }

    /// One-step-ahead estimates: F(0) = Y(0), F(t) = a*Y(t-1) + (1-a)*F(t-1)
    fn fitted_values(data: &[f64], alpha: f64) -> Vec<f64> {
        let mut fitted = Vec::with_capacity(data.len());
        fitted.push(data[0]);
        for t in 1..data.len() {
            let prev = fitted[t - 1];
            fitted.push(alpha * data[t - 1] + (1.0 - alpha) * prev);
        }
        fitted
    }

    fn sse(data: &[f64], alpha: f64) -> f64 {
        let fitted = Self::fitted_values(data, alpha);
        data.iter()
            .zip(fitted.iter())
            .map(|(y, f)| (y - f).powi(2))
            .sum()
    }
}
