//! Double Exponential Smoothing (DES / Holt's linear method)
//!
//! Level + additive trend for series with a trend but no seasonality.
//!
//! ```text
//! Level: L(t) = a*Y(t) + (1-a)*(L(t-1) + T(t-1))
//! Trend: T(t) = b*(L(t) - L(t-1)) + (1-b)*T(t-1)
//! Forecast h ahead: L(n) + h*T(n)
//! ```

use crate::error::{ForecastError, Result};
use crate::models::{validate_steps, validate_weight, SmoothingParams, SmoothingResult};
use crate::optimize::minimize_bounded;

/// Double exponential smoothing model
#[derive(Debug, Clone, Copy)]
pub struct DoubleExponentialSmoothing;

struct HoltState {
    level: Vec<f64>,
    trend: Vec<f64>,
}

impl DoubleExponentialSmoothing {
    /// Minimum number of observations DES can fit
    pub const MIN_PERIODS: usize = 3;

    /// Fit and forecast `steps` periods ahead
    ///
    /// When `optimize` is set or either weight is missing, both are fitted by
    /// minimizing the in-sample sum of squared one-step errors.
    pub fn predict(
        data: &[f64],
        alpha: Option<f64>,
        beta: Option<f64>,
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

        let (alpha, beta) = match (alpha, beta) {
            (Some(a), Some(b)) if !optimize => {
                (validate_weight("alpha", a)?, validate_weight("beta", b)?)
            }
            _ => {
                let best = minimize_bounded(|p| Self::sse(data, p[0], p[1]), 2)?;
                (best[0], best[1])
            }
        };

        let state = Self::smooth(data, alpha, beta);
        let fitted = Self::fitted_values(data, &state);

        let last_level = state.level[state.level.len() - 1];
        let last_trend = state.trend[state.trend.len() - 1];
        let future_forecasts: Vec<f64> = (1..=steps)
            .map(|h| last_level + h as f64 * last_trend)
            .collect();

        Ok(SmoothingResult {
            forecast: future_forecasts[steps - 1],
            parameters: SmoothingParams::double(alpha, beta),
            fitted_values: fitted,
            future_forecasts,
        })
    }

    fn smooth(data: &[f64], alpha: f64, beta: f64) -> HoltState {
        let n = data.len();
        let mut level = Vec::with_capacity(n);
        let mut trend = Vec::with_capacity(n);

        level.push(data[0]);
        trend.push(data[1] - data[0]);

        for t in 1..n {
            let l_prev = level[t - 1];
            let t_prev = trend[t - 1];
            let l = alpha * data[t] + (1.0 - alpha) * (l_prev + t_prev);
            let b = beta * (l - l_prev) + (1.0 - beta) * t_prev;
            level.push(l);
            trend.push(b);
        }

        HoltState { level, trend }
    }

    /// One-step-ahead estimates: F(t) = L(t-1) + T(t-1), seeded with Y(0)
    fn fitted_values(data: &[f64], state: &HoltState) -> Vec<f64> {
        let mut fitted = Vec::with_capacity(data.len());
        fitted.push(data[0]);
        for t in 1..data.len() {
            fitted.push(state.level[t - 1] + state.trend[t - 1]);
        }
        fitted
    }

    fn sse(data: &[f64], alpha: f64, beta: f64) -> f64 {
        let state = Self::smooth(data, alpha, beta);
        // One-step errors from the second observation on; the first has no
        // prior state to forecast from.
        (1..data.len())
            .map(|t| {
                let f = state.level[t - 1] + state.trend[t - 1];
                (data[t] - f).powi(2)
            })
            .sum()
    }
}
