//! Forecast orchestration: drives the smoothing models against leakage-safe
//! training data and packages everything a persisted forecast record needs.

use crate::data::{HistoricalDataProvider, MonthlySeries, Period, RevenueDataSource};
use crate::error::{ForecastError, Result};
use crate::metrics::{self, AccuracyMetrics};
use crate::models::double::DoubleExponentialSmoothing;
use crate::models::simple::SimpleExponentialSmoothing;
use crate::models::triple::{TripleExponentialSmoothing, DEFAULT_SEASONAL_PERIODS};
use crate::models::{SmoothingParams, SmoothingResult};
use serde::{Deserialize, Serialize};

/// Forecasting method tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Method {
    /// Simple Exponential Smoothing
    Ses,
    /// Double Exponential Smoothing (Holt)
    Des,
    /// Triple Exponential Smoothing (Holt-Winters)
    Tes,
    /// Scenario-banded hybrid on a TES base
    Hybrid,
}

impl Method {
    /// Short uppercase tag used in persisted records
    pub fn tag(&self) -> &'static str {
        match self {
            Method::Ses => "SES",
            Method::Des => "DES",
            Method::Tes => "TES",
            Method::Hybrid => "HYBRID",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Back-test of a forecast against the recorded actual value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActualComparison {
    /// Observed total for the target period
    pub actual: f64,
    /// Absolute forecast error
    pub error_abs: f64,
    /// Forecast error as a percentage of the actual value
    pub error_pct: f64,
    /// 100 minus the percentage error
    pub accuracy: f64,
}

impl ActualComparison {
    /// Compare a forecast against the observed total
    pub fn new(forecast: f64, actual: f64) -> Self {
        let error_abs = (forecast - actual).abs();
        let error_pct = if actual > 0.0 {
            error_abs / actual * 100.0
        } else {
            0.0
        };
        Self {
            actual,
            error_abs,
            error_pct,
            accuracy: 100.0 - error_pct,
        }
    }
}

/// Everything a persisted forecast record needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// Method that produced the forecast
    pub method: Method,
    /// Vehicle category scope, `None` = all categories
    pub category: Option<i64>,
    /// The period the forecast targets
    pub target: Period,
    /// Point forecast for the target period
    pub forecast: f64,
    /// Parameters actually used
    pub parameters: SmoothingParams,
    /// In-sample accuracy over the warm-up-aligned fitted values
    pub metrics: Option<AccuracyMetrics>,
    /// First training period
    pub training_from: Period,
    /// Last training period
    pub training_to: Period,
    /// Number of training periods
    pub training_len: usize,
    /// Back-test against the actual value, when one is recorded
    pub actual: Option<ActualComparison>,
}

impl PredictionOutcome {
    /// Serialize the outcome to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ForecastError::InvalidParameter(format!("serialization failed: {}", e)))
    }
}

/// Outcome of running all three methods side by side
#[derive(Debug)]
pub struct MethodComparison {
    /// SES outcome or the error that stopped it
    pub ses: Result<PredictionOutcome>,
    /// DES outcome or the error that stopped it
    pub des: Result<PredictionOutcome>,
    /// TES outcome or the error that stopped it
    pub tes: Result<PredictionOutcome>,
    /// Method with the lowest in-sample MAPE, `None` when every method failed
    pub best_method: Option<Method>,
    /// The winning MAPE, when there is a winner
    pub best_mape: Option<f64>,
}

/// Drives the smoothing models and assembles forecast records
#[derive(Debug)]
pub struct PredictionService<'a, S: RevenueDataSource> {
    provider: HistoricalDataProvider<'a, S>,
}

impl<'a, S: RevenueDataSource> PredictionService<'a, S> {
    /// Create a service over a revenue data source
    pub fn new(source: &'a S) -> Self {
        Self {
            provider: HistoricalDataProvider::new(source),
        }
    }

    /// The provider used for training-data assembly
    pub fn provider(&self) -> &HistoricalDataProvider<'a, S> {
        &self.provider
    }

    /// Forecast with Simple Exponential Smoothing
    pub fn predict_ses(
        &self,
        category: Option<i64>,
        target: Period,
        alpha: Option<f64>,
        optimize: bool,
    ) -> Result<PredictionOutcome> {
        let series = self.training_series(category, target, SimpleExponentialSmoothing::MIN_PERIODS)?;
        let steps = Self::steps_for(&series, target);
        let result =
            SimpleExponentialSmoothing::predict(&series.values(), alpha, optimize, steps)?;
        self.finish(Method::Ses, category, target, series, result, steps, 1)
    }

    /// Forecast with Double Exponential Smoothing
    pub fn predict_des(
        &self,
        category: Option<i64>,
        target: Period,
        alpha: Option<f64>,
        beta: Option<f64>,
        optimize: bool,
    ) -> Result<PredictionOutcome> {
        let series = self.training_series(category, target, DoubleExponentialSmoothing::MIN_PERIODS)?;
        let steps = Self::steps_for(&series, target);
        let result =
            DoubleExponentialSmoothing::predict(&series.values(), alpha, beta, optimize, steps)?;
        self.finish(Method::Des, category, target, series, result, steps, 1)
    }

    /// Forecast with Triple Exponential Smoothing
    #[allow(clippy::too_many_arguments)]
    pub fn predict_tes(
        &self,
        category: Option<i64>,
        target: Period,
        seasonal_periods: usize,
        alpha: Option<f64>,
        beta: Option<f64>,
        gamma: Option<f64>,
        optimize: bool,
    ) -> Result<PredictionOutcome> {
        let min_periods = TripleExponentialSmoothing::min_periods(seasonal_periods);
        let series = self.training_series(category, target, min_periods)?;
        let steps = Self::steps_for(&series, target);
        let result = TripleExponentialSmoothing::predict(
            &series.values(),
            seasonal_periods,
            alpha,
            beta,
            gamma,
            optimize,
            steps,
        )?;
        self.finish(
            Method::Tes,
            category,
            target,
            series,
            result,
            steps,
            seasonal_periods,
        )
    }

    /// Run all three methods, isolating per-method failures, and recommend
    /// the one with the lowest in-sample MAPE
    ///
    /// A `None` recommendation means every method failed; callers must check
    /// for it rather than assume a best method exists.
    pub fn compare_methods(&self, category: Option<i64>, target: Period) -> MethodComparison {
        let ses = self.predict_ses(category, target, None, true);
        let des = self.predict_des(category, target, None, None, true);
        let tes = self.predict_tes(
            category,
            target,
            DEFAULT_SEASONAL_PERIODS,
            None,
            None,
            None,
            true,
        );

        let mut best_method = None;
        let mut best_mape = f64::INFINITY;
        for (method, outcome) in [
            (Method::Ses, &ses),
            (Method::Des, &des),
            (Method::Tes, &tes),
        ] {
            match outcome {
                Ok(o) => {
                    if let Some(m) = o.metrics {
                        if m.mape < best_mape {
                            best_mape = m.mape;
                            best_method = Some(method);
                        }
                    }
                }
                Err(e) => log::warn!("{} failed during method comparison: {}", method, e),
            }
        }

        MethodComparison {
            ses,
            des,
            tes,
            best_method,
            best_mape: best_method.map(|_| best_mape),
        }
    }

    fn training_series(
        &self,
        category: Option<i64>,
        target: Period,
        min_periods: usize,
    ) -> Result<MonthlySeries> {
        let end = HistoricalDataProvider::<S>::training_window_end(target);
        self.provider
            .training_series(category, None, Some(end), min_periods, false)
    }

    fn steps_for(series: &MonthlySeries, target: Period) -> usize {
        match series.last_period() {
            Some(last) => HistoricalDataProvider::<S>::forecast_steps(last, target),
            None => 1,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        method: Method,
        category: Option<i64>,
        target: Period,
        series: MonthlySeries,
        result: SmoothingResult,
        steps: usize,
        warmup: usize,
    ) -> Result<PredictionOutcome> {
        // The point estimate is the forecast at the target's horizon, not
        // necessarily the one-step value.
        let forecast = result.future_forecasts[steps - 1];

        let values = series.values();
        let metrics = if values.len() > warmup {
            Some(metrics::calculate_all(
                &values[warmup..],
                &result.fitted_values[warmup..],
            )?)
        } else {
            None
        };

        let actual = self
            .provider
            .actual_value(target, category)
            .map(|a| ActualComparison::new(forecast, a));

        // The series is non-empty: the models reject short inputs first
        let training_from = series.first_period().ok_or(ForecastError::InsufficientData {
            required: 1,
            available: 0,
        })?;
        let training_to = series.last_period().ok_or(ForecastError::InsufficientData {
            required: 1,
            available: 0,
        })?;

        Ok(PredictionOutcome {
            method,
            category,
            target,
            forecast,
            parameters: result.parameters,
            metrics,
            training_from,
            training_to,
            training_len: series.len(),
            actual,
        })
    }
}
