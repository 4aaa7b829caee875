//! Hybrid scenario-banded forecasting on a Holt-Winters base
//!
//! Layers two pieces of fixed business configuration on top of the TES
//! forecast: scenario factors agreed with domain stakeholders and a monthly
//! adjustment table. A naive same-month error history drives an advisory
//! scenario recommendation; the reported prediction always follows the
//! caller-selected scenario.

use crate::data::{HistoricalDataProvider, Period, RevenueDataSource};
use crate::error::{ForecastError, Result};
use crate::metrics::{self, AccuracyMetrics};
use crate::models::triple::{TripleExponentialSmoothing, DEFAULT_SEASONAL_PERIODS};
use crate::models::SmoothingParams;
use crate::prediction::{ActualComparison, Method};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Named forecast scenario with a fixed multiplicative factor
///
/// The factors are agreed configuration, not tunable inputs; changing them is
/// a versioned configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Pessimistic planning floor
    Conservative,
    /// Recommended default
    Base,
    /// Moderately optimistic planning
    Moderate,
    /// Aggressive targets
    Optimistic,
}

impl Scenario {
    /// All scenarios in ascending factor order
    pub const ALL: [Scenario; 4] = [
        Scenario::Conservative,
        Scenario::Base,
        Scenario::Moderate,
        Scenario::Optimistic,
    ];

    /// The scenario's multiplicative factor
    pub fn factor(&self) -> f64 {
        match self {
            Scenario::Conservative => 0.50,
            Scenario::Base => 0.65,
            Scenario::Moderate => 0.70,
            Scenario::Optimistic => 0.80,
        }
    }

    /// Lowercase name used in requests and persisted records
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Conservative => "conservative",
            Scenario::Base => "base",
            Scenario::Moderate => "moderate",
            Scenario::Optimistic => "optimistic",
        }
    }
}

impl FromStr for Scenario {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "conservative" => Ok(Scenario::Conservative),
            "base" => Ok(Scenario::Base),
            "moderate" => Ok(Scenario::Moderate),
            "optimistic" => Ok(Scenario::Optimistic),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown scenario '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Seasonal business adjustment applied to every scenario for a given month
///
/// January and March dip with the relief programs around year and quarter
/// ends, August peaks, October drops after the program cutoff.
pub fn monthly_adjustment(month: u32) -> f64 {
    match month {
        1 => 0.95,
        3 => 0.95,
        7 => 1.05,
        8 => 1.10,
        10 => 0.90,
        12 => 1.05,
        _ => 1.00,
    }
}

/// One scenario's forecast with the factors that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioForecast {
    /// Base forecast after scenario factor and monthly adjustment
    pub prediction: f64,
    /// The scenario's factor
    pub factor: f64,
    /// The target month's adjustment multiplier
    pub monthly_adjustment: f64,
    /// factor * monthly_adjustment
    pub final_factor: f64,
}

/// Result of a hybrid forecast request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridOutcome {
    /// Always `Method::Hybrid`
    pub method: Method,
    /// Vehicle category scope, `None` = all categories
    pub category: Option<i64>,
    /// The period the forecast targets
    pub target: Period,
    /// Final prediction for the selected scenario
    pub prediction: f64,
    /// Lower bound of the ±2σ band, floored at 0
    pub confidence_lower: f64,
    /// Upper bound of the ±2σ band
    pub confidence_upper: f64,
    /// Nominal confidence level of the band, in percent
    pub confidence_level: u8,
    /// The caller-selected scenario the prediction follows
    pub scenario: Scenario,
    /// Every scenario's banded forecast
    pub scenarios: BTreeMap<Scenario, ScenarioForecast>,
    /// Advisory recommendation from the same-month error history
    pub recommended_scenario: Scenario,
    /// Naive same-month MAPE over prior years, when computable
    pub monthly_mape: Option<f64>,
    /// The target month's adjustment multiplier
    pub monthly_adjustment: f64,
    /// Unadjusted TES point forecast
    pub base_forecast: f64,
    /// Fitted TES parameters
    pub parameters: SmoothingParams,
    /// In-sample TES accuracy past the first seasonal cycle
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

impl HybridOutcome {
    /// Serialize the outcome to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ForecastError::InvalidParameter(format!("serialization failed: {}", e)))
    }
}

/// Scenario-banded hybrid forecasting service
#[derive(Debug)]
pub struct HybridPredictionService<'a, S: RevenueDataSource> {
    provider: HistoricalDataProvider<'a, S>,
}

impl<'a, S: RevenueDataSource> HybridPredictionService<'a, S> {
    /// Default training window length in months
    pub const DEFAULT_TRAINING_PERIODS: usize = 24;
    /// Minimum training periods a hybrid forecast accepts
    pub const MIN_PERIODS: usize = 12;
    /// Years of same-month history consulted for the naive MAPE
    const MAPE_LOOKBACK_YEARS: i32 = 3;

    /// Create a service over a revenue data source
    pub fn new(source: &'a S) -> Self {
        Self {
            provider: HistoricalDataProvider::new(source),
        }
    }

    /// Naive same-month MAPE: "this year equals last year" evaluated over up
    /// to three prior years of the target month
    ///
    /// Returns `None` when fewer than two comparable years exist.
    pub fn monthly_mape(&self, category: Option<i64>, target: Period) -> Option<f64> {
        let start = NaiveDate::from_ymd_opt(
            target.year() - Self::MAPE_LOOKBACK_YEARS,
            target.month(),
            1,
        )?;
        let end = HistoricalDataProvider::<S>::training_window_end(target);

        let rows = self.provider.source().monthly_totals(category, Some(start), Some(end));
        let values: Vec<f64> = rows
            .iter()
            .filter(|p| p.period.month() == target.month() && p.period.year() < target.year())
            .map(|p| p.total)
            .collect();

        if values.len() < 2 {
            return None;
        }

        let mut errors = Vec::with_capacity(values.len() - 1);
        for pair in values.windows(2) {
            let (predicted, actual) = (pair[0], pair[1]);
            if actual > 0.0 {
                errors.push((predicted - actual).abs() / actual * 100.0);
            }
        }

        if errors.is_empty() {
            return None;
        }
        Some(errors.iter().sum::<f64>() / errors.len() as f64)
    }

    /// Advisory scenario from the naive monthly error level
    pub fn recommend_scenario(monthly_mape: Option<f64>) -> Scenario {
        match monthly_mape {
            Some(m) if m > 40.0 => Scenario::Conservative,
            Some(m) if m > 25.0 => Scenario::Base,
            Some(m) if m > 15.0 => Scenario::Moderate,
            Some(_) => Scenario::Optimistic,
            None => Scenario::Base,
        }
    }

    /// Produce a hybrid forecast for the target period
    pub fn predict_hybrid(
        &self,
        category: Option<i64>,
        target: Period,
        training_periods: usize,
        scenario: Scenario,
    ) -> Result<HybridOutcome> {
        let end = HistoricalDataProvider::<S>::training_window_end(target);
        let start = target.minus_months(training_periods as u32).first_day();
        let series =
            self.provider
                .training_series(category, Some(start), Some(end), Self::MIN_PERIODS, false)?;
        let values = series.values();

        let last = series.last_period().ok_or(ForecastError::InsufficientData {
            required: Self::MIN_PERIODS,
            available: 0,
        })?;
        let steps = HistoricalDataProvider::<S>::forecast_steps(last, target);

        let tes = TripleExponentialSmoothing::predict(
            &values,
            DEFAULT_SEASONAL_PERIODS,
            None,
            None,
            None,
            true,
            steps,
        )?;
        let base_forecast = tes.future_forecasts[steps - 1];

        let monthly_mape = self.monthly_mape(category, target);
        let recommended_scenario = Self::recommend_scenario(monthly_mape);
        let adjustment = monthly_adjustment(target.month());

        let scenarios: BTreeMap<Scenario, ScenarioForecast> = Scenario::ALL
            .iter()
            .map(|&s| {
                let factor = s.factor();
                (
                    s,
                    ScenarioForecast {
                        prediction: base_forecast * factor * adjustment,
                        factor,
                        monthly_adjustment: adjustment,
                        final_factor: factor * adjustment,
                    },
                )
            })
            .collect();

        // The recommendation is advisory; the reported prediction follows
        // the caller's scenario.
        let prediction = scenarios[&scenario].prediction;

        let metrics = if values.len() > DEFAULT_SEASONAL_PERIODS {
            Some(metrics::calculate_all(
                &values[DEFAULT_SEASONAL_PERIODS..],
                &tes.fitted_values[DEFAULT_SEASONAL_PERIODS..],
            )?)
        } else {
            None
        };

        let tail = &values[values.len() - Self::MIN_PERIODS..];
        let std_dev = tail.iter().population_std_dev();
        let confidence_lower = (prediction - 2.0 * std_dev).max(0.0);
        let confidence_upper = prediction + 2.0 * std_dev;

        let actual = self
            .provider
            .actual_value(target, category)
            .map(|a| ActualComparison::new(prediction, a));

        let training_from = series.first_period().ok_or(ForecastError::InsufficientData {
            required: Self::MIN_PERIODS,
            available: 0,
        })?;

        Ok(HybridOutcome {
            method: Method::Hybrid,
            category,
            target,
            prediction,
            confidence_lower,
            confidence_upper,
            confidence_level: 95,
            scenario,
            scenarios,
            recommended_scenario,
            monthly_mape,
            monthly_adjustment: adjustment,
            base_forecast,
            parameters: tes.parameters,
            metrics,
            training_from,
            training_to: last,
            training_len: series.len(),
            actual,
        })
    }
}
