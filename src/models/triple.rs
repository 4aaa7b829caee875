//! Triple Exponential Smoothing (TES / Holt-Winters)
//!
//! Level + trend + seasonal smoothing for monthly revenue with a yearly
//! cycle. Three trend/seasonal configurations are fit independently and the
//! one with the lowest in-sample SSE past the first seasonal cycle wins:
//!
//! - additive trend, multiplicative seasonal (the primary form)
//! - multiplicative trend, multiplicative seasonal
//! - additive trend, additive seasonal
//!
//! Forecasts are clamped at zero; revenue cannot go negative.

use crate::error::{ForecastError, Result};
use crate::models::{validate_steps, validate_weight, SmoothingParams, SmoothingResult};
use crate::optimize::minimize_bounded;

/// Default seasonal cycle length for monthly data
pub const DEFAULT_SEASONAL_PERIODS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrendKind {
    Additive,
    Multiplicative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeasonalKind {
    Additive,
    Multiplicative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TesConfig {
    trend: TrendKind,
    seasonal: SeasonalKind,
}

impl TesConfig {
    fn label(&self) -> &'static str {
        match (self.trend, self.seasonal) {
            (TrendKind::Additive, SeasonalKind::Multiplicative) => "add-trend/mul-seasonal",
            (TrendKind::Multiplicative, SeasonalKind::Multiplicative) => "mul-trend/mul-seasonal",
            (TrendKind::Additive, SeasonalKind::Additive) => "add-trend/add-seasonal",
            (TrendKind::Multiplicative, SeasonalKind::Additive) => "mul-trend/add-seasonal",
        }
    }
}

const CONFIGS: [TesConfig; 3] = [
    TesConfig {
        trend: TrendKind::Additive,
        seasonal: SeasonalKind::Multiplicative,
    },
    TesConfig {
        trend: TrendKind::Multiplicative,
        seasonal: SeasonalKind::Multiplicative,
    },
    TesConfig {
        trend: TrendKind::Additive,
        seasonal: SeasonalKind::Additive,
    },
];

struct TesState {
    level: Vec<f64>,
    trend: Vec<f64>,
    seasonal: Vec<f64>,
    seasonal_avg: Vec<f64>,
}

/// Triple exponential smoothing model
#[derive(Debug, Clone, Copy)]
pub struct TripleExponentialSmoothing;

impl TripleExponentialSmoothing {
    /// Minimum observations for a given seasonal cycle length
    pub fn min_periods(seasonal_periods: usize) -> usize {
        2 * seasonal_periods
    }

    /// Fit and forecast `steps` periods ahead
    ///
    /// When `optimize` is set or any weight is missing, every configuration
    /// is fit by SSE minimization and the best one is kept. Explicit
    /// parameters with `optimize == false` are applied to the primary
    /// configuration as-is.
    pub fn predict(
        data: &[f64],
        seasonal_periods: usize,
        alpha: Option<f64>,
        beta: Option<f64>,
        gamma: Option<f64>,
        optimize: bool,
        steps: usize,
    ) -> Result<SmoothingResult> {
        validate_steps(steps)?;
        if seasonal_periods < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal_periods must be at least 2, got {}",
                seasonal_periods
            )));
        }
        let required = Self::min_periods(seasonal_periods);
        if data.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                available: data.len(),
            });
        }

        let (config, alpha, beta, gamma) = match (alpha, beta, gamma) {
            (Some(a), Some(b), Some(g)) if !optimize => (
                CONFIGS[0],
                validate_weight("alpha", a)?,
                validate_weight("beta", b)?,
                validate_weight("gamma", g)?,
            ),
            _ => Self::select_configuration(data, seasonal_periods)?,
        };

        let state = smooth(data, seasonal_periods, config, alpha, beta, gamma).ok_or_else(|| {
            ForecastError::ModelFit(format!(
                "{} state degenerated for the supplied parameters",
                config.label()
            ))
        })?;
        let fitted = fitted_values(data, seasonal_periods, config, &state);

        let n = data.len();
        let last_level = state.level[n - 1];
        let last_trend = state.trend[n - 1];
        let future_forecasts: Vec<f64> = (1..=steps)
            .map(|h| {
                let base = match config.trend {
                    TrendKind::Additive => last_level + h as f64 * last_trend,
                    TrendKind::Multiplicative => last_level * last_trend.powi(h as i32),
                };
                let phase = n - seasonal_periods + ((n + h - 1) % seasonal_periods);
                // Revenue floor: never forecast below zero
                apply_seasonal(base, state.seasonal[phase], config.seasonal).max(0.0)
            })
            .collect();

        Ok(SmoothingResult {
            forecast: future_forecasts[steps - 1],
            parameters: SmoothingParams::triple(alpha, beta, gamma, seasonal_periods),
            fitted_values: fitted,
            future_forecasts,
        })
    }

    /// Fit every configuration and keep the lowest post-warm-up SSE
    fn select_configuration(
        data: &[f64],
        seasonal_periods: usize,
    ) -> Result<(TesConfig, f64, f64, f64)> {
        let mut best: Option<(TesConfig, f64, f64, f64, f64)> = None;

        for config in CONFIGS {
            let objective = |p: &[f64]| config_sse(data, seasonal_periods, config, p[0], p[1], p[2]);
            let params = match minimize_bounded(&objective, 3) {
                Ok(p) => p,
                Err(_) => {
                    log::debug!("TES configuration {} failed to fit", config.label());
                    continue;
                }
            };
            let sse = objective(&params);
            if !sse.is_finite() {
                continue;
            }
            log::debug!("TES configuration {}: SSE {:.4}", config.label(), sse);
            match best {
                Some((_, _, _, _, best_sse)) if best_sse <= sse => {}
                _ => best = Some((config, params[0], params[1], params[2], sse)),
            }
        }

        match best {
            Some((config, a, b, g, _)) => {
                log::debug!("TES selected configuration {}", config.label());
                Ok((config, a, b, g))
            }
            None => Err(ForecastError::ModelFit(
                "no seasonal configuration converged to a usable fit".to_string(),
            )),
        }
    }
}

fn deseason(value: f64, seasonal: f64, kind: SeasonalKind) -> Option<f64> {
    match kind {
        SeasonalKind::Multiplicative => {
            if seasonal == 0.0 {
                None
            } else {
                Some(value / seasonal)
            }
        }
        SeasonalKind::Additive => Some(value - seasonal),
    }
}

fn apply_seasonal(base: f64, seasonal: f64, kind: SeasonalKind) -> f64 {
    match kind {
        SeasonalKind::Multiplicative => base * seasonal,
        SeasonalKind::Additive => base + seasonal,
    }
}

/// Per-phase averages, normalized to mean 1 (multiplicative) or mean 0 (additive)
fn initial_seasonal(data: &[f64], s: usize, kind: SeasonalKind) -> Option<Vec<f64>> {
    let mut avg = vec![0.0; s];
    for (phase, slot) in avg.iter_mut().enumerate() {
        let mut sum = 0.0;
        let mut count = 0usize;
        let mut i = phase;
        while i < data.len() {
            sum += data[i];
            count += 1;
            i += s;
        }
        *slot = sum / count as f64;
    }

    let mean = avg.iter().sum::<f64>() / s as f64;
    match kind {
        SeasonalKind::Multiplicative => {
            if mean == 0.0 {
                return None;
            }
            Some(avg.iter().map(|&a| a / mean).collect())
        }
        SeasonalKind::Additive => Some(avg.iter().map(|&a| a - mean).collect()),
    }
}

fn smooth(
    data: &[f64],
    s: usize,
    config: TesConfig,
    alpha: f64,
    beta: f64,
    gamma: f64,
) -> Option<TesState> {
    let n = data.len();
    let seasonal_avg = initial_seasonal(data, s, config.seasonal)?;

    let mut level = Vec::with_capacity(n);
    let mut trend = Vec::with_capacity(n);
    let mut seasonal = Vec::with_capacity(n);

    let l0 = deseason(data[0], seasonal_avg[0], config.seasonal)?;
    let d1 = deseason(data[1], seasonal_avg[1 % s], config.seasonal)?;
    let t0 = match config.trend {
        TrendKind::Additive => d1 - l0,
        TrendKind::Multiplicative => {
            if l0 == 0.0 {
                return None;
            }
            d1 / l0
        }
    };
    level.push(l0);
    trend.push(t0);
    seasonal.push(seasonal_avg[0]);

    for t in 1..n {
        let m = t % s;
        let seasonal_ref = if t < s { seasonal_avg[m] } else { seasonal[t - s] };
        let deseasoned = deseason(data[t], seasonal_ref, config.seasonal)?;

        let l_prev = level[t - 1];
        let t_prev = trend[t - 1];
        let carried = match config.trend {
            TrendKind::Additive => l_prev + t_prev,
            TrendKind::Multiplicative => l_prev * t_prev,
        };

        let l = alpha * deseasoned + (1.0 - alpha) * carried;
        let b = match config.trend {
            TrendKind::Additive => beta * (l - l_prev) + (1.0 - beta) * t_prev,
            TrendKind::Multiplicative => {
                if l_prev == 0.0 {
                    return None;
                }
                beta * (l / l_prev) + (1.0 - beta) * t_prev
            }
        };

        let sv = if t >= s {
            match config.seasonal {
                SeasonalKind::Multiplicative => {
                    if l == 0.0 {
                        return None;
                    }
                    gamma * (data[t] / l) + (1.0 - gamma) * seasonal[t - s]
                }
                SeasonalKind::Additive => gamma * (data[t] - l) + (1.0 - gamma) * seasonal[t - s],
            }
        } else {
            seasonal_avg[m]
        };

        if !l.is_finite() || !b.is_finite() || !sv.is_finite() {
            return None;
        }

        level.push(l);
        trend.push(b);
        seasonal.push(sv);
    }

    Some(TesState {
        level,
        trend,
        seasonal,
        seasonal_avg,
    })
}

/// One-step-ahead estimates from the lagged state
fn fitted_values(data: &[f64], s: usize, config: TesConfig, state: &TesState) -> Vec<f64> {
    let mut fitted = Vec::with_capacity(data.len());
    fitted.push(apply_seasonal(state.level[0], state.seasonal_avg[0], config.seasonal));

    for t in 1..data.len() {
        let base = match config.trend {
            TrendKind::Additive => state.level[t - 1] + state.trend[t - 1],
            TrendKind::Multiplicative => state.level[t - 1] * state.trend[t - 1],
        };
        let seasonal_ref = if t >= s {
            state.seasonal[t - s]
        } else {
            state.seasonal_avg[t % s]
        };
        fitted.push(apply_seasonal(base, seasonal_ref, config.seasonal));
    }

    fitted
}

/// SSE over residuals past the first seasonal cycle
///
/// The first cycle has no seasonal estimate of its own and is excluded so
/// the configurations are compared on equal footing.
fn config_sse(data: &[f64], s: usize, config: TesConfig, alpha: f64, beta: f64, gamma: f64) -> f64 {
    let state = match smooth(data, s, config, alpha, beta, gamma) {
        Some(state) => state,
        None => return f64::INFINITY,
    };
    let fitted = fitted_values(data, s, config, &state);
    (s..data.len()).map(|t| (data[t] - fitted[t]).powi(2)).sum()
}
