//! # Revenue Forecast
//!
//! A Rust library for forecasting regional vehicle-tax revenue from monthly
//! aggregates.
//!
//! ## Features
//!
//! - Monthly revenue series assembly with a transaction-ledger fallback and
//!   leakage-safe training windows
//! - Forecasting models: Simple, Double (Holt) and Triple (Holt-Winters)
//!   exponential smoothing with bounded parameter optimization
//! - Accuracy metrics (MAPE, MAE, RMSE) and side-by-side method comparison
//! - Scenario-banded hybrid forecasting with business monthly adjustments
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use revenue_forecast::data::Period;
//! use revenue_forecast::prediction::PredictionService;
//! use revenue_forecast::hybrid::{HybridPredictionService, Scenario};
//!
//! // Any store of monthly aggregates can back the service
//! let source = MyRevenueStore::connect()?;
//!
//! // Forecast March 2025 across all vehicle categories
//! let service = PredictionService::new(&source);
//! let target = Period::new(2025, 3)?;
//! let outcome = service.predict_tes(None, target, 12, None, None, None, true)?;
//! println!("TES forecast: {:.0}", outcome.forecast);
//!
//! // Compare methods and take the recommendation
//! let comparison = service.compare_methods(None, target);
//! if let Some(best) = comparison.best_method {
//!     println!("best method: {}", best);
//! }
//!
//! // Scenario-banded hybrid forecast
//! let hybrid = HybridPredictionService::new(&source);
//! let result = hybrid.predict_hybrid(None, target, 24, Scenario::Base)?;
//! println!("{} .. {}", result.confidence_lower, result.confidence_upper);
//! ```

pub mod data;
pub mod error;
pub mod hybrid;
pub mod metrics;
pub mod models;
pub mod prediction;

mod optimize;

// Re-export commonly used types
pub use crate::data::{HistoricalDataProvider, MonthlySeries, Period, RevenueDataSource, TimePoint};
pub use crate::error::{ForecastError, Result};
pub use crate::hybrid::{HybridOutcome, HybridPredictionService, Scenario};
pub use crate::metrics::AccuracyMetrics;
pub use crate::models::{SmoothingParams, SmoothingResult};
pub use crate::prediction::{Method, MethodComparison, PredictionOutcome, PredictionService};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
