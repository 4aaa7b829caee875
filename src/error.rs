//! Error types for the revenue_forecast crate

use thiserror::Error;

/// Custom error types for the revenue_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Too few historical periods for the requested method or window
    #[error("insufficient historical data: {required} periods required, {available} available")]
    InsufficientData {
        /// Minimum number of periods the operation needs
        required: usize,
        /// Number of periods actually available
        available: usize,
    },

    /// A supplied parameter is outside its valid range, or a name is unknown
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Metrics called on sequences of different lengths
    #[error("length mismatch: {actual} actual values vs {predicted} predicted values")]
    LengthMismatch {
        /// Length of the actual-value sequence
        actual: usize,
        /// Length of the predicted-value sequence
        predicted: usize,
    },

    /// The optimizer failed to converge or no model configuration fit
    #[error("model fit error: {0}")]
    ModelFit(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
