//! Error types for the sales_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to input data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to parameter or configuration validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The model artifact could not be loaded or does not match the feature schema
    #[error("Model error: {0}")]
    ModelError(String),

    /// The prediction function failed; fatal for the whole run
    #[error("Prediction failed for entity '{entity}' at step {step}: {message}")]
    PredictionError {
        entity: String,
        step: usize,
        message: String,
    },

    /// A date cell could not be parsed with any configured format
    #[error("Date parse error: {0}")]
    DateParseError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
