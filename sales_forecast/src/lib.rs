//! # Sales Forecast
//!
//! Recursive multi-step forecasting of weekly retail sales per store or product.
//!
//! ## Features
//!
//! - CSV loading with column mapping, day-first dates and zero-defaulted covariates
//! - Per-entity append-only series of weekly observations
//! - Lag, rolling-mean and calendar feature derivation with a fixed model schema
//! - Pre-trained regressors loaded from JSON (gradient-boosted trees, linear)
//! - Recursive forecaster that feeds each prediction back in as history
//! - Forecast KPIs (total, average weekly, peak)
//!
//! ## Feature schema
//!
//! Every prediction is made from the same twelve inputs, in this order:
//!
//! ```text
//! lag_1, lag_2, lag_4, rolling_4, week_of_year, month, year,
//! Holiday_Flag, Temperature, Fuel_Price, CPI, Unemployment
//! ```
//!
//! Covariates are frozen at their last known value for the whole horizon.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_forecast::{load_model, DataLoader, ForecastConfig, RecursiveForecaster};
//!
//! # fn main() -> sales_forecast::Result<()> {
//! let config = ForecastConfig::default();
//!
//! // Load data
//! let data = DataLoader::from_csv("sales.csv", &config.columns, &config.date_formats)?;
//!
//! // Load a trained model
//! let model = load_model("sales_model.json")?;
//!
//! // Forecast 12 weeks for every store
//! let forecaster = RecursiveForecaster::from_config(&config)?;
//! let result = forecaster.forecast_all(data.series(), model.as_ref())?;
//!
//! println!("{}", result.kpis());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod metrics;
pub mod models;
pub mod series;
pub mod utils;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{ColumnMapping, DataLoader, SalesData};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{FeatureVector, FEATURE_NAMES};
pub use crate::forecaster::{
    EntityForecast, EntityOutcome, ForecastPoint, ForecastResult, RecursiveForecaster,
    SkippedEntity,
};
pub use crate::metrics::ForecastKpis;
pub use crate::models::{load_model, FeatureImportance, PredictFn, Regressor};
pub use crate::series::{Covariates, Observation, Series};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
