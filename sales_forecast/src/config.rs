//! Run configuration

use crate::data::ColumnMapping;
use crate::error::{ForecastError, Result};
use crate::features::MIN_WINDOW;
use crate::utils::DEFAULT_DATE_FORMATS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of weeks to forecast
pub const DEFAULT_HORIZON: usize = 12;

/// Shortest horizon a run may request
pub const MIN_HORIZON: usize = 4;

/// Longest horizon a run may request (one year of weeks)
pub const MAX_HORIZON: usize = 52;

/// Settings for one forecasting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Which input columns hold the date, the sales value and the entity id
    pub columns: ColumnMapping,
    /// Number of future weeks to forecast per entity
    pub horizon: usize,
    /// Entities with fewer rows are skipped
    pub min_history: usize,
    /// Date formats tried in order when parsing the date column
    pub date_formats: Vec<String>,
    /// Default tracing filter, used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            horizon: DEFAULT_HORIZON,
            min_history: MIN_WINDOW,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            log_level: "info".to_string(),
        }
    }
}

impl ForecastConfig {
    /// Load a configuration from a JSON file; absent keys take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_HORIZON..=MAX_HORIZON).contains(&self.horizon) {
            return Err(ForecastError::ValidationError(format!(
                "Horizon must be between {} and {} weeks, got {}",
                MIN_HORIZON, MAX_HORIZON, self.horizon
            )));
        }

        if self.min_history < MIN_WINDOW {
            return Err(ForecastError::ValidationError(format!(
                "Minimum history must be at least {} rows, got {}",
                MIN_WINDOW, self.min_history
            )));
        }

        if self.date_formats.is_empty() {
            return Err(ForecastError::ValidationError(
                "At least one date format is required".to_string(),
            ));
        }

        let columns = [
            &self.columns.date,
            &self.columns.sales,
            &self.columns.store,
        ];
        if columns.iter().any(|c| c.trim().is_empty()) {
            return Err(ForecastError::ValidationError(
                "Column names must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
