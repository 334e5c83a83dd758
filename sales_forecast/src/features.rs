//! Feature derivation for the recursive forecaster
//!
//! A [`FeatureVector`] is computed from the trailing window of a series at the
//! point of prediction. Its layout is fixed and must match the layout the
//! regression model was fit on, see [`FEATURE_NAMES`].

use crate::error::{ForecastError, Result};
use crate::series::{Covariates, Observation};
use crate::utils::{calendar_fields, next_week};
use chrono::NaiveDate;
use serde::Serialize;

/// Number of trailing observations feature derivation reads (lag_4 and rolling_4)
pub const MIN_WINDOW: usize = 4;

/// Number of model inputs
pub const FEATURE_COUNT: usize = 12;

/// Model input names, in the order the model expects them
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "lag_1",
    "lag_2",
    "lag_4",
    "rolling_4",
    "week_of_year",
    "month",
    "year",
    "Holiday_Flag",
    "Temperature",
    "Fuel_Price",
    "CPI",
    "Unemployment",
];

/// Model input for predicting the week after the window's tail
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    /// The week being predicted (tail date + 7 days); not a model input
    pub date: NaiveDate,
    pub lag_1: f64,
    pub lag_2: f64,
    pub lag_4: f64,
    pub rolling_4: f64,
    pub week_of_year: u32,
    pub month: u32,
    pub year: i32,
    /// Frozen at the tail observation's values
    pub covariates: Covariates,
}

impl FeatureVector {
    /// Derive the features for the week following the last observation of `window`
    pub fn from_window(window: &[Observation]) -> Result<Self> {
        let n = window.len();
        if n < MIN_WINDOW {
            return Err(ForecastError::ValidationError(format!(
                "Feature derivation needs at least {} observations, got {}",
                MIN_WINDOW, n
            )));
        }

        let tail = &window[n - 1];
        let date = next_week(tail.date)?;
        let (week_of_year, month, year) = calendar_fields(date);

        let rolling_4 =
            window[n - MIN_WINDOW..].iter().map(|o| o.value).sum::<f64>() / MIN_WINDOW as f64;

        Ok(Self {
            date,
            lag_1: tail.value,
            lag_2: window[n - 2].value,
            lag_4: window[n - 4].value,
            rolling_4,
            week_of_year,
            month,
            year,
            covariates: tail.covariates,
        })
    }

    /// Model inputs ordered as [`FEATURE_NAMES`]
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        let [holiday_flag, temperature, fuel_price, cpi, unemployment] =
            self.covariates.to_array();
        [
            self.lag_1,
            self.lag_2,
            self.lag_4,
            self.rolling_4,
            self.week_of_year as f64,
            self.month as f64,
            self.year as f64,
            holiday_flag,
            temperature,
            fuel_price,
            cpi,
            unemployment,
        ]
    }

    /// Look up a model input by its schema name
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.to_array()[i])
    }
}
