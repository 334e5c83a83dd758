//! # Sales Forecast Workspace
//!
//! Entry point re-exporting the `sales_forecast` library, which forecasts
//! weekly retail sales per store or product by feeding each prediction back
//! in as history for the next week.
//!
//! ## Example
//!
//! ```
//! use sales_forecast_workspace::{Covariates, FeatureVector, PredictFn, RecursiveForecaster, Series};
//! use chrono::NaiveDate;
//!
//! let week = |d| NaiveDate::from_ymd_opt(2023, 12, d).unwrap();
//! let series = Series::from_values(
//!     "1",
//!     &[(week(4), 10.0), (week(11), 20.0), (week(18), 15.0), (week(25), 25.0)],
//!     Covariates::default(),
//! )
//! .unwrap();
//!
//! let model = PredictFn::new("naive", |f: &FeatureVector| Ok(f.lag_1));
//! let result = RecursiveForecaster::new(2)
//!     .unwrap()
//!     .forecast_all(&[series], &model)
//!     .unwrap();
//!
//! assert_eq!(result.len(), 2);
//! assert_eq!(result.points()[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//! ```

pub use sales_forecast::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexported_schema() {
        assert_eq!(FEATURE_NAMES.len(), 12);
        assert_eq!(FEATURE_NAMES[0], "lag_1");
        assert_eq!(FEATURE_NAMES[11], "Unemployment");
    }

    #[test]
    fn test_default_config() {
        let config = ForecastConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.columns, ColumnMapping::default());
    }
}
