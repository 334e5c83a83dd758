//! Per-entity sales series and the observation record they are made of

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column names of the exogenous covariates, in feature-vector order
pub const COVARIATE_NAMES: [&str; 5] = [
    "Holiday_Flag",
    "Temperature",
    "Fuel_Price",
    "CPI",
    "Unemployment",
];

/// Exogenous covariates attached to every observation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Covariates {
    pub holiday_flag: f64,
    pub temperature: f64,
    pub fuel_price: f64,
    pub cpi: f64,
    pub unemployment: f64,
}

impl Covariates {
    /// Build from values ordered as [`COVARIATE_NAMES`]
    pub fn from_array(values: [f64; 5]) -> Self {
        let [holiday_flag, temperature, fuel_price, cpi, unemployment] = values;
        Self {
            holiday_flag,
            temperature,
            fuel_price,
            cpi,
            unemployment,
        }
    }

    /// Values ordered as [`COVARIATE_NAMES`]
    pub fn to_array(&self) -> [f64; 5] {
        [
            self.holiday_flag,
            self.temperature,
            self.fuel_price,
            self.cpi,
            self.unemployment,
        ]
    }
}

/// Where an observation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Real history read from the input data
    Observed,
    /// Synthetic point folded back in during recursive forecasting
    Predicted,
}

/// One week of sales for an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
    pub covariates: Covariates,
    pub origin: Origin,
}

impl Observation {
    /// A real historical observation
    pub fn observed(date: NaiveDate, value: f64, covariates: Covariates) -> Self {
        Self {
            date,
            value,
            covariates,
            origin: Origin::Observed,
        }
    }

    /// A synthetic observation produced by the forecaster
    pub fn predicted(date: NaiveDate, value: f64, covariates: Covariates) -> Self {
        Self {
            date,
            value,
            covariates,
            origin: Origin::Predicted,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == Origin::Predicted
    }
}

/// Date-ordered, append-only sequence of observations for one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    entity_id: String,
    observations: Vec<Observation>,
}

impl Series {
    /// Create a series from historical observations already sorted by date
    pub fn new<S: Into<String>>(entity_id: S, observations: Vec<Observation>) -> Result<Self> {
        let entity_id = entity_id.into();

        if let Some(pair) = observations.windows(2).find(|w| w[1].date < w[0].date) {
            return Err(ForecastError::DataError(format!(
                "Observations for entity '{}' are not sorted by date ({} follows {})",
                entity_id, pair[1].date, pair[0].date
            )));
        }

        Ok(Self {
            entity_id,
            observations,
        })
    }

    /// Convenience constructor from (date, value) pairs sharing one set of covariates
    pub fn from_values<S: Into<String>>(
        entity_id: S,
        points: &[(NaiveDate, f64)],
        covariates: Covariates,
    ) -> Result<Self> {
        let observations = points
            .iter()
            .map(|&(date, value)| Observation::observed(date, value, covariates))
            .collect();
        Self::new(entity_id, observations)
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Sales values, oldest first
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Most recent observation, real or synthetic
    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Most recent real (non-synthetic) observation
    pub fn last_observed(&self) -> Option<&Observation> {
        self.observations.iter().rev().find(|o| !o.is_synthetic())
    }

    /// The trailing `size` observations, or all of them if there are fewer
    pub fn window(&self, size: usize) -> &[Observation] {
        let start = self.observations.len().saturating_sub(size);
        &self.observations[start..]
    }

    /// Append an observation; its date must be later than the current tail
    pub fn push(&mut self, observation: Observation) -> Result<()> {
        if let Some(last) = self.observations.last() {
            if observation.date <= last.date {
                return Err(ForecastError::ValidationError(format!(
                    "Cannot append {} to entity '{}' ending at {}",
                    observation.date, self.entity_id, last.date
                )));
            }
        }

        self.observations.push(observation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_unsorted_observations() {
        let result = Series::from_values(
            "1",
            &[(date(2023, 1, 8), 1.0), (date(2023, 1, 1), 2.0)],
            Covariates::default(),
        );
        assert!(matches!(result, Err(ForecastError::DataError(_))));
    }

    #[test]
    fn test_window_and_last_observed() {
        let mut series = Series::from_values(
            "1",
            &[
                (date(2023, 1, 1), 1.0),
                (date(2023, 1, 8), 2.0),
                (date(2023, 1, 15), 3.0),
            ],
            Covariates::default(),
        )
        .unwrap();

        assert_eq!(series.window(2).len(), 2);
        assert_eq!(series.window(10).len(), 3);

        series
            .push(Observation::predicted(
                date(2023, 1, 22),
                4.0,
                Covariates::default(),
            ))
            .unwrap();

        assert_eq!(series.last().unwrap().value, 4.0);
        assert_eq!(series.last_observed().unwrap().value, 3.0);
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_push_requires_later_date() {
        let mut series =
            Series::from_values("1", &[(date(2023, 1, 1), 1.0)], Covariates::default()).unwrap();
        let stale = Observation::predicted(date(2023, 1, 1), 2.0, Covariates::default());
        assert!(series.push(stale).is_err());
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_covariate_array_order() {
        let covariates = Covariates::from_array([1.0, 42.3, 2.5, 211.1, 8.1]);
        assert_eq!(covariates.holiday_flag, 1.0);
        assert_eq!(covariates.unemployment, 8.1);
        assert_eq!(covariates.to_array(), [1.0, 42.3, 2.5, 211.1, 8.1]);
    }
}
