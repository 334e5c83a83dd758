//! Recursive multi-step forecasting
//!
//! For each entity the forecaster derives a feature vector from the trailing
//! window of its series, asks the model for next week's value, emits that
//! value as a forecast point and appends it to the series as a synthetic
//! observation. The next step then sees the prediction as real history, so
//! errors compound across the horizon.
//!
//! Entities with fewer than `min_history` observations are skipped with a
//! warning. A failing prediction aborts the whole run.

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, MIN_WINDOW};
use crate::metrics::ForecastKpis;
use crate::models::Regressor;
use crate::series::{Observation, Series};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Minimum number of historical observations an entity needs
pub const DEFAULT_MIN_HISTORY: usize = MIN_WINDOW;

/// One predicted week for one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub entity_id: String,
    pub date: NaiveDate,
    pub predicted_value: f64,
}

/// An entity left out of the forecast because its history was too short
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntity {
    pub entity_id: String,
    pub observations: usize,
    pub required: usize,
}

impl fmt::Display for SkippedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entity {} has {} historical rows, fewer than the {} required. Skipped.",
            self.entity_id, self.observations, self.required
        )
    }
}

/// The forecast of a single entity together with its extended series
#[derive(Debug, Clone, PartialEq)]
pub struct EntityForecast {
    pub points: Vec<ForecastPoint>,
    /// History followed by the synthetic observations the forecast appended
    pub series: Series,
}

/// Terminal state of one entity's run
#[derive(Debug, Clone, PartialEq)]
pub enum EntityOutcome {
    Forecast(EntityForecast),
    Skipped(SkippedEntity),
}

/// Forecast points for all entities, in entity order then date order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    skipped: Vec<SkippedEntity>,
}

impl ForecastResult {
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn skipped(&self) -> &[SkippedEntity] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Predicted values in emission order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.predicted_value).collect()
    }

    /// Points of one entity
    pub fn for_entity<'a>(&'a self, entity_id: &'a str) -> impl Iterator<Item = &'a ForecastPoint> {
        self.points.iter().filter(move |p| p.entity_id == entity_id)
    }

    /// Total, average and peak of the predicted values
    pub fn kpis(&self) -> ForecastKpis {
        ForecastKpis::from_values(&self.values())
    }

    /// Serialize the points and skipped entities as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Recursive forecaster producing `horizon` weekly predictions per entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursiveForecaster {
    horizon: usize,
    min_history: usize,
}

impl RecursiveForecaster {
    /// Create a forecaster for the given number of future weeks
    pub fn new(horizon: usize) -> Result<Self> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        Ok(Self {
            horizon,
            min_history: DEFAULT_MIN_HISTORY,
        })
    }

    /// Require more history than the feature window needs
    pub fn with_min_history(mut self, min_history: usize) -> Result<Self> {
        if min_history < MIN_WINDOW {
            return Err(ForecastError::InvalidParameter(format!(
                "Minimum history must be at least {}, got {}",
                MIN_WINDOW, min_history
            )));
        }

        self.min_history = min_history;
        Ok(self)
    }

    /// Create a forecaster from a validated run configuration
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        Self::new(config.horizon)?.with_min_history(config.min_history)
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn min_history(&self) -> usize {
        self.min_history
    }

    /// Forecast a single entity
    pub fn forecast_series<M>(&self, series: &Series, model: &M) -> Result<EntityOutcome>
    where
        M: Regressor + ?Sized,
    {
        if series.len() < self.min_history {
            let skipped = SkippedEntity {
                entity_id: series.entity_id().to_string(),
                observations: series.len(),
                required: self.min_history,
            };
            warn!(
                entity = %skipped.entity_id,
                rows = skipped.observations,
                required = skipped.required,
                "insufficient history, skipping entity"
            );
            return Ok(EntityOutcome::Skipped(skipped));
        }

        let mut working = series.clone();
        let mut points = Vec::with_capacity(self.horizon);

        for step in 0..self.horizon {
            let features = FeatureVector::from_window(working.window(MIN_WINDOW))?;

            let predicted_value =
                model
                    .predict(&features)
                    .map_err(|e| ForecastError::PredictionError {
                        entity: series.entity_id().to_string(),
                        step: step + 1,
                        message: e.to_string(),
                    })?;

            debug!(
                entity = series.entity_id(),
                step = step + 1,
                date = %features.date,
                lag_1 = features.lag_1,
                rolling_4 = features.rolling_4,
                predicted_value,
                "forecast step"
            );

            points.push(ForecastPoint {
                entity_id: series.entity_id().to_string(),
                date: features.date,
                predicted_value,
            });

            working.push(Observation::predicted(
                features.date,
                predicted_value,
                features.covariates,
            ))?;
        }

        Ok(EntityOutcome::Forecast(EntityForecast {
            points,
            series: working,
        }))
    }

    /// Forecast every entity in order, each to completion before the next
    pub fn forecast_all<M>(&self, series: &[Series], model: &M) -> Result<ForecastResult>
    where
        M: Regressor + ?Sized,
    {
        info!(
            entities = series.len(),
            horizon = self.horizon,
            model = model.name(),
            "starting forecast"
        );

        let mut result = ForecastResult::default();

        for entity in series {
            match self.forecast_series(entity, model)? {
                EntityOutcome::Forecast(forecast) => result.points.extend(forecast.points),
                EntityOutcome::Skipped(skipped) => result.skipped.push(skipped),
            }
        }

        info!(
            points = result.points.len(),
            skipped = result.skipped.len(),
            "forecast complete"
        );

        Ok(result)
    }
}
