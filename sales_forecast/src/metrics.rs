//! Summary figures over a forecast

use crate::forecaster::ForecastResult;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fmt;

/// Headline figures of a forecast run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ForecastKpis {
    /// Sum of all predicted values
    pub total: f64,
    /// Mean predicted value per entity-week
    pub average_weekly: f64,
    /// Largest single predicted value
    pub peak: f64,
}

impl ForecastKpis {
    /// Compute the figures; an empty forecast yields all zeros
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        Self {
            total: values.iter().sum(),
            average_weekly: values.mean(),
            peak: Statistics::max(values),
        }
    }
}

impl fmt::Display for ForecastKpis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast KPIs:")?;
        writeln!(f, "  Total Forecasted Sales:     {:.0}", self.total)?;
        writeln!(f, "  Average Weekly Sales:       {:.0}", self.average_weekly)?;
        writeln!(f, "  Peak Forecasted Week Sales: {:.0}", self.peak)?;
        Ok(())
    }
}

/// Total predicted value per entity, in the result's entity order
pub fn per_entity_totals(result: &ForecastResult) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();

    for point in result.points() {
        match totals.last_mut() {
            Some((entity, total)) if *entity == point.entity_id => *total += point.predicted_value,
            _ => totals.push((point.entity_id.clone(), point.predicted_value)),
        }
    }

    totals
}
