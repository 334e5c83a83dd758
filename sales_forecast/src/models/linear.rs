//! # Linear Model
//!
//! Linear regression over the forecaster's feature vector.

use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::models::{validate_schema, Regressor};
use serde::{Deserialize, Serialize};

fn default_name() -> String {
    "Linear Regression".to_string()
}

/// Linear regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    #[serde(default = "default_name")]
    name: String,
    /// Bias
    intercept: f64,
    /// Feature names
    feature_names: Vec<String>,
    /// Weights, ordered as `feature_names`
    coefficients: Vec<f64>,
}

impl LinearRegressor {
    /// Create a new model
    pub fn new(intercept: f64, feature_names: Vec<String>, coefficients: Vec<f64>) -> Result<Self> {
        let model = Self {
            name: default_name(),
            intercept,
            feature_names,
            coefficients,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        validate_schema(&self.feature_names)?;

        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ForecastError::ModelError(format!(
                "Expected {} coefficients, found {}",
                FEATURE_COUNT,
                self.coefficients.len()
            )));
        }

        Ok(())
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let prediction = self.intercept
            + features
                .to_array()
                .iter()
                .zip(self.coefficients.iter())
                .map(|(x, w)| x * w)
                .sum::<f64>();

        if !prediction.is_finite() {
            return Err(ForecastError::ModelError(format!(
                "Non-finite prediction {}",
                prediction
            )));
        }

        Ok(prediction)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.feature_names)
    }
}
