//! Regression models used as the one-step prediction function
//!
//! Models are pre-trained elsewhere and loaded from a JSON artifact. Once
//! loaded they are immutable and are passed by reference to the forecaster.

use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::fs;
use std::path::Path;
use tracing::info;

/// Relative importance of one model input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Point-prediction model mapping a feature vector to next week's sales
pub trait Regressor: Debug {
    /// Predict a single scalar for the given features
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Name of the model
    fn name(&self) -> &str;

    /// Input names the model was fit on, if the model records them
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Per-input importances, sorted descending. Not every model can report these.
    fn feature_importances(&self) -> Option<Vec<FeatureImportance>> {
        None
    }
}

/// Check that a model was fit on exactly the forecaster's feature layout
pub fn validate_schema(feature_names: &[String]) -> Result<()> {
    let matches = feature_names.len() == FEATURE_NAMES.len()
        && feature_names
            .iter()
            .zip(FEATURE_NAMES.iter())
            .all(|(a, b)| a == b);

    if !matches {
        return Err(ForecastError::ModelError(format!(
            "Feature schema mismatch: model expects [{}], forecaster produces [{}]",
            feature_names.join(", "),
            FEATURE_NAMES.join(", ")
        )));
    }

    Ok(())
}

/// Pair importances with feature names and sort them, largest first
pub(crate) fn ranked_importances(names: &[String], scores: &[f64]) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = names
        .iter()
        .zip(scores.iter())
        .map(|(feature, &importance)| FeatureImportance {
            feature: feature.clone(),
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

/// On-disk model artifact, tagged by `kind`
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelArtifact {
    TreeEnsemble(TreeEnsemble),
    Linear(LinearRegressor),
}

/// Load a model artifact from a JSON file
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Box<dyn Regressor>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let model = parse_model(&text)?;
    info!(model = model.name(), path = %path.display(), "loaded model");
    Ok(model)
}

/// Parse and validate a model artifact from JSON text
pub fn parse_model(json: &str) -> Result<Box<dyn Regressor>> {
    let artifact: ModelArtifact = serde_json::from_str(json)?;

    let model: Box<dyn Regressor> = match artifact {
        ModelArtifact::TreeEnsemble(model) => {
            model.validate()?;
            Box::new(model)
        }
        ModelArtifact::Linear(model) => {
            model.validate()?;
            Box::new(model)
        }
    };

    Ok(model)
}

/// Adapter exposing a plain function as a [`Regressor`]
pub struct PredictFn<F> {
    name: String,
    f: F,
}

impl<F> PredictFn<F>
where
    F: Fn(&FeatureVector) -> Result<f64>,
{
    pub fn new<S: Into<String>>(name: S, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Debug for PredictFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictFn").field("name", &self.name).finish()
    }
}

impl<F> Regressor for PredictFn<F>
where
    F: Fn(&FeatureVector) -> Result<f64>,
{
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        (self.f)(features)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub mod linear;
pub mod tree_ensemble;

pub use linear::LinearRegressor;
pub use tree_ensemble::{Node, TreeEnsemble};
