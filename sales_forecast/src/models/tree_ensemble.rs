//! Gradient-boosted regression trees loaded from a JSON dump
//!
//! Each tree is a flat array of nodes addressed by index, root first, in the
//! style of an XGBoost JSON dump. A split sends a sample to `yes` when its
//! feature value is below the threshold and to `no` otherwise; a missing
//! (NaN) value follows `missing`, or `yes` when no default branch is recorded.
//! The prediction is `base_score` plus the sum of the reached leaf values.

use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::models::{ranked_importances, validate_schema, FeatureImportance, Regressor};
use serde::{Deserialize, Serialize};

fn default_name() -> String {
    "Gradient Boosted Trees".to_string()
}

/// A node of one regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Leaf {
        leaf: f64,
    },
    Split {
        /// Index into the feature vector
        split: usize,
        threshold: f64,
        yes: usize,
        no: usize,
        #[serde(default)]
        missing: Option<usize>,
    },
}

/// Gradient-boosted tree ensemble regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    base_score: f64,
    feature_names: Vec<String>,
    trees: Vec<Vec<Node>>,
    /// Importances recorded at training time, ordered as `feature_names`
    #[serde(default)]
    feature_importances: Option<Vec<f64>>,
}

impl TreeEnsemble {
    /// Create an ensemble and validate its structure
    pub fn new(
        base_score: f64,
        feature_names: Vec<String>,
        trees: Vec<Vec<Node>>,
        feature_importances: Option<Vec<f64>>,
    ) -> Result<Self> {
        let model = Self {
            name: default_name(),
            base_score,
            feature_names,
            trees,
            feature_importances,
        };
        model.validate()?;
        Ok(model)
    }

    /// Number of trees in the ensemble
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    /// Check the schema and the node graph of every tree.
    ///
    /// Children must point forward in the node array, which rules out cycles.
    pub fn validate(&self) -> Result<()> {
        validate_schema(&self.feature_names)?;

        if let Some(importances) = &self.feature_importances {
            if importances.len() != FEATURE_COUNT {
                return Err(ForecastError::ModelError(format!(
                    "Expected {} feature importances, found {}",
                    FEATURE_COUNT,
                    importances.len()
                )));
            }
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.is_empty() {
                return Err(ForecastError::ModelError(format!("Tree {} has no nodes", t)));
            }

            for (i, node) in tree.iter().enumerate() {
                if let Node::Split {
                    split,
                    yes,
                    no,
                    missing,
                    ..
                } = node
                {
                    if *split >= FEATURE_COUNT {
                        return Err(ForecastError::ModelError(format!(
                            "Tree {} node {} splits on unknown feature index {}",
                            t, i, split
                        )));
                    }

                    for child in [Some(*yes), Some(*no), *missing].into_iter().flatten() {
                        if child <= i || child >= tree.len() {
                            return Err(ForecastError::ModelError(format!(
                                "Tree {} node {} has invalid child {}",
                                t, i, child
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk one tree to its leaf
    fn score_tree(tree: &[Node], x: &[f64; FEATURE_COUNT]) -> Result<f64> {
        let mut index = 0;

        loop {
            match tree.get(index) {
                Some(Node::Leaf { leaf }) => return Ok(*leaf),
                Some(Node::Split {
                    split,
                    threshold,
                    yes,
                    no,
                    missing,
                }) => {
                    let value = x.get(*split).copied().ok_or_else(|| {
                        ForecastError::ModelError(format!("Unknown feature index {}", split))
                    })?;

                    index = if value.is_nan() {
                        missing.unwrap_or(*yes)
                    } else if value < *threshold {
                        *yes
                    } else {
                        *no
                    };
                }
                None => {
                    return Err(ForecastError::ModelError(format!(
                        "Node {} does not exist",
                        index
                    )))
                }
            }
        }
    }

    /// Fraction of splits made on each feature, used when no trained importances were stored
    fn split_frequencies(&self) -> Vec<f64> {
        let mut counts = vec![0.0; FEATURE_COUNT];
        for node in self.trees.iter().flatten() {
            if let Node::Split { split, .. } = node {
                if let Some(count) = counts.get_mut(*split) {
                    *count += 1.0;
                }
            }
        }

        let total: f64 = counts.iter().sum();
        if total > 0.0 {
            counts.iter_mut().for_each(|c| *c /= total);
        }
        counts
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let x = features.to_array();

        let mut prediction = self.base_score;
        for tree in &self.trees {
            prediction += Self::score_tree(tree, &x)?;
        }

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

    fn feature_importances(&self) -> Option<Vec<FeatureImportance>> {
        let scores = match &self.feature_importances {
            Some(scores) => scores.clone(),
            None => self.split_frequencies(),
        };
        Some(ranked_importances(&self.feature_names, &scores))
    }
}
