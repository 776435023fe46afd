//! Wire schema for model artifacts.
//!
//! An artifact is a JSON document describing a fitted classification pipeline: the input
//! features (and their categorical encodings), an optional standard scaler, and one
//! estimator. These types mirror the file format only; [`crate::ModelHandle`] owns the
//! validated runtime form.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "layout": "row",
//!   "classes": [0, 1],
//!   "features": [
//!     { "name": "gender", "kind": "categorical", "categories": ["Female", "Male", "Other"] },
//!     { "name": "age", "kind": "numeric" }
//!   ],
//!   "scaler": { "mean": [0.0, 0.0, 0.0, 41.8], "scale": [1.0, 1.0, 1.0, 22.5] },
//!   "estimator": { "type": "logistic", "coefficients": [0.1, 0.2, 0.0, 1.3], "intercept": -2.0 }
//! }
//! ```

use hdp_types::{ClassCode, InputLayout};
use serde::{Deserialize, Serialize};

use crate::{ModelError, ModelResult};

/// The only artifact format version this crate reads.
pub const FORMAT_VERSION: u32 = 1;

/// Marker used in `children_left`/`children_right` for a leaf node.
pub const TREE_LEAF: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub layout: InputLayout,
    /// Class codes in estimator output order.
    pub classes: Vec<ClassCode>,
    pub features: Vec<FeatureSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<ScalerSchema>,
    pub estimator: EstimatorSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub name: String,
    #[serde(flatten)]
    pub kind: FeatureKindSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureKindSchema {
    Numeric,
    /// One-hot encoded; one output column per category, unknown values encode as all zeros.
    Categorical { categories: Vec<String> },
}

/// Standard scaler over the expanded (post one-hot) columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScalerSchema {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimatorSchema {
    /// Binary logistic regression.
    Logistic {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    /// Random forest; class probabilities are averaged across trees.
    Forest { trees: Vec<TreeSchema> },
}

fn default_threshold() -> f64 {
    0.5
}

/// One decision tree in structure-of-arrays layout.
///
/// Node `i` is a leaf when `children_left[i] == -1`. Otherwise rows with
/// `x[feature[i]] <= threshold[i]` go to `children_left[i]`, the rest to `children_right[i]`.
/// `value[i]` holds the class distribution (counts or fractions) at node `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeSchema {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

/// Strictly parse an artifact from JSON text.
///
/// This uses `serde_path_to_error` to surface a best-effort path (e.g.
/// `estimator.trees[0].threshold`) to the failing field.
pub fn parse_artifact(json: &str) -> ModelResult<ModelArtifact> {
    let mut deserializer = serde_json::Deserializer::from_str(json);

    match serde_path_to_error::deserialize(&mut deserializer) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            Err(ModelError::Invalid(format!(
                "artifact schema mismatch at {path}: {source}"
            )))
        }
    }
}
