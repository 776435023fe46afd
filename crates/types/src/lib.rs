//! Value types shared between the prediction core and the model boundary crate.
//!
//! A model never sees form input directly. It receives a [`FeatureVector`], built in the
//! calling convention ([`InputLayout`]) the model declares when it is loaded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer class code produced by a classifier.
pub type ClassCode = i64;

/// Errors that can occur when building feature rows.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// A feature name was empty or whitespace only
    #[error("feature name cannot be empty")]
    EmptyName,
    /// The same feature name was pushed twice
    #[error("duplicate feature name: {0}")]
    DuplicateName(String),
}

/// How a model expects to be called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputLayout {
    /// A single ordered sequence of numbers, matched to training features by position.
    Vector,
    /// A single named row with mixed value types, matched to training columns by name.
    Row,
}

impl fmt::Display for InputLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputLayout::Vector => write!(f, "vector"),
            InputLayout::Row => write!(f, "row"),
        }
    }
}

/// A single model-ready value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FeatureValue {
    /// Numeric view of the value. Text has none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{v}"),
            FeatureValue::Float(v) => write!(f, "{v}"),
            FeatureValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A single-row table keyed by feature name.
///
/// Insertion order is preserved so the row can be compared against a model's training
/// column order, and names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureRow(Vec<(String, FeatureValue)>);

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Appends a named value.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::EmptyName`] for a blank name and
    /// [`FeatureError::DuplicateName`] if the name is already present.
    pub fn push(
        &mut self,
        name: impl Into<String>,
        value: FeatureValue,
    ) -> Result<(), FeatureError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FeatureError::EmptyName);
        }
        if self.get(&name).is_some() {
            return Err(FeatureError::DuplicateName(name));
        }
        self.0.push((name, value));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Prediction input, in the shape the bound model declared.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureVector {
    Ordered(Vec<f64>),
    Row(FeatureRow),
}

impl FeatureVector {
    pub fn layout(&self) -> InputLayout {
        match self {
            FeatureVector::Ordered(_) => InputLayout::Vector,
            FeatureVector::Row(_) => InputLayout::Row,
        }
    }

    /// Number of features carried.
    pub fn len(&self) -> usize {
        match self {
            FeatureVector::Ordered(values) => values.len(),
            FeatureVector::Row(row) => row.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
