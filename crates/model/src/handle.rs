//! Loaded, validated model artifacts.

use hdp_types::{ClassCode, FeatureValue, FeatureVector, InputLayout};
use std::collections::HashSet;
use std::path::Path;

use crate::artifact::{self, FeatureKindSchema, ModelArtifact, ScalerSchema, FORMAT_VERSION};
use crate::estimator::Estimator;
use crate::{LabelMap, ModelError, ModelResult};

#[derive(Debug, Clone)]
enum Encoding {
    Numeric,
    OneHot(Vec<String>),
}

#[derive(Debug, Clone)]
struct Feature {
    name: String,
    encoding: Encoding,
}

impl Feature {
    fn width(&self) -> usize {
        match &self.encoding {
            Encoding::Numeric => 1,
            Encoding::OneHot(categories) => categories.len(),
        }
    }
}

#[derive(Debug, Clone)]
struct Scaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Scaler {
    fn from_schema(schema: ScalerSchema, width: usize) -> ModelResult<Self> {
        if schema.mean.len() != width || schema.scale.len() != width {
            return Err(ModelError::Invalid(format!(
                "scaler has {} means and {} scales for {width} input columns",
                schema.mean.len(),
                schema.scale.len()
            )));
        }
        if let Some(i) = schema
            .scale
            .iter()
            .position(|s| *s == 0.0 || !s.is_finite())
        {
            return Err(ModelError::Invalid(format!(
                "scaler column {i} has a zero or non-finite scale"
            )));
        }
        Ok(Self {
            mean: schema.mean,
            scale: schema.scale,
        })
    }

    fn apply(&self, x: &mut [f64]) {
        for ((v, m), s) in x.iter_mut().zip(&self.mean).zip(&self.scale) {
            *v = (*v - m) / s;
        }
    }
}

/// A pre-trained classifier, loaded once and then only read.
///
/// The handle knows the calling convention the model was trained with ([`InputLayout`]) and
/// its feature names in training order. Prediction expands categorical features to one-hot
/// columns, applies the optional scaler and runs the estimator.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    layout: InputLayout,
    classes: Vec<ClassCode>,
    features: Vec<Feature>,
    width: usize,
    scaler: Option<Scaler>,
    estimator: Estimator,
    labels: Option<LabelMap>,
}

impl ModelHandle {
    /// Load and validate an artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if:
    /// - the file cannot be read,
    /// - the JSON does not match the artifact schema,
    /// - the artifact is internally inconsistent (see [`ModelHandle::from_artifact`]).
    pub fn load(path: &Path) -> ModelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = artifact::parse_artifact(&text)?;
        let handle = Self::from_artifact(artifact)?;

        tracing::info!(
            path = %path.display(),
            layout = %handle.layout,
            features = handle.features.len(),
            "loaded model artifact"
        );
        Ok(handle)
    }

    /// Build a handle from an already parsed artifact.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if:
    /// - the format version is not supported,
    /// - classes are fewer than two or repeated,
    /// - feature names are empty or repeated, or a categorical feature has no categories,
    /// - a `vector` layout declares a categorical feature,
    /// - scaler or estimator widths disagree with the expanded feature width.
    pub fn from_artifact(artifact: ModelArtifact) -> ModelResult<Self> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: artifact.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let mut seen = HashSet::new();
        if artifact.classes.len() < 2 || !artifact.classes.iter().all(|c| seen.insert(*c)) {
            return Err(ModelError::Invalid(
                "classes must list at least two distinct codes".into(),
            ));
        }

        if artifact.features.is_empty() {
            return Err(ModelError::Invalid("artifact declares no features".into()));
        }

        let mut names = HashSet::new();
        let mut features = Vec::with_capacity(artifact.features.len());
        for feature in artifact.features {
            if feature.name.trim().is_empty() {
                return Err(ModelError::Invalid("feature name cannot be empty".into()));
            }
            if !names.insert(feature.name.clone()) {
                return Err(ModelError::Invalid(format!(
                    "feature {} is declared twice",
                    feature.name
                )));
            }
            let encoding = match feature.kind {
                FeatureKindSchema::Numeric => Encoding::Numeric,
                FeatureKindSchema::Categorical { categories } => {
                    if artifact.layout == InputLayout::Vector {
                        return Err(ModelError::Invalid(format!(
                            "feature {} is categorical but the model takes a numeric vector",
                            feature.name
                        )));
                    }
                    let mut seen = HashSet::new();
                    if categories.is_empty() || !categories.iter().all(|c| seen.insert(c)) {
                        return Err(ModelError::Invalid(format!(
                            "feature {} needs distinct categories",
                            feature.name
                        )));
                    }
                    Encoding::OneHot(categories)
                }
            };
            features.push(Feature {
                name: feature.name,
                encoding,
            });
        }

        let width = features.iter().map(Feature::width).sum();
        let scaler = artifact
            .scaler
            .map(|s| Scaler::from_schema(s, width))
            .transpose()?;
        let estimator = Estimator::from_schema(artifact.estimator, width, artifact.classes.len())?;

        Ok(Self {
            layout: artifact.layout,
            classes: artifact.classes,
            features,
            width,
            scaler,
            estimator,
            labels: None,
        })
    }

    /// Attach a class-code to label mapping.
    pub fn with_labels(mut self, labels: LabelMap) -> Self {
        for code in labels.codes() {
            if !self.classes.contains(&code) {
                tracing::warn!(code, "label map names a class the model never predicts");
            }
        }
        self.labels = Some(labels);
        self
    }

    pub fn layout(&self) -> InputLayout {
        self.layout
    }

    /// Feature names in training order.
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn classes(&self) -> &[ClassCode] {
        &self.classes
    }

    pub fn label_for(&self, code: ClassCode) -> Option<&str> {
        self.labels.as_ref().and_then(|labels| labels.get(code))
    }

    /// Predict the class code for one input.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Layout`] if the input is not in the declared layout and
    /// [`ModelError::Shape`] if features are missing, extra or of the wrong type.
    pub fn predict(&self, input: &FeatureVector) -> ModelResult<ClassCode> {
        let x = self.prepare(input)?;
        Ok(self.classes[self.estimator.predict_index(&x)])
    }

    fn prepare(&self, input: &FeatureVector) -> ModelResult<Vec<f64>> {
        let mut x = match input {
            FeatureVector::Ordered(values) if self.layout == InputLayout::Vector => {
                if values.len() != self.features.len() {
                    return Err(ModelError::Shape(format!(
                        "expected {} values, got {}",
                        self.features.len(),
                        values.len()
                    )));
                }
                values.clone()
            }
            FeatureVector::Row(row) if self.layout == InputLayout::Row => {
                let mut x = Vec::with_capacity(self.width);
                for feature in &self.features {
                    let value = row.get(&feature.name).ok_or_else(|| {
                        ModelError::Shape(format!("missing feature {}", feature.name))
                    })?;
                    encode(feature, value, &mut x)?;
                }
                if row.len() != self.features.len() {
                    let extra: Vec<&str> = row
                        .names()
                        .filter(|n| !self.features.iter().any(|f| f.name == *n))
                        .collect();
                    return Err(ModelError::Shape(format!(
                        "unexpected features: {}",
                        extra.join(", ")
                    )));
                }
                x
            }
            other => {
                return Err(ModelError::Layout {
                    expected: self.layout,
                    found: other.layout(),
                })
            }
        };

        if let Some(scaler) = &self.scaler {
            scaler.apply(&mut x);
        }
        Ok(x)
    }
}

fn encode(feature: &Feature, value: &FeatureValue, x: &mut Vec<f64>) -> ModelResult<()> {
    match &feature.encoding {
        Encoding::Numeric => {
            let v = value.as_f64().ok_or_else(|| {
                ModelError::Shape(format!("feature {} expects a number", feature.name))
            })?;
            x.push(v);
        }
        Encoding::OneHot(categories) => {
            let key = value.to_string();
            if !categories.iter().any(|c| *c == key) {
                tracing::warn!(
                    feature = %feature.name,
                    value = %key,
                    "unknown category encoded as all zeros"
                );
            }
            x.extend(categories.iter().map(|c| if *c == key { 1.0 } else { 0.0 }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdp_types::FeatureRow;
    use std::io::Write;

    const ROW_MODEL: &str = r#"{
        "format_version": 1,
        "layout": "row",
        "classes": [0, 1],
        "features": [
            { "name": "gender", "kind": "categorical", "categories": ["Female", "Male"] },
            { "name": "age", "kind": "numeric" }
        ],
        "scaler": { "mean": [0.0, 0.0, 40.0], "scale": [1.0, 1.0, 10.0] },
        "estimator": { "type": "logistic", "coefficients": [-1.0, 1.0, 2.0], "intercept": 0.0 }
    }"#;

    fn row(gender: &str, age: i64) -> FeatureVector {
        let mut row = FeatureRow::new();
        row.push("gender", FeatureValue::Text(gender.into())).unwrap();
        row.push("age", FeatureValue::Int(age)).unwrap();
        FeatureVector::Row(row)
    }

    fn handle(json: &str) -> ModelResult<ModelHandle> {
        ModelHandle::from_artifact(artifact::parse_artifact(json)?)
    }

    #[test]
    fn test_row_model_one_hot_and_scaling() {
        let model = handle(ROW_MODEL).unwrap();
        assert_eq!(model.layout(), InputLayout::Row);
        assert_eq!(model.feature_names(), vec!["gender", "age"]);

        // Female at 40: z = -1 + 0 = -1.
        assert_eq!(model.predict(&row("Female", 40)).unwrap(), 0);
        // Male at 40: z = 1.
        assert_eq!(model.predict(&row("Male", 40)).unwrap(), 1);
        // Female at 60: z = -1 + 2 * 2 = 3.
        assert_eq!(model.predict(&row("Female", 60)).unwrap(), 1);
        // Unknown category contributes nothing: z = 2 * -0.5 = -1.
        assert_eq!(model.predict(&row("Other", 35)).unwrap(), 0);
    }

    #[test]
    fn test_row_model_rejects_missing_extra_and_mistyped_features() {
        let model = handle(ROW_MODEL).unwrap();

        let mut missing = FeatureRow::new();
        missing.push("gender", FeatureValue::Text("Male".into())).unwrap();
        let err = model.predict(&FeatureVector::Row(missing)).expect_err("missing");
        assert!(matches!(err, ModelError::Shape(msg) if msg.contains("missing feature age")));

        let mut extra = FeatureRow::new();
        extra.push("gender", FeatureValue::Text("Male".into())).unwrap();
        extra.push("age", FeatureValue::Int(50)).unwrap();
        extra.push("bmi", FeatureValue::Float(22.0)).unwrap();
        let err = model.predict(&FeatureVector::Row(extra)).expect_err("extra");
        assert!(matches!(err, ModelError::Shape(msg) if msg.contains("bmi")));

        let mut mistyped = FeatureRow::new();
        mistyped.push("gender", FeatureValue::Text("Male".into())).unwrap();
        mistyped.push("age", FeatureValue::Text("old".into())).unwrap();
        let err = model.predict(&FeatureVector::Row(mistyped)).expect_err("mistyped");
        assert!(matches!(err, ModelError::Shape(msg) if msg.contains("expects a number")));
    }

    #[test]
    fn test_layout_mismatch_is_rejected() {
        let model = handle(ROW_MODEL).unwrap();
        let err = model
            .predict(&FeatureVector::Ordered(vec![1.0, 40.0]))
            .expect_err("layout");
        assert!(matches!(
            err,
            ModelError::Layout {
                expected: InputLayout::Row,
                found: InputLayout::Vector
            }
        ));
    }

    #[test]
    fn test_vector_model_rejects_categorical_features() {
        let json = r#"{
            "format_version": 1,
            "layout": "vector",
            "classes": [0, 1],
            "features": [{ "name": "sex", "kind": "categorical", "categories": ["Male"] }],
            "estimator": { "type": "logistic", "coefficients": [1.0], "intercept": 0.0 }
        }"#;
        let err = handle(json).expect_err("should reject");
        assert!(matches!(err, ModelError::Invalid(msg) if msg.contains("numeric vector")));
    }

    #[test]
    fn test_vector_model_checks_length() {
        let json = r#"{
            "format_version": 1,
            "layout": "vector",
            "classes": [0, 1],
            "features": [{ "name": "a", "kind": "numeric" }, { "name": "b", "kind": "numeric" }],
            "estimator": { "type": "logistic", "coefficients": [1.0, 1.0], "intercept": -3.0 }
        }"#;
        let model = handle(json).unwrap();
        assert_eq!(model.predict(&FeatureVector::Ordered(vec![1.0, 1.0])).unwrap(), 0);
        assert_eq!(model.predict(&FeatureVector::Ordered(vec![2.0, 2.0])).unwrap(), 1);

        let err = model
            .predict(&FeatureVector::Ordered(vec![1.0]))
            .expect_err("short");
        assert!(matches!(err, ModelError::Shape(msg) if msg.contains("expected 2 values, got 1")));
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let json = ROW_MODEL.replace("\"format_version\": 1", "\"format_version\": 7");
        let err = handle(&json).expect_err("version");
        assert!(matches!(
            err,
            ModelError::UnsupportedVersion {
                found: 7,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_scaler_width_must_match_expanded_features() {
        let json = ROW_MODEL.replace(
            r#""mean": [0.0, 0.0, 40.0], "scale": [1.0, 1.0, 10.0]"#,
            r#""mean": [40.0], "scale": [10.0]"#,
        );
        let err = handle(&json).expect_err("scaler width");
        assert!(matches!(err, ModelError::Invalid(msg) if msg.contains("scaler")));
    }

    #[test]
    fn test_duplicate_classes_are_rejected() {
        let json = ROW_MODEL.replace("\"classes\": [0, 1]", "\"classes\": [1, 1]");
        assert!(matches!(handle(&json), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_labels_are_optional() {
        let model = handle(ROW_MODEL).unwrap();
        assert_eq!(model.label_for(1), None);

        let model = model.with_labels(LabelMap::parse(r#"{"0": "B", "1": "M"}"#).unwrap());
        assert_eq!(model.label_for(1), Some("M"));
        assert_eq!(model.label_for(0), Some("B"));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ROW_MODEL.as_bytes()).unwrap();

        let model = ModelHandle::load(file.path()).unwrap();
        assert_eq!(model.classes(), &[0, 1]);
    }

    #[test]
    fn test_load_absent_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelHandle::load(&dir.path().join("heart_model.json")).expect_err("absent");
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04\x95pickle").unwrap();

        let err = ModelHandle::load(file.path()).expect_err("corrupt");
        assert!(matches!(err, ModelError::Io { .. } | ModelError::Invalid(_)));
    }
}
