//! Field schema registry.
//!
//! A [`DomainSchema`] lists, in training order, every input a domain's model needs. Each
//! [`FieldSpec`] carries everything a collector needs to present the field (label, bounds or
//! choices) and the pure transform from the user-facing value to the model-ready value.
//!
//! Field order and names must equal the feature order and names the bound model was trained
//! with. This is checked once at startup when models are bound (see
//! [`crate::gateway::ModelBundle`]).

use hdp_types::{ClassCode, FeatureValue};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::{domains, Domain, PredictError, PredictResult};

/// Whether a numeric field holds whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberType {
    Integer,
    Float,
}

/// How a selected choice reaches the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Fixed integer code (binary or ordinal).
    Code(i64),
    /// The choice label itself, for models that encode categories internally.
    Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub encoding: Encoding,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSpec {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    pub step: f64,
    pub number: NumberType,
    /// Initial value shown in the form control.
    pub default: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Numeric(NumericSpec),
    Choice { options: Vec<ChoiceOption> },
}

/// Declarative description of one form input and its transform to a model-ready value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Training-time feature name.
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Whole-number field with a step of 1.
    pub fn integer(name: &'static str, label: &'static str, min: i64, max: i64) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Numeric(NumericSpec {
                min: min as f64,
                max: max as f64,
                step: 1.0,
                number: NumberType::Integer,
                default: None,
            }),
        }
    }

    pub fn float(name: &'static str, label: &'static str, min: f64, max: f64, step: f64) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Numeric(NumericSpec {
                min,
                max,
                step,
                number: NumberType::Float,
                default: None,
            }),
        }
    }

    /// Choice whose options map to fixed integer codes.
    pub fn coded(name: &'static str, label: &'static str, options: &[(&'static str, i64)]) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Choice {
                options: options
                    .iter()
                    .map(|&(label, code)| ChoiceOption {
                        label,
                        encoding: Encoding::Code(code),
                    })
                    .collect(),
            },
        }
    }

    /// Choice whose selected label is passed to the model as a string.
    pub fn literal(name: &'static str, label: &'static str, options: &[&'static str]) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Choice {
                options: options
                    .iter()
                    .map(|&label| ChoiceOption {
                        label,
                        encoding: Encoding::Literal,
                    })
                    .collect(),
            },
        }
    }

    /// Set the initial value of a numeric field. Has no effect on choices.
    pub fn with_default(mut self, value: f64) -> Self {
        if let FieldKind::Numeric(spec) = &mut self.kind {
            spec.default = Some(value);
        }
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        if let FieldKind::Numeric(spec) = &mut self.kind {
            spec.step = step;
        }
        self
    }

    pub fn options(&self) -> &[ChoiceOption] {
        match &self.kind {
            FieldKind::Choice { options } => options,
            FieldKind::Numeric(_) => &[],
        }
    }

    /// Check a raw entry against the field's bounds or choice list.
    ///
    /// Out-of-range numbers are rejected, never clamped.
    pub fn validate_raw(&self, raw: &str) -> Result<(), String> {
        self.transform(raw).map(|_| ())
    }

    /// Map a raw entry to its model-ready value.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason if the entry is empty, not a number, out of bounds,
    /// not a whole number for an integer field, or not one of the declared choices.
    pub fn transform(&self, raw: &str) -> Result<FeatureValue, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("a value is required".into());
        }

        match &self.kind {
            FieldKind::Numeric(spec) => {
                let value: f64 = raw
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite())
                    .ok_or_else(|| format!("{raw:?} is not a number"))?;
                if value < spec.min || value > spec.max {
                    return Err(format!(
                        "{value} is outside the range {} to {}",
                        spec.min, spec.max
                    ));
                }
                match spec.number {
                    NumberType::Integer if value.fract() != 0.0 => {
                        Err(format!("{value} is not a whole number"))
                    }
                    NumberType::Integer => Ok(FeatureValue::Int(value as i64)),
                    NumberType::Float => Ok(FeatureValue::Float(value)),
                }
            }
            FieldKind::Choice { options } => {
                let option = options
                    .iter()
                    .find(|o| o.label == raw)
                    .ok_or_else(|| format!("{raw:?} is not one of the allowed choices"))?;
                Ok(match option.encoding {
                    Encoding::Code(code) => FeatureValue::Int(code),
                    Encoding::Literal => FeatureValue::Text(option.label.to_string()),
                })
            }
        }
    }
}

/// Whether an outcome is a clinical finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Disease or malignancy detected.
    Positive,
    /// Nothing detected.
    Negative,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Positive => write!(f, "positive finding"),
            Severity::Negative => write!(f, "negative finding"),
        }
    }
}

/// What a class code means for one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeSpec {
    pub code: ClassCode,
    pub message: &'static str,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainSchema {
    pub domain: Domain,
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
    pub outcomes: Vec<OutcomeSpec>,
}

impl DomainSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn outcome(&self, code: ClassCode) -> Option<&OutcomeSpec> {
        self.outcomes.iter().find(|o| o.code == code)
    }

    /// Structural checks run when the registry is built.
    fn validate(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err("schema has no fields".into());
        }

        let mut names = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err("field name cannot be empty".into());
            }
            if !names.insert(field.name) {
                return Err(format!("field {} is declared twice", field.name));
            }
            match &field.kind {
                FieldKind::Numeric(spec) => {
                    // A NaN bound or step compares as None and is rejected.
                    let ordered = matches!(
                        spec.min.partial_cmp(&spec.max),
                        Some(Ordering::Less | Ordering::Equal)
                    );
                    let stepped = spec.step.partial_cmp(&0.0) == Some(Ordering::Greater);
                    if !ordered || !stepped {
                        return Err(format!("field {} has invalid bounds or step", field.name));
                    }
                    if let Some(default) = spec.default {
                        if default < spec.min || default > spec.max {
                            return Err(format!("field {} default is out of range", field.name));
                        }
                    }
                }
                FieldKind::Choice { options } => {
                    let mut labels = HashSet::new();
                    if options.is_empty() || !options.iter().all(|o| labels.insert(o.label)) {
                        return Err(format!("field {} needs distinct choices", field.name));
                    }
                }
            }
        }

        let mut codes = HashSet::new();
        if self.outcomes.is_empty() || !self.outcomes.iter().all(|o| codes.insert(o.code)) {
            return Err("outcomes must declare distinct class codes".into());
        }
        Ok(())
    }
}

/// All domain schemas, built once at process start and then only read.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<Domain, DomainSchema>,
}

impl SchemaRegistry {
    /// Build a registry from explicit schemas.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::InvalidConfig`] if a domain is registered twice or a schema is
    /// structurally invalid (duplicate fields, empty choices, inverted bounds, repeated codes).
    pub fn new(schemas: impl IntoIterator<Item = DomainSchema>) -> PredictResult<Self> {
        let mut map = BTreeMap::new();
        for schema in schemas {
            schema.validate().map_err(|reason| {
                PredictError::InvalidConfig(format!("{} schema: {reason}", schema.domain))
            })?;
            let domain = schema.domain;
            if map.insert(domain, schema).is_some() {
                return Err(PredictError::InvalidConfig(format!(
                    "{domain} schema is registered twice"
                )));
            }
        }
        Ok(Self { schemas: map })
    }

    /// The heart, diabetes and cancer schemas.
    pub fn standard() -> PredictResult<Self> {
        Self::new([domains::heart(), domains::diabetes(), domains::cancer()])
    }

    /// # Errors
    ///
    /// Returns [`PredictError::UnknownDomain`] if the domain has no registered schema.
    pub fn schema(&self, domain: Domain) -> PredictResult<&DomainSchema> {
        self.schemas
            .get(&domain)
            .ok_or_else(|| PredictError::UnknownDomain(domain.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`PredictError::UnknownDomain`] if the name is not a domain or the domain has
    /// no registered schema.
    pub fn schema_by_name(&self, name: &str) -> PredictResult<&DomainSchema> {
        self.schema(name.parse()?)
    }

    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.schemas.keys().copied()
    }

    pub fn schemas(&self) -> impl Iterator<Item = &DomainSchema> {
        self.schemas.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_field_transform() {
        let field = FieldSpec::integer("age", "Age", 1, 120);
        assert_eq!(field.transform("63"), Ok(FeatureValue::Int(63)));
        assert_eq!(field.transform(" 1 "), Ok(FeatureValue::Int(1)));
        assert_eq!(field.transform("120"), Ok(FeatureValue::Int(120)));
        assert_eq!(field.transform("63.0"), Ok(FeatureValue::Int(63)));
        assert!(field.transform("63.5").unwrap_err().contains("whole number"));
        assert!(field.transform("0").unwrap_err().contains("outside the range"));
        assert!(field.transform("121").unwrap_err().contains("outside the range"));
        assert!(field.transform("sixty").unwrap_err().contains("not a number"));
        assert!(field.transform("NaN").unwrap_err().contains("not a number"));
        assert!(field.transform("").unwrap_err().contains("required"));
    }

    #[test]
    fn test_float_field_transform_keeps_fraction() {
        let field = FieldSpec::float("oldpeak", "ST Depression", 0.0, 10.0, 0.1);
        assert_eq!(field.transform("2.3"), Ok(FeatureValue::Float(2.3)));
        assert_eq!(field.transform("0"), Ok(FeatureValue::Float(0.0)));
        assert!(field.validate_raw("10.1").is_err());
    }

    #[test]
    fn test_coded_and_literal_choices() {
        let sex = FieldSpec::coded("sex", "Sex", &[("Male", 1), ("Female", 0)]);
        assert_eq!(sex.transform("Male"), Ok(FeatureValue::Int(1)));
        assert_eq!(sex.transform("Female"), Ok(FeatureValue::Int(0)));
        assert!(sex.transform("male").is_err());

        let gender = FieldSpec::literal("gender", "Gender", &["Male", "Female", "Other"]);
        assert_eq!(
            gender.transform("Female"),
            Ok(FeatureValue::Text("Female".into()))
        );
        assert!(gender.transform("Unknown").unwrap_err().contains("allowed choices"));
    }

    #[test]
    fn test_with_default_only_applies_to_numeric_fields() {
        let field = FieldSpec::integer("age", "Age", 1, 120).with_default(30.0);
        assert!(matches!(field.kind, FieldKind::Numeric(NumericSpec { default: Some(d), .. }) if d == 30.0));

        let choice = FieldSpec::literal("gender", "Gender", &["Male"]).with_default(1.0);
        assert_eq!(choice.options().len(), 1);
    }

    fn tiny_schema(domain: Domain) -> DomainSchema {
        DomainSchema {
            domain,
            title: "Tiny",
            fields: vec![FieldSpec::integer("a", "A", 0, 1)],
            outcomes: vec![OutcomeSpec {
                code: 1,
                message: "Found",
                severity: Severity::Positive,
            }],
        }
    }

    #[test]
    fn test_registry_rejects_duplicate_fields() {
        let mut schema = tiny_schema(Domain::Heart);
        schema.fields.push(FieldSpec::integer("a", "A again", 0, 1));
        let err = SchemaRegistry::new([schema]).expect_err("should reject");
        assert!(matches!(err, PredictError::InvalidConfig(msg) if msg.contains("declared twice")));
    }

    #[test]
    fn test_registry_rejects_default_out_of_range() {
        let mut schema = tiny_schema(Domain::Heart);
        schema.fields[0] = FieldSpec::integer("a", "A", 0, 1).with_default(5.0);
        let err = SchemaRegistry::new([schema]).expect_err("should reject");
        assert!(matches!(err, PredictError::InvalidConfig(msg) if msg.contains("default")));
    }

    #[test]
    fn test_registry_rejects_inverted_nan_and_zero_step_bounds() {
        for field in [
            FieldSpec::float("a", "A", 2.0, 1.0, 0.1),
            FieldSpec::float("a", "A", f64::NAN, 1.0, 0.1),
            FieldSpec::float("a", "A", 0.0, f64::NAN, 0.1),
            FieldSpec::float("a", "A", 0.0, 1.0, 0.1).with_step(0.0),
            FieldSpec::float("a", "A", 0.0, 1.0, 0.1).with_step(f64::NAN),
        ] {
            let mut schema = tiny_schema(Domain::Heart);
            schema.fields[0] = field;
            let err = SchemaRegistry::new([schema]).expect_err("should reject");
            assert!(
                matches!(&err, PredictError::InvalidConfig(msg) if msg.contains("invalid bounds or step")),
                "{err}"
            );
        }

        let mut schema = tiny_schema(Domain::Heart);
        schema.fields[0] = FieldSpec::float("a", "A", 1.0, 1.0, 0.5);
        assert!(SchemaRegistry::new([schema]).is_ok());
    }

    #[test]
    fn test_registry_rejects_domain_registered_twice() {
        let err = SchemaRegistry::new([tiny_schema(Domain::Heart), tiny_schema(Domain::Heart)])
            .expect_err("should reject");
        assert!(matches!(err, PredictError::InvalidConfig(msg) if msg.contains("twice")));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = SchemaRegistry::new([tiny_schema(Domain::Diabetes)]).unwrap();
        assert_eq!(registry.schema(Domain::Diabetes).unwrap().title, "Tiny");
        assert!(matches!(
            registry.schema(Domain::Heart),
            Err(PredictError::UnknownDomain(_))
        ));
        assert!(matches!(
            registry.schema_by_name("lungs"),
            Err(PredictError::UnknownDomain(_))
        ));
        assert_eq!(registry.domains().collect::<Vec<_>>(), vec![Domain::Diabetes]);
    }

    #[test]
    fn test_standard_registry_builds() {
        let registry = SchemaRegistry::standard().unwrap();
        assert_eq!(registry.domains().collect::<Vec<_>>(), Domain::ALL.to_vec());
    }
}
