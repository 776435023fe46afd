//! Form collection.
//!
//! Front-ends (web form, terminal prompt) gather one string per field. This module turns what
//! they gathered into [`RawInputs`], validating only against each [`FieldSpec`](crate::schema::FieldSpec)'s own bounds
//! and choice lists. Nothing is defaulted: a field that was not entered is reported.

use std::collections::{BTreeMap, HashMap};

use crate::error::FieldIssue;
use crate::schema::DomainSchema;
use crate::{PredictError, PredictResult};

/// Field name to the value exactly as entered. Lives for one prediction request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs(BTreeMap<String, String>);

impl RawInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawInputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Collect a submitted form for `schema`.
///
/// Fields are read in schema order. Submitted keys the schema does not declare are ignored.
///
/// # Errors
///
/// Returns [`PredictError::InvalidInput`] listing every field that is missing, empty, out of
/// range or not one of its choices.
pub fn collect_submission(
    schema: &DomainSchema,
    submitted: &HashMap<String, String>,
) -> PredictResult<RawInputs> {
    let mut raw = RawInputs::new();
    let mut issues = Vec::new();

    for field in &schema.fields {
        let value = submitted.get(field.name).map(String::as_str).unwrap_or("");
        match field.validate_raw(value) {
            Ok(()) => raw.insert(field.name, value.trim()),
            Err(message) => issues.push(FieldIssue {
                field: field.label.to_string(),
                message,
            }),
        }
    }

    if issues.is_empty() {
        Ok(raw)
    } else {
        Err(PredictError::InvalidInput(issues))
    }
}
