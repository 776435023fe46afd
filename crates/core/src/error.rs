use crate::domain::Domain;
use std::fmt;

/// A collection problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load {domain} model: {source}")]
    ModelLoad {
        domain: Domain,
        #[source]
        source: hdp_model::ModelError,
    },
    #[error("{domain} model does not match its form schema: {reason}")]
    ModelBinding { domain: Domain, reason: String },

    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    #[error("invalid input: {}", join_issues(.0))]
    InvalidInput(Vec<FieldIssue>),
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("prediction failed: {0}")]
    Model(#[from] hdp_model::ModelError),
    #[error("{domain} model returned undeclared class {code}")]
    UnknownClass { domain: Domain, code: i64 },
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl PredictError {
    /// Whether the error was caused by what the user entered, as opposed to a
    /// collector/schema/model desynchronisation or a startup failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PredictError::InvalidInput(_) | PredictError::InvalidValue { .. }
        )
    }
}

pub type PredictResult<T> = std::result::Result<T, PredictError>;
