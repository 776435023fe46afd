//! Result presentation.
//!
//! Maps a model's class code to the domain's outcome message. A code the domain does not
//! declare is an error, never a silent negative.

use hdp_types::ClassCode;
use serde::Serialize;

use crate::gateway::PredictionResult;
use crate::schema::{DomainSchema, Severity};
use crate::{Domain, PredictError, PredictResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub domain: Domain,
    pub class_code: ClassCode,
    /// The model's own label for the class (cancer only), shown alongside the message.
    pub label: Option<String>,
    pub message: &'static str,
    pub severity: Severity,
}

impl Presentation {
    pub fn is_positive(&self) -> bool {
        self.severity == Severity::Positive
    }
}

/// # Errors
///
/// Returns [`PredictError::UnknownClass`] if `result.class_code` is not one of the domain's
/// declared outcomes.
pub fn present(schema: &DomainSchema, result: PredictionResult) -> PredictResult<Presentation> {
    let outcome = schema
        .outcome(result.class_code)
        .ok_or(PredictError::UnknownClass {
            domain: schema.domain,
            code: result.class_code,
        })?;

    Ok(Presentation {
        domain: schema.domain,
        class_code: result.class_code,
        label: result.label,
        message: outcome.message,
        severity: outcome.severity,
    })
}
