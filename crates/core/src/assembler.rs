//! Feature assembly.
//!
//! Applies each field's transform in schema order and builds the input in the calling
//! convention the bound model declares. The layout is a property of the model, not a choice
//! made here.

use hdp_types::{FeatureRow, FeatureVector, InputLayout};

use crate::collector::RawInputs;
use crate::schema::DomainSchema;
use crate::{PredictError, PredictResult};

/// Build the model input for one request.
///
/// # Errors
///
/// Returns:
/// - [`PredictError::SchemaMismatch`] if a declared field has no raw value, or a field yields
///   text for a model that takes a numeric vector;
/// - [`PredictError::InvalidValue`] if a raw value fails its field's transform.
pub fn assemble(
    schema: &DomainSchema,
    raw: &RawInputs,
    layout: InputLayout,
) -> PredictResult<FeatureVector> {
    for name in raw.names() {
        if schema.field(name).is_none() {
            tracing::warn!(domain = %schema.domain, field = name, "ignoring undeclared raw input");
        }
    }

    let mut ordered = Vec::with_capacity(schema.fields.len());
    let mut row = FeatureRow::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let value = raw.get(field.name).ok_or_else(|| {
            PredictError::SchemaMismatch(format!(
                "{} input has no value for {}",
                schema.domain, field.name
            ))
        })?;
        let value = field
            .transform(value)
            .map_err(|reason| PredictError::InvalidValue {
                field: field.name.to_string(),
                reason,
            })?;

        match layout {
            InputLayout::Vector => {
                let number = value.as_f64().ok_or_else(|| {
                    PredictError::SchemaMismatch(format!(
                        "{} is text but the {} model takes a numeric vector",
                        field.name, schema.domain
                    ))
                })?;
                ordered.push(number);
            }
            InputLayout::Row => row
                .push(field.name, value)
                .map_err(|e| PredictError::SchemaMismatch(e.to_string()))?,
        }
    }

    Ok(match layout {
        InputLayout::Vector => FeatureVector::Ordered(ordered),
        InputLayout::Row => FeatureVector::Row(row),
    })
}
