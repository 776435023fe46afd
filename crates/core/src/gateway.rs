//! Model gateway.
//!
//! [`ModelGateway`] is the seam between the prediction pipeline and a trained model. The
//! production implementation is [`hdp_model::ModelHandle`]; tests inject stubs.
//!
//! Models are loaded once into an immutable [`ModelBundle`] that is passed to request handling
//! explicitly. Any failure while loading or binding a model is fatal at startup.

use hdp_model::{LabelMap, ModelHandle};
use hdp_types::{ClassCode, FeatureVector, InputLayout};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::schema::{DomainSchema, SchemaRegistry};
use crate::{CoreConfig, Domain, PredictError, PredictResult};

/// A class prediction, with the model's own label for it when one is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub class_code: ClassCode,
    pub label: Option<String>,
}

/// A loaded, read-only classifier.
pub trait ModelGateway: Send + Sync {
    /// Calling convention the model was trained with.
    fn layout(&self) -> InputLayout;

    /// Feature names in training order.
    fn feature_names(&self) -> Vec<String>;

    /// Run one prediction. Deterministic; never retried.
    fn predict(&self, features: &FeatureVector) -> PredictResult<ClassCode>;

    fn label_for(&self, _code: ClassCode) -> Option<String> {
        None
    }
}

impl ModelGateway for ModelHandle {
    fn layout(&self) -> InputLayout {
        ModelHandle::layout(self)
    }

    fn feature_names(&self) -> Vec<String> {
        ModelHandle::feature_names(self)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn predict(&self, features: &FeatureVector) -> PredictResult<ClassCode> {
        Ok(ModelHandle::predict(self, features)?)
    }

    fn label_for(&self, code: ClassCode) -> Option<String> {
        ModelHandle::label_for(self, code).map(str::to_string)
    }
}

/// Check that a model was trained on exactly the schema's fields, in order.
pub fn check_binding(schema: &DomainSchema, gateway: &dyn ModelGateway) -> Result<(), String> {
    let expected = schema.field_names();
    let found = gateway.feature_names();

    if expected.len() != found.len() {
        return Err(format!(
            "schema declares {} fields, model was trained on {}",
            expected.len(),
            found.len()
        ));
    }
    if let Some((i, (e, f))) = expected
        .iter()
        .zip(&found)
        .enumerate()
        .find(|(_, (e, f))| **e != f.as_str())
    {
        return Err(format!(
            "feature {i} is {f:?} in the model but {e:?} in the schema"
        ));
    }
    Ok(())
}

/// One model per domain, loaded once and shared read-only for the process lifetime.
#[derive(Clone)]
pub struct ModelBundle {
    gateways: BTreeMap<Domain, Arc<dyn ModelGateway>>,
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("domains", &self.gateways.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ModelBundle {
    /// Load every registered domain's artifact (and label map, where the domain has one).
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ModelLoad`] if an artifact or label map is absent or corrupt,
    /// and [`PredictError::ModelBinding`] if a model's features do not match its schema.
    pub fn load(cfg: &CoreConfig, registry: &SchemaRegistry) -> PredictResult<Self> {
        let mut gateways: Vec<(Domain, Arc<dyn ModelGateway>)> = Vec::new();

        for domain in registry.domains() {
            let load = || -> hdp_model::ModelResult<ModelHandle> {
                let handle = ModelHandle::load(&cfg.model_path(domain))?;
                match cfg.label_map_path(domain) {
                    Some(path) => Ok(handle.with_labels(LabelMap::load(&path)?)),
                    None => Ok(handle),
                }
            };
            let handle = load().map_err(|source| PredictError::ModelLoad { domain, source })?;
            gateways.push((domain, Arc::new(handle)));
        }

        Self::from_gateways(registry, gateways)
    }

    /// Build a bundle from already loaded gateways.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ModelBinding`] if a registered domain has no gateway, or a
    /// gateway's features do not match its domain's schema.
    pub fn from_gateways(
        registry: &SchemaRegistry,
        gateways: impl IntoIterator<Item = (Domain, Arc<dyn ModelGateway>)>,
    ) -> PredictResult<Self> {
        let gateways: BTreeMap<_, _> = gateways.into_iter().collect();

        for schema in registry.schemas() {
            let domain = schema.domain;
            let gateway = gateways.get(&domain).ok_or_else(|| PredictError::ModelBinding {
                domain,
                reason: "no model loaded".into(),
            })?;
            check_binding(schema, gateway.as_ref())
                .map_err(|reason| PredictError::ModelBinding { domain, reason })?;
            tracing::info!(%domain, layout = %gateway.layout(), "model bound");
        }

        Ok(Self { gateways })
    }

    /// # Errors
    ///
    /// Returns [`PredictError::UnknownDomain`] if no model is bound for `domain`.
    pub fn gateway(&self, domain: Domain) -> PredictResult<&dyn ModelGateway> {
        self.gateways
            .get(&domain)
            .map(|g| g.as_ref())
            .ok_or_else(|| PredictError::UnknownDomain(domain.to_string()))
    }

    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.gateways.keys().copied()
    }
}
