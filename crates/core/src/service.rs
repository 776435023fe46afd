//! Prediction service.
//!
//! Runs one request end to end: assemble features, call the bound model, attach the model's
//! label and present the outcome. Requests are independent; the only shared state is the
//! read-only schema registry and model bundle.

use std::collections::HashMap;
use std::sync::Arc;

use crate::assembler::assemble;
use crate::collector::{collect_submission, RawInputs};
use crate::gateway::{ModelBundle, PredictionResult};
use crate::presenter::{present, Presentation};
use crate::schema::SchemaRegistry;
use crate::{Domain, PredictResult};

/// Pure prediction operations - no front-end concerns.
#[derive(Clone)]
pub struct PredictionService {
    registry: Arc<SchemaRegistry>,
    models: Arc<ModelBundle>,
}

impl PredictionService {
    /// Creates a new instance of PredictionService.
    ///
    /// # Arguments
    ///
    /// * `registry` - Schemas for every served domain.
    /// * `models` - Models bound against `registry` at startup.
    pub fn new(registry: Arc<SchemaRegistry>, models: Arc<ModelBundle>) -> Self {
        Self { registry, models }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Predict from already collected inputs.
    ///
    /// # Errors
    ///
    /// Returns a `PredictError` if:
    /// - the domain has no schema or model,
    /// - the inputs do not cover the schema or a value fails its transform,
    /// - the model rejects its input,
    /// - the model returns a class the domain does not declare.
    pub fn predict(&self, domain: Domain, raw: &RawInputs) -> PredictResult<Presentation> {
        let schema = self.registry.schema(domain)?;
        let gateway = self.models.gateway(domain)?;

        let features = assemble(schema, raw, gateway.layout())?;
        let class_code = gateway.predict(&features)?;
        let label = gateway.label_for(class_code);

        let presentation = present(schema, PredictionResult { class_code, label })?;

        // Clinical inputs are never logged.
        tracing::info!(
            %domain,
            class_code,
            severity = %presentation.severity,
            "prediction served"
        );
        Ok(presentation)
    }

    /// Collect a submitted form and predict from it.
    ///
    /// # Errors
    ///
    /// As [`PredictionService::predict`], plus [`crate::PredictError::InvalidInput`] when the
    /// form is incomplete or out of bounds. No model is called in that case.
    pub fn predict_submission(
        &self,
        domain: Domain,
        submitted: &HashMap<String, String>,
    ) -> PredictResult<Presentation> {
        let schema = self.registry.schema(domain)?;
        let raw = collect_submission(schema, submitted)?;
        self.predict(domain, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::{write_model_dir, StubGateway};
    use crate::gateway::ModelGateway;
    use crate::schema::Severity;
    use crate::{CoreConfig, PredictError};
    use hdp_types::{ClassCode, FeatureVector, InputLayout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls so tests can prove the model was not reached.
    struct CountingGateway {
        inner: StubGateway,
        calls: Arc<AtomicUsize>,
    }

    impl ModelGateway for CountingGateway {
        fn layout(&self) -> InputLayout {
            self.inner.layout
        }

        fn feature_names(&self) -> Vec<String> {
            self.inner.feature_names()
        }

        fn predict(&self, features: &FeatureVector) -> PredictResult<ClassCode> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.predict(features)
        }

        fn label_for(&self, code: ClassCode) -> Option<String> {
            self.inner.label_for(code)
        }
    }

    fn service(code: ClassCode) -> (PredictionService, Arc<AtomicUsize>) {
        let registry = SchemaRegistry::standard().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let gateways: Vec<(Domain, Arc<dyn ModelGateway>)> = registry
            .schemas()
            .map(|schema| {
                let layout = if schema.domain == Domain::Heart {
                    InputLayout::Vector
                } else {
                    InputLayout::Row
                };
                let mut inner = StubGateway::for_schema(schema, layout, code);
                if schema.domain == Domain::Cancer {
                    inner.label = Some(if code == 1 { "M" } else { "B" }.into());
                }
                let gateway: Arc<dyn ModelGateway> = Arc::new(CountingGateway {
                    inner,
                    calls: calls.clone(),
                });
                (schema.domain, gateway)
            })
            .collect();
        let models = ModelBundle::from_gateways(&registry, gateways).unwrap();
        (
            PredictionService::new(Arc::new(registry), Arc::new(models)),
            calls,
        )
    }

    fn heart_form() -> HashMap<String, String> {
        [
            ("age", "63"),
            ("sex", "Male"),
            ("cp", "Asymptomatic"),
            ("trestbps", "145"),
            ("chol", "233"),
            ("fbs", "True"),
            ("restecg", "Normal"),
            ("thalach", "150"),
            ("exang", "No"),
            ("oldpeak", "2.3"),
            ("slope", "Downsloping"),
            ("ca", "0"),
            ("thal", "Fixed Defect"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn cancer_form() -> HashMap<String, String> {
        SchemaRegistry::standard()
            .unwrap()
            .schema(Domain::Cancer)
            .unwrap()
            .fields
            .iter()
            .map(|f| (f.name.to_string(), "0.5".to_string()))
            .collect()
    }

    #[test]
    fn test_heart_positive() {
        let (service, calls) = service(1);
        let p = service
            .predict_submission(Domain::Heart, &heart_form())
            .unwrap();
        assert_eq!(p.message, "Disease Detected");
        assert_eq!(p.severity, Severity::Positive);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancer_negative_carries_label() {
        let (service, _) = service(0);
        let p = service
            .predict_submission(Domain::Cancer, &cancer_form())
            .unwrap();
        assert_eq!(p.message, "Benign (Non-Cancerous)");
        assert_eq!(p.label.as_deref(), Some("B"));
    }

    #[test]
    fn test_invalid_submission_never_reaches_model() {
        let (service, calls) = service(1);
        let mut form = heart_form();
        form.insert("age".into(), String::new());

        let err = service
            .predict_submission(Domain::Heart, &form)
            .expect_err("empty age");
        assert!(matches!(err, PredictError::InvalidInput(_)));
        assert!(err.is_user_error());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_undeclared_class_is_reported() {
        let (service, _) = service(7);
        let err = service
            .predict_submission(Domain::Heart, &heart_form())
            .expect_err("class 7");
        assert!(matches!(err, PredictError::UnknownClass { code: 7, .. }));
    }

    #[test]
    fn test_predict_with_loaded_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SchemaRegistry::standard().unwrap();
        write_model_dir(dir.path(), &registry);

        let cfg = CoreConfig::new(dir.path().to_path_buf()).unwrap();
        let models = ModelBundle::load(&cfg, &registry).unwrap();
        let service = PredictionService::new(Arc::new(registry), Arc::new(models));

        let heart = service
            .predict_submission(Domain::Heart, &heart_form())
            .unwrap();
        assert_eq!(heart.class_code, 1);

        let cancer = service
            .predict_submission(Domain::Cancer, &cancer_form())
            .unwrap();
        assert_eq!(cancer.message, "Malignant (Cancerous)");
        assert_eq!(cancer.label.as_deref(), Some("M"));

        let diabetes: RawInputs = [
            ("gender", "Other"),
            ("age", "30"),
            ("hypertension", "Yes"),
            ("heart_disease", "No"),
            ("smoking_history", "No Info"),
            ("bmi", "25"),
            ("HbA1c_level", "5.5"),
            ("blood_glucose_level", "120"),
        ]
        .into_iter()
        .collect();
        let diabetes = service.predict(Domain::Diabetes, &diabetes).unwrap();
        assert_eq!(diabetes.message, "No Diabetes");
    }
}
