use crate::schema::{DomainSchema, FieldSpec, OutcomeSpec, Severity};
use crate::Domain;

/// Heart disease: 13 features, passed to the model as an ordered numeric vector.
pub fn schema() -> DomainSchema {
    DomainSchema {
        domain: Domain::Heart,
        title: "Heart Disease Prediction",
        fields: vec![
            FieldSpec::integer("age", "Age", 1, 120),
            FieldSpec::coded("sex", "Sex", &[("Male", 1), ("Female", 0)]),
            FieldSpec::coded(
                "cp",
                "Chest Pain Type",
                &[
                    ("Typical Angina", 0),
                    ("Atypical Angina", 1),
                    ("Non-anginal Pain", 2),
                    ("Asymptomatic", 3),
                ],
            ),
            FieldSpec::integer("trestbps", "Resting Blood Pressure (mm Hg)", 80, 250),
            FieldSpec::integer("chol", "Serum Cholesterol (mg/dl)", 100, 600),
            FieldSpec::coded(
                "fbs",
                "Fasting Blood Sugar > 120 mg/dl",
                &[("True", 1), ("False", 0)],
            ),
            FieldSpec::coded(
                "restecg",
                "Resting ECG Results",
                &[
                    ("Normal", 0),
                    ("ST-T wave abnormality", 1),
                    ("Left ventricular hypertrophy", 2),
                ],
            ),
            FieldSpec::integer("thalach", "Maximum Heart Rate Achieved", 60, 250),
            FieldSpec::coded("exang", "Exercise Induced Angina", &[("Yes", 1), ("No", 0)]),
            FieldSpec::float("oldpeak", "ST Depression Induced by Exercise", 0.0, 10.0, 0.1),
            FieldSpec::coded(
                "slope",
                "Slope of Peak Exercise ST Segment",
                &[("Upsloping", 0), ("Flat", 1), ("Downsloping", 2)],
            ),
            FieldSpec::coded(
                "ca",
                "Number of Major Vessels Colored by Fluoroscopy",
                &[("0", 0), ("1", 1), ("2", 2), ("3", 3), ("4", 4)],
            ),
            FieldSpec::coded(
                "thal",
                "Thalassemia Test Result",
                &[("Normal", 1), ("Fixed Defect", 2), ("Reversible Defect", 3)],
            ),
        ],
        outcomes: vec![
            OutcomeSpec {
                code: 1,
                message: "Disease Detected",
                severity: Severity::Positive,
            },
            OutcomeSpec {
                code: 0,
                message: "No Disease",
                severity: Severity::Negative,
            },
        ],
    }
}
