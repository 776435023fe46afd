use crate::schema::{DomainSchema, FieldSpec, OutcomeSpec, Severity};
use crate::Domain;

/// Diabetes: 8 columns, passed as a named row. The model pipeline one-hot encodes `gender`
/// and `smoking_history` itself, so those stay literal strings.
pub fn schema() -> DomainSchema {
    DomainSchema {
        domain: Domain::Diabetes,
        title: "Diabetes Prediction",
        fields: vec![
            FieldSpec::literal("gender", "Gender", &["Male", "Female", "Other"]),
            FieldSpec::integer("age", "Age", 1, 120).with_default(30.0),
            FieldSpec::coded("hypertension", "Hypertension", &[("No", 0), ("Yes", 1)]),
            FieldSpec::coded("heart_disease", "Heart Disease", &[("No", 0), ("Yes", 1)]),
            FieldSpec::literal(
                "smoking_history",
                "Smoking History",
                &["never", "current", "former", "No Info", "ever", "not current"],
            ),
            FieldSpec::float("bmi", "BMI", 10.0, 60.0, 0.1).with_default(25.0),
            FieldSpec::float("HbA1c_level", "HbA1c Level", 3.0, 15.0, 0.1).with_default(5.5),
            FieldSpec::integer("blood_glucose_level", "Blood Glucose Level", 50, 300)
                .with_default(120.0),
        ],
        outcomes: vec![
            OutcomeSpec {
                code: 1,
                message: "Diabetes Detected",
                severity: Severity::Positive,
            },
            OutcomeSpec {
                code: 0,
                message: "No Diabetes",
                severity: Severity::Negative,
            },
        ],
    }
}
