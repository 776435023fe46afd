use crate::schema::{DomainSchema, FieldSpec, OutcomeSpec, Severity};
use crate::Domain;

/// (name, label, min, max, default, step), in training column order.
const MEASUREMENTS: [(&str, &str, f64, f64, f64, f64); 30] = [
    ("radius_mean", "Radius Mean", 0.0, 50.0, 14.0, 0.1),
    ("texture_mean", "Texture Mean", 0.0, 50.0, 19.0, 0.1),
    ("perimeter_mean", "Perimeter Mean", 0.0, 200.0, 90.0, 0.1),
    ("area_mean", "Area Mean", 0.0, 3000.0, 600.0, 1.0),
    ("smoothness_mean", "Smoothness Mean", 0.0, 1.0, 0.1, 0.01),
    ("compactness_mean", "Compactness Mean", 0.0, 1.0, 0.1, 0.01),
    ("concavity_mean", "Concavity Mean", 0.0, 1.0, 0.1, 0.01),
    ("concave_points_mean", "Concave Points Mean", 0.0, 1.0, 0.05, 0.01),
    ("symmetry_mean", "Symmetry Mean", 0.0, 1.0, 0.2, 0.01),
    ("fractal_dimension_mean", "Fractal Dimension Mean", 0.0, 1.0, 0.05, 0.01),
    ("radius_se", "Radius SE", 0.0, 5.0, 0.5, 0.01),
    ("texture_se", "Texture SE", 0.0, 5.0, 0.5, 0.01),
    ("perimeter_se", "Perimeter SE", 0.0, 10.0, 1.0, 0.1),
    ("area_se", "Area SE", 0.0, 1000.0, 40.0, 1.0),
    ("smoothness_se", "Smoothness SE", 0.0, 1.0, 0.01, 0.001),
    ("compactness_se", "Compactness SE", 0.0, 1.0, 0.02, 0.001),
    ("concavity_se", "Concavity SE", 0.0, 1.0, 0.03, 0.001),
    ("concave_points_se", "Concave Points SE", 0.0, 1.0, 0.01, 0.001),
    ("symmetry_se", "Symmetry SE", 0.0, 1.0, 0.02, 0.001),
    ("fractal_dimension_se", "Fractal Dimension SE", 0.0, 1.0, 0.01, 0.001),
    ("radius_worst", "Radius Worst", 0.0, 50.0, 16.0, 0.1),
    ("texture_worst", "Texture Worst", 0.0, 50.0, 25.0, 0.1),
    ("perimeter_worst", "Perimeter Worst", 0.0, 200.0, 105.0, 0.1),
    ("area_worst", "Area Worst", 0.0, 3000.0, 700.0, 1.0),
    ("smoothness_worst", "Smoothness Worst", 0.0, 1.0, 0.15, 0.01),
    ("compactness_worst", "Compactness Worst", 0.0, 1.0, 0.25, 0.01),
    ("concavity_worst", "Concavity Worst", 0.0, 1.0, 0.3, 0.01),
    ("concave_points_worst", "Concave Points Worst", 0.0, 1.0, 0.15, 0.01),
    ("symmetry_worst", "Symmetry Worst", 0.0, 1.0, 0.3, 0.01),
    ("fractal_dimension_worst", "Fractal Dimension Worst", 0.0, 1.0, 0.1, 0.01),
];

/// Breast cancer: 30 cell-nucleus measurements, passed as a named row.
pub fn schema() -> DomainSchema {
    DomainSchema {
        domain: Domain::Cancer,
        title: "Breast Cancer Prediction",
        fields: MEASUREMENTS
            .iter()
            .map(|&(name, label, min, max, default, step)| {
                FieldSpec::float(name, label, min, max, step).with_default(default)
            })
            .collect(),
        outcomes: vec![
            OutcomeSpec {
                code: 1,
                message: "Malignant (Cancerous)",
                severity: Severity::Positive,
            },
            OutcomeSpec {
                code: 0,
                message: "Benign (Non-Cancerous)",
                severity: Severity::Negative,
            },
        ],
    }
}
