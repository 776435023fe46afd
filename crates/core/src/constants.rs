//! Constants used throughout the HDP core crate.
//!
//! Artifact filenames are owned by the training pipeline; they are collected here so that the
//! loader and the documentation agree.

/// Default directory searched for model artifacts when no explicit directory is configured.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Default address for the web front-end.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Heart disease model artifact.
pub const HEART_MODEL_FILENAME: &str = "heart_model.json";

/// Diabetes model artifact.
pub const DIABETES_MODEL_FILENAME: &str = "diabetes_model.json";

/// Breast cancer model artifact.
pub const CANCER_MODEL_FILENAME: &str = "cancer_model.json";

/// Breast cancer class-code to label mapping.
pub const CANCER_LABEL_MAP_FILENAME: &str = "cancer_label_map.json";
