//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads environment variables.

use crate::constants::{
    CANCER_LABEL_MAP_FILENAME, CANCER_MODEL_FILENAME, DEFAULT_BIND_ADDR, DEFAULT_MODEL_DIR,
    DIABETES_MODEL_FILENAME, HEART_MODEL_FILENAME,
};
use crate::{Domain, PredictError, PredictResult};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    model_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::InvalidConfig`] if `model_dir` is not a directory.
    pub fn new(model_dir: PathBuf) -> PredictResult<Self> {
        if !model_dir.is_dir() {
            return Err(PredictError::InvalidConfig(format!(
                "model directory does not exist: {}",
                model_dir.display()
            )));
        }

        Ok(Self { model_dir })
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Path of the model artifact for `domain`.
    pub fn model_path(&self, domain: Domain) -> PathBuf {
        let filename = match domain {
            Domain::Heart => HEART_MODEL_FILENAME,
            Domain::Diabetes => DIABETES_MODEL_FILENAME,
            Domain::Cancer => CANCER_MODEL_FILENAME,
        };
        self.model_dir.join(filename)
    }

    /// Path of the label map artifact for `domain`, if the domain ships one.
    pub fn label_map_path(&self, domain: Domain) -> Option<PathBuf> {
        match domain {
            Domain::Cancer => Some(self.model_dir.join(CANCER_LABEL_MAP_FILENAME)),
            Domain::Heart | Domain::Diabetes => None,
        }
    }
}

/// Resolve the model directory without reading environment variables.
///
/// If `override_dir` is provided, it must be a directory. Otherwise this looks for `models/`
/// relative to the current working directory and then walks up from `CARGO_MANIFEST_DIR`.
pub fn resolve_model_dir(override_dir: Option<PathBuf>) -> PredictResult<PathBuf> {
    if let Some(model_dir) = override_dir {
        if model_dir.is_dir() {
            return Ok(model_dir);
        }
        return Err(PredictError::InvalidConfig(format!(
            "HDP_MODEL_DIR override is not a directory: {}",
            model_dir.display()
        )));
    }

    let cwd_relative = PathBuf::from(DEFAULT_MODEL_DIR);
    if cwd_relative.is_dir() {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(DEFAULT_MODEL_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }

    Err(PredictError::InvalidConfig(
        "could not locate a models/ directory; set HDP_MODEL_DIR".into(),
    ))
}

/// Parse the bind address from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default address.
pub fn bind_addr_from_env_value(value: Option<String>) -> PredictResult<SocketAddr> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

    value
        .parse()
        .map_err(|_| PredictError::InvalidConfig(format!("invalid bind address: {value}")))
}
