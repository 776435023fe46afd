//! Model artifact boundary for HDP.
//!
//! This crate reads pre-trained classifier artifacts and runs inference over them. It does not
//! know about disease domains, form fields or outcome messages; those live in `hdp-core`.
//!
//! Models are produced by an external training pipeline and exported as JSON (see
//! [`artifact`] for the format). Loading is strict: any inconsistency is reported at load time
//! so that a process never serves predictions from a partially valid model.

pub mod artifact;
mod estimator;
mod handle;
mod label_map;

pub use handle::ModelHandle;
pub use label_map::LabelMap;

use hdp_types::InputLayout;
use std::path::PathBuf;

/// Errors returned by the `hdp-model` crate.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("invalid model artifact: {0}")]
    Invalid(String),

    #[error("invalid label map: {0}")]
    LabelMap(String),

    #[error("model expects {expected} input, got {found}")]
    Layout {
        expected: InputLayout,
        found: InputLayout,
    },

    #[error("feature shape mismatch: {0}")]
    Shape(String),
}

/// Type alias for Results that can fail with a [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;
