//! # HDP Core
//!
//! Core logic for the health disease prediction front-end.
//!
//! This crate turns what a person entered into a trained model's input and the model's answer
//! into a message:
//! - Field schemas for the heart, diabetes and cancer domains
//! - Form collection and validation against those schemas
//! - Feature assembly in each model's calling convention
//! - Model loading and the startup check that a model matches its schema
//! - Mapping class codes to outcome messages
//!
//! **No front-end concerns**: HTTP routing, HTML and terminal prompting belong in `web` and
//! `cli`.

pub mod assembler;
pub mod collector;
pub mod config;
pub mod constants;
pub mod domain;
pub mod domains;
pub mod error;
pub mod gateway;
pub mod presenter;
pub mod schema;
pub mod service;

pub use assembler::assemble;
pub use collector::{collect_submission, RawInputs};
pub use config::{bind_addr_from_env_value, resolve_model_dir, CoreConfig};
pub use domain::Domain;
pub use error::{FieldIssue, PredictError, PredictResult};
pub use gateway::{ModelBundle, ModelGateway, PredictionResult};
pub use presenter::{present, Presentation};
pub use schema::{
    ChoiceOption, DomainSchema, Encoding, FieldKind, FieldSpec, NumberType, NumericSpec,
    OutcomeSpec, SchemaRegistry, Severity,
};
pub use service::PredictionService;

pub use hdp_types::{ClassCode, FeatureValue, FeatureVector, InputLayout};
