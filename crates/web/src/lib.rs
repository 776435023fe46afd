//! # HDP Web
//!
//! Browser front-end for HDP.
//!
//! Handles:
//! - HTML pages and form posts with axum
//! - Mapping prediction errors to HTTP status codes
//! - A JSON liveness probe
//!
//! All prediction logic lives in `hdp-core`; handlers only collect, call and render.

#![warn(rust_2018_idioms)]

pub mod health;
pub mod pages;

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use hdp_core::{Domain, PredictError, PredictionService};
use std::collections::HashMap;
use tower_http::trace::TraceLayer;

use crate::health::{HealthRes, HealthService};
use crate::pages::Panel;

/// Application state for the web server.
///
/// Holds the prediction service, which shares the read-only schemas and models across
/// requests.
#[derive(Clone)]
pub struct AppState {
    service: PredictionService,
}

/// Build the router with every page and the health probe.
pub fn router(service: PredictionService) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/predict/:domain", get(show_form).post(submit_form))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

/// Status code for a prediction error. User mistakes are 4xx; anything else means the
/// deployment is broken.
pub fn status_for(err: &PredictError) -> StatusCode {
    match err {
        PredictError::UnknownDomain(_) => StatusCode::NOT_FOUND,
        e if e.is_user_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(state.service.registry().domains()))
}

#[axum::debug_handler]
async fn index(State(state): State<AppState>) -> Html<String> {
    Html(pages::index(state.service.registry()))
}

#[axum::debug_handler]
async fn show_form(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.service.registry().schema_by_name(&name) {
        Ok(schema) => Html(pages::form(schema, &HashMap::new(), None)).into_response(),
        Err(_) => not_found(&name),
    }
}

#[axum::debug_handler]
async fn submit_form(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Form(submitted): Form<HashMap<String, String>>,
) -> Response {
    let Ok(domain) = name.parse::<Domain>() else {
        return not_found(&name);
    };
    let Ok(schema) = state.service.registry().schema(domain) else {
        return not_found(&name);
    };

    let (status, panel) = match state.service.predict_submission(domain, &submitted) {
        Ok(presentation) => (StatusCode::OK, Panel::Result(presentation)),
        Err(err) => {
            let status = status_for(&err);
            if status.is_server_error() {
                tracing::error!(%domain, error = %err, "prediction failed");
            } else {
                tracing::info!(%domain, "submission rejected");
            }
            (status, error_panel(err))
        }
    };

    (status, Html(pages::form(schema, &submitted, Some(&panel)))).into_response()
}

fn error_panel(err: PredictError) -> Panel {
    match err {
        PredictError::InvalidInput(issues) => Panel::Issues(issues),
        e if e.is_user_error() => Panel::Error(e.to_string()),
        _ => Panel::Error("The prediction could not be made. Please try again later.".into()),
    }
}

fn not_found(name: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(pages::not_found(name))).into_response()
}
