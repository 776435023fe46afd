use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hdp_core::{
    bind_addr_from_env_value, resolve_model_dir, CoreConfig, ModelBundle, PredictionService,
    SchemaRegistry,
};

/// Main entry point for the HDP web application
///
/// Loads every model, checks each against its form schema and then serves the web
/// front-end. A missing, corrupt or mismatched model stops startup; nothing is served with
/// a partial set of models.
///
/// # Environment Variables
/// - `HDP_MODEL_DIR`: Directory holding the model artifacts (default: `models`)
/// - `HDP_ADDR`: Server address (default: "0.0.0.0:3000")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the model directory cannot be resolved or a model fails to load or bind,
/// - the server address cannot be parsed or bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("hdp=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let model_dir = resolve_model_dir(std::env::var("HDP_MODEL_DIR").ok().map(Into::into))?;
    let addr = bind_addr_from_env_value(std::env::var("HDP_ADDR").ok())?;

    let cfg = CoreConfig::new(model_dir)?;
    let registry = SchemaRegistry::standard()?;
    let models = ModelBundle::load(&cfg, &registry).inspect_err(|e| {
        tracing::error!(error = %e, "model loading failed");
    })?;

    let service = PredictionService::new(Arc::new(registry), Arc::new(models));
    let app = hdp_web::router(service);

    tracing::info!("++ Starting HDP web on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
