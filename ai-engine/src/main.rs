//! ChurnInsight AI Engine
//!
//! Churn prediction microservice.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  CHURNINSIGHT AI ENGINE                  │
//! ├──────────────────────────────────────────────────────────┤
//! │  POST /api/predict                                       │
//! │     │ ValidatedJson<CustomerData>   (422 on bad body)    │
//! │     ▼                                                    │
//! │  ChurnPredictor ── encode ── classify ── tier/action     │
//! │     │                 (503 no model, 500 inference)      │
//! │     ▼                                                    │
//! │  models/churn_model.json  (loaded once at startup)       │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod middleware;
mod error;

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use churn_core::ChurnPredictor;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ai_engine=debug,churn_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("ChurnInsight AI Engine starting ({})...", config.environment);

    // Load the model before accepting requests; a missing model only degrades
    let predictor = ChurnPredictor::load(&config.model_path);
    if predictor.is_model_loaded() {
        tracing::info!("Model loaded from {}", config.model_path.display());
    } else {
        tracing::warn!("No model at {} - /api/predict will return 503", config.model_path.display());
    }

    let state = AppState {
        predictor: Arc::new(predictor),
        config: config.clone(),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("🚀 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<ChurnPredictor>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::check))
        .route("/api/predict", post(handlers::predict::predict))
        .route("/api/model/status", get(handlers::health::model_status))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Allow-listed origins with credentials; methods and headers are mirrored
/// because wildcards are not allowed together with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
