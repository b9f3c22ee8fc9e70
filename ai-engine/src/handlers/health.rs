//! Liveness, health and model status handlers

use axum::{extract::State, Json};
use churn_core::EngineStatus;
use serde::Serialize;

use crate::AppState;

pub const SERVICE_NAME: &str = "ai-engine";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_DEGRADED: &str = "degraded (model not loaded)";

#[derive(Serialize)]
pub struct RootResponse {
    message: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "ChurnInsight AI Engine is running 🚀",
    })
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.predictor.is_model_loaded() {
        STATUS_ACTIVE
    } else {
        STATUS_DEGRADED
    };

    Json(HealthResponse {
        status,
        service: SERVICE_NAME,
    })
}

pub async fn model_status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.predictor.status())
}
