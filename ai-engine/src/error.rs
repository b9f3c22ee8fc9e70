//! Error handling
//!
//! Every per-request failure becomes a `{"detail": ...}` JSON body.

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use churn_core::PredictError;
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

pub const MODEL_UNAVAILABLE_DETAIL: &str = "Model not loaded. Please try again later.";

#[derive(Debug, Error)]
pub enum AppError {
    /// No classifier was loaded at startup
    #[error("Model not loaded. Please try again later.")]
    ModelUnavailable,

    /// Malformed or out-of-constraint request body
    #[error("{0}")]
    Validation(String),

    /// The classifier rejected the input or failed
    #[error("{0}")]
    Inference(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::ModelUnavailable => tracing::warn!("Prediction requested but no model is loaded"),
            AppError::Validation(msg) => tracing::debug!("Rejected request body: {}", msg),
            AppError::Inference(msg) => tracing::error!("Inference error: {}", msg),
        }

        let body = Json(json!({
            "detail": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::ModelUnavailable => AppError::ModelUnavailable,
            PredictError::Inference(e) => AppError::Inference(e.to_string()),
        }
    }
}
