//! Churn prediction handler

use axum::{extract::State, Json};
use churn_core::PredictionResult;

use crate::{AppState, AppResult};
use crate::middleware::ValidatedJson;
use crate::models::CustomerData;

/// Predict churn risk for one customer
pub async fn predict(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<CustomerData>,
) -> AppResult<Json<PredictionResult>> {
    let record = data.into_record()?;
    let result = state.predictor.predict(&record)?;

    tracing::info!(
        customer_id = %record.customer_id,
        churn_probability = result.churn_probability,
        risk_level = %result.risk_level,
        "Prediction served"
    );

    Ok(Json(result))
}
