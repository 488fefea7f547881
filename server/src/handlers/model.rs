//! Prediction, model info and retraining handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};
use crate::manager::{ModelInfo, PredictionResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct RetrainResponse {
    message: &'static str,
    accuracy: f64,
}

/// POST /api/predict
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServiceResult<Json<PredictionResult>> {
    let Json(body) =
        payload.map_err(|rejection| ServiceError::InvalidBody(rejection.body_text()))?;
    state.manager.predict(&body).map(Json)
}

/// GET /api/model-info
pub async fn info(State(state): State<AppState>) -> ServiceResult<Json<ModelInfo>> {
    state.manager.info().map(Json)
}

/// POST /api/retrain
///
/// Training is CPU-bound, so it runs on the blocking pool. The request waits
/// for it to finish.
pub async fn retrain(State(state): State<AppState>) -> ServiceResult<Json<RetrainResponse>> {
    let manager = Arc::clone(&state.manager);
    let outcome = tokio::task::spawn_blocking(move || manager.retrain())
        .await
        .map_err(|e| ServiceError::Internal(format!("retrain task failed: {e}")))??;

    Ok(Json(RetrainResponse {
        message: "Model retrained successfully",
        accuracy: outcome.accuracy,
    }))
}
