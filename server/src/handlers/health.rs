//! Health check handler

use axum::{Json, extract::State};
use serde::Serialize;

use crate::manager::ModelStatus;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_status: ModelStatus,
    version: &'static str,
    uptime_seconds: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_status: state.manager.status(),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: (chrono::Utc::now() - state.started_at).num_seconds(),
    })
}
