//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_loaded: Option<bool>,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_loaded: None,
    })
}

/// Readiness check (ledger and bundle store readable)
///
/// An untrained system is still ready: it accepts training requests.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    state.ledger.list_all().await.map_err(|e| {
        warn!(error = %e, "Ledger not readable");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let bundle = state.load_bundle().await.map_err(|e| {
        warn!(error = %e, "Model bundle not readable");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_loaded: Some(bundle.is_some()),
    }))
}
