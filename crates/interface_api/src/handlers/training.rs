//! Training and model status handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use domain_intake::{IntakeError, ModelStatus, TrainingOutcome, TrainingTable};

use crate::dto::training::TrainResponse;
use crate::{error::ApiError, AppState};

/// Trains a new bundle from a JSON array of rows and persists it
///
/// Fitting and saving run on a blocking worker so scoring requests keep
/// being served while the forest is built.
pub async fn train_model(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TrainResponse>, ApiError> {
    let Json(rows) = payload?;
    let table = TrainingTable::from_json_value(rows).map_err(IntakeError::from)?;
    info!(rows = table.len(), "Training requested");

    let pipeline = state.pipeline.clone();
    let store = Arc::clone(&state.store);
    let outcome = tokio::task::spawn_blocking(move || -> Result<TrainingOutcome, ApiError> {
        let outcome = pipeline.train(&table)?;
        store.save(&outcome.bundle)?;
        Ok(outcome)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Training task failed: {e}")))??;

    for warning in &outcome.warnings {
        warn!(warning = %warning, "Training completed with warning");
    }

    Ok(Json(TrainResponse::from(&outcome)))
}

/// Reports whether a trained bundle is available
pub async fn model_status(State(state): State<AppState>) -> Result<Json<ModelStatus>, ApiError> {
    let bundle = state.load_bundle().await?;
    Ok(Json(ModelStatus::of(bundle.as_ref())))
}
