//! Claims handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;

use domain_intake::{infer, LedgerEntry};

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Scores a claim and records it for review
pub async fn submit_claim(
    State(state): State<AppState>,
    payload: Result<Json<ClaimSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<LedgerEntry>), ApiError> {
    let Json(request) = payload?;
    let claim = request.into_claim_input()?;
    let bundle = state.load_bundle().await?;
    let result = infer(bundle.as_ref(), &claim)?;

    let entry = LedgerEntry::pending_review(&claim, &result);
    state.ledger.append(&entry).await?;

    info!(
        entry_id = %entry.entry_id,
        category = %entry.category,
        urgency = %entry.urgency,
        fraud_risk = %entry.fraud_risk,
        "Claim submitted"
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Lists every ledger entry
pub async fn list_claims(State(state): State<AppState>) -> Result<Json<Vec<LedgerEntry>>, ApiError> {
    let entries = state.ledger.list_all().await?;
    Ok(Json(entries))
}

/// Deletes the entries for a customer submitted at the given instant
pub async fn delete_claim(
    State(state): State<AppState>,
    query: Result<Query<DeleteClaimQuery>, QueryRejection>,
) -> Result<Json<DeleteClaimResponse>, ApiError> {
    let Query(query) = query?;
    state
        .ledger
        .delete(&query.customer_id, query.submitted_at)
        .await?;

    Ok(Json(DeleteClaimResponse {
        message: "Claim deleted".to_string(),
        customer_id: query.customer_id,
        submitted_at: query.submitted_at,
    }))
}
