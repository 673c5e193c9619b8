//! HTTP API Layer
//!
//! This crate exposes the claim intake engine over REST using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: training, model status, claim scoring and the ledger
//! - **Middleware**: tracing and audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! Every scoring request loads the most recently saved bundle from the
//! [`BundleStore`]; the server keeps no in-memory model between requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState, config::IntakeConfig};
//!
//! let state = AppState::from_config(IntakeConfig::from_env()?);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_intake::{ClaimLedgerPort, ModelBundle, TrainingPipeline};
use infra_store::{BundleStore, FileClaimLedger};

use crate::config::IntakeConfig;
use crate::error::ApiError;
use crate::handlers::{claims, health, training};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BundleStore>,
    pub ledger: Arc<dyn ClaimLedgerPort>,
    pub pipeline: TrainingPipeline,
    pub config: Arc<IntakeConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<BundleStore>,
        ledger: Arc<dyn ClaimLedgerPort>,
        config: IntakeConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            pipeline: TrainingPipeline::new(config.training.clone()),
            config: Arc::new(config),
        }
    }

    /// File-backed store and ledger at the configured paths
    pub fn from_config(config: IntakeConfig) -> Self {
        let store = Arc::new(BundleStore::new(&config.bundle_path));
        let ledger = Arc::new(FileClaimLedger::new(&config.ledger_path));
        Self::new(store, ledger, config)
    }

    /// Loads the persisted bundle on a blocking worker
    pub async fn load_bundle(&self) -> Result<Option<ModelBundle>, ApiError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| ApiError::Internal(format!("Bundle load task failed: {e}")))?
            .map_err(ApiError::from)
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Model routes
    let model_routes = Router::new()
        .route("/train", post(training::train_model))
        .route("/model/status", get(training::model_status));

    // Claims routes
    let claims_routes = Router::new().route(
        "/claims",
        get(claims::list_claims)
            .post(claims::submit_claim)
            .delete(claims::delete_claim),
    );

    let api_routes = Router::new()
        .merge(model_routes)
        .merge(claims_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(DefaultBodyLimit::max(body_limit));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
