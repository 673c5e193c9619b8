//! Claims Intake - API Server Binary
//!
//! Starts the HTTP API for training the intake models and scoring claims.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin claims-intake-api
//!
//! # Run with environment variables
//! INTAKE_PORT=9000 INTAKE_BUNDLE_PATH=/var/lib/intake/bundle.bin cargo run --bin claims-intake-api
//! ```
//!
//! # Environment Variables
//!
//! * `INTAKE_HOST` - Server host (default: 0.0.0.0)
//! * `INTAKE_PORT` - Server port (default: 8080)
//! * `INTAKE_BUNDLE_PATH` - Model bundle file (default: models/trained_brain.bin)
//! * `INTAKE_LEDGER_PATH` - Claims ledger file (default: data/claims_ledger.jsonl)
//! * `INTAKE_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `INTAKE_MAX_UPLOAD_BYTES` - Largest accepted request body
//! * `INTAKE_TRAINING__FOREST__N_TREES`, `INTAKE_TRAINING__ISOLATION__CONTAMINATION`, ...
//!   - training hyper-parameters
//! * `INTAKE_CONFIG_FILE` - Optional config file (default: intake.toml)

use anyhow::Context;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interface_api::{config::IntakeConfig, create_router, AppState};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, reports the stored model
/// and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = IntakeConfig::from_env().context("Failed to load configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        bundle_path = %config.bundle_path.display(),
        ledger_path = %config.ledger_path.display(),
        "Starting Claims Intake API Server"
    );

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr()))?;

    let state = AppState::from_config(config);
    report_model(&state).await;

    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Logs whether a trained bundle is available at startup.
///
/// An unreadable bundle is reported but does not stop the server; the
/// next training request replaces it.
async fn report_model(state: &AppState) {
    match state.load_bundle().await {
        Ok(Some(bundle)) => {
            let meta = bundle.meta();
            tracing::info!(
                bundle_id = %meta.bundle_id,
                trained_at = %meta.trained_at,
                training_count = meta.training_count,
                fraud_detection = meta.fraud_detection_enabled,
                "Model bundle available"
            );
        }
        Ok(None) => tracing::warn!("No trained model found. Train the system before submitting claims."),
        Err(err) => tracing::error!(error = %err, "Stored model bundle could not be read"),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
