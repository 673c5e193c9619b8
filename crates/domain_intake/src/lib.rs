//! Claim Intake Domain
//!
//! This crate implements the claim intelligence engine: it trains a text
//! category classifier and a numeric anomaly detector from historical
//! claims, packages them into a [`ModelBundle`], and scores new claims.
//!
//! # Flow
//!
//! ```text
//! TrainingTable -> TrainingPipeline::train -> ModelBundle -> (persisted by infra_store)
//! ClaimInput + ModelBundle -> infer -> ClaimResult -> LedgerEntry -> ClaimLedgerPort
//! ```

pub mod urgency;
pub mod text;
pub mod model;
pub mod category;
pub mod anomaly;
pub mod dataset;
pub mod bundle;
pub mod training;
pub mod inference;
pub mod ledger;
pub mod error;

pub use urgency::{classify_urgency, UrgencyLevel, URGENCY_KEYWORDS, URGENCY_RULESET_VERSION};
pub use model::{AnomalyDetector, AnomalyVerdict, CategoryClassifier};
pub use category::{CategoryModel, ForestParams};
pub use anomaly::{IsolationForest, IsolationParams};
pub use dataset::{ColumnSchema, TrainingDataset, TrainingRecord, TrainingTable};
pub use bundle::{BundleMeta, ModelBundle, ModelStatus};
pub use training::{TrainingConfig, TrainingOutcome, TrainingPipeline, TrainingWarning};
pub use inference::{infer, ClaimInput, ClaimResult, FraudRisk};
pub use ledger::{ClaimLedgerPort, LedgerEntry, ReviewStatus};
pub use error::{IntakeError, SchemaError};
