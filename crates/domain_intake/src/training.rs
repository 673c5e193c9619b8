//! Training pipeline
//!
//! ```text
//! TrainingTable -> validate schema -> fit category model
//!               -> fit anomaly detector (if amount + tenure present)
//!               -> assemble meta -> ModelBundle
//! ```
//!
//! Any failure aborts the whole run; no bundle is produced. Missing
//! numeric columns are not a failure: the bundle is built without an
//! anomaly detector and a warning is reported.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use core_kernel::BundleId;

use crate::anomaly::{fit_anomaly_model, IsolationParams};
use crate::bundle::{BundleMeta, ModelBundle};
use crate::category::{fit_category_model, ForestParams};
use crate::dataset::{ColumnSchema, TrainingDataset, TrainingTable};
use crate::error::IntakeError;
use crate::model::CategoryClassifier;
use crate::urgency::URGENCY_RULESET_VERSION;

/// Training hyper-parameters and column mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub schema: ColumnSchema,
    pub forest: ForestParams,
    pub isolation: IsolationParams,
}

/// Non-fatal conditions raised while training
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrainingWarning {
    /// Amount or tenure column absent; the bundle has no anomaly detector
    FraudDetectionDisabled { missing_columns: Vec<String> },
}

impl fmt::Display for TrainingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingWarning::FraudDetectionDisabled { missing_columns } => write!(
                f,
                "{} column(s) missing. Fraud detection disabled.",
                missing_columns.join(", ")
            ),
        }
    }
}

/// A freshly trained bundle and any warnings raised building it
#[derive(Debug)]
pub struct TrainingOutcome {
    pub bundle: ModelBundle,
    pub warnings: Vec<TrainingWarning>,
}

/// Fits category and anomaly models from historical claims
#[derive(Debug, Clone, Default)]
pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Trains a new bundle from a raw table
    ///
    /// # Errors
    ///
    /// - `IntakeError::Schema` when required columns or values are invalid
    /// - `IntakeError::Fit` when either model cannot be fitted
    pub fn train(&self, table: &TrainingTable) -> Result<TrainingOutcome, IntakeError> {
        let dataset = TrainingDataset::from_table(table, &self.config.schema)?;
        self.train_dataset(&dataset)
    }

    /// Trains a new bundle from an already validated dataset
    pub fn train_dataset(&self, dataset: &TrainingDataset) -> Result<TrainingOutcome, IntakeError> {
        info!(records = dataset.len(), "Training category model");
        let category_model = fit_category_model(
            &dataset.descriptions(),
            &dataset.labels(),
            &self.config.forest,
        )?;

        let mut warnings = Vec::new();
        let numeric_rows = dataset.numeric_rows();
        if numeric_rows.is_none() {
            let missing_columns = dataset.missing_numeric_columns().to_vec();
            warn!(
                missing = ?missing_columns,
                "Numeric columns missing. Fraud detection disabled."
            );
            warnings.push(TrainingWarning::FraudDetectionDisabled { missing_columns });
        } else {
            info!(records = dataset.len(), "Fitting isolation forest for anomaly detection");
        }
        let anomaly_model = fit_anomaly_model(numeric_rows.as_deref(), &self.config.isolation)?;

        let meta = BundleMeta {
            bundle_id: BundleId::new_v7(),
            trained_at: Utc::now(),
            training_count: dataset.len(),
            categories: category_model.categories().to_vec(),
            urgency_ruleset_version: URGENCY_RULESET_VERSION,
            fraud_detection_enabled: anomaly_model.is_some(),
        };

        info!(
            bundle_id = %meta.bundle_id,
            training_count = meta.training_count,
            categories = meta.categories.len(),
            fraud_detection = meta.fraud_detection_enabled,
            "Training complete"
        );

        Ok(TrainingOutcome {
            bundle: ModelBundle::new(category_model, anomaly_model, meta),
            warnings,
        })
    }
}

/// Trains a bundle with default hyper-parameters
pub fn train(table: &TrainingTable) -> Result<TrainingOutcome, IntakeError> {
    TrainingPipeline::default().train(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_warning_display_names_columns() {
        let warning = TrainingWarning::FraudDetectionDisabled {
            missing_columns: vec!["Amount".to_string(), "Customer_Tenure".to_string()],
        };
        assert_eq!(
            warning.to_string(),
            "Amount, Customer_Tenure column(s) missing. Fraud detection disabled."
        );
    }

    #[test]
    fn test_training_config_deserializes_partial_overrides() {
        let config: TrainingConfig =
            serde_json::from_value(json!({"forest": {"n_trees": 10}})).unwrap();
        assert_eq!(config.forest.n_trees, 10);
        assert_eq!(config.forest.seed, 42);
        assert_eq!(config.isolation.contamination, 0.1);
        assert_eq!(config.schema.text, "Description");
    }

    #[test]
    fn test_single_category_is_fit_error() {
        let table = TrainingTable::from_json_value(json!([
            {"Description": "burst pipe", "Policy_Type": "Home"},
            {"Description": "roof leak", "Policy_Type": "Home"},
        ]))
        .unwrap();
        let err = train(&table).unwrap_err();
        assert!(matches!(err, IntakeError::Fit(_)));
    }
}
