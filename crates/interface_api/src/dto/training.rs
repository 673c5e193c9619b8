//! Training DTOs

use serde::Serialize;

use domain_intake::{BundleMeta, TrainingOutcome, TrainingWarning};

/// A training warning with its human-readable text
#[derive(Debug, Serialize)]
pub struct WarningResponse {
    #[serde(flatten)]
    pub warning: TrainingWarning,
    pub message: String,
}

/// Body returned by `POST /train`
#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub message: String,
    pub meta: BundleMeta,
    pub warnings: Vec<WarningResponse>,
}

impl From<&TrainingOutcome> for TrainResponse {
    fn from(outcome: &TrainingOutcome) -> Self {
        let meta = outcome.bundle.meta().clone();
        Self {
            message: format!(
                "System trained on {} records across {} categories",
                meta.training_count,
                meta.categories.len()
            ),
            meta,
            warnings: outcome
                .warnings
                .iter()
                .map(|warning| WarningResponse {
                    message: warning.to_string(),
                    warning: warning.clone(),
                })
                .collect(),
        }
    }
}
