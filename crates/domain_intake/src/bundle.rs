//! Model bundle
//!
//! A bundle pairs the fitted category model with the optional anomaly
//! detector and the metadata describing how it was trained. Bundles are
//! only built by the training pipeline and never mutated afterwards;
//! retraining produces a new bundle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::BundleId;

use crate::anomaly::IsolationForest;
use crate::category::CategoryModel;
use crate::model::{AnomalyDetector, CategoryClassifier};

/// Training metadata stamped into every bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMeta {
    pub bundle_id: BundleId,
    pub trained_at: DateTime<Utc>,
    /// Number of training records used
    pub training_count: usize,
    /// Sorted category labels the classifier can emit
    pub categories: Vec<String>,
    /// Version of the urgency keyword rules in force at training time
    pub urgency_ruleset_version: u32,
    pub fraud_detection_enabled: bool,
}

/// Trained models plus metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelBundle {
    category_model: CategoryModel,
    anomaly_model: Option<IsolationForest>,
    meta: BundleMeta,
}

impl ModelBundle {
    pub(crate) fn new(
        category_model: CategoryModel,
        anomaly_model: Option<IsolationForest>,
        meta: BundleMeta,
    ) -> Self {
        Self {
            category_model,
            anomaly_model,
            meta,
        }
    }

    pub fn meta(&self) -> &BundleMeta {
        &self.meta
    }

    pub fn category_model(&self) -> &CategoryModel {
        &self.category_model
    }

    pub fn anomaly_model(&self) -> Option<&IsolationForest> {
        self.anomaly_model.as_ref()
    }

    /// The category model behind its capability trait
    pub fn classifier(&self) -> &dyn CategoryClassifier {
        &self.category_model
    }

    /// The anomaly detector behind its capability trait, if trained
    pub fn detector(&self) -> Option<&dyn AnomalyDetector> {
        self.anomaly_model
            .as_ref()
            .map(|model| model as &dyn AnomalyDetector)
    }

    pub fn fraud_detection_enabled(&self) -> bool {
        self.anomaly_model.is_some()
    }
}

/// Whether a trained bundle is available, and what it contains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub active: bool,
    pub meta: Option<BundleMeta>,
}

impl ModelStatus {
    pub fn inactive() -> Self {
        Self {
            active: false,
            meta: None,
        }
    }

    pub fn of(bundle: Option<&ModelBundle>) -> Self {
        match bundle {
            Some(bundle) => Self {
                active: true,
                meta: Some(bundle.meta().clone()),
            },
            None => Self::inactive(),
        }
    }
}
