//! Capability traits for trained models
//!
//! Inference is written against these traits rather than the concrete
//! model families, so the random forest or the isolation forest can be
//! replaced without touching the inference engine.

use serde::{Deserialize, Serialize};

use crate::error::IntakeError;

/// A fitted text classifier that assigns a category to a description
pub trait CategoryClassifier: Send + Sync {
    /// Predicts the category label for one description
    fn predict(&self, description: &str) -> Result<String, IntakeError>;

    /// Labels the classifier was trained on, sorted
    fn categories(&self) -> &[String];
}

/// A fitted detector that scores numeric claim attributes
pub trait AnomalyDetector: Send + Sync {
    /// Scores one (amount, tenure) observation
    fn score(&self, amount: f64, tenure: f64) -> AnomalyVerdict;
}

/// Detector output for one observation
///
/// `anomaly_score` follows the detector's native convention: lower is more
/// anomalous and negative values are outliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyVerdict {
    pub is_outlier: bool,
    pub anomaly_score: f64,
}
