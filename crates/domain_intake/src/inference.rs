//! Claim scoring
//!
//! Inference composes the three signals for one claim: the trained
//! category classifier, the keyword urgency rules and, when the bundle
//! carries one, the anomaly detector. It performs no I/O and never
//! mutates the bundle, so one loaded bundle can serve concurrent calls.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::bundle::ModelBundle;
use crate::error::IntakeError;
use crate::model::{AnomalyDetector, CategoryClassifier};
use crate::urgency::{classify_urgency, matched_urgency_keywords, UrgencyLevel};

/// Coarse fraud verdict derived from the anomaly detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FraudRisk {
    Low,
    High,
    /// The bundle was trained without numeric columns
    Unknown,
}

impl fmt::Display for FraudRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FraudRisk::Low => "Low",
            FraudRisk::High => "High",
            FraudRisk::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// One claim to score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimInput {
    pub customer_id: String,
    pub description: String,
    pub amount: f64,
    pub tenure: u32,
}

/// Scored claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimResult {
    pub category: String,
    pub urgency: UrgencyLevel,
    pub fraud_risk: FraudRisk,
    /// Detector score; 0.0 when fraud risk is unknown
    pub anomaly_score: f64,
}

/// Scores a claim against a loaded bundle
///
/// # Errors
///
/// - `IntakeError::ModelNotLoaded` when no bundle has been trained yet
/// - `IntakeError::Inference` when the classifier fails to predict
pub fn infer(bundle: Option<&ModelBundle>, claim: &ClaimInput) -> Result<ClaimResult, IntakeError> {
    let bundle = bundle.ok_or(IntakeError::ModelNotLoaded)?;
    score_with(bundle.classifier(), bundle.detector(), claim)
}

/// Scores a claim with any classifier / detector pair
pub fn score_with(
    classifier: &dyn CategoryClassifier,
    detector: Option<&dyn AnomalyDetector>,
    claim: &ClaimInput,
) -> Result<ClaimResult, IntakeError> {
    let category = classifier.predict(&claim.description)?;
    let urgency = classify_urgency(&claim.description);

    let (fraud_risk, anomaly_score) = match detector {
        Some(detector) => {
            let verdict = detector.score(claim.amount, f64::from(claim.tenure));
            let risk = if verdict.is_outlier {
                FraudRisk::High
            } else {
                FraudRisk::Low
            };
            (risk, verdict.anomaly_score)
        }
        None => (FraudRisk::Unknown, 0.0),
    };

    debug!(
        customer_id = %claim.customer_id,
        category = %category,
        urgency = %urgency,
        urgency_keywords = ?matched_urgency_keywords(&claim.description),
        fraud_risk = %fraud_risk,
        anomaly_score,
        "Claim scored"
    );

    Ok(ClaimResult {
        category,
        urgency,
        fraud_risk,
        anomaly_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnomalyVerdict;

    struct FixedClassifier(Vec<String>);

    impl CategoryClassifier for FixedClassifier {
        fn predict(&self, _description: &str) -> Result<String, IntakeError> {
            Ok(self.0[0].clone())
        }

        fn categories(&self) -> &[String] {
            &self.0
        }
    }

    struct ThresholdDetector {
        max_amount: f64,
    }

    impl AnomalyDetector for ThresholdDetector {
        fn score(&self, amount: f64, _tenure: f64) -> AnomalyVerdict {
            let anomaly_score = (self.max_amount - amount) / self.max_amount;
            AnomalyVerdict {
                is_outlier: anomaly_score < 0.0,
                anomaly_score,
            }
        }
    }

    fn claim(description: &str, amount: f64) -> ClaimInput {
        ClaimInput {
            customer_id: "C-1".to_string(),
            description: description.to_string(),
            amount,
            tenure: 4,
        }
    }

    #[test]
    fn test_missing_bundle_is_model_not_loaded() {
        let err = infer(None, &claim("lost receipt", 10.0)).unwrap_err();
        assert!(matches!(err, IntakeError::ModelNotLoaded));
        assert!(err.is_retryable_after_training());
    }

    #[test]
    fn test_without_detector_risk_is_unknown() {
        let classifier = FixedClassifier(vec!["Auto".to_string()]);
        let result = score_with(&classifier, None, &claim("car crash", 1e9)).unwrap();
        assert_eq!(result.category, "Auto");
        assert_eq!(result.urgency, UrgencyLevel::High);
        assert_eq!(result.fraud_risk, FraudRisk::Unknown);
        assert_eq!(result.anomaly_score, 0.0);
    }

    #[test]
    fn test_outlier_maps_to_high_risk() {
        let classifier = FixedClassifier(vec!["Home".to_string()]);
        let detector = ThresholdDetector { max_amount: 5_000.0 };
        let high = score_with(&classifier, Some(&detector), &claim("lost receipt", 9_000.0)).unwrap();
        let low = score_with(&classifier, Some(&detector), &claim("lost receipt", 1_000.0)).unwrap();
        assert_eq!(high.fraud_risk, FraudRisk::High);
        assert!(high.anomaly_score < 0.0);
        assert_eq!(low.fraud_risk, FraudRisk::Low);
        assert_eq!(low.urgency, UrgencyLevel::Medium);
    }
}
