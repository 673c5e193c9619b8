//! Custom Test Assertions
//!
//! Assertion helpers for intake results that give more meaningful
//! failure messages than bare `assert!`.

use domain_intake::{BundleMeta, ClaimResult, FraudRisk, LedgerEntry, ModelBundle};

/// Asserts that a scored category is one the bundle was trained on
pub fn assert_known_category(bundle: &ModelBundle, result: &ClaimResult) {
    let categories = &bundle.meta().categories;
    assert!(
        categories.contains(&result.category),
        "Predicted category {:?} not among trained categories {:?}",
        result.category,
        categories
    );
}

/// Asserts the degraded-mode fraud verdict
pub fn assert_fraud_unknown(result: &ClaimResult) {
    assert_eq!(
        result.fraud_risk,
        FraudRisk::Unknown,
        "Expected unknown fraud risk, got {} (score {})",
        result.fraud_risk,
        result.anomaly_score
    );
    assert_eq!(result.anomaly_score, 0.0, "Unknown risk must carry a zero score");
}

/// Asserts that two metas describe the same trained bundle
pub fn assert_same_bundle(actual: &BundleMeta, expected: &BundleMeta) {
    assert_eq!(actual.bundle_id, expected.bundle_id, "Bundle id mismatch");
    assert_eq!(
        actual.training_count, expected.training_count,
        "Training count mismatch"
    );
    assert_eq!(actual.categories, expected.categories, "Category mismatch");
}

/// Asserts that a ledger entry carries the scored result unchanged
pub fn assert_entry_matches(entry: &LedgerEntry, result: &ClaimResult) {
    assert_eq!(entry.category, result.category, "Category mismatch");
    assert_eq!(entry.urgency, result.urgency, "Urgency mismatch");
    assert_eq!(entry.fraud_risk, result.fraud_risk, "Fraud risk mismatch");
    assert_eq!(
        entry.anomaly_score, result.anomaly_score,
        "Anomaly score mismatch"
    );
}
