//! Claims ledger port
//!
//! Scored claims are appended to a durable ledger for human review. The
//! engine only defines the contract; storage adapters live in
//! `infra_store`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, LedgerEntryId, PortError};

use crate::inference::{ClaimInput, ClaimResult, FraudRisk};
use crate::urgency::UrgencyLevel;

/// Review state of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    #[serde(rename = "Pending Review")]
    PendingReview,
}

/// A scored claim as stored in the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Stable reference shown to the submitter
    pub entry_id: LedgerEntryId,
    pub submitted_at: DateTime<Utc>,
    pub customer_id: String,
    pub description: String,
    pub amount: f64,
    pub tenure: u32,
    pub category: String,
    pub urgency: UrgencyLevel,
    pub fraud_risk: FraudRisk,
    pub anomaly_score: f64,
    pub status: ReviewStatus,
}

impl LedgerEntry {
    /// Stamps a scored claim for review
    pub fn pending_review(claim: &ClaimInput, result: &ClaimResult) -> Self {
        Self {
            entry_id: LedgerEntryId::new_v7(),
            submitted_at: Utc::now(),
            customer_id: claim.customer_id.clone(),
            description: claim.description.clone(),
            amount: claim.amount,
            tenure: claim.tenure,
            category: result.category.clone(),
            urgency: result.urgency,
            fraud_risk: result.fraud_risk,
            anomaly_score: result.anomaly_score,
            status: ReviewStatus::PendingReview,
        }
    }

    /// True when this entry is addressed by the (customer, timestamp) key
    pub fn matches_key(&self, customer_id: &str, submitted_at: &DateTime<Utc>) -> bool {
        self.customer_id == customer_id && self.submitted_at == *submitted_at
    }
}

/// Durable store of scored claims
#[async_trait]
pub trait ClaimLedgerPort: DomainPort {
    /// Appends one entry
    async fn append(&self, entry: &LedgerEntry) -> Result<(), PortError>;

    /// Returns every stored entry in insertion order
    async fn list_all(&self) -> Result<Vec<LedgerEntry>, PortError>;

    /// Removes entries addressed by customer id and submission time
    ///
    /// Returns `PortError::NotFound` when nothing matches.
    async fn delete(&self, customer_id: &str, submitted_at: DateTime<Utc>) -> Result<(), PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_review_copies_claim_and_result() {
        let claim = ClaimInput {
            customer_id: "C-9".to_string(),
            description: "severe storm damage".to_string(),
            amount: 4_200.0,
            tenure: 7,
        };
        let result = ClaimResult {
            category: "Home".to_string(),
            urgency: UrgencyLevel::High,
            fraud_risk: FraudRisk::Low,
            anomaly_score: 0.12,
        };

        let entry = LedgerEntry::pending_review(&claim, &result);
        assert_eq!(entry.customer_id, "C-9");
        assert_eq!(entry.category, "Home");
        assert_eq!(entry.status, ReviewStatus::PendingReview);
        assert!(entry.matches_key("C-9", &entry.submitted_at.clone()));
        assert!(!entry.matches_key("C-10", &entry.submitted_at.clone()));
    }

    #[test]
    fn test_status_serializes_as_display_text() {
        let json = serde_json::to_string(&ReviewStatus::PendingReview).unwrap();
        assert_eq!(json, "\"Pending Review\"");
    }
}
