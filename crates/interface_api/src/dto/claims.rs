//! Claims DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::CustomerId;
use domain_intake::ClaimInput;

use crate::error::ApiError;

/// Body of `POST /claims`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClaimSubmission {
    #[validate(length(min = 1, message = "customer_id must not be empty"))]
    pub customer_id: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[validate(range(exclusive_min = 0.0, message = "amount must be greater than zero"))]
    pub amount: f64,
    #[serde(default)]
    pub tenure: u32,
}

impl ClaimSubmission {
    /// Validates the submission and converts it to an engine input
    pub fn into_claim_input(self) -> Result<ClaimInput, ApiError> {
        self.validate()?;
        if !self.amount.is_finite() {
            return Err(ApiError::validation("amount must be a finite number"));
        }
        if self.description.trim().is_empty() {
            return Err(ApiError::validation("description must not be blank"));
        }
        let customer_id = CustomerId::parse(&self.customer_id)?;

        Ok(ClaimInput {
            customer_id: customer_id.to_string(),
            description: self.description,
            amount: self.amount,
            tenure: self.tenure,
        })
    }
}

/// Query of `DELETE /claims`
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteClaimQuery {
    pub customer_id: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteClaimResponse {
    pub message: String,
    pub customer_id: String,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn submission(customer_id: &str, description: &str, amount: f64) -> ClaimSubmission {
        ClaimSubmission {
            customer_id: customer_id.to_string(),
            description: description.to_string(),
            amount,
            tenure: 2,
        }
    }

    #[test]
    fn test_valid_submission_trims_customer_id() {
        let input = submission("  C-7 ", "hail damage", 120.0)
            .into_claim_input()
            .unwrap();
        assert_eq!(input.customer_id, "C-7");
        assert_eq!(input.tenure, 2);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        assert!(submission("C-7", "hail damage", 0.0).into_claim_input().is_err());
        assert!(submission("C-7", "hail damage", -5.0).into_claim_input().is_err());
    }

    #[test]
    fn test_rejects_blank_fields() {
        assert!(submission("", "hail damage", 10.0).into_claim_input().is_err());
        assert!(submission("   ", "hail damage", 10.0).into_claim_input().is_err());
        assert!(submission("C-7", "  ", 10.0).into_claim_input().is_err());
    }

    #[test]
    fn test_rejects_infinite_amount() {
        let err = submission("C-7", "hail", f64::INFINITY)
            .into_claim_input()
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    proptest! {
        #[test]
        fn prop_non_positive_amount_is_rejected(amount in -1.0e9f64..=0.0) {
            let err = submission("C-7", "hail damage", amount)
                .into_claim_input()
                .unwrap_err();
            let is_validation = matches!(err, ApiError::Validation { .. });
            prop_assert!(is_validation);
        }

        #[test]
        fn prop_positive_amount_is_accepted(amount in 0.01f64..1.0e9) {
            let input = submission("C-7", "hail damage", amount)
                .into_claim_input()
                .unwrap();
            prop_assert_eq!(input.amount, amount);
        }
    }
}
