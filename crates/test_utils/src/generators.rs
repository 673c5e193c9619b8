//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating claims and training rows.

use proptest::prelude::*;

use domain_intake::{ClaimInput, URGENCY_KEYWORDS};

/// Strategy for free-text descriptions made of lowercase words
pub fn description_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,10}", 0..12).prop_map(|words| words.join(" "))
}

/// Strategy for descriptions that contain at least one urgency keyword
pub fn urgent_description_strategy() -> impl Strategy<Value = String> {
    (
        description_strategy(),
        prop::sample::select(URGENCY_KEYWORDS.to_vec()),
        description_strategy(),
        any::<bool>(),
    )
        .prop_map(|(before, keyword, after, upper)| {
            let keyword = if upper {
                keyword.to_uppercase()
            } else {
                keyword.to_string()
            };
            format!("{before} {keyword} {after}")
        })
}

/// Strategy for claim amounts as accepted by the API
pub fn positive_amount_strategy() -> impl Strategy<Value = f64> {
    0.01f64..5_000_000.0
}

pub fn tenure_strategy() -> impl Strategy<Value = u32> {
    0u32..60
}

/// Strategy for customer identifiers
pub fn customer_id_strategy() -> impl Strategy<Value = String> {
    "CUST-[0-9]{4,8}"
}

/// Strategy for valid claims
pub fn claim_input_strategy() -> impl Strategy<Value = ClaimInput> {
    (
        customer_id_strategy(),
        description_strategy(),
        positive_amount_strategy(),
        tenure_strategy(),
    )
        .prop_map(|(customer_id, description, amount, tenure)| ClaimInput {
            customer_id,
            description,
            amount,
            tenure,
        })
}
