//! Property tests over generated claims

use proptest::prelude::*;

use domain_intake::{classify_urgency, infer, LedgerEntry, UrgencyLevel};
use test_utils::{
    assert_entry_matches, assert_fraud_unknown, assert_known_category, claim_input_strategy,
    description_strategy, urgent_description_strategy, BundleFixtures,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_keyword_always_high(description in urgent_description_strategy()) {
        prop_assert_eq!(classify_urgency(&description), UrgencyLevel::High);
    }

    #[test]
    fn prop_urgency_is_never_low(description in description_strategy()) {
        prop_assert_ne!(classify_urgency(&description), UrgencyLevel::Low);
    }

    #[test]
    fn prop_text_only_bundle_reports_unknown_risk(claim in claim_input_strategy()) {
        let bundle = BundleFixtures::text_only();
        let result = infer(Some(bundle), &claim).unwrap();
        assert_known_category(bundle, &result);
        assert_fraud_unknown(&result);
    }

    #[test]
    fn prop_ledger_entry_carries_result(claim in claim_input_strategy()) {
        let bundle = BundleFixtures::historical();
        let result = infer(Some(bundle), &claim).unwrap();
        let entry = LedgerEntry::pending_review(&claim, &result);
        assert_entry_matches(&entry, &result);
        prop_assert_eq!(entry.customer_id, claim.customer_id);
    }

    #[test]
    fn prop_inference_is_deterministic(claim in claim_input_strategy()) {
        let bundle = BundleFixtures::historical();
        let first = infer(Some(bundle), &claim).unwrap();
        let second = infer(Some(bundle), &claim).unwrap();
        prop_assert_eq!(first, second);
    }
}
