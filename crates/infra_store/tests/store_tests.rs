//! Tests for infra_store: bundle persistence and the file ledger

use std::sync::Arc;
use std::thread;

use chrono::Duration;
use domain_intake::{infer, ClaimLedgerPort, LedgerEntry, TrainingPipeline};
use infra_store::{BundleStore, StoreError};
use test_utils::{
    assert_same_bundle, BundleFixtures, ClaimFixtures, TempStorage, TrainingFixtures,
};

// ============================================================================
// Bundle Store Tests
// ============================================================================

mod bundle_store_tests {
    use super::*;

    #[test]
    fn test_load_before_save_is_absent() {
        let storage = TempStorage::new();
        let store = storage.bundle_store();
        assert!(store.load().unwrap().is_none());

        let status = store.status().unwrap();
        assert!(!status.active);
        assert!(status.meta.is_none());
    }

    #[test]
    fn test_save_then_load_preserves_meta() {
        let storage = TempStorage::new();
        let store = storage.bundle_store();
        let outcome = TrainingPipeline::default()
            .train(&TrainingFixtures::historical())
            .unwrap();

        store.save(&outcome.bundle).unwrap();
        let loaded = store.load().unwrap().expect("bundle saved");

        assert_eq!(
            loaded.meta().training_count,
            TrainingFixtures::historical_len()
        );
        assert_same_bundle(loaded.meta(), outcome.bundle.meta());
        assert!(loaded.anomaly_model().is_some());
    }

    #[test]
    fn test_loaded_bundle_scores_like_saved() {
        let storage = TempStorage::new();
        let store = storage.bundle_store();
        let saved = BundleFixtures::historical();
        store.save(saved).unwrap();
        let loaded = store.load().unwrap().unwrap();

        for claim in [
            ClaimFixtures::routine(),
            ClaimFixtures::urgent(),
            ClaimFixtures::suspicious(),
        ] {
            let expected = infer(Some(saved), &claim).unwrap();
            let actual = infer(Some(&loaded), &claim).unwrap();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_text_only_bundle_round_trips_without_detector() {
        let storage = TempStorage::new();
        let store = storage.bundle_store();
        store.save(BundleFixtures::text_only()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.anomaly_model().is_none());
        assert!(!store.status().unwrap().meta.unwrap().fraud_detection_enabled);
    }

    #[test]
    fn test_save_replaces_previous_bundle() {
        let storage = TempStorage::new();
        let store = storage.bundle_store();
        store.save(BundleFixtures::text_only()).unwrap();
        store.save(BundleFixtures::historical()).unwrap();

        let status = store.status().unwrap();
        assert_eq!(
            status.meta.unwrap().bundle_id,
            BundleFixtures::historical().meta().bundle_id
        );
    }

    #[test]
    fn test_concurrent_readers_never_see_partial_write() {
        let storage = TempStorage::new();
        let store = Arc::new(storage.bundle_store());
        store.save(BundleFixtures::text_only()).unwrap();

        let known = [
            BundleFixtures::text_only().meta().bundle_id,
            BundleFixtures::historical().meta().bundle_id,
        ];

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..20 {
                        let bundle = store.load().expect("load never fails").expect("present");
                        assert!(known.contains(&bundle.meta().bundle_id));
                    }
                })
            })
            .collect();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..10 {
                    let bundle = if i % 2 == 0 {
                        BundleFixtures::historical()
                    } else {
                        BundleFixtures::text_only()
                    };
                    store.save(bundle).unwrap();
                }
            })
        };

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[test]
    fn test_unreadable_directory_entry_is_io_error() {
        let storage = TempStorage::new();
        std::fs::create_dir_all(storage.bundle_path()).unwrap();

        let err = BundleStore::new(storage.bundle_path()).load().unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}

// ============================================================================
// Ledger Tests
// ============================================================================

mod ledger_tests {
    use super::*;

    fn scored_entry(customer_id: &str) -> LedgerEntry {
        let mut claim = ClaimFixtures::routine();
        claim.customer_id = customer_id.to_string();
        let result = infer(Some(BundleFixtures::historical()), &claim).unwrap();
        LedgerEntry::pending_review(&claim, &result)
    }

    #[tokio::test]
    async fn test_append_then_list_in_order() {
        let storage = TempStorage::new();
        let ledger = storage.ledger();
        let first = scored_entry("CUST-1");
        let second = scored_entry("CUST-2");

        ledger.append(&first).await.unwrap();
        ledger.append(&second).await.unwrap();

        let entries = ledger.list_all().await.unwrap();
        assert_eq!(entries, vec![first, second]);
    }

    #[tokio::test]
    async fn test_delete_by_customer_and_timestamp() {
        let storage = TempStorage::new();
        let ledger = storage.ledger();
        let keep = scored_entry("CUST-1");
        let removed = scored_entry("CUST-2");
        ledger.append(&keep).await.unwrap();
        ledger.append(&removed).await.unwrap();

        ledger.delete("CUST-2", removed.submitted_at).await.unwrap();

        let entries = ledger.list_all().await.unwrap();
        assert_eq!(entries, vec![keep]);
    }

    #[tokio::test]
    async fn test_delete_unknown_key_is_not_found() {
        let storage = TempStorage::new();
        let ledger = storage.ledger();
        let entry = scored_entry("CUST-1");
        ledger.append(&entry).await.unwrap();

        let err = ledger
            .delete("CUST-1", entry.submitted_at + Duration::seconds(1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = ledger.delete("CUST-9", entry.submitted_at).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(ledger.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let storage = TempStorage::new();
        let ledger = Arc::new(storage.ledger());

        let mut handles = Vec::new();
        for i in 0..16 {
            let ledger = Arc::clone(&ledger);
            let entry = scored_entry(&format!("CUST-{i}"));
            handles.push(tokio::spawn(async move { ledger.append(&entry).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(ledger.list_all().await.unwrap().len(), 16);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_listing_during_large_appends_never_sees_torn_lines() {
        let storage = TempStorage::new();
        let ledger = Arc::new(storage.ledger());
        let total = 12;

        let writer = {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move {
                for i in 0..total {
                    let mut entry = scored_entry(&format!("CUST-{i}"));
                    entry.description = "water damage ".repeat(64 * 1024);
                    ledger.append(&entry).await.unwrap();
                }
            })
        };

        let mut last_seen = 0;
        while !writer.is_finished() {
            let entries = ledger.list_all().await.expect("listing during append");
            assert!(entries.len() >= last_seen);
            last_seen = entries.len();
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();

        assert_eq!(ledger.list_all().await.unwrap().len(), total);
    }
}
