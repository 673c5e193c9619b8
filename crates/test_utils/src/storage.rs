//! Storage Test Helpers
//!
//! Temporary on-disk stores that clean up after themselves, and an
//! in-memory ledger for tests that do not care about the file format.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::path::PathBuf;
use tempfile::TempDir;

use core_kernel::{DomainPort, PortError};
use domain_intake::{ClaimLedgerPort, LedgerEntry};
use infra_store::{BundleStore, FileClaimLedger};

/// A scratch directory holding a bundle store and a file ledger
///
/// The directory is removed when this value is dropped.
pub struct TempStorage {
    dir: TempDir,
}

impl TempStorage {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn bundle_path(&self) -> PathBuf {
        self.dir.path().join("models").join("trained_brain.bin")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.dir.path().join("data").join("claims_ledger.jsonl")
    }

    pub fn bundle_store(&self) -> BundleStore {
        BundleStore::new(self.bundle_path())
    }

    pub fn ledger(&self) -> FileClaimLedger {
        FileClaimLedger::new(self.ledger_path())
    }
}

impl Default for TempStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Ledger kept in memory
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl DomainPort for InMemoryLedger {}

#[async_trait]
impl ClaimLedgerPort for InMemoryLedger {
    async fn append(&self, entry: &LedgerEntry) -> Result<(), PortError> {
        self.entries.write().push(entry.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<LedgerEntry>, PortError> {
        Ok(self.entries.read().clone())
    }

    async fn delete(&self, customer_id: &str, submitted_at: DateTime<Utc>) -> Result<(), PortError> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|entry| !entry.matches_key(customer_id, &submitted_at));
        if entries.len() == before {
            return Err(PortError::not_found("LedgerEntry", customer_id));
        }
        Ok(())
    }
}
