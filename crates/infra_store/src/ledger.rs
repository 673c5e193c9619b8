//! File-backed claims ledger
//!
//! Entries are stored one JSON object per line in insertion order.
//! Appends go to the end of the file; deletes rewrite the remaining
//! entries to a sibling temp file and rename it into place. Readers share
//! an async read lock and writers take it exclusively, so a listing never
//! observes a half-written line. An append that fails part way truncates
//! the file back to its previous length.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use core_kernel::{DomainPort, PortError};
use domain_intake::{ClaimLedgerPort, LedgerEntry};

use crate::error::StoreError;

/// Claims ledger persisted as JSON lines
#[derive(Debug)]
pub struct FileClaimLedger {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileClaimLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Callers hold `lock` in either mode
    async fn read_entries(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|err| StoreError::Ledger {
                    line: index + 1,
                    message: err.to_string(),
                })
            })
            .collect()
    }

    async fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    async fn append_line(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(entry).map_err(StoreError::serialization)?;
        line.push('\n');

        let _guard = self.lock.write().await;
        self.ensure_parent().await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let start = file.metadata().await?.len();

        if let Err(err) = write_line(&mut file, line.as_bytes()).await {
            warn!(error = %err, start, "Ledger append failed, truncating");
            if let Err(truncate_err) = file.set_len(start).await {
                warn!(error = %truncate_err, "Ledger truncate failed");
            }
            return Err(err.into());
        }
        Ok(())
    }

    async fn remove_matching(
        &self,
        customer_id: &str,
        submitted_at: &DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let _guard = self.lock.write().await;
        let entries = self.read_entries().await?;
        let before = entries.len();
        let kept: Vec<LedgerEntry> = entries
            .into_iter()
            .filter(|entry| !entry.matches_key(customer_id, submitted_at))
            .collect();
        let removed = before - kept.len();
        if removed == 0 {
            return Ok(0);
        }

        let mut body = String::new();
        for entry in &kept {
            body.push_str(&serde_json::to_string(entry).map_err(StoreError::serialization)?);
            body.push('\n');
        }

        let mut temp_name = self.path.clone().into_os_string();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);
        fs::write(&temp_path, body).await?;
        fs::rename(&temp_path, &self.path).await?;
        Ok(removed)
    }
}

async fn write_line(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_data().await
}

impl DomainPort for FileClaimLedger {}

#[async_trait]
impl ClaimLedgerPort for FileClaimLedger {
    #[instrument(skip(self, entry), fields(entry_id = %entry.entry_id))]
    async fn append(&self, entry: &LedgerEntry) -> Result<(), PortError> {
        self.append_line(entry).await?;
        debug!(customer_id = %entry.customer_id, "Ledger entry appended");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<LedgerEntry>, PortError> {
        let _guard = self.lock.read().await;
        Ok(self.read_entries().await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, customer_id: &str, submitted_at: DateTime<Utc>) -> Result<(), PortError> {
        let removed = self.remove_matching(customer_id, &submitted_at).await?;
        if removed == 0 {
            return Err(PortError::not_found(
                "LedgerEntry",
                format!("{customer_id}@{}", submitted_at.to_rfc3339()),
            ));
        }
        info!(removed, "Ledger entries deleted");
        Ok(())
    }
}
