//! Storage error types

use std::path::PathBuf;
use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur while persisting bundles or ledger entries
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or renaming a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The artifact could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The file was written by an incompatible build
    #[error("Incompatible bundle format at {path}: found {found}, expected {expected}")]
    IncompatibleFormat {
        path: PathBuf,
        found: String,
        expected: String,
    },

    /// A ledger line could not be parsed
    #[error("Corrupt ledger line {line}: {message}")]
    Ledger { line: usize, message: String },
}

impl StoreError {
    pub fn serialization(message: impl std::fmt::Display) -> Self {
        StoreError::Serialization(message.to_string())
    }

    /// Checks if the stored data itself is unreadable
    ///
    /// Such errors do not go away by retrying; the artifact must be
    /// regenerated by retraining.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            StoreError::Serialization(_)
                | StoreError::IncompatibleFormat { .. }
                | StoreError::Ledger { .. }
        )
    }

    pub fn is_io(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        match *err {
            bincode::ErrorKind::Io(io) => StoreError::Io(io),
            other => StoreError::Serialization(other.to_string()),
        }
    }
}

impl From<StoreError> for PortError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Ledger { .. } | StoreError::Serialization(_) => {
                PortError::transformation(err.to_string())
            }
            other => PortError::storage(other.to_string(), other),
        }
    }
}
