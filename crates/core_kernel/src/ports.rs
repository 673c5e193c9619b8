//! Ports and Adapters Infrastructure
//!
//! Domain crates define port traits (for example the claims ledger) that
//! extend the [`DomainPort`] marker. Adapters in `infra_store` or in tests
//! implement them and report failures through [`PortError`].
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait ClaimLedgerPort: DomainPort {
//!     async fn append(&self, entry: &LedgerEntry) -> Result<(), PortError>;
//! }
//!
//! impl ClaimLedgerPort for FileClaimLedger { ... }
//! ```

use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// All port implementations report failures through this type so callers
/// handle file-backed and in-memory adapters the same way.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The backing store could not be reached or written
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A data transformation error occurred
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Storage error wrapping its cause
    pub fn storage(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PortError::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Storage { .. })
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they are thread-safe and usable
/// behind `Arc` in async handlers.
pub trait DomainPort: Send + Sync + 'static {}
