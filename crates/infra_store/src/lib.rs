//! Storage Infrastructure
//!
//! File-based persistence for the claim intake engine:
//!
//! - [`BundleStore`] keeps the single active model bundle as a binary
//!   artifact and replaces it atomically on every save
//! - [`FileClaimLedger`] implements `ClaimLedgerPort` over a JSON-lines file
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_store::BundleStore;
//! use domain_intake::{infer, TrainingPipeline};
//!
//! let store = BundleStore::new("models/trained_brain.bin");
//! let outcome = TrainingPipeline::default().train(&table)?;
//! store.save(&outcome.bundle)?;
//!
//! let bundle = store.load()?;
//! let result = infer(bundle.as_ref(), &claim)?;
//! ```

pub mod bundle_store;
pub mod error;
pub mod ledger;

pub use bundle_store::{BundleStore, FORMAT_VERSION, MAGIC};
pub use error::StoreError;
pub use ledger::FileClaimLedger;
