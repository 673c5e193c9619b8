//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claim intake test suite.
//!
//! # Modules
//!
//! - `fixtures`: Historical claim tables and sample claims
//! - `builders`: Builder patterns for training tables and claim inputs
//! - `storage`: Temporary bundle stores and an in-memory ledger
//! - `assertions`: Custom assertion helpers for intake results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod storage;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use storage::*;
pub use assertions::*;
pub use generators::*;
