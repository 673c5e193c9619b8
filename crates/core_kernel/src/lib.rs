//! Core Kernel - Foundational types for the claim intake system
//!
//! This crate provides the building blocks shared by the intake crates:
//! - Strongly-typed identifiers for bundles, ledger entries and customers
//! - The kernel error type used for value validation
//! - Port infrastructure (`PortError`, `DomainPort`) for adapters

pub mod identifiers;
pub mod error;
pub mod ports;

pub use identifiers::{BundleId, LedgerEntryId, CustomerId};
pub use error::CoreError;
pub use ports::{DomainPort, PortError};
