//! Nullable infrastructure for deterministic testing.
//!
//! The vault's external collaborators (the asset ledger, durable storage)
//! are abstracted behind traits. This crate provides test-friendly
//! implementations that return deterministic values, can be seeded and
//! inspected programmatically, and never touch the filesystem or network.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod ledger;
pub mod store;

pub use ledger::NullLedger;
pub use store::NullVaultStore;
