//! The asset-ledger capability consumed by the vault engine.
//!
//! Balance accounting lives with the surrounding application; the vault only
//! ever calls it through the [`AssetLedger`] trait. Implementors are the host
//! runtime's bank module, or an in-memory nullable for tests.

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::AssetLedger;
