//! Fundamental types for the Silo vault.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account identities, the fixed-point reward-index decimal, and
//! the pool configuration parameters.

pub mod account;
pub mod decimal;
pub mod params;

pub use account::AccountId;
pub use decimal::Decimal;
pub use params::PoolParams;
