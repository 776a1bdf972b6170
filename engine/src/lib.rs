//! The vault accrual engine.
//!
//! Depositors stake one accepted asset into a shared pool, receive a 1:1
//! tradeable receipt token, and accrue a pro-rata share of externally funded
//! rewards. Funding never iterates over depositors:
//!
//! `reward_index += funded / total_staked`
//!
//! and each depositor settles lazily against the index delta since their
//! last settlement. Rewards funded while nothing is staked are parked and
//! folded into the index at the first settlement that observes positive
//! total stake.
//!
//! This crate handles:
//! - Pool and per-depositor position state
//! - Lazy settlement (staged, applied only after external calls succeed)
//! - The stake / unstake / fund / claim operations
//! - Read-only queries, reconciliation, and engine-state persistence

pub mod engine;
pub mod error;
pub mod state;

pub use engine::{PoolInfo, VaultEngine, RECEIPT_DENOM, REWARD_DENOM};
pub use error::VaultError;
pub use state::{PoolState, Position};
