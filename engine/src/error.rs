//! Vault-specific errors.

use silo_ledger::LedgerError;
use silo_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("pool is disabled: no accepted denomination configured")]
    PoolDisabled,

    #[error("pool account identity is malformed")]
    InvalidPoolAccount,

    #[error("amount must be a positive integer")]
    InvalidAmount,

    #[error("insufficient staked amount: need {needed}, have {available}")]
    InsufficientStake { needed: u128, available: u128 },

    #[error("insufficient deposit balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("arithmetic overflow in reward accounting")]
    Overflow,

    #[error("state inconsistency in {what}: tracked {tracked}, observed {observed}")]
    Inconsistency {
        what: &'static str,
        tracked: u128,
        observed: u128,
    },

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}
