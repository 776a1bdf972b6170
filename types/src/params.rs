//! Pool configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration surface of the vault.
///
/// The accepted denomination is the single governable parameter: the one
/// asset type depositors may stake. An empty (or blank) value means the
/// pool is disabled — the genesis state until the surrounding application's
/// authority configures it. Any non-blank denomination string is accepted;
/// the vault imposes no format of its own (IBC-style `ibc/...` hashes,
/// factory denoms and short tickers are all the host ledger's business).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    /// Denomination of the asset the pool accepts for staking.
    pub accepted_denom: String,
}

impl PoolParams {
    pub fn new(accepted_denom: impl Into<String>) -> Self {
        Self {
            accepted_denom: accepted_denom.into(),
        }
    }

    /// Whether the pool is enabled (an accepted denomination is configured).
    pub fn is_enabled(&self) -> bool {
        !self.accepted_denom.trim().is_empty()
    }
}
