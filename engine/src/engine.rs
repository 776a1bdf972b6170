//! Core vault engine — settlement, the four mutating operations, queries,
//! and engine-state persistence.

use std::collections::HashMap;

use silo_ledger::AssetLedger;
use silo_store::{StoreError, VaultStore};
use silo_types::{AccountId, Decimal, PoolParams};

use crate::error::VaultError;
use crate::state::{PoolState, Position};

/// Denomination of the receipt token minted 1:1 against staked deposits.
pub const RECEIPT_DENOM: &str = "ssilo";

/// Denomination rewards are funded and paid out in.
pub const REWARD_DENOM: &str = "usilo";

const META_PARAMS: &[u8] = b"params";
const META_POOL: &[u8] = b"pool";
const META_POOL_ACCOUNT: &[u8] = b"pool_account";

/// The vault engine — owns the pool singleton and the position map.
///
/// Every mutating operation is one atomic unit over `&mut self`: state writes
/// are staged and applied only after every ledger call has succeeded, so a
/// failing step leaves the engine exactly as it was. Callers needing real
/// concurrency serialize access (a mutation lock, or an actor loop).
pub struct VaultEngine {
    params: PoolParams,
    pool_account: AccountId,
    pool: PoolState,
    positions: HashMap<AccountId, Position>,
}

/// Staged outcome of settling one depositor against the current index.
///
/// Holds the post-flush pool fields and the depositor's settled pending
/// reward; nothing is persisted until `apply_settlement`.
#[derive(Clone, Debug)]
struct Settlement {
    pool: PoolState,
    pending_reward: u128,
}

/// Snapshot answering the pool query.
///
/// `staked_balance` and `reward_balance` are read from the ledger, not from
/// the engine's tracked counters. The two sources converge at every quiescent
/// point; `check_consistency` verifies it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolInfo {
    pub accepted_denom: String,
    /// Ledger-observed balance of the accepted asset held by the pool.
    pub staked_balance: u128,
    /// Ledger-observed reward-denomination balance held by the pool.
    pub reward_balance: u128,
    pub undistributed_rewards: u128,
    pub reward_index: Decimal,
}

impl VaultEngine {
    /// Create a genesis engine with all-zero pool state.
    pub fn new(params: PoolParams, pool_account: AccountId) -> Result<Self, VaultError> {
        if !pool_account.is_valid() {
            return Err(VaultError::InvalidPoolAccount);
        }
        Ok(Self {
            params,
            pool_account,
            pool: PoolState::default(),
            positions: HashMap::new(),
        })
    }

    pub fn params(&self) -> &PoolParams {
        &self.params
    }

    pub fn pool_account(&self) -> &AccountId {
        &self.pool_account
    }

    /// Tracked total stake (the settlement-math source of truth).
    pub fn total_staked(&self) -> u128 {
        self.pool.total_staked
    }

    pub fn reward_index(&self) -> Decimal {
        self.pool.reward_index
    }

    pub fn undistributed_rewards(&self) -> u128 {
        self.pool.undistributed_rewards
    }

    /// Tracked principal of one depositor.
    pub fn stake_of(&self, depositor: &AccountId) -> u128 {
        self.positions.get(depositor).map_or(0, |p| p.stake)
    }

    /// Replace the pool parameters. Any non-blank denomination is accepted;
    /// authority gating is the caller's concern.
    pub fn set_params(&mut self, params: PoolParams) {
        self.params = params;
    }

    fn position(&self, depositor: &AccountId) -> Position {
        self.positions.get(depositor).cloned().unwrap_or_default()
    }

    /// Settle one depositor against the current index, without persisting.
    ///
    /// Runs the undistributed flush against a scratch copy of the pool, then
    /// accrues `⌊(index − user_index) × stake⌋` onto the depositor's pending
    /// reward. Idempotent: previewing twice with no state change in between
    /// yields the same result.
    fn preview_settle(&self, depositor: &AccountId) -> Result<Settlement, VaultError> {
        let mut pool = self.pool.clone();
        pool.flush_undistributed().ok_or(VaultError::Overflow)?;

        let pos = self.position(depositor);
        let accrued = pos.accrued_since(pool.reward_index).ok_or(VaultError::Overflow)?;
        let pending_reward = pos
            .pending_reward
            .checked_add(accrued)
            .ok_or(VaultError::Overflow)?;

        Ok(Settlement {
            pool,
            pending_reward,
        })
    }

    /// Persist a staged settlement: the post-flush pool fields, the
    /// depositor's pending reward, and the index snapshot — the snapshot is
    /// taken even for zero-stake positions so future accrual always measures
    /// from the latest observed index.
    fn apply_settlement(&mut self, depositor: &AccountId, settlement: Settlement) {
        if self.pool.undistributed_rewards > 0 && settlement.pool.undistributed_rewards == 0 {
            tracing::trace!(
                amount = self.pool.undistributed_rewards,
                "parked rewards folded into index"
            );
        }
        let entry = self.positions.entry(depositor.clone()).or_default();
        entry.pending_reward = settlement.pending_reward;
        entry.user_index = settlement.pool.reward_index;
        self.pool = settlement.pool;
    }

    /// Deposit `amount` of the accepted denomination and mint receipt tokens
    /// 1:1. Returns the depositor's receipt balance after the deposit.
    pub fn stake(
        &mut self,
        ledger: &mut dyn AssetLedger,
        depositor: &AccountId,
        amount: u128,
    ) -> Result<u128, VaultError> {
        if !self.params.is_enabled() {
            return Err(VaultError::PoolDisabled);
        }
        if amount == 0 {
            return Err(VaultError::InvalidAmount);
        }

        // Settle against the pre-deposit index: the incoming amount must not
        // earn rewards accrued before this operation, and a same-operation
        // flush must not count it either.
        let settlement = self.preview_settle(depositor)?;

        let new_stake = self
            .position(depositor)
            .stake
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;
        let new_total = settlement
            .pool
            .total_staked
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;

        let denom = self.params.accepted_denom.clone();
        let available = ledger.balance_of(depositor, &denom);
        if available < amount {
            return Err(VaultError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        ledger.transfer(depositor, &self.pool_account, &denom, amount)?;
        ledger.mint(&self.pool_account, RECEIPT_DENOM, amount)?;
        ledger.transfer(&self.pool_account, depositor, RECEIPT_DENOM, amount)?;

        self.apply_settlement(depositor, settlement);
        self.positions
            .entry(depositor.clone())
            .or_default()
            .stake = new_stake;
        self.pool.total_staked = new_total;

        tracing::debug!(
            depositor = %depositor,
            amount,
            total_staked = self.pool.total_staked,
            "stake deposited"
        );
        Ok(ledger.balance_of(depositor, RECEIPT_DENOM))
    }

    /// Withdraw `amount`: burns receipt tokens 1:1 and releases the deposit.
    /// Instant — no cooldown, no queue. Returns the remaining receipt balance.
    pub fn unstake(
        &mut self,
        ledger: &mut dyn AssetLedger,
        depositor: &AccountId,
        amount: u128,
    ) -> Result<u128, VaultError> {
        if !self.params.is_enabled() {
            return Err(VaultError::PoolDisabled);
        }
        if amount == 0 {
            return Err(VaultError::InvalidAmount);
        }

        let settlement = self.preview_settle(depositor)?;

        let tracked = self.position(depositor).stake;
        if tracked < amount {
            return Err(VaultError::InsufficientStake {
                needed: amount,
                available: tracked,
            });
        }
        // The tracked counter and the receipt balance are independently
        // verifiable sources that must both cover the withdrawal. Receipt
        // tokens are tradeable: whoever sent theirs away gave up the right
        // to withdraw with them.
        let receipt_balance = ledger.balance_of(depositor, RECEIPT_DENOM);
        if receipt_balance < amount {
            return Err(VaultError::InsufficientStake {
                needed: amount,
                available: receipt_balance,
            });
        }

        let new_stake = tracked - amount;
        let new_total = settlement
            .pool
            .total_staked
            .checked_sub(amount)
            .ok_or(VaultError::Overflow)?;
        let denom = self.params.accepted_denom.clone();

        ledger.transfer(depositor, &self.pool_account, RECEIPT_DENOM, amount)?;
        ledger.burn(&self.pool_account, RECEIPT_DENOM, amount)?;
        ledger.transfer(&self.pool_account, depositor, &denom, amount)?;

        self.apply_settlement(depositor, settlement);
        self.positions
            .entry(depositor.clone())
            .or_default()
            .stake = new_stake;
        self.pool.total_staked = new_total;

        tracing::debug!(
            depositor = %depositor,
            amount,
            total_staked = self.pool.total_staked,
            "stake withdrawn"
        );
        Ok(ledger.balance_of(depositor, RECEIPT_DENOM))
    }

    /// Pull `amount` of the reward denomination from the funder and fold it
    /// into the pool — parked if nothing is staked, otherwise onto the index.
    pub fn fund_rewards(
        &mut self,
        ledger: &mut dyn AssetLedger,
        funder: &AccountId,
        amount: u128,
    ) -> Result<(), VaultError> {
        if amount == 0 {
            return Err(VaultError::InvalidAmount);
        }

        let mut pool = self.pool.clone();
        pool.distribute(amount).ok_or(VaultError::Overflow)?;

        ledger.transfer(funder, &self.pool_account, REWARD_DENOM, amount)?;
        let parked = pool.total_staked == 0;
        self.pool = pool;

        tracing::debug!(funder = %funder, amount, parked, "rewards funded");
        Ok(())
    }

    /// Settle and pay out the depositor's pending reward.
    ///
    /// Claiming with nothing pending is a no-op success returning zero — the
    /// index snapshot (and any flush) still persists.
    pub fn claim_rewards(
        &mut self,
        ledger: &mut dyn AssetLedger,
        depositor: &AccountId,
    ) -> Result<u128, VaultError> {
        let settlement = self.preview_settle(depositor)?;
        let payout = settlement.pending_reward;
        if payout == 0 {
            self.apply_settlement(depositor, settlement);
            return Ok(0);
        }

        ledger.transfer(&self.pool_account, depositor, REWARD_DENOM, payout)?;
        self.apply_settlement(
            depositor,
            Settlement {
                pending_reward: 0,
                ..settlement
            },
        );

        tracing::debug!(depositor = %depositor, amount = payout, "rewards claimed");
        Ok(payout)
    }

    /// Live settled pending reward for one depositor, computed without
    /// persisting any side effect.
    pub fn pending_rewards(&self, depositor: &AccountId) -> Result<u128, VaultError> {
        Ok(self.preview_settle(depositor)?.pending_reward)
    }

    /// Answer the pool query. Balances come from the ledger; see [`PoolInfo`].
    pub fn pool_info(&self, ledger: &dyn AssetLedger) -> PoolInfo {
        let staked_balance = if self.params.is_enabled() {
            ledger.balance_of(&self.pool_account, &self.params.accepted_denom)
        } else {
            0
        };
        PoolInfo {
            accepted_denom: self.params.accepted_denom.clone(),
            staked_balance,
            reward_balance: ledger.balance_of(&self.pool_account, REWARD_DENOM),
            undistributed_rewards: self.pool.undistributed_rewards,
            reward_index: self.pool.reward_index,
        }
    }

    /// Reconcile the tracked counters against the position map and the
    /// ledger-observed pool balance. Returns the first mismatch found.
    pub fn check_consistency(&self, ledger: &dyn AssetLedger) -> Result<(), VaultError> {
        let mut sum: u128 = 0;
        for pos in self.positions.values() {
            sum = sum.checked_add(pos.stake).ok_or(VaultError::Overflow)?;
        }
        if sum != self.pool.total_staked {
            return Err(VaultError::Inconsistency {
                what: "position stake sum",
                tracked: self.pool.total_staked,
                observed: sum,
            });
        }
        if self.params.is_enabled() {
            let pool_balance =
                ledger.balance_of(&self.pool_account, &self.params.accepted_denom);
            if pool_balance != self.pool.total_staked {
                return Err(VaultError::Inconsistency {
                    what: "pool deposit balance",
                    tracked: self.pool.total_staked,
                    observed: pool_balance,
                });
            }
        }
        Ok(())
    }
}

impl VaultEngine {
    /// Persist the full engine state (params, pool account, pool fields,
    /// positions) to a vault store.
    pub fn save_to_store(&self, store: &dyn VaultStore) -> Result<(), VaultError> {
        let params =
            bincode::serialize(&self.params).map_err(|e| VaultError::Serialization(e.to_string()))?;
        store.put_meta(META_PARAMS, &params)?;

        let pool_account = bincode::serialize(&self.pool_account)
            .map_err(|e| VaultError::Serialization(e.to_string()))?;
        store.put_meta(META_POOL_ACCOUNT, &pool_account)?;

        let pool =
            bincode::serialize(&self.pool).map_err(|e| VaultError::Serialization(e.to_string()))?;
        store.put_meta(META_POOL, &pool)?;

        for (depositor, position) in &self.positions {
            // an absent position reads back as all-zero, so empty ones are
            // dropped rather than written (and cleared from earlier saves)
            if position.is_empty() {
                store.delete_position(depositor)?;
                continue;
            }
            let bytes = bincode::serialize(position)
                .map_err(|e| VaultError::Serialization(e.to_string()))?;
            store.put_position(depositor, &bytes)?;
        }
        Ok(())
    }

    /// Restore an engine from a vault store previously written by
    /// `save_to_store`. Missing params or pool fields default to the genesis
    /// values; a missing pool account is an error.
    pub fn load_from_store(store: &dyn VaultStore) -> Result<Self, VaultError> {
        let params = match store.get_meta(META_PARAMS)? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map_err(|e| VaultError::Serialization(e.to_string()))?,
            None => PoolParams::default(),
        };

        let pool_account = match store.get_meta(META_POOL_ACCOUNT)? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map_err(|e| VaultError::Serialization(e.to_string()))?,
            None => {
                return Err(VaultError::Store(StoreError::NotFound(
                    "pool_account".into(),
                )))
            }
        };

        let pool = match store.get_meta(META_POOL)? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map_err(|e| VaultError::Serialization(e.to_string()))?,
            None => PoolState::default(),
        };

        let mut positions = HashMap::new();
        for (depositor, bytes) in store.iter_positions()? {
            let position: Position = bincode::deserialize(&bytes)
                .map_err(|e| VaultError::Serialization(e.to_string()))?;
            positions.insert(depositor, position);
        }

        Ok(Self {
            params,
            pool_account,
            pool,
            positions,
        })
    }
}
