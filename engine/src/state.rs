//! Global pool state and per-depositor positions.

use serde::{Deserialize, Serialize};
use silo_types::Decimal;

/// Global pool state — the singleton mutated only by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// Sum of all depositors' stake amounts, in accepted-denomination base
    /// units. Must equal the sum over all positions at every quiescent point.
    pub total_staked: u128,

    /// Cumulative reward-per-unit-staked. Monotonically non-decreasing.
    pub reward_index: Decimal,

    /// Rewards funded while `total_staked == 0`, parked until stake becomes
    /// positive. Owed to whoever holds stake when the flush finally runs,
    /// pro rata at that instant — never to any specific past depositor.
    pub undistributed_rewards: u128,
}

impl PoolState {
    /// Fold `amount` reward units into the pool.
    ///
    /// With nothing staked the amount is parked; otherwise the index advances
    /// by `amount / total_staked` in exact fixed-point, so the fractional
    /// remainder is retained in the index representation across calls.
    ///
    /// `None` on arithmetic overflow; the state is left untouched in that
    /// case only when called on a scratch copy (the engine always does).
    pub fn distribute(&mut self, amount: u128) -> Option<()> {
        if amount == 0 {
            return Some(());
        }
        if self.total_staked == 0 {
            self.undistributed_rewards = self.undistributed_rewards.checked_add(amount)?;
            return Some(());
        }
        let delta = Decimal::from_ratio(amount, self.total_staked)?;
        self.reward_index = self.reward_index.checked_add(delta)?;
        Some(())
    }

    /// Fold parked rewards into the index once stake is positive.
    ///
    /// Clears the parked amount before distributing so a failure partway
    /// through the caller's operation cannot double-count it.
    pub fn flush_undistributed(&mut self) -> Option<()> {
        if self.undistributed_rewards == 0 || self.total_staked == 0 {
            return Some(());
        }
        let parked = self.undistributed_rewards;
        self.undistributed_rewards = 0;
        self.distribute(parked)
    }
}

/// One depositor's position, created lazily on first stake.
///
/// An absent position is equivalent to the all-zero default; empty positions
/// are not required to be deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Current principal, in accepted-denomination base units.
    pub stake: u128,

    /// Snapshot of the global reward index as of the last settlement.
    pub user_index: Decimal,

    /// Reward accrued and settled but not yet paid out.
    pub pending_reward: u128,
}

impl Position {
    /// Whether this position holds nothing worth persisting.
    pub fn is_empty(&self) -> bool {
        self.stake == 0 && self.pending_reward == 0
    }

    /// Reward units accrued since the last settlement, measured against the
    /// global index `reward_index`.
    ///
    /// `⌊(reward_index − user_index) × stake⌋`, truncated toward zero so a
    /// depositor never receives units the pool cannot cover. `None` on
    /// overflow, or if the global index moved backwards (an invariant
    /// violation upstream).
    pub fn accrued_since(&self, reward_index: Decimal) -> Option<u128> {
        if self.stake == 0 {
            return Some(0);
        }
        let delta = reward_index.checked_sub(self.user_index)?;
        if delta.is_zero() {
            return Some(0);
        }
        delta.floor_mul_int(self.stake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribute_parks_when_nothing_is_staked() {
        let mut pool = PoolState::default();
        pool.distribute(50).unwrap();
        assert_eq!(pool.undistributed_rewards, 50);
        assert_eq!(pool.reward_index, Decimal::ZERO);

        pool.distribute(25).unwrap();
        assert_eq!(pool.undistributed_rewards, 75);
    }

    #[test]
    fn distribute_advances_index_when_staked() {
        let mut pool = PoolState {
            total_staked: 1_000_000,
            ..Default::default()
        };
        pool.distribute(100).unwrap();
        assert_eq!(pool.undistributed_rewards, 0);
        assert_eq!(pool.reward_index, Decimal::from_ratio(100, 1_000_000).unwrap());

        // a second funding accumulates onto the same index
        pool.distribute(100).unwrap();
        assert_eq!(pool.reward_index, Decimal::from_ratio(200, 1_000_000).unwrap());
    }

    #[test]
    fn distribute_zero_is_a_no_op() {
        let mut pool = PoolState::default();
        pool.distribute(0).unwrap();
        assert_eq!(pool, PoolState::default());
    }

    #[test]
    fn flush_moves_parked_rewards_into_index_exactly_once() {
        let mut pool = PoolState::default();
        pool.distribute(50).unwrap();
        assert_eq!(pool.undistributed_rewards, 50);

        // still nothing staked: flush is a no-op
        pool.flush_undistributed().unwrap();
        assert_eq!(pool.undistributed_rewards, 50);

        pool.total_staked = 500_000;
        pool.flush_undistributed().unwrap();
        assert_eq!(pool.undistributed_rewards, 0);
        assert_eq!(pool.reward_index, Decimal::from_ratio(50, 500_000).unwrap());

        // flushing again changes nothing
        let before = pool.clone();
        pool.flush_undistributed().unwrap();
        assert_eq!(pool, before);
    }

    #[test]
    fn distribute_overflowing_park_returns_none() {
        let mut pool = PoolState {
            undistributed_rewards: u128::MAX,
            ..Default::default()
        };
        assert!(pool.distribute(1).is_none());
    }

    #[test]
    fn accrued_since_floors_toward_zero() {
        let pos = Position {
            stake: 1,
            ..Default::default()
        };
        // index of 1/3: a single staked unit accrues nothing yet
        let idx = Decimal::from_ratio(1, 3).unwrap();
        assert_eq!(pos.accrued_since(idx).unwrap(), 0);

        let pos = Position {
            stake: 4,
            ..Default::default()
        };
        assert_eq!(pos.accrued_since(idx).unwrap(), 1);
    }

    #[test]
    fn accrued_since_measures_from_user_index() {
        let idx1 = Decimal::from_ratio(100, 1_000).unwrap();
        let idx2 = Decimal::from_ratio(250, 1_000).unwrap();
        let pos = Position {
            stake: 1_000,
            user_index: idx1,
            pending_reward: 0,
        };
        // only the delta since the snapshot counts
        assert_eq!(pos.accrued_since(idx2).unwrap(), 150);
        assert_eq!(pos.accrued_since(idx1).unwrap(), 0);
    }

    #[test]
    fn accrued_since_zero_stake_is_zero() {
        let pos = Position::default();
        let idx = Decimal::from_int(5).unwrap();
        assert_eq!(pos.accrued_since(idx).unwrap(), 0);
    }

    #[test]
    fn accrued_since_backwards_index_is_none() {
        let pos = Position {
            stake: 10,
            user_index: Decimal::from_int(2).unwrap(),
            pending_reward: 0,
        };
        assert!(pos.accrued_since(Decimal::from_int(1).unwrap()).is_none());
    }

    #[test]
    fn empty_position_detection() {
        assert!(Position::default().is_empty());
        assert!(!Position { stake: 1, ..Default::default() }.is_empty());
        assert!(!Position { pending_reward: 1, ..Default::default() }.is_empty());
        // a settled-out position with only an index snapshot is still empty
        let settled = Position {
            user_index: Decimal::from_int(3).unwrap(),
            ..Default::default()
        };
        assert!(settled.is_empty());
    }
}
