//! Nullable asset ledger — thread-safe in-memory balances for testing.

use silo_ledger::{AssetLedger, LedgerError};
use silo_types::AccountId;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory asset ledger for testing.
///
/// Tracks per-account balances and per-denomination total supplies so tests
/// can assert issuance invariants (e.g. receipt supply vs. total stake).
/// Balances can be seeded directly with [`NullLedger::set_balance`], which
/// models funds arriving from outside the vault's view.
pub struct NullLedger {
    balances: Mutex<HashMap<(String, String), u128>>,
    supplies: Mutex<HashMap<String, u128>>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            supplies: Mutex::new(HashMap::new()),
        }
    }

    fn key(account: &AccountId, denom: &str) -> (String, String) {
        (account.as_str().to_string(), denom.to_string())
    }

    /// Seed (or forcibly overwrite) an account's balance, adjusting the
    /// tracked supply by the difference.
    pub fn set_balance(&self, account: &AccountId, denom: &str, amount: u128) {
        let mut balances = self.balances.lock().unwrap();
        let mut supplies = self.supplies.lock().unwrap();
        let slot = balances.entry(Self::key(account, denom)).or_insert(0);
        let supply = supplies.entry(denom.to_string()).or_insert(0);
        *supply = supply.wrapping_sub(*slot).wrapping_add(amount);
        *slot = amount;
    }

    /// Convenience (non-trait) balance read.
    pub fn balance(&self, account: &AccountId, denom: &str) -> u128 {
        self.balances
            .lock()
            .unwrap()
            .get(&Self::key(account, denom))
            .copied()
            .unwrap_or(0)
    }

    /// Total minted-minus-burned supply of a denomination.
    pub fn supply_of(&self, denom: &str) -> u128 {
        self.supplies
            .lock()
            .unwrap()
            .get(denom)
            .copied()
            .unwrap_or(0)
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLedger for NullLedger {
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        denom: &str,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let mut balances = self.balances.lock().unwrap();
        let from_key = Self::key(from, denom);
        let available = balances.get(&from_key).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: from.to_string(),
                denom: denom.to_string(),
                needed: amount,
                available,
            });
        }
        let to_slot = balances.entry(Self::key(to, denom)).or_insert(0);
        *to_slot = to_slot.checked_add(amount).ok_or(LedgerError::Overflow)?;
        *balances.entry(from_key).or_insert(0) -= amount;
        Ok(())
    }

    fn mint(&mut self, to: &AccountId, denom: &str, amount: u128) -> Result<(), LedgerError> {
        let mut balances = self.balances.lock().unwrap();
        let mut supplies = self.supplies.lock().unwrap();
        let supply = supplies.entry(denom.to_string()).or_insert(0);
        let new_supply = supply.checked_add(amount).ok_or(LedgerError::Overflow)?;
        let slot = balances.entry(Self::key(to, denom)).or_insert(0);
        *slot = slot.checked_add(amount).ok_or(LedgerError::Overflow)?;
        *supply = new_supply;
        Ok(())
    }

    fn burn(&mut self, from: &AccountId, denom: &str, amount: u128) -> Result<(), LedgerError> {
        let mut balances = self.balances.lock().unwrap();
        let mut supplies = self.supplies.lock().unwrap();
        let slot = balances.entry(Self::key(from, denom)).or_insert(0);
        if *slot < amount {
            return Err(LedgerError::InsufficientFunds {
                account: from.to_string(),
                denom: denom.to_string(),
                needed: amount,
                available: *slot,
            });
        }
        *slot -= amount;
        let supply = supplies.entry(denom.to_string()).or_insert(0);
        *supply = supply.saturating_sub(amount);
        Ok(())
    }

    fn balance_of(&self, account: &AccountId, denom: &str) -> u128 {
        self.balance(account, denom)
    }
}
