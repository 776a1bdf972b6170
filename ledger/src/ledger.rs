//! Asset ledger trait.

use crate::LedgerError;
use silo_types::AccountId;

/// Balance transfer, issuance and query operations on the host ledger.
///
/// The vault uses `transfer` for deposits, withdrawals, reward funding and
/// reward payout, and `mint`/`burn` exclusively for the receipt asset against
/// the pool's own account. Each call is atomic: it either fully applies or
/// returns an error with no balance change.
pub trait AssetLedger {
    /// Move `amount` of `denom` between two accounts.
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        denom: &str,
        amount: u128,
    ) -> Result<(), LedgerError>;

    /// Create `amount` new units of `denom` in `to`'s balance.
    fn mint(&mut self, to: &AccountId, denom: &str, amount: u128) -> Result<(), LedgerError>;

    /// Destroy `amount` units of `denom` from `from`'s balance.
    fn burn(&mut self, from: &AccountId, denom: &str, amount: u128) -> Result<(), LedgerError>;

    /// Current balance of `denom` held by `account`.
    fn balance_of(&self, account: &AccountId, denom: &str) -> u128;
}
