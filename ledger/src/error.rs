use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient funds in {account} for {denom}: need {needed}, have {available}")]
    InsufficientFunds {
        account: String,
        denom: String,
        needed: u128,
        available: u128,
    },

    #[error("arithmetic overflow in ledger balance")]
    Overflow,

    #[error("ledger rejected the operation: {0}")]
    Rejected(String),
}
