use duck_types::CoinAmount;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance {
        needed: CoinAmount,
        available: CoinAmount,
    },

    #[error("unknown or already settled ticket: {0}")]
    UnknownTicket(u64),

    #[error("balance overflow")]
    Overflow,
}
