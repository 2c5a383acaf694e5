//! Parse and validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid coin amount: {0}")]
    InvalidAmount(String),

    #[error("too many decimal places in {0} (at most 4 allowed)")]
    TooPrecise(String),

    #[error("invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("invalid event id: {0:?}")]
    InvalidEventId(String),

    #[error("invalid content id: {0:?}")]
    InvalidContentId(String),

    #[error("unknown gift: {0}")]
    UnknownGift(String),

    #[error("entropy source failed: {0}")]
    Entropy(String),

    #[error("arithmetic overflow")]
    Overflow,
}
