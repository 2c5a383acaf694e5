use duck_store::StoreError;
use duck_types::{AccountId, CoinAmount, EventId, FundsKind, RequestId, RequestStatus, TypesError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance {
        needed: CoinAmount,
        available: CoinAmount,
    },

    #[error("account {0} is already verified")]
    AlreadyVerified(AccountId),

    #[error("request {id} is not pending (already {status})")]
    NotPending { id: RequestId, status: RequestStatus },

    #[error("request {id} is a {actual} request, not a {expected} request")]
    WrongRequestKind {
        id: RequestId,
        expected: FundsKind,
        actual: FundsKind,
    },

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("minimum withdrawal is {minimum}, requested {requested}")]
    BelowMinimum {
        minimum: CoinAmount,
        requested: CoinAmount,
    },

    #[error("invalid transfer channel: {0:?}")]
    InvalidChannel(String),

    #[error("cannot send a gift to yourself")]
    SelfTransfer,

    #[error("account {0} is restricted")]
    AccountRestricted(AccountId),

    #[error("a timed restriction needs a duration of at least one day")]
    InvalidDuration,

    #[error("account {0} already exists")]
    AccountExists(AccountId),

    #[error("reward for event {event} was already claimed by {viewer}")]
    AlreadyClaimed { viewer: AccountId, event: EventId },

    #[error("simulation count must be greater than zero")]
    EmptySimulation,

    #[error("no eligible accounts")]
    NoEligibleAccounts,

    #[error("{0} is not an administrator")]
    NotPrivileged(AccountId),

    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("{0}")]
    Types(#[from] TypesError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// How a caller should treat a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request was refused by a business rule; nothing changed.
    Precondition,
    /// The reward was already granted; not an error from the user's view.
    BenignDuplicate,
    /// The account or request does not exist.
    NotFound,
    /// The acting identity is not an administrator.
    Unauthorized,
    /// The store failed; retrying is safe.
    Infrastructure,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyClaimed { .. } => ErrorKind::BenignDuplicate,
            Self::AccountNotFound(_) | Self::RequestNotFound(_) => ErrorKind::NotFound,
            Self::Storage(StoreError::NotFound(_)) => ErrorKind::NotFound,
            Self::NotPrivileged(_) => ErrorKind::Unauthorized,
            Self::Storage(_) | Self::Types(TypesError::Entropy(_)) => ErrorKind::Infrastructure,
            _ => ErrorKind::Precondition,
        }
    }

    /// Whether the failure should be hidden from the user.
    pub fn is_benign(&self) -> bool {
        self.kind() == ErrorKind::BenignDuplicate
    }
}
