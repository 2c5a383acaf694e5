//! State enums for accounts and funds requests.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time::Timestamp;

/// Moderation state of an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Restriction {
    /// No restriction.
    #[default]
    None,
    /// Restricted until the given time; lapses on its own.
    Timed { until: Timestamp },
    /// Permanently banned.
    Banned,
}

impl Restriction {
    /// Whether the restriction is in force at `now`.
    pub fn is_active(&self, now: Timestamp) -> bool {
        match self {
            Self::None => false,
            Self::Timed { until } => now < *until,
            Self::Banned => true,
        }
    }
}

/// What an administrator asks for when restricting an account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionKind {
    Timed,
    Ban,
}

/// Deposit or withdrawal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundsKind {
    Deposit,
    Withdrawal,
}

impl FundsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for FundsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a funds request: `Pending` moves once to a terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The status reached by applying `decision`, or `None` when the request
    /// is already resolved. There is no transition out of a terminal state.
    pub fn resolve(&self, decision: Decision) -> Option<Self> {
        match (self, decision) {
            (Self::Pending, Decision::Approve) => Some(Self::Approved),
            (Self::Pending, Decision::Reject) => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An administrator's ruling on a pending request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}
