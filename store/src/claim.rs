//! Reward claims: the idempotency log for ad-view crediting.

use duck_types::{AccountId, EventId, Timestamp};
use serde::{Deserialize, Serialize};

/// `(viewer, event)`: at most one reward per key, ever.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClaimKey {
    pub viewer: AccountId,
    pub event: EventId,
}

impl ClaimKey {
    pub fn new(viewer: AccountId, event: EventId) -> Self {
        Self { viewer, event }
    }

    /// Binary key `len(viewer) ++ viewer ++ event`. The length prefix keeps
    /// `("ab", "c")` and `("a", "bc")` apart.
    pub fn to_bytes(&self) -> Vec<u8> {
        let viewer = self.viewer.as_bytes();
        let event = self.event.as_str().as_bytes();
        let mut key = Vec::with_capacity(2 + viewer.len() + event.len());
        key.extend_from_slice(&(viewer.len() as u16).to_be_bytes());
        key.extend_from_slice(viewer);
        key.extend_from_slice(event);
        key
    }
}

/// A granted reward. Created once, never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardClaim {
    pub key: ClaimKey,
    pub beneficiary: Option<AccountId>,
    pub claimed_at: Timestamp,
}
