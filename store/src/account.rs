//! Account records.

use duck_types::{AccountId, CoinAmount, Restriction, Timestamp};
use serde::{Deserialize, Serialize};

/// Per-account state held by the authoritative store.
///
/// Queued system messages live in their own collection (see
/// [`WriteTxn::append_message`](crate::WriteTxn::append_message)) so that
/// appending never rewrites this record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub display_name: Option<String>,
    pub balance: CoinAmount,
    /// One-way: only ever flips from false to true.
    pub verified: bool,
    pub restriction: Restriction,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AccountRecord {
    /// A freshly signed-up account: zero balance, unverified, unrestricted.
    pub fn new(id: AccountId, display_name: Option<String>, now: Timestamp) -> Self {
        Self {
            id,
            display_name,
            balance: CoinAmount::ZERO,
            verified: false,
            restriction: Restriction::None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_restricted(&self, now: Timestamp) -> bool {
        self.restriction.is_active(now)
    }
}
