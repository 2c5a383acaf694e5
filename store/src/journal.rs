//! Journal of applied balance mutations.
//!
//! One entry per touched account per mutation, written inside the same
//! atomic unit as the balance change. Summing an account's entries gives
//! its balance.

use duck_types::{AccountId, CoinAmount, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Credit,
    Debit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryReason {
    AdReward,
    ContentReward,
    GiftSent,
    GiftReceived,
    Verification,
    WithdrawalHold,
    WithdrawalRefund,
    Deposit,
    AdminCredit,
    SimulatedReward,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub seq: u64,
    pub account: AccountId,
    pub direction: Direction,
    pub amount: CoinAmount,
    pub reason: EntryReason,
    pub at: Timestamp,
}
