//! Notification records consumed by the in-app notification list.

use duck_types::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Gift,
    Deposit,
    Withdrawal,
    Verification,
    Moderation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: u64,
    pub recipient: AccountId,
    pub actor: AccountId,
    pub kind: NotificationKind,
    /// What the notification is about, e.g. the gifted clip or a request id.
    pub subject: String,
    pub read: bool,
    pub created_at: Timestamp,
}
