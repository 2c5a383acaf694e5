//! Deposit and withdrawal requests awaiting administrator review.

use duck_types::{AccountId, CoinAmount, FundsKind, RequestId, RequestStatus, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsRequest {
    pub id: RequestId,
    pub kind: FundsKind,
    pub requester: AccountId,
    pub amount: CoinAmount,
    /// External transfer number or reference the money moves through.
    pub channel: String,
    pub status: RequestStatus,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
    pub resolved_by: Option<AccountId>,
}

impl FundsRequest {
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}
