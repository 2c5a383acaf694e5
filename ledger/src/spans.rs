//! Pre-built [`tracing::Span`] constructors for ledger operations.
//!
//! Every atomic unit runs inside one of these so log lines emitted by the
//! store and the ledger can be correlated by operation and account.

use duck_types::{AccountId, RequestId};
use tracing::{info_span, Span};

/// Span covering one user-initiated operation on an account.
pub fn operation_span(op: &'static str, account: &AccountId) -> Span {
    info_span!("ledger_op", op, account = %account)
}

/// Span covering an ad-view reward claim.
pub fn reward_span(viewer: &AccountId, event: &str) -> Span {
    info_span!("ad_reward", viewer = %viewer, event = %event)
}

/// Span covering an administrator action against a target account.
pub fn admin_span(op: &'static str, admin: &AccountId, target: &AccountId) -> Span {
    info_span!("admin_op", op, admin = %admin, target = %target)
}

/// Span covering the review of a funds request.
pub fn review_span(admin: &AccountId, request: RequestId) -> Span {
    info_span!("review", admin = %admin, request = %request)
}

/// Span covering a bulk reward simulation run.
pub fn simulation_span(admin: &AccountId, count: u32) -> Span {
    info_span!("simulate", admin = %admin, count)
}
