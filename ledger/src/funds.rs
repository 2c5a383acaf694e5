//! Withdrawal and deposit requests and their administrator review.
//!
//! A withdrawal debits the requester at submission; rejecting it refunds
//! the amount. A deposit changes nothing until it is approved. Either kind
//! moves out of `pending` at most once.

use duck_store::{
    EntryReason, FundsRequest, NotificationKind, Sequence, TransactionalStore, WriteTxn,
};
use duck_types::{
    AccountId, Clock, CoinAmount, Decision, FundsKind, RandomSource, RequestId, RequestStatus,
    Timestamp,
};

use crate::error::LedgerError;
use crate::ledger::{credit, debit, load_account, load_unrestricted, log_failure, notify, CoinLedger};
use crate::{messages, spans};

pub const MAX_CHANNEL_LEN: usize = 32;

/// Normalise a transfer channel descriptor (phone number, wallet reference).
///
/// Accepts 1 to [`MAX_CHANNEL_LEN`] characters of ASCII letters, digits, `+`
/// and `-` after trimming surrounding whitespace.
pub fn validate_channel(raw: &str) -> Result<String, LedgerError> {
    let channel = raw.trim();
    let well_formed = !channel.is_empty()
        && channel.len() <= MAX_CHANNEL_LEN
        && channel
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-');
    if well_formed {
        Ok(channel.to_string())
    } else {
        Err(LedgerError::InvalidChannel(raw.to_string()))
    }
}

fn check_amount(amount: CoinAmount, minimum: Option<CoinAmount>) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    match minimum {
        Some(minimum) if amount < minimum => Err(LedgerError::BelowMinimum {
            minimum,
            requested: amount,
        }),
        _ => Ok(()),
    }
}

fn open_request(
    txn: &mut dyn WriteTxn,
    kind: FundsKind,
    requester: &AccountId,
    amount: CoinAmount,
    channel: String,
    now: Timestamp,
) -> Result<FundsRequest, LedgerError> {
    let id = RequestId::new(txn.next_sequence(Sequence::Request)?);
    let request = FundsRequest {
        id,
        kind,
        requester: requester.clone(),
        amount,
        channel,
        status: RequestStatus::Pending,
        created_at: now,
        resolved_at: None,
        resolved_by: None,
    };
    txn.put_request(&request)?;
    Ok(request)
}

impl<S: TransactionalStore, C: Clock, R: RandomSource> CoinLedger<S, C, R> {
    /// Hold `amount` from the requester's balance and open a pending
    /// withdrawal request.
    pub fn submit_withdrawal(
        &self,
        account: &AccountId,
        amount: CoinAmount,
        channel: &str,
    ) -> Result<FundsRequest, LedgerError> {
        let _span = spans::operation_span("submit_withdrawal", account).entered();
        let now = self.now();
        let minimum = self.params().min_withdrawal;

        let result = check_amount(amount, Some(minimum))
            .and_then(|()| validate_channel(channel))
            .and_then(|channel| {
                self.store().transact(|txn| {
                    let mut record = load_unrestricted(txn, account, now)?;
                    debit(txn, &mut record, amount, EntryReason::WithdrawalHold, now)?;
                    txn.put_account(&record)?;
                    let request =
                        open_request(txn, FundsKind::Withdrawal, account, amount, channel, now)?;
                    txn.append_message(account, &messages::withdrawal_received(request.id, amount))?;
                    Ok(request)
                })
            });

        match &result {
            Ok(request) => tracing::info!(request = %request.id, amount = %amount, "withdrawal submitted"),
            Err(err) => log_failure("submit_withdrawal", err),
        }
        result
    }

    /// Open a pending deposit request. No balance changes until approval.
    pub fn submit_deposit(
        &self,
        account: &AccountId,
        amount: CoinAmount,
        channel: &str,
    ) -> Result<FundsRequest, LedgerError> {
        let _span = spans::operation_span("submit_deposit", account).entered();
        let now = self.now();

        let result = check_amount(amount, None)
            .and_then(|()| validate_channel(channel))
            .and_then(|channel| {
                self.store().transact(|txn| {
                    load_unrestricted(txn, account, now)?;
                    let request =
                        open_request(txn, FundsKind::Deposit, account, amount, channel, now)?;
                    txn.append_message(account, &messages::deposit_received(request.id, amount))?;
                    Ok(request)
                })
            });

        match &result {
            Ok(request) => tracing::info!(request = %request.id, amount = %amount, "deposit submitted"),
            Err(err) => log_failure("submit_deposit", err),
        }
        result
    }

    /// Approve or reject a pending withdrawal. Rejection refunds the held
    /// amount in the same unit as the status change.
    pub fn resolve_withdrawal(
        &self,
        admin: &AccountId,
        id: RequestId,
        decision: Decision,
    ) -> Result<FundsRequest, LedgerError> {
        self.resolve(admin, id, FundsKind::Withdrawal, decision)
    }

    /// Approve or reject a pending deposit. Approval credits the requester in
    /// the same unit as the status change.
    pub fn resolve_deposit(
        &self,
        admin: &AccountId,
        id: RequestId,
        decision: Decision,
    ) -> Result<FundsRequest, LedgerError> {
        self.resolve(admin, id, FundsKind::Deposit, decision)
    }

    fn resolve(
        &self,
        admin: &AccountId,
        id: RequestId,
        expected: FundsKind,
        decision: Decision,
    ) -> Result<FundsRequest, LedgerError> {
        let _span = spans::review_span(admin, id).entered();
        let now = self.now();

        let result = self.admins().ensure(admin).and_then(|()| {
            self.store().transact(|txn| {
                let mut request = txn
                    .get_request(id)?
                    .ok_or(LedgerError::RequestNotFound(id))?;
                if request.kind != expected {
                    return Err(LedgerError::WrongRequestKind {
                        id,
                        expected,
                        actual: request.kind,
                    });
                }
                let status = request.status.resolve(decision).ok_or(LedgerError::NotPending {
                    id,
                    status: request.status,
                })?;

                let requester = request.requester.clone();
                let amount = request.amount;
                let (text, kind) = match (expected, decision) {
                    (FundsKind::Withdrawal, Decision::Approve) => {
                        (messages::withdrawal_approved(id, amount), NotificationKind::Withdrawal)
                    }
                    (FundsKind::Withdrawal, Decision::Reject) => {
                        let mut record = load_account(txn, &requester)?;
                        credit(txn, &mut record, amount, EntryReason::WithdrawalRefund, now)?;
                        txn.put_account(&record)?;
                        (messages::withdrawal_rejected(id, amount), NotificationKind::Withdrawal)
                    }
                    (FundsKind::Deposit, Decision::Approve) => {
                        let mut record = load_account(txn, &requester)?;
                        credit(txn, &mut record, amount, EntryReason::Deposit, now)?;
                        txn.put_account(&record)?;
                        (messages::deposit_approved(id, amount), NotificationKind::Deposit)
                    }
                    (FundsKind::Deposit, Decision::Reject) => {
                        (messages::deposit_rejected(id, amount), NotificationKind::Deposit)
                    }
                };

                request.status = status;
                request.resolved_at = Some(now);
                request.resolved_by = Some(admin.clone());
                txn.put_request(&request)?;
                txn.append_message(&requester, &text)?;
                notify(txn, &requester, admin, kind, id.to_string(), now)?;
                Ok(request)
            })
        });

        match &result {
            Ok(request) => tracing::info!(
                kind = %expected,
                status = %request.status,
                requester = %request.requester,
                amount = %request.amount,
                "request resolved"
            ),
            Err(err) => log_failure("resolve_request", err),
        }
        result
    }

    /// The review table: requests filtered by kind and status, oldest first.
    /// Administrator only.
    pub fn list_requests(
        &self,
        admin: &AccountId,
        kind: Option<FundsKind>,
        status: Option<RequestStatus>,
    ) -> Result<Vec<FundsRequest>, LedgerError> {
        self.admins().ensure(admin)?;
        let requests = self.store().read(|txn| txn.iter_requests())?;
        Ok(requests
            .into_iter()
            .filter(|r| kind.map_or(true, |k| r.kind == k))
            .filter(|r| status.map_or(true, |s| r.status == s))
            .collect())
    }

    /// An account's own requests, oldest first.
    pub fn requests_for(&self, account: &AccountId) -> Result<Vec<FundsRequest>, LedgerError> {
        let requests = self.store().read(|txn| txn.iter_requests())?;
        Ok(requests
            .into_iter()
            .filter(|r| &r.requester == account)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_accepts_phone_numbers_and_references() {
        assert_eq!(validate_channel("N1").unwrap(), "N1");
        assert_eq!(validate_channel("  +201001234567 ").unwrap(), "+201001234567");
        assert_eq!(validate_channel("wallet-77").unwrap(), "wallet-77");
    }

    #[test]
    fn channel_rejects_malformed_input() {
        assert!(validate_channel("").is_err());
        assert!(validate_channel("   ").is_err());
        assert!(validate_channel("a b").is_err());
        assert!(validate_channel("drop;table").is_err());
        assert!(validate_channel(&"9".repeat(MAX_CHANNEL_LEN + 1)).is_err());
    }
}
