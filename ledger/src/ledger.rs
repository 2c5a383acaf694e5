//! The coin ledger: owns the store handle, the clock, the random source, the
//! economic parameters and the administrator allow-list.
//!
//! Operations live in the sibling modules (`rewards`, `gifts`, `funds`, ...)
//! as further `impl` blocks on [`CoinLedger`]. Each one is exactly one call to
//! [`TransactionalStore::transact`]; the helpers below only ever run inside
//! such a call.

use duck_store::{
    AccountRecord, Direction, EntryReason, LedgerEntry, NotificationKind, NotificationRecord,
    Sequence, TransactionalStore, WriteTxn,
};
use duck_types::{
    AccountId, Clock, CoinAmount, LedgerParams, OsRandom, RandomSource, SystemClock, Timestamp,
};

use crate::admin::AdminPolicy;
use crate::error::{ErrorKind, LedgerError};

pub struct CoinLedger<S, C = SystemClock, R = OsRandom> {
    store: S,
    clock: C,
    random: R,
    params: LedgerParams,
    admins: AdminPolicy,
}

impl<S: TransactionalStore> CoinLedger<S> {
    pub fn new(store: S, params: LedgerParams, admins: AdminPolicy) -> Self {
        Self {
            store,
            clock: SystemClock,
            random: OsRandom,
            params,
            admins,
        }
    }
}

impl<S, C, R> CoinLedger<S, C, R> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> CoinLedger<S, C2, R> {
        CoinLedger {
            store: self.store,
            clock,
            random: self.random,
            params: self.params,
            admins: self.admins,
        }
    }

    pub fn with_random<R2: RandomSource>(self, random: R2) -> CoinLedger<S, C, R2> {
        CoinLedger {
            store: self.store,
            clock: self.clock,
            random,
            params: self.params,
            admins: self.admins,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    pub fn admins(&self) -> &AdminPolicy {
        &self.admins
    }

    pub(crate) fn random(&self) -> &R {
        &self.random
    }
}

impl<S: TransactionalStore, C: Clock, R: RandomSource> CoinLedger<S, C, R> {
    pub(crate) fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

/// Log a failed operation at a level matching how surprising it is.
pub(crate) fn log_failure(op: &'static str, err: &LedgerError) {
    match err.kind() {
        ErrorKind::Infrastructure => tracing::error!(op, error = %err, "ledger operation failed"),
        ErrorKind::Unauthorized => tracing::warn!(op, error = %err, "unauthorised admin attempt"),
        ErrorKind::BenignDuplicate => tracing::debug!(op, error = %err, "duplicate ignored"),
        ErrorKind::Precondition | ErrorKind::NotFound => {
            tracing::debug!(op, error = %err, "operation refused")
        }
    }
}

/// Re-read an account inside the unit.
pub(crate) fn load_account(
    txn: &mut dyn WriteTxn,
    id: &AccountId,
) -> Result<AccountRecord, LedgerError> {
    txn.get_account(id)?
        .ok_or_else(|| LedgerError::AccountNotFound(id.clone()))
}

/// Re-read an account and refuse if it is currently restricted.
pub(crate) fn load_unrestricted(
    txn: &mut dyn WriteTxn,
    id: &AccountId,
    now: Timestamp,
) -> Result<AccountRecord, LedgerError> {
    let account = load_account(txn, id)?;
    if account.is_restricted(now) {
        return Err(LedgerError::AccountRestricted(id.clone()));
    }
    Ok(account)
}

/// Add `amount` to the record and journal it. The caller persists the record.
pub(crate) fn credit(
    txn: &mut dyn WriteTxn,
    account: &mut AccountRecord,
    amount: CoinAmount,
    reason: EntryReason,
    now: Timestamp,
) -> Result<(), LedgerError> {
    account.balance = account
        .balance
        .checked_add(amount)
        .ok_or(LedgerError::Overflow)?;
    account.updated_at = now;
    journal(txn, &account.id, Direction::Credit, amount, reason, now)
}

/// Subtract `amount` if the balance covers it, and journal it. The caller
/// persists the record.
pub(crate) fn debit(
    txn: &mut dyn WriteTxn,
    account: &mut AccountRecord,
    amount: CoinAmount,
    reason: EntryReason,
    now: Timestamp,
) -> Result<(), LedgerError> {
    account.balance =
        account
            .balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: amount,
                available: account.balance,
            })?;
    account.updated_at = now;
    journal(txn, &account.id, Direction::Debit, amount, reason, now)
}

fn journal(
    txn: &mut dyn WriteTxn,
    account: &AccountId,
    direction: Direction,
    amount: CoinAmount,
    reason: EntryReason,
    now: Timestamp,
) -> Result<(), LedgerError> {
    let seq = txn.next_sequence(Sequence::Entry)?;
    txn.append_entry(&LedgerEntry {
        seq,
        account: account.clone(),
        direction,
        amount,
        reason,
        at: now,
    })?;
    Ok(())
}

pub(crate) fn notify(
    txn: &mut dyn WriteTxn,
    recipient: &AccountId,
    actor: &AccountId,
    kind: NotificationKind,
    subject: impl Into<String>,
    now: Timestamp,
) -> Result<u64, LedgerError> {
    let id = txn.next_sequence(Sequence::Notification)?;
    txn.put_notification(&NotificationRecord {
        id,
        recipient: recipient.clone(),
        actor: actor.clone(),
        kind,
        subject: subject.into(),
        read: false,
        created_at: now,
    })?;
    Ok(id)
}
