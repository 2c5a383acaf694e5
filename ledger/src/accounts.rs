//! Account lifecycle, lookups, the system-message queue and notifications.

use duck_store::{
    AccountRecord, Direction, LedgerEntry, NotificationRecord, StoreError, TransactionalStore,
};
use duck_types::{AccountId, Clock, CoinAmount, RandomSource};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::{load_account, log_failure, CoinLedger};
use crate::spans;

/// Balance versus the sum of the account's journal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub account: AccountId,
    pub balance: CoinAmount,
    pub credited: CoinAmount,
    pub debited: CoinAmount,
    pub entries: usize,
    /// `credited - debited == balance`.
    pub consistent: bool,
}

fn not_found(id: &AccountId) -> impl FnOnce(StoreError) -> LedgerError + '_ {
    move |err| match err {
        StoreError::NotFound(_) => LedgerError::AccountNotFound(id.clone()),
        other => other.into(),
    }
}

impl<S: TransactionalStore, C: Clock, R: RandomSource> CoinLedger<S, C, R> {
    /// Create an account with a zero balance.
    pub fn open_account(
        &self,
        id: &AccountId,
        display_name: Option<String>,
    ) -> Result<AccountRecord, LedgerError> {
        let _span = spans::operation_span("open_account", id).entered();
        let now = self.now();

        let result: Result<AccountRecord, LedgerError> = self.store().transact(|txn| {
            if txn.get_account(id)?.is_some() {
                return Err(LedgerError::AccountExists(id.clone()));
            }
            let record = AccountRecord::new(id.clone(), display_name, now);
            txn.put_account(&record)?;
            Ok(record)
        });

        match &result {
            Ok(_) => tracing::info!("account opened"),
            Err(err) => log_failure("open_account", err),
        }
        result
    }

    pub fn account(&self, id: &AccountId) -> Result<AccountRecord, LedgerError> {
        self.store().get_account(id).map_err(not_found(id))
    }

    /// The authoritative balance. Never defaults to zero for a missing account.
    pub fn balance(&self, id: &AccountId) -> Result<CoinAmount, LedgerError> {
        Ok(self.account(id)?.balance)
    }

    /// Queued system messages, without consuming them.
    pub fn pending_messages(&self, id: &AccountId) -> Result<Vec<String>, LedgerError> {
        Ok(self.store().read(|txn| txn.queued_messages(id))?)
    }

    /// Remove and return every queued system message for display.
    pub fn drain_messages(&self, id: &AccountId) -> Result<Vec<String>, LedgerError> {
        let result: Result<Vec<String>, LedgerError> = self.store().transact(|txn| {
            load_account(txn, id)?;
            Ok(txn.take_messages(id)?)
        });
        if let Err(err) = &result {
            log_failure("drain_messages", err);
        }
        result
    }

    /// Notifications, oldest first.
    pub fn notifications(&self, id: &AccountId) -> Result<Vec<NotificationRecord>, LedgerError> {
        Ok(self.store().read(|txn| txn.notifications_for(id))?)
    }

    pub fn unread_notifications(&self, id: &AccountId) -> Result<usize, LedgerError> {
        Ok(self.notifications(id)?.iter().filter(|n| !n.read).count())
    }

    /// Mark every notification read; returns how many were unread.
    pub fn mark_notifications_read(&self, id: &AccountId) -> Result<u64, LedgerError> {
        Ok(self.store().transact(|txn| txn.mark_notifications_read(id))?)
    }

    /// Journal entries, oldest first.
    pub fn entries(&self, id: &AccountId) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.store().read(|txn| txn.entries_for(id))?)
    }

    /// Compare the stored balance with the account's journal.
    pub fn audit_account(&self, id: &AccountId) -> Result<AuditReport, LedgerError> {
        let (account, entries) = self
            .store()
            .read(|txn| {
                let account = txn
                    .get_account(id)?
                    .ok_or_else(|| StoreError::NotFound(format!("account {id}")))?;
                Ok((account, txn.entries_for(id)?))
            })
            .map_err(not_found(id))?;

        let mut credited = CoinAmount::ZERO;
        let mut debited = CoinAmount::ZERO;
        for entry in &entries {
            let total = match entry.direction {
                Direction::Credit => &mut credited,
                Direction::Debit => &mut debited,
            };
            *total = total.checked_add(entry.amount).ok_or(LedgerError::Overflow)?;
        }
        let consistent = credited.checked_sub(debited) == Some(account.balance);
        if !consistent {
            tracing::warn!(
                account = %id,
                balance = %account.balance,
                credited = %credited,
                debited = %debited,
                "balance does not match journal"
            );
        }

        Ok(AuditReport {
            account: id.clone(),
            balance: account.balance,
            credited,
            debited,
            entries: entries.len(),
            consistent,
        })
    }
}
