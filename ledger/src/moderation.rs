//! Administrator actions on accounts: direct credits and restrictions.

use duck_store::{AccountRecord, EntryReason, NotificationKind, TransactionalStore};
use duck_types::{AccountId, Clock, CoinAmount, RandomSource, Restriction, RestrictionKind};

use crate::error::LedgerError;
use crate::ledger::{credit, load_account, log_failure, notify, CoinLedger};
use crate::{messages, spans};

impl<S: TransactionalStore, C: Clock, R: RandomSource> CoinLedger<S, C, R> {
    /// Add `amount` to a user's balance and tell them about it.
    pub fn admin_direct_credit(
        &self,
        admin: &AccountId,
        target: &AccountId,
        amount: CoinAmount,
    ) -> Result<AccountRecord, LedgerError> {
        let _span = spans::admin_span("direct_credit", admin, target).entered();
        let now = self.now();

        let result = self.admins().ensure(admin).and_then(|()| {
            if amount.is_zero() {
                return Err(LedgerError::ZeroAmount);
            }
            self.store().transact(|txn| {
                let mut record = load_account(txn, target)?;
                credit(txn, &mut record, amount, EntryReason::AdminCredit, now)?;
                txn.put_account(&record)?;
                txn.append_message(target, &messages::admin_credit(amount))?;
                Ok(record)
            })
        });

        match &result {
            Ok(record) => tracing::info!(amount = %amount, balance = %record.balance, "admin credit applied"),
            Err(err) => log_failure("admin_direct_credit", err),
        }
        result
    }

    /// Restrict an account for `duration_days` days, or ban it outright.
    ///
    /// A timed restriction needs at least one day; the duration is ignored
    /// for a ban. A new restriction replaces any existing one.
    pub fn admin_apply_restriction(
        &self,
        admin: &AccountId,
        target: &AccountId,
        kind: RestrictionKind,
        duration_days: Option<u32>,
    ) -> Result<AccountRecord, LedgerError> {
        let _span = spans::admin_span("apply_restriction", admin, target).entered();
        let now = self.now();

        let result = self.admins().ensure(admin).and_then(|()| {
            let (restriction, text) = match kind {
                RestrictionKind::Timed => match duration_days {
                    Some(days) if days >= 1 => (
                        Restriction::Timed {
                            until: now.plus_days(days),
                        },
                        messages::restricted(days),
                    ),
                    _ => return Err(LedgerError::InvalidDuration),
                },
                RestrictionKind::Ban => (Restriction::Banned, messages::banned()),
            };
            self.store().transact(|txn| {
                let mut record = load_account(txn, target)?;
                record.restriction = restriction;
                record.updated_at = now;
                txn.put_account(&record)?;
                txn.append_message(target, &text)?;
                notify(txn, target, admin, NotificationKind::Moderation, text.clone(), now)?;
                Ok(record)
            })
        });

        match &result {
            Ok(record) => tracing::info!(restriction = ?record.restriction, "restriction applied"),
            Err(err) => log_failure("admin_apply_restriction", err),
        }
        result
    }

    /// Clear any restriction on an account.
    pub fn admin_lift_restriction(
        &self,
        admin: &AccountId,
        target: &AccountId,
    ) -> Result<AccountRecord, LedgerError> {
        let _span = spans::admin_span("lift_restriction", admin, target).entered();
        let now = self.now();

        let result = self.admins().ensure(admin).and_then(|()| {
            self.store().transact(|txn| {
                let mut record = load_account(txn, target)?;
                record.restriction = Restriction::None;
                record.updated_at = now;
                txn.put_account(&record)?;
                txn.append_message(target, &messages::restriction_lifted())?;
                Ok(record)
            })
        });

        match &result {
            Ok(_) => tracing::info!("restriction lifted"),
            Err(err) => log_failure("admin_lift_restriction", err),
        }
        result
    }
}
