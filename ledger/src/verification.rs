//! Verification badge purchase.

use duck_store::{AccountRecord, EntryReason, TransactionalStore};
use duck_types::{AccountId, Clock, RandomSource};

use crate::error::LedgerError;
use crate::ledger::{debit, load_unrestricted, log_failure, CoinLedger};
use crate::{messages, spans};

impl<S: TransactionalStore, C: Clock, R: RandomSource> CoinLedger<S, C, R> {
    /// Debit the verification cost and set the one-way verified flag.
    ///
    /// An already-verified account is refused before the balance is looked
    /// at, so a double purchase never costs anything.
    pub fn purchase_verification(&self, account: &AccountId) -> Result<AccountRecord, LedgerError> {
        let _span = spans::operation_span("purchase_verification", account).entered();
        let now = self.now();
        let cost = self.params().verification_cost;

        let result: Result<AccountRecord, LedgerError> = self.store().transact(|txn| {
            let mut record = load_unrestricted(txn, account, now)?;
            if record.verified {
                return Err(LedgerError::AlreadyVerified(account.clone()));
            }
            debit(txn, &mut record, cost, EntryReason::Verification, now)?;
            record.verified = true;
            txn.put_account(&record)?;
            txn.append_message(account, &messages::verification_purchased(cost))?;
            Ok(record)
        });

        match &result {
            Ok(record) => tracing::info!(cost = %cost, balance = %record.balance, "account verified"),
            Err(err) => log_failure("purchase_verification", err),
        }
        result
    }
}
