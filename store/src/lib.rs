//! Abstract storage contract for the duck coin ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The ledger depends only on the traits.
//!
//! The contract is transactional: [`TransactionalStore::transact`] runs a
//! closure against a [`WriteTxn`] and commits every write it made, or none of
//! them. Backends must serialise write transactions at least per record so
//! that two concurrent read-modify-write units on the same account never lose
//! an update.

pub mod account;
pub mod claim;
pub mod error;
pub mod journal;
pub mod notification;
pub mod request;

pub use account::AccountRecord;
pub use claim::{ClaimKey, RewardClaim};
pub use error::StoreError;
pub use journal::{Direction, EntryReason, LedgerEntry};
pub use notification::{NotificationKind, NotificationRecord};
pub use request::FundsRequest;

use duck_types::{AccountId, CoinAmount, RequestId, Timestamp};

/// Monotonic counters kept by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sequence {
    Request,
    Notification,
    Message,
    Entry,
}

impl Sequence {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Request => "seq_request",
            Self::Notification => "seq_notification",
            Self::Message => "seq_message",
            Self::Entry => "seq_entry",
        }
    }
}

/// Reads available inside any transaction.
pub trait ReadTxn {
    fn get_account(&self, id: &AccountId) -> Result<Option<AccountRecord>, StoreError>;
    fn iter_accounts(&self) -> Result<Vec<AccountRecord>, StoreError>;

    fn get_request(&self, id: RequestId) -> Result<Option<FundsRequest>, StoreError>;
    /// All requests, oldest first.
    fn iter_requests(&self) -> Result<Vec<FundsRequest>, StoreError>;

    fn claim_exists(&self, key: &ClaimKey) -> Result<bool, StoreError>;

    /// Queued system messages for an account, in append order.
    fn queued_messages(&self, id: &AccountId) -> Result<Vec<String>, StoreError>;

    /// Notifications for a recipient, oldest first.
    fn notifications_for(&self, recipient: &AccountId)
        -> Result<Vec<NotificationRecord>, StoreError>;

    /// Journal entries for an account, oldest first.
    fn entries_for(&self, id: &AccountId) -> Result<Vec<LedgerEntry>, StoreError>;
}

/// Writable transaction handle (extends ReadTxn).
///
/// Nothing written through this handle is visible outside the transaction
/// until the enclosing [`TransactionalStore::transact`] commits.
pub trait WriteTxn: ReadTxn {
    /// Allocate the next value of a counter (starting at 1).
    fn next_sequence(&mut self, seq: Sequence) -> Result<u64, StoreError>;

    fn put_account(&mut self, record: &AccountRecord) -> Result<(), StoreError>;

    fn put_request(&mut self, request: &FundsRequest) -> Result<(), StoreError>;

    /// Create-if-absent. Fails with [`StoreError::Duplicate`] when the key
    /// already exists.
    fn create_claim(&mut self, claim: &RewardClaim) -> Result<(), StoreError>;

    /// Append one message to the account's outbound queue without rewriting
    /// the messages already queued.
    fn append_message(&mut self, id: &AccountId, message: &str) -> Result<(), StoreError>;

    /// Remove and return every queued message for the account.
    fn take_messages(&mut self, id: &AccountId) -> Result<Vec<String>, StoreError>;

    fn put_notification(&mut self, record: &NotificationRecord) -> Result<(), StoreError>;

    /// Mark every unread notification of `recipient` as read; returns how many changed.
    fn mark_notifications_read(&mut self, recipient: &AccountId) -> Result<u64, StoreError>;

    fn append_entry(&mut self, entry: &LedgerEntry) -> Result<(), StoreError>;
}

/// An authoritative store offering all-or-nothing transactions.
pub trait TransactionalStore: Send + Sync {
    /// Run `f` against a consistent read snapshot.
    fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, StoreError>;

    /// Run `f` as one atomic unit. Writes are committed only if `f` returns
    /// `Ok`; on `Err` (or a failed commit) nothing is persisted.
    fn transact<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StoreError>;

    /// Fetch an account, failing with `NotFound` rather than inventing one.
    fn get_account(&self, id: &AccountId) -> Result<AccountRecord, StoreError> {
        self.read(|txn| {
            txn.get_account(id)?
                .ok_or_else(|| StoreError::NotFound(format!("account {id}")))
        })
    }

    /// Unconditional credit, applied as its own read-modify-write unit and
    /// journaled. Not for debits or anything gated on a precondition.
    fn increment_balance(
        &self,
        id: &AccountId,
        amount: CoinAmount,
        reason: EntryReason,
        at: Timestamp,
    ) -> Result<AccountRecord, StoreError> {
        self.transact(|txn| {
            let mut account = txn
                .get_account(id)?
                .ok_or_else(|| StoreError::NotFound(format!("account {id}")))?;
            account.balance = account
                .balance
                .checked_add(amount)
                .ok_or_else(|| StoreError::Backend("balance overflow".to_string()))?;
            account.updated_at = at;
            txn.put_account(&account)?;
            let seq = txn.next_sequence(Sequence::Entry)?;
            txn.append_entry(&LedgerEntry {
                seq,
                account: id.clone(),
                direction: Direction::Credit,
                amount,
                reason,
                at,
            })?;
            Ok(account)
        })
    }
}
