//! Nullable store: thread-safe in-memory transactional storage for testing.
//!
//! Each transaction works on a private copy of the whole state while holding
//! the store lock, and swaps it in on commit. That gives the same
//! all-or-nothing, serialised behaviour as the LMDB backend.

use duck_store::{
    AccountRecord, ClaimKey, FundsRequest, LedgerEntry, NotificationRecord, ReadTxn, RewardClaim,
    Sequence, StoreError, TransactionalStore, WriteTxn,
};
use duck_types::{AccountId, RequestId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Clone, Default)]
struct State {
    accounts: BTreeMap<AccountId, AccountRecord>,
    requests: BTreeMap<RequestId, FundsRequest>,
    claims: BTreeMap<ClaimKey, RewardClaim>,
    messages: HashMap<AccountId, Vec<String>>,
    notifications: Vec<NotificationRecord>,
    entries: Vec<LedgerEntry>,
    sequences: HashMap<Sequence, u64>,
}

/// An in-memory store for testing.
/// Thread-safe for use from multiple threads.
pub struct NullStore {
    state: Mutex<State>,
    fail_commits: AtomicU32,
    commits: AtomicU64,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            fail_commits: AtomicU32::new(0),
            commits: AtomicU64::new(0),
        }
    }

    /// Make the next `n` commits fail with a backend error, as if the store
    /// had become unreachable. The transaction's writes are discarded.
    pub fn fail_next_commits(&self, n: u32) {
        self.fail_commits.store(n, Ordering::SeqCst);
    }

    /// Number of successfully committed write transactions.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    /// Seed an account directly, bypassing the ledger.
    pub fn insert_account(&self, record: AccountRecord) {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(record.id.clone(), record);
    }

    fn take_injected_failure(&self) -> bool {
        self.fail_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionalStore for NullStore {
    fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, StoreError>,
    {
        let state = self.state.lock().unwrap();
        f(&NullTxn {
            state: state.clone(),
        })
    }

    fn transact<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut state = self.state.lock().unwrap();
        let mut txn = NullTxn {
            state: state.clone(),
        };
        let value = f(&mut txn)?;
        if self.take_injected_failure() {
            return Err(StoreError::Backend("injected commit failure".to_string()).into());
        }
        *state = txn.state;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }
}

struct NullTxn {
    state: State,
}

impl ReadTxn for NullTxn {
    fn get_account(&self, id: &AccountId) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.state.accounts.get(id).cloned())
    }

    fn iter_accounts(&self) -> Result<Vec<AccountRecord>, StoreError> {
        Ok(self.state.accounts.values().cloned().collect())
    }

    fn get_request(&self, id: RequestId) -> Result<Option<FundsRequest>, StoreError> {
        Ok(self.state.requests.get(&id).cloned())
    }

    fn iter_requests(&self) -> Result<Vec<FundsRequest>, StoreError> {
        Ok(self.state.requests.values().cloned().collect())
    }

    fn claim_exists(&self, key: &ClaimKey) -> Result<bool, StoreError> {
        Ok(self.state.claims.contains_key(key))
    }

    fn queued_messages(&self, id: &AccountId) -> Result<Vec<String>, StoreError> {
        Ok(self.state.messages.get(id).cloned().unwrap_or_default())
    }

    fn notifications_for(
        &self,
        recipient: &AccountId,
    ) -> Result<Vec<NotificationRecord>, StoreError> {
        Ok(self
            .state
            .notifications
            .iter()
            .filter(|n| &n.recipient == recipient)
            .cloned()
            .collect())
    }

    fn entries_for(&self, id: &AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self
            .state
            .entries
            .iter()
            .filter(|e| &e.account == id)
            .cloned()
            .collect())
    }
}

impl WriteTxn for NullTxn {
    fn next_sequence(&mut self, seq: Sequence) -> Result<u64, StoreError> {
        let counter = self.state.sequences.entry(seq).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    fn put_account(&mut self, record: &AccountRecord) -> Result<(), StoreError> {
        self.state
            .accounts
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn put_request(&mut self, request: &FundsRequest) -> Result<(), StoreError> {
        self.state.requests.insert(request.id, request.clone());
        Ok(())
    }

    fn create_claim(&mut self, claim: &RewardClaim) -> Result<(), StoreError> {
        if self.state.claims.contains_key(&claim.key) {
            return Err(StoreError::Duplicate(format!(
                "reward claim {}/{}",
                claim.key.viewer, claim.key.event
            )));
        }
        self.state.claims.insert(claim.key.clone(), claim.clone());
        Ok(())
    }

    fn append_message(&mut self, id: &AccountId, message: &str) -> Result<(), StoreError> {
        self.state
            .messages
            .entry(id.clone())
            .or_default()
            .push(message.to_string());
        Ok(())
    }

    fn take_messages(&mut self, id: &AccountId) -> Result<Vec<String>, StoreError> {
        Ok(self.state.messages.remove(id).unwrap_or_default())
    }

    fn put_notification(&mut self, record: &NotificationRecord) -> Result<(), StoreError> {
        self.state.notifications.push(record.clone());
        Ok(())
    }

    fn mark_notifications_read(&mut self, recipient: &AccountId) -> Result<u64, StoreError> {
        let mut changed = 0;
        for n in self
            .state
            .notifications
            .iter_mut()
            .filter(|n| &n.recipient == recipient && !n.read)
        {
            n.read = true;
            changed += 1;
        }
        Ok(changed)
    }

    fn append_entry(&mut self, entry: &LedgerEntry) -> Result<(), StoreError> {
        self.state.entries.push(entry.clone());
        Ok(())
    }
}
