//! Read and write transaction handles over LMDB.
//!
//! Key layouts:
//! - `accounts`: account id bytes
//! - `requests`: request id, big-endian `u64`
//! - `claims`: [`ClaimKey::to_bytes`]
//! - `messages`, `notifications`, `entries`: `account ++ 0x00 ++ seq_be`.
//!   Account ids never contain control bytes, so `account ++ 0x00` is a
//!   prefix owned by exactly one account, and the big-endian sequence keeps
//!   a prefix scan in append order.
//! - `meta`: counter name → big-endian `u64`

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use duck_store::{
    AccountRecord, ClaimKey, FundsRequest, LedgerEntry, NotificationRecord, ReadTxn, RewardClaim,
    Sequence, StoreError, WriteTxn,
};
use duck_types::{AccountId, RequestId};

use crate::LmdbError;

/// Handles for every database in the environment.
#[derive(Clone, Copy)]
pub(crate) struct Databases {
    pub accounts: Database<Bytes, Bytes>,
    pub requests: Database<Bytes, Bytes>,
    pub claims: Database<Bytes, Bytes>,
    pub messages: Database<Bytes, Bytes>,
    pub notifications: Database<Bytes, Bytes>,
    pub entries: Database<Bytes, Bytes>,
    pub meta: Database<Bytes, Bytes>,
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    Ok(bincode::serialize(value).map_err(LmdbError::from)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
}

fn scope_prefix(account: &AccountId) -> Vec<u8> {
    let mut key = Vec::with_capacity(account.as_bytes().len() + 1);
    key.extend_from_slice(account.as_bytes());
    key.push(0);
    key
}

fn scoped_key(account: &AccountId, seq: u64) -> Vec<u8> {
    let mut key = scope_prefix(account);
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

pub(crate) fn read_counter(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn<'_>,
    name: &str,
) -> Result<u64, StoreError> {
    match db.get(txn, name.as_bytes()).map_err(LmdbError::from)? {
        Some(bytes) => {
            let arr: [u8; 8] = bytes.try_into().map_err(|_| {
                StoreError::Corruption(format!("counter '{name}' has unexpected byte length"))
            })?;
            Ok(u64::from_be_bytes(arr))
        }
        None => Ok(0),
    }
}

fn scan_prefix<T: DeserializeOwned>(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn<'_>,
    prefix: &[u8],
) -> Result<Vec<T>, StoreError> {
    let iter = db.prefix_iter(txn, prefix).map_err(LmdbError::from)?;
    let mut results = Vec::new();
    for item in iter {
        let (_key, val) = item.map_err(LmdbError::from)?;
        results.push(decode(val)?);
    }
    Ok(results)
}

fn scan_all<T: DeserializeOwned>(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn<'_>,
) -> Result<Vec<T>, StoreError> {
    let iter = db.iter(txn).map_err(LmdbError::from)?;
    let mut results = Vec::new();
    for item in iter {
        let (_key, val) = item.map_err(LmdbError::from)?;
        results.push(decode(val)?);
    }
    Ok(results)
}

// ── Shared reads ────────────────────────────────────────────────────────

fn get_account(
    dbs: &Databases,
    txn: &RoTxn<'_>,
    id: &AccountId,
) -> Result<Option<AccountRecord>, StoreError> {
    dbs.accounts
        .get(txn, id.as_bytes())
        .map_err(LmdbError::from)?
        .map(decode)
        .transpose()
}

fn get_request(
    dbs: &Databases,
    txn: &RoTxn<'_>,
    id: RequestId,
) -> Result<Option<FundsRequest>, StoreError> {
    dbs.requests
        .get(txn, id.to_be_bytes().as_slice())
        .map_err(LmdbError::from)?
        .map(decode)
        .transpose()
}

fn claim_exists(dbs: &Databases, txn: &RoTxn<'_>, key: &ClaimKey) -> Result<bool, StoreError> {
    Ok(dbs
        .claims
        .get(txn, &key.to_bytes())
        .map_err(LmdbError::from)?
        .is_some())
}

macro_rules! impl_read_txn {
    ($ty:ty) => {
        impl ReadTxn for $ty {
            fn get_account(&self, id: &AccountId) -> Result<Option<AccountRecord>, StoreError> {
                get_account(self.dbs, &self.txn, id)
            }

            fn iter_accounts(&self) -> Result<Vec<AccountRecord>, StoreError> {
                scan_all(&self.dbs.accounts, &self.txn)
            }

            fn get_request(&self, id: RequestId) -> Result<Option<FundsRequest>, StoreError> {
                get_request(self.dbs, &self.txn, id)
            }

            fn iter_requests(&self) -> Result<Vec<FundsRequest>, StoreError> {
                scan_all(&self.dbs.requests, &self.txn)
            }

            fn claim_exists(&self, key: &ClaimKey) -> Result<bool, StoreError> {
                claim_exists(self.dbs, &self.txn, key)
            }

            fn queued_messages(&self, id: &AccountId) -> Result<Vec<String>, StoreError> {
                scan_prefix(&self.dbs.messages, &self.txn, &scope_prefix(id))
            }

            fn notifications_for(
                &self,
                recipient: &AccountId,
            ) -> Result<Vec<NotificationRecord>, StoreError> {
                scan_prefix(&self.dbs.notifications, &self.txn, &scope_prefix(recipient))
            }

            fn entries_for(&self, id: &AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
                scan_prefix(&self.dbs.entries, &self.txn, &scope_prefix(id))
            }
        }
    };
}

/// A read-only snapshot.
pub struct LmdbReadTxn<'e> {
    pub(crate) txn: RoTxn<'e>,
    pub(crate) dbs: &'e Databases,
}

/// A write transaction. Dropping it without commit aborts every write.
pub struct LmdbWriteTxn<'e> {
    pub(crate) txn: RwTxn<'e>,
    pub(crate) dbs: &'e Databases,
}

impl_read_txn!(LmdbReadTxn<'_>);
impl_read_txn!(LmdbWriteTxn<'_>);

impl LmdbWriteTxn<'_> {
    fn put_value<T: Serialize>(
        &mut self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        value: &T,
    ) -> Result<(), StoreError> {
        let bytes = encode(value)?;
        db.put(&mut self.txn, key, &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }
}

impl WriteTxn for LmdbWriteTxn<'_> {
    fn next_sequence(&mut self, seq: Sequence) -> Result<u64, StoreError> {
        let next = read_counter(&self.dbs.meta, &self.txn, seq.key())?
            .checked_add(1)
            .ok_or_else(|| StoreError::Corruption(format!("counter '{}' overflowed", seq.key())))?;
        self.dbs
            .meta
            .put(&mut self.txn, seq.key().as_bytes(), &next.to_be_bytes())
            .map_err(LmdbError::from)?;
        Ok(next)
    }

    fn put_account(&mut self, record: &AccountRecord) -> Result<(), StoreError> {
        self.put_value(self.dbs.accounts, record.id.as_bytes(), record)
    }

    fn put_request(&mut self, request: &FundsRequest) -> Result<(), StoreError> {
        self.put_value(self.dbs.requests, &request.id.to_be_bytes(), request)
    }

    fn create_claim(&mut self, claim: &RewardClaim) -> Result<(), StoreError> {
        let key = claim.key.to_bytes();
        if claim_exists(self.dbs, &self.txn, &claim.key)? {
            return Err(StoreError::Duplicate(format!(
                "reward claim {}/{}",
                claim.key.viewer, claim.key.event
            )));
        }
        self.put_value(self.dbs.claims, &key, claim)
    }

    fn append_message(&mut self, id: &AccountId, message: &str) -> Result<(), StoreError> {
        let seq = self.next_sequence(Sequence::Message)?;
        self.put_value(self.dbs.messages, &scoped_key(id, seq), &message)
    }

    fn take_messages(&mut self, id: &AccountId) -> Result<Vec<String>, StoreError> {
        let prefix = scope_prefix(id);
        let mut keys = Vec::new();
        let mut messages = Vec::new();
        {
            let iter = self
                .dbs
                .messages
                .prefix_iter(&self.txn, &prefix)
                .map_err(LmdbError::from)?;
            for item in iter {
                let (key, val) = item.map_err(LmdbError::from)?;
                keys.push(key.to_vec());
                messages.push(decode::<String>(val)?);
            }
        }
        for key in &keys {
            self.dbs
                .messages
                .delete(&mut self.txn, key)
                .map_err(LmdbError::from)?;
        }
        Ok(messages)
    }

    fn put_notification(&mut self, record: &NotificationRecord) -> Result<(), StoreError> {
        self.put_value(
            self.dbs.notifications,
            &scoped_key(&record.recipient, record.id),
            record,
        )
    }

    fn mark_notifications_read(&mut self, recipient: &AccountId) -> Result<u64, StoreError> {
        let prefix = scope_prefix(recipient);
        let unread: Vec<NotificationRecord> =
            scan_prefix::<NotificationRecord>(&self.dbs.notifications, &self.txn, &prefix)?
                .into_iter()
                .filter(|n| !n.read)
                .collect();
        let changed = unread.len() as u64;
        for mut record in unread {
            record.read = true;
            self.put_notification(&record)?;
        }
        Ok(changed)
    }

    fn append_entry(&mut self, entry: &LedgerEntry) -> Result<(), StoreError> {
        self.put_value(self.dbs.entries, &scoped_key(&entry.account, entry.seq), entry)
    }
}
