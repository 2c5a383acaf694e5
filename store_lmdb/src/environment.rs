//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use duck_store::{ReadTxn, StoreError, TransactionalStore, WriteTxn};

use crate::migration::{Migrator, SCHEMA_VERSION_KEY};
use crate::txn::{read_counter, Databases, LmdbReadTxn, LmdbWriteTxn};
use crate::LmdbError;

/// Default map size: 1 GiB of address space, grown lazily by the OS.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// Number of named databases the ledger uses (with headroom).
pub const MAX_DBS: u32 = 16;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    dbs: Databases,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path, creating every
    /// database and bringing the schema up to date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per path by this process;
        // LMDB forbids opening the same file twice from one process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let dbs = Databases {
            accounts: env.create_database(&mut wtxn, Some("accounts"))?,
            requests: env.create_database(&mut wtxn, Some("requests"))?,
            claims: env.create_database(&mut wtxn, Some("claims"))?,
            messages: env.create_database(&mut wtxn, Some("messages"))?,
            notifications: env.create_database(&mut wtxn, Some("notifications"))?,
            entries: env.create_database(&mut wtxn, Some("entries"))?,
            meta: env.create_database(&mut wtxn, Some("meta"))?,
        };
        wtxn.commit()?;

        let environment = Self {
            env: Arc::new(env),
            dbs,
            path: path.to_path_buf(),
        };
        Migrator::run(&environment)?;
        tracing::info!(path = %path.display(), "opened LMDB environment");
        Ok(environment)
    }

    /// The underlying heed environment.
    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn meta_db(&self) -> Database<Bytes, Bytes> {
        self.dbs.meta
    }

    /// Stored schema version (0 for a fresh database).
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match self.dbs.meta.get(&rtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization(
                        "schema_version has unexpected byte length".to_string(),
                    )
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }

    /// Current value of a store counter, without allocating.
    pub fn sequence_value(&self, seq: duck_store::Sequence) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        read_counter(&self.dbs.meta, &rtxn, seq.key())
    }
}

impl TransactionalStore for LmdbEnvironment {
    fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, StoreError>,
    {
        let txn = self.env.read_txn().map_err(LmdbError::from)?;
        let view = LmdbReadTxn {
            txn,
            dbs: &self.dbs,
        };
        f(&view)
    }

    fn transact<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        let txn = self
            .env
            .write_txn()
            .map_err(|e| StoreError::from(LmdbError::from(e)))?;
        let mut wtxn = LmdbWriteTxn {
            txn,
            dbs: &self.dbs,
        };
        match f(&mut wtxn) {
            Ok(value) => {
                wtxn.txn
                    .commit()
                    .map_err(|e| StoreError::from(LmdbError::from(e)))?;
                Ok(value)
            }
            Err(e) => {
                wtxn.txn.abort();
                Err(e)
            }
        }
    }
}
