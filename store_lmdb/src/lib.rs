//! LMDB storage backend for the duck coin ledger.
//!
//! Implements the `duck-store` transactional contract using the `heed` LMDB
//! bindings. Each logical collection maps to one LMDB database within a
//! single environment, and every ledger atomic unit is exactly one LMDB write
//! transaction. LMDB admits one writer at a time, so read-modify-write units
//! are fully serialised.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod migration;
mod txn;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use txn::{LmdbReadTxn, LmdbWriteTxn};
