//! Coin ledger: the transactional mutation engine behind the duck coin economy.
//!
//! Every balance-affecting action (ad rewards, gifts, verification purchase,
//! withdrawals, deposits, administrator credits) is one atomic unit against
//! the authoritative store:
//! - preconditions are re-read and re-checked inside the unit, never taken
//!   from a caller's cached balance
//! - every touched record, journal entry, notification and queued system
//!   message is written in the same unit, or none are
//! - a failed unit leaves the store exactly as it was

pub mod accounts;
pub mod admin;
pub mod error;
pub mod funds;
pub mod gifts;
pub mod ledger;
pub mod messages;
pub mod moderation;
pub mod outcome;
pub mod rewards;
pub mod spans;
pub mod verification;

pub use accounts::AuditReport;
pub use admin::AdminPolicy;
pub use error::{ErrorKind, LedgerError};
pub use gifts::GiftReceipt;
pub use ledger::CoinLedger;
pub use outcome::Outcome;
pub use rewards::{RewardReceipt, SimulationReport};
