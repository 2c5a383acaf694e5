//! Fundamental types for the duck coin ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account identifiers, coin amounts, timestamps, restriction and request states,
//! the gift catalogue, and the tunable ledger parameters.

pub mod account;
pub mod amount;
pub mod error;
pub mod gift;
pub mod ids;
pub mod params;
pub mod random;
pub mod state;
pub mod time;

pub use account::AccountId;
pub use amount::{CoinAmount, COIN};
pub use error::TypesError;
pub use gift::Gift;
pub use ids::{ContentId, EventId, RequestId};
pub use params::LedgerParams;
pub use random::{OsRandom, RandomSource};
pub use state::{Decision, FundsKind, RequestStatus, Restriction, RestrictionKind};
pub use time::{Clock, SystemClock, Timestamp, SECS_PER_DAY};
