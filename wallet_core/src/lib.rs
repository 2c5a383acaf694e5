//! Wallet core library for duck clients.
//!
//! The ledger is authoritative; a client only ever *displays* a balance.
//! This crate keeps that display responsive: an action is applied locally
//! the moment the user takes it, then confirmed or reverted once the ledger
//! operation returns.

pub mod balance;
pub mod error;

pub use balance::{Adjustment, OptimisticBalance, Ticket};
pub use error::WalletError;
