//! Optimistic balance display (client-side).
//!
//! `displayed = confirmed + pending credits - pending debits`
//!
//! Pending adjustments are keyed by [`Ticket`] and removed exactly once, by
//! [`confirm`](OptimisticBalance::confirm) or [`revert`](OptimisticBalance::revert).
//! The ledger's balance is adopted as `confirmed` only once nothing else is
//! pending. Until then the ledger may or may not have applied the other
//! adjustments, so a confirmation only folds its own adjustment into
//! `confirmed` and remembers the reported balance for later.

use duck_ledger::Outcome;
use duck_types::CoinAmount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::WalletError;

/// Handle to one pending local adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    Credit(CoinAmount),
    Debit(CoinAmount),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OptimisticBalance {
    confirmed: CoinAmount,
    pending: BTreeMap<Ticket, Adjustment>,
    next_ticket: u64,
    #[serde(default)]
    reported: Option<CoinAmount>,
}

impl OptimisticBalance {
    pub fn new(confirmed: CoinAmount) -> Self {
        Self {
            confirmed,
            pending: BTreeMap::new(),
            next_ticket: 1,
            reported: None,
        }
    }

    /// Balance known to be settled on the ledger.
    pub fn confirmed(&self) -> CoinAmount {
        self.confirmed
    }

    /// Balance to show the user right now.
    pub fn displayed(&self) -> CoinAmount {
        self.pending
            .values()
            .fold(self.confirmed, |acc, adjustment| match adjustment {
                Adjustment::Credit(amount) => acc.checked_add(*amount).unwrap_or(acc),
                Adjustment::Debit(amount) => acc.saturating_sub(*amount),
            })
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Reflect an action locally before the ledger has answered. A debit the
    /// displayed balance cannot cover is refused here; the ledger would
    /// refuse it anyway.
    pub fn apply(&mut self, adjustment: Adjustment) -> Result<Ticket, WalletError> {
        let displayed = self.displayed();
        match adjustment {
            Adjustment::Debit(amount) if amount > displayed => {
                return Err(WalletError::InsufficientBalance {
                    needed: amount,
                    available: displayed,
                });
            }
            Adjustment::Credit(amount) if displayed.checked_add(amount).is_none() => {
                return Err(WalletError::Overflow);
            }
            _ => {}
        }
        let ticket = Ticket(self.next_ticket.max(1));
        self.next_ticket = ticket.0 + 1;
        self.pending.insert(ticket, adjustment);
        Ok(ticket)
    }

    /// The ledger accepted the action. With nothing else pending the
    /// authoritative balance is adopted; otherwise only this adjustment is
    /// settled into `confirmed`.
    pub fn confirm(&mut self, ticket: Ticket, authoritative: CoinAmount) -> Result<(), WalletError> {
        let adjustment = *self
            .pending
            .get(&ticket)
            .ok_or(WalletError::UnknownTicket(ticket.0))?;
        let settled = match adjustment {
            Adjustment::Credit(amount) => self
                .confirmed
                .checked_add(amount)
                .ok_or(WalletError::Overflow)?,
            Adjustment::Debit(amount) => self.confirmed.saturating_sub(amount),
        };
        self.settle(ticket)?;
        self.confirmed = settled;
        self.reported = Some(authoritative);
        self.adopt_reported();
        Ok(())
    }

    /// The ledger refused the action: drop the local adjustment.
    pub fn revert(&mut self, ticket: Ticket) -> Result<(), WalletError> {
        self.settle(ticket)?;
        self.adopt_reported();
        tracing::debug!(ticket = ticket.0, "optimistic adjustment reverted");
        Ok(())
    }

    /// Confirm or revert from an operation's outcome, whose data is the
    /// actor's new authoritative balance. A benign duplicate is reverted: it
    /// credited nothing.
    pub fn reconcile(&mut self, ticket: Ticket, outcome: &Outcome<CoinAmount>) -> Result<(), WalletError> {
        match (outcome.success, outcome.data) {
            (true, Some(balance)) => self.confirm(ticket, balance),
            _ => self.revert(ticket),
        }
    }

    fn adopt_reported(&mut self) {
        if self.pending.is_empty() {
            if let Some(balance) = self.reported.take() {
                self.confirmed = balance;
            }
        }
    }

    fn settle(&mut self, ticket: Ticket) -> Result<Adjustment, WalletError> {
        self.pending
            .remove(&ticket)
            .ok_or(WalletError::UnknownTicket(ticket.0))
    }
}
