//! Ad-view rewards and the administrator's bulk reward simulator.

use duck_store::{ClaimKey, EntryReason, RewardClaim, StoreError, TransactionalStore};
use duck_types::{AccountId, Clock, CoinAmount, EventId, RandomSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LedgerError;
use crate::ledger::{credit, load_account, log_failure, CoinLedger};
use crate::spans;

/// What a successful ad-view claim credited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardReceipt {
    pub viewer: AccountId,
    pub viewer_reward: CoinAmount,
    pub viewer_balance: CoinAmount,
    /// Set when the ad was attached to another user's content.
    pub owner: Option<AccountId>,
    pub owner_reward: Option<CoinAmount>,
}

/// Totals credited by one simulation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub events: u32,
    pub total: CoinAmount,
    pub per_account: BTreeMap<AccountId, CoinAmount>,
}

impl<S: TransactionalStore, C: Clock, R: RandomSource> CoinLedger<S, C, R> {
    /// Credit a viewer (and the content owner, if any) for a completed ad view.
    ///
    /// Claim recording and crediting are one unit: a second call for the same
    /// `(viewer, event)` fails with [`LedgerError::AlreadyClaimed`] and credits
    /// nothing. Owning the content yourself counts as a solo view.
    pub fn credit_for_ad_view(
        &self,
        viewer: &AccountId,
        event: &EventId,
        content_owner: Option<&AccountId>,
    ) -> Result<RewardReceipt, LedgerError> {
        let _span = spans::reward_span(viewer, event.as_str()).entered();
        let now = self.now();
        let owner = content_owner.filter(|owner| *owner != viewer);
        let viewer_reward = if owner.is_some() {
            self.params().referred_viewer_reward
        } else {
            self.params().solo_reward
        };
        let owner_reward = self.params().content_owner_reward;

        let result: Result<RewardReceipt, LedgerError> = self.store().transact(|txn| {
            let claim = RewardClaim {
                key: ClaimKey::new(viewer.clone(), event.clone()),
                beneficiary: owner.cloned(),
                claimed_at: now,
            };
            txn.create_claim(&claim).map_err(|e| match e {
                StoreError::Duplicate(_) => LedgerError::AlreadyClaimed {
                    viewer: viewer.clone(),
                    event: event.clone(),
                },
                other => other.into(),
            })?;

            let mut viewer_account = load_account(txn, viewer)?;
            credit(txn, &mut viewer_account, viewer_reward, EntryReason::AdReward, now)?;
            txn.put_account(&viewer_account)?;

            if let Some(owner) = owner {
                let mut owner_account = load_account(txn, owner)?;
                credit(txn, &mut owner_account, owner_reward, EntryReason::ContentReward, now)?;
                txn.put_account(&owner_account)?;
            }

            Ok(RewardReceipt {
                viewer: viewer.clone(),
                viewer_reward,
                viewer_balance: viewer_account.balance,
                owner: owner.cloned(),
                owner_reward: owner.map(|_| owner_reward),
            })
        });

        match &result {
            Ok(receipt) => tracing::info!(
                reward = %receipt.viewer_reward,
                balance = %receipt.viewer_balance,
                owner = ?receipt.owner,
                "ad reward credited"
            ),
            Err(err) => log_failure("credit_for_ad_view", err),
        }
        result
    }

    /// Credit `count` randomly chosen unrestricted accounts with the
    /// simulated reward amount. Administrator only.
    ///
    /// Each credit is its own unit, so a failure part-way leaves the earlier
    /// credits in place. Simulated credits are not idempotency-keyed.
    pub fn simulate_bulk_reward(
        &self,
        admin: &AccountId,
        count: u32,
    ) -> Result<SimulationReport, LedgerError> {
        let _span = spans::simulation_span(admin, count).entered();
        let result = self.run_simulation(admin, count);
        match &result {
            Ok(report) => tracing::info!(
                events = report.events,
                total = %report.total,
                accounts = report.per_account.len(),
                "simulation complete"
            ),
            Err(err) => log_failure("simulate_bulk_reward", err),
        }
        result
    }

    fn run_simulation(&self, admin: &AccountId, count: u32) -> Result<SimulationReport, LedgerError> {
        self.admins().ensure(admin)?;
        if count == 0 {
            return Err(LedgerError::EmptySimulation);
        }
        let now = self.now();
        let eligible: Vec<AccountId> = self.store().read(|txn| {
            Ok(txn
                .iter_accounts()?
                .into_iter()
                .filter(|account| !account.is_restricted(now))
                .map(|account| account.id)
                .collect())
        })?;

        let amount = self.params().simulated_reward;
        let mut report = SimulationReport::default();
        for _ in 0..count {
            let index = self
                .random()
                .pick(eligible.len())?
                .ok_or(LedgerError::NoEligibleAccounts)?;
            let target = &eligible[index];
            self.store()
                .increment_balance(target, amount, EntryReason::SimulatedReward, now)?;

            report.events += 1;
            report.total = report.total.checked_add(amount).ok_or(LedgerError::Overflow)?;
            let slot = report.per_account.entry(target.clone()).or_default();
            *slot = slot.checked_add(amount).ok_or(LedgerError::Overflow)?;
        }
        Ok(report)
    }
}
