//! Subcommand execution. Every command yields an [`Outcome`] rendered as JSON.

use serde::Serialize;
use serde_json::Value;

use duck_ledger::{CoinLedger, ErrorKind, LedgerError, Outcome};
use duck_store_lmdb::{check_integrity, IntegrityReport, LmdbEnvironment};
use duck_types::{
    AccountId, CoinAmount, Decision, FundsKind, RequestId, RequestStatus, RestrictionKind,
    Timestamp,
};
use duck_utils::describe_restriction;

pub type AdminLedger = CoinLedger<LmdbEnvironment>;

/// What the back-office shows for one account.
#[derive(Debug, Serialize)]
pub struct AccountView {
    pub id: AccountId,
    pub display_name: Option<String>,
    pub balance: CoinAmount,
    pub verified: bool,
    pub restriction: String,
    pub unread_notifications: usize,
    pub pending_messages: usize,
}

/// A parsed back-office action, independent of the CLI surface.
#[derive(Debug)]
pub enum Action {
    OpenAccount {
        id: AccountId,
        name: Option<String>,
    },
    Show {
        id: AccountId,
    },
    Credit {
        id: AccountId,
        amount: CoinAmount,
    },
    Restrict {
        id: AccountId,
        kind: RestrictionKind,
        days: Option<u32>,
    },
    Lift {
        id: AccountId,
    },
    Requests {
        kind: Option<FundsKind>,
        status: Option<RequestStatus>,
    },
    ResolveWithdrawal {
        id: RequestId,
        decision: Decision,
    },
    ResolveDeposit {
        id: RequestId,
        decision: Decision,
    },
    Simulate {
        count: u32,
    },
    Audit {
        id: AccountId,
    },
}

/// Accepts `req-7` as displayed by the review table, or a bare `7`.
pub fn parse_request_id(raw: &str) -> Result<RequestId, String> {
    let digits = raw.trim().trim_start_matches("req-");
    digits
        .parse::<u64>()
        .map(RequestId::new)
        .map_err(|_| format!("invalid request id: {raw}"))
}

fn to_json<T: Serialize>(outcome: Outcome<T>) -> Outcome<Value> {
    let Outcome {
        success,
        message,
        data,
        error,
    } = outcome;
    match data.map(serde_json::to_value).transpose() {
        Ok(data) => Outcome {
            success,
            message,
            data,
            error,
        },
        Err(e) => Outcome {
            success: false,
            message: format!("cannot render result: {e}"),
            data: None,
            error,
        },
    }
}

fn as_admin<T: Serialize>(
    admin: Option<&AccountId>,
    run: impl FnOnce(&AccountId) -> Outcome<T>,
) -> Outcome<Value> {
    match admin {
        Some(admin) => to_json(run(admin)),
        None => Outcome {
            success: false,
            message: "this command needs an administrator identity (--as or DUCK_ADMIN)"
                .to_string(),
            data: None,
            error: Some(ErrorKind::Unauthorized),
        },
    }
}

pub fn execute(ledger: &AdminLedger, admin: Option<&AccountId>, action: Action) -> Outcome<Value> {
    match action {
        Action::OpenAccount { id, name } => to_json(Outcome::from_result(
            ledger.open_account(&id, name),
            |r| format!("Account {} opened.", r.id),
        )),
        Action::Show { id } => to_json(Outcome::from_result(show(ledger, &id), |v| {
            format!("Balance of {}: {} coins.", v.id, v.balance)
        })),
        Action::Audit { id } => to_json(Outcome::from_result(ledger.audit_account(&id), |r| {
            if r.consistent {
                format!("Balance of {} matches its {} journal entries.", r.account, r.entries)
            } else {
                format!("Balance of {} does not match its journal.", r.account)
            }
        })),
        Action::Credit { id, amount } => as_admin(admin, |admin| {
            Outcome::from_result(ledger.admin_direct_credit(admin, &id, amount), |r| {
                format!("Credited {amount} coins; balance is now {}.", r.balance)
            })
        }),
        Action::Restrict { id, kind, days } => as_admin(admin, |admin| {
            Outcome::from_result(ledger.admin_apply_restriction(admin, &id, kind, days), |r| {
                format!("Restriction on {} applied.", r.id)
            })
        }),
        Action::Lift { id } => as_admin(admin, |admin| {
            Outcome::from_result(ledger.admin_lift_restriction(admin, &id), |r| {
                format!("Restriction on {} lifted.", r.id)
            })
        }),
        Action::Requests { kind, status } => as_admin(admin, |admin| {
            Outcome::from_result(ledger.list_requests(admin, kind, status), |list| {
                format!("{} request(s).", list.len())
            })
        }),
        Action::ResolveWithdrawal { id, decision } => as_admin(admin, |admin| {
            Outcome::from_result(ledger.resolve_withdrawal(admin, id, decision), |r| {
                format!("Withdrawal {} {}.", r.id, r.status)
            })
        }),
        Action::ResolveDeposit { id, decision } => as_admin(admin, |admin| {
            Outcome::from_result(ledger.resolve_deposit(admin, id, decision), |r| {
                format!("Deposit {} {}.", r.id, r.status)
            })
        }),
        Action::Simulate { count } => as_admin(admin, |admin| {
            Outcome::from_result(ledger.simulate_bulk_reward(admin, count), |r| {
                format!(
                    "Simulated {} reward(s) totalling {} coins across {} account(s).",
                    r.events,
                    r.total,
                    r.per_account.len()
                )
            })
        }),
    }
}

fn show(ledger: &AdminLedger, id: &AccountId) -> Result<AccountView, LedgerError> {
    let record = ledger.account(id)?;
    Ok(AccountView {
        restriction: describe_restriction(&record.restriction, Timestamp::now()),
        unread_notifications: ledger.unread_notifications(id)?,
        pending_messages: ledger.pending_messages(id)?.len(),
        id: record.id,
        display_name: record.display_name,
        balance: record.balance,
        verified: record.verified,
    })
}

/// Run the LMDB integrity check on an opened environment.
pub fn check(env: &LmdbEnvironment) -> Outcome<Value> {
    match check_integrity(env.env()) {
        Ok(report) => {
            let message = summarise(&report);
            let healthy = report.is_healthy();
            let mut outcome = to_json(Outcome::success(message, report));
            outcome.success = healthy;
            outcome
        }
        Err(e) => Outcome {
            success: false,
            message: format!("integrity check failed: {e}"),
            data: None,
            error: Some(ErrorKind::Infrastructure),
        },
    }
}

fn summarise(report: &IntegrityReport) -> String {
    if report.is_healthy() {
        format!(
            "{} databases, {} entries, no errors.",
            report.databases_checked, report.total_entries
        )
    } else {
        format!("{} error(s): {}", report.errors.len(), report.errors.join("; "))
    }
}
