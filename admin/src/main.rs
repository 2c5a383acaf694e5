//! duck-admin: back-office entry point operating the coin ledger directly on
//! its LMDB data directory.

mod commands;
mod config;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{Action, AdminLedger};
use config::AdminConfig;
use duck_ledger::CoinLedger;
use duck_store_lmdb::{check_data_dir, LmdbEnvironment};
use duck_types::{
    AccountId, CoinAmount, Decision, FundsKind, RequestId, RequestStatus, RestrictionKind,
};
use duck_utils::LogFormat;

#[derive(Parser)]
#[command(name = "duck-admin", about = "duck coin ledger back-office")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long, env = "DUCK_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, env = "DUCK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// LMDB map size in bytes.
    #[arg(long, env = "DUCK_MAP_SIZE")]
    map_size: Option<usize>,

    /// Acting administrator identity.
    #[arg(long = "as", env = "DUCK_ADMIN")]
    acting: Option<String>,

    /// Extra administrator identities (comma-separated), added to the
    /// config file's list.
    #[arg(long, env = "DUCK_ADMINS", value_delimiter = ',')]
    admins: Vec<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "DUCK_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "DUCK_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create an account with a zero balance.
    OpenAccount {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Show an account's balance and status.
    Show { id: String },
    /// Add coins to an account.
    Credit { id: String, amount: CoinAmount },
    /// Restrict an account for some days, or ban it.
    Restrict {
        id: String,
        #[arg(long, value_enum, default_value_t = KindArg::Timed)]
        kind: KindArg,
        #[arg(long)]
        days: Option<u32>,
    },
    /// Clear any restriction on an account.
    Lift { id: String },
    /// List funds requests, oldest first.
    Requests {
        #[arg(long, value_enum)]
        kind: Option<FundsKindArg>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Approve or reject a pending withdrawal.
    ResolveWithdrawal {
        #[arg(value_parser = commands::parse_request_id)]
        id: RequestId,
        #[arg(value_enum)]
        decision: DecisionArg,
    },
    /// Approve or reject a pending deposit.
    ResolveDeposit {
        #[arg(value_parser = commands::parse_request_id)]
        id: RequestId,
        #[arg(value_enum)]
        decision: DecisionArg,
    },
    /// Credit randomly chosen unrestricted accounts (testing tool).
    Simulate { count: u32 },
    /// Compare an account's balance with its journal.
    Audit { id: String },
    /// Run the storage integrity check.
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Timed,
    Ban,
}

#[derive(Clone, Copy, ValueEnum)]
enum FundsKindArg {
    Deposit,
    Withdrawal,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Copy, ValueEnum)]
enum DecisionArg {
    Approve,
    Reject,
}

impl From<KindArg> for RestrictionKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Timed => Self::Timed,
            KindArg::Ban => Self::Ban,
        }
    }
}

impl From<FundsKindArg> for FundsKind {
    fn from(arg: FundsKindArg) -> Self {
        match arg {
            FundsKindArg::Deposit => Self::Deposit,
            FundsKindArg::Withdrawal => Self::Withdrawal,
        }
    }
}

impl From<StatusArg> for RequestStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::Approved => Self::Approved,
            StatusArg::Rejected => Self::Rejected,
        }
    }
}

impl From<DecisionArg> for Decision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Approve => Self::Approve,
            DecisionArg::Reject => Self::Reject,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AdminConfig> {
    let file_config = match &cli.config {
        Some(path) => AdminConfig::from_toml_file(path)?,
        None => AdminConfig::default(),
    };

    let mut admins = file_config.admins.clone();
    admins.extend(cli.admins.iter().cloned());
    let config = AdminConfig {
        data_dir: cli.data_dir.clone().unwrap_or(file_config.data_dir.clone()),
        map_size: cli.map_size.unwrap_or(file_config.map_size),
        admins,
        log_format: cli.log_format.unwrap_or(file_config.log_format),
        log_level: cli
            .log_level
            .clone()
            .unwrap_or_else(|| file_config.log_level.clone()),
        ..file_config
    };
    config.validate()?;
    Ok(config)
}

fn account(raw: String) -> anyhow::Result<AccountId> {
    Ok(AccountId::new(raw)?)
}

fn action(command: Command) -> anyhow::Result<Option<Action>> {
    Ok(Some(match command {
        Command::OpenAccount { id, name } => Action::OpenAccount {
            id: account(id)?,
            name,
        },
        Command::Show { id } => Action::Show { id: account(id)? },
        Command::Credit { id, amount } => Action::Credit {
            id: account(id)?,
            amount,
        },
        Command::Restrict { id, kind, days } => Action::Restrict {
            id: account(id)?,
            kind: kind.into(),
            days,
        },
        Command::Lift { id } => Action::Lift { id: account(id)? },
        Command::Requests { kind, status } => Action::Requests {
            kind: kind.map(Into::into),
            status: status.map(Into::into),
        },
        Command::ResolveWithdrawal { id, decision } => Action::ResolveWithdrawal {
            id,
            decision: decision.into(),
        },
        Command::ResolveDeposit { id, decision } => Action::ResolveDeposit {
            id,
            decision: decision.into(),
        },
        Command::Simulate { count } => Action::Simulate { count },
        Command::Audit { id } => Action::Audit { id: account(id)? },
        Command::Check => return Ok(None),
    }))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    duck_utils::init_logging(config.log_format, &config.log_level)?;

    check_data_dir(&config.data_dir).map_err(anyhow::Error::msg)?;
    let env = LmdbEnvironment::open(&config.data_dir, config.map_size)?;
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        admins = config.admins.len(),
        "configuration loaded"
    );

    let acting = cli.acting.map(AccountId::new).transpose()?;
    let outcome = match action(cli.command)? {
        None => commands::check(&env),
        Some(action) => {
            let ledger: AdminLedger =
                CoinLedger::new(env, config.params.clone(), config.admin_policy()?);
            commands::execute(&ledger, acting.as_ref(), action)
        }
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
