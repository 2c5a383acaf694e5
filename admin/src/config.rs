//! Back-office configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use duck_ledger::AdminPolicy;
use duck_store_lmdb::environment::DEFAULT_MAP_SIZE;
use duck_types::LedgerParams;
use duck_utils::LogFormat;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("config error: {0}")]
    Config(String),

    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Identities allowed to run administrator operations.
    #[serde(default)]
    pub admins: Vec<String>,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Economic parameters; a partial table overrides only what it names.
    #[serde(default)]
    pub params: LedgerParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./duck_data")
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl AdminConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, AdminError> {
        let content = std::fs::read_to_string(path).map_err(|source| AdminError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, AdminError> {
        let config: Self = toml::from_str(s).map_err(|e| AdminError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, AdminError> {
        toml::to_string_pretty(self).map_err(|e| AdminError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), AdminError> {
        self.params
            .validate()
            .map_err(|e| AdminError::Config(e.to_string()))?;
        self.admin_policy()?;
        Ok(())
    }

    pub fn admin_policy(&self) -> Result<AdminPolicy, AdminError> {
        AdminPolicy::from_ids(self.admins.iter().cloned())
            .map_err(|e| AdminError::Config(format!("admins: {e}")))
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            admins: Vec::new(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            params: LedgerParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duck_types::{AccountId, CoinAmount, Gift};

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = AdminConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = AdminConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.map_size, config.map_size);
        assert_eq!(parsed.params, config.params);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = AdminConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.data_dir, PathBuf::from("./duck_data"));
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.params.verification_cost, CoinAmount::coins(500));
        assert!(config.admins.is_empty());
    }

    #[test]
    fn partial_params_override() {
        let toml = r#"
            admins = ["root"]
            log_format = "json"

            [params]
            min_withdrawal = "250"
            referred_viewer_reward = "0.2"

            [params.gift_prices]
            rose = "7"
        "#;
        let config = AdminConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.params.min_withdrawal, CoinAmount::coins(250));
        assert_eq!(config.params.referred_viewer_reward, CoinAmount::cents(20));
        assert_eq!(config.params.solo_reward, CoinAmount::cents(25));
        assert_eq!(config.params.gift_price(Gift::Rose), CoinAmount::coins(7));
        let policy = config.admin_policy().unwrap();
        assert!(policy.is_privileged(&AccountId::new("root").unwrap()));
    }

    #[test]
    fn unknown_gift_is_rejected() {
        let toml = r#"
            [params.gift_prices]
            unicorn = "3"
        "#;
        assert!(matches!(
            AdminConfig::from_toml_str(toml),
            Err(AdminError::Config(_))
        ));
    }

    #[test]
    fn missing_file_returns_io_error() {
        let result = AdminConfig::from_toml_file(Path::new("/nonexistent/duck.toml"));
        assert!(matches!(result, Err(AdminError::Io { .. })));
    }
}
