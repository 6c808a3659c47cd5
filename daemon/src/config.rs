//! Daemon configuration with TOML file support.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use blackhole_token::TokenInfo;
use blackhole_types::ChainId;
use blackhole_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no account named `{0}`")]
    UnknownAccount(String),
}

/// A named account whose key is derived from its name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub name: String,
    /// Native balance at startup, in whole coins.
    #[serde(default)]
    pub native_balance: u64,
}

/// Configuration for the `blackhole` binary.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`]; every field
/// has a default so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: ChainId,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Account that deploys the ledger and the factory.
    #[serde(default = "default_deployer")]
    pub deployer: String,

    #[serde(default = "default_token")]
    pub token: TokenInfo,

    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountConfig>,
}

fn default_chain_id() -> ChainId {
    ChainId::DEV
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_deployer() -> String {
    "deployer".to_string()
}

fn default_token() -> TokenInfo {
    TokenInfo::new("Blackhole", "BLACK")
}

fn default_accounts() -> Vec<AccountConfig> {
    vec![
        AccountConfig {
            name: "deployer".to_string(),
            native_balance: 10,
        },
        AccountConfig {
            name: "alice".to_string(),
            native_balance: 10,
        },
        AccountConfig {
            name: "bob".to_string(),
            native_balance: 0,
        },
    ]
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn account(&self, name: &str) -> Result<&AccountConfig, ConfigError> {
        self.accounts
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| ConfigError::UnknownAccount(name.to_string()))
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            deployer: default_deployer(),
            token: default_token(),
            accounts: default_accounts(),
        }
    }
}
