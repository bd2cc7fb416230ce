//! Console configuration with TOML file support.

use std::path::Path;
use std::time::Duration;

use licverify_chain::DEFAULT_CONTRACT_ADDRESS;
use licverify_types::AccountAddress;
use licverify_utils::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("invalid contract address: {0}")]
    ContractAddress(String),
}

/// Configuration for the console.
///
/// Every field has a default, so an empty file is valid. CLI flags and
/// `LICVERIFY_*` environment variables override file values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the verification backend.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Per-request timeout for backend calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// JSON-RPC endpoint of the wallet. No wallet when unset.
    #[serde(default)]
    pub wallet_rpc_url: Option<String>,

    /// Hex private key to sign with locally instead of letting the wallet sign.
    #[serde(default, skip_serializing)]
    pub wallet_private_key: Option<String>,

    /// Address of the verification contract.
    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_backend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_contract_address() -> String {
    DEFAULT_CONTRACT_ADDRESS.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ConsoleConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize to TOML. The private key is never written out.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn contract(&self) -> Result<AccountAddress, ConfigError> {
        self.contract_address
            .parse()
            .map_err(|_| ConfigError::ContractAddress(self.contract_address.clone()))
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_secs: default_request_timeout_secs(),
            wallet_rpc_url: None,
            wallet_private_key: None,
            contract_address: default_contract_address(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
