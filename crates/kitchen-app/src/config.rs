//! Application configuration
//!
//! Loaded from an optional TOML file, then overridden by `KITCHEN__*`
//! environment variables (`KITCHEN__SYNC__INDEX_WRITE=conditional`).

use kitchen_ledger::LOCAL_CONTRACT_ADDRESS;
use kitchen_orders::{RevealConfig, SyncConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "KITCHEN";

/// Complete client configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ledger: LedgerSettings,

    #[serde(default)]
    pub wallet: WalletSettings,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub reveal: RevealConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from `path` (if given and present) plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_from(path, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn load_from(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        builder.add_source(environment).build()?.try_deserialize()
    }
}

/// Contract ledger settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Snapshot file for the local ledger
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    #[serde(default = "default_contract_address")]
    pub contract_address: String,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("kitchen-ledger.json")
}

fn default_chain_id() -> u64 {
    31337
}

fn default_contract_address() -> String {
    LOCAL_CONTRACT_ADDRESS.to_string()
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            chain_id: default_chain_id(),
            contract_address: default_contract_address(),
        }
    }
}

/// Local wallet settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSettings {
    /// Hex seed file written by `kitchen keygen`
    #[serde(default = "default_key_path")]
    pub key_path: PathBuf,
}

fn default_key_path() -> PathBuf {
    PathBuf::from("kitchen-wallet.key")
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            key_path: default_key_path(),
        }
    }
}

/// Toast and animation timings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_success_dismiss_ms")]
    pub success_dismiss_ms: u64,

    #[serde(default = "default_error_dismiss_ms")]
    pub error_dismiss_ms: u64,

    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
}

fn default_success_dismiss_ms() -> u64 {
    2000
}

fn default_error_dismiss_ms() -> u64 {
    3000
}

fn default_animation_ms() -> u64 {
    1000
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            success_dismiss_ms: default_success_dismiss_ms(),
            error_dismiss_ms: default_error_dismiss_ms(),
            animation_ms: default_animation_ms(),
        }
    }
}

impl UiConfig {
    pub fn success_dismiss(&self) -> Duration {
        Duration::from_millis(self.success_dismiss_ms)
    }

    pub fn error_dismiss(&self) -> Duration {
        Duration::from_millis(self.error_dismiss_ms)
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }
}

/// Logging configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of text
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
