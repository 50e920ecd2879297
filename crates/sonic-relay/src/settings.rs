//! Host settings.
//!
//! Read from an optional TOML file, then overridden by command-line flags.
//!
//! ```toml
//! listen = "127.0.0.1:45300"
//! shutdown_timeout_secs = 10
//! config_path = "/home/nova/.bitcoinnovasonicwallet"
//!
//! [wallet]
//! darkMode = true
//! walletFile = "/home/nova/main.wallet"
//! ```

use crate::host::DEFAULT_SHUTDOWN_TIMEOUT;
use serde::Deserialize;
use sonic_core::WalletConfig;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LISTEN: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), 45300);

/// Name of the per-user program directory under the home directory.
const PROGRAM_DIR: &str = ".bitcoinnovasonicwallet";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("[wallet] table cannot be represented as JSON: {0}")]
    Wallet(#[from] serde_json::Error),
}

/// Shape of the TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    listen: Option<SocketAddr>,
    shutdown_timeout_secs: Option<u64>,
    config_path: Option<String>,
    wallet: Option<toml::Table>,
}

/// Values given on the command line; they win over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub listen: Option<SocketAddr>,
    pub shutdown_timeout_secs: Option<u64>,
    pub config_path: Option<String>,
    pub wallet_file: Option<String>,
}

/// Resolved host settings.
#[derive(Debug, Clone)]
pub struct HostSettings {
    pub listen: SocketAddr,
    pub shutdown_timeout: Duration,
    pub config_path: String,
    pub wallet: WalletConfig,
}

impl HostSettings {
    /// Load from `file` (if given) and apply `overrides`.
    pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self, SettingsError> {
        let text = match file {
            Some(path) => std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?,
            None => String::new(),
        };
        Self::from_toml_str(&text, overrides)
    }

    pub fn from_toml_str(text: &str, overrides: Overrides) -> Result<Self, SettingsError> {
        let file: SettingsFile = toml::from_str(text)?;

        let user_wallet = match file.wallet {
            Some(table) => WalletConfig::from_value(serde_json::to_value(table)?).unwrap_or_default(),
            None => WalletConfig::default(),
        };
        let mut wallet = user_wallet.merged_over_defaults();
        if let Some(path) = overrides.wallet_file {
            wallet.set("walletFile", serde_json::Value::String(path));
        }

        let shutdown_timeout = overrides
            .shutdown_timeout_secs
            .or(file.shutdown_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT);

        Ok(Self {
            listen: overrides.listen.or(file.listen).unwrap_or(DEFAULT_LISTEN),
            shutdown_timeout,
            config_path: overrides
                .config_path
                .or(file.config_path)
                .unwrap_or_else(default_config_path),
            wallet,
        })
    }
}

/// `~/.bitcoinnovasonicwallet`, or a relative directory if there is no home.
pub fn default_config_path() -> String {
    dirs::home_dir()
        .map(|home| home.join(PROGRAM_DIR))
        .unwrap_or_else(|| PathBuf::from(PROGRAM_DIR))
        .to_string_lossy()
        .into_owned()
}
