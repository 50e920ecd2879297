//! Setting updates made from the renderer.
//!
//! The in-memory [`WalletConfig`] stays the source of truth; the manager
//! applies a change to it and hands the whole mapping to a [`ConfigStore`].

use serde_json::Value;
use sonic_core::WalletConfig;
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to persist settings under {path}: {reason}")]
    Persist { path: String, reason: String },
}

/// Where settings are written after each change.
pub trait ConfigStore: Send + Sync {
    fn persist(&self, config_path: &str, config: &WalletConfig) -> Result<(), StoreError>;
}

/// Keeps the most recent write in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    last: Arc<Mutex<Option<(String, WalletConfig)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last persisted `(config_path, config)`, if any.
    pub fn last_write(&self) -> Option<(String, WalletConfig)> {
        self.last.lock().ok().and_then(|last| last.clone())
    }
}

impl ConfigStore for MemoryStore {
    fn persist(&self, config_path: &str, config: &WalletConfig) -> Result<(), StoreError> {
        let mut last = self.last.lock().map_err(|e| StoreError::Persist {
            path: config_path.to_string(),
            reason: e.to_string(),
        })?;
        *last = Some((config_path.to_string(), config.clone()));
        Ok(())
    }
}

pub struct ConfigManager {
    config_path: String,
    store: Arc<dyn ConfigStore>,
}

impl ConfigManager {
    pub fn new(config_path: impl Into<String>, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            config_path: config_path.into(),
            store,
        }
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    pub fn set_config_path(&mut self, path: impl Into<String>) {
        self.config_path = path.into();
    }

    /// Set `key` in `config` and persist. A `null` value is ignored.
    ///
    /// Returns whether anything changed.
    pub fn modify_config(
        &self,
        config: &mut WalletConfig,
        key: &str,
        value: Value,
    ) -> Result<bool, StoreError> {
        if value.is_null() {
            tracing::debug!("{} has no value, not updating", key);
            return Ok(false);
        }
        tracing::debug!("config update: {} set to {}", key, value);
        config.set(key, value);
        self.store.persist(&self.config_path, config)?;
        Ok(true)
    }
}

impl std::fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("config_path", &self.config_path)
            .finish_non_exhaustive()
    }
}
