//! Everything the dispatcher mutates, in one place.
//!
//! Switching wallets replaces the session and login counter wholesale; no
//! field of the previous session survives.

use crate::config_manager::{ConfigManager, ConfigStore, StoreError};
use crate::login::LoginCounter;
use crate::session::Session;
use serde_json::Value;
use sonic_core::{ConfigPush, WalletConfig};
use std::sync::Arc;

#[derive(Debug)]
pub struct AppContext {
    config: WalletConfig,
    config_manager: Option<ConfigManager>,
    session: Session,
    login_counter: LoginCounter,
}

impl AppContext {
    pub fn new(config: WalletConfig) -> Self {
        Self {
            config,
            config_manager: None,
            session: Session::new(1),
            login_counter: LoginCounter::new(),
        }
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn config_manager(&self) -> Option<&ConfigManager> {
        self.config_manager.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn login_counter(&self) -> &LoginCounter {
        &self.login_counter
    }

    pub fn login_counter_mut(&mut self) -> &mut LoginCounter {
        &mut self.login_counter
    }

    /// Adopt settings pushed by the host.
    pub fn apply_config(&mut self, push: ConfigPush, store: Arc<dyn ConfigStore>) {
        self.config = push.config;
        self.config_manager = Some(ConfigManager::new(push.config_path, store));
    }

    /// Change one setting. Without a manager yet, the change stays in memory.
    pub fn set_config_value(&mut self, key: &str, value: Value) -> Result<bool, StoreError> {
        match &self.config_manager {
            Some(manager) => manager.modify_config(&mut self.config, key, value),
            None => {
                if value.is_null() {
                    return Ok(false);
                }
                tracing::debug!("no config manager yet, {} kept in memory only", key);
                self.config.set(key, value);
                Ok(true)
            }
        }
    }

    /// Replace session and login counter with fresh ones.
    ///
    /// Returns the generation of the new session.
    pub fn start_new_session(&mut self) -> u64 {
        let generation = self.session.generation() + 1;
        let mut previous = std::mem::replace(&mut self.session, Session::reopened(generation));
        previous.supersede();
        self.login_counter = LoginCounter::new();
        tracing::debug!(
            "session {} superseded by {}",
            previous.generation(),
            generation
        );
        generation
    }
}
