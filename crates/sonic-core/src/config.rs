//! The wallet settings mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Named settings shared by every process.
///
/// Schema-free: unknown keys are carried untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletConfig(Map<String, Value>);

impl WalletConfig {
    /// The built-in settings used when the user has none.
    pub fn defaults() -> Self {
        let value = json!({
            "darkMode": false,
            "walletFile": "",
            "closeToTray": false,
            "displayCurrency": "BTN",
            "selectedFiat": "usd",
            "fiatSymbol": "$",
            "symbolLocation": "prefix",
            "fiatDecimals": 2,
            "logLevel": "DEBUG",
            "scanCoinbaseTransactions": true,
            "autoOptimize": true,
            "daemonHost": "127.0.0.1",
            "daemonPort": 45223
        });
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Wrap a JSON value, rejecting anything that is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Lay these settings over the defaults. Keys set here win.
    pub fn merged_over_defaults(self) -> Self {
        let mut merged = Self::defaults();
        merged.0.extend(self.0);
        merged
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn dark_mode(&self) -> bool {
        self.get_bool("darkMode")
    }

    pub fn close_to_tray(&self) -> bool {
        self.get_bool("closeToTray")
    }

    /// Path of the wallet file to open; `None` when unset or empty.
    pub fn wallet_file(&self) -> Option<&str> {
        self.get("walletFile")
            .and_then(Value::as_str)
            .filter(|path| !path.is_empty())
    }

    pub fn display_currency(&self) -> &str {
        self.get("displayCurrency")
            .and_then(Value::as_str)
            .unwrap_or("BTN")
    }

    fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

impl From<Map<String, Value>> for WalletConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_keys_override_defaults() {
        let user = WalletConfig::from_value(json!({"darkMode": true, "custom": 7})).unwrap();
        let merged = user.merged_over_defaults();
        assert!(merged.dark_mode());
        assert_eq!(merged.get("custom"), Some(&json!(7)));
        assert_eq!(merged.display_currency(), "BTN");
        assert!(!merged.close_to_tray());
    }

    #[test]
    fn empty_wallet_file_is_unset() {
        assert_eq!(WalletConfig::defaults().wallet_file(), None);
        let config = WalletConfig::from_value(json!({"walletFile": "/a.wallet"})).unwrap();
        assert_eq!(config.wallet_file(), Some("/a.wallet"));
    }

    #[test]
    fn only_objects_are_configs() {
        assert!(WalletConfig::from_value(json!([1, 2])).is_none());
        assert!(serde_json::from_value::<WalletConfig>(Value::Null).is_err());
    }
}
