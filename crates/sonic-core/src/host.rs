//! Messages to and from the host process.
//!
//! The host speaks on two channels: `fromMain` for messages it originates
//! and `toMain` for control messages peers address to it.

use crate::message::{envelope, payload};
use crate::{CodecError, Envelope, Message, WalletConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Initial settings pushed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPush {
    pub config: WalletConfig,
    /// Directory the settings are persisted under.
    #[serde(default)]
    pub config_path: String,
}

/// `fromMain` messages as the renderer sees them.
#[derive(Debug, Clone, PartialEq)]
pub enum HostNotice {
    Config(ConfigPush),
    Unknown { message_type: String, data: Value },
}

impl HostNotice {
    pub const CONFIG: &'static str = "config";
}

impl Message for HostNotice {
    fn message_type(&self) -> &str {
        match self {
            HostNotice::Config(_) => Self::CONFIG,
            HostNotice::Unknown { message_type, .. } => message_type,
        }
    }

    fn to_envelope(&self) -> Result<Envelope, CodecError> {
        match self {
            HostNotice::Config(push) => envelope(Self::CONFIG, push),
            HostNotice::Unknown { message_type, data } => {
                Ok(Envelope::new(message_type.clone(), data.clone()))
            }
        }
    }

    fn decode(envelope: Envelope) -> Result<Self, CodecError> {
        let Envelope { message_type, data } = envelope;
        match message_type.as_str() {
            Self::CONFIG => Ok(HostNotice::Config(payload(Self::CONFIG, data)?)),
            _ => Ok(HostNotice::Unknown { message_type, data }),
        }
    }
}

/// `fromMain` messages as the backend sees them.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Config(WalletConfig),
    /// Stop the wallet and answer with `backendStopped`.
    StopRequest,
    Unknown { message_type: String, data: Value },
}

impl HostCommand {
    pub const CONFIG: &'static str = "config";
    pub const STOP_REQUEST: &'static str = "stopRequest";
}

impl Message for HostCommand {
    fn message_type(&self) -> &str {
        match self {
            HostCommand::Config(_) => Self::CONFIG,
            HostCommand::StopRequest => Self::STOP_REQUEST,
            HostCommand::Unknown { message_type, .. } => message_type,
        }
    }

    fn to_envelope(&self) -> Result<Envelope, CodecError> {
        match self {
            HostCommand::Config(config) => envelope(Self::CONFIG, config),
            HostCommand::StopRequest => Ok(Envelope::bare(Self::STOP_REQUEST)),
            HostCommand::Unknown { message_type, data } => {
                Ok(Envelope::new(message_type.clone(), data.clone()))
            }
        }
    }

    fn decode(envelope: Envelope) -> Result<Self, CodecError> {
        let Envelope { message_type, data } = envelope;
        match message_type.as_str() {
            Self::CONFIG => Ok(HostCommand::Config(payload(Self::CONFIG, data)?)),
            Self::STOP_REQUEST => Ok(HostCommand::StopRequest),
            _ => Ok(HostCommand::Unknown { message_type, data }),
        }
    }
}

/// `toMain` control messages.
#[derive(Debug, Clone, PartialEq)]
pub enum HostControl {
    /// The renderer applied its config and can be shown.
    FrontReady,
    /// The backend finished stopping.
    BackendStopped,
    CloseToTrayToggle(bool),
    /// The main window was asked to close.
    WindowClose,
    /// Quit regardless of close-to-tray.
    Quit,
    Unknown { message_type: String, data: Value },
}

impl HostControl {
    pub const FRONT_READY: &'static str = "frontReady";
    pub const BACKEND_STOPPED: &'static str = "backendStopped";
    pub const CLOSE_TO_TRAY_TOGGLE: &'static str = "closeToTrayToggle";
    pub const WINDOW_CLOSE: &'static str = "windowClose";
    pub const QUIT: &'static str = "quit";
}

impl Message for HostControl {
    fn message_type(&self) -> &str {
        match self {
            HostControl::FrontReady => Self::FRONT_READY,
            HostControl::BackendStopped => Self::BACKEND_STOPPED,
            HostControl::CloseToTrayToggle(_) => Self::CLOSE_TO_TRAY_TOGGLE,
            HostControl::WindowClose => Self::WINDOW_CLOSE,
            HostControl::Quit => Self::QUIT,
            HostControl::Unknown { message_type, .. } => message_type,
        }
    }

    fn to_envelope(&self) -> Result<Envelope, CodecError> {
        let tag = self.message_type();
        match self {
            HostControl::CloseToTrayToggle(state) => envelope(tag, state),
            HostControl::Unknown { message_type, data } => {
                Ok(Envelope::new(message_type.clone(), data.clone()))
            }
            _ => Ok(Envelope::bare(tag)),
        }
    }

    fn decode(envelope: Envelope) -> Result<Self, CodecError> {
        let Envelope { message_type, data } = envelope;
        let tag = message_type.as_str();
        let control = match tag {
            Self::FRONT_READY => HostControl::FrontReady,
            Self::BACKEND_STOPPED => HostControl::BackendStopped,
            Self::CLOSE_TO_TRAY_TOGGLE => HostControl::CloseToTrayToggle(payload(tag, data)?),
            Self::WINDOW_CLOSE => HostControl::WindowClose,
            Self::QUIT => HostControl::Quit,
            _ => HostControl::Unknown { message_type, data },
        };
        Ok(control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_push_reads_nested_config() {
        let notice = HostNotice::decode(Envelope::new(
            "config",
            json!({"config": {"darkMode": true, "walletFile": "/a.wallet"}, "configPath": "/x"}),
        ))
        .unwrap();
        let HostNotice::Config(push) = notice else {
            panic!("expected config");
        };
        assert_eq!(push.config_path, "/x");
        assert_eq!(push.config.wallet_file(), Some("/a.wallet"));
    }

    #[test]
    fn config_push_without_config_is_malformed() {
        let err = HostNotice::decode(Envelope::new("config", json!({"configPath": "/x"})))
            .unwrap_err();
        assert!(matches!(err, CodecError::Payload { .. }));

        let err = HostNotice::decode(Envelope::new("config", json!({"config": null})))
            .unwrap_err();
        assert_eq!(err.message_type(), "config");
    }

    #[test]
    fn backend_receives_bare_mapping() {
        let command = HostCommand::decode(Envelope::new("config", json!({"darkMode": false})))
            .unwrap();
        assert!(matches!(command, HostCommand::Config(c) if !c.dark_mode()));
        assert_eq!(
            HostCommand::StopRequest.to_envelope().unwrap(),
            Envelope::bare("stopRequest")
        );
    }

    #[test]
    fn close_to_tray_toggle_carries_state() {
        let control =
            HostControl::decode(Envelope::new("closeToTrayToggle", json!(true))).unwrap();
        assert_eq!(control, HostControl::CloseToTrayToggle(true));
        assert!(matches!(
            HostControl::decode(Envelope::bare("resizeWindow")).unwrap(),
            HostControl::Unknown { .. }
        ));
    }
}
