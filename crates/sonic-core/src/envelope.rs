//! Envelope and framing.
//!
//! An envelope is the unit every process exchanges: a `messageType` tag and
//! an opaque `data` payload. A frame pins an envelope to a channel so the
//! host knows which way it travels.

use crate::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ messageType, data }`.
///
/// The receiver interprets `data` solely by `message_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub message_type: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn new(message_type: impl Into<String>, data: Value) -> Self {
        Self {
            message_type: message_type.into(),
            data,
        }
    }

    /// An envelope with a `null` payload.
    pub fn bare(message_type: impl Into<String>) -> Self {
        Self::new(message_type, Value::Null)
    }
}

/// The named channel a frame travels on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    /// Backend message relayed to the renderer.
    FromBackend,
    /// Renderer request relayed to the backend.
    FromFrontend,
    /// Message originated by the host.
    FromMain,
    /// Control message addressed to the host.
    ToMain,
}

impl Channel {
    /// The role expected to originate frames on this channel, if fixed.
    pub fn origin(&self) -> Option<Role> {
        match self {
            Channel::FromBackend => Some(Role::Backend),
            Channel::FromFrontend => Some(Role::Frontend),
            Channel::FromMain => Some(Role::Main),
            Channel::ToMain => None,
        }
    }
}

/// An envelope on a channel, as written on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub channel: Channel,
    #[serde(flatten)]
    pub envelope: Envelope,
}

impl Frame {
    pub fn new(channel: Channel, envelope: Envelope) -> Self {
        Self { channel, envelope }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// First message on every connection to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Handshake {
    Hello { role: Role },
}
