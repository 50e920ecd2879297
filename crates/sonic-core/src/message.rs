//! Typed views over envelopes.
//!
//! Each channel has its own vocabulary. Applications decode an envelope into
//! the enum for the channel it arrived on; tags outside the vocabulary land
//! in an explicit `Unknown` variant instead of failing.

use crate::Envelope;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A closed vocabulary of envelopes with an open `Unknown` escape hatch.
pub trait Message: Sized {
    /// The `messageType` tag this value travels under.
    fn message_type(&self) -> &str;

    /// Build the envelope for this message.
    fn to_envelope(&self) -> Result<Envelope, CodecError>;

    /// Interpret an envelope. Unknown tags decode successfully; a known tag
    /// with a payload of the wrong shape is an error.
    fn decode(envelope: Envelope) -> Result<Self, CodecError>;
}

/// Error converting between envelopes and typed messages.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed `{message_type}` payload: {source}")]
    Payload {
        message_type: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode `{message_type}` payload: {source}")]
    Encode {
        message_type: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CodecError {
    pub fn message_type(&self) -> &str {
        match self {
            CodecError::Payload { message_type, .. } | CodecError::Encode { message_type, .. } => {
                message_type
            }
        }
    }
}

/// Deserialize `data` as the payload of `message_type`.
pub(crate) fn payload<T: DeserializeOwned>(message_type: &str, data: Value) -> Result<T, CodecError> {
    serde_json::from_value(data).map_err(|source| CodecError::Payload {
        message_type: message_type.to_string(),
        source,
    })
}

/// Wrap a serializable payload into an envelope.
pub(crate) fn envelope<T: Serialize + ?Sized>(
    message_type: &str,
    data: &T,
) -> Result<Envelope, CodecError> {
    let data = serde_json::to_value(data).map_err(|source| CodecError::Encode {
        message_type: message_type.to_string(),
        source,
    })?;
    Ok(Envelope::new(message_type, data))
}
