//! Bidirectional forwarding between the two peers.
//!
//! The relay wraps whatever it receives into an envelope and hands it to the
//! other side. It never looks inside `data`.

use serde_json::Value;
use sonic_core::{Channel, CodecError, Envelope, Frame, Message, Role};
use tokio::sync::mpsc;

/// Somewhere frames can be delivered.
pub trait Endpoint {
    /// Hand over a frame. Returns `false` when the peer is gone.
    fn deliver(&self, frame: Frame) -> bool;
}

impl Endpoint for mpsc::UnboundedSender<Frame> {
    fn deliver(&self, frame: Frame) -> bool {
        self.send(frame).is_ok()
    }
}

pub struct MessageRelay<E> {
    frontend: E,
    backend: E,
}

impl<E: Endpoint> MessageRelay<E> {
    pub fn new(frontend: E, backend: E) -> Self {
        Self { frontend, backend }
    }

    /// Forward a backend message to the renderer.
    pub fn on_from_backend(&self, message_type: impl Into<String>, data: Value) {
        self.forward(Role::Frontend, Channel::FromBackend, Envelope::new(message_type, data));
    }

    /// Forward a renderer request to the backend.
    pub fn on_from_frontend(&self, message_type: impl Into<String>, data: Value) {
        self.forward(Role::Backend, Channel::FromFrontend, Envelope::new(message_type, data));
    }

    pub fn send_to_backend(&self, message_type: impl Into<String>, data: Value) {
        self.forward(Role::Backend, Channel::FromMain, Envelope::new(message_type, data));
    }

    pub fn send_to_frontend(&self, message_type: impl Into<String>, data: Value) {
        self.forward(Role::Frontend, Channel::FromMain, Envelope::new(message_type, data));
    }

    /// Typed form of [`send_to_backend`](Self::send_to_backend).
    pub fn send_message_to_backend<M: Message>(&self, message: &M) -> Result<(), CodecError> {
        let envelope = message.to_envelope()?;
        self.forward(Role::Backend, Channel::FromMain, envelope);
        Ok(())
    }

    /// Typed form of [`send_to_frontend`](Self::send_to_frontend).
    pub fn send_message_to_frontend<M: Message>(&self, message: &M) -> Result<(), CodecError> {
        let envelope = message.to_envelope()?;
        self.forward(Role::Frontend, Channel::FromMain, envelope);
        Ok(())
    }

    fn forward(&self, to: Role, channel: Channel, envelope: Envelope) {
        let endpoint = match to {
            Role::Backend => &self.backend,
            _ => &self.frontend,
        };
        let message_type = envelope.message_type.clone();
        if !endpoint.deliver(Frame::new(channel, envelope)) {
            tracing::debug!("{} gone, dropped `{}` on {:?}", to, message_type, channel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn relay() -> (
        MessageRelay<mpsc::UnboundedSender<Frame>>,
        mpsc::UnboundedReceiver<Frame>,
        mpsc::UnboundedReceiver<Frame>,
    ) {
        let (front_tx, front_rx) = mpsc::unbounded_channel();
        let (back_tx, back_rx) = mpsc::unbounded_channel();
        (MessageRelay::new(front_tx, back_tx), front_rx, back_rx)
    }

    #[test]
    fn backend_message_reaches_frontend_unchanged() {
        let (relay, mut front, mut back) = relay();
        let data = json!({"nested": [1, 2.5, "x", null], "big": 18446744073709551615u64});
        relay.on_from_backend("transactionList", data.clone());

        let frame = front.try_recv().unwrap();
        assert_eq!(frame.channel, Channel::FromBackend);
        assert_eq!(frame.envelope.message_type, "transactionList");
        assert_eq!(frame.envelope.data, data);
        assert!(back.try_recv().is_err());
    }

    #[test]
    fn frontend_message_reaches_backend() {
        let (relay, mut front, mut back) = relay();
        relay.on_from_frontend("transactionRequest", json!(50));

        let frame = back.try_recv().unwrap();
        assert_eq!(frame.channel, Channel::FromFrontend);
        assert_eq!(frame.envelope, Envelope::new("transactionRequest", json!(50)));
        assert!(front.try_recv().is_err());
    }

    #[test]
    fn order_is_preserved_per_direction() {
        let (relay, mut front, _back) = relay();
        for n in 0..20u64 {
            relay.on_from_backend("transactionCount", json!(n));
        }
        for n in 0..20u64 {
            assert_eq!(front.try_recv().unwrap().envelope.data, json!(n));
        }
    }

    #[test]
    fn host_messages_use_from_main() {
        let (relay, mut front, mut back) = relay();
        relay.send_to_backend("stopRequest", Value::Null);
        relay.send_to_frontend("config", json!({"config": {}}));
        assert_eq!(back.try_recv().unwrap().channel, Channel::FromMain);
        assert_eq!(front.try_recv().unwrap().channel, Channel::FromMain);
    }

    #[test]
    fn closed_peer_is_a_no_op() {
        let (relay, front, mut back) = relay();
        drop(front);
        relay.on_from_backend("balance", json!([1, 0]));
        relay.on_from_frontend("transactionRequest", json!(1));
        assert!(back.try_recv().is_ok());
    }
}
