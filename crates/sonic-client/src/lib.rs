//! Peer-side connection to the host.
//!
//! A peer connects over WebSocket, says hello with its role, and then
//! exchanges JSON frames. The connection is split into an outbox (frames to
//! send) and an inbox (frames received); both are plain tokio channels so
//! callers stay transport-agnostic.

use futures_util::{SinkExt, StreamExt};
use sonic_core::{Channel, CodecError, Frame, Handshake, Message, Role};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// Error establishing or using a connection.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("connection closed")]
    Closed,
}

/// An open connection to the host.
pub struct Connection {
    role: Role,
    outbox: mpsc::UnboundedSender<Frame>,
    inbox: mpsc::UnboundedReceiver<Frame>,
}

impl Connection {
    pub fn role(&self) -> Role {
        self.role
    }

    /// Queue a typed message on `channel`.
    pub fn send<M: Message>(&self, channel: Channel, message: &M) -> Result<(), ClientError> {
        let frame = Frame::new(channel, message.to_envelope()?);
        self.outbox.send(frame).map_err(|_| ClientError::Closed)
    }

    /// Next frame from the host, or `None` once the connection is gone.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.inbox.recv().await
    }

    /// A cloneable handle for sending from other tasks.
    pub fn outbox(&self) -> mpsc::UnboundedSender<Frame> {
        self.outbox.clone()
    }

    /// Split into the raw channel halves.
    pub fn into_parts(self) -> (mpsc::UnboundedSender<Frame>, mpsc::UnboundedReceiver<Frame>) {
        (self.outbox, self.inbox)
    }
}

/// Connect to the host at `url` and introduce ourselves as `role`.
pub async fn connect(url: &str, role: Role) -> Result<Connection, ClientError> {
    let (ws, _) = tokio_tungstenite::connect_async(url).await?;
    let (mut sink, mut stream) = ws.split();

    let hello = serde_json::to_string(&Handshake::Hello { role })?;
    sink.send(WsMessage::Text(hello.into())).await?;
    tracing::debug!("connected to {} as {}", url, role);

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Frame>();
    let (in_tx, in_rx) = mpsc::unbounded_channel::<Frame>();

    tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            let text = match frame.to_json() {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("dropping unencodable frame: {}", e);
                    continue;
                }
            };
            if let Err(e) = sink.send(WsMessage::Text(text.into())).await {
                tracing::debug!("send failed, host gone: {}", e);
                break;
            }
        }
    });

    tokio::spawn(async move {
        while let Some(msg) = stream.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("websocket error: {}", e);
                    break;
                }
            };
            match msg {
                WsMessage::Text(text) => match Frame::from_json(&text) {
                    Ok(frame) => {
                        if in_tx.send(frame).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!("invalid frame from host: {}", e),
                },
                WsMessage::Close(_) => break,
                _ => {}
            }
        }
        tracing::debug!("host connection closed");
    });

    Ok(Connection {
        role,
        outbox: out_tx,
        inbox: in_rx,
    })
}
