//! WebSocket transport between peers and the host loop.
//!
//! Each accepted connection says hello, gets an outbox registered with the
//! host, and then pumps frames both ways until either side closes.

use crate::host::HostEvent;
use futures_util::{SinkExt, StreamExt};
use sonic_core::{Frame, Handshake, Role};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Error on a single peer connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("invalid hello: {0}")]
    Hello(#[from] serde_json::Error),
    #[error("role {0} cannot be claimed by a peer")]
    Role(Role),
    #[error("connection closed before hello")]
    Closed,
    #[error("host loop has stopped")]
    HostGone,
}

/// Accept peers forever, forwarding their traffic to the host loop.
pub async fn serve(
    listener: TcpListener,
    events: mpsc::UnboundedSender<HostEvent>,
) -> Result<(), TransportError> {
    tracing::info!("listening on ws://{}", listener.local_addr()?);

    let mut next_conn = 0u64;
    loop {
        let (stream, addr) = listener.accept().await?;
        let events = events.clone();
        next_conn += 1;
        let conn = next_conn;

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, addr, conn, events).await {
                tracing::warn!("connection error from {}: {}", addr, e);
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    conn: u64,
    events: mpsc::UnboundedSender<HostEvent>,
) -> Result<(), TransportError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut sink, mut stream) = ws.split();

    tracing::debug!("new connection from {}", addr);

    // Wait for hello
    let role = loop {
        let msg = stream.next().await.ok_or(TransportError::Closed)??;
        if let Message::Text(text) = msg {
            let Handshake::Hello { role } = serde_json::from_str(&text)?;
            break role;
        }
    };
    if !role.is_peer() {
        return Err(TransportError::Role(role));
    }

    let (outbox, mut outbox_rx) = mpsc::unbounded_channel::<Frame>();
    events
        .send(HostEvent::Connected { role, conn, outbox })
        .map_err(|_| TransportError::HostGone)?;

    loop {
        tokio::select! {
            msg = stream.next() => {
                let msg = match msg {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::debug!("websocket error from {}: {}", role, e);
                        break;
                    }
                    None => break,
                };

                match msg {
                    Message::Text(text) => {
                        let frame = match Frame::from_json(&text) {
                            Ok(frame) => frame,
                            Err(e) => {
                                tracing::warn!("invalid frame from {}: {}", role, e);
                                continue;
                            }
                        };
                        if events.send(HostEvent::Frame { role, frame }).is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }

            frame = outbox_rx.recv() => {
                // Host dropped our outbox: the peer was replaced or the relay stopped.
                let Some(frame) = frame else { break };
                match frame.to_json() {
                    Ok(text) => {
                        if let Err(e) = sink.send(Message::Text(text.into())).await {
                            tracing::debug!("send to {} failed: {}", role, e);
                            break;
                        }
                    }
                    Err(e) => tracing::warn!("dropping unencodable frame for {}: {}", role, e),
                }
            }
        }
    }

    let _ = events.send(HostEvent::Disconnected { role, conn });
    tracing::debug!("connection closed: {} ({})", role, addr);
    Ok(())
}
