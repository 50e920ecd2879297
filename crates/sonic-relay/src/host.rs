//! Host lifecycle.
//!
//! The host waits for both peers, builds the relay, pushes the initial
//! config, and runs the shutdown handshake. Every event goes through one
//! loop so peer bookkeeping needs no locks.

use crate::relay::{Endpoint, MessageRelay};
use sonic_core::{
    Channel, ConfigPush, Frame, HostCommand, HostControl, HostNotice, Message, PeerState, Role,
    WalletConfig,
};
use std::future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long the backend gets to stop before the host exits anyway.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

type Outbox = mpsc::UnboundedSender<Frame>;

/// Something the host loop reacts to.
#[derive(Debug)]
pub enum HostEvent {
    /// A peer finished its hello. `conn` identifies the connection.
    Connected {
        role: Role,
        conn: u64,
        outbox: Outbox,
    },
    /// A frame arrived from a peer.
    Frame { role: Role, frame: Frame },
    Disconnected { role: Role, conn: u64 },
    /// Interrupt from the operating system.
    ShutdownSignal,
}

/// Why the host loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The backend confirmed it stopped.
    BackendStopped,
    /// The backend did not confirm in time.
    TimedOut,
    /// Every event source went away.
    EventsClosed,
}

#[derive(Debug, Default)]
struct Peer {
    state: PeerState,
    conn: Option<u64>,
    outbox: Option<Outbox>,
}

impl Peer {
    fn is_ready(&self) -> bool {
        self.state == PeerState::Ready
    }
}

pub struct Host {
    config: WalletConfig,
    config_path: String,
    close_to_tray: bool,
    shutdown_timeout: Duration,
    frontend: Peer,
    backend: Peer,
    relay: Option<MessageRelay<Outbox>>,
    sent_close_message: bool,
    quit_deadline: Option<Instant>,
    window_visible: bool,
}

impl Host {
    pub fn new(config: WalletConfig, config_path: impl Into<String>) -> Self {
        let close_to_tray = config.close_to_tray();
        Self {
            config,
            config_path: config_path.into(),
            close_to_tray,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            frontend: Peer::default(),
            backend: Peer::default(),
            relay: None,
            sent_close_message: false,
            quit_deadline: None,
            window_visible: false,
        }
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn peer_state(&self, role: Role) -> PeerState {
        match role {
            Role::Backend => self.backend.state,
            Role::Frontend => self.frontend.state,
            Role::Main => PeerState::Ready,
        }
    }

    pub fn relay_ready(&self) -> bool {
        self.relay.is_some()
    }

    pub fn shutdown_armed(&self) -> bool {
        self.quit_deadline.is_some()
    }

    pub fn close_to_tray(&self) -> bool {
        self.close_to_tray
    }

    pub fn window_visible(&self) -> bool {
        self.window_visible
    }

    /// Drive the host until it decides to exit.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<HostEvent>) -> ExitReason {
        loop {
            let deadline = self.quit_deadline;
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        return ExitReason::EventsClosed;
                    };
                    if let Some(reason) = self.handle(event) {
                        return reason;
                    }
                }
                _ = sleep_until(deadline) => {
                    tracing::warn!(
                        "backend did not stop within {:?}, exiting anyway",
                        self.shutdown_timeout
                    );
                    return ExitReason::TimedOut;
                }
            }
        }
    }

    /// Apply one event. Returns the exit reason when the host should stop.
    pub fn handle(&mut self, event: HostEvent) -> Option<ExitReason> {
        match event {
            HostEvent::Connected { role, conn, outbox } => {
                self.on_connected(role, conn, outbox);
                None
            }
            HostEvent::Frame { role, frame } => self.on_frame(role, frame),
            HostEvent::Disconnected { role, conn } => {
                self.on_disconnected(role, conn);
                None
            }
            HostEvent::ShutdownSignal => {
                self.request_shutdown();
                None
            }
        }
    }

    fn peer_mut(&mut self, role: Role) -> Option<&mut Peer> {
        match role {
            Role::Backend => Some(&mut self.backend),
            Role::Frontend => Some(&mut self.frontend),
            Role::Main => None,
        }
    }

    fn on_connected(&mut self, role: Role, conn: u64, outbox: Outbox) {
        let Some(peer) = self.peer_mut(role) else {
            tracing::warn!("ignoring connection claiming role {}", role);
            return;
        };
        if peer.is_ready() {
            tracing::warn!("{} reconnected, replacing previous connection", role);
        }
        peer.state = PeerState::Ready;
        peer.conn = Some(conn);
        peer.outbox = Some(outbox);
        tracing::info!("{} ready", role);

        if self.frontend.is_ready() && self.backend.is_ready() {
            self.on_both_ready();
        }
    }

    fn on_both_ready(&mut self) {
        let (Some(frontend), Some(backend)) =
            (self.frontend.outbox.clone(), self.backend.outbox.clone())
        else {
            return;
        };
        tracing::info!("both peers ready, starting relay");
        let relay = MessageRelay::new(frontend, backend);

        let to_backend = HostCommand::Config(self.config.clone());
        let to_frontend = HostNotice::Config(ConfigPush {
            config: self.config.clone(),
            config_path: self.config_path.clone(),
        });
        if let Err(e) = relay.send_message_to_backend(&to_backend) {
            tracing::warn!("could not push config to backend: {}", e);
        }
        if let Err(e) = relay.send_message_to_frontend(&to_frontend) {
            tracing::warn!("could not push config to frontend: {}", e);
        }
        self.relay = Some(relay);
    }

    fn on_disconnected(&mut self, role: Role, conn: u64) {
        let Some(peer) = self.peer_mut(role) else {
            return;
        };
        if peer.conn != Some(conn) {
            tracing::debug!("stale {} connection {} closed", role, conn);
            return;
        }
        peer.state = PeerState::Gone;
        peer.conn = None;
        peer.outbox = None;
        if self.relay.take().is_some() {
            tracing::info!("{} disconnected, relay stopped", role);
        } else {
            tracing::debug!("{} disconnected", role);
        }
    }

    fn on_frame(&mut self, role: Role, frame: Frame) -> Option<ExitReason> {
        let Frame { channel, envelope } = frame;
        match channel {
            Channel::ToMain => match HostControl::decode(envelope) {
                Ok(control) => self.on_control(role, control),
                Err(e) => {
                    tracing::warn!("malformed control message from {}: {}", role, e);
                    None
                }
            },
            Channel::FromBackend | Channel::FromFrontend if channel.origin() == Some(role) => {
                let Some(relay) = &self.relay else {
                    tracing::debug!(
                        "dropping `{}` from {} before both peers are ready",
                        envelope.message_type,
                        role
                    );
                    return None;
                };
                if role == Role::Backend {
                    relay.on_from_backend(envelope.message_type, envelope.data);
                } else {
                    relay.on_from_frontend(envelope.message_type, envelope.data);
                }
                None
            }
            _ => {
                tracing::warn!(
                    "{} sent `{}` on {:?}, which it does not own",
                    role,
                    envelope.message_type,
                    channel
                );
                None
            }
        }
    }

    fn on_control(&mut self, role: Role, control: HostControl) -> Option<ExitReason> {
        match control {
            HostControl::FrontReady => {
                self.window_visible = true;
                tracing::info!("frontend applied config, showing main window");
            }
            HostControl::BackendStopped if role != Role::Backend => {
                tracing::warn!("ignoring backendStopped from {}", role);
            }
            HostControl::BackendStopped => {
                self.quit_deadline = None;
                tracing::info!("backend stopped");
                return Some(ExitReason::BackendStopped);
            }
            HostControl::CloseToTrayToggle(state) => {
                self.close_to_tray = state;
                tracing::debug!("close to tray set to {}", state);
            }
            HostControl::WindowClose => {
                if self.close_to_tray {
                    self.window_visible = false;
                    tracing::info!("hiding main window to tray");
                } else {
                    self.request_shutdown();
                }
            }
            HostControl::Quit => self.request_shutdown(),
            HostControl::Unknown { message_type, .. } => {
                tracing::debug!("unknown control message `{}` from {}", message_type, role);
            }
        }
        None
    }

    /// Ask the backend to stop and arm the exit timer. Idempotent.
    pub fn request_shutdown(&mut self) {
        if self.sent_close_message {
            tracing::debug!("shutdown already requested");
            return;
        }
        self.sent_close_message = true;

        let stop = HostCommand::StopRequest;
        match (&self.relay, &self.backend.outbox) {
            (Some(relay), _) => {
                if let Err(e) = relay.send_message_to_backend(&stop) {
                    tracing::warn!("could not send stop request: {}", e);
                }
            }
            (None, Some(outbox)) => match stop.to_envelope() {
                Ok(envelope) => {
                    if !outbox.deliver(Frame::new(Channel::FromMain, envelope)) {
                        tracing::debug!("backend gone, stop request dropped");
                    }
                }
                Err(e) => tracing::warn!("could not send stop request: {}", e),
            },
            (None, None) => tracing::debug!("no backend connected, waiting out shutdown timer"),
        }

        self.quit_deadline = Some(Instant::now() + self.shutdown_timeout);
        tracing::info!(
            "stop requested, exiting in at most {:?}",
            self.shutdown_timeout
        );
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use sonic_core::Envelope;

    struct Peers {
        host: Host,
        front: mpsc::UnboundedReceiver<Frame>,
        back: mpsc::UnboundedReceiver<Frame>,
    }

    fn config() -> WalletConfig {
        WalletConfig::from_value(json!({"darkMode": true, "walletFile": "/a.wallet"})).unwrap()
    }

    fn connect(host: &mut Host, role: Role) -> mpsc::UnboundedReceiver<Frame> {
        let (tx, rx) = mpsc::unbounded_channel();
        host.handle(HostEvent::Connected {
            role,
            conn: 1,
            outbox: tx,
        });
        rx
    }

    fn connected() -> Peers {
        let mut host = Host::new(config(), "/x");
        let back = connect(&mut host, Role::Backend);
        let front = connect(&mut host, Role::Frontend);
        Peers { host, front, back }
    }

    fn frame(channel: Channel, message_type: &str, data: Value) -> Frame {
        Frame::new(channel, Envelope::new(message_type, data))
    }

    fn control(message_type: &str) -> HostEvent {
        HostEvent::Frame {
            role: Role::Frontend,
            frame: frame(Channel::ToMain, message_type, Value::Null),
        }
    }

    #[test]
    fn both_ready_pushes_config() {
        let mut peers = connected();
        assert!(peers.host.relay_ready());

        let to_back = peers.back.try_recv().unwrap();
        assert_eq!(to_back.channel, Channel::FromMain);
        assert_eq!(to_back.envelope.message_type, "config");
        assert_eq!(to_back.envelope.data, config().to_value());

        let to_front = peers.front.try_recv().unwrap();
        assert_eq!(
            to_front.envelope.data,
            json!({"config": config().to_value(), "configPath": "/x"})
        );
    }

    #[test]
    fn frames_before_ready_are_dropped() {
        let mut host = Host::new(config(), "/x");
        let mut back = connect(&mut host, Role::Backend);
        host.handle(HostEvent::Frame {
            role: Role::Backend,
            frame: frame(Channel::FromBackend, "balance", json!([1, 2])),
        });
        let mut front = connect(&mut host, Role::Frontend);

        // Only the config push arrives.
        assert_eq!(front.try_recv().unwrap().envelope.message_type, "config");
        assert!(front.try_recv().is_err());
        assert_eq!(back.try_recv().unwrap().envelope.message_type, "config");
    }

    #[test]
    fn relays_between_peers() {
        let mut peers = connected();
        let _ = peers.front.try_recv();
        let _ = peers.back.try_recv();

        peers.host.handle(HostEvent::Frame {
            role: Role::Backend,
            frame: frame(Channel::FromBackend, "syncStatus", json!([1, 2, 3])),
        });
        peers.host.handle(HostEvent::Frame {
            role: Role::Frontend,
            frame: frame(Channel::FromFrontend, "transactionRequest", json!(50)),
        });

        let to_front = peers.front.try_recv().unwrap();
        assert_eq!(to_front, frame(Channel::FromBackend, "syncStatus", json!([1, 2, 3])));
        let to_back = peers.back.try_recv().unwrap();
        assert_eq!(
            to_back,
            frame(Channel::FromFrontend, "transactionRequest", json!(50))
        );
    }

    #[test]
    fn peers_cannot_spoof_channels() {
        let mut peers = connected();
        let _ = peers.front.try_recv();
        peers.host.handle(HostEvent::Frame {
            role: Role::Frontend,
            frame: frame(Channel::FromBackend, "balance", json!([9, 9])),
        });
        assert!(peers.front.try_recv().is_err());
    }

    #[test]
    fn shutdown_sends_stop_once() {
        let mut peers = connected();
        let _ = peers.back.try_recv();

        peers.host.handle(control("quit"));
        assert!(peers.host.shutdown_armed());
        let stop = peers.back.try_recv().unwrap();
        assert_eq!(stop.envelope, Envelope::bare("stopRequest"));

        peers.host.handle(control("windowClose"));
        peers.host.handle(HostEvent::ShutdownSignal);
        assert!(peers.back.try_recv().is_err());
    }

    #[test]
    fn close_to_tray_hides_instead_of_quitting() {
        let mut peers = connected();
        peers.host.handle(control("frontReady"));
        assert!(peers.host.window_visible());

        peers.host.handle(HostEvent::Frame {
            role: Role::Frontend,
            frame: frame(Channel::ToMain, "closeToTrayToggle", json!(true)),
        });
        peers.host.handle(control("windowClose"));
        assert!(!peers.host.window_visible());
        assert!(!peers.host.shutdown_armed());
    }

    #[test]
    fn disconnect_stops_relay() {
        let mut peers = connected();
        peers.host.handle(HostEvent::Disconnected {
            role: Role::Backend,
            conn: 1,
        });
        assert!(!peers.host.relay_ready());
        assert_eq!(peers.host.peer_state(Role::Backend), PeerState::Gone);
    }

    #[test]
    fn stale_disconnect_keeps_replacement() {
        let mut peers = connected();
        let (tx, _rx) = mpsc::unbounded_channel();
        peers.host.handle(HostEvent::Connected {
            role: Role::Frontend,
            conn: 2,
            outbox: tx,
        });
        peers.host.handle(HostEvent::Disconnected {
            role: Role::Frontend,
            conn: 1,
        });
        assert_eq!(peers.host.peer_state(Role::Frontend), PeerState::Ready);
        assert!(peers.host.relay_ready());
    }

    #[tokio::test]
    async fn backend_stopped_exits_cleanly() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (back_tx, _back_rx) = mpsc::unbounded_channel();
        tx.send(HostEvent::Connected {
            role: Role::Backend,
            conn: 1,
            outbox: back_tx,
        })
        .unwrap();
        tx.send(HostEvent::ShutdownSignal).unwrap();
        tx.send(HostEvent::Frame {
            role: Role::Backend,
            frame: frame(Channel::ToMain, "backendStopped", Value::Null),
        })
        .unwrap();

        let reason = Host::new(config(), "/x").run(rx).await;
        assert_eq!(reason, ExitReason::BackendStopped);
    }

    #[test]
    fn only_backend_may_report_stopped() {
        let mut peers = connected();
        assert_eq!(peers.host.handle(control("backendStopped")), None);

        let reason = peers.host.handle(HostEvent::Frame {
            role: Role::Backend,
            frame: frame(Channel::ToMain, "backendStopped", Value::Null),
        });
        assert_eq!(reason, Some(ExitReason::BackendStopped));
    }

    #[tokio::test(start_paused = true)]
    async fn silent_backend_times_out() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (back_tx, mut back_rx) = mpsc::unbounded_channel();
        tx.send(HostEvent::Connected {
            role: Role::Backend,
            conn: 1,
            outbox: back_tx,
        })
        .unwrap();
        tx.send(HostEvent::ShutdownSignal).unwrap();

        let host = Host::new(config(), "/x").with_shutdown_timeout(Duration::from_secs(10));
        let started = Instant::now();
        let reason = host.run(rx).await;

        assert_eq!(reason, ExitReason::TimedOut);
        assert!(started.elapsed() >= Duration::from_secs(10));
        assert_eq!(back_rx.try_recv().unwrap().envelope.message_type, "stopRequest");
        drop(tx);
    }
}
