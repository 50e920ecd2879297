//! Core types for the Sonic wallet shell.
//!
//! This crate provides the envelope, the channels it travels on, and the
//! typed vocabulary for each channel. Process wiring lives in the relay and
//! renderer crates.

mod backend;
mod config;
mod envelope;
mod host;
mod message;
mod request;
mod response;
mod role;

pub use backend::{Balance, BackendEvent, DaemonConnectionInfo, NodeFee, SyncStatus};
pub use config::WalletConfig;
pub use envelope::{Channel, Envelope, Frame, Handshake};
pub use host::{ConfigPush, HostCommand, HostControl, HostNotice};
pub use message::{CodecError, Message};
pub use request::{SaveAs, UiRequest};
pub use response::{BackendError, OperationResponse, Status};
pub use role::{Role, RoleParseError};

/// Connection lifecycle of a peer as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeerState {
    /// Nothing has connected under this role yet.
    #[default]
    Absent,
    /// Connected and said hello.
    Ready,
    /// Was connected, has since gone away.
    Gone,
}
