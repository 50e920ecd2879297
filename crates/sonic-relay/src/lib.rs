//! Host process for the Sonic wallet shell.
//!
//! The host sits between the backend and the renderer. It relays their
//! messages verbatim, pushes the initial config once both are connected,
//! and coordinates shutdown.

pub mod host;
pub mod relay;
pub mod settings;
pub mod transport;

pub use host::{ExitReason, Host, HostEvent};
pub use relay::{Endpoint, MessageRelay};
pub use settings::{HostSettings, Overrides};
