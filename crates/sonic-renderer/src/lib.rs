//! Renderer side of the Sonic wallet shell.
//!
//! The renderer holds the state of the open wallet and turns backend
//! messages into UI events. All of it is driven by one [`Dispatcher`] that
//! owns the [`AppContext`].

pub mod config_manager;
pub mod context;
pub mod dispatch;
pub mod login;
pub mod modals;
pub mod session;
pub mod ui;

pub use config_manager::{ConfigManager, ConfigStore, MemoryStore, StoreError};
pub use context::AppContext;
pub use dispatch::{Dispatcher, DispatcherHandle, Input};
pub use login::LoginCounter;
pub use session::{LOG_CAPACITY, Session, SessionPhase};
pub use ui::{Modal, ModalAction, Severity, UiCommand, UiEvent};
