//! The boundary with the UI.
//!
//! The dispatcher tells the UI what happened through [`UiEvent`]s and the UI
//! asks for work through [`UiCommand`]s. Both are plain data.

use serde_json::Value;
use sonic_core::{Balance, NodeFee, SyncStatus};

/// Label of the affirmation button on every modal.
pub const OK: &str = "OK";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Danger,
}

/// What confirming a modal triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Leave the send flow.
    TransactionCancel,
    /// Reload the wallet view after the wallet was reopened.
    OpenNewWallet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub title: String,
    pub body: Vec<String>,
    pub severity: Severity,
    pub confirm_label: &'static str,
    pub confirm_action: Option<ModalAction>,
}

impl Modal {
    pub fn info(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: Vec::new(),
            severity: Severity::Info,
            confirm_label: OK,
            confirm_action: None,
        }
    }

    pub fn danger(title: impl Into<String>) -> Self {
        Self {
            severity: Severity::Danger,
            ..Self::info(title)
        }
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.body.push(text.into());
        self
    }

    pub fn on_confirm(mut self, action: ModalAction) -> Self {
        self.confirm_action = Some(action);
        self
    }

    /// Whether any body line contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.title.contains(needle) || self.body.iter().any(|line| line.contains(needle))
    }
}

/// Emitted to UI observers.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    OpenModal(Modal),
    CloseModal,
    GoToLogin,
    RefreshLogin,
    LogOut,
    ImportLedger,
    DarkModeOn,
    DarkModeOff,
    GotBalance(Balance),
    GotSyncStatus(SyncStatus),
    GotNewTransactions,
    GotTransactionCount(u64),
    GotNodeFee(NodeFee),
}

/// Work requested by the UI.
///
/// Paths come from dialogs the UI already showed; the dispatcher checks
/// login state when it runs the command, not when the dialog opened.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    SendTransaction,
    OpenWallet(String),
    RequestTransactions(u64),
    SaveWalletAs(String),
    ExportToCsv(String),
    BackupToFile(String),
    BackupToClipboard,
    Lock,
    LoggedIn { password_set: bool },
    LoginFailed,
    SetConfig { key: String, value: Value },
}
