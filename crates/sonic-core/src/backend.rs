//! Messages the backend emits on `fromBackend`.

use crate::message::{envelope, payload};
use crate::{BackendError, CodecError, Envelope, Message, OperationResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wallet balance in atomic units, sent as `[unlocked, locked]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "(u64, u64)", into = "(u64, u64)")]
pub struct Balance {
    pub unlocked: u64,
    pub locked: u64,
}

impl From<(u64, u64)> for Balance {
    fn from((unlocked, locked): (u64, u64)) -> Self {
        Self { unlocked, locked }
    }
}

impl From<Balance> for (u64, u64) {
    fn from(b: Balance) -> Self {
        (b.unlocked, b.locked)
    }
}

/// Sync progress, sent as `[walletHeight, localDaemonHeight, networkHeight]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "(u64, u64, u64)", into = "(u64, u64, u64)")]
pub struct SyncStatus {
    pub wallet_height: u64,
    pub local_daemon_height: u64,
    pub network_height: u64,
}

impl From<(u64, u64, u64)> for SyncStatus {
    fn from((wallet_height, local_daemon_height, network_height): (u64, u64, u64)) -> Self {
        Self {
            wallet_height,
            local_daemon_height,
            network_height,
        }
    }
}

impl From<SyncStatus> for (u64, u64, u64) {
    fn from(s: SyncStatus) -> Self {
        (s.wallet_height, s.local_daemon_height, s.network_height)
    }
}

/// Fee the connected node charges, sent as `[address, amount]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "(String, u64)", into = "(String, u64)")]
pub struct NodeFee {
    pub address: String,
    pub amount: u64,
}

impl From<(String, u64)> for NodeFee {
    fn from((address, amount): (String, u64)) -> Self {
        Self { address, amount }
    }
}

impl From<NodeFee> for (String, u64) {
    fn from(fee: NodeFee) -> Self {
        (fee.address, fee.amount)
    }
}

/// Where the backend's daemon lives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonConnectionInfo {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub ssl: bool,
    /// Fields this layer does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything the backend may send to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    Balance(Balance),
    SyncStatus(SyncStatus),
    /// Rows are rendered by the UI; this layer keeps them opaque.
    TransactionList(Vec<Value>),
    TransactionCount(u64),
    NodeFee(NodeFee),
    PrimaryAddress(String),
    DaemonConnectionInfo(DaemonConnectionInfo),
    BackendLogLine(String),
    WalletActiveStatus(bool),
    SendTransactionResponse(OperationResponse),
    PrepareTransactionResponse(OperationResponse),
    PasswordChangeResponse(OperationResponse),
    /// `true` when the save succeeded.
    SaveWalletResponse(bool),
    /// Height the rescan starts from.
    RescanResponse(String),
    AuthenticationError(BackendError),
    HandleLedgerImport,
    LedgerPrompt,
    LedgerPromptClose,
    Unknown { message_type: String, data: Value },
}

impl BackendEvent {
    pub const BALANCE: &'static str = "balance";
    pub const SYNC_STATUS: &'static str = "syncStatus";
    pub const TRANSACTION_LIST: &'static str = "transactionList";
    pub const TRANSACTION_COUNT: &'static str = "transactionCount";
    pub const NODE_FEE: &'static str = "nodeFee";
    pub const PRIMARY_ADDRESS: &'static str = "primaryAddress";
    pub const DAEMON_CONNECTION_INFO: &'static str = "daemonConnectionInfo";
    pub const BACKEND_LOG_LINE: &'static str = "backendLogLine";
    pub const WALLET_ACTIVE_STATUS: &'static str = "walletActiveStatus";
    pub const SEND_TRANSACTION_RESPONSE: &'static str = "sendTransactionResponse";
    pub const PREPARE_TRANSACTION_RESPONSE: &'static str = "prepareTransactionResponse";
    pub const PASSWORD_CHANGE_RESPONSE: &'static str = "passwordChangeResponse";
    pub const SAVE_WALLET_RESPONSE: &'static str = "saveWalletResponse";
    pub const RESCAN_RESPONSE: &'static str = "rescanResponse";
    pub const AUTHENTICATION_ERROR: &'static str = "authenticationError";
    pub const HANDLE_LEDGER_IMPORT: &'static str = "handleLedgerImport";
    pub const LEDGER_PROMPT: &'static str = "ledgerPrompt";
    pub const LEDGER_PROMPT_CLOSE: &'static str = "ledgerPromptClose";

    /// Whether this event reports a fact about the open wallet.
    pub fn is_wallet_fact(&self) -> bool {
        matches!(
            self,
            BackendEvent::Balance(_)
                | BackendEvent::SyncStatus(_)
                | BackendEvent::TransactionList(_)
                | BackendEvent::TransactionCount(_)
                | BackendEvent::NodeFee(_)
                | BackendEvent::PrimaryAddress(_)
                | BackendEvent::DaemonConnectionInfo(_)
        )
    }
}

impl Message for BackendEvent {
    fn message_type(&self) -> &str {
        match self {
            BackendEvent::Balance(_) => Self::BALANCE,
            BackendEvent::SyncStatus(_) => Self::SYNC_STATUS,
            BackendEvent::TransactionList(_) => Self::TRANSACTION_LIST,
            BackendEvent::TransactionCount(_) => Self::TRANSACTION_COUNT,
            BackendEvent::NodeFee(_) => Self::NODE_FEE,
            BackendEvent::PrimaryAddress(_) => Self::PRIMARY_ADDRESS,
            BackendEvent::DaemonConnectionInfo(_) => Self::DAEMON_CONNECTION_INFO,
            BackendEvent::BackendLogLine(_) => Self::BACKEND_LOG_LINE,
            BackendEvent::WalletActiveStatus(_) => Self::WALLET_ACTIVE_STATUS,
            BackendEvent::SendTransactionResponse(_) => Self::SEND_TRANSACTION_RESPONSE,
            BackendEvent::PrepareTransactionResponse(_) => Self::PREPARE_TRANSACTION_RESPONSE,
            BackendEvent::PasswordChangeResponse(_) => Self::PASSWORD_CHANGE_RESPONSE,
            BackendEvent::SaveWalletResponse(_) => Self::SAVE_WALLET_RESPONSE,
            BackendEvent::RescanResponse(_) => Self::RESCAN_RESPONSE,
            BackendEvent::AuthenticationError(_) => Self::AUTHENTICATION_ERROR,
            BackendEvent::HandleLedgerImport => Self::HANDLE_LEDGER_IMPORT,
            BackendEvent::LedgerPrompt => Self::LEDGER_PROMPT,
            BackendEvent::LedgerPromptClose => Self::LEDGER_PROMPT_CLOSE,
            BackendEvent::Unknown { message_type, .. } => message_type,
        }
    }

    fn to_envelope(&self) -> Result<Envelope, CodecError> {
        let tag = self.message_type();
        match self {
            BackendEvent::Balance(b) => envelope(tag, b),
            BackendEvent::SyncStatus(s) => envelope(tag, s),
            BackendEvent::TransactionList(rows) => envelope(tag, rows),
            BackendEvent::TransactionCount(n) => envelope(tag, n),
            BackendEvent::NodeFee(fee) => envelope(tag, fee),
            BackendEvent::PrimaryAddress(addr) => envelope(tag, addr),
            BackendEvent::DaemonConnectionInfo(info) => envelope(tag, info),
            BackendEvent::BackendLogLine(line) => envelope(tag, line),
            BackendEvent::WalletActiveStatus(active) => envelope(tag, active),
            BackendEvent::SendTransactionResponse(r)
            | BackendEvent::PrepareTransactionResponse(r)
            | BackendEvent::PasswordChangeResponse(r) => envelope(tag, r),
            BackendEvent::SaveWalletResponse(saved) => envelope(tag, saved),
            BackendEvent::RescanResponse(height) => envelope(tag, height),
            BackendEvent::AuthenticationError(err) => envelope(tag, err),
            BackendEvent::HandleLedgerImport
            | BackendEvent::LedgerPrompt
            | BackendEvent::LedgerPromptClose => Ok(Envelope::bare(tag)),
            BackendEvent::Unknown { message_type, data } => {
                Ok(Envelope::new(message_type.clone(), data.clone()))
            }
        }
    }

    fn decode(envelope: Envelope) -> Result<Self, CodecError> {
        let Envelope { message_type, data } = envelope;
        let tag = message_type.as_str();
        let event = match tag {
            Self::BALANCE => BackendEvent::Balance(payload(tag, data)?),
            Self::SYNC_STATUS => BackendEvent::SyncStatus(payload(tag, data)?),
            Self::TRANSACTION_LIST => BackendEvent::TransactionList(payload(tag, data)?),
            Self::TRANSACTION_COUNT => BackendEvent::TransactionCount(payload(tag, data)?),
            Self::NODE_FEE => BackendEvent::NodeFee(payload(tag, data)?),
            Self::PRIMARY_ADDRESS => BackendEvent::PrimaryAddress(payload(tag, data)?),
            Self::DAEMON_CONNECTION_INFO => {
                BackendEvent::DaemonConnectionInfo(payload(tag, data)?)
            }
            Self::BACKEND_LOG_LINE => BackendEvent::BackendLogLine(payload(tag, data)?),
            Self::WALLET_ACTIVE_STATUS => BackendEvent::WalletActiveStatus(payload(tag, data)?),
            Self::SEND_TRANSACTION_RESPONSE => {
                BackendEvent::SendTransactionResponse(payload(tag, data)?)
            }
            Self::PREPARE_TRANSACTION_RESPONSE => {
                BackendEvent::PrepareTransactionResponse(payload(tag, data)?)
            }
            Self::PASSWORD_CHANGE_RESPONSE => {
                BackendEvent::PasswordChangeResponse(payload(tag, data)?)
            }
            Self::SAVE_WALLET_RESPONSE => BackendEvent::SaveWalletResponse(payload(tag, data)?),
            Self::RESCAN_RESPONSE => BackendEvent::RescanResponse(height_text(data)),
            Self::AUTHENTICATION_ERROR => BackendEvent::AuthenticationError(payload(tag, data)?),
            Self::HANDLE_LEDGER_IMPORT => BackendEvent::HandleLedgerImport,
            Self::LEDGER_PROMPT => BackendEvent::LedgerPrompt,
            Self::LEDGER_PROMPT_CLOSE => BackendEvent::LedgerPromptClose,
            _ => BackendEvent::Unknown { message_type, data },
        };
        Ok(event)
    }
}

/// Heights arrive as either strings or numbers.
fn height_text(data: Value) -> String {
    match data {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
