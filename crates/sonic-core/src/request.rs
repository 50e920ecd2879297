//! Requests the renderer sends the backend on `fromFrontend`.

use crate::message::{envelope, payload};
use crate::{CodecError, Envelope, Message, WalletConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of `saveWalletAs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAs {
    pub notify: bool,
    pub save_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiRequest {
    /// Full settings mapping for the backend to apply.
    Config(WalletConfig),
    /// Close the current wallet; a fresh `config` follows.
    OpenNewWallet,
    /// Broadcast a previously prepared transaction.
    SendTransaction { hash: String },
    /// Ask for the newest `n` transactions.
    Transactions(u64),
    SaveWalletAs(SaveAs),
    ExportToCsv(String),
    BackupToFile(String),
    BackupToClipboard,
    Unknown { message_type: String, data: Value },
}

impl UiRequest {
    pub const CONFIG: &'static str = "config";
    pub const OPEN_NEW_WALLET: &'static str = "openNewWallet";
    pub const SEND_TRANSACTION: &'static str = "sendTransactionRequest";
    pub const TRANSACTIONS: &'static str = "transactionRequest";
    pub const SAVE_WALLET_AS: &'static str = "saveWalletAs";
    pub const EXPORT_TO_CSV: &'static str = "exportToCSV";
    pub const BACKUP_TO_FILE: &'static str = "backupToFile";
    pub const BACKUP_TO_CLIPBOARD: &'static str = "backupToClipboard";
}

impl Message for UiRequest {
    fn message_type(&self) -> &str {
        match self {
            UiRequest::Config(_) => Self::CONFIG,
            UiRequest::OpenNewWallet => Self::OPEN_NEW_WALLET,
            UiRequest::SendTransaction { .. } => Self::SEND_TRANSACTION,
            UiRequest::Transactions(_) => Self::TRANSACTIONS,
            UiRequest::SaveWalletAs(_) => Self::SAVE_WALLET_AS,
            UiRequest::ExportToCsv(_) => Self::EXPORT_TO_CSV,
            UiRequest::BackupToFile(_) => Self::BACKUP_TO_FILE,
            UiRequest::BackupToClipboard => Self::BACKUP_TO_CLIPBOARD,
            UiRequest::Unknown { message_type, .. } => message_type,
        }
    }

    fn to_envelope(&self) -> Result<Envelope, CodecError> {
        let tag = self.message_type();
        match self {
            UiRequest::Config(config) => envelope(tag, config),
            UiRequest::OpenNewWallet | UiRequest::BackupToClipboard => Ok(Envelope::bare(tag)),
            UiRequest::SendTransaction { hash } => envelope(tag, hash),
            UiRequest::Transactions(n) => envelope(tag, n),
            UiRequest::SaveWalletAs(save_as) => envelope(tag, save_as),
            UiRequest::ExportToCsv(path) | UiRequest::BackupToFile(path) => envelope(tag, path),
            UiRequest::Unknown { message_type, data } => {
                Ok(Envelope::new(message_type.clone(), data.clone()))
            }
        }
    }

    fn decode(envelope: Envelope) -> Result<Self, CodecError> {
        let Envelope { message_type, data } = envelope;
        let tag = message_type.as_str();
        let request = match tag {
            Self::CONFIG => UiRequest::Config(payload(tag, data)?),
            Self::OPEN_NEW_WALLET => UiRequest::OpenNewWallet,
            Self::SEND_TRANSACTION => UiRequest::SendTransaction {
                hash: payload(tag, data)?,
            },
            Self::TRANSACTIONS => UiRequest::Transactions(payload(tag, data)?),
            Self::SAVE_WALLET_AS => UiRequest::SaveWalletAs(payload(tag, data)?),
            Self::EXPORT_TO_CSV => UiRequest::ExportToCsv(payload(tag, data)?),
            Self::BACKUP_TO_FILE => UiRequest::BackupToFile(payload(tag, data)?),
            Self::BACKUP_TO_CLIPBOARD => UiRequest::BackupToClipboard,
            _ => UiRequest::Unknown { message_type, data },
        };
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_as_payload_is_camel_case() {
        let envelope = UiRequest::SaveWalletAs(SaveAs {
            notify: true,
            save_path: "/home/nova/backup.wallet".to_string(),
        })
        .to_envelope()
        .unwrap();
        assert_eq!(envelope.message_type, "saveWalletAs");
        assert_eq!(
            envelope.data,
            json!({"notify": true, "savePath": "/home/nova/backup.wallet"})
        );
    }

    #[test]
    fn transaction_request_carries_count() {
        let envelope = UiRequest::Transactions(100).to_envelope().unwrap();
        assert_eq!(envelope, Envelope::new("transactionRequest", json!(100)));
        assert_eq!(
            UiRequest::decode(envelope).unwrap(),
            UiRequest::Transactions(100)
        );
    }

    #[test]
    fn config_must_be_an_object() {
        let err = UiRequest::decode(Envelope::new("config", json!("dark"))).unwrap_err();
        assert_eq!(err.message_type(), "config");
    }

    #[test]
    fn unknown_request_passes_through() {
        let request = UiRequest::decode(Envelope::new("rescanRequest", json!(5))).unwrap();
        assert_eq!(
            request.to_envelope().unwrap(),
            Envelope::new("rescanRequest", json!(5))
        );
    }
}
