//! Results the backend reports for requested operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Outcome tag of a `*Response` message.
///
/// Anything other than `SUCCESS` counts as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Success,
    Failure,
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        if s == "SUCCESS" {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => "SUCCESS".to_string(),
            Status::Failure => "FAILURE".to_string(),
        }
    }
}

/// Error the backend attaches to a failed operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackendError {
    /// A described error, e.g. `{ "errorString": "insufficient funds" }`.
    Detail {
        #[serde(rename = "errorString")]
        error_string: String,
    },
    /// A bare error code, e.g. `"AUTHERROR"`.
    Code(String),
    /// Any other shape, e.g. `{ "errorCode": 5 }`. Kept so the failure
    /// status still reaches the UI.
    Other(Value),
}

impl BackendError {
    pub const AUTH: &'static str = "AUTHERROR";
    pub const SAVE: &'static str = "SAVEERROR";

    pub fn message(&self) -> Cow<'_, str> {
        match self {
            BackendError::Detail { error_string } => Cow::Borrowed(error_string),
            BackendError::Code(code) => Cow::Borrowed(code),
            BackendError::Other(value) => Cow::Owned(value.to_string()),
        }
    }

    pub fn is_code(&self, code: &str) -> bool {
        matches!(self, BackendError::Code(c) if c == code)
    }
}

/// `{ status, error?, hash? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BackendError>,
    /// Transaction hash, when the operation produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl OperationResponse {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            error: None,
            hash: None,
        }
    }

    pub fn failure(error: BackendError) -> Self {
        Self {
            status: Status::Failure,
            error: Some(error),
            hash: None,
        }
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// The backend's error text, or an empty string when none was sent.
    pub fn error_message(&self) -> Cow<'_, str> {
        self.error
            .as_ref()
            .map(BackendError::message)
            .unwrap_or_default()
    }
}
