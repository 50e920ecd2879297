//! Process roles.
//!
//! Every connection to the host names the role it plays. Roles are written
//! in their lowercase textual form on the wire:
//! - `backend` - the process owning the wallet
//! - `frontend` - the renderer process driving the UI
//! - `main` - the host itself (never claimed by a peer)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three processes in the shell topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Backend,
    Frontend,
    Main,
}

impl Role {
    /// Textual form used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Backend => "backend",
            Role::Frontend => "frontend",
            Role::Main => "main",
        }
    }

    /// Whether a connecting peer may claim this role.
    pub fn is_peer(&self) -> bool {
        !matches!(self, Role::Main)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backend" => Ok(Role::Backend),
            "frontend" => Ok(Role::Frontend),
            "main" => Ok(Role::Main),
            "" => Err(RoleParseError::Empty),
            other => Err(RoleParseError::Unknown(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = RoleParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

/// Error parsing a role string.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RoleParseError {
    #[error("unknown role: {0}")]
    Unknown(String),
    #[error("role cannot be empty")]
    Empty,
}
