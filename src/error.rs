//! Error types shared by the store, the controllers and the desktop shell

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Request failed: {0}")]
    Transport(String),

    /// The store answered but rejected the operation; `message` is its body verbatim
    #[error("{message}")]
    Store { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Decode(_) | Self::Timeout(_) => ErrorKind::Transport,
            Self::Store { .. } => ErrorKind::Store,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Coarse grouping used by the banner; transport covers timeouts and bad bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Transport,
    Store,
    Validation,
    Config,
}

/// The most recent failure of a panel, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&SyncError> for ErrorInfo {
    fn from(e: &SyncError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}
