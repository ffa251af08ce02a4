//! Errors that abort a removal run

use fcremove_cloud::{CloudError, ErrorKind};
use thiserror::Error;

/// An escalated remote failure
///
/// `code` is the provider error code; `message` names the resource being
/// removed and carries the provider message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoveError {
    #[error("{message}")]
    Remote { code: String, message: String },

    #[error("{message}")]
    Unauthorized { code: String, message: String },
}

impl RemoveError {
    /// Wrap a cloud error with context, e.g. `"Unable to delete service demo"`
    pub fn from_cloud(context: impl std::fmt::Display, err: &CloudError) -> Self {
        let message = format!("{}: {}", context, err.message);
        match err.kind {
            ErrorKind::Unauthorized => RemoveError::Unauthorized {
                code: err.code.clone(),
                message,
            },
            _ => RemoveError::Remote {
                code: err.code.clone(),
                message,
            },
        }
    }

    pub fn code(&self) -> &str {
        match self {
            RemoveError::Remote { code, .. } | RemoveError::Unauthorized { code, .. } => code,
        }
    }
}

pub type Result<T> = std::result::Result<T, RemoveError>;
