//! Provider-agnostic cloud error types
//!
//! Every adapter translates its own error vocabulary into an [`ErrorKind`],
//! so cleanup logic can branch on the kind without knowing provider codes.

use thiserror::Error;

/// Classification of a remote failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The addressed resource (or its parent) does not exist
    NotFound,
    /// Credentials were rejected or the caller does not own the resource
    Unauthorized,
    /// Throttling, 5xx or network trouble; worth retrying
    Transient,
    /// Anything else
    Fatal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not-found"),
            ErrorKind::Unauthorized => write!(f, "unauthorized"),
            ErrorKind::Transient => write!(f, "transient"),
            ErrorKind::Fatal => write!(f, "fatal"),
        }
    }
}

/// Error returned by every client trait method
#[derive(Error, Debug, Clone)]
#[error("{code}: {message}")]
pub struct CloudError {
    /// Provider-independent classification
    pub kind: ErrorKind,

    /// Original provider error code (e.g. "ServiceNotFound")
    pub code: String,

    /// Original provider message
    pub message: String,
}

impl CloudError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, code, message)
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, code, message)
    }

    pub fn transient(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, code, message)
    }

    pub fn fatal(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fatal, code, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// True when the code matches exactly, e.g. `is_code("FunctionNotFound")`
    pub fn is_code(&self, code: &str) -> bool {
        self.code == code
    }

    pub fn is_transient(&self) -> bool {
        self.kind == ErrorKind::Transient
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
