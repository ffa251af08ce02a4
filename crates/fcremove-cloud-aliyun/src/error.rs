//! Alibaba Cloud adapter error types
//!
//! Provider codes are translated into [`ErrorKind`] here so the removal
//! engine never has to know the vendor vocabulary.

use fcremove_cloud::{CloudError, ErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AliyunError {
    #[error("{code}: {message} (status {status}, request id {request_id})")]
    Api {
        status: u16,
        code: String,
        message: String,
        request_id: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AliyunError>;

const UNAUTHORIZED_CODES: [&str; 9] = [
    "Unauthorized",
    "InvalidAccessKeyId",
    "InvalidAccessKeyId.NotFound",
    "InvalidAccessKeyId.Inactive",
    "SignatureDoesNotMatch",
    "SignatureNotMatch",
    "IncompleteSignature",
    "AccessDenied",
    "InvalidSecurityToken.Expired",
];

const TRANSIENT_CODES: [&str; 7] = [
    "ServiceUnavailable",
    "InternalError",
    "InternalServerError",
    "RequestTimeout",
    "ServerBusy",
    "ConcurrentUpdateError",
    "UnknownError",
];

/// Map a provider error code (and HTTP status when known) to an [`ErrorKind`]
pub fn classify(status: Option<u16>, code: &str) -> ErrorKind {
    if UNAUTHORIZED_CODES.contains(&code) || code.starts_with("Forbidden") {
        return ErrorKind::Unauthorized;
    }
    if code.ends_with("NotFound") || code.contains("NotExist") {
        return ErrorKind::NotFound;
    }
    if TRANSIENT_CODES.contains(&code) || code.starts_with("Throttling") {
        return ErrorKind::Transient;
    }
    match status {
        Some(401) | Some(403) => ErrorKind::Unauthorized,
        Some(404) => ErrorKind::NotFound,
        Some(429) => ErrorKind::Transient,
        Some(s) if s >= 500 => ErrorKind::Transient,
        _ => ErrorKind::Fatal,
    }
}

impl From<AliyunError> for CloudError {
    fn from(err: AliyunError) -> Self {
        match err {
            AliyunError::Api {
                status,
                code,
                message,
                ..
            } => CloudError::new(classify(Some(status), &code), code, message),
            AliyunError::Http(e) if e.is_timeout() || e.is_connect() => {
                CloudError::transient("NetworkError", e.to_string())
            }
            AliyunError::Http(e) => {
                let kind = e
                    .status()
                    .map(|s| classify(Some(s.as_u16()), ""))
                    .unwrap_or(ErrorKind::Fatal);
                CloudError::new(kind, "HttpError", e.to_string())
            }
            AliyunError::InvalidResponse(msg) => CloudError::fatal("InvalidResponse", msg),
            AliyunError::JsonError(e) => CloudError::fatal("InvalidResponse", e.to_string()),
            AliyunError::InvalidConfig(msg) => CloudError::fatal("InvalidConfig", msg),
        }
    }
}
