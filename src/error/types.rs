use serde_json::Value;
use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

pub const DEFAULT_BAD_REQUEST: &str = "invalid request parameters";
pub const DEFAULT_REJECTED: &str = "conversion failed";
pub const DEFAULT_UNKNOWN: &str = "unknown error";

/// Failure of a conversion call. `Display` yields the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error("file too large, choose a file under 50MB")]
    FileTooLarge,

    #[error("internal server error, retry later")]
    ServerError,

    #[error("service temporarily unavailable, retry later")]
    ServiceUnavailable,

    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// The server answered 2xx but did not report success.
    #[error("{message}")]
    Rejected { message: String },

    /// The request went out but no response came back (refused, reset, timed out).
    #[error("network connection failed, check network settings")]
    Network { detail: String },

    #[error("invalid client configuration: {message}")]
    Config { message: String },

    /// The request could not be built or sent at all.
    #[error("{message}")]
    Request { message: String },
}

impl ConvertError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConvertError::BadRequest { .. } => "BAD_REQUEST",
            ConvertError::FileTooLarge => "FILE_TOO_LARGE",
            ConvertError::ServerError => "SERVER_ERROR",
            ConvertError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ConvertError::RequestFailed { .. } => "REQUEST_FAILED",
            ConvertError::Rejected { .. } => "CONVERSION_REJECTED",
            ConvertError::Network { .. } => "NETWORK_ERROR",
            ConvertError::Config { .. } => "CONFIG_ERROR",
            ConvertError::Request { .. } => "REQUEST_ERROR",
        }
    }

    /// HTTP status that produced this error, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConvertError::BadRequest { .. } => Some(400),
            ConvertError::FileTooLarge => Some(413),
            ConvertError::ServerError => Some(500),
            ConvertError::ServiceUnavailable => Some(503),
            ConvertError::RequestFailed { status, .. } => Some(*status),
            ConvertError::Rejected { .. }
            | ConvertError::Network { .. }
            | ConvertError::Config { .. }
            | ConvertError::Request { .. } => None,
        }
    }

    /// Maps a non-2xx response to an error. Pure in `(status, body)`.
    pub fn from_status(status: u16, body: &str) -> Self {
        let server_message = server_error_message(body);

        match status {
            400 => ConvertError::BadRequest {
                message: server_message.unwrap_or_else(|| DEFAULT_BAD_REQUEST.to_string()),
            },
            413 => ConvertError::FileTooLarge,
            500 => ConvertError::ServerError,
            503 => ConvertError::ServiceUnavailable,
            _ => ConvertError::RequestFailed {
                status,
                message: server_message.unwrap_or_else(|| format!("request failed ({})", status)),
            },
        }
    }

    pub fn rejected(message: Option<String>) -> Self {
        ConvertError::Rejected {
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_REJECTED.to_string()),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        let message = message.into();
        ConvertError::Request {
            message: if message.is_empty() {
                DEFAULT_UNKNOWN.to_string()
            } else {
                message
            },
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ConvertError::Config {
            message: message.into(),
        }
    }

    pub fn network(detail: impl Into<String>) -> Self {
        ConvertError::Network {
            detail: detail.into(),
        }
    }
}

/// Non-empty `error` string from a JSON body, if there is one.
fn server_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl From<reqwest::Error> for ConvertError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ConvertError::request(err.to_string())
        } else {
            ConvertError::network(err.to_string())
        }
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::request(err.to_string())
    }
}
