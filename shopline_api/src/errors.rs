//! Error types for the API client.

use serde_json::Value;

/// Body of a failed response: parsed JSON when possible, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(Value),
    Text(String),
}

impl ErrorBody {
    /// Parses `raw` as JSON, keeping the original text when it isn't.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(raw.to_string()),
        }
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorBody::Json(value) => write!(f, "{}", value),
            ErrorBody::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Errors that can occur when making API requests.
///
/// Every client operation returns this single type. Only [`Error::Status`]
/// carries an HTTP status; the other kinds mean no usable response arrived.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The API answered with a 4xx/5xx status.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        body: ErrorBody,
    },
    /// No response was received (connection refused, timeout, DNS, broken body).
    #[error("Request failed: {message}")]
    Transport { message: String },
    /// A success response whose body was not the expected JSON.
    #[error("Malformed response: {message}")]
    Decode { message: String },
}

impl Error {
    /// HTTP status of the failed response, if there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Transport { .. } | Error::Decode { .. } => None,
        }
    }

    /// Parsed or raw error body, if there was a response.
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Error::Status { body, .. } => Some(body),
            Error::Transport { .. } | Error::Decode { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
