//! Unified client error model.
//! One enum covers every failure the library reports: transport problems,
//! credential decode failures, local validation, and responses whose shape
//! carries no usable payload.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// Network unreachable, non-2xx status, or an unparsable body.
    /// `server_message` is the envelope's `message` field when the error
    /// body carried one; `message` is the raw failure description.
    Transport { status: Option<u16>, server_message: Option<String>, message: String },
    /// A held credential could not be decoded into claims.
    Decode { message: String },
    /// Input rejected before any network call was made.
    Validation { message: String },
    /// A response that decoded but held no recognizable payload.
    Shape { message: String },
}

impl ApiError {
    pub fn kind_str(&self) -> &'static str {
        match self {
            ApiError::Transport { .. } => "transport",
            ApiError::Decode { .. } => "decode",
            ApiError::Validation { .. } => "validation",
            ApiError::Shape { .. } => "shape",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport { message, .. }
            | ApiError::Decode { message }
            | ApiError::Validation { message }
            | ApiError::Shape { message } => message.as_str(),
        }
    }

    /// The server-supplied envelope message, when the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Transport { server_message, .. } => server_message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the failed exchange, when one was received at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn transport<S: Into<String>>(status: Option<u16>, server_message: Option<String>, msg: S) -> Self {
        ApiError::Transport { status, server_message, message: msg.into() }
    }
    pub fn decode<S: Into<String>>(msg: S) -> Self { ApiError::Decode { message: msg.into() } }
    pub fn validation<S: Into<String>>(msg: S) -> Self { ApiError::Validation { message: msg.into() } }
    pub fn shape<S: Into<String>>(msg: S) -> Self { ApiError::Shape { message: msg.into() } }

    /// Same error with its user-facing text replaced; kind, status, and the
    /// original server message are preserved.
    pub fn with_message<S: Into<String>>(self, msg: S) -> Self {
        let message = msg.into();
        match self {
            ApiError::Transport { status, server_message, .. } => ApiError::Transport { status, server_message, message },
            ApiError::Decode { .. } => ApiError::Decode { message },
            ApiError::Validation { .. } => ApiError::Validation { message },
            ApiError::Shape { .. } => ApiError::Shape { message },
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind_str(), self.message())
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // Status is present for response errors, absent for connect failures
        ApiError::Transport {
            status: err.status().map(|s| s.as_u16()),
            server_message: None,
            message: err.to_string(),
        }
    }
}
