use serde_json::Value;

use crate::messages;
use crate::validation::FieldErrors;

/// Broad classes of failure the console distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or timeout; nothing reached the backend or nothing came back.
    Transport,
    /// Rejected locally before any request was sent.
    Validation,
    /// The backend answered with a non-2xx status.
    Rejected,
    /// HTTP 401; the session is gone.
    SessionExpired,
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{}", messages::TIMEOUT)]
    Timeout,

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        data: Option<Value>,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(FieldErrors),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    pub fn http(status: u16, message: impl Into<String>, data: Option<Value>) -> Self {
        ClientError::Http {
            status,
            message: message.into(),
            data,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Timeout | ClientError::Network(_) => ErrorKind::Transport,
            ClientError::Validation(_) | ClientError::InvalidRequest(_) => ErrorKind::Validation,
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Http { status: 401, .. } => ErrorKind::SessionExpired,
            ClientError::Http { status: 404, .. } => ErrorKind::NotFound,
            ClientError::Http { .. } | ClientError::Decode(_) => ErrorKind::Rejected,
        }
    }

    /// Server-supplied or locally produced detail, unlocalized.
    pub fn detail(&self) -> String {
        match self {
            ClientError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Generic localized message for end users.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Timeout => messages::TIMEOUT.to_string(),
            ClientError::Network(_) => messages::NETWORK_ERROR.to_string(),
            ClientError::Validation(errors) => errors.to_string(),
            ClientError::NotFound(_) => messages::NOT_FOUND.to_string(),
            ClientError::Http { status: 401, .. } => messages::UNAUTHORIZED.to_string(),
            ClientError::Http { status: 404, .. } => messages::NOT_FOUND.to_string(),
            ClientError::Http { status, .. } if *status >= 500 => messages::SERVER_ERROR.to_string(),
            ClientError::Http { message, .. } if !message.is_empty() => message.clone(),
            _ => messages::UNKNOWN.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Transport => "TRANSPORT_ERROR",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Rejected => "REQUEST_REJECTED",
            ErrorKind::SessionExpired => "UNAUTHORIZED",
            ErrorKind::NotFound => "NOT_FOUND",
        }
    }
}

impl From<FieldErrors> for ClientError {
    fn from(errors: FieldErrors) -> Self {
        ClientError::Validation(errors)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err)
        }
    }
}
