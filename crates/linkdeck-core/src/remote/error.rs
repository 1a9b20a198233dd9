//! Remote access error handling
//!
//! Typed errors for a single request/response exchange with the API.

use thiserror::Error;

/// Errors that can occur talking to the dashboard API
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Request never produced a response (DNS, connect, timeout, TLS)
    #[error("Could not reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-2xx status
    #[error("{url} returned {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// Server rejected the payload
    #[error("{url} rejected the request ({status}): {message}")]
    Validation {
        url: String,
        status: u16,
        message: String,
    },

    /// Response body did not match the expected document
    #[error("Unexpected response from {url}: {details}")]
    Decode { url: String, details: String },
}

impl RemoteError {
    /// Classify a non-success status
    ///
    /// 400, 409 and 422 mean the payload itself was refused; everything
    /// else is treated as a failed exchange.
    pub fn from_status(url: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        let (url, message) = (url.into(), message.into());
        match status {
            400 | 409 | 422 => RemoteError::Validation {
                url,
                status,
                message,
            },
            _ => RemoteError::Status {
                url,
                status,
                message,
            },
        }
    }

    /// True if the server refused the payload
    pub fn is_validation(&self) -> bool {
        matches!(self, RemoteError::Validation { .. })
    }

    /// True if repeating the same request later could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Transport { .. } => true,
            RemoteError::Status { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            RemoteError::Validation { .. } | RemoteError::Decode { .. } => false,
        }
    }

    /// HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } | RemoteError::Validation { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Error text followed by the recovery hint, if there is one
    ///
    /// This is what ends up in `SyncStatus::last_error` and in load errors.
    pub fn describe(&self) -> String {
        match self.recovery_suggestion() {
            Some(hint) => format!("{}. {}", self, hint),
            None => self.to_string(),
        }
    }

    /// Get a hint the user can act on
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            RemoteError::Transport { .. } => {
                Some("Check your connection and the configured api_url, then try again.")
            }
            RemoteError::Status { status: 401, .. } | RemoteError::Status { status: 403, .. } => {
                Some("Your session token is missing or expired. Set a new one with: linkdeck config set token <TOKEN>")
            }
            RemoteError::Validation { .. } => Some("Fix the rejected value and save again."),
            _ => None,
        }
    }
}

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;
