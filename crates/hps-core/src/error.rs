//! Error types for the HPS client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when the backend rejects the session token.
pub const REAUTHENTICATE_MESSAGE: &str = "Authentication required. Please log in again.";

/// Message shown for any other failure surfaced to the user.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// A shared error type for the entire client.
///
/// Variants carry owned strings so the error is `Clone` and can be handed to
/// every caller waiting on a shared request.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HpsError {
    /// Transport failure (DNS, connection refused, broken body stream)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 401, or a call that needs a session made without one
    #[error("Unauthorized: {}", .detail.as_deref().unwrap_or("no valid session"))]
    Unauthorized { detail: Option<String> },

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("request failed"))]
    Http { status: u16, detail: Option<String> },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted client state could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Client-side validation rejected the input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HpsError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Unauthorized error without backend detail.
    pub fn unauthorized() -> Self {
        Self::Unauthorized { detail: None }
    }

    /// Creates an Http error for the given status.
    pub fn http(status: u16, detail: Option<String>) -> Self {
        Self::Http { status, detail }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if the backend (or a local precondition) rejected the session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Check if this is a transport failure
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if this is a 5xx response
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status >= 500)
    }

    /// Returns the HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's `detail` message, when the error came from a response
    /// that carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Best message for a result value: backend detail first, then the
    /// error's own description.
    pub fn reason(&self) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }

    /// User-facing text. A rejected session asks for re-authentication,
    /// everything else gets the supplied component message.
    pub fn user_message<'a>(&self, fallback: &'a str) -> &'a str {
        if self.is_unauthorized() {
            REAUTHENTICATE_MESSAGE
        } else {
            fallback
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for HpsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for HpsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for HpsError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for HpsError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, HpsError>`.
pub type Result<T> = std::result::Result<T, HpsError>;

/// Pulls the `detail` field out of an error response body.
///
/// The backend answers errors with `{"detail": "..."}`; validation failures
/// carry a structured value instead of a string, which is returned as JSON.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) if !text.is_empty() => Some(text.clone()),
        serde_json::Value::Null => None,
        serde_json::Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
