//! Error types for remote collaborator calls.

use thiserror::Error as ThisError;

use crate::Error;

/// Errors that can occur while talking to the remote collaborator.
#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum RemoteError {
    /// The configured bridge endpoint is not a usable URL.
    #[error("Invalid bridge endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The bridge endpoint could not be reached.
    #[error("Failed to connect to {endpoint}: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    /// The remote collaborator rejected or failed the call.
    ///
    /// The reason is captured verbatim for display.
    #[error("Remote call '{op}' failed: {reason}")]
    CallFailed { op: &'static str, reason: String },

    /// The response payload was malformed or missing required fields.
    #[error("Malformed response for '{op}': {reason}")]
    Parse { op: &'static str, reason: String },

    /// The bridge answered with a payload of the wrong variant.
    #[error("Unexpected response for '{op}': expected {expected}")]
    UnexpectedResponse {
        op: &'static str,
        expected: &'static str,
    },
}

impl RemoteError {
    /// Check if this is a connectivity error.
    pub fn is_connection_failed(&self) -> bool {
        matches!(self, RemoteError::ConnectionFailed { .. })
    }

    /// Check if this is a malformed-response error.
    ///
    /// Parse failures propagate exactly like call failures; this helper only
    /// exists for diagnostics.
    pub fn is_parse(&self) -> bool {
        matches!(self, RemoteError::Parse { .. })
    }

    /// Check if this is a protocol error (wrong response variant).
    pub fn is_unexpected_response(&self) -> bool {
        matches!(self, RemoteError::UnexpectedResponse { .. })
    }

    /// Check if this is a configuration error (bad endpoint).
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, RemoteError::InvalidEndpoint { .. })
    }
}

// Conversion from RemoteError to the main Error type
impl From<RemoteError> for Error {
    fn from(err: RemoteError) -> Self {
        Error::Remote(err)
    }
}
