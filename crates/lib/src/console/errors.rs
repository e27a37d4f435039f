//! Dispatcher error types.

use thiserror::Error as ThisError;

use crate::Error;

/// Errors raised by the dispatcher itself, before any remote call.
#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum ConsoleError {
    /// A typed operation argument failed validation.
    #[error("Invalid {what}: {reason}")]
    InvalidSpec {
        /// What was being validated, e.g. "VM create spec"
        what: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl ConsoleError {
    /// Check if this error is an argument-validation failure.
    pub fn is_invalid_spec(&self) -> bool {
        matches!(self, ConsoleError::InvalidSpec { .. })
    }
}

// Conversion from ConsoleError to the main Error type
impl From<ConsoleError> for Error {
    fn from(err: ConsoleError) -> Self {
        Error::Console(err)
    }
}
