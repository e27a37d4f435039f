//! Authorization error types.
//!
//! This module defines structured error types for authorization-related
//! operations, providing better error context and type safety compared to
//! string-based errors.

use thiserror::Error as ThisError;

use crate::Error;
use crate::access::Privilege;

/// Errors that can occur during authorization operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum AccessError {
    /// The operator lacks the privilege required for an operation.
    ///
    /// Raised locally, before any remote call is issued.
    #[error("Permission denied: {privilege} required on {path}")]
    PermissionDenied {
        /// The path that was checked
        path: String,
        /// The privilege that was required
        privilege: Privilege,
    },

    /// A privilege token is not part of the known vocabulary.
    #[error("Unknown privilege token: {value}")]
    UnknownPrivilege {
        /// The unrecognized token
        value: String,
    },

    /// The fetched identity payload is structurally unusable.
    #[error("Malformed identity: {reason}")]
    MalformedIdentity {
        /// Description of why the identity is malformed
        reason: String,
    },
}

impl AccessError {
    /// Check if this error indicates permission was denied.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, AccessError::PermissionDenied { .. })
    }

    /// Check if this error indicates an unknown privilege token.
    pub fn is_unknown_privilege(&self) -> bool {
        matches!(self, AccessError::UnknownPrivilege { .. })
    }

    /// Check if this error indicates a malformed identity payload.
    pub fn is_malformed_identity(&self) -> bool {
        matches!(self, AccessError::MalformedIdentity { .. })
    }

    /// Get the checked path if this error is a permission denial.
    pub fn denied_path(&self) -> Option<&str> {
        match self {
            AccessError::PermissionDenied { path, .. } => Some(path),
            _ => None,
        }
    }
}

// Conversion from AccessError to the main Error type
impl From<AccessError> for Error {
    fn from(err: AccessError) -> Self {
        Error::Access(err)
    }
}
