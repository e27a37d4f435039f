//!
//! Virtdeck: an authorization-aware facade over a virtualization cluster.
//! This library mediates every read and write a console UI performs against
//! the cluster, so privileged operations are exposed or blocked correctly
//! and the displayed state never goes stale or contradictory after an
//! action.
//!
//! ## Core Concepts
//!
//! * **Identity (`access::Identity`)**: The current operator and their
//!   path-keyed privilege grants, loaded once per connection and replaced
//!   wholesale on reconnect.
//! * **Permission evaluation (`access::has_permission`)**: A pure check
//!   over the hierarchical permission map; a grant anywhere on a path's
//!   ancestor chain is sufficient, absence anywhere is not a deny.
//! * **Remote collaborator (`remote::ClusterProxy`)**: The cluster API,
//!   reached only through an opaque request/response bridge.
//! * **Snapshot store (`store::ResourceStore`)**: Last-known cluster state,
//!   replaced wholesale on every refresh, stale-but-available on failure.
//! * **Console (`console::Console`)**: The dispatcher composing all of the
//!   above: authorize, then invoke, then refresh.

pub mod access;
pub mod config;
pub mod console;
pub mod model;
pub mod remote;
pub mod store;

/// Re-export the `Console` facade for easier access.
pub use console::Console;

/// Result type used throughout the Virtdeck library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Virtdeck library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured authorization errors from the access module
    #[error(transparent)]
    Access(access::AccessError),

    /// Structured remote-collaborator errors from the remote module
    #[error(transparent)]
    Remote(remote::RemoteError),

    /// Structured dispatcher errors from the console module
    #[error(transparent)]
    Console(console::ConsoleError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
            Error::Access(_) => "access",
            Error::Remote(_) => "remote",
            Error::Console(_) => "console",
        }
    }

    /// Check if this error indicates permission was denied.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Error::Access(access_err) => access_err.is_permission_denied(),
            _ => false,
        }
    }

    /// Check if this error came from the remote collaborator.
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, Error::Remote(_))
    }

    /// Check if this error is a malformed remote response.
    pub fn is_parse_failure(&self) -> bool {
        match self {
            Error::Remote(remote_err) => remote_err.is_parse(),
            _ => false,
        }
    }

    /// Check if this error is an argument-validation failure.
    pub fn is_invalid_spec(&self) -> bool {
        match self {
            Error::Console(console_err) => console_err.is_invalid_spec(),
            _ => false,
        }
    }

    /// Check if this error is a connectivity failure.
    pub fn is_connection_failed(&self) -> bool {
        match self {
            Error::Remote(remote_err) => remote_err.is_connection_failed(),
            _ => false,
        }
    }
}
