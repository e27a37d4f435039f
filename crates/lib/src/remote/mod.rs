//! The remote cluster collaborator.
//!
//! The cluster API lives in a host process reachable only through an opaque
//! request/response bridge. This module defines the consumed contract
//! ([`ClusterProxy`]), the transport-agnostic bridge messages, and an HTTP
//! realization of the bridge. The facade never speaks the virtualization
//! backend's own wire protocol; that stays behind the bridge.

mod errors;
mod http;
pub mod protocol;
mod proxy;
mod transport;

pub use errors::RemoteError;
pub use http::HttpTransport;
pub use protocol::{BridgeRequest, BridgeResponse, WireIdentity};
pub use proxy::{BridgeProxy, ClusterProxy};
pub use transport::BridgeTransport;
