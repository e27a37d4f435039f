//! Bridge transport abstraction.

use async_trait::async_trait;

use crate::remote::RemoteError;
use crate::remote::protocol::{BridgeRequest, BridgeResponse};

/// An opaque request/response channel to the host process.
///
/// Implementations carry requests to the bridge and bring one response
/// back; they do not interpret message contents beyond (de)serialization.
#[async_trait]
pub trait BridgeTransport: Send + Sync {
    /// Send one request and await its response.
    async fn send_request(&self, request: BridgeRequest) -> Result<BridgeResponse, RemoteError>;
}
