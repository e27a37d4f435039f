//! HTTP transport for the bridge.
//!
//! Posts each request as JSON to a single endpoint (`/api/v0`) using
//! reqwest. This is the local bridge realization, not the virtualization
//! backend's own protocol.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::{BridgeTransport, RemoteError};
use crate::remote::protocol::{BridgeRequest, BridgeResponse};

/// Path of the single JSON bridge endpoint.
const BRIDGE_PATH: &str = "/api/v0";

/// HTTP bridge transport backed by reqwest.
#[derive(Debug)]
pub struct HttpTransport {
    url: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for the bridge at `endpoint` (an origin such as
    /// `http://127.0.0.1:8006`).
    pub fn new(endpoint: &str) -> Result<Self, RemoteError> {
        Self::build(endpoint, None)
    }

    /// Like [`HttpTransport::new`] with a bounded per-request timeout.
    ///
    /// Transport-level hardening only; the facade itself imposes no
    /// timeouts.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, RemoteError> {
        Self::build(endpoint, Some(timeout))
    }

    fn build(endpoint: &str, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let invalid = |reason: String| RemoteError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };
        let base = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        let url = base.join(BRIDGE_PATH).map_err(|e| invalid(e.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| invalid(e.to_string()))?;

        Ok(Self { url, client })
    }

    /// The resolved bridge endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl BridgeTransport for HttpTransport {
    async fn send_request(&self, request: BridgeRequest) -> Result<BridgeResponse, RemoteError> {
        let op = request.op_name();

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| RemoteError::ConnectionFailed {
                endpoint: self.url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RemoteError::CallFailed {
                op,
                reason: format!("bridge returned {}", response.status()),
            });
        }

        response.json().await.map_err(|e| RemoteError::Parse {
            op,
            reason: e.to_string(),
        })
    }
}
