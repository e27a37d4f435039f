//! Identity loading and caching.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::access::Identity;
use crate::remote::ClusterProxy;

/// Fetches and caches the current operator's identity and permission map.
///
/// The loader performs exactly one remote call per `load()`. A failed load
/// is a non-fatal diagnostic: the cached identity becomes absent and every
/// subsequent permission check fails closed until a reload succeeds. The
/// cached identity is always replaced wholesale, never merged.
pub struct IdentityLoader {
    proxy: Arc<dyn ClusterProxy>,
    current: RwLock<Option<Arc<Identity>>>,
}

impl IdentityLoader {
    /// Create a loader with no identity cached yet.
    pub fn new(proxy: Arc<dyn ClusterProxy>) -> Self {
        Self {
            proxy,
            current: RwLock::new(None),
        }
    }

    /// Fetch the operator identity from the remote collaborator.
    ///
    /// On success the new identity replaces the cached one and is returned.
    /// On remote or parse failure the cache is left absent so permission
    /// checks fail closed; the failure is logged, not propagated.
    pub async fn load(&self) -> Option<Arc<Identity>> {
        let loaded = match self.proxy.fetch_identity().await {
            Ok(wire) => match Identity::from_wire(&wire.userid, &wire.permissions) {
                Ok(identity) => {
                    debug!(userid = %identity.userid(), "operator identity loaded");
                    Some(Arc::new(identity))
                }
                Err(err) => {
                    warn!(error = %err, "fetched identity is malformed; permission checks will fail closed");
                    None
                }
            },
            Err(err) => {
                warn!(error = %err, "identity fetch failed; permission checks will fail closed");
                None
            }
        };
        *self.current.write().await = loaded.clone();
        loaded
    }

    /// The currently cached identity, if any.
    pub async fn current(&self) -> Option<Arc<Identity>> {
        self.current.read().await.clone()
    }

    /// Discard the cached identity (disconnect).
    pub async fn clear(&self) {
        self.current.write().await.take();
    }
}

impl std::fmt::Debug for IdentityLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityLoader").finish_non_exhaustive()
    }
}
