//! The action dispatcher.
//!
//! [`Console`] mediates every read and write the UI may perform against the
//! cluster: it authorizes through the permission evaluator, invokes the
//! remote collaborator, and after a successful mutation schedules a cluster
//! snapshot refresh. Checking is pessimistic throughout: check, then call,
//! then refresh; never an optimistic local update.
//!
//! Error propagation is deliberately asymmetric. Mutating and
//! administrative operations return `Result` so callers can react; read
//! operations degrade to empty collections and only record the failure in
//! the store's shared error field.

mod errors;
mod ops_admin;
mod ops_guest;
mod ops_power;
mod ops_query;
pub(crate) mod paths;
mod validate;

pub use errors::ConsoleError;

use std::sync::Arc;

use tracing::debug;

use crate::access::{AccessError, Identity, IdentityLoader, Privilege, has_permission};
use crate::remote::{ClusterProxy, RemoteError};
use crate::store::ResourceStore;

struct ConsoleInner {
    proxy: Arc<dyn ClusterProxy>,
    identity: IdentityLoader,
    store: ResourceStore,
}

/// Authorization-aware facade over one cluster connection.
///
/// Cheap to clone; all clones share the identity, snapshots and error
/// state.
///
/// ## Example
///
/// ```ignore
/// let transport = HttpTransport::new("http://127.0.0.1:8006")?;
/// let proxy = Arc::new(BridgeProxy::new(transport));
/// let console = Console::connect(proxy).await;
/// console.refresh_cluster_resources().await;
/// let running = console.store().vms().await;
/// ```
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

impl Console {
    /// Create a facade without loading the operator identity yet.
    ///
    /// Every permission check fails closed until [`Console::reload_identity`]
    /// succeeds.
    pub fn new(proxy: Arc<dyn ClusterProxy>) -> Self {
        Self {
            inner: Arc::new(ConsoleInner {
                identity: IdentityLoader::new(proxy.clone()),
                store: ResourceStore::new(proxy.clone()),
                proxy,
            }),
        }
    }

    /// Create a facade and load the operator identity once.
    ///
    /// A failed load is non-fatal: the facade works, but every permission
    /// check fails closed until a reload succeeds.
    pub async fn connect(proxy: Arc<dyn ClusterProxy>) -> Self {
        let console = Self::new(proxy);
        console.inner.identity.load().await;
        console
    }

    /// Re-fetch the operator identity (reconnect).
    ///
    /// The new identity wholly replaces the old one; on failure the
    /// identity is absent and checks fail closed. Returns whether an
    /// identity is now loaded.
    pub async fn reload_identity(&self) -> bool {
        self.inner.identity.load().await.is_some()
    }

    /// The currently loaded operator identity, if any.
    pub async fn identity(&self) -> Option<Arc<Identity>> {
        self.inner.identity.current().await
    }

    /// Drop the operator identity (disconnect).
    pub async fn disconnect(&self) {
        self.inner.identity.clear().await;
    }

    /// The snapshot store backing this facade.
    pub fn store(&self) -> &ResourceStore {
        &self.inner.store
    }

    /// Refresh the node snapshot, gated like any other audit read.
    pub async fn refresh_nodes(&self) {
        self.begin_attempt().await;
        if self
            .authorize_read(paths::ROOT_NODES, Privilege::SysAudit)
            .await
        {
            self.inner.store.refresh_nodes().await;
        }
    }

    /// Refresh the cluster-resource snapshot, gated like any other audit
    /// read.
    pub async fn refresh_cluster_resources(&self) {
        self.begin_attempt().await;
        if self
            .authorize_read(paths::ROOT_NODES, Privilege::SysAudit)
            .await
        {
            self.inner.store.refresh_cluster_resources().await;
        }
    }

    // === Shared dispatch plumbing ===

    /// Clear the shared error field; every operation starts here.
    pub(crate) async fn begin_attempt(&self) {
        self.inner.store.clear_error().await;
    }

    /// Check `privilege` on `path` against the current identity.
    ///
    /// A denial is recorded in the shared error field and returned without
    /// ever reaching the remote collaborator.
    pub(crate) async fn authorize(
        &self,
        path: &str,
        privilege: Privilege,
    ) -> Result<(), AccessError> {
        let identity = self.inner.identity.current().await;
        if has_permission(identity.as_deref(), path, privilege) {
            Ok(())
        } else {
            let err = AccessError::PermissionDenied {
                path: path.to_string(),
                privilege,
            };
            self.inner.store.record_error(err.to_string()).await;
            Err(err)
        }
    }

    /// Read-path authorization: a denial downgrades to `false` so the
    /// caller can return an empty result.
    pub(crate) async fn authorize_read(&self, path: &str, privilege: Privilege) -> bool {
        match self.authorize(path, privilege).await {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "read denied; returning empty result");
                false
            }
        }
    }

    /// Record a remote failure for display.
    pub(crate) async fn record_remote_error(&self, err: &RemoteError) {
        self.inner.store.record_error(err.to_string()).await;
    }

    /// Schedule one cluster-resource refresh after a successful mutation.
    ///
    /// Fire-and-forget: the mutating call resolves on remote
    /// acknowledgment, independent of refresh completion.
    pub(crate) fn schedule_cluster_refresh(&self) {
        let console = self.clone();
        tokio::spawn(async move {
            console.refresh_cluster_resources().await;
        });
    }

    pub(crate) fn proxy(&self) -> &Arc<dyn ClusterProxy> {
        &self.inner.proxy
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}
