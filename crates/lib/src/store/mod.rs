//! Last-known snapshots of cluster state.
//!
//! The store exclusively owns the node and cluster-resource snapshots and
//! tracks a load phase per collection plus the single user-visible error
//! string. A refresh replaces its snapshot wholesale; a failed refresh keeps
//! the previous snapshot visible (stale-but-available) and records the
//! failure, so consumers never render a blank state on transient errors.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::model::{ClusterSnapshot, Guest, GuestKind, Node, StorageVolume};
use crate::remote::ClusterProxy;

/// Load state of one refreshable collection.
///
/// `Idle -> Loading -> {Ready, Failed}`; any new refresh re-enters
/// `Loading`. There is no cancelled state: overlapping refreshes race and
/// the last response to resolve wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl LoadPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadPhase::Loading)
    }
}

/// One refreshable collection: its phase and current value.
struct Slot<T> {
    phase: LoadPhase,
    value: Arc<T>,
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Self {
            phase: LoadPhase::Idle,
            value: Arc::new(T::default()),
        }
    }
}

struct StoreInner {
    proxy: Arc<dyn ClusterProxy>,
    nodes: RwLock<Slot<Vec<Node>>>,
    cluster: RwLock<Slot<ClusterSnapshot>>,
    error: RwLock<Option<String>>,
}

/// Snapshot store for cluster objects.
///
/// Cheap to clone; all clones share one set of snapshots.
#[derive(Clone)]
pub struct ResourceStore {
    inner: Arc<StoreInner>,
}

impl ResourceStore {
    pub fn new(proxy: Arc<dyn ClusterProxy>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                proxy,
                nodes: RwLock::new(Slot::default()),
                cluster: RwLock::new(Slot::default()),
                error: RwLock::new(None),
            }),
        }
    }

    /// Re-fetch the node listing, replacing the snapshot wholesale.
    ///
    /// Read semantics: failures are recorded, never propagated.
    pub async fn refresh_nodes(&self) {
        self.begin(&self.inner.nodes).await;
        match self.inner.proxy.list_nodes().await {
            Ok(nodes) => {
                debug!(count = nodes.len(), "node snapshot replaced");
                self.complete(&self.inner.nodes, nodes).await;
            }
            Err(err) => self.fail(&self.inner.nodes, err.to_string()).await,
        }
    }

    /// Re-fetch the mixed cluster-resource listing, replacing the cluster
    /// snapshot wholesale.
    ///
    /// Read semantics: failures are recorded, never propagated.
    pub async fn refresh_cluster_resources(&self) {
        self.begin(&self.inner.cluster).await;
        match self.inner.proxy.list_cluster_resources().await {
            Ok(resources) => {
                let snapshot = ClusterSnapshot::from_resources(resources);
                debug!(
                    nodes = snapshot.nodes.len(),
                    guests = snapshot.guests.len(),
                    storage = snapshot.storage.len(),
                    "cluster snapshot replaced"
                );
                self.complete(&self.inner.cluster, snapshot).await;
            }
            Err(err) => self.fail(&self.inner.cluster, err.to_string()).await,
        }
    }

    async fn begin<T>(&self, slot: &RwLock<Slot<T>>) {
        slot.write().await.phase = LoadPhase::Loading;
        self.inner.error.write().await.take();
    }

    async fn complete<T>(&self, slot: &RwLock<Slot<T>>, value: T) {
        let mut slot = slot.write().await;
        slot.value = Arc::new(value);
        slot.phase = LoadPhase::Ready;
    }

    async fn fail<T>(&self, slot: &RwLock<Slot<T>>, message: String) {
        warn!(error = %message, "refresh failed; keeping previous snapshot");
        slot.write().await.phase = LoadPhase::Failed;
        *self.inner.error.write().await = Some(message);
    }

    // === Snapshot views ===

    /// The last-known node listing.
    pub async fn nodes(&self) -> Arc<Vec<Node>> {
        self.inner.nodes.read().await.value.clone()
    }

    /// The last-known cluster snapshot.
    pub async fn snapshot(&self) -> Arc<ClusterSnapshot> {
        self.inner.cluster.read().await.value.clone()
    }

    /// Virtual machines from the cluster snapshot.
    pub async fn vms(&self) -> Vec<Guest> {
        self.guests_of_kind(GuestKind::Vm, None).await
    }

    /// Containers from the cluster snapshot.
    pub async fn containers(&self) -> Vec<Guest> {
        self.guests_of_kind(GuestKind::Container, None).await
    }

    /// Virtual machines on one node, from the cluster snapshot.
    pub async fn vms_on(&self, node: &str) -> Vec<Guest> {
        self.guests_of_kind(GuestKind::Vm, Some(node)).await
    }

    /// Containers on one node, from the cluster snapshot.
    pub async fn containers_on(&self, node: &str) -> Vec<Guest> {
        self.guests_of_kind(GuestKind::Container, Some(node)).await
    }

    /// Storage pools from the cluster snapshot.
    pub async fn storage(&self) -> Vec<StorageVolume> {
        self.snapshot().await.storage.clone()
    }

    /// Storage reachable from one node: volumes owned by it plus
    /// cluster-wide (unowned or shared) ones.
    pub async fn storage_on(&self, node: &str) -> Vec<StorageVolume> {
        self.snapshot()
            .await
            .storage
            .iter()
            .filter(|v| v.shared || v.node.is_none() || v.node.as_deref() == Some(node))
            .cloned()
            .collect()
    }

    async fn guests_of_kind(&self, kind: GuestKind, node: Option<&str>) -> Vec<Guest> {
        self.snapshot()
            .await
            .guests
            .iter()
            .filter(|g| g.kind == kind && node.is_none_or(|n| g.node == n))
            .cloned()
            .collect()
    }

    // === Load and error state ===

    pub async fn nodes_phase(&self) -> LoadPhase {
        self.inner.nodes.read().await.phase
    }

    pub async fn cluster_phase(&self) -> LoadPhase {
        self.inner.cluster.read().await.phase
    }

    /// Whether any collection is mid-refresh.
    pub async fn is_loading(&self) -> bool {
        self.nodes_phase().await.is_loading() || self.cluster_phase().await.is_loading()
    }

    /// The user-visible error from the most recent failed attempt, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.error.read().await.clone()
    }

    /// Clear the shared error field (start of a new attempt).
    pub async fn clear_error(&self) {
        self.inner.error.write().await.take();
    }

    /// Record a failure message for display.
    pub(crate) async fn record_error(&self, message: impl Into<String>) {
        *self.inner.error.write().await = Some(message.into());
    }
}

impl std::fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore").finish_non_exhaustive()
    }
}
