//! Scoped read operations.
//!
//! All reads are informational: a denial or remote failure yields an empty
//! collection and only sets the shared error field, so the UI degrades to
//! last-known-good data plus an error banner instead of surfacing a fault.

use tracing::warn;

use super::{Console, paths};
use crate::access::Privilege;
use crate::model::{ContentKind, Guest, StatPoint, StorageVolume, Timeframe, VolumeContent};
use crate::remote::protocol::filter_content;

impl Console {
    /// List virtual machines on one node.
    ///
    /// Requires `VM.Audit` on the node path.
    pub async fn list_vms(&self, node: &str) -> Vec<Guest> {
        self.begin_attempt().await;
        if !self
            .authorize_read(&paths::node(node), Privilege::VmAudit)
            .await
        {
            return Vec::new();
        }
        match self.proxy().list_vms(node).await {
            Ok(guests) => guests,
            Err(err) => {
                warn!(node, error = %err, "VM listing failed");
                self.record_remote_error(&err).await;
                Vec::new()
            }
        }
    }

    /// List containers on one node.
    ///
    /// Requires `VM.Audit` on the node path.
    pub async fn list_containers(&self, node: &str) -> Vec<Guest> {
        self.begin_attempt().await;
        if !self
            .authorize_read(&paths::node(node), Privilege::VmAudit)
            .await
        {
            return Vec::new();
        }
        match self.proxy().list_containers(node).await {
            Ok(guests) => guests,
            Err(err) => {
                warn!(node, error = %err, "container listing failed");
                self.record_remote_error(&err).await;
                Vec::new()
            }
        }
    }

    /// List storage pools, optionally scoped to one node.
    ///
    /// Requires `Datastore.Audit` on `/storage`.
    pub async fn list_storage(&self, node: Option<&str>) -> Vec<StorageVolume> {
        self.begin_attempt().await;
        if !self
            .authorize_read(paths::ROOT_STORAGE, Privilege::DatastoreAudit)
            .await
        {
            return Vec::new();
        }
        match self.proxy().list_storage(node).await {
            Ok(storage) => storage,
            Err(err) => {
                warn!(error = %err, "storage listing failed");
                self.record_remote_error(&err).await;
                Vec::new()
            }
        }
    }

    /// List the content of one storage pool, optionally narrowed to one
    /// content kind.
    ///
    /// Requires `Datastore.Audit` on the storage path.
    pub async fn storage_content(
        &self,
        node: &str,
        storage: &str,
        filter: Option<ContentKind>,
    ) -> Vec<VolumeContent> {
        self.begin_attempt().await;
        if !self
            .authorize_read(&paths::storage(storage), Privilege::DatastoreAudit)
            .await
        {
            return Vec::new();
        }
        match self.proxy().storage_content(node, storage).await {
            Ok(content) => filter_content(content, filter),
            Err(err) => {
                warn!(node, storage, error = %err, "content listing failed");
                self.record_remote_error(&err).await;
                Vec::new()
            }
        }
    }

    /// Fetch the usage time series of one node.
    ///
    /// Requires `Sys.Audit` on the node path.
    pub async fn node_stats(&self, node: &str, timeframe: Timeframe) -> Vec<StatPoint> {
        self.begin_attempt().await;
        if !self
            .authorize_read(&paths::node(node), Privilege::SysAudit)
            .await
        {
            return Vec::new();
        }
        match self.proxy().node_stats(node, timeframe).await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(node, error = %err, "node stats fetch failed");
                self.record_remote_error(&err).await;
                Vec::new()
            }
        }
    }

    /// Fetch the usage time series of one guest.
    ///
    /// Requires `VM.Audit` on the guest path.
    pub async fn vm_stats(&self, node: &str, vmid: u32, timeframe: Timeframe) -> Vec<StatPoint> {
        self.begin_attempt().await;
        if !self
            .authorize_read(&paths::guest(vmid), Privilege::VmAudit)
            .await
        {
            return Vec::new();
        }
        match self.proxy().guest_stats(node, vmid, timeframe).await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(node, vmid, error = %err, "guest stats fetch failed");
                self.record_remote_error(&err).await;
                Vec::new()
            }
        }
    }
}
