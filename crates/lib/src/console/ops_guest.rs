//! Guest configuration and lifecycle operations.

use tracing::{debug, warn};

use super::{Console, paths, validate};
use crate::Result;
use crate::access::Privilege;
use crate::model::{CloneOptions, MigrateOptions, TaskRef, VmConfig, VmConfigPatch, VmCreateSpec};

impl Console {
    /// Read a guest's configuration.
    ///
    /// Requires `VM.Config` on the guest path. Informational: any failure
    /// yields `None` and only sets the shared error field.
    pub async fn vm_config(&self, node: &str, vmid: u32) -> Option<VmConfig> {
        self.begin_attempt().await;
        if !self
            .authorize_read(&paths::guest(vmid), Privilege::VmConfig)
            .await
        {
            return None;
        }
        match self.proxy().get_vm_config(node, vmid).await {
            Ok(config) => Some(config),
            Err(err) => {
                warn!(node, vmid, error = %err, "config read failed");
                self.record_remote_error(&err).await;
                None
            }
        }
    }

    /// Apply a configuration patch to a guest.
    ///
    /// Requires `VM.Config` on the guest path.
    pub async fn update_vm_config(
        &self,
        node: &str,
        vmid: u32,
        patch: &VmConfigPatch,
    ) -> Result<()> {
        self.begin_attempt().await;
        validate::vm_config_patch(patch)?;
        self.authorize(&paths::guest(vmid), Privilege::VmConfig)
            .await?;

        match self.proxy().update_vm_config(node, vmid, patch).await {
            Ok(()) => {
                debug!(node, vmid, "config update acknowledged");
                self.schedule_cluster_refresh();
                Ok(())
            }
            Err(err) => {
                self.record_remote_error(&err).await;
                Err(err.into())
            }
        }
    }

    /// Create a virtual machine.
    ///
    /// Requires `VM.Allocate` on the guest path.
    pub async fn create_vm(&self, node: &str, vmid: u32, spec: &VmCreateSpec) -> Result<TaskRef> {
        self.begin_attempt().await;
        validate::vm_create(spec)?;
        self.authorize(&paths::guest(vmid), Privilege::VmAllocate)
            .await?;

        match self.proxy().create_vm(node, vmid, spec).await {
            Ok(task) => {
                debug!(node, vmid, task = %task, "create accepted");
                self.schedule_cluster_refresh();
                Ok(task)
            }
            Err(err) => {
                self.record_remote_error(&err).await;
                Err(err.into())
            }
        }
    }

    /// Delete a virtual machine.
    ///
    /// Requires `VM.Allocate` on the guest path.
    pub async fn delete_vm(&self, node: &str, vmid: u32) -> Result<TaskRef> {
        self.begin_attempt().await;
        self.authorize(&paths::guest(vmid), Privilege::VmAllocate)
            .await?;

        match self.proxy().delete_vm(node, vmid).await {
            Ok(task) => {
                debug!(node, vmid, task = %task, "delete accepted");
                self.schedule_cluster_refresh();
                Ok(task)
            }
            Err(err) => {
                self.record_remote_error(&err).await;
                Err(err.into())
            }
        }
    }

    /// Clone a guest onto a new vmid.
    ///
    /// Requires `VM.Clone` on the source guest path.
    pub async fn clone_vm(
        &self,
        node: &str,
        vmid: u32,
        options: &CloneOptions,
    ) -> Result<TaskRef> {
        self.begin_attempt().await;
        validate::clone_options(vmid, options)?;
        self.authorize(&paths::guest(vmid), Privilege::VmClone)
            .await?;

        match self.proxy().clone_vm(node, vmid, options).await {
            Ok(task) => {
                debug!(node, vmid, target = options.target_vmid, "clone accepted");
                self.schedule_cluster_refresh();
                Ok(task)
            }
            Err(err) => {
                self.record_remote_error(&err).await;
                Err(err.into())
            }
        }
    }

    /// Migrate a guest to another node.
    ///
    /// Requires `VM.Migrate` on the guest path.
    pub async fn migrate_vm(
        &self,
        node: &str,
        vmid: u32,
        options: &MigrateOptions,
    ) -> Result<TaskRef> {
        self.begin_attempt().await;
        validate::migrate_options(node, options)?;
        self.authorize(&paths::guest(vmid), Privilege::VmMigrate)
            .await?;

        match self.proxy().migrate_vm(node, vmid, options).await {
            Ok(task) => {
                debug!(node, vmid, target = %options.target_node, "migration accepted");
                self.schedule_cluster_refresh();
                Ok(task)
            }
            Err(err) => {
                self.record_remote_error(&err).await;
                Err(err.into())
            }
        }
    }
}
