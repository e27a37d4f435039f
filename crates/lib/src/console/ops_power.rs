//! Guest power control.
//!
//! All transitions require `VM.PowerMgmt` on the guest path. Each
//! successful transition schedules one cluster snapshot refresh.

use tracing::debug;

use super::{Console, paths};
use crate::Result;
use crate::access::Privilege;
use crate::model::{GuestKind, PowerAction};

impl Console {
    /// Start a virtual machine.
    pub async fn vm_start(&self, node: &str, vmid: u32) -> Result<()> {
        self.power(node, vmid, GuestKind::Vm, PowerAction::Start).await
    }

    /// Hard-stop a virtual machine.
    pub async fn vm_stop(&self, node: &str, vmid: u32) -> Result<()> {
        self.power(node, vmid, GuestKind::Vm, PowerAction::Stop).await
    }

    /// Reboot a virtual machine.
    pub async fn vm_reboot(&self, node: &str, vmid: u32) -> Result<()> {
        self.power(node, vmid, GuestKind::Vm, PowerAction::Reboot).await
    }

    /// Suspend a virtual machine.
    pub async fn vm_suspend(&self, node: &str, vmid: u32) -> Result<()> {
        self.power(node, vmid, GuestKind::Vm, PowerAction::Suspend).await
    }

    /// Resume a suspended virtual machine.
    pub async fn vm_resume(&self, node: &str, vmid: u32) -> Result<()> {
        self.power(node, vmid, GuestKind::Vm, PowerAction::Resume).await
    }

    /// Gracefully shut down a virtual machine.
    pub async fn vm_shutdown(&self, node: &str, vmid: u32) -> Result<()> {
        self.power(node, vmid, GuestKind::Vm, PowerAction::Shutdown).await
    }

    /// Hard-reset a virtual machine.
    pub async fn vm_reset(&self, node: &str, vmid: u32) -> Result<()> {
        self.power(node, vmid, GuestKind::Vm, PowerAction::Reset).await
    }

    /// Start a container.
    pub async fn ct_start(&self, node: &str, vmid: u32) -> Result<()> {
        self.power(node, vmid, GuestKind::Container, PowerAction::Start)
            .await
    }

    /// Hard-stop a container.
    pub async fn ct_stop(&self, node: &str, vmid: u32) -> Result<()> {
        self.power(node, vmid, GuestKind::Container, PowerAction::Stop)
            .await
    }

    /// Reboot a container.
    pub async fn ct_reboot(&self, node: &str, vmid: u32) -> Result<()> {
        self.power(node, vmid, GuestKind::Container, PowerAction::Reboot)
            .await
    }

    /// Gracefully shut down a container.
    pub async fn ct_shutdown(&self, node: &str, vmid: u32) -> Result<()> {
        self.power(node, vmid, GuestKind::Container, PowerAction::Shutdown)
            .await
    }

    async fn power(
        &self,
        node: &str,
        vmid: u32,
        kind: GuestKind,
        action: PowerAction,
    ) -> Result<()> {
        self.begin_attempt().await;
        let path = paths::guest(vmid);
        self.authorize(&path, Privilege::VmPowerMgmt).await?;

        match self.proxy().guest_power(node, vmid, kind, action).await {
            Ok(()) => {
                debug!(node, vmid, action = %action, "power transition acknowledged");
                self.schedule_cluster_refresh();
                Ok(())
            }
            Err(err) => {
                self.record_remote_error(&err).await;
                Err(err.into())
            }
        }
    }
}
