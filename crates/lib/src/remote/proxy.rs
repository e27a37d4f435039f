//! The consumed cluster collaborator contract.

use async_trait::async_trait;

use super::{BridgeTransport, RemoteError};
use crate::model::{
    BackupJobSpec, BackupOptions, CloneOptions, ClusterResource, Guest, GuestKind, MigrateOptions,
    Node, PowerAction, StatPoint, StorageVolume, TaskRef, Timeframe, User, UserPatch, UserSpec,
    VmConfig, VmConfigPatch, VmCreateSpec, VolumeContent,
};
use crate::remote::protocol::{BridgeRequest, BridgeResponse, WireIdentity};

/// Asynchronous request/response surface of the remote cluster API.
///
/// One method per operation; every method returns a typed payload or a
/// [`RemoteError`]. The facade consumes this trait and never reaches the
/// cluster any other way, which keeps the collaborator trivially mockable.
#[async_trait]
pub trait ClusterProxy: Send + Sync {
    async fn fetch_identity(&self) -> Result<WireIdentity, RemoteError>;
    async fn list_nodes(&self) -> Result<Vec<Node>, RemoteError>;
    async fn list_cluster_resources(&self) -> Result<Vec<ClusterResource>, RemoteError>;
    async fn list_vms(&self, node: &str) -> Result<Vec<Guest>, RemoteError>;
    async fn list_containers(&self, node: &str) -> Result<Vec<Guest>, RemoteError>;
    async fn get_vm_config(&self, node: &str, vmid: u32) -> Result<VmConfig, RemoteError>;
    async fn update_vm_config(
        &self,
        node: &str,
        vmid: u32,
        patch: &VmConfigPatch,
    ) -> Result<(), RemoteError>;
    async fn create_vm(
        &self,
        node: &str,
        vmid: u32,
        spec: &VmCreateSpec,
    ) -> Result<TaskRef, RemoteError>;
    async fn delete_vm(&self, node: &str, vmid: u32) -> Result<TaskRef, RemoteError>;
    async fn clone_vm(
        &self,
        node: &str,
        vmid: u32,
        options: &CloneOptions,
    ) -> Result<TaskRef, RemoteError>;
    async fn migrate_vm(
        &self,
        node: &str,
        vmid: u32,
        options: &MigrateOptions,
    ) -> Result<TaskRef, RemoteError>;
    async fn guest_power(
        &self,
        node: &str,
        vmid: u32,
        kind: GuestKind,
        action: PowerAction,
    ) -> Result<(), RemoteError>;
    async fn list_storage(&self, node: Option<&str>) -> Result<Vec<StorageVolume>, RemoteError>;
    async fn storage_content(
        &self,
        node: &str,
        storage: &str,
    ) -> Result<Vec<VolumeContent>, RemoteError>;
    async fn create_backup(
        &self,
        node: &str,
        vmid: u32,
        options: &BackupOptions,
    ) -> Result<TaskRef, RemoteError>;
    async fn create_backup_job(&self, job: &BackupJobSpec) -> Result<TaskRef, RemoteError>;
    async fn list_users(&self) -> Result<Vec<User>, RemoteError>;
    async fn create_user(&self, user: &UserSpec) -> Result<(), RemoteError>;
    async fn update_user(&self, userid: &str, patch: &UserPatch) -> Result<(), RemoteError>;
    async fn delete_user(&self, userid: &str) -> Result<(), RemoteError>;
    async fn node_stats(
        &self,
        node: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<StatPoint>, RemoteError>;
    async fn guest_stats(
        &self,
        node: &str,
        vmid: u32,
        timeframe: Timeframe,
    ) -> Result<Vec<StatPoint>, RemoteError>;
}

/// [`ClusterProxy`] realized over a [`BridgeTransport`].
///
/// Translates each call into a bridge message and matches the response
/// variant back; a mismatched variant is a protocol error, a
/// `BridgeResponse::Error` is a call failure.
pub struct BridgeProxy<T> {
    transport: T,
}

impl<T: BridgeTransport> BridgeProxy<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Send a request, folding bridge-level errors into [`RemoteError`].
    async fn call(
        &self,
        op: &'static str,
        request: BridgeRequest,
    ) -> Result<BridgeResponse, RemoteError> {
        match self.transport.send_request(request).await? {
            BridgeResponse::Error(reason) => Err(RemoteError::CallFailed { op, reason }),
            response => Ok(response),
        }
    }
}

#[async_trait]
impl<T: BridgeTransport> ClusterProxy for BridgeProxy<T> {
    async fn fetch_identity(&self) -> Result<WireIdentity, RemoteError> {
        match self.call("fetch_identity", BridgeRequest::FetchIdentity).await? {
            BridgeResponse::Identity(identity) => Ok(identity),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "fetch_identity",
                expected: "Identity",
            }),
        }
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, RemoteError> {
        match self.call("list_nodes", BridgeRequest::ListNodes).await? {
            BridgeResponse::Nodes(nodes) => Ok(nodes),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "list_nodes",
                expected: "Nodes",
            }),
        }
    }

    async fn list_cluster_resources(&self) -> Result<Vec<ClusterResource>, RemoteError> {
        match self
            .call("list_cluster_resources", BridgeRequest::ListClusterResources)
            .await?
        {
            BridgeResponse::Resources(resources) => Ok(resources),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "list_cluster_resources",
                expected: "Resources",
            }),
        }
    }

    async fn list_vms(&self, node: &str) -> Result<Vec<Guest>, RemoteError> {
        let request = BridgeRequest::ListVms {
            node: node.to_string(),
        };
        match self.call("list_vms", request).await? {
            BridgeResponse::Guests(guests) => Ok(guests),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "list_vms",
                expected: "Guests",
            }),
        }
    }

    async fn list_containers(&self, node: &str) -> Result<Vec<Guest>, RemoteError> {
        let request = BridgeRequest::ListContainers {
            node: node.to_string(),
        };
        match self.call("list_containers", request).await? {
            BridgeResponse::Guests(guests) => Ok(guests),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "list_containers",
                expected: "Guests",
            }),
        }
    }

    async fn get_vm_config(&self, node: &str, vmid: u32) -> Result<VmConfig, RemoteError> {
        let request = BridgeRequest::GetVmConfig {
            node: node.to_string(),
            vmid,
        };
        match self.call("get_vm_config", request).await? {
            BridgeResponse::Config(config) => Ok(config),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "get_vm_config",
                expected: "Config",
            }),
        }
    }

    async fn update_vm_config(
        &self,
        node: &str,
        vmid: u32,
        patch: &VmConfigPatch,
    ) -> Result<(), RemoteError> {
        let request = BridgeRequest::UpdateVmConfig {
            node: node.to_string(),
            vmid,
            patch: patch.clone(),
        };
        match self.call("update_vm_config", request).await? {
            BridgeResponse::Ack => Ok(()),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "update_vm_config",
                expected: "Ack",
            }),
        }
    }

    async fn create_vm(
        &self,
        node: &str,
        vmid: u32,
        spec: &VmCreateSpec,
    ) -> Result<TaskRef, RemoteError> {
        let request = BridgeRequest::CreateVm {
            node: node.to_string(),
            vmid,
            spec: spec.clone(),
        };
        match self.call("create_vm", request).await? {
            BridgeResponse::Task(task) => Ok(task),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "create_vm",
                expected: "Task",
            }),
        }
    }

    async fn delete_vm(&self, node: &str, vmid: u32) -> Result<TaskRef, RemoteError> {
        let request = BridgeRequest::DeleteVm {
            node: node.to_string(),
            vmid,
        };
        match self.call("delete_vm", request).await? {
            BridgeResponse::Task(task) => Ok(task),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "delete_vm",
                expected: "Task",
            }),
        }
    }

    async fn clone_vm(
        &self,
        node: &str,
        vmid: u32,
        options: &CloneOptions,
    ) -> Result<TaskRef, RemoteError> {
        let request = BridgeRequest::CloneVm {
            node: node.to_string(),
            vmid,
            options: options.clone(),
        };
        match self.call("clone_vm", request).await? {
            BridgeResponse::Task(task) => Ok(task),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "clone_vm",
                expected: "Task",
            }),
        }
    }

    async fn migrate_vm(
        &self,
        node: &str,
        vmid: u32,
        options: &MigrateOptions,
    ) -> Result<TaskRef, RemoteError> {
        let request = BridgeRequest::MigrateVm {
            node: node.to_string(),
            vmid,
            options: options.clone(),
        };
        match self.call("migrate_vm", request).await? {
            BridgeResponse::Task(task) => Ok(task),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "migrate_vm",
                expected: "Task",
            }),
        }
    }

    async fn guest_power(
        &self,
        node: &str,
        vmid: u32,
        kind: GuestKind,
        action: PowerAction,
    ) -> Result<(), RemoteError> {
        let request = BridgeRequest::GuestPower {
            node: node.to_string(),
            vmid,
            kind,
            action,
        };
        match self.call("guest_power", request).await? {
            BridgeResponse::Ack => Ok(()),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "guest_power",
                expected: "Ack",
            }),
        }
    }

    async fn list_storage(&self, node: Option<&str>) -> Result<Vec<StorageVolume>, RemoteError> {
        let request = BridgeRequest::ListStorage {
            node: node.map(str::to_string),
        };
        match self.call("list_storage", request).await? {
            BridgeResponse::Storage(storage) => Ok(storage),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "list_storage",
                expected: "Storage",
            }),
        }
    }

    async fn storage_content(
        &self,
        node: &str,
        storage: &str,
    ) -> Result<Vec<VolumeContent>, RemoteError> {
        let request = BridgeRequest::StorageContent {
            node: node.to_string(),
            storage: storage.to_string(),
        };
        match self.call("storage_content", request).await? {
            BridgeResponse::Content(content) => Ok(content),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "storage_content",
                expected: "Content",
            }),
        }
    }

    async fn create_backup(
        &self,
        node: &str,
        vmid: u32,
        options: &BackupOptions,
    ) -> Result<TaskRef, RemoteError> {
        let request = BridgeRequest::CreateBackup {
            node: node.to_string(),
            vmid,
            options: options.clone(),
        };
        match self.call("create_backup", request).await? {
            BridgeResponse::Task(task) => Ok(task),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "create_backup",
                expected: "Task",
            }),
        }
    }

    async fn create_backup_job(&self, job: &BackupJobSpec) -> Result<TaskRef, RemoteError> {
        let request = BridgeRequest::CreateBackupJob { job: job.clone() };
        match self.call("create_backup_job", request).await? {
            BridgeResponse::Task(task) => Ok(task),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "create_backup_job",
                expected: "Task",
            }),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, RemoteError> {
        match self.call("list_users", BridgeRequest::ListUsers).await? {
            BridgeResponse::Users(users) => Ok(users),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "list_users",
                expected: "Users",
            }),
        }
    }

    async fn create_user(&self, user: &UserSpec) -> Result<(), RemoteError> {
        let request = BridgeRequest::CreateUser { user: user.clone() };
        match self.call("create_user", request).await? {
            BridgeResponse::Ack => Ok(()),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "create_user",
                expected: "Ack",
            }),
        }
    }

    async fn update_user(&self, userid: &str, patch: &UserPatch) -> Result<(), RemoteError> {
        let request = BridgeRequest::UpdateUser {
            userid: userid.to_string(),
            patch: patch.clone(),
        };
        match self.call("update_user", request).await? {
            BridgeResponse::Ack => Ok(()),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "update_user",
                expected: "Ack",
            }),
        }
    }

    async fn delete_user(&self, userid: &str) -> Result<(), RemoteError> {
        let request = BridgeRequest::DeleteUser {
            userid: userid.to_string(),
        };
        match self.call("delete_user", request).await? {
            BridgeResponse::Ack => Ok(()),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "delete_user",
                expected: "Ack",
            }),
        }
    }

    async fn node_stats(
        &self,
        node: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<StatPoint>, RemoteError> {
        let request = BridgeRequest::NodeStats {
            node: node.to_string(),
            timeframe,
        };
        match self.call("node_stats", request).await? {
            BridgeResponse::Stats(stats) => Ok(stats),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "node_stats",
                expected: "Stats",
            }),
        }
    }

    async fn guest_stats(
        &self,
        node: &str,
        vmid: u32,
        timeframe: Timeframe,
    ) -> Result<Vec<StatPoint>, RemoteError> {
        let request = BridgeRequest::GuestStats {
            node: node.to_string(),
            vmid,
            timeframe,
        };
        match self.call("guest_stats", request).await? {
            BridgeResponse::Stats(stats) => Ok(stats),
            _ => Err(RemoteError::UnexpectedResponse {
                op: "guest_stats",
                expected: "Stats",
            }),
        }
    }
}
