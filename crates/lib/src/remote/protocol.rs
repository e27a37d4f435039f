//! Bridge protocol definitions.
//!
//! Transport-agnostic request/response messages exchanged with the host
//! process. One request maps to one response; correlation is the
//! transport's concern.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{
    BackupJobSpec, BackupOptions, CloneOptions, ClusterResource, ContentKind, Guest, GuestKind,
    MigrateOptions, Node, PowerAction, StatPoint, StorageVolume, TaskRef, Timeframe, User,
    UserPatch, UserSpec, VmConfig, VmConfigPatch, VmCreateSpec, VolumeContent,
};

/// The operator identity as delivered by the bridge.
///
/// Permission values are raw tokens; the access module parses them into the
/// closed privilege vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireIdentity {
    pub userid: String,
    pub permissions: HashMap<String, Vec<String>>,
}

/// Requests that can be sent across the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum BridgeRequest {
    FetchIdentity,
    ListNodes,
    ListClusterResources,
    ListVms {
        node: String,
    },
    ListContainers {
        node: String,
    },
    GetVmConfig {
        node: String,
        vmid: u32,
    },
    UpdateVmConfig {
        node: String,
        vmid: u32,
        patch: VmConfigPatch,
    },
    CreateVm {
        node: String,
        vmid: u32,
        spec: VmCreateSpec,
    },
    DeleteVm {
        node: String,
        vmid: u32,
    },
    CloneVm {
        node: String,
        vmid: u32,
        options: CloneOptions,
    },
    MigrateVm {
        node: String,
        vmid: u32,
        options: MigrateOptions,
    },
    GuestPower {
        node: String,
        vmid: u32,
        kind: GuestKind,
        action: PowerAction,
    },
    ListStorage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        node: Option<String>,
    },
    StorageContent {
        node: String,
        storage: String,
    },
    CreateBackup {
        node: String,
        vmid: u32,
        options: BackupOptions,
    },
    CreateBackupJob {
        job: BackupJobSpec,
    },
    ListUsers,
    CreateUser {
        user: UserSpec,
    },
    UpdateUser {
        userid: String,
        patch: UserPatch,
    },
    DeleteUser {
        userid: String,
    },
    NodeStats {
        node: String,
        timeframe: Timeframe,
    },
    GuestStats {
        node: String,
        vmid: u32,
        timeframe: Timeframe,
    },
}

impl BridgeRequest {
    /// Stable operation name, used for error context and logging.
    pub fn op_name(&self) -> &'static str {
        match self {
            BridgeRequest::FetchIdentity => "fetch_identity",
            BridgeRequest::ListNodes => "list_nodes",
            BridgeRequest::ListClusterResources => "list_cluster_resources",
            BridgeRequest::ListVms { .. } => "list_vms",
            BridgeRequest::ListContainers { .. } => "list_containers",
            BridgeRequest::GetVmConfig { .. } => "get_vm_config",
            BridgeRequest::UpdateVmConfig { .. } => "update_vm_config",
            BridgeRequest::CreateVm { .. } => "create_vm",
            BridgeRequest::DeleteVm { .. } => "delete_vm",
            BridgeRequest::CloneVm { .. } => "clone_vm",
            BridgeRequest::MigrateVm { .. } => "migrate_vm",
            BridgeRequest::GuestPower { .. } => "guest_power",
            BridgeRequest::ListStorage { .. } => "list_storage",
            BridgeRequest::StorageContent { .. } => "storage_content",
            BridgeRequest::CreateBackup { .. } => "create_backup",
            BridgeRequest::CreateBackupJob { .. } => "create_backup_job",
            BridgeRequest::ListUsers => "list_users",
            BridgeRequest::CreateUser { .. } => "create_user",
            BridgeRequest::UpdateUser { .. } => "update_user",
            BridgeRequest::DeleteUser { .. } => "delete_user",
            BridgeRequest::NodeStats { .. } => "node_stats",
            BridgeRequest::GuestStats { .. } => "guest_stats",
        }
    }
}

/// Responses returned across the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BridgeResponse {
    Identity(WireIdentity),
    Nodes(Vec<Node>),
    Resources(Vec<ClusterResource>),
    Guests(Vec<Guest>),
    Config(VmConfig),
    Storage(Vec<StorageVolume>),
    Content(Vec<VolumeContent>),
    Users(Vec<User>),
    Stats(Vec<StatPoint>),
    Task(TaskRef),
    /// Acknowledgment for operations without a payload.
    Ack,
    /// The collaborator rejected the call; the message is display-ready.
    Error(String),
}

/// Narrow `StorageContent` results to one content kind.
pub fn filter_content(content: Vec<VolumeContent>, filter: Option<ContentKind>) -> Vec<VolumeContent> {
    match filter {
        Some(kind) => content.into_iter().filter(|c| c.kind == kind).collect(),
        None => content,
    }
}
