//! Shared test helpers: a scripted in-memory cluster collaborator plus
//! builders for identities and cluster objects.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use virtdeck::model::{
    BackupJobSpec, BackupOptions, CloneOptions, ClusterResource, Guest, GuestKind, GuestStatus,
    MigrateOptions, Node, NodeStatus, PowerAction, StatPoint, StorageVolume, TaskRef, Timeframe,
    User, UserPatch, UserSpec, VmConfig, VmConfigPatch, VmCreateSpec, VolumeContent,
};
use virtdeck::remote::{ClusterProxy, RemoteError, WireIdentity};

/// Message used for every scripted failure.
pub const SCRIPTED_FAILURE: &str = "network unreachable";

#[derive(Default)]
struct MockState {
    calls: Vec<&'static str>,
    fail_ops: HashSet<&'static str>,
    identity: Option<WireIdentity>,
    nodes: Vec<Node>,
    resources: Vec<ClusterResource>,
    /// When non-empty, each cluster-resource call takes the next receiver
    /// and awaits it, letting tests control completion order.
    pending_resources: Vec<oneshot::Receiver<Vec<ClusterResource>>>,
    guests: Vec<Guest>,
    users: Vec<User>,
    storage: Vec<StorageVolume>,
    content: Vec<VolumeContent>,
    stats: Vec<StatPoint>,
    config: VmConfig,
}

/// A scripted [`ClusterProxy`] that records every call.
#[derive(Default)]
pub struct MockProxy {
    state: Mutex<MockState>,
}

impl MockProxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the identity returned by `fetch_identity`.
    pub fn set_identity(&self, userid: &str, grants: &[(&str, &[&str])]) {
        self.state.lock().unwrap().identity = Some(wire_identity(userid, grants));
    }

    /// Script `op` to fail with [`SCRIPTED_FAILURE`].
    pub fn fail_op(&self, op: &'static str) {
        self.state.lock().unwrap().fail_ops.insert(op);
    }

    /// Clear a scripted failure.
    pub fn heal_op(&self, op: &'static str) {
        self.state.lock().unwrap().fail_ops.remove(op);
    }

    pub fn set_nodes(&self, nodes: Vec<Node>) {
        self.state.lock().unwrap().nodes = nodes;
    }

    pub fn set_resources(&self, resources: Vec<ClusterResource>) {
        self.state.lock().unwrap().resources = resources;
    }

    /// Queue a manually-resolved response for one cluster-resource call.
    pub fn defer_resources(&self) -> oneshot::Sender<Vec<ClusterResource>> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().unwrap().pending_resources.push(rx);
        tx
    }

    pub fn set_guests(&self, guests: Vec<Guest>) {
        self.state.lock().unwrap().guests = guests;
    }

    pub fn set_users(&self, users: Vec<User>) {
        self.state.lock().unwrap().users = users;
    }

    /// Number of calls recorded for `op`.
    pub fn calls_of(&self, op: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| **c == op)
            .count()
    }

    fn begin(&self, op: &'static str) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op);
        if state.fail_ops.contains(op) {
            Err(RemoteError::CallFailed {
                op,
                reason: SCRIPTED_FAILURE.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ClusterProxy for MockProxy {
    async fn fetch_identity(&self) -> Result<WireIdentity, RemoteError> {
        self.begin("fetch_identity")?;
        self.state
            .lock()
            .unwrap()
            .identity
            .clone()
            .ok_or(RemoteError::CallFailed {
                op: "fetch_identity",
                reason: SCRIPTED_FAILURE.to_string(),
            })
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, RemoteError> {
        self.begin("list_nodes")?;
        Ok(self.state.lock().unwrap().nodes.clone())
    }

    async fn list_cluster_resources(&self) -> Result<Vec<ClusterResource>, RemoteError> {
        self.begin("list_cluster_resources")?;
        let pending = {
            let mut state = self.state.lock().unwrap();
            if state.pending_resources.is_empty() {
                None
            } else {
                Some(state.pending_resources.remove(0))
            }
        };
        match pending {
            Some(rx) => rx.await.map_err(|_| RemoteError::CallFailed {
                op: "list_cluster_resources",
                reason: "response channel dropped".to_string(),
            }),
            None => Ok(self.state.lock().unwrap().resources.clone()),
        }
    }

    async fn list_vms(&self, _node: &str) -> Result<Vec<Guest>, RemoteError> {
        self.begin("list_vms")?;
        let guests = self.state.lock().unwrap().guests.clone();
        Ok(guests
            .into_iter()
            .filter(|g| g.kind == GuestKind::Vm)
            .collect())
    }

    async fn list_containers(&self, _node: &str) -> Result<Vec<Guest>, RemoteError> {
        self.begin("list_containers")?;
        let guests = self.state.lock().unwrap().guests.clone();
        Ok(guests
            .into_iter()
            .filter(|g| g.kind == GuestKind::Container)
            .collect())
    }

    async fn get_vm_config(&self, _node: &str, _vmid: u32) -> Result<VmConfig, RemoteError> {
        self.begin("get_vm_config")?;
        Ok(self.state.lock().unwrap().config.clone())
    }

    async fn update_vm_config(
        &self,
        _node: &str,
        _vmid: u32,
        _patch: &VmConfigPatch,
    ) -> Result<(), RemoteError> {
        self.begin("update_vm_config")
    }

    async fn create_vm(
        &self,
        _node: &str,
        _vmid: u32,
        _spec: &VmCreateSpec,
    ) -> Result<TaskRef, RemoteError> {
        self.begin("create_vm")?;
        Ok(TaskRef::new("UPID:mock:create"))
    }

    async fn delete_vm(&self, _node: &str, _vmid: u32) -> Result<TaskRef, RemoteError> {
        self.begin("delete_vm")?;
        Ok(TaskRef::new("UPID:mock:delete"))
    }

    async fn clone_vm(
        &self,
        _node: &str,
        _vmid: u32,
        _options: &CloneOptions,
    ) -> Result<TaskRef, RemoteError> {
        self.begin("clone_vm")?;
        Ok(TaskRef::new("UPID:mock:clone"))
    }

    async fn migrate_vm(
        &self,
        _node: &str,
        _vmid: u32,
        _options: &MigrateOptions,
    ) -> Result<TaskRef, RemoteError> {
        self.begin("migrate_vm")?;
        Ok(TaskRef::new("UPID:mock:migrate"))
    }

    async fn guest_power(
        &self,
        _node: &str,
        _vmid: u32,
        _kind: GuestKind,
        _action: PowerAction,
    ) -> Result<(), RemoteError> {
        self.begin("guest_power")
    }

    async fn list_storage(&self, _node: Option<&str>) -> Result<Vec<StorageVolume>, RemoteError> {
        self.begin("list_storage")?;
        Ok(self.state.lock().unwrap().storage.clone())
    }

    async fn storage_content(
        &self,
        _node: &str,
        _storage: &str,
    ) -> Result<Vec<VolumeContent>, RemoteError> {
        self.begin("storage_content")?;
        Ok(self.state.lock().unwrap().content.clone())
    }

    async fn create_backup(
        &self,
        _node: &str,
        _vmid: u32,
        _options: &BackupOptions,
    ) -> Result<TaskRef, RemoteError> {
        self.begin("create_backup")?;
        Ok(TaskRef::new("UPID:mock:backup"))
    }

    async fn create_backup_job(&self, _job: &BackupJobSpec) -> Result<TaskRef, RemoteError> {
        self.begin("create_backup_job")?;
        Ok(TaskRef::new("UPID:mock:backupjob"))
    }

    async fn list_users(&self) -> Result<Vec<User>, RemoteError> {
        self.begin("list_users")?;
        Ok(self.state.lock().unwrap().users.clone())
    }

    async fn create_user(&self, _user: &UserSpec) -> Result<(), RemoteError> {
        self.begin("create_user")
    }

    async fn update_user(&self, _userid: &str, _patch: &UserPatch) -> Result<(), RemoteError> {
        self.begin("update_user")
    }

    async fn delete_user(&self, _userid: &str) -> Result<(), RemoteError> {
        self.begin("delete_user")
    }

    async fn node_stats(
        &self,
        _node: &str,
        _timeframe: Timeframe,
    ) -> Result<Vec<StatPoint>, RemoteError> {
        self.begin("node_stats")?;
        Ok(self.state.lock().unwrap().stats.clone())
    }

    async fn guest_stats(
        &self,
        _node: &str,
        _vmid: u32,
        _timeframe: Timeframe,
    ) -> Result<Vec<StatPoint>, RemoteError> {
        self.begin("guest_stats")?;
        Ok(self.state.lock().unwrap().stats.clone())
    }
}

/// Build a wire identity from `(path, tokens)` grant pairs.
pub fn wire_identity(userid: &str, grants: &[(&str, &[&str])]) -> WireIdentity {
    let mut permissions = HashMap::new();
    for (path, tokens) in grants {
        permissions.insert(
            path.to_string(),
            tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
        );
    }
    WireIdentity {
        userid: userid.to_string(),
        permissions,
    }
}

pub fn online_node(id: &str) -> Node {
    Node {
        id: id.to_string(),
        status: NodeStatus::Online,
        cpu_fraction: 0.1,
        mem_used: 4 << 30,
        mem_max: 32 << 30,
        disk_used: 100 << 30,
        disk_max: 500 << 30,
        uptime_secs: 86_400,
    }
}

pub fn guest(vmid: u32, node: &str, kind: GuestKind, status: GuestStatus) -> Guest {
    Guest {
        vmid,
        node: node.to_string(),
        kind,
        status,
        name: None,
        cpu_count: 2,
        mem_max: 2 << 30,
        disk_max: 32 << 30,
        uptime_secs: 0,
    }
}

pub fn running_vm_resource(vmid: u32, node: &str) -> ClusterResource {
    ClusterResource::Vm {
        guest: guest(vmid, node, GuestKind::Vm, GuestStatus::Running),
    }
}

/// Poll `condition` until it holds, failing the test after ~2 seconds.
pub async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for: {what}");
}
