//! Cluster object snapshots.
//!
//! Every type here is an immutable value snapshot: each refresh produces a
//! brand-new snapshot set that atomically replaces the prior one. Nothing
//! ever mutates a live snapshot object in place.

mod specs;

pub use specs::{
    BackupJobSpec, BackupOptions, CloneOptions, MigrateOptions, UserPatch, UserSpec, VmConfigPatch,
    VmCreateSpec,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reachability of a cluster host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Online,
    Offline,
}

/// A cluster host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub status: NodeStatus,
    /// CPU usage as a fraction in `[0, 1]`
    #[serde(default)]
    pub cpu_fraction: f64,
    #[serde(default)]
    pub mem_used: u64,
    #[serde(default)]
    pub mem_max: u64,
    #[serde(default)]
    pub disk_used: u64,
    #[serde(default)]
    pub disk_max: u64,
    #[serde(default)]
    pub uptime_secs: u64,
}

impl Node {
    /// Whether the host currently answers cluster traffic.
    pub fn is_online(&self) -> bool {
        self.status == NodeStatus::Online
    }
}

/// Discriminates the two guest flavours, which share one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestKind {
    Vm,
    #[serde(rename = "lxc")]
    Container,
}

impl GuestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuestKind::Vm => "vm",
            GuestKind::Container => "lxc",
        }
    }
}

impl fmt::Display for GuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run state of a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestStatus {
    Running,
    Stopped,
    Suspended,
}

/// A virtual machine or container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub vmid: u32,
    pub node: String,
    pub kind: GuestKind,
    pub status: GuestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub cpu_count: u32,
    #[serde(default)]
    pub mem_max: u64,
    #[serde(default)]
    pub disk_max: u64,
    #[serde(default)]
    pub uptime_secs: u64,
}

impl Guest {
    pub fn is_running(&self) -> bool {
        self.status == GuestStatus::Running
    }
}

/// A storage pool or volume visible to the cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageVolume {
    pub id: String,
    /// Owning node; `None` for cluster-wide storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    /// Backend kind, e.g. "dir", "lvm", "nfs"
    pub kind: String,
    #[serde(default)]
    pub used_bytes: u64,
    #[serde(default)]
    pub total_bytes: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub shared: bool,
}

fn default_true() -> bool {
    true
}

impl StorageVolume {
    /// Used fraction in `[0, 1]`; zero-capacity volumes report 0.
    pub fn usage_fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f64 / self.total_bytes as f64
        }
    }
}

/// One entry of the mixed cluster-resource listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClusterResource {
    Node {
        #[serde(flatten)]
        node: Node,
    },
    Vm {
        #[serde(flatten)]
        guest: Guest,
    },
    Lxc {
        #[serde(flatten)]
        guest: Guest,
    },
    Storage {
        #[serde(flatten)]
        volume: StorageVolume,
    },
}

/// A point-in-time view of every cluster object, built from one
/// cluster-resource listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterSnapshot {
    pub nodes: Vec<Node>,
    pub guests: Vec<Guest>,
    pub storage: Vec<StorageVolume>,
}

impl ClusterSnapshot {
    /// Ingest a mixed resource listing into typed collections.
    ///
    /// The listing's tag is authoritative for the guest kind.
    pub fn from_resources(resources: Vec<ClusterResource>) -> Self {
        let mut snapshot = Self::default();
        for resource in resources {
            match resource {
                ClusterResource::Node { node } => snapshot.nodes.push(node),
                ClusterResource::Vm { mut guest } => {
                    guest.kind = GuestKind::Vm;
                    snapshot.guests.push(guest);
                }
                ClusterResource::Lxc { mut guest } => {
                    guest.kind = GuestKind::Container;
                    snapshot.guests.push(guest);
                }
                ClusterResource::Storage { volume } => snapshot.storage.push(volume),
            }
        }
        snapshot
    }
}

/// A user account known to the cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub userid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default = "default_true")]
    pub enable: bool,
    /// Expiry as seconds since the Unix epoch; `None` never expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<i64>,
}

/// Guest configuration as reported by the cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_mb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One sample of a node or guest time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatPoint {
    /// Sample time as seconds since the Unix epoch
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netin: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netout: Option<u64>,
}

/// Aggregation window for statistics queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Hour => "hour",
            Timeframe::Day => "day",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Year => "year",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a storage volume item contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Images,
    Iso,
    Backup,
    Template,
}

/// One item inside a storage volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeContent {
    pub volid: String,
    pub kind: ContentKind,
    #[serde(default)]
    pub size_bytes: u64,
}

/// Power transitions a guest supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    Start,
    Stop,
    Reboot,
    Suspend,
    Resume,
    Shutdown,
    Reset,
}

impl PowerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerAction::Start => "start",
            PowerAction::Stop => "stop",
            PowerAction::Reboot => "reboot",
            PowerAction::Suspend => "suspend",
            PowerAction::Resume => "resume",
            PowerAction::Shutdown => "shutdown",
            PowerAction::Reset => "reset",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle to a long-running remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskRef(String);

impl TaskRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
