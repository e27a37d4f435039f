//! Typed argument structs for mutating operations.
//!
//! Every create/update operation takes one of these explicit structs instead
//! of an open-ended configuration bag. Validation happens in the dispatcher
//! before any remote call.

use serde::{Deserialize, Serialize};

/// Arguments for creating a virtual machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmCreateSpec {
    pub name: String,
    pub cores: u32,
    pub memory_mb: u64,
    /// Storage pool to allocate the boot disk on
    pub storage: String,
    pub disk_gb: u64,
}

/// A partial update of guest configuration. `None` fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VmConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_mb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VmConfigPatch {
    /// Whether the patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cores.is_none()
            && self.memory_mb.is_none()
            && self.description.is_none()
    }
}

/// Arguments for cloning a guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloneOptions {
    pub target_vmid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Full clone instead of a linked clone
    #[serde(default)]
    pub full: bool,
}

/// Arguments for migrating a guest to another node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrateOptions {
    pub target_node: String,
    /// Live-migrate without stopping the guest
    #[serde(default)]
    pub online: bool,
}

/// Arguments for a one-off guest backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupOptions {
    /// Storage pool receiving the archive
    pub storage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Definition of a recurring backup job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupJobSpec {
    /// Schedule expression, e.g. "mon..fri 02:00"
    pub schedule: String,
    pub storage: String,
    pub vmids: Vec<u32>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Arguments for creating a user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSpec {
    pub userid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default = "default_enabled")]
    pub enable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<i64>,
}

/// A partial update of a user account. `None` fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<i64>,
}

impl UserPatch {
    /// Whether the patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.comment.is_none() && self.enable.is_none() && self.expire.is_none()
    }
}
