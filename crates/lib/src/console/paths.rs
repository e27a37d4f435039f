//! Path construction rules for permission checks.
//!
//! Fixed by object type: guests live under `/vms`, node-scoped audits under
//! `/nodes`, storage under `/storage`, and cluster-wide administrative
//! objects at fixed paths.

/// Root for node-scoped and cluster-wide audit checks.
pub(crate) const ROOT_NODES: &str = "/nodes";

/// Root for storage listings not scoped to one pool.
pub(crate) const ROOT_STORAGE: &str = "/storage";

/// User administration.
pub(crate) const ACCESS_USERS: &str = "/access/users";

/// Backup-job administration.
pub(crate) const CLUSTER_BACKUP: &str = "/cluster/backup";

/// Permission path of a guest (VM or container).
pub(crate) fn guest(vmid: u32) -> String {
    format!("/vms/{vmid}")
}

/// Permission path of a node.
pub(crate) fn node(node: &str) -> String {
    format!("/nodes/{node}")
}

/// Permission path of a storage pool.
pub(crate) fn storage(storage: &str) -> String {
    format!("/storage/{storage}")
}
