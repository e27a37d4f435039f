//! Identity and privilege types for the authorization system.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::access::AccessError;

/// The reserved account that bypasses all permission checks.
pub const SUPERUSER_ID: &str = "root@pam";

/// Privilege tokens understood by the permission evaluator.
///
/// The vocabulary is closed: introducing a new capability requires a new
/// token here plus a matching path-construction rule in the dispatcher and
/// on the server side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    /// View guests and their status
    VmAudit,
    /// Start/stop/reboot/suspend/resume/shutdown/reset guests
    VmPowerMgmt,
    /// Read and modify guest configuration
    VmConfig,
    /// Create and delete guests
    VmAllocate,
    /// Migrate guests between nodes
    VmMigrate,
    /// Clone guests
    VmClone,
    /// Create guest backups
    VmBackup,
    /// View storage pools and their content
    DatastoreAudit,
    /// View nodes, cluster resources and system statistics
    SysAudit,
    /// Modify cluster-wide system configuration (e.g. backup jobs)
    SysModify,
    /// Create, update and delete user accounts
    UserModify,
}

impl Privilege {
    /// The wire token for this privilege, as used in permission maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Privilege::VmAudit => "VM.Audit",
            Privilege::VmPowerMgmt => "VM.PowerMgmt",
            Privilege::VmConfig => "VM.Config",
            Privilege::VmAllocate => "VM.Allocate",
            Privilege::VmMigrate => "VM.Migrate",
            Privilege::VmClone => "VM.Clone",
            Privilege::VmBackup => "VM.Backup",
            Privilege::DatastoreAudit => "Datastore.Audit",
            Privilege::SysAudit => "Sys.Audit",
            Privilege::SysModify => "Sys.Modify",
            Privilege::UserModify => "User.Modify",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Privilege {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VM.Audit" => Ok(Privilege::VmAudit),
            "VM.PowerMgmt" => Ok(Privilege::VmPowerMgmt),
            "VM.Config" => Ok(Privilege::VmConfig),
            "VM.Allocate" => Ok(Privilege::VmAllocate),
            "VM.Migrate" => Ok(Privilege::VmMigrate),
            "VM.Clone" => Ok(Privilege::VmClone),
            "VM.Backup" => Ok(Privilege::VmBackup),
            "Datastore.Audit" => Ok(Privilege::DatastoreAudit),
            "Sys.Audit" => Ok(Privilege::SysAudit),
            "Sys.Modify" => Ok(Privilege::SysModify),
            "User.Modify" => Ok(Privilege::UserModify),
            _ => Err(AccessError::UnknownPrivilege {
                value: s.to_string(),
            }),
        }
    }
}

/// An operator account identifier in `user@realm` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId {
    full: String,
    at: usize,
}

impl UserId {
    /// Parse a `user@realm` identifier.
    ///
    /// Both the user and realm parts must be non-empty.
    pub fn parse(s: impl Into<String>) -> Result<Self, AccessError> {
        let full = s.into();
        let at = full.find('@').ok_or_else(|| AccessError::MalformedIdentity {
            reason: format!("userid '{full}' is missing a realm"),
        })?;
        if at == 0 || at + 1 == full.len() {
            return Err(AccessError::MalformedIdentity {
                reason: format!("userid '{full}' has an empty user or realm part"),
            });
        }
        Ok(Self { full, at })
    }

    /// The full `user@realm` identifier.
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// The account name without the realm.
    pub fn user(&self) -> &str {
        &self.full[..self.at]
    }

    /// The authentication realm.
    pub fn realm(&self) -> &str {
        &self.full[self.at + 1..]
    }

    /// Whether this is the reserved superuser account.
    pub fn is_superuser(&self) -> bool {
        self.full == SUPERUSER_ID
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for UserId {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Canonical-path-keyed privilege grants.
pub type PermissionMap = HashMap<String, HashSet<Privilege>>;

/// The current operator: who they are and what they were granted.
///
/// An identity is created once per successful connection, replaced wholesale
/// on reconnect and discarded on disconnect. It is shared read-only; nothing
/// ever mutates a live identity.
#[derive(Debug, Clone)]
pub struct Identity {
    userid: UserId,
    permissions: PermissionMap,
}

impl Identity {
    /// Build an identity from an already-typed permission map.
    ///
    /// Grant keys are canonicalized (`//vms//101/` becomes `/vms/101`).
    /// Grants keyed at the root are dropped: the root is never a grantable
    /// path.
    pub fn new(userid: UserId, permissions: PermissionMap) -> Self {
        let permissions = permissions
            .into_iter()
            .filter_map(|(path, privileges)| canonical_path(&path).map(|p| (p, privileges)))
            .collect();
        Self {
            userid,
            permissions,
        }
    }

    /// Build an identity from the raw wire payload.
    ///
    /// Unknown privilege tokens are skipped (deny-safe); a userid without a
    /// realm is rejected.
    pub fn from_wire(
        userid: &str,
        grants: &HashMap<String, Vec<String>>,
    ) -> Result<Self, AccessError> {
        let userid = UserId::parse(userid)?;
        let mut permissions = PermissionMap::new();
        for (path, tokens) in grants {
            let mut privileges = HashSet::new();
            for token in tokens {
                match token.parse::<Privilege>() {
                    Ok(privilege) => {
                        privileges.insert(privilege);
                    }
                    Err(_) => {
                        debug!(token = %token, path = %path, "skipping unknown privilege token");
                    }
                }
            }
            permissions.insert(path.clone(), privileges);
        }
        Ok(Self::new(userid, permissions))
    }

    /// The operator's account identifier.
    pub fn userid(&self) -> &UserId {
        &self.userid
    }

    /// Whether this identity bypasses all permission checks.
    pub fn is_superuser(&self) -> bool {
        self.userid.is_superuser()
    }

    /// Whether `privilege` is granted at exactly `path` (no ancestor walk).
    pub(crate) fn grants_at(&self, path: &str, privilege: Privilege) -> bool {
        self.permissions
            .get(path)
            .is_some_and(|set| set.contains(&privilege))
    }
}

/// Normalize a path to `/seg/seg` form, skipping empty segments.
///
/// Returns `None` for paths with no segments at all (the root).
pub(crate) fn canonical_path(path: &str) -> Option<String> {
    let mut canonical = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        canonical.push('/');
        canonical.push_str(segment);
    }
    if canonical.is_empty() {
        None
    } else {
        Some(canonical)
    }
}
