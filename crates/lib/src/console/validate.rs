//! Validation of typed operation arguments.
//!
//! Every mutating operation validates its argument struct here before the
//! permission check or any remote call. A violation is a
//! [`ConsoleError::InvalidSpec`].

use crate::access::UserId;
use crate::console::ConsoleError;
use crate::model::{
    BackupJobSpec, BackupOptions, CloneOptions, MigrateOptions, UserPatch, UserSpec, VmConfigPatch,
    VmCreateSpec,
};

fn invalid(what: &'static str, reason: impl Into<String>) -> ConsoleError {
    ConsoleError::InvalidSpec {
        what,
        reason: reason.into(),
    }
}

pub(crate) fn vm_create(spec: &VmCreateSpec) -> Result<(), ConsoleError> {
    const WHAT: &str = "VM create spec";
    if spec.name.trim().is_empty() {
        return Err(invalid(WHAT, "name must not be empty"));
    }
    if spec.cores == 0 {
        return Err(invalid(WHAT, "cores must be at least 1"));
    }
    if spec.memory_mb < 16 {
        return Err(invalid(WHAT, "memory must be at least 16 MiB"));
    }
    if spec.storage.trim().is_empty() {
        return Err(invalid(WHAT, "storage must not be empty"));
    }
    if spec.disk_gb == 0 {
        return Err(invalid(WHAT, "disk size must be at least 1 GiB"));
    }
    Ok(())
}

pub(crate) fn vm_config_patch(patch: &VmConfigPatch) -> Result<(), ConsoleError> {
    const WHAT: &str = "VM config patch";
    if patch.is_empty() {
        return Err(invalid(WHAT, "patch changes nothing"));
    }
    if patch.cores == Some(0) {
        return Err(invalid(WHAT, "cores must be at least 1"));
    }
    if patch.memory_mb.is_some_and(|m| m < 16) {
        return Err(invalid(WHAT, "memory must be at least 16 MiB"));
    }
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(invalid(WHAT, "name must not be empty"));
    }
    Ok(())
}

pub(crate) fn clone_options(source_vmid: u32, options: &CloneOptions) -> Result<(), ConsoleError> {
    const WHAT: &str = "clone options";
    if options.target_vmid == 0 {
        return Err(invalid(WHAT, "target vmid must be non-zero"));
    }
    if options.target_vmid == source_vmid {
        return Err(invalid(WHAT, "target vmid must differ from the source"));
    }
    if options.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(invalid(WHAT, "name must not be empty"));
    }
    Ok(())
}

pub(crate) fn migrate_options(
    source_node: &str,
    options: &MigrateOptions,
) -> Result<(), ConsoleError> {
    const WHAT: &str = "migrate options";
    if options.target_node.trim().is_empty() {
        return Err(invalid(WHAT, "target node must not be empty"));
    }
    if options.target_node == source_node {
        return Err(invalid(WHAT, "target node must differ from the source"));
    }
    Ok(())
}

pub(crate) fn backup_options(options: &BackupOptions) -> Result<(), ConsoleError> {
    if options.storage.trim().is_empty() {
        return Err(invalid("backup options", "storage must not be empty"));
    }
    Ok(())
}

pub(crate) fn backup_job(job: &BackupJobSpec) -> Result<(), ConsoleError> {
    const WHAT: &str = "backup job";
    if job.schedule.trim().is_empty() {
        return Err(invalid(WHAT, "schedule must not be empty"));
    }
    if job.storage.trim().is_empty() {
        return Err(invalid(WHAT, "storage must not be empty"));
    }
    if job.vmids.is_empty() {
        return Err(invalid(WHAT, "at least one guest must be selected"));
    }
    Ok(())
}

pub(crate) fn user_spec(user: &UserSpec) -> Result<(), ConsoleError> {
    UserId::parse(user.userid.as_str())
        .map(|_| ())
        .map_err(|e| invalid("user spec", e.to_string()))
}

pub(crate) fn user_patch(patch: &UserPatch) -> Result<(), ConsoleError> {
    if patch.is_empty() {
        return Err(invalid("user patch", "patch changes nothing"));
    }
    Ok(())
}
