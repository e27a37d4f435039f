//! Backup and user administration.
//!
//! Administrative mutations propagate failures like any other mutation, but
//! none of them touch the cluster snapshot, so they schedule no refresh.

use tracing::{debug, warn};

use super::{Console, paths, validate};
use crate::Result;
use crate::access::Privilege;
use crate::model::{BackupJobSpec, BackupOptions, TaskRef, User, UserPatch, UserSpec};

impl Console {
    /// Back up one guest now.
    ///
    /// Requires `VM.Backup` on the guest path.
    pub async fn create_backup(
        &self,
        node: &str,
        vmid: u32,
        options: &BackupOptions,
    ) -> Result<TaskRef> {
        self.begin_attempt().await;
        validate::backup_options(options)?;
        self.authorize(&paths::guest(vmid), Privilege::VmBackup)
            .await?;

        match self.proxy().create_backup(node, vmid, options).await {
            Ok(task) => {
                debug!(node, vmid, task = %task, "backup accepted");
                Ok(task)
            }
            Err(err) => {
                self.record_remote_error(&err).await;
                Err(err.into())
            }
        }
    }

    /// Create a recurring backup job.
    ///
    /// Requires `Sys.Modify` on `/cluster/backup`.
    pub async fn create_backup_job(&self, job: &BackupJobSpec) -> Result<TaskRef> {
        self.begin_attempt().await;
        validate::backup_job(job)?;
        self.authorize(paths::CLUSTER_BACKUP, Privilege::SysModify)
            .await?;

        match self.proxy().create_backup_job(job).await {
            Ok(task) => {
                debug!(schedule = %job.schedule, guests = job.vmids.len(), "backup job accepted");
                Ok(task)
            }
            Err(err) => {
                self.record_remote_error(&err).await;
                Err(err.into())
            }
        }
    }

    /// List user accounts.
    ///
    /// Requires `Sys.Audit` on `/access/users`. Informational: any failure
    /// yields an empty list and only sets the shared error field.
    pub async fn list_users(&self) -> Vec<User> {
        self.begin_attempt().await;
        if !self
            .authorize_read(paths::ACCESS_USERS, Privilege::SysAudit)
            .await
        {
            return Vec::new();
        }
        match self.proxy().list_users().await {
            Ok(users) => users,
            Err(err) => {
                warn!(error = %err, "user listing failed");
                self.record_remote_error(&err).await;
                Vec::new()
            }
        }
    }

    /// Create a user account.
    ///
    /// Requires `User.Modify` on `/access/users`.
    pub async fn create_user(&self, user: &UserSpec) -> Result<()> {
        self.begin_attempt().await;
        validate::user_spec(user)?;
        self.authorize(paths::ACCESS_USERS, Privilege::UserModify)
            .await?;

        match self.proxy().create_user(user).await {
            Ok(()) => {
                debug!(userid = %user.userid, "user created");
                Ok(())
            }
            Err(err) => {
                self.record_remote_error(&err).await;
                Err(err.into())
            }
        }
    }

    /// Update a user account.
    ///
    /// Requires `User.Modify` on `/access/users`.
    pub async fn update_user(&self, userid: &str, patch: &UserPatch) -> Result<()> {
        self.begin_attempt().await;
        validate::user_patch(patch)?;
        self.authorize(paths::ACCESS_USERS, Privilege::UserModify)
            .await?;

        match self.proxy().update_user(userid, patch).await {
            Ok(()) => {
                debug!(userid, "user updated");
                Ok(())
            }
            Err(err) => {
                self.record_remote_error(&err).await;
                Err(err.into())
            }
        }
    }

    /// Delete a user account.
    ///
    /// Requires `User.Modify` on `/access/users`.
    pub async fn delete_user(&self, userid: &str) -> Result<()> {
        self.begin_attempt().await;
        self.authorize(paths::ACCESS_USERS, Privilege::UserModify)
            .await?;

        match self.proxy().delete_user(userid).await {
            Ok(()) => {
                debug!(userid, "user deleted");
                Ok(())
            }
            Err(err) => {
                self.record_remote_error(&err).await;
                Err(err.into())
            }
        }
    }
}
