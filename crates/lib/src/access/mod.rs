//! Path-based authorization for cluster operations.
//!
//! Grants are keyed by hierarchical resource paths (`/vms/101`,
//! `/nodes/pve1`); a privilege granted at a path also covers every
//! descendant path. Evaluation is pure, performs no I/O, and fails closed
//! whenever no identity is loaded.

mod errors;
mod evaluator;
mod loader;
mod types;

pub use errors::AccessError;
pub use evaluator::has_permission;
pub use loader::IdentityLoader;
pub use types::{Identity, PermissionMap, Privilege, SUPERUSER_ID, UserId};
