//! The permission evaluator.
//!
//! A single pure function over an identity's granted-privilege map. A grant
//! anywhere on the path chain is sufficient; there is no explicit-deny
//! concept, so absence of a grant at one level only continues the walk
//! upward.

use crate::access::types::canonical_path;
use crate::access::{Identity, Privilege};

/// Evaluate whether `identity` may exercise `privilege` on `path`.
///
/// The check proceeds in order:
/// 1. No identity loaded: deny (fail closed).
/// 2. Superuser: allow unconditionally.
/// 3. Exact path grant, then ancestor grants from the immediate parent up
///    to, but never including, the root; the first grant wins.
///
/// Malformed paths (empty, doubled or trailing slashes) are normalized by
/// skipping empty segments; a path with no segments is denied for everyone
/// but the superuser. This function performs no I/O and cannot fail.
pub fn has_permission(identity: Option<&Identity>, path: &str, privilege: Privilege) -> bool {
    let Some(identity) = identity else {
        return false;
    };
    if identity.is_superuser() {
        return true;
    }
    let Some(full) = canonical_path(path) else {
        return false;
    };

    // Exact path first, then each proper ancestor from nearest to farthest.
    let mut candidate = full.as_str();
    loop {
        if identity.grants_at(candidate, privilege) {
            return true;
        }
        match candidate.rfind('/') {
            Some(cut) if cut > 0 => candidate = &candidate[..cut],
            _ => return false,
        }
    }
}
