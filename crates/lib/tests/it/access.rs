//! Identity loading and permission evaluation through the facade.

use std::sync::Arc;

use virtdeck::Console;

use crate::helpers::MockProxy;

#[tokio::test]
async fn failed_identity_load_fails_closed() {
    // No identity scripted: the fetch fails.
    let proxy = Arc::new(MockProxy::new());
    let console = Console::connect(proxy.clone()).await;

    assert!(console.identity().await.is_none());
    assert_eq!(proxy.calls_of("fetch_identity"), 1);

    // Every action is denied locally; the collaborator is never invoked.
    let err = console.vm_stop("pve1", 101).await.unwrap_err();
    assert!(err.is_permission_denied());
    assert_eq!(proxy.calls_of("guest_power"), 0);
}

#[tokio::test]
async fn superuser_identity_bypasses_all_checks() {
    let proxy = Arc::new(MockProxy::new());
    proxy.set_identity("root@pam", &[]);
    let console = Console::connect(proxy.clone()).await;

    assert!(console.vm_stop("pve1", 101).await.is_ok());
    assert!(console.delete_user("alice@pve").await.is_ok());
    assert_eq!(proxy.calls_of("guest_power"), 1);
    assert_eq!(proxy.calls_of("delete_user"), 1);
}

#[tokio::test]
async fn reload_replaces_identity_wholesale() {
    let proxy = Arc::new(MockProxy::new());
    proxy.set_identity("alice@pve", &[("/vms/101", &["VM.PowerMgmt"])]);
    let console = Console::connect(proxy.clone()).await;
    assert!(console.vm_stop("pve1", 101).await.is_ok());

    // Reconnect as an identity with entirely different grants. The old
    // grant must not survive; there is no merge.
    proxy.set_identity("bob@pve", &[("/vms/202", &["VM.PowerMgmt"])]);
    assert!(console.reload_identity().await);

    let err = console.vm_stop("pve1", 101).await.unwrap_err();
    assert!(err.is_permission_denied());
    assert!(console.vm_stop("pve1", 202).await.is_ok());
}

#[tokio::test]
async fn failed_reload_leaves_identity_absent() {
    let proxy = Arc::new(MockProxy::new());
    proxy.set_identity("alice@pve", &[("/vms/101", &["VM.PowerMgmt"])]);
    let console = Console::connect(proxy.clone()).await;
    assert!(console.identity().await.is_some());

    proxy.fail_op("fetch_identity");
    assert!(!console.reload_identity().await);

    // No stale identity survives a failed reconnect.
    assert!(console.identity().await.is_none());
    let err = console.vm_stop("pve1", 101).await.unwrap_err();
    assert!(err.is_permission_denied());
}

#[tokio::test]
async fn disconnect_discards_identity() {
    let proxy = Arc::new(MockProxy::new());
    proxy.set_identity("root@pam", &[]);
    let console = Console::connect(proxy.clone()).await;
    assert!(console.identity().await.is_some());

    console.disconnect().await;
    assert!(console.identity().await.is_none());
    assert!(console.vm_stop("pve1", 101).await.is_err());
}

#[tokio::test]
async fn malformed_identity_is_treated_as_absent() {
    let proxy = Arc::new(MockProxy::new());
    proxy.set_identity("alice", &[("/vms/101", &["VM.PowerMgmt"])]);
    let console = Console::connect(proxy.clone()).await;

    // "alice" carries no realm; the payload is unusable and checks fail
    // closed.
    assert!(console.identity().await.is_none());
    assert!(console.vm_stop("pve1", 101).await.is_err());
}
