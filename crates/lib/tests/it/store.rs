//! Snapshot store behavior: wholesale replacement, staleness on failure,
//! phase tracking and the last-write-wins overlap policy.

use std::sync::Arc;

use virtdeck::model::{ClusterResource, GuestKind, GuestStatus};
use virtdeck::store::{LoadPhase, ResourceStore};

use crate::helpers::{MockProxy, SCRIPTED_FAILURE, guest, online_node, running_vm_resource, wait_until};

#[tokio::test]
async fn refresh_replaces_snapshot_wholesale() {
    let proxy = Arc::new(MockProxy::new());
    proxy.set_resources(vec![running_vm_resource(101, "pve1")]);
    let store = ResourceStore::new(proxy.clone());

    assert_eq!(store.cluster_phase().await, LoadPhase::Idle);
    store.refresh_cluster_resources().await;
    assert_eq!(store.cluster_phase().await, LoadPhase::Ready);

    let vms = store.vms().await;
    assert_eq!(vms.len(), 1);
    assert_eq!(vms[0].vmid, 101);
    assert_eq!(vms[0].status, GuestStatus::Running);

    // A refresh resolving with an empty listing fully replaces the
    // snapshot; nothing is merged.
    proxy.set_resources(Vec::new());
    store.refresh_cluster_resources().await;
    assert!(store.vms().await.is_empty());
    assert!(store.snapshot().await.guests.is_empty());
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let proxy = Arc::new(MockProxy::new());
    proxy.set_resources(vec![running_vm_resource(101, "pve1")]);
    let store = ResourceStore::new(proxy.clone());

    store.refresh_cluster_resources().await;
    assert_eq!(store.vms().await.len(), 1);

    proxy.fail_op("list_cluster_resources");
    store.refresh_cluster_resources().await;

    // Stale-but-available: last-known-good data plus an error banner.
    assert_eq!(store.cluster_phase().await, LoadPhase::Failed);
    assert_eq!(store.vms().await.len(), 1);
    assert!(
        store
            .last_error()
            .await
            .unwrap()
            .contains(SCRIPTED_FAILURE)
    );
    assert!(!store.is_loading().await);

    // The next attempt clears the error and recovers.
    proxy.heal_op("list_cluster_resources");
    store.refresh_cluster_resources().await;
    assert_eq!(store.cluster_phase().await, LoadPhase::Ready);
    assert!(store.last_error().await.is_none());
}

#[tokio::test]
async fn node_refresh_is_independent_of_cluster_refresh() {
    let proxy = Arc::new(MockProxy::new());
    proxy.set_nodes(vec![online_node("pve1"), online_node("pve2")]);
    let store = ResourceStore::new(proxy.clone());

    store.refresh_nodes().await;
    assert_eq!(store.nodes_phase().await, LoadPhase::Ready);
    assert_eq!(store.cluster_phase().await, LoadPhase::Idle);
    assert_eq!(store.nodes().await.len(), 2);
}

#[tokio::test]
async fn derived_views_scope_by_kind_and_node() {
    let proxy = Arc::new(MockProxy::new());
    proxy.set_resources(vec![
        running_vm_resource(101, "pve1"),
        running_vm_resource(102, "pve2"),
        ClusterResource::Lxc {
            guest: guest(200, "pve1", GuestKind::Container, GuestStatus::Stopped),
        },
        ClusterResource::Storage {
            volume: virtdeck::model::StorageVolume {
                id: "local".to_string(),
                node: Some("pve1".to_string()),
                kind: "dir".to_string(),
                used_bytes: 1,
                total_bytes: 10,
                enabled: true,
                shared: false,
            },
        },
        ClusterResource::Storage {
            volume: virtdeck::model::StorageVolume {
                id: "ceph".to_string(),
                node: None,
                kind: "rbd".to_string(),
                used_bytes: 5,
                total_bytes: 10,
                enabled: true,
                shared: true,
            },
        },
    ]);
    let store = ResourceStore::new(proxy.clone());
    store.refresh_cluster_resources().await;

    assert_eq!(store.vms().await.len(), 2);
    assert_eq!(store.vms_on("pve1").await.len(), 1);
    assert_eq!(store.containers().await.len(), 1);
    assert_eq!(store.containers_on("pve2").await.len(), 0);
    assert_eq!(store.storage().await.len(), 2);

    // Node-scoped storage includes owned plus shared volumes.
    let on_pve2 = store.storage_on("pve2").await;
    assert_eq!(on_pve2.len(), 1);
    assert_eq!(on_pve2[0].id, "ceph");
}

#[tokio::test]
async fn overlapping_refreshes_apply_last_write_wins() {
    let proxy = Arc::new(MockProxy::new());
    let store = ResourceStore::new(proxy.clone());

    // Two in-flight refreshes, resolved manually in reverse order.
    let first = proxy.defer_resources();
    let second = proxy.defer_resources();

    let store1 = store.clone();
    let task1 = tokio::spawn(async move { store1.refresh_cluster_resources().await });
    wait_until("first refresh in flight", || {
        proxy.calls_of("list_cluster_resources") == 1
    })
    .await;

    let store2 = store.clone();
    let task2 = tokio::spawn(async move { store2.refresh_cluster_resources().await });
    wait_until("second refresh in flight", || {
        proxy.calls_of("list_cluster_resources") == 2
    })
    .await;
    assert!(store.is_loading().await);

    // The second (newer) call resolves first...
    second.send(vec![running_vm_resource(202, "pve2")]).unwrap();
    task2.await.unwrap();
    assert_eq!(store.vms().await[0].vmid, 202);

    // ...and the first (older) response lands last and overwrites it.
    first.send(vec![running_vm_resource(101, "pve1")]).unwrap();
    task1.await.unwrap();
    assert_eq!(store.vms().await[0].vmid, 101);
    assert_eq!(store.cluster_phase().await, LoadPhase::Ready);
}
