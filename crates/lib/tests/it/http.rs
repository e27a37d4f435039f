//! HTTP bridge transport exercised against a live in-test endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Json, Router, routing::post};

use virtdeck::Console;
use virtdeck::remote::{
    BridgeProxy, BridgeRequest, BridgeResponse, BridgeTransport, ClusterProxy, HttpTransport,
};

use crate::helpers::{online_node, wire_identity};

/// Serve a scripted bridge on an ephemeral port.
async fn spawn_bridge() -> SocketAddr {
    let router = Router::new().route("/api/v0", post(handle_bridge_request));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test bridge");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test bridge");
    });
    addr
}

async fn handle_bridge_request(Json(request): Json<BridgeRequest>) -> Json<BridgeResponse> {
    let response = match request {
        BridgeRequest::FetchIdentity => BridgeResponse::Identity(wire_identity(
            "alice@pve",
            &[("/nodes", &["Sys.Audit"])],
        )),
        BridgeRequest::ListNodes => {
            BridgeResponse::Nodes(vec![online_node("pve1"), online_node("pve2")])
        }
        BridgeRequest::ListClusterResources => BridgeResponse::Resources(Vec::new()),
        other => BridgeResponse::Error(format!("unsupported op: {}", other.op_name())),
    };
    Json(response)
}

#[tokio::test]
async fn transport_round_trips_requests_and_responses() {
    let addr = spawn_bridge().await;
    let transport = HttpTransport::new(&format!("http://{addr}")).unwrap();

    let response = transport.send_request(BridgeRequest::ListNodes).await.unwrap();
    match response {
        BridgeResponse::Nodes(nodes) => {
            assert_eq!(nodes.len(), 2);
            assert_eq!(nodes[0].id, "pve1");
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn proxy_maps_bridge_errors_to_call_failures() {
    let addr = spawn_bridge().await;
    let proxy = BridgeProxy::new(HttpTransport::new(&format!("http://{addr}")).unwrap());

    // The scripted bridge rejects user listings.
    let err = proxy.list_users().await.unwrap_err();
    assert!(err.to_string().contains("unsupported op: list_users"));

    // Identity fetches succeed end to end.
    let identity = proxy.fetch_identity().await.unwrap();
    assert_eq!(identity.userid, "alice@pve");
}

#[tokio::test]
async fn unreachable_bridge_is_a_connection_failure() {
    // Port 1 is never listening.
    let transport = HttpTransport::new("http://127.0.0.1:1").unwrap();
    let err = transport
        .send_request(BridgeRequest::ListNodes)
        .await
        .unwrap_err();
    assert!(err.is_connection_failed());
}

#[tokio::test]
async fn console_works_end_to_end_over_http() {
    let addr = spawn_bridge().await;
    let proxy = Arc::new(BridgeProxy::new(
        HttpTransport::new(&format!("http://{addr}")).unwrap(),
    ));
    let console = Console::connect(proxy).await;

    // Identity arrived over the wire with a Sys.Audit grant on /nodes.
    let identity = console.identity().await.expect("identity loaded");
    assert_eq!(identity.userid().as_str(), "alice@pve");

    console.refresh_nodes().await;
    assert_eq!(console.store().nodes().await.len(), 2);
    assert!(console.store().last_error().await.is_none());
}
