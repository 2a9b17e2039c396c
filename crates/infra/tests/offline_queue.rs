//! Integration tests for the offline request queue
//!
//! Mutating requests issued while offline are parked and replayed in order
//! once connectivity returns; reads always go straight through.

use std::sync::Arc;
use std::time::Duration;

use farmlink_common::observability::init_test_tracing;
use farmlink_common::MemoryTokenStore;
use farmlink_infra::testing::{MockRefreshEndpoint, MockTransport};
use farmlink_infra::{
    ApiClient, ApiError, NetworkMonitor, RequestConfig, TransportError, TransportResponse,
};
use futures::future::join_all;
use reqwest::Method;
use serde_json::json;

struct Harness {
    client: ApiClient,
    transport: Arc<MockTransport>,
    monitor: NetworkMonitor,
}

async fn harness(transport: MockTransport, online: bool) -> Harness {
    init_test_tracing();
    let transport = Arc::new(transport);
    let monitor = NetworkMonitor::new(online);
    let client = ApiClient::builder()
        .transport(transport.clone())
        .refresh_endpoint(MockRefreshEndpoint::succeeding("fresh", None).into_arc())
        .token_store(Arc::new(MemoryTokenStore::new()))
        .connectivity(Arc::new(monitor.clone()))
        .build()
        .expect("client should build");
    client.set_token("a1").await;
    Harness { client, transport, monitor }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition should be reached");
}

fn add_item(n: u64) -> RequestConfig {
    RequestConfig::post("/cart/items")
        .with_json(&json!({ "productId": format!("p{n}"), "quantity": n }))
        .expect("body should serialize")
}

#[tokio::test]
async fn reads_bypass_the_queue_while_offline() {
    let h = harness(MockTransport::ok(json!({ "items": [] })), false).await;

    let response = h.client.request(RequestConfig::get("/cart")).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(h.client.offline_queue_len(), 0);
    assert_eq!(h.transport.call_count(), 1);
    h.client.shutdown().await;
}

#[tokio::test]
async fn queued_mutations_replay_in_order_on_reconnect() {
    let h = harness(MockTransport::ok(json!({ "ok": true })), false).await;

    let mut tasks = Vec::new();
    for n in 1..=3 {
        let client = h.client.clone();
        tasks.push(tokio::spawn(async move { client.request(add_item(n)).await }));
        // Enqueue order is the order the callers reached the client.
        wait_until(|| h.client.offline_queue_len() == n as usize).await;
    }
    assert_eq!(h.transport.call_count(), 0);

    h.monitor.set_connected(true);
    let results = join_all(tasks).await;

    for result in results {
        assert_eq!(result.expect("task should not panic").unwrap().status, 200);
    }
    let calls = h.transport.calls();
    let quantities: Vec<_> =
        calls.iter().map(|call| call.body.as_ref().unwrap()["quantity"].clone()).collect();
    assert_eq!(quantities, vec![json!(1), json!(2), json!(3)]);
    assert!(calls.iter().all(|call| call.method == Method::POST));
    assert!(calls.iter().all(|call| call.bearer.as_deref() == Some("a1")));
    assert_eq!(h.client.offline_queue_len(), 0);
    assert!(h.client.is_online());
    h.client.shutdown().await;
}

#[tokio::test]
async fn queued_request_stays_pending_while_offline() {
    let h = harness(MockTransport::ok(json!({})), false).await;

    let pending = tokio::time::timeout(
        Duration::from_millis(100),
        h.client.request(RequestConfig::put("/users/profile")),
    )
    .await;

    assert!(pending.is_err(), "request should not settle while offline");
    assert_eq!(h.transport.call_count(), 0);
    h.client.shutdown().await;
}

#[tokio::test]
async fn abandoned_requests_are_skipped_on_replay() {
    let h = harness(MockTransport::ok(json!({})), false).await;

    let _ = tokio::time::timeout(Duration::from_millis(20), h.client.request(add_item(1))).await;
    let kept = tokio::spawn({
        let client = h.client.clone();
        async move { client.request(add_item(2)).await }
    });
    wait_until(|| h.client.offline_queue_len() == 2).await;

    h.monitor.set_connected(true);
    kept.await.expect("task should not panic").unwrap();

    let calls = h.transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body.as_ref().unwrap()["quantity"], json!(2));
    h.client.shutdown().await;
}

#[tokio::test]
async fn replay_stops_when_connectivity_drops_again() {
    let h = harness(MockTransport::ok(json!({})).with_delay(Duration::from_millis(50)), false).await;

    let mut tasks = Vec::new();
    for n in 1..=3 {
        let client = h.client.clone();
        tasks.push(tokio::spawn(async move { client.request(add_item(n)).await }));
        wait_until(|| h.client.offline_queue_len() == n as usize).await;
    }

    h.monitor.set_connected(true);
    wait_until(|| h.transport.call_count() == 1).await;
    h.monitor.set_connected(false);

    wait_until(|| !h.client.is_online()).await;
    assert_eq!(h.transport.call_count(), 1);
    assert_eq!(h.client.offline_queue_len(), 2);

    h.monitor.set_connected(true);
    for task in join_all(tasks).await {
        task.expect("task should not panic").unwrap();
    }

    let quantities: Vec<_> = h
        .transport
        .calls()
        .iter()
        .map(|call| call.body.as_ref().unwrap()["quantity"].clone())
        .collect();
    assert_eq!(quantities, vec![json!(1), json!(2), json!(3)]);
    h.client.shutdown().await;
}

#[tokio::test]
async fn replay_failures_reach_the_original_caller() {
    let transport = MockTransport::new(|request| {
        if request.url == "/orders" {
            Err(TransportError::Status(TransportResponse::json_body(
                422,
                &json!({ "message": "Out of stock", "code": "OUT_OF_STOCK" }),
            )))
        } else {
            Ok(TransportResponse::json_body(201, &json!({})))
        }
    });
    let h = harness(transport, false).await;

    let order = tokio::spawn({
        let client = h.client.clone();
        async move { client.request(RequestConfig::post("/orders")).await }
    });
    wait_until(|| h.client.offline_queue_len() == 1).await;
    h.monitor.set_connected(true);

    let err = order.await.expect("task should not panic").unwrap_err();
    assert_eq!(err.status_code(), 422);
    assert_eq!(err.code(), Some("OUT_OF_STOCK"));
    h.client.shutdown().await;
}

#[tokio::test]
async fn manual_drain_does_nothing_while_offline() {
    let h = harness(MockTransport::ok(json!({})), false).await;

    let queued = tokio::spawn({
        let client = h.client.clone();
        async move { client.request(RequestConfig::delete("/favorites/p1")).await }
    });
    wait_until(|| h.client.offline_queue_len() == 1).await;

    h.client.process_offline_queue().await;
    assert_eq!(h.client.offline_queue_len(), 1);
    assert_eq!(h.transport.call_count(), 0);

    h.client.shutdown().await;
    assert_eq!(queued.await.expect("task should not panic").unwrap_err(), ApiError::Cancelled);
}

#[tokio::test]
async fn shutdown_cancels_every_queued_request() {
    let h = harness(MockTransport::ok(json!({})), false).await;

    let tasks: Vec<_> = (1..=2)
        .map(|n| {
            let client = h.client.clone();
            tokio::spawn(async move { client.request(add_item(n)).await })
        })
        .collect();
    wait_until(|| h.client.offline_queue_len() == 2).await;

    h.client.shutdown().await;

    for task in join_all(tasks).await {
        assert_eq!(task.expect("task should not panic").unwrap_err(), ApiError::Cancelled);
    }
    assert_eq!(h.client.offline_queue_len(), 0);
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn offline_mutation_after_shutdown_fails_immediately() {
    let h = harness(MockTransport::ok(json!({})), false).await;
    h.client.shutdown().await;

    let result = tokio::time::timeout(Duration::from_secs(2), h.client.request(add_item(1)))
        .await
        .expect("request should settle instead of waiting for a drain");

    assert_eq!(result.unwrap_err(), ApiError::Cancelled);
    assert_eq!(h.client.offline_queue_len(), 0);

    h.monitor.set_connected(true);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.transport.call_count(), 0);
}
