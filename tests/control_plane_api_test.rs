//! # Control Plane API Integration Tests
//!
//! Boots the control-plane application on an ephemeral port and drives the
//! public HTTP surface end to end: the pause/resume lifecycle, mutation
//! idempotency, and the health probe.

mod common;

use common::TestServer;
use serde_json::Value;

#[tokio::test]
async fn pause_resume_lifecycle_round_trips_over_http() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // Fresh control plane starts in the default triple
    let state: Value = client
        .get(server.url("/system-state"))
        .send()
        .await
        .expect("Failed to fetch system state")
        .json()
        .await
        .expect("Failed to parse system state");
    assert_eq!(
        state,
        serde_json::json!({
            "state": "NORMAL",
            "pauseProcessing": false,
            "maxProcessingRate": null
        })
    );

    // Pause and observe the triple flip as one unit
    let ack: Value = client
        .post(server.url("/pause-processing"))
        .send()
        .await
        .expect("Failed to pause")
        .json()
        .await
        .expect("Failed to parse pause ack");
    assert_eq!(ack["message"], "Processing paused");

    let state: Value = client
        .get(server.url("/system-state"))
        .send()
        .await
        .expect("Failed to fetch system state")
        .json()
        .await
        .expect("Failed to parse system state");
    assert_eq!(state["state"], "PAUSED");
    assert_eq!(state["pauseProcessing"], true);
    assert_eq!(state["maxProcessingRate"], Value::Null);

    // Resume restores the default triple
    let ack: Value = client
        .post(server.url("/resume-processing"))
        .send()
        .await
        .expect("Failed to resume")
        .json()
        .await
        .expect("Failed to parse resume ack");
    assert_eq!(ack["message"], "Processing resumed");

    let state: Value = client
        .get(server.url("/system-state"))
        .send()
        .await
        .expect("Failed to fetch system state")
        .json()
        .await
        .expect("Failed to parse system state");
    assert_eq!(state["state"], "NORMAL");
    assert_eq!(state["pauseProcessing"], false);

    server.shutdown().await;
}

#[tokio::test]
async fn repeated_pause_requests_are_idempotent() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        let response = client
            .post(server.url("/pause-processing"))
            .send()
            .await
            .expect("Failed to pause");
        assert!(response.status().is_success());
    }

    let state: Value = client
        .get(server.url("/system-state"))
        .send()
        .await
        .expect("Failed to fetch system state")
        .json()
        .await
        .expect("Failed to parse system state");
    assert_eq!(state["state"], "PAUSED");
    assert_eq!(state["pauseProcessing"], true);

    server.shutdown().await;
}

#[tokio::test]
async fn healthz_reports_status_and_identity_readiness() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(server.url("/healthz"))
        .send()
        .await
        .expect("Failed to fetch health")
        .json()
        .await
        .expect("Failed to parse health");

    assert_eq!(health["status"], "ok");
    // Test servers run without injected downstream handles
    assert_eq!(health["identityReady"], false);

    server.shutdown().await;
}

#[tokio::test]
async fn unknown_routes_return_not_found() {
    let server = TestServer::start().await;

    let response = reqwest::Client::new()
        .get(server.url("/no-such-route"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    server.shutdown().await;
}
