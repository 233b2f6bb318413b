//! # Pause Coordination Roundtrip Tests
//!
//! Exercises the worker-side API client against a live control plane,
//! proving the oracle seam observes exactly what the operator mutations
//! wrote, and that an unreachable control plane surfaces as a client error
//! rather than a hang.

mod common;

use std::sync::Arc;

use common::TestServer;
use relay_core::client::{ControlPlaneApiClient, ControlPlaneApiConfig};
use relay_core::system_state::ProcessingState;
use relay_core::worker::StateOracle;

fn client_for(server: &TestServer) -> ControlPlaneApiClient {
    ControlPlaneApiClient::new(ControlPlaneApiConfig {
        base_url: server.base_url().to_string(),
        timeout_ms: 2000,
    })
    .expect("Failed to create client")
}

#[tokio::test]
async fn client_observes_operator_mutations() {
    let server = TestServer::start().await;
    let client = client_for(&server);

    let state = client
        .system_state()
        .await
        .expect("Failed to fetch initial state");
    assert_eq!(state.state, ProcessingState::Normal);
    assert!(!state.pause_processing);

    let ack = client
        .pause_processing()
        .await
        .expect("Failed to pause via client");
    assert_eq!(ack.message, "Processing paused");

    let state = client
        .system_state()
        .await
        .expect("Failed to fetch paused state");
    assert_eq!(state.state, ProcessingState::Paused);
    assert!(state.pause_processing);
    assert!(state.invariant_holds());

    let ack = client
        .resume_processing()
        .await
        .expect("Failed to resume via client");
    assert_eq!(ack.message, "Processing resumed");

    let state = client
        .system_state()
        .await
        .expect("Failed to fetch resumed state");
    assert_eq!(state.state, ProcessingState::Normal);
    assert!(!state.pause_processing);

    server.shutdown().await;
}

#[tokio::test]
async fn client_satisfies_the_worker_oracle_seam() {
    let server = TestServer::start().await;
    let client = client_for(&server);

    client
        .pause_processing()
        .await
        .expect("Failed to pause via client");

    let oracle: Arc<dyn StateOracle> = Arc::new(client);
    let state = oracle
        .fetch_system_state()
        .await
        .expect("Oracle fetch failed");
    assert!(state.pause_processing);

    server.shutdown().await;
}

#[tokio::test]
async fn client_reads_health_probe() {
    let server = TestServer::start().await;
    let client = client_for(&server);

    let health = client.healthz().await.expect("Failed to fetch health");
    assert_eq!(health.status, "ok");
    assert!(!health.identity_ready);

    server.shutdown().await;
}

#[tokio::test]
async fn unreachable_control_plane_errors_instead_of_hanging() {
    // Nothing listens on this port; the request must fail within the
    // configured timeout
    let client = ControlPlaneApiClient::new(ControlPlaneApiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_ms: 500,
    })
    .expect("Failed to create client");

    let started = std::time::Instant::now();
    let result = client.system_state().await;

    assert!(result.is_err());
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}
