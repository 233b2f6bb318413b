//! # Relay Subscription Worker
//!
//! Standalone worker draining one topic subscription into the document
//! store. Multiple instances may run against the same subscription; the
//! queue's visibility timeout arbitrates between them.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin relay-worker
//!
//! # Point at a different subscription and control plane
//! RELAY__SUBSCRIPTION=audit-sub \
//! RELAY__CONTROL_PLANE_URL=http://control-plane:8080 \
//! cargo run --bin relay-worker
//! ```

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

use relay_core::client::{ControlPlaneApiClient, ControlPlaneApiConfig};
use relay_core::config::RelayConfig;
use relay_core::logging;
use relay_core::messaging::PgmqSubscriptionSource;
use relay_core::storage::PostgresDocumentStore;
use relay_core::worker::{ShutdownToken, SubscriptionWorker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    info!("🚀 Starting Relay Subscription Worker...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "   Build Mode: {}",
        if cfg!(debug_assertions) {
            "Debug"
        } else {
            "Release"
        }
    );

    let config = RelayConfig::from_env()?;
    info!("   Topic: {}", config.topic);
    info!("   Subscription: {}", config.subscription);
    info!("   Control Plane: {}", config.control_plane_url);

    // All handles are built once here and injected; nothing is lazily
    // initialized inside the loop
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await?;

    let source =
        PgmqSubscriptionSource::new_with_pool(pool.clone(), &config.topic, &config.subscription)
            .await?;
    source.ensure_queue().await?;
    info!("   Queue: {}", source.queue_name());

    let store = PostgresDocumentStore::new_with_pool(pool, &config.storage.table)?;
    store.ensure_schema().await?;

    let oracle = ControlPlaneApiClient::new(ControlPlaneApiConfig {
        base_url: config.control_plane_url.clone(),
        timeout_ms: config.worker.pause_check_timeout_ms,
    })?;

    let shutdown = ShutdownToken::new();
    let worker = SubscriptionWorker::new(
        Arc::new(source),
        Arc::new(store),
        Arc::new(oracle),
        config.worker.clone(),
        shutdown.clone(),
    );

    info!(worker_id = %worker.worker_id(), "🎉 Worker ready");
    info!("   Press Ctrl+C to shutdown gracefully");

    let worker_handle = tokio::spawn(async move { worker.run().await });

    shutdown_signal().await;

    info!("🛑 Shutdown signal received, draining in-flight batch...");
    shutdown.request();

    if let Err(e) = worker_handle.await {
        error!(error = %e, "Worker task did not stop cleanly");
    } else {
        info!("✅ Worker stopped");
    }

    info!("👋 Worker shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
