//! # Relay Control Plane Server
//!
//! Standalone server holding the fleet-wide pause/resume state and exposing
//! it over HTTP. This is the production deployment target for the relay
//! control-plane service.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin relay-control-plane
//!
//! # Override the bind address
//! RELAY__CONTROL_PLANE__BIND_ADDRESS=0.0.0.0:9090 cargo run --bin relay-control-plane
//! ```

use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

use relay_core::config::RelayConfig;
use relay_core::control_plane::{self, AppState, DownstreamHandles};
use relay_core::logging;
use relay_core::system_state::SystemStateManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    info!("🚀 Starting Relay Control Plane...");
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
    info!("   Bind Address: {}", config.control_plane.bind_address);

    // Downstream handles are injected up front; the control plane still
    // serves state without them, it just reports identityReady=false
    let downstream = match PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            info!("✅ Downstream handles attached");
            Some(DownstreamHandles { pool })
        }
        Err(e) => {
            warn!(error = %e, "Starting without downstream handles");
            None
        }
    };

    let app_state = AppState::new(
        config.control_plane.clone(),
        SystemStateManager::new(),
        downstream,
    );

    info!("   Press Ctrl+C to shutdown gracefully");

    control_plane::serve(&config.control_plane, app_state, shutdown_signal()).await?;

    info!("👋 Control plane shutdown complete");
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
