//! Bind and serve the control-plane application.

use std::future::Future;
use tracing::info;

use crate::config::ControlPlaneSettings;
use crate::control_plane::{create_app, state::AppState};
use crate::errors::{RelayError, RelayResult};

/// Serve the control-plane API until the shutdown future resolves.
///
/// In-flight requests are drained before this returns.
pub async fn serve(
    settings: &ControlPlaneSettings,
    app_state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> RelayResult<()> {
    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_address)
        .await
        .map_err(|e| {
            RelayError::WebServer(format!("Failed to bind {}: {e}", settings.bind_address))
        })?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| RelayError::WebServer(e.to_string()))?;
    info!(bind_address = %local_addr, "Control plane API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| RelayError::WebServer(e.to_string()))
}
