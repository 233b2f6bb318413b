//! Health check handler for monitoring and platform probes.

use axum::extract::State;
use axum::Json;

use crate::control_plane::responses::HealthResponse;
use crate::control_plane::state::AppState;

/// Health probe: GET /healthz
///
/// Always succeeds. `identityReady` reports whether the downstream handles
/// were injected at startup, which is diagnostic only; the control plane
/// serves state with or without them.
pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        identity_ready: state.identity_ready(),
    })
}
