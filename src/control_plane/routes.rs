//! Control plane route definitions grouped by concern.

use axum::{
    routing::{get, post},
    Router,
};

use crate::control_plane::{handlers, state::AppState};

/// System-state routes: the read workers poll and the operator mutations
pub fn system_state_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/system-state",
            get(handlers::system_state::get_system_state),
        )
        .route(
            "/pause-processing",
            post(handlers::system_state::pause_processing),
        )
        .route(
            "/resume-processing",
            post(handlers::system_state::resume_processing),
        )
}

/// Health routes for monitoring and platform probes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/healthz", get(handlers::health::healthz))
}
