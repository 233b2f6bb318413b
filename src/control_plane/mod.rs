//! # Control Plane Web API
//!
//! Axum-based REST API exposing the relay's shared system state. Workers
//! consult `GET /system-state` each iteration; operators drive
//! `POST /pause-processing` and `POST /resume-processing`; platform probes
//! hit `GET /healthz`.
//!
//! ## Core Components
//!
//! - [`routes`] - HTTP route definitions grouped by concern
//! - [`handlers`] - Request handlers
//! - [`responses`] - Wire types shared with the API client
//! - [`state`] - Shared application state (state manager + injected handles)
//! - [`server`] - Bind/serve with graceful shutdown

pub mod handlers;
pub mod responses;
pub mod routes;
pub mod server;
pub mod state;

pub use server::serve;
pub use state::{AppState, DownstreamHandles};

use axum::Router;
use std::time::Duration;

/// Create the control-plane Axum application with all routes and middleware
pub fn create_app(app_state: AppState) -> Router {
    let request_timeout = Duration::from_millis(app_state.settings().request_timeout_ms);

    Router::new()
        .merge(routes::system_state_routes())
        .merge(routes::health_routes())
        .layer(tower_http::timeout::TimeoutLayer::new(request_timeout))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state)
}
