//! System-state handlers: the shared-state read and the pause/resume
//! mutations. Both mutations are idempotent and total, so they always
//! succeed; concurrency safety lives in
//! [`crate::system_state::SystemStateManager`], not here.

use axum::extract::State;
use axum::Json;

use crate::control_plane::responses::AckResponse;
use crate::control_plane::state::AppState;
use crate::system_state::SystemState;

/// Current system state snapshot: GET /system-state
///
/// Side-effect free; returns a copy of the in-memory triple.
pub async fn get_system_state(State(state): State<AppState>) -> Json<SystemState> {
    Json(state.system_state().snapshot().await)
}

/// Pause processing fleet-wide: POST /pause-processing
pub async fn pause_processing(State(state): State<AppState>) -> Json<AckResponse> {
    state.system_state().pause().await;

    Json(AckResponse {
        message: "Processing paused".to_string(),
    })
}

/// Resume processing fleet-wide: POST /resume-processing
pub async fn resume_processing(State(state): State<AppState>) -> Json<AckResponse> {
    state.system_state().resume().await;

    Json(AckResponse {
        message: "Processing resumed".to_string(),
    })
}
