//! Wire types for the control-plane API, shared with the HTTP client.

use serde::{Deserialize, Serialize};

/// Confirmation returned by pause/resume mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub message: String,
}

/// Health probe response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// Whether the dependency-injected downstream handles were attached at
    /// startup; purely diagnostic
    pub identity_ready: bool,
}
