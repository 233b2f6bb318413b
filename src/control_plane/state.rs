//! Control plane application state.
//!
//! All downstream handles are constructed once at startup and injected here;
//! there are no lazily-initialized singletons. The health endpoint reports
//! whether the handles were attached so operators can tell a state-only
//! deployment from a fully wired one.

use sqlx::PgPool;

use crate::config::ControlPlaneSettings;
use crate::system_state::SystemStateManager;

/// Downstream resource handles injected at startup
///
/// The control plane itself only reports on these; workers are the ones
/// doing the actual queue and store traffic.
#[derive(Debug, Clone)]
pub struct DownstreamHandles {
    pub pool: PgPool,
}

/// Shared state for the control-plane web application
#[derive(Debug, Clone)]
pub struct AppState {
    system_state: SystemStateManager,
    downstream: Option<DownstreamHandles>,
    settings: ControlPlaneSettings,
}

impl AppState {
    pub fn new(
        settings: ControlPlaneSettings,
        system_state: SystemStateManager,
        downstream: Option<DownstreamHandles>,
    ) -> Self {
        Self {
            system_state,
            downstream,
            settings,
        }
    }

    pub fn system_state(&self) -> &SystemStateManager {
        &self.system_state
    }

    pub fn settings(&self) -> &ControlPlaneSettings {
        &self.settings
    }

    /// Whether the injected downstream handles are present
    pub fn identity_ready(&self) -> bool {
        self.downstream.is_some()
    }
}
