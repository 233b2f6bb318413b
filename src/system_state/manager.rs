//! Thread-safe manager for the shared system state triple.
//!
//! One `RwLock` guards the whole [`SystemState`] value; every mutation swaps
//! the triple as a unit and every read copies it out, so concurrent HTTP
//! handlers can never observe a half-applied pause.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::states::SystemState;

/// Shared handle to the control plane's system state
///
/// Cloning shares the underlying state; the control-plane binary creates one
/// manager at startup and hands clones to the web application.
#[derive(Debug)]
pub struct SystemStateManager {
    state: Arc<RwLock<SystemState>>,
}

impl SystemStateManager {
    /// Create a manager holding the default `{NORMAL, false, null}` triple
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(SystemState::default())),
        }
    }

    /// Create a manager with a specific initial state
    pub fn with_initial_state(initial_state: SystemState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial_state)),
        }
    }

    /// Get a copy of the current state triple
    pub async fn snapshot(&self) -> SystemState {
        self.state.read().await.clone()
    }

    /// Check whether processing is currently paused
    pub async fn is_paused(&self) -> bool {
        self.state.read().await.pause_processing
    }

    /// Pause processing; returns the resulting state. Idempotent.
    pub async fn pause(&self) -> SystemState {
        let mut state = self.state.write().await;
        let next = state.clone().paused();

        info!(
            from_state = %state.state,
            to_state = %next.state,
            "Processing paused"
        );

        *state = next.clone();
        next
    }

    /// Resume processing; returns the resulting state. Idempotent.
    pub async fn resume(&self) -> SystemState {
        let mut state = self.state.write().await;
        let next = state.clone().resumed();

        info!(
            from_state = %state.state,
            to_state = %next.state,
            "Processing resumed"
        );

        *state = next.clone();
        next
    }
}

impl Default for SystemStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SystemStateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system_state::ProcessingState;

    #[tokio::test]
    async fn manager_starts_in_default_state() {
        let manager = SystemStateManager::new();

        let snapshot = manager.snapshot().await;
        assert_eq!(snapshot, SystemState::default());
        assert!(!manager.is_paused().await);
    }

    #[tokio::test]
    async fn pause_then_resume_round_trip() {
        let manager = SystemStateManager::new();

        let paused = manager.pause().await;
        assert_eq!(paused.state, ProcessingState::Paused);
        assert!(paused.pause_processing);
        assert!(manager.is_paused().await);

        let resumed = manager.resume().await;
        assert_eq!(resumed.state, ProcessingState::Normal);
        assert!(!resumed.pause_processing);
        assert!(!manager.is_paused().await);
    }

    #[tokio::test]
    async fn repeated_pause_is_a_no_op_state_change() {
        let manager = SystemStateManager::new();

        let first = manager.pause().await;
        let second = manager.pause().await;

        assert_eq!(first, second);
        assert!(manager.snapshot().await.invariant_holds());
    }

    #[tokio::test]
    async fn manager_accepts_a_non_default_initial_state() {
        let manager = SystemStateManager::with_initial_state(SystemState::default().paused());

        assert!(manager.is_paused().await);
        assert!(manager.snapshot().await.invariant_holds());

        manager.resume().await;
        assert!(!manager.is_paused().await);
    }

    #[tokio::test]
    async fn clones_share_the_same_state() {
        let manager = SystemStateManager::new();
        let clone = manager.clone();

        manager.pause().await;

        assert!(clone.is_paused().await);
        assert!(clone.snapshot().await.invariant_holds());
    }

    #[tokio::test]
    async fn concurrent_mutations_never_break_the_invariant() {
        let manager = SystemStateManager::new();

        let mut handles = Vec::new();
        for i in 0..32 {
            let shared = manager.clone();
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    shared.pause().await
                } else {
                    shared.resume().await
                }
            }));
        }

        for handle in handles {
            let observed = handle.await.expect("Mutation task panicked");
            assert!(observed.invariant_holds());
        }

        assert!(manager.snapshot().await.invariant_holds());
    }
}
