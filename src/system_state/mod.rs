//! # System State Management
//!
//! The control plane's pause/resume state machine.
//!
//! The whole mutable surface of the control plane is one triple (processing
//! state, pause flag, and an advisory rate cap) held as a single value
//! behind one exclusive-access boundary. Mutations replace the triple
//! atomically and readers take a copy, so no caller can ever observe the
//! pause flag disagreeing with the state enum.

pub mod manager;
pub mod states;

pub use manager::SystemStateManager;
pub use states::{ProcessingState, SystemState};
