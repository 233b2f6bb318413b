//! Request handlers for the control-plane API.

pub mod health;
pub mod system_state;
