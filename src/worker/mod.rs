//! # Subscription Worker
//!
//! The consumption loop at the heart of the relay: poll the control plane's
//! pause state, conditionally pull a batch from the subscription, persist
//! each message into the document store, and settle each message according
//! to its own outcome. Forever.
//!
//! Fault isolation is the defining property of this module. A malformed
//! message, a store outage, or an unreachable control plane degrades
//! throughput (retries, ineffective pause) but never terminates the loop and
//! never takes a sibling message down with it.

pub mod consumer;
pub mod shutdown;

pub use consumer::{MessageOutcome, StateOracle, SubscriptionWorker};
pub use shutdown::ShutdownToken;
