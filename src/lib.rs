#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Relay Core
//!
//! Rust implementation of the event relay pipeline: a fleet of subscription
//! workers drains business events from durable topic subscriptions into a
//! document store, coordinated by a control-plane service that owns a
//! process-wide pause/resume switch.
//!
//! ## Overview
//!
//! The worker side is a deliberately simple forever-loop with strong fault
//! isolation: every iteration consults the control plane's pause state,
//! conditionally pulls a bounded batch from the subscription, decodes and
//! upserts each message independently, and settles each message according to
//! its own outcome. Nothing a single message or a single iteration does can
//! take the loop down. The control-plane side is a small axum service that
//! holds the shared [`system_state::SystemState`] triple behind one
//! exclusive-access boundary and exposes it over HTTP.
//!
//! At-least-once delivery is accepted end to end: the message source owns
//! redelivery (visibility timeouts and delivery counts), and the document
//! store's idempotent upsert keyed by document identity is what makes
//! duplicate deliveries harmless. There are no distributed transactions.
//!
//! ## Module Organization
//!
//! - [`config`] - Environment-driven configuration with deployment defaults
//! - [`errors`] - Structured error handling and the crate-wide result alias
//! - [`logging`] - Tracing subscriber setup for console/JSON output
//! - [`system_state`] - The control plane's pause/resume state machine
//! - [`messaging`] - Message source contract and the pgmq-backed subscription source
//! - [`storage`] - Document model and the PostgreSQL-backed document store
//! - [`client`] - HTTP client for the control-plane API
//! - [`worker`] - The subscription worker loop (the core of the system)
//! - [`control_plane`] - Axum web application exposing the system state
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use relay_core::client::{ControlPlaneApiClient, ControlPlaneApiConfig};
//! use relay_core::config::RelayConfig;
//! use relay_core::messaging::PgmqSubscriptionSource;
//! use relay_core::storage::PostgresDocumentStore;
//! use relay_core::worker::{ShutdownToken, SubscriptionWorker};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RelayConfig::from_env()?;
//!
//! let source =
//!     PgmqSubscriptionSource::new(&config.database_url, &config.topic, &config.subscription)
//!         .await?;
//! let store = PostgresDocumentStore::connect(&config.database_url, &config.storage.table).await?;
//! let oracle = ControlPlaneApiClient::new(ControlPlaneApiConfig {
//!     base_url: config.control_plane_url.clone(),
//!     timeout_ms: config.worker.pause_check_timeout_ms,
//! })?;
//!
//! let worker = SubscriptionWorker::new(
//!     Arc::new(source),
//!     Arc::new(store),
//!     Arc::new(oracle),
//!     config.worker.clone(),
//!     ShutdownToken::new(),
//! );
//! worker.run().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod control_plane;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod storage;
pub mod system_state;
pub mod worker;

pub use client::{ClientError, ControlPlaneApiClient, ControlPlaneApiConfig};
pub use config::{ControlPlaneSettings, RelayConfig, StorageSettings, WorkerLoopConfig};
pub use errors::{RelayError, RelayResult};
pub use messaging::{InboundMessage, MessageSource, MessagingError, PgmqSubscriptionSource};
pub use storage::{DocumentStore, DomainDocument, PostgresDocumentStore, StorageError};
pub use system_state::{ProcessingState, SystemState, SystemStateManager};
pub use worker::{MessageOutcome, ShutdownToken, StateOracle, SubscriptionWorker};
