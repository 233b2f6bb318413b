//! # Subscription Consumer Loop
//!
//! The worker's iteration state machine:
//!
//! ```text
//! CHECK_PAUSE → (paused: SLEEP) | (active: POLL → PROCESS_BATCH → SLEEP)
//! ```
//!
//! The pause check fails open: an unreachable control plane must degrade to
//! "keep processing" rather than silently halting the pipeline, at the cost
//! of pause being best-effort while the control plane is down. Store writes
//! strictly precede acknowledgement so a completed message is always a
//! stored message.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::client::ClientError;
use crate::config::WorkerLoopConfig;
use crate::messaging::{InboundMessage, MessageSource, PollResult};
use crate::storage::{DocumentStore, DomainDocument};
use crate::system_state::SystemState;
use crate::worker::shutdown::ShutdownToken;

/// Read access to the control plane's shared pause state
#[async_trait]
pub trait StateOracle: Send + Sync {
    async fn fetch_system_state(&self) -> Result<SystemState, ClientError>;
}

/// Per-message settlement decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Stored durably; delete the message from the source
    Completed,
    /// Not stored; release the message for redelivery
    Abandoned,
}

/// The subscription worker loop
///
/// One instance is one sequential consumer; scale-out is achieved by
/// running more instances against the same subscription and letting the
/// source's locking arbitrate.
pub struct SubscriptionWorker {
    worker_id: Uuid,
    source: Arc<dyn MessageSource>,
    store: Arc<dyn DocumentStore>,
    oracle: Arc<dyn StateOracle>,
    config: WorkerLoopConfig,
    shutdown: ShutdownToken,
}

impl SubscriptionWorker {
    pub fn new(
        source: Arc<dyn MessageSource>,
        store: Arc<dyn DocumentStore>,
        oracle: Arc<dyn StateOracle>,
        config: WorkerLoopConfig,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            worker_id: Uuid::new_v4(),
            source,
            store,
            oracle,
            config,
            shutdown,
        }
    }

    pub fn worker_id(&self) -> Uuid {
        self.worker_id
    }

    /// Run until shutdown is requested.
    ///
    /// No iteration outcome terminates the loop; errors are logged and the
    /// next iteration proceeds. Shutdown is observed at iteration boundaries
    /// and inside sleeps, so the in-flight batch always drains first.
    pub async fn run(&self) {
        info!(worker_id = %self.worker_id, "Subscription worker started");

        while !self.shutdown.is_requested() {
            self.run_iteration().await;
        }

        info!(worker_id = %self.worker_id, "Subscription worker stopped");
    }

    /// One pass of the consumption state machine.
    pub async fn run_iteration(&self) {
        if self.check_paused().await {
            info!(worker_id = %self.worker_id, "System paused, skipping poll");
            self.sleep(Duration::from_millis(self.config.pause_backoff_ms))
                .await;
            return;
        }

        match self.poll_batch().await {
            Ok(batch) => self.process_batch(batch).await,
            Err(e) => {
                error!(worker_id = %self.worker_id, error = %e, "Failed to poll subscription");
            }
        }

        self.sleep(Duration::from_millis(self.config.idle_sleep_ms))
            .await;
    }

    /// Consult the control plane's pause state, failing open.
    ///
    /// Timeouts and transport failures return `false` so a control-plane
    /// outage cannot halt the pipeline; the trade-off is that pause is
    /// best-effort while the control plane is unreachable.
    pub async fn check_paused(&self) -> bool {
        let timeout = Duration::from_millis(self.config.pause_check_timeout_ms);

        match tokio::time::timeout(timeout, self.oracle.fetch_system_state()).await {
            Ok(Ok(state)) => state.pause_processing,
            Ok(Err(e)) => {
                warn!(
                    worker_id = %self.worker_id,
                    error = %e,
                    "Could not reach control plane, continuing unpaused"
                );
                false
            }
            Err(_) => {
                warn!(
                    worker_id = %self.worker_id,
                    timeout_ms = self.config.pause_check_timeout_ms,
                    "Pause check timed out, continuing unpaused"
                );
                false
            }
        }
    }

    async fn poll_batch(&self) -> Result<PollResult, crate::messaging::MessagingError> {
        self.source
            .receive_batch(
                self.config.batch_size,
                Duration::from_millis(self.config.receive_wait_ms),
            )
            .await
    }

    async fn process_batch(&self, batch: PollResult) {
        if batch.is_empty() {
            return;
        }

        debug!(
            worker_id = %self.worker_id,
            count = batch.len(),
            "Processing message batch"
        );

        // Each message is settled on its own outcome; one failure never
        // aborts its siblings
        for message in &batch {
            let outcome = self.process_message(message).await;
            self.settle(message, outcome).await;
        }
    }

    /// Decode and store one message, returning its settlement decision.
    ///
    /// The store write is attempted before any acknowledgement and
    /// `Completed` is only produced after a successful write, so a message
    /// can never be deleted from the source without its document being
    /// durable.
    pub async fn process_message(&self, message: &InboundMessage) -> MessageOutcome {
        let document = match DomainDocument::decode(&message.payload) {
            Ok(document) => document,
            Err(e) => {
                warn!(
                    worker_id = %self.worker_id,
                    message_id = message.message_id,
                    delivery_count = message.delivery_count,
                    error = %e,
                    "Failed to decode message, abandoning for redelivery"
                );
                return MessageOutcome::Abandoned;
            }
        };

        let timeout = Duration::from_millis(self.config.upsert_timeout_ms);
        match tokio::time::timeout(timeout, self.store.upsert(&document)).await {
            Ok(Ok(())) => {
                info!(
                    worker_id = %self.worker_id,
                    message_id = message.message_id,
                    document_id = %document.id,
                    "Processed and stored message"
                );
                MessageOutcome::Completed
            }
            Ok(Err(e)) => {
                warn!(
                    worker_id = %self.worker_id,
                    message_id = message.message_id,
                    document_id = %document.id,
                    error = %e,
                    "Failed to store message, abandoning for redelivery"
                );
                MessageOutcome::Abandoned
            }
            Err(_) => {
                warn!(
                    worker_id = %self.worker_id,
                    message_id = message.message_id,
                    document_id = %document.id,
                    timeout_ms = self.config.upsert_timeout_ms,
                    "Store upsert timed out, abandoning for redelivery"
                );
                MessageOutcome::Abandoned
            }
        }
    }

    async fn settle(&self, message: &InboundMessage, outcome: MessageOutcome) {
        let result = match outcome {
            MessageOutcome::Completed => self.source.complete(message).await,
            MessageOutcome::Abandoned => self.source.abandon(message).await,
        };

        if let Err(e) = result {
            // Redelivery falls back to the source's visibility timeout
            warn!(
                worker_id = %self.worker_id,
                message_id = message.message_id,
                ?outcome,
                error = %e,
                "Failed to settle message"
            );
        }
    }

    /// Sleep that returns early once shutdown is requested.
    async fn sleep(&self, duration: Duration) {
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = self.shutdown.requested() => {}
        }
    }
}
