//! # pgmq Subscription Source
//!
//! Message source backed by pgmq (PostgreSQL message queues) via the pgmq-rs
//! crate. Each topic/subscription pair maps to one queue named
//! `{topic}_{subscription}`; competing workers on the same subscription read
//! from the same queue and pgmq's visibility timeout provides the
//! invisibility window.
//!
//! Settlement mapping:
//! - complete → `delete` (message removed for good)
//! - abandon → `set_vt(0)` (message immediately eligible for redelivery)
//!
//! Dead-lettering by delivery count is a source-side policy layered on
//! `read_ct`; this client only surfaces the count.

use async_trait::async_trait;
use pgmq::PGMQueue;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::source::{InboundMessage, MessageSource, PollResult};
use super::MessagingError;

/// How long received messages stay invisible to other consumers before the
/// source redelivers them
const DEFAULT_VISIBILITY_TIMEOUT_SECONDS: i32 = 30;

/// Spacing between queue reads while waiting out a poll window
const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// pgmq-backed message source for one topic subscription
#[derive(Debug, Clone)]
pub struct PgmqSubscriptionSource {
    pgmq: PGMQueue,
    queue_name: String,
    visibility_timeout_seconds: i32,
    poll_interval: Duration,
}

impl PgmqSubscriptionSource {
    /// Create a source using a fresh connection to `database_url`
    pub async fn new(
        database_url: &str,
        topic: &str,
        subscription: &str,
    ) -> Result<Self, MessagingError> {
        let queue_name = subscription_queue_name(topic, subscription)?;
        info!(queue_name = %queue_name, "Connecting subscription source to pgmq");

        let pgmq = PGMQueue::new(database_url.to_string())
            .await
            .map_err(|e| MessagingError::Connection(e.to_string()))?;

        Ok(Self {
            pgmq,
            queue_name,
            visibility_timeout_seconds: DEFAULT_VISIBILITY_TIMEOUT_SECONDS,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        })
    }

    /// Create a source over an existing connection pool (BYOP)
    pub async fn new_with_pool(
        pool: sqlx::PgPool,
        topic: &str,
        subscription: &str,
    ) -> Result<Self, MessagingError> {
        let queue_name = subscription_queue_name(topic, subscription)?;
        info!(queue_name = %queue_name, "Creating subscription source with shared pool");

        let pgmq = PGMQueue::new_with_pool(pool).await;

        Ok(Self {
            pgmq,
            queue_name,
            visibility_timeout_seconds: DEFAULT_VISIBILITY_TIMEOUT_SECONDS,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        })
    }

    /// Override the invisibility window applied to received messages
    pub fn with_visibility_timeout(mut self, seconds: i32) -> Self {
        self.visibility_timeout_seconds = seconds;
        self
    }

    /// Queue this source reads from
    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Underlying connection pool, for operations the pgmq client does not
    /// wrap
    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pgmq.connection
    }

    /// Create the subscription queue if it does not exist. Idempotent.
    pub async fn ensure_queue(&self) -> Result<(), MessagingError> {
        debug!(queue_name = %self.queue_name, "Ensuring subscription queue exists");

        self.pgmq
            .create(&self.queue_name)
            .await
            .map_err(|e| MessagingError::QueueCreation {
                queue: self.queue_name.clone(),
                reason: e.to_string(),
            })?;

        info!(queue_name = %self.queue_name, "Subscription queue ready");
        Ok(())
    }

    /// Publish a message onto the subscription queue
    ///
    /// Used by the test-event publisher; production traffic arrives through
    /// the topic's own fan-out.
    pub async fn publish<T: serde::Serialize + Send + Sync>(
        &self,
        message: &T,
    ) -> Result<i64, MessagingError> {
        let message_id = self
            .pgmq
            .send(&self.queue_name, message)
            .await
            .map_err(|e| MessagingError::Publish {
                queue: self.queue_name.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            queue_name = %self.queue_name,
            message_id,
            "Published message to subscription queue"
        );
        Ok(message_id)
    }

    async fn read_batch(&self, max_messages: usize) -> Result<PollResult, MessagingError> {
        let messages = self
            .pgmq
            .read_batch::<serde_json::Value>(
                &self.queue_name,
                Some(self.visibility_timeout_seconds),
                max_messages as i32,
            )
            .await
            .map_err(|e| MessagingError::Receive {
                queue: self.queue_name.clone(),
                reason: e.to_string(),
            })?
            .unwrap_or_default();

        Ok(messages
            .into_iter()
            .map(|msg| InboundMessage {
                message_id: msg.msg_id,
                payload: msg.message,
                delivery_count: msg.read_ct,
                enqueued_at: msg.enqueued_at,
            })
            .collect())
    }
}

#[async_trait]
impl MessageSource for PgmqSubscriptionSource {
    async fn receive_batch(
        &self,
        max_messages: usize,
        max_wait: Duration,
    ) -> Result<PollResult, MessagingError> {
        let deadline = Instant::now() + max_wait;

        loop {
            let batch = self.read_batch(max_messages).await?;
            if !batch.is_empty() {
                debug!(
                    queue_name = %self.queue_name,
                    count = batch.len(),
                    "Received messages from subscription queue"
                );
                return Ok(batch);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(batch);
            }

            tokio::time::sleep(self.poll_interval.min(remaining)).await;
        }
    }

    async fn complete(&self, message: &InboundMessage) -> Result<(), MessagingError> {
        self.pgmq
            .delete(&self.queue_name, message.message_id)
            .await
            .map_err(|e| MessagingError::Complete {
                queue: self.queue_name.clone(),
                message_id: message.message_id,
                reason: e.to_string(),
            })?;

        debug!(
            queue_name = %self.queue_name,
            message_id = message.message_id,
            "Completed message"
        );
        Ok(())
    }

    async fn abandon(&self, message: &InboundMessage) -> Result<(), MessagingError> {
        // Resetting the visibility timeout to zero makes the message
        // immediately redeliverable instead of waiting out the window
        sqlx::query("SELECT msg_id FROM pgmq.set_vt($1, $2, $3)")
            .bind(&self.queue_name)
            .bind(message.message_id)
            .bind(0i32)
            .execute(self.pool())
            .await
            .map_err(|e| MessagingError::Abandon {
                queue: self.queue_name.clone(),
                message_id: message.message_id,
                reason: e.to_string(),
            })?;

        debug!(
            queue_name = %self.queue_name,
            message_id = message.message_id,
            delivery_count = message.delivery_count,
            "Abandoned message for redelivery"
        );
        Ok(())
    }
}

/// Derive the queue name for a topic/subscription pair.
///
/// pgmq queue names become table names, so hyphens common in topic naming
/// are folded to underscores and anything else non-alphanumeric is rejected.
fn subscription_queue_name(topic: &str, subscription: &str) -> Result<String, MessagingError> {
    let candidate = format!("{topic}_{subscription}")
        .to_lowercase()
        .replace('-', "_");

    if candidate.is_empty()
        || !candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(MessagingError::InvalidQueueName(candidate));
    }

    Ok(candidate)
}
