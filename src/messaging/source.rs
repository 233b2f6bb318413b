//! Message-source contract and the inbound message model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use super::MessagingError;

/// A message pulled from a topic subscription
///
/// The message is exclusively held by this receiver until it is completed or
/// abandoned; until then the source hides it from other consumers. The
/// message id doubles as the lock token for settlement calls.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub message_id: i64,
    /// Raw message body; decoding into a domain document happens in the
    /// worker, not here
    pub payload: serde_json::Value,
    /// How many times the source has delivered this message, this delivery
    /// included
    pub delivery_count: i32,
    pub enqueued_at: DateTime<Utc>,
}

/// One poll's worth of messages, in source order
pub type PollResult = Vec<InboundMessage>;

/// Pull-style message source for a topic subscription
///
/// Multiple worker instances may consume the same subscription; the source's
/// own locking is what prevents double-processing, so implementations must
/// not assume a single consumer.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Receive up to `max_messages`, waiting at most `max_wait` for any to
    /// arrive. An empty subscription yields an empty batch, not an error.
    async fn receive_batch(
        &self,
        max_messages: usize,
        max_wait: Duration,
    ) -> Result<PollResult, MessagingError>;

    /// Settle a message as processed: remove it from the source for good.
    async fn complete(&self, message: &InboundMessage) -> Result<(), MessagingError>;

    /// Release a message for redelivery to this or another consumer.
    async fn abandon(&self, message: &InboundMessage) -> Result<(), MessagingError>;
}
