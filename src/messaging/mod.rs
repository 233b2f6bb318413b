//! # Messaging Module
//!
//! The message-source contract consumed by the subscription worker, and its
//! pgmq-backed implementation.
//!
//! The contract is pull-style: a bounded batch per poll, with each message
//! independently completable (deleted from the source) or abandonable (made
//! eligible for redelivery). Redelivery policy (invisibility windows,
//! delivery counting, dead-lettering) is owned by the source, never by the
//! worker.

pub mod pgmq_source;
pub mod source;

pub use pgmq_source::PgmqSubscriptionSource;
pub use source::{InboundMessage, MessageSource, PollResult};

use thiserror::Error;

/// Errors raised by message source implementations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessagingError {
    #[error("Queue connection failed: {0}")]
    Connection(String),

    #[error("Invalid queue name `{0}`: only letters, digits and underscores are allowed")]
    InvalidQueueName(String),

    #[error("Failed to create queue {queue}: {reason}")]
    QueueCreation { queue: String, reason: String },

    #[error("Failed to receive messages from {queue}: {reason}")]
    Receive { queue: String, reason: String },

    #[error("Failed to complete message {message_id} on {queue}: {reason}")]
    Complete {
        queue: String,
        message_id: i64,
        reason: String,
    },

    #[error("Failed to abandon message {message_id} on {queue}: {reason}")]
    Abandon {
        queue: String,
        message_id: i64,
        reason: String,
    },

    #[error("Failed to publish message to {queue}: {reason}")]
    Publish { queue: String, reason: String },
}
