//! # Storage Module
//!
//! The document-store contract consumed by the subscription worker, and its
//! PostgreSQL implementation.
//!
//! The store is key-addressed and upsert-only from the worker's point of
//! view: writing the same document identity twice is always safe. That
//! idempotency is what makes at-least-once delivery acceptable without a
//! deduplication layer.

pub mod document;
pub mod postgres_store;

pub use document::{DocumentDecodeError, DomainDocument};
pub use postgres_store::PostgresDocumentStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by document store implementations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Invalid table name `{0}`: only letters, digits and underscores are allowed")]
    InvalidTableName(String),

    #[error("Schema bootstrap failed for {table}: {reason}")]
    SchemaBootstrap { table: String, reason: String },

    #[error("Upsert failed for document {document_id}: {reason}")]
    Upsert {
        document_id: String,
        reason: String,
    },
}

/// Key-addressed, idempotent document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or replace the document keyed by its identity field.
    async fn upsert(&self, document: &DomainDocument) -> Result<(), StorageError>;
}
