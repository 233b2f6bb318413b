//! # PostgreSQL Document Store
//!
//! Document store backed by a single jsonb table. The upsert is a plain
//! `INSERT … ON CONFLICT (id) DO UPDATE`, idempotent by construction, which
//! is the correctness mechanism the worker relies on under at-least-once
//! delivery.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, info};

use super::document::DomainDocument;
use super::{DocumentStore, StorageError};

/// Document store over a PostgreSQL jsonb table
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
    table: String,
}

impl PostgresDocumentStore {
    /// Create a store using a fresh connection pool for `database_url`
    pub async fn connect(database_url: &str, table: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Self::new_with_pool(pool, table)
    }

    /// Create a store over an existing connection pool (BYOP)
    pub fn new_with_pool(pool: PgPool, table: &str) -> Result<Self, StorageError> {
        let table = validated_table_name(table)?;
        info!(table = %table, "Creating document store");

        Ok(Self { pool, table })
    }

    /// Create the documents table if it does not exist. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        debug!(table = %self.table, "Ensuring documents table exists");

        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                body JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
            self.table
        );

        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::SchemaBootstrap {
                table: self.table.clone(),
                reason: e.to_string(),
            })?;

        info!(table = %self.table, "Documents table ready");
        Ok(())
    }

    /// Fetch a stored document body by id, if present
    pub async fn fetch(&self, id: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let sql = format!("SELECT body FROM {} WHERE id = $1", self.table);

        let row: Option<(serde_json::Value,)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Upsert {
                document_id: id.to_string(),
                reason: e.to_string(),
            })?;

        Ok(row.map(|(body,)| body))
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn upsert(&self, document: &DomainDocument) -> Result<(), StorageError> {
        let sql = format!(
            "INSERT INTO {} (id, body, updated_at) VALUES ($1, $2, now())
             ON CONFLICT (id) DO UPDATE SET body = EXCLUDED.body, updated_at = now()",
            self.table
        );

        sqlx::query(&sql)
            .bind(&document.id)
            .bind(&document.body)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Upsert {
                document_id: document.id.clone(),
                reason: e.to_string(),
            })?;

        debug!(table = %self.table, document_id = %document.id, "Upserted document");
        Ok(())
    }
}

/// Table names cannot be bound as query parameters, so they are restricted
/// to identifier-safe characters before being interpolated.
fn validated_table_name(table: &str) -> Result<String, StorageError> {
    if table.is_empty()
        || !table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        || table.starts_with(|c: char| c.is_ascii_digit())
    {
        return Err(StorageError::InvalidTableName(table.to_string()));
    }

    Ok(table.to_string())
}
