//! Domain document model decoded from message bodies.

use serde_json::Value;
use thiserror::Error;

/// Why a message body could not be decoded into a [`DomainDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DocumentDecodeError {
    #[error("Message body is not a JSON object")]
    NotAnObject,

    #[error("Message body is missing required field `id`")]
    MissingId,

    #[error("Message body field `id` must be a non-empty string")]
    InvalidId,
}

/// Application-level form of a message body
///
/// Any JSON object with a non-empty string `id` is a valid document; the
/// rest of the body is opaque to the relay and stored as-is. The `id` is the
/// upsert key, so redelivered messages overwrite their own prior write.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainDocument {
    pub id: String,
    /// Full body including the `id` field, stored verbatim
    pub body: Value,
}

impl DomainDocument {
    /// Decode a message payload into a document.
    ///
    /// Decode failures mean the message can never be processed; callers
    /// abandon such messages and leave dead-lettering to the source.
    pub fn decode(payload: &Value) -> Result<Self, DocumentDecodeError> {
        let object = payload.as_object().ok_or(DocumentDecodeError::NotAnObject)?;

        let id = object.get("id").ok_or(DocumentDecodeError::MissingId)?;
        let id = id
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or(DocumentDecodeError::InvalidId)?;

        Ok(Self {
            id: id.to_string(),
            body: payload.clone(),
        })
    }
}
