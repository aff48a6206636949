//! Column store error types

/// Errors raised by a column preference store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid column payload for {0}: expected a JSON array")]
    InvalidPayload(String),
}
