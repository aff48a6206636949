//! Column preference persistence.
//!
//! A [`StoreBackend`] moves raw JSON strings in and out of some medium.
//! [`ColumnStore`] wraps a backend with typed column (de)serialization and
//! is what the grid holds.

mod memory;
mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::{SavedColumns, SqliteBackend};

use std::sync::Arc;

use async_trait::async_trait;

use crate::column::{Column, ColumnSpec};
use crate::error::StoreError;

/// Backend trait for column preference storage.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Get the raw payload for a key.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set the raw payload for a key.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Delete a key.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Backend for when no storage medium is available. Loads nothing, saves
/// nowhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBackend;

#[async_trait]
impl StoreBackend for NoopBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Typed column store.
#[derive(Clone)]
pub struct ColumnStore {
    backend: Arc<dyn StoreBackend>,
}

impl ColumnStore {
    pub fn new(backend: impl StoreBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A store that never persists anything.
    pub fn unavailable() -> Self {
        Self::new(NoopBackend)
    }

    /// Saved columns for `key`, as overrides to layer onto defaults.
    pub async fn load(&self, key: &str) -> Result<Option<Vec<ColumnSpec>>, StoreError> {
        match self.backend.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Persist the entire column list for `key`.
    pub async fn save(&self, key: &str, columns: &[Column]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(columns)?;
        self.backend.set(key, raw).await
    }

    pub async fn forget(&self, key: &str) -> Result<(), StoreError> {
        self.backend.delete(key).await
    }
}

impl Default for ColumnStore {
    fn default() -> Self {
        Self::unavailable()
    }
}

impl std::fmt::Debug for ColumnStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnStore").finish_non_exhaustive()
    }
}

/// Storage key for a widget: `datatable_` plus the explicit id, or the URL
/// with every character outside `[A-Za-z0-9_]` replaced by `_`.
pub fn widget_key(id: Option<&str>, url: &str) -> String {
    match id {
        Some(id) if !id.is_empty() => format!("datatable_{id}"),
        _ => {
            let sanitized: String = url
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
                .collect();
            format!("datatable_{sanitized}")
        }
    }
}
