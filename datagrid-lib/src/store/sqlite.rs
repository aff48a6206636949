//! SQLite column store with in-memory cache.

use std::path::Path;

use async_sqlite::rusqlite::{self, OptionalExtension};
use async_sqlite::{Client, ClientBuilder, JournalMode};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::StoreBackend;
use crate::error::StoreError;

/// One row of the `column_prefs` table, without its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedColumns {
    /// Widget storage key, see [`super::widget_key`].
    pub key: String,
    /// Number of columns in the saved list.
    pub column_count: usize,
    /// Unix seconds of the last save.
    pub saved_at: i64,
}

/// Column preferences in SQLite, one row per widget.
///
/// Payloads must be JSON arrays. A stored payload that no longer decodes as
/// one is dropped on read so the widget falls back to its defaults.
pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, String>,
}

impl SqliteBackend {
    /// Open (or create) the database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let client = ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;
        Self::with_client(client).await
    }

    /// A private in-memory database. Nothing survives the backend.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;
        Self::with_client(client).await
    }

    async fn with_client(client: Client) -> Result<Self, StoreError> {
        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS column_prefs (
                        widget_key TEXT PRIMARY KEY,
                        payload TEXT NOT NULL,
                        column_count INTEGER NOT NULL,
                        saved_at INTEGER NOT NULL
                    )",
                    [],
                )
            })
            .await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }

    /// Every widget with saved columns, most recently saved first.
    pub async fn saved(&self) -> Result<Vec<SavedColumns>, StoreError> {
        let saved = self
            .client
            .conn(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT widget_key, column_count, saved_at FROM column_prefs
                     ORDER BY saved_at DESC, widget_key",
                )?;
                let rows = stmt.query_map([], |row| {
                    Ok(SavedColumns {
                        key: row.get(0)?,
                        column_count: row.get::<_, i64>(1)?.max(0) as usize,
                        saved_at: row.get(2)?,
                    })
                })?;
                rows.collect::<Result<Vec<_>, _>>()
            })
            .await?;
        Ok(saved)
    }

    async fn drop_corrupt(&self, key: &str) -> Result<(), StoreError> {
        log::warn!("[store] discarding unreadable column payload for {key}");
        self.delete(key).await
    }
}

/// Length of the column list in `payload`, or `None` if it is not a JSON array.
fn column_count(payload: &str) -> Option<usize> {
    match serde_json::from_str::<Value>(payload).ok()? {
        Value::Array(columns) => Some(columns.len()),
        _ => None,
    }
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[async_trait]
impl StoreBackend for SqliteBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(payload) = self.cache.get(key) {
            return Ok(Some(payload.clone()));
        }

        let key_owned = key.to_string();
        let payload = self
            .client
            .conn(move |conn| {
                conn.query_row(
                    "SELECT payload FROM column_prefs WHERE widget_key = ?",
                    [&key_owned],
                    |row| row.get::<_, String>(0),
                )
                .optional()
            })
            .await?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        if column_count(&payload).is_none() {
            self.drop_corrupt(key).await?;
            return Ok(None);
        }

        self.cache.insert(key.to_string(), payload.clone());
        Ok(Some(payload))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let count =
            column_count(&value).ok_or_else(|| StoreError::InvalidPayload(key.to_string()))?;

        let key_owned = key.to_string();
        let payload = value.clone();
        let saved_at = unix_now();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO column_prefs (widget_key, payload, column_count, saved_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(widget_key) DO UPDATE SET
                        payload = excluded.payload,
                        column_count = excluded.column_count,
                        saved_at = excluded.saved_at",
                    rusqlite::params![key_owned, payload, count as i64, saved_at],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let key_owned = key.to_string();

        self.client
            .conn(move |conn| {
                conn.execute("DELETE FROM column_prefs WHERE widget_key = ?", [&key_owned])
            })
            .await?;

        self.cache.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_corrupt_payload_is_dropped() {
        let backend = SqliteBackend::open_in_memory().await.unwrap();
        backend
            .client
            .conn(|conn| {
                conn.execute(
                    "INSERT INTO column_prefs VALUES ('datatable_x', '{not json', 2, 0)",
                    [],
                )
            })
            .await
            .unwrap();

        assert_eq!(backend.get("datatable_x").await.unwrap(), None);
        assert!(backend.saved().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_array_payload_is_rejected() {
        let backend = SqliteBackend::open_in_memory().await.unwrap();
        let err = backend.set("k", "{\"a\": 1}".to_string()).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidPayload(ref k) if k == "k"));
        assert_eq!(backend.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_saved_lists_widgets_with_counts() {
        let backend = SqliteBackend::open_in_memory().await.unwrap();
        backend.set("datatable_a", "[{}, {}]".to_string()).await.unwrap();
        backend.set("datatable_b", "[{}]".to_string()).await.unwrap();
        backend.set("datatable_a", "[{}, {}, {}]".to_string()).await.unwrap();

        let mut saved = backend.saved().await.unwrap();
        saved.sort_by(|a, b| a.key.cmp(&b.key));
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].key, "datatable_a");
        assert_eq!(saved[0].column_count, 3);
        assert_eq!(saved[1].column_count, 1);
        assert!(saved.iter().all(|s| s.saved_at > 0));
    }
}
