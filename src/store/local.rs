use crate::errors::{PersistenceError, PersistenceResult};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Key-value persistence used as seed data source, offline fallback and
/// backup slot. Values are JSON-serialized text, one document per key.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> PersistenceResult<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> PersistenceResult<()>;
    async fn remove(&self, key: &str) -> PersistenceResult<()>;
}

/// Read and deserialize a stored document. `Ok(None)` means the slot is empty.
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn LocalStore,
    key: &str,
) -> PersistenceResult<Option<T>> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize and store a document under `key`, replacing any previous value.
pub async fn write_json<T: Serialize + ?Sized>(
    store: &dyn LocalStore,
    key: &str,
    value: &T,
) -> PersistenceResult<()> {
    let raw = serde_json::to_string(value)?;
    store.put(key, &raw).await
}

/// SQLite-backed store, the durable equivalent of browser local storage.
pub struct SqliteLocalStore {
    pool: SqlitePool,
}

impl SqliteLocalStore {
    /// Open (or create) the store at `path`.
    pub async fn open(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self::with_options(options).await
    }

    /// Open an in-memory store. Used by tests and ephemeral sessions.
    pub async fn in_memory() -> PersistenceResult<Self> {
        Self::with_options(SqliteConnectOptions::new().in_memory(true)).await
    }

    async fn with_options(options: SqliteConnectOptions) -> PersistenceResult<Self> {
        // Single connection: an in-memory database is per-connection, and the
        // store is low-traffic key-value access anyway.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS local_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl LocalStore for SqliteLocalStore {
    async fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM local_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(PersistenceError::from)?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO local_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(PersistenceError::from)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> PersistenceResult<()> {
        sqlx::query("DELETE FROM local_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(PersistenceError::from)?;
        Ok(())
    }
}

/// In-memory store used in tests and wherever durability is not needed.
#[derive(Default)]
pub struct MemoryLocalStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for MemoryLocalStore {
    async fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| PersistenceError::Unavailable("poisoned lock".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PersistenceError::Unavailable("poisoned lock".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PersistenceResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PersistenceError::Unavailable("poisoned lock".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}
