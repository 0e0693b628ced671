//! Generic user-data key–value store.
//!
//! A single `rusqlite` connection behind `Arc<Mutex<Connection>>`, with a
//! small trait in front of it so the cash-flow ledger store and the
//! portfolio holdings snapshot store can share one storage implementation
//! without either depending on the other's schema.

use async_trait::async_trait;
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct StorageError {
    pub key: String,
    pub message: String,
}

impl StorageError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "storage error for {}: {}", self.key, self.message)
    }
}

impl std::error::Error for StorageError {}

/// A record keyed by (user, subject, key) — e.g. subject = "cashflow",
/// key = portfolio name.
#[async_trait]
pub trait UserDataStore: Send + Sync {
    async fn get(&self, user_id: &str, subject: &str, key: &str) -> Result<Option<String>, StorageError>;
    async fn put(&self, user_id: &str, subject: &str, key: &str, value: &str) -> Result<(), StorageError>;
}

pub struct SqliteUserDataStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserDataStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             CREATE TABLE IF NOT EXISTS user_data (
                 user_id    TEXT NOT NULL,
                 subject    TEXT NOT NULL,
                 key        TEXT NOT NULL,
                 value      TEXT NOT NULL,
                 updated_at INTEGER DEFAULT (unixepoch()),
                 PRIMARY KEY (user_id, subject, key)
             );",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory store for tests — same schema, no file on disk.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS user_data (
                 user_id    TEXT NOT NULL,
                 subject    TEXT NOT NULL,
                 key        TEXT NOT NULL,
                 value      TEXT NOT NULL,
                 updated_at INTEGER DEFAULT (unixepoch()),
                 PRIMARY KEY (user_id, subject, key)
             );",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl UserDataStore for SqliteUserDataStore {
    async fn get(&self, user_id: &str, subject: &str, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock().await;
        let result = conn.query_row(
            "SELECT value FROM user_data WHERE user_id = ?1 AND subject = ?2 AND key = ?3",
            params![user_id, subject, key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::new(format!("{user_id}/{subject}/{key}"), e.to_string())),
        }
    }

    async fn put(&self, user_id: &str, subject: &str, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO user_data (user_id, subject, key, value, updated_at)
             VALUES (?1, ?2, ?3, ?4, unixepoch())
             ON CONFLICT(user_id, subject, key)
             DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![user_id, subject, key, value],
        )
        .map_err(|e| StorageError::new(format!("{user_id}/{subject}/{key}"), e.to_string()))?;
        Ok(())
    }
}
