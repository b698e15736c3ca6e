//! Main store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use time::OffsetDateTime;
use tracing::{debug, info};

use airsight_core::{KeyValueStore, PersistenceError};

use crate::error::{Error, Result};
use crate::schema;

/// SQLite-backed key-value store.
///
/// The connection is guarded by a mutex so one store can be shared between
/// the session's history and preference stores.
pub struct Store {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        schema::initialize(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Read the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        self.conn().execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            rusqlite::params![key, value, now],
        )?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for Store {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, PersistenceError> {
        Store::get(self, key).map_err(Into::into)
    }

    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), PersistenceError> {
        Store::set(self, key, value).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = Store::open_in_memory().unwrap();
        store.set("airsight.theme", "dark").unwrap();
        store.set("airsight.theme", "light").unwrap();
        assert_eq!(store.get("airsight.theme").unwrap().as_deref(), Some("light"));
        let rows: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_key_value_store_impl() {
        let store = Store::open_in_memory().unwrap();
        let kv: &dyn KeyValueStore = &store;
        kv.set("k", "[]").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("[]"));
    }
}
