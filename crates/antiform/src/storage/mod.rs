//! Storage layer for antiform.
//!
//! Two key/value stores stand behind one trait:
//! - [`SqliteStore`] is durable. It survives restarts, like a browser's
//!   local storage.
//! - [`SessionStore`] lives only as long as one play session, like a tab's
//!   session storage.
//!
//! Values are opaque strings; callers own the encoding.

pub mod migrations;
pub mod schema;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// A string key/value store.
pub trait KeyValueStore: std::fmt::Debug {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns `true` if it was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<bool>;

    /// List all keys in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Durable key/value store backed by `SQLite`.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening storage at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Storage opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get store statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let keys: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM local_storage", [], |row| row.get(0))?;

        let value_bytes: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(value)), 0) FROM local_storage",
            [],
            |row| row.get(0),
        )?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            keys: usize::try_from(keys).unwrap_or(0),
            value_bytes: u64::try_from(value_bytes).unwrap_or(0),
            db_size_bytes,
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?1", [key])?;
        Ok(affected > 0)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key ASC")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

/// Volatile key/value store scoped to one play session.
#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    entries: BTreeMap<String, String>,
}

impl SessionStore {
    /// Create an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Statistics about the durable store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of keys stored.
    pub keys: usize,
    /// Total size of all stored values in bytes.
    pub value_bytes: u64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_open_in_memory() {
        let store = SqliteStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_set_and_get() {
        let mut store = create_test_store();

        store.set("browserErrors", "[]").unwrap();
        assert_eq!(store.get("browserErrors").unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_get_missing_key() {
        let store = create_test_store();
        assert!(store.get("nothing").unwrap().is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = create_test_store();

        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();

        assert_eq!(store.get("k").unwrap(), Some("second".to_string()));
        assert_eq!(store.keys().unwrap().len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut store = create_test_store();
        store.set("k", "v").unwrap();

        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_keys_sorted() {
        let mut store = create_test_store();
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_unicode_value() {
        let mut store = create_test_store();
        let value = "Mint? Are you making toothpaste pizza? 🍕";
        store.set("k", value).unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some(value));
    }

    #[test]
    fn test_stats() {
        let mut store = create_test_store();
        store.set("a", "1234").unwrap();
        store.set("b", "56").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.keys, 2);
        assert_eq!(stats.value_bytes, 6);
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_path_in_memory() {
        let store = create_test_store();
        assert_eq!(store.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("storage.db");

        {
            let mut store = SqliteStore::open(&db_path).unwrap();
            store.set("browserErrors", "[1]").unwrap();
            assert_eq!(store.path(), db_path);
        }

        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(store.get("browserErrors").unwrap(), Some("[1]".to_string()));
        assert!(store.stats().unwrap().db_size_bytes > 0);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/storage.db");

        let store = SqliteStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        drop(store);
    }

    #[test]
    fn test_session_store_roundtrip() {
        let mut session = SessionStore::new();
        assert!(session.is_empty());

        session.set("exitRecorded_Checkbox", "true").unwrap();
        assert_eq!(session.len(), 1);
        assert_eq!(
            session.get("exitRecorded_Checkbox").unwrap(),
            Some("true".to_string())
        );

        assert!(session.remove("exitRecorded_Checkbox").unwrap());
        assert!(session.is_empty());
    }

    #[test]
    fn test_stores_as_trait_objects() {
        let mut stores: Vec<Box<dyn KeyValueStore>> = vec![
            Box::new(create_test_store()),
            Box::new(SessionStore::new()),
        ];

        for store in &mut stores {
            store.set("x", "y").unwrap();
            assert_eq!(store.get("x").unwrap(), Some("y".to_string()));
            assert!(store.remove("x").unwrap());
        }
    }
}
