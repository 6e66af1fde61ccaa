//! Durable string key/value storage for the client session.
//!
//! Browser builds back this with `localStorage`; native builds use a small
//! SQLite file. `MemoryStore` is for tests and ephemeral shells.

use crate::error::ClientError;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        (**self).remove(key)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, ClientError> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Storage("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.locked()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.locked()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.locked()?.remove(key);
        Ok(())
    }
}

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::KeyValueStore;
    use crate::error::ClientError;
    use rusqlite::{Connection, OptionalExtension, params};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    #[derive(Clone, Debug)]
    pub struct SqliteStore {
        db_path: Arc<PathBuf>,
    }

    impl SqliteStore {
        pub fn open(path: impl AsRef<Path>) -> Result<Self, ClientError> {
            let db_path = path.as_ref().to_path_buf();
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| ClientError::Storage(e.to_string()))?;
                }
            }

            let conn = Connection::open(&db_path)?;
            conn.execute_batch(
                "
                PRAGMA journal_mode=WAL;
                PRAGMA synchronous=NORMAL;
                CREATE TABLE IF NOT EXISTS client_storage (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );
                ",
            )?;

            Ok(Self {
                db_path: Arc::new(db_path),
            })
        }

        pub fn path(&self) -> &Path {
            &self.db_path
        }

        fn connect(&self) -> Result<Connection, ClientError> {
            Ok(Connection::open(&*self.db_path)?)
        }
    }

    impl KeyValueStore for SqliteStore {
        fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
            let conn = self.connect()?;
            let value = conn
                .query_row(
                    "SELECT value FROM client_storage WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
            let conn = self.connect()?;
            conn.execute(
                "INSERT INTO client_storage (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), ClientError> {
            let conn = self.connect()?;
            conn.execute("DELETE FROM client_storage WHERE key = ?1", params![key])?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("token").expect("get"), None);
        store.set("token", "abc").expect("set");
        store.set("token", "def").expect("overwrite");
        assert_eq!(store.get("token").expect("get").as_deref(), Some("def"));
        store.remove("token").expect("remove");
        assert!(store.is_empty());
    }

    #[cfg(feature = "sqlite")]
    fn db_path(name: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir()
            .join("helpdesk-tests")
            .join(format!("{name}-{nanos}.db"))
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_store_survives_reopen() {
        let path = db_path("reopen");
        let store = SqliteStore::open(&path).expect("open");
        store.set("user", r#"{"name":"Admin User"}"#).expect("set");
        drop(store);

        let reopened = SqliteStore::open(&path).expect("reopen");
        assert_eq!(
            reopened.get("user").expect("get").as_deref(),
            Some(r#"{"name":"Admin User"}"#)
        );
        reopened.remove("user").expect("remove");
        assert_eq!(reopened.get("user").expect("get"), None);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_store_upserts() {
        let store = SqliteStore::open(db_path("upsert")).expect("open");
        store.set("token", "one").expect("set");
        store.set("token", "two").expect("set");
        assert_eq!(store.get("token").expect("get").as_deref(), Some("two"));
    }
}
