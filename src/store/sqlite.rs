use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use super::{schema, IdentityStore};
use crate::error::MoodError;

/// SQLite-backed identity store. Values survive process restarts.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (creating if needed) the store at `path` and run migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Store path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn()?;
        schema::run_migrations(&conn)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, MoodError> {
        self.conn
            .lock()
            .map_err(|_| MoodError::store("identity store lock poisoned"))
    }
}

impl IdentityStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, MoodError> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM identity WHERE key = ?", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MoodError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO identity (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            (key, value, Utc::now().to_rfc3339()),
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), MoodError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM identity WHERE key = ?", [key])?;
        Ok(())
    }
}
