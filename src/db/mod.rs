mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::storage::{SecureStore, StorageError};

/// SQLite-backed [`SecureStore`] used by the desktop shell.
///
/// Encryption at rest is the platform's job (full-disk or keystore-wrapped
/// file); this adapter only provides durability.
pub struct SqliteSecureStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSecureStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "fitvoice")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("fitvoice.db"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Entry operations
    // ============================================================

    pub fn put_entry(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO secure_entries (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            (key, value, Utc::now().to_rfc3339()),
        )?;
        Ok(())
    }

    pub fn get_entry(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let value = conn
            .query_row(
                "SELECT value FROM secure_entries WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Returns whether a row was removed.
    pub fn delete_entry(&self, key: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM secure_entries WHERE key = ?", [key])?;
        Ok(rows > 0)
    }

    pub fn entry_count(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM secure_entries", [], |row| {
            row.get(0)
        })?;
        Ok(count as usize)
    }
}

impl Clone for SqliteSecureStore {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

#[async_trait]
impl SecureStore for SqliteSecureStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put_entry(key, value)
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.get_entry(key).map_err(|e| StorageError::ReadFailed {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.delete_entry(key)
            .map(|_| ())
            .map_err(|e| StorageError::DeleteFailed {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }
}
