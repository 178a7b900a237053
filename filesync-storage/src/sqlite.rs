//! SQLite key-value backend.

use crate::backend::{KvBackend, StorageEstimate};
use crate::error::{StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// Key-value store in a single SQLite table.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Opens an in-memory store.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            );
            ",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Caps the database at `pages` pages. Writes beyond the cap fail with
    /// `SQLITE_FULL`; the cap is also reported as the quota.
    pub fn set_max_pages(&self, pages: u64) -> StorageResult<u64> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let applied: i64 =
            conn.query_row(&format!("PRAGMA max_page_count = {pages}"), [], |row| row.get(0))?;
        Ok(applied as u64)
    }
}

impl KvBackend for SqliteBackend {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn estimate(&self) -> StorageResult<StorageEstimate> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let pragma = |name: &str| -> StorageResult<u64> {
            let value: i64 = conn
                .query_row(&format!("PRAGMA {name}"), [], |row| row.get(0))
                .map_err(|e| StorageError::EstimateUnavailable(format!("{name}: {e}")))?;
            Ok(value.max(0) as u64)
        };

        let page_size = pragma("page_size")?;
        let page_count = pragma("page_count")?;
        let max_page_count = pragma("max_page_count")?;

        Ok(StorageEstimate {
            usage_bytes: page_count * page_size,
            quota_bytes: max_page_count.checked_mul(page_size),
        })
    }
}
