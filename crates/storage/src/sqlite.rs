use rusqlite::{Connection, OptionalExtension};

use crate::error::StorageError;
use crate::keys::StorageKey;
use crate::traits::Storage;

const UPSERT_SQL: &str = "INSERT INTO kv (key, value) VALUES (?1, ?2)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value,
         updated_at = CAST(unixepoch('now','subsec') * 1000 AS INTEGER)";

/// Durable single-user store: one row per [`StorageKey`].
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Storage for SqliteStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                rusqlite::params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.conn
            .execute(UPSERT_SQL, rusqlite::params![key.as_str(), value])?;
        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key.as_str()])?;
        Ok(())
    }

    fn set_many(&mut self, entries: &[(StorageKey, String)]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            tx.execute(UPSERT_SQL, rusqlite::params![key.as_str(), value])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_many(&mut self, keys: &[StorageKey]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        for key in keys {
            tx.execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key.as_str()])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn present_keys(&self) -> Result<Vec<StorageKey>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        // Rows written by something other than this crate are not ours to report.
        Ok(names
            .iter()
            .filter_map(|name| StorageKey::parse(name).ok())
            .collect())
    }
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage").finish_non_exhaustive()
    }
}
