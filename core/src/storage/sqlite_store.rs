use super::{Connection, Database, KeyValueStore};
use crate::Result;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

/// Key-value store backed by the `kv` table of an SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `path`, creating it and its schema if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Database::new(path).get_or_create()?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
