use crate::Result;
use rusqlite::Connection as SqliteConnection;
use std::path::{Path, PathBuf};

pub type Connection = SqliteConnection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// Database manager for the SQLite key-value backend
pub struct Database {
    db_path: PathBuf,
}

impl Database {
    /// Create a new database manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Open the database, creating the file, its parent directory and the
    /// schema as needed
    pub fn get_or_create(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = SqliteConnection::open(&self.db_path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }

    /// Check if the database exists
    pub fn exists(&self) -> bool {
        self.db_path.exists()
    }

    /// Backup the database
    pub fn backup<P: AsRef<Path>>(&self, backup_path: P) -> Result<()> {
        std::fs::copy(&self.db_path, backup_path)?;
        Ok(())
    }
}
