use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::DraftError;

/// App-data SQLite database. Holds a small key-value table; drafts live there as one blob.
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn new(db_path: PathBuf) -> Result<Self, DraftError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(DraftError::DataDir)?;
        }
        let conn = Connection::open(&db_path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, DraftError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DraftError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at TEXT DEFAULT CURRENT_TIMESTAMP
            );
            INSERT INTO schema_version (version) SELECT 1 WHERE NOT EXISTS (SELECT 1 FROM schema_version LIMIT 1);
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        // Migration 002: track when each key was last written
        let current_version: i64 = conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |r| r.get(0))
            .unwrap_or(1);
        if current_version < 2 {
            if let Err(e) = conn.execute("ALTER TABLE kv_store ADD COLUMN updated_at TEXT", []) {
                if !e.to_string().contains("duplicate column") {
                    return Err(e.into());
                }
            }
            conn.execute("UPDATE schema_version SET version = 2", [])?;
        }

        Ok(Db {
            conn: Mutex::new(conn),
        })
    }

    pub fn get_value(&self, key: &str) -> Result<Option<String>, DraftError> {
        let conn = self.conn.lock().map_err(|_| DraftError::Poisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn put_value(&self, key: &str, value: &str) -> Result<(), DraftError> {
        let updated_at = chrono::Utc::now().to_rfc3339();
        let conn = self.conn.lock().map_err(|_| DraftError::Poisoned)?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, updated_at],
        )?;
        Ok(())
    }
}
