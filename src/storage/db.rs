//! SQLite storage layer for histdb

use rusqlite::{params, Connection};
use std::path::Path;

use super::models::HistoryRow;
use super::transaction::ImportTransaction;
use crate::config::ImportConfig;
use crate::error::ImportError;

/// The zsh-histdb tables. Existing tables are left untouched.
pub const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS commands (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        argv TEXT,
        UNIQUE(argv) ON CONFLICT IGNORE
    );

    CREATE TABLE IF NOT EXISTS places (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        host TEXT,
        dir TEXT,
        UNIQUE(host, dir) ON CONFLICT IGNORE
    );

    CREATE TABLE IF NOT EXISTS history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session INT,
        command_id INT REFERENCES commands (id),
        place_id INT REFERENCES places (id),
        exit_status INT,
        start_time INT,
        duration INT
    );
"#;

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database
    pub fn open(path: &Path) -> Result<Self, ImportError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, ImportError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, ImportError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Start an import transaction; see [`ImportTransaction::begin`].
    pub fn begin_import(&mut self, config: &ImportConfig) -> Result<ImportTransaction<'_>, ImportError> {
        ImportTransaction::begin(&mut self.conn, config)
    }

    // ==================== Stats ====================

    pub fn command_count(&self) -> Result<i64, ImportError> {
        self.count("commands")
    }

    pub fn place_count(&self) -> Result<i64, ImportError> {
        self.count("places")
    }

    pub fn history_count(&self) -> Result<i64, ImportError> {
        self.count("history")
    }

    fn count(&self, table: &'static str) -> Result<i64, ImportError> {
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count)
    }

    /// List the most recently inserted history rows, newest first
    pub fn list_history(&self, limit: usize) -> Result<Vec<HistoryRow>, ImportError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT history.rowid,
                   CAST(history.session AS TEXT),
                   commands.argv,
                   places.host,
                   places.dir,
                   CAST(history.exit_status AS TEXT),
                   CAST(history.start_time AS TEXT),
                   CAST(history.duration AS TEXT)
            FROM history
            JOIN commands ON commands.rowid = history.command_id
            JOIN places ON places.rowid = history.place_id
            ORDER BY history.rowid DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(HistoryRow {
                id: row.get(0)?,
                session: row.get(1)?,
                argv: row.get(2)?,
                host: row.get(3)?,
                dir: row.get(4)?,
                exit_status: row.get(5)?,
                start_time: row.get(6)?,
                duration: row.get(7)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
