//! The import transaction.
//!
//! One [`ImportTransaction`] spans a whole import run. Each entry is written
//! inside its own savepoint, so an entry either lands completely (command,
//! place, and history row) or not at all. The outer transaction rolls back
//! when dropped without [`ImportTransaction::commit`].

use rusqlite::{params, Connection, OptionalExtension, Transaction};

use super::models::{InsertedIds, Place};
use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::history::ParsedEntry;

const INSERT_COMMAND: &str = "INSERT OR IGNORE INTO commands (argv) VALUES (?1)";
const SELECT_COMMAND: &str = "SELECT rowid FROM commands WHERE argv = ?1";
const INSERT_PLACE: &str = "INSERT OR IGNORE INTO places (host, dir) VALUES (?1, ?2)";
const SELECT_PLACE: &str = "SELECT rowid FROM places WHERE host = ?1 AND dir = ?2";
const INSERT_HISTORY: &str = r#"
    INSERT INTO history (session, command_id, place_id, exit_status, start_time, duration)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

/// A transaction that imports parsed entries.
pub struct ImportTransaction<'conn> {
    tx: Transaction<'conn>,
    place: Place,
    session: String,
    exit_status: String,
}

impl<'conn> ImportTransaction<'conn> {
    /// Starts the transaction and prepares the insert statements.
    ///
    /// Commands and places are looked up by value after insertion, which is
    /// only sound if `commands(argv)` and `places(host, dir)` are unique keys.
    /// That is checked here, before anything is written.
    pub fn begin(conn: &'conn mut Connection, config: &ImportConfig) -> Result<Self, ImportError> {
        let tx = conn.transaction()?;

        ensure_unique_key(&tx, "commands", &["argv"], "argv")?;
        ensure_unique_key(&tx, "places", &["host", "dir"], "host, dir")?;

        for sql in [
            INSERT_COMMAND,
            SELECT_COMMAND,
            INSERT_PLACE,
            SELECT_PLACE,
            INSERT_HISTORY,
        ] {
            tx.prepare_cached(sql)?;
        }

        Ok(Self {
            tx,
            place: Place {
                host: config.host.clone(),
                dir: config.dir.clone(),
            },
            session: config.session.clone(),
            exit_status: config.exit_status.clone(),
        })
    }

    /// Stores one entry.
    ///
    /// The command and place are inserted unless already present; the
    /// history row is always appended.
    pub fn insert_entry(&mut self, entry: &ParsedEntry) -> Result<InsertedIds, ImportError> {
        let sp = self.tx.savepoint()?;

        sp.prepare_cached(INSERT_COMMAND)?.execute(params![entry.cmd])?;
        let command_id: i64 = sp
            .prepare_cached(SELECT_COMMAND)?
            .query_row(params![entry.cmd], |row| row.get(0))?;

        sp.prepare_cached(INSERT_PLACE)?
            .execute(params![self.place.host, self.place.dir])?;
        let place_id: i64 = sp
            .prepare_cached(SELECT_PLACE)?
            .query_row(params![self.place.host, self.place.dir], |row| row.get(0))?;

        sp.prepare_cached(INSERT_HISTORY)?.execute(params![
            self.session,
            command_id,
            place_id,
            self.exit_status,
            entry.started,
            entry.duration,
        ])?;
        let history_id = sp.last_insert_rowid();

        sp.commit()?;

        Ok(InsertedIds {
            command_id,
            place_id,
            history_id,
        })
    }

    pub fn commit(self) -> Result<(), ImportError> {
        self.tx.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> Result<(), ImportError> {
        self.tx.rollback()?;
        Ok(())
    }
}

/// Fails unless `table` has a unique index whose columns are all in `columns`.
///
/// Partial indexes only constrain the rows matching their `WHERE` clause and
/// do not count.
fn ensure_unique_key(
    conn: &Connection,
    table: &'static str,
    columns: &[&str],
    label: &'static str,
) -> Result<(), ImportError> {
    let mut list = conn.prepare(
        "SELECT name FROM pragma_index_list(?1) WHERE \"unique\" = 1 AND partial = 0",
    )?;
    let indexes = list
        .query_map(params![table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut info = conn.prepare("SELECT name FROM pragma_index_info(?1)")?;
    for index in indexes {
        let indexed = info
            .query_map(params![index], |row| row.get::<_, Option<String>>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let covered = !indexed.is_empty()
            && indexed
                .iter()
                .all(|col| col.as_deref().is_some_and(|c| columns.contains(&c)));
        if covered {
            return Ok(());
        }
    }

    // An empty table list means the table itself is missing; let the
    // statement preparation report that with SQLite's own message.
    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !exists {
        return Ok(());
    }

    Err(ImportError::MissingUniqueKey {
        table,
        columns: label,
    })
}
