//! SQLite-backed store handle.
//!
//! The store is opened explicitly, passed by reference to every operation,
//! and closed explicitly. Opening creates the schema when it is missing.

use crate::error::{Result, StorageError};
use log::{debug, info};
use rusqlite::{Connection, Transaction};
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS players (
        id    INTEGER PRIMARY KEY AUTOINCREMENT,
        name  TEXT    NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS sessions (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at       TEXT    NOT NULL,
        participants     TEXT    NOT NULL,
        house_adjustment INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS sessions_created_at ON sessions (created_at);
";

/// An open connection to the ledger database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("Opened ledger database at {}", path.display());
        Self::init(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        debug!("Opened in-memory ledger database");
        Self::init(conn)
    }

    fn init(mut conn: Connection) -> Result<Self> {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;
        tx.commit()?;
        Ok(Store { conn })
    }

    /// Read access for queries and single-statement writes.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Starts a transaction; dropping it without `commit` rolls back.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    /// Closes the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| StorageError(err).into())
    }
}

/// Returns `true` if `err` is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
