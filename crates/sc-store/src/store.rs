//! Store handle and connection options.

use std::path::PathBuf;
use std::time::Duration;

use rusqlite::{Connection, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schema::SCHEMA;
use crate::{StoreError, StoreResult};

/// How to open the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Database file; `None` opens a private in-memory database.
    pub path: Option<PathBuf>,
    /// How long a writer waits on a locked database before failing.
    pub busy_timeout_ms: u64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: 5_000,
        }
    }
}

impl StoreOptions {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

/// Owns the SQLite connection for one caller.
pub struct ScenarioStore {
    conn: Connection,
}

impl ScenarioStore {
    pub fn open(options: &StoreOptions) -> StoreResult<Self> {
        let conn = match &options.path {
            Some(path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        conn.busy_timeout(Duration::from_millis(options.busy_timeout_ms))?;
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        debug!(path = ?options.path, "opened scenario store");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(&StoreOptions::default())
    }

    /// Read access. Also used by tests to install fault-injection triggers.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside one transaction.
    ///
    /// Commits when `f` returns `Ok`; any error (from `f` or from the commit)
    /// rolls every statement back.
    pub fn write<T, E>(&mut self, f: impl FnOnce(&Transaction<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let tx = self.conn.transaction().map_err(StoreError::from)?;
        let out = f(&tx)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let store = ScenarioStore::open_in_memory().unwrap();
        store.connection().execute_batch(SCHEMA).unwrap();
        let fk: i64 = store
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn failed_write_rolls_back() {
        let mut store = ScenarioStore::open_in_memory().unwrap();
        let result: StoreResult<()> = store.write(|tx| {
            tx.execute(
                "INSERT INTO scenarios (title, created_at) VALUES ('x', '2026-01-01T00:00:00Z')",
                [],
            )?;
            Err(StoreError::Corrupt {
                table: "scenarios",
                column: "title",
                value: "x".into(),
            })
        });
        assert!(result.is_err());

        let count: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM scenarios", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
