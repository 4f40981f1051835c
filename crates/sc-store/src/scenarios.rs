//! Scenario records. Deleting one cascades to everything it owns.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use sc_core::ScenarioId;
use serde::{Deserialize, Serialize};

use crate::StoreResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: ScenarioId,
    pub title: String,
    pub pediatric: bool,
    pub created_at: DateTime<Utc>,
}

pub fn insert(
    conn: &Connection,
    title: &str,
    pediatric: bool,
    created_at: DateTime<Utc>,
) -> StoreResult<ScenarioId> {
    conn.execute(
        "INSERT INTO scenarios (title, pediatric, created_at) VALUES (?1, ?2, ?3)",
        params![title, pediatric, created_at],
    )?;
    Ok(ScenarioId::new(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: ScenarioId) -> StoreResult<Option<ScenarioRecord>> {
    let record = conn
        .query_row(
            "SELECT id, title, pediatric, created_at FROM scenarios WHERE id = ?1",
            params![id.get()],
            |row| {
                Ok(ScenarioRecord {
                    id: ScenarioId::new(row.get("id")?),
                    title: row.get("title")?,
                    pediatric: row.get("pediatric")?,
                    created_at: row.get("created_at")?,
                })
            },
        )
        .optional()?;
    Ok(record)
}

pub fn list(conn: &Connection) -> StoreResult<Vec<ScenarioRecord>> {
    let mut stmt =
        conn.prepare("SELECT id, title, pediatric, created_at FROM scenarios ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(ScenarioRecord {
            id: ScenarioId::new(row.get("id")?),
            title: row.get("title")?,
            pediatric: row.get("pediatric")?,
            created_at: row.get("created_at")?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn exists(conn: &Connection, id: ScenarioId) -> StoreResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM scenarios WHERE id = ?1",
            params![id.get()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// `None` when the scenario does not exist.
pub fn is_pediatric(conn: &Connection, id: ScenarioId) -> StoreResult<Option<bool>> {
    let flag = conn
        .query_row(
            "SELECT pediatric FROM scenarios WHERE id = ?1",
            params![id.get()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(flag)
}

/// Returns whether a row was removed.
pub fn delete(conn: &Connection, id: ScenarioId) -> StoreResult<bool> {
    let removed = conn.execute("DELETE FROM scenarios WHERE id = ?1", params![id.get()])?;
    Ok(removed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScenarioStore;

    #[test]
    fn insert_get_delete() {
        let store = ScenarioStore::open_in_memory().unwrap();
        let conn = store.connection();
        let now = Utc::now();

        let id = insert(conn, "Septic shock", true, now).unwrap();
        let record = get(conn, id).unwrap().unwrap();
        assert_eq!(record.title, "Septic shock");
        assert!(record.pediatric);
        assert_eq!(record.created_at.timestamp(), now.timestamp());
        assert_eq!(is_pediatric(conn, id).unwrap(), Some(true));

        assert!(delete(conn, id).unwrap());
        assert!(!delete(conn, id).unwrap());
        assert_eq!(get(conn, id).unwrap(), None);
        assert_eq!(is_pediatric(conn, id).unwrap(), None);
    }

    #[test]
    fn ids_are_not_reused() {
        let store = ScenarioStore::open_in_memory().unwrap();
        let conn = store.connection();
        let first = insert(conn, "a", false, Utc::now()).unwrap();
        delete(conn, first).unwrap();
        let second = insert(conn, "b", false, Utc::now()).unwrap();
        assert!(second > first);
        assert_eq!(list(conn).unwrap().len(), 1);
    }
}
