//! Additional-parameter rows.
//!
//! Ids come from the table's AUTOINCREMENT sequence: store-wide, monotonic
//! and never reused. Values are persisted as text.

use rusqlite::{Connection, params};
use sc_core::{NodeIndex, ParameterId, ScenarioId};
use sc_timeline::AdditionalParameter;

use crate::{StoreError, StoreResult};

struct RawParameter {
    id: i64,
    node_index: i64,
    name: String,
    value: String,
    unit: String,
}

impl RawParameter {
    fn decode(self) -> StoreResult<AdditionalParameter> {
        let node = NodeIndex::try_from_i64(self.node_index).map_err(|_| StoreError::Corrupt {
            table: "additional_parameters",
            column: "node_index",
            value: self.node_index.to_string(),
        })?;
        let value = self.value.trim().parse::<f64>().map_err(|_| StoreError::Corrupt {
            table: "additional_parameters",
            column: "value",
            value: self.value.clone(),
        })?;
        Ok(AdditionalParameter {
            id: ParameterId::new(self.id),
            node,
            name: self.name,
            value,
            unit: self.unit,
        })
    }
}

fn query(
    conn: &Connection,
    sql: &str,
    args: impl rusqlite::Params,
) -> StoreResult<Vec<AdditionalParameter>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, |row| {
        Ok(RawParameter {
            id: row.get("id")?,
            node_index: row.get("node_index")?,
            name: row.get("name")?,
            value: row.get("value")?,
            unit: row.get("unit")?,
        })
    })?;
    rows.map(|row| row.map_err(StoreError::from).and_then(RawParameter::decode))
        .collect()
}

/// Parameters of one node, ordered by id. Empty when there are none.
pub fn list_for(
    conn: &Connection,
    scenario: ScenarioId,
    node: NodeIndex,
) -> StoreResult<Vec<AdditionalParameter>> {
    query(
        conn,
        "SELECT id, node_index, name, value, unit FROM additional_parameters
         WHERE scenario_id = ?1 AND node_index = ?2 ORDER BY id",
        params![scenario.get(), node.get()],
    )
}

/// Every parameter of a scenario, ordered by node then id.
pub fn list_scenario(
    conn: &Connection,
    scenario: ScenarioId,
) -> StoreResult<Vec<AdditionalParameter>> {
    query(
        conn,
        "SELECT id, node_index, name, value, unit FROM additional_parameters
         WHERE scenario_id = ?1 ORDER BY node_index, id",
        params![scenario.get()],
    )
}

/// Insert a parameter, or update the value of the one with the same name.
///
/// The unit of an existing row is only replaced when `unit` is `Some`.
pub fn upsert(
    conn: &Connection,
    scenario: ScenarioId,
    node: NodeIndex,
    name: &str,
    value: f64,
    unit: Option<&str>,
) -> StoreResult<ParameterId> {
    upsert_with_default(conn, scenario, node, name, value, unit, None)
}

/// Like [`upsert`], with a unit used only when a new row is inserted
/// without an explicit one. Existing rows never take `default_unit`.
pub fn upsert_with_default(
    conn: &Connection,
    scenario: ScenarioId,
    node: NodeIndex,
    name: &str,
    value: f64,
    unit: Option<&str>,
    default_unit: Option<&str>,
) -> StoreResult<ParameterId> {
    let id: i64 = conn.query_row(
        "INSERT INTO additional_parameters (scenario_id, node_index, name, value, unit)
         VALUES (?1, ?2, ?3, ?4, COALESCE(?5, ?6, ''))
         ON CONFLICT (scenario_id, node_index, name)
         DO UPDATE SET value = excluded.value, unit = COALESCE(?5, unit)
         RETURNING id",
        params![
            scenario.get(),
            node.get(),
            name,
            value.to_string(),
            unit,
            default_unit
        ],
        |row| row.get(0),
    )?;
    Ok(ParameterId::new(id))
}

/// Remove every parameter of a scenario; returns the number removed.
pub fn delete_all_for(conn: &Connection, scenario: ScenarioId) -> StoreResult<usize> {
    Ok(conn.execute(
        "DELETE FROM additional_parameters WHERE scenario_id = ?1",
        params![scenario.get()],
    )?)
}

/// Remove the parameters of one node; returns the number removed.
pub fn delete_for_node(
    conn: &Connection,
    scenario: ScenarioId,
    node: NodeIndex,
) -> StoreResult<usize> {
    Ok(conn.execute(
        "DELETE FROM additional_parameters WHERE scenario_id = ?1 AND node_index = ?2",
        params![scenario.get(), node.get()],
    )?)
}
