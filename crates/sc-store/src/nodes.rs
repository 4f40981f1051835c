//! Timeline node rows.
//!
//! Parameters are stored separately (see [`crate::params`]); nodes returned
//! here carry an empty parameter map.

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use sc_core::{NodeIndex, ScenarioId, VitalField, VitalSigns, VitalValue};
use sc_timeline::TimelineNode;

use crate::columns::{
    VITAL_COLUMNS, placeholders, read_vitals, to_value, vital_assignments, vital_values,
};
use crate::{StoreError, StoreResult};

/// An in-place edit of a stored node.
///
/// `Branch` sets the action together with both successors.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePatch {
    Action(String),
    Successors { done: i64, not_done: i64 },
    Branch { action: String, done: i64, not_done: i64 },
    Notes(Option<String>),
    CaregiverRole(Option<String>),
    Timer(i64),
}

impl NodePatch {
    fn assignment(&self) -> &'static str {
        match self {
            NodePatch::Action(_) => "action = ?1",
            NodePatch::Successors { .. } => "on_action_done = ?1, on_action_not_done = ?2",
            NodePatch::Branch { .. } => {
                "action = ?1, on_action_done = ?2, on_action_not_done = ?3"
            }
            NodePatch::Notes(_) => "notes = ?1",
            NodePatch::CaregiverRole(_) => "caregiver_role = ?1",
            NodePatch::Timer(_) => "timer_s = ?1",
        }
    }

    fn values(&self) -> Vec<Value> {
        match self {
            NodePatch::Action(text) => vec![Value::from(text.clone())],
            NodePatch::Successors { done, not_done } => {
                vec![Value::Integer(*done), Value::Integer(*not_done)]
            }
            NodePatch::Branch { action, done, not_done } => vec![
                Value::from(action.clone()),
                Value::Integer(*done),
                Value::Integer(*not_done),
            ],
            NodePatch::Notes(text) | NodePatch::CaregiverRole(text) => {
                vec![Value::from(text.clone())]
            }
            NodePatch::Timer(seconds) => vec![Value::Integer(*seconds)],
        }
    }
}

/// Insert one node row (its parameters are written by the caller).
pub fn insert(conn: &Connection, scenario: ScenarioId, node: &TimelineNode) -> StoreResult<()> {
    let sql = format!(
        "INSERT INTO timeline_nodes (scenario_id, node_index, {VITAL_COLUMNS}, action,
            on_action_done, on_action_not_done, notes, caregiver_role, timer_s)
         VALUES ({})",
        placeholders(16)
    );
    let mut values = vec![
        Value::Integer(scenario.get()),
        Value::Integer(i64::from(node.index.get())),
    ];
    values.extend(vital_values(&node.vitals));
    values.extend([
        Value::from(node.action.clone()),
        Value::Integer(node.on_action_done),
        Value::Integer(node.on_action_not_done),
        Value::from(node.notes.clone()),
        Value::from(node.caregiver_role.clone()),
        Value::Integer(node.timer_s),
    ]);
    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

/// All nodes of a scenario, ordered by index.
pub fn load_all(conn: &Connection, scenario: ScenarioId) -> StoreResult<Vec<TimelineNode>> {
    let sql = format!(
        "SELECT node_index, {VITAL_COLUMNS}, action, on_action_done, on_action_not_done,
                notes, caregiver_role, timer_s
         FROM timeline_nodes WHERE scenario_id = ?1 ORDER BY node_index"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![scenario.get()], |row| {
        let raw_index: i64 = row.get("node_index")?;
        let mut node = TimelineNode::new(NodeIndex::ROOT).with_vitals(read_vitals(row)?);
        node.action = row.get("action")?;
        node.on_action_done = row.get("on_action_done")?;
        node.on_action_not_done = row.get("on_action_not_done")?;
        node.notes = row.get("notes")?;
        node.caregiver_role = row.get("caregiver_role")?;
        node.timer_s = row.get("timer_s")?;
        Ok((raw_index, node))
    })?;

    let mut nodes = Vec::new();
    for row in rows {
        let (raw_index, mut node) = row?;
        node.index = stored_index(raw_index)?;
        nodes.push(node);
    }
    Ok(nodes)
}

pub fn exists(conn: &Connection, scenario: ScenarioId, index: NodeIndex) -> StoreResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM timeline_nodes WHERE scenario_id = ?1 AND node_index = ?2",
            params![scenario.get(), index.get()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn load_vitals(
    conn: &Connection,
    scenario: ScenarioId,
    index: NodeIndex,
) -> StoreResult<Option<VitalSigns>> {
    let sql = format!(
        "SELECT {VITAL_COLUMNS} FROM timeline_nodes WHERE scenario_id = ?1 AND node_index = ?2"
    );
    let vitals = conn
        .query_row(&sql, params![scenario.get(), index.get()], read_vitals)
        .optional()?;
    Ok(vitals)
}

/// Remove every node of a scenario; returns the number removed.
pub fn delete_all(conn: &Connection, scenario: ScenarioId) -> StoreResult<usize> {
    Ok(conn.execute(
        "DELETE FROM timeline_nodes WHERE scenario_id = ?1",
        params![scenario.get()],
    )?)
}

/// Returns whether a row was removed.
pub fn delete(conn: &Connection, scenario: ScenarioId, index: NodeIndex) -> StoreResult<bool> {
    let removed = conn.execute(
        "DELETE FROM timeline_nodes WHERE scenario_id = ?1 AND node_index = ?2",
        params![scenario.get(), index.get()],
    )?;
    Ok(removed > 0)
}

/// Overwrite one vital column. Returns false when the node does not exist.
pub fn write_field(
    conn: &Connection,
    scenario: ScenarioId,
    index: NodeIndex,
    field: VitalField,
    value: Option<VitalValue>,
) -> StoreResult<bool> {
    let sql = format!(
        "UPDATE timeline_nodes SET {} = ?1 WHERE scenario_id = ?2 AND node_index = ?3",
        field.name()
    );
    let updated = conn.execute(&sql, params![to_value(value), scenario.get(), index.get()])?;
    Ok(updated > 0)
}

/// Overwrite every vital column. Returns false when the node does not exist.
pub fn write_vitals(
    conn: &Connection,
    scenario: ScenarioId,
    index: NodeIndex,
    vitals: &VitalSigns,
) -> StoreResult<bool> {
    let sql = format!(
        "UPDATE timeline_nodes SET {} WHERE scenario_id = ?1 AND node_index = ?2",
        vital_assignments(3)
    );
    let mut values = vec![
        Value::Integer(scenario.get()),
        Value::Integer(i64::from(index.get())),
    ];
    values.extend(vital_values(vitals));
    let updated = conn.execute(&sql, params_from_iter(values))?;
    Ok(updated > 0)
}

/// Apply a patch. Returns false when the node does not exist.
pub fn patch(
    conn: &Connection,
    scenario: ScenarioId,
    index: NodeIndex,
    patch: &NodePatch,
) -> StoreResult<bool> {
    let mut values = patch.values();
    let first_key = values.len() + 1;
    let sql = format!(
        "UPDATE timeline_nodes SET {} WHERE scenario_id = ?{} AND node_index = ?{}",
        patch.assignment(),
        first_key,
        first_key + 1
    );
    values.push(Value::Integer(scenario.get()));
    values.push(Value::Integer(i64::from(index.get())));
    let updated = conn.execute(&sql, params_from_iter(values))?;
    Ok(updated > 0)
}

fn stored_index(raw: i64) -> StoreResult<NodeIndex> {
    NodeIndex::try_from_i64(raw).map_err(|_| StoreError::Corrupt {
        table: "timeline_nodes",
        column: "node_index",
        value: raw.to_string(),
    })
}
