//! Baseline rows and their vascular access lists.

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use sc_core::{
    AccessId, AccessKind, Baseline, ScenarioId, VascularAccess, VitalField, VitalSigns, VitalValue,
};

use crate::columns::{VITAL_COLUMNS, read_vitals, to_value, vital_assignments, vital_values};
use crate::{StoreError, StoreResult};

/// Create the empty baseline row of a new scenario.
pub fn insert_empty(conn: &Connection, scenario: ScenarioId) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO baselines (scenario_id) VALUES (?1)",
        params![scenario.get()],
    )?;
    Ok(())
}

pub fn exists(conn: &Connection, scenario: ScenarioId) -> StoreResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM baselines WHERE scenario_id = ?1",
            params![scenario.get()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Vitals and monitor text, without the access lists.
pub fn load_vitals(
    conn: &Connection,
    scenario: ScenarioId,
) -> StoreResult<Option<(VitalSigns, String)>> {
    let sql = format!("SELECT {VITAL_COLUMNS}, monitor FROM baselines WHERE scenario_id = ?1");
    let row = conn
        .query_row(&sql, params![scenario.get()], |row| {
            Ok((read_vitals(row)?, row.get::<_, String>("monitor")?))
        })
        .optional()?;
    Ok(row)
}

/// Full baseline, `None` when the scenario has none.
pub fn load(conn: &Connection, scenario: ScenarioId) -> StoreResult<Option<Baseline>> {
    let Some((vitals, monitor)) = load_vitals(conn, scenario)? else {
        return Ok(None);
    };
    Ok(Some(Baseline {
        vitals,
        monitor,
        venous: list_accesses(conn, scenario, AccessKind::Venous)?,
        arterial: list_accesses(conn, scenario, AccessKind::Arterial)?,
    }))
}

/// Overwrite every vital column. Returns false when there is no baseline row.
pub fn write_vitals(
    conn: &Connection,
    scenario: ScenarioId,
    vitals: &VitalSigns,
) -> StoreResult<bool> {
    let sql = format!(
        "UPDATE baselines SET {} WHERE scenario_id = ?1",
        vital_assignments(2)
    );
    let mut values = vec![Value::Integer(scenario.get())];
    values.extend(vital_values(vitals));
    let updated = conn.execute(&sql, params_from_iter(values))?;
    Ok(updated > 0)
}

/// Overwrite one vital column. Returns false when there is no baseline row.
pub fn write_field(
    conn: &Connection,
    scenario: ScenarioId,
    field: VitalField,
    value: Option<VitalValue>,
) -> StoreResult<bool> {
    let sql = format!(
        "UPDATE baselines SET {} = ?1 WHERE scenario_id = ?2",
        field.name()
    );
    let updated = conn.execute(&sql, params![to_value(value), scenario.get()])?;
    Ok(updated > 0)
}

pub fn set_monitor(conn: &Connection, scenario: ScenarioId, monitor: &str) -> StoreResult<bool> {
    let updated = conn.execute(
        "UPDATE baselines SET monitor = ?1 WHERE scenario_id = ?2",
        params![monitor, scenario.get()],
    )?;
    Ok(updated > 0)
}

pub fn list_accesses(
    conn: &Connection,
    scenario: ScenarioId,
    kind: AccessKind,
) -> StoreResult<Vec<VascularAccess>> {
    let mut stmt = conn.prepare(
        "SELECT id, category, site, side, gauge FROM vascular_accesses
         WHERE scenario_id = ?1 AND kind = ?2 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![scenario.get(), kind.as_str()], |row| {
        Ok(VascularAccess {
            id: Some(AccessId::new(row.get("id")?)),
            category: row.get("category")?,
            site: row.get("site")?,
            side: row.get("side")?,
            gauge: row.get("gauge")?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn add_access(
    conn: &Connection,
    scenario: ScenarioId,
    kind: AccessKind,
    access: &VascularAccess,
) -> StoreResult<AccessId> {
    conn.execute(
        "INSERT INTO vascular_accesses (scenario_id, kind, category, site, side, gauge)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            scenario.get(),
            kind.as_str(),
            access.category,
            access.site,
            access.side,
            access.gauge
        ],
    )?;
    Ok(AccessId::new(conn.last_insert_rowid()))
}

/// Replace one access list wholesale. Returned ids follow input order.
pub fn replace_accesses(
    conn: &Connection,
    scenario: ScenarioId,
    kind: AccessKind,
    accesses: &[VascularAccess],
) -> StoreResult<Vec<AccessId>> {
    conn.execute(
        "DELETE FROM vascular_accesses WHERE scenario_id = ?1 AND kind = ?2",
        params![scenario.get(), kind.as_str()],
    )?;
    accesses
        .iter()
        .map(|access| add_access(conn, scenario, kind, access))
        .collect()
}

/// Remove one access. Returns whether a row was removed.
pub fn delete_access(conn: &Connection, scenario: ScenarioId, id: AccessId) -> StoreResult<bool> {
    let removed = conn.execute(
        "DELETE FROM vascular_accesses WHERE scenario_id = ?1 AND id = ?2",
        params![scenario.get(), id.get()],
    )?;
    Ok(removed > 0)
}

/// Baseline vitals, failing when the scenario has no baseline row.
pub fn require_vitals(conn: &Connection, scenario: ScenarioId) -> StoreResult<VitalSigns> {
    load_vitals(conn, scenario)?
        .map(|(vitals, _)| vitals)
        .ok_or(StoreError::ScenarioNotFound { scenario })
}
