//! Baseline loading and saving.

use sc_core::{AccessId, AccessKind, Baseline, ScenarioId, VascularAccess};
use sc_store::{Connection, ScenarioStore, baseline};
use sc_timeline::validate;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::vitals_service;

fn baseline_not_found(scenario: ScenarioId) -> AppError {
    AppError::NotFound(format!("baseline of scenario {}", scenario))
}

fn ensure_baseline(conn: &Connection, scenario: ScenarioId) -> AppResult<()> {
    if baseline::exists(conn, scenario)? {
        Ok(())
    } else {
        Err(baseline_not_found(scenario))
    }
}

pub fn load(store: &ScenarioStore, scenario: ScenarioId) -> AppResult<Baseline> {
    baseline::load(store.connection(), scenario)?.ok_or_else(|| baseline_not_found(scenario))
}

/// Save the whole baseline.
///
/// Vitals are validated and normalized first. One transaction writes vitals
/// and monitor text, replaces both access lists and, when node 0 exists,
/// mirrors the vitals into it.
pub fn save(store: &mut ScenarioStore, scenario: ScenarioId, record: &Baseline) -> AppResult<()> {
    validate::validate_vitals(&record.vitals)?;
    let vitals = record.vitals.normalized();

    let mirrored = store.write(|tx| -> AppResult<_> {
        if !baseline::write_vitals(tx, scenario, &vitals)? {
            return Err(baseline_not_found(scenario));
        }
        baseline::set_monitor(tx, scenario, &record.monitor)?;
        for kind in [AccessKind::Venous, AccessKind::Arterial] {
            baseline::replace_accesses(tx, scenario, kind, record.accesses(kind))?;
        }
        Ok(vitals_service::mirror_to_root(tx, scenario, &vitals)?)
    })?;

    info!(
        scenario = %scenario,
        venous = record.venous.len(),
        arterial = record.arterial.len(),
        mirrored,
        "saved baseline"
    );
    Ok(())
}

pub fn add_access(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    kind: AccessKind,
    access: &VascularAccess,
) -> AppResult<AccessId> {
    let id = store.write(|tx| -> AppResult<_> {
        ensure_baseline(tx, scenario)?;
        Ok(baseline::add_access(tx, scenario, kind, access)?)
    })?;
    debug!(scenario = %scenario, %kind, access = %id, "added vascular access");
    Ok(id)
}

/// Remove one access. Returns whether it existed.
pub fn delete_access(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    id: AccessId,
) -> AppResult<bool> {
    let removed =
        store.write(|tx| -> AppResult<_> { Ok(baseline::delete_access(tx, scenario, id)?) })?;
    debug!(scenario = %scenario, access = %id, removed, "deleted vascular access");
    Ok(removed)
}

pub fn update_monitor(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    monitor: &str,
) -> AppResult<()> {
    let updated =
        store.write(|tx| -> AppResult<_> { Ok(baseline::set_monitor(tx, scenario, monitor)?) })?;
    if !updated {
        return Err(baseline_not_found(scenario));
    }
    Ok(())
}
