//! Scenario creation, lookup and deletion.

use chrono::Utc;
use sc_core::ScenarioId;
use sc_store::{Connection, ScenarioRecord, ScenarioStore, baseline, scenarios};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Create a scenario together with its empty baseline.
pub fn create(store: &mut ScenarioStore, title: &str, pediatric: bool) -> AppResult<ScenarioId> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput(
            "Scenario title must not be empty".to_string(),
        ));
    }
    let id = store.write(|tx| -> AppResult<_> {
        let id = scenarios::insert(tx, title, pediatric, Utc::now())?;
        baseline::insert_empty(tx, id)?;
        Ok(id)
    })?;
    info!(scenario = %id, pediatric, "created scenario");
    Ok(id)
}

/// Delete a scenario and everything it owns. Missing scenarios are a no-op.
pub fn delete(store: &mut ScenarioStore, scenario: ScenarioId) -> AppResult<bool> {
    let removed = store.write(|tx| -> AppResult<_> { Ok(scenarios::delete(tx, scenario)?) })?;
    if removed {
        info!(scenario = %scenario, "deleted scenario");
    }
    Ok(removed)
}

pub fn get(store: &ScenarioStore, scenario: ScenarioId) -> AppResult<ScenarioRecord> {
    scenarios::get(store.connection(), scenario)?
        .ok_or_else(|| AppError::scenario_not_found(scenario))
}

pub fn list(store: &ScenarioStore) -> AppResult<Vec<ScenarioRecord>> {
    Ok(scenarios::list(store.connection())?)
}

/// Whether the scenario is pediatric (decides if caregiver roles are shown).
pub fn is_pediatric(store: &ScenarioStore, scenario: ScenarioId) -> AppResult<bool> {
    scenarios::is_pediatric(store.connection(), scenario)?
        .ok_or_else(|| AppError::scenario_not_found(scenario))
}

pub(crate) fn ensure_exists(conn: &Connection, scenario: ScenarioId) -> AppResult<()> {
    if scenarios::exists(conn, scenario)? {
        Ok(())
    } else {
        Err(AppError::scenario_not_found(scenario))
    }
}
