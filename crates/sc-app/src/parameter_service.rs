//! The per-node additional-parameter registry.

use sc_core::{NodeIndex, ParameterId, ScenarioId};
use sc_store::{ScenarioStore, params};
use sc_timeline::AdditionalParameter;
use sc_timeline::validate;
use tracing::debug;

use crate::catalog;
use crate::error::AppResult;
use crate::scenario_service;

/// Parameters of one node, ordered by id. Empty when there are none.
pub fn list_for(
    store: &ScenarioStore,
    scenario: ScenarioId,
    node: NodeIndex,
) -> AppResult<Vec<AdditionalParameter>> {
    Ok(params::list_for(store.connection(), scenario, node)?)
}

/// Add a parameter or update the value of an existing one with the same name.
///
/// Without an explicit unit an existing row keeps its unit. A new row takes
/// the catalog unit of its name, or an empty one.
pub fn upsert(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    node: NodeIndex,
    name: &str,
    value: f64,
    unit: Option<&str>,
) -> AppResult<ParameterId> {
    validate::validate_parameter(name, value)?;
    let name = name.trim();
    let default_unit = catalog::unit_for(name);

    let id = store.write(|tx| -> AppResult<_> {
        scenario_service::ensure_exists(tx, scenario)?;
        Ok(params::upsert_with_default(
            tx,
            scenario,
            node,
            name,
            value,
            unit,
            default_unit,
        )?)
    })?;
    debug!(scenario = %scenario, node = %node, name, value, id = %id, "upserted parameter");
    Ok(id)
}

/// Same as [`upsert`], parsing the value from user text ("7,4" is accepted).
pub fn upsert_text(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    node: NodeIndex,
    name: &str,
    raw_value: &str,
    unit: Option<&str>,
) -> AppResult<ParameterId> {
    let value = validate::parse_parameter_value(name, raw_value)?;
    upsert(store, scenario, node, name, value, unit)
}

/// Remove every parameter of a scenario; returns how many were removed.
pub fn delete_all_for(store: &mut ScenarioStore, scenario: ScenarioId) -> AppResult<usize> {
    let removed = store.write(|tx| -> AppResult<_> { Ok(params::delete_all_for(tx, scenario)?) })?;
    debug!(scenario = %scenario, removed, "deleted parameters");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use sc_timeline::Rule;

    fn setup() -> (ScenarioStore, ScenarioId) {
        let mut store = ScenarioStore::open_in_memory().unwrap();
        let id = scenario_service::create(&mut store, "DKA", false).unwrap();
        (store, id)
    }

    #[test]
    fn catalog_supplies_missing_unit() {
        let (mut store, id) = setup();
        upsert(&mut store, id, NodeIndex::ROOT, "LAC", 3.1, None).unwrap();
        upsert(&mut store, id, NodeIndex::ROOT, "pain score", 6.0, None).unwrap();

        let listed = list_for(&store, id, NodeIndex::ROOT).unwrap();
        assert_eq!(listed[0].unit, "mmol/L");
        assert_eq!(listed[1].unit, "");
    }

    #[test]
    fn catalog_unit_does_not_replace_stored_unit() {
        let (mut store, id) = setup();
        upsert(&mut store, id, NodeIndex::ROOT, "PVC", 12.0, Some("mmHg")).unwrap();
        upsert(&mut store, id, NodeIndex::ROOT, "PVC", 9.0, None).unwrap();

        let listed = list_for(&store, id, NodeIndex::ROOT).unwrap();
        assert_eq!(listed[0].value, 9.0);
        assert_eq!(listed[0].unit, "mmHg");
    }

    #[test]
    fn upsert_text_rejects_bad_numbers() {
        let (mut store, id) = setup();
        let err = upsert_text(&mut store, id, NodeIndex::ROOT, "GLY", "high", None).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.rule == Rule::Numeric));
        assert_eq!(
            upsert_text(&mut store, id, NodeIndex::ROOT, "K", "5,2", None).map(|_| ()).ok(),
            Some(())
        );
        assert_eq!(list_for(&store, id, NodeIndex::ROOT).unwrap()[0].value, 5.2);
    }

    #[test]
    fn delete_all_for_scenario() {
        let (mut store, id) = setup();
        upsert(&mut store, id, NodeIndex::ROOT, "NA", 140.0, None).unwrap();
        upsert(&mut store, id, NodeIndex::new(2), "NA", 128.0, None).unwrap();
        assert_eq!(delete_all_for(&mut store, id).unwrap(), 2);
        assert!(list_for(&store, id, NodeIndex::new(2)).unwrap().is_empty());
    }

    #[test]
    fn unknown_scenario_is_not_found() {
        let mut store = ScenarioStore::open_in_memory().unwrap();
        let err = upsert(&mut store, ScenarioId::new(3), NodeIndex::ROOT, "CO", 5.0, None)
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
