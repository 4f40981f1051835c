//! Single-field vital-sign edits and the baseline/root mirror.
//!
//! This is the only module that writes vitals into both the baseline and
//! node 0. Both writes of a mirrored edit share one transaction.

use sc_core::{NodeIndex, ParameterId, ScenarioId, VitalField, VitalSigns, VitalValue};
use sc_store::{Connection, ScenarioStore, StoreResult, baseline, nodes};
use sc_timeline::validate;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::{parameter_service, scenario_service};

/// Where an edit landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedTo {
    /// Baseline only; the scenario has no root node.
    Baseline,
    /// Baseline and node 0.
    BaselineAndRoot,
    /// A non-root node.
    Node(NodeIndex),
    /// The name was not a vital sign and went to the parameter registry.
    Parameter { node: NodeIndex, id: ParameterId },
}

/// Apply a textual edit coming from the monitor.
///
/// `node == None` targets the baseline. Names outside the fixed vital set
/// are treated as additional parameters on `node` (default 0).
pub fn apply(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    node: Option<NodeIndex>,
    field_name: &str,
    raw_value: &str,
) -> AppResult<AppliedTo> {
    match VitalField::from_name(field_name) {
        Some(field) => {
            let value = validate::parse_vital_value(field, raw_value)?;
            apply_value(store, scenario, node, field, value)
        }
        None => {
            let value = validate::parse_parameter_value(field_name, raw_value)?;
            let node = node.unwrap_or(NodeIndex::ROOT);
            let id = parameter_service::upsert(store, scenario, node, field_name, value, None)?;
            Ok(AppliedTo::Parameter { node, id })
        }
    }
}

/// Apply a typed value (`None` clears the field).
pub fn apply_value(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    node: Option<NodeIndex>,
    field: VitalField,
    value: Option<VitalValue>,
) -> AppResult<AppliedTo> {
    let value = match value {
        Some(v) => {
            validate::validate_value(field, &v)?;
            field.normalize(v)?
        }
        None => None,
    };

    let applied = store.write(|tx| -> AppResult<_> {
        scenario_service::ensure_exists(tx, scenario)?;
        match node {
            None => {
                if !baseline::write_field(tx, scenario, field, value.clone())? {
                    return Err(AppError::NotFound(format!("baseline of scenario {}", scenario)));
                }
                if nodes::write_field(tx, scenario, NodeIndex::ROOT, field, value.clone())? {
                    Ok(AppliedTo::BaselineAndRoot)
                } else {
                    Ok(AppliedTo::Baseline)
                }
            }
            Some(index) if index.is_root() => {
                if !nodes::write_field(tx, scenario, index, field, value.clone())? {
                    return Err(AppError::node_not_found(scenario, index));
                }
                if !baseline::write_field(tx, scenario, field, value.clone())? {
                    return Err(AppError::NotFound(format!("baseline of scenario {}", scenario)));
                }
                Ok(AppliedTo::BaselineAndRoot)
            }
            Some(index) => {
                if !nodes::write_field(tx, scenario, index, field, value.clone())? {
                    return Err(AppError::node_not_found(scenario, index));
                }
                Ok(AppliedTo::Node(index))
            }
        }
    })?;

    debug!(scenario = %scenario, field = %field, ?applied, "applied vital sign edit");
    Ok(applied)
}

/// Copy a whole (already normalized) vital set into node 0, if it exists.
///
/// Runs inside the caller's transaction. Returns whether node 0 was written.
pub(crate) fn mirror_to_root(
    conn: &Connection,
    scenario: ScenarioId,
    vitals: &VitalSigns,
) -> StoreResult<bool> {
    let mirrored = nodes::write_vitals(conn, scenario, NodeIndex::ROOT, vitals)?;
    if mirrored {
        info!(scenario = %scenario, "mirrored baseline vitals into root node");
    }
    Ok(mirrored)
}
