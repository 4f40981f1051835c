//! Timeline persistence: replace-on-save, load, node deletion and field patches.

use std::collections::BTreeMap;

use sc_core::{NodeIndex, ScenarioId};
use sc_store::{NodePatch, ScenarioStore, nodes, params};
use sc_timeline::validate::{self, Field};
use sc_timeline::{TimelineGraph, TimelineNode};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::scenario_service;

pub use crate::scenario_service::is_pediatric;

/// What a save wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveSummary {
    pub nodes: usize,
    pub parameters: usize,
}

/// Replace the stored timeline of a scenario with `graph`.
///
/// Every node is validated before the first write; on failure nothing is
/// touched. The delete-and-reinsert runs in one transaction, so a store
/// failure leaves the previous timeline in place. Vitals are stored in
/// normalized form. The baseline is not updated by this call.
pub fn save(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    graph: &TimelineGraph,
) -> AppResult<SaveSummary> {
    validate::validate_graph(graph)?;

    let summary = store.write(|tx| -> AppResult<_> {
        scenario_service::ensure_exists(tx, scenario)?;
        let dropped_params = params::delete_all_for(tx, scenario)?;
        let dropped_nodes = nodes::delete_all(tx, scenario)?;
        debug!(scenario = %scenario, dropped_nodes, dropped_params, "cleared stored timeline");

        let mut summary = SaveSummary::default();
        for node in graph.nodes() {
            let stored = TimelineNode {
                vitals: node.vitals.normalized(),
                ..node.clone()
            };
            nodes::insert(tx, scenario, &stored)?;
            summary.nodes += 1;
        }
        for node in graph.nodes() {
            for (name, p) in &node.parameters {
                let unit = Some(p.unit.as_str());
                params::upsert(tx, scenario, node.index, name.trim(), p.value, unit)?;
                summary.parameters += 1;
            }
        }
        Ok(summary)
    })?;

    let dangling = graph.dangling_successors();
    if !dangling.is_empty() {
        debug!(scenario = %scenario, ?dangling, "timeline has successors without nodes");
    }
    info!(
        scenario = %scenario,
        nodes = summary.nodes,
        parameters = summary.parameters,
        "saved timeline"
    );
    Ok(summary)
}

/// Load the stored timeline, nodes ordered by index with their parameters.
///
/// A scenario without a timeline yields an empty graph.
pub fn load(store: &ScenarioStore, scenario: ScenarioId) -> AppResult<TimelineGraph> {
    let conn = store.connection();
    let mut by_index: BTreeMap<NodeIndex, TimelineNode> = nodes::load_all(conn, scenario)?
        .into_iter()
        .map(|node| (node.index, node))
        .collect();

    for p in params::list_scenario(conn, scenario)? {
        // parameters of node 0 may exist without a timeline (baseline level)
        if let Some(node) = by_index.get_mut(&p.node) {
            node.set_parameter(p.name, p.value, Some(p.unit.as_str()));
        }
    }

    Ok(TimelineGraph::from_stored(by_index.into_values().collect()))
}

/// Delete one node and its own parameters. Missing nodes are a no-op.
///
/// Successors of other nodes that pointed here are left as they are.
pub fn delete_node(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    index: NodeIndex,
) -> AppResult<bool> {
    let removed = store.write(|tx| -> AppResult<_> {
        if !nodes::delete(tx, scenario, index)? {
            return Ok(false);
        }
        params::delete_for_node(tx, scenario, index)?;
        Ok(true)
    })?;
    if removed {
        info!(scenario = %scenario, node = %index, "deleted timeline node");
    } else {
        debug!(scenario = %scenario, node = %index, "node to delete was not stored");
    }
    Ok(removed)
}

pub fn set_action(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    index: NodeIndex,
    action: &str,
) -> AppResult<()> {
    patch(store, scenario, index, NodePatch::Action(action.to_string()))
}

/// Set both branch successors. Indices must be >= 0 but need not exist.
pub fn set_successors(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    index: NodeIndex,
    done: i64,
    not_done: i64,
) -> AppResult<()> {
    validate::validate_successor(Field::OnActionDone, done).map_err(|e| e.at(index))?;
    validate::validate_successor(Field::OnActionNotDone, not_done).map_err(|e| e.at(index))?;
    patch(store, scenario, index, NodePatch::Successors { done, not_done })
}

/// Set the action text and both successors in one write.
///
/// Successors are checked first; on failure the node is left as it was.
pub fn set_branch(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    index: NodeIndex,
    action: &str,
    done: i64,
    not_done: i64,
) -> AppResult<()> {
    validate::validate_successor(Field::OnActionDone, done).map_err(|e| e.at(index))?;
    validate::validate_successor(Field::OnActionNotDone, not_done).map_err(|e| e.at(index))?;
    let branch = NodePatch::Branch {
        action: action.to_string(),
        done,
        not_done,
    };
    patch(store, scenario, index, branch)
}

pub fn set_notes(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    index: NodeIndex,
    notes: Option<&str>,
) -> AppResult<()> {
    patch(store, scenario, index, NodePatch::Notes(notes.map(str::to_string)))
}

/// Set the caregiver role text. Stored for any scenario; presenters only
/// show it when [`is_pediatric`] holds.
pub fn set_caregiver_role(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    index: NodeIndex,
    role: Option<&str>,
) -> AppResult<()> {
    if role.is_some() && !scenario_service::is_pediatric(store, scenario)? {
        warn!(scenario = %scenario, node = %index, "caregiver role on a non-pediatric scenario");
    }
    patch(store, scenario, index, NodePatch::CaregiverRole(role.map(str::to_string)))
}

pub fn set_timer(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    index: NodeIndex,
    seconds: i64,
) -> AppResult<()> {
    validate::validate_timer(seconds).map_err(|e| e.at(index))?;
    patch(store, scenario, index, NodePatch::Timer(seconds))
}

fn patch(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    index: NodeIndex,
    patch: NodePatch,
) -> AppResult<()> {
    let updated =
        store.write(|tx| -> AppResult<_> { Ok(nodes::patch(tx, scenario, index, &patch)?) })?;
    if !updated {
        return Err(AppError::node_not_found(scenario, index));
    }
    debug!(scenario = %scenario, node = %index, ?patch, "patched node");
    Ok(())
}
