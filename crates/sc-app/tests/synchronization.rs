//! Baseline and node 0 always show the same vitals.

use sc_app::{
    AppError, AppliedTo, ScenarioStore, apply_vital_sign_edit, baseline_service,
    list_additional_parameters, parameter_service, scenario_service, timeline_service,
};
use sc_core::{Baseline, NodeIndex, ScenarioId, VitalSigns};
use sc_timeline::{TimelineBuilder, TimelineNode};

fn scenario(store: &mut ScenarioStore, with_root: bool) -> ScenarioId {
    let id = scenario_service::create(store, "Hypoglycemia", false).unwrap();
    if with_root {
        let mut builder = TimelineBuilder::new();
        builder.add(TimelineNode::new(NodeIndex::ROOT).with_branches("Give glucose", 1, 0));
        builder.add(TimelineNode::new(NodeIndex::new(1)));
        timeline_service::save(store, id, &builder.build().unwrap()).unwrap();
    }
    id
}

fn end_state(store: &ScenarioStore, id: ScenarioId) -> (VitalSigns, VitalSigns) {
    let root = timeline_service::load(store, id)
        .unwrap()
        .root()
        .map(|node| node.vitals.clone())
        .unwrap_or_default();
    (baseline_service::load(store, id).unwrap().vitals, root)
}

#[test]
fn baseline_edit_mirrors_into_root() {
    let mut store = ScenarioStore::open_in_memory().unwrap();
    let id = scenario(&mut store, true);

    let applied = apply_vital_sign_edit(&mut store, id, None, "FC", "80").unwrap();
    assert_eq!(applied, AppliedTo::BaselineAndRoot);

    let (baseline, root) = end_state(&store, id);
    assert_eq!(baseline.heart_rate, Some(80));
    assert_eq!(root.heart_rate, Some(80));
}

#[test]
fn mirroring_is_direction_independent() {
    let mut from_baseline = ScenarioStore::open_in_memory().unwrap();
    let a = scenario(&mut from_baseline, true);
    apply_vital_sign_edit(&mut from_baseline, a, None, "FC", "80").unwrap();

    let mut from_root = ScenarioStore::open_in_memory().unwrap();
    let b = scenario(&mut from_root, true);
    apply_vital_sign_edit(&mut from_root, b, Some(NodeIndex::ROOT), "FC", "80").unwrap();

    assert_eq!(end_state(&from_baseline, a), end_state(&from_root, b));
}

#[test]
fn no_mirroring_without_root() {
    let mut store = ScenarioStore::open_in_memory().unwrap();
    let id = scenario(&mut store, false);

    let applied = apply_vital_sign_edit(&mut store, id, None, "FC", "80").unwrap();
    assert_eq!(applied, AppliedTo::Baseline);
    assert_eq!(baseline_service::load(&store, id).unwrap().vitals.heart_rate, Some(80));
    assert!(timeline_service::load(&store, id).unwrap().root().is_none());
}

#[test]
fn edit_of_missing_root_is_not_found_and_writes_nothing() {
    let mut store = ScenarioStore::open_in_memory().unwrap();
    let id = scenario(&mut store, false);

    let err = apply_vital_sign_edit(&mut store, id, Some(NodeIndex::ROOT), "FC", "80").unwrap_err();
    assert!(err.is_not_found());
    assert!(baseline_service::load(&store, id).unwrap().vitals.is_empty());
}

#[test]
fn non_root_edit_leaves_baseline_alone() {
    let mut store = ScenarioStore::open_in_memory().unwrap();
    let id = scenario(&mut store, true);

    let applied =
        apply_vital_sign_edit(&mut store, id, Some(NodeIndex::new(1)), "RR", "30").unwrap();
    assert_eq!(applied, AppliedTo::Node(NodeIndex::new(1)));

    let graph = timeline_service::load(&store, id).unwrap();
    assert_eq!(graph.node(NodeIndex::new(1)).unwrap().vitals.respiratory_rate, Some(30));
    assert_eq!(baseline_service::load(&store, id).unwrap().vitals.respiratory_rate, None);
}

#[test]
fn whole_baseline_save_mirrors_into_root() {
    let mut store = ScenarioStore::open_in_memory().unwrap();
    let id = scenario(&mut store, true);

    let record = Baseline {
        vitals: VitalSigns {
            blood_pressure: Some("150/95".into()),
            temperature: Some(36.94),
            ..VitalSigns::default()
        },
        ..Baseline::default()
    };
    baseline_service::save(&mut store, id, &record).unwrap();

    let (baseline, root) = end_state(&store, id);
    assert_eq!(baseline, root);
    assert_eq!(root.temperature, Some(36.9));
}

#[test]
fn unknown_name_goes_to_parameter_registry() {
    let mut store = ScenarioStore::open_in_memory().unwrap();
    let id = scenario(&mut store, true);

    let applied = apply_vital_sign_edit(&mut store, id, None, "GLY", "45").unwrap();
    let AppliedTo::Parameter { node, .. } = applied else {
        panic!("expected parameter write, got {applied:?}");
    };
    assert_eq!(node, NodeIndex::ROOT);

    let listed = list_additional_parameters(&store, id, NodeIndex::ROOT).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].unit, "mg/dL");
}

#[test]
fn parameter_upsert_is_idempotent() {
    let mut store = ScenarioStore::open_in_memory().unwrap();
    let id = scenario(&mut store, true);
    let one = NodeIndex::new(1);

    let first =
        parameter_service::upsert_text(&mut store, id, one, "PVC", "12", Some("mmHg")).unwrap();
    let second =
        parameter_service::upsert_text(&mut store, id, one, "PVC", "12", Some("mmHg")).unwrap();
    assert_eq!(first, second);

    let listed = list_additional_parameters(&store, id, one).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "PVC");
    assert_eq!(listed[0].value_text(), "12");
    assert_eq!(listed[0].unit, "mmHg");
}

#[test]
fn parameter_edit_without_unit_keeps_stored_unit() {
    let mut store = ScenarioStore::open_in_memory().unwrap();
    let id = scenario(&mut store, true);

    parameter_service::upsert_text(&mut store, id, NodeIndex::ROOT, "PVC", "12", Some("mmHg"))
        .unwrap();
    apply_vital_sign_edit(&mut store, id, None, "PVC", "14").unwrap();

    let listed = list_additional_parameters(&store, id, NodeIndex::ROOT).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].value_text(), "14");
    assert_eq!(listed[0].unit, "mmHg");
}

fn reject_updates_on(store: &ScenarioStore, table: &str) {
    store
        .connection()
        .execute_batch(&format!(
            "CREATE TEMP TRIGGER reject_{table} BEFORE UPDATE ON {table}
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END;"
        ))
        .unwrap();
}

#[test]
fn failed_root_write_keeps_baseline_unchanged() {
    let mut store = ScenarioStore::open_in_memory().unwrap();
    let id = scenario(&mut store, true);
    reject_updates_on(&store, "timeline_nodes");

    let err = apply_vital_sign_edit(&mut store, id, None, "FC", "80").unwrap_err();
    assert!(matches!(err, AppError::Persistence(_)));

    let (baseline, root) = end_state(&store, id);
    assert_eq!(baseline.heart_rate, None);
    assert_eq!(root.heart_rate, None);
}

#[test]
fn failed_baseline_write_keeps_root_unchanged() {
    let mut store = ScenarioStore::open_in_memory().unwrap();
    let id = scenario(&mut store, true);
    reject_updates_on(&store, "baselines");

    let err = apply_vital_sign_edit(&mut store, id, Some(NodeIndex::ROOT), "FC", "80").unwrap_err();
    assert!(matches!(err, AppError::Persistence(_)));

    let (baseline, root) = end_state(&store, id);
    assert_eq!(root.heart_rate, None);
    assert_eq!(baseline.heart_rate, None);
}
