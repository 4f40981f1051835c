//! Integration tests for sc-timeline.

use sc_core::{NodeIndex, VitalField, VitalSigns};
use sc_timeline::validate::validate_graph;
use sc_timeline::{Field, Rule, TimelineBuilder, TimelineGraph, TimelineNode};

const RESPIRATORY_DISTRESS: &str = r#"
nodes:
  - index: 0
    blood_pressure: "110/70"
    heart_rate: 118
    spo2: 86
    action: "Apply oxygen mask"
    on_action_done: 1
    on_action_not_done: 2
    timer_s: 120
  - index: 1
    heart_rate: 96
    spo2: 95
    fio2: 40
    oxygen_flow: 8
    action: "Reassess"
    on_action_done: 0
    on_action_not_done: 0
    parameters:
      LAC:
        value: 2.4
        unit: mmol/L
  - index: 2
    spo2: 78
    notes: "Patient becomes drowsy"
    on_action_done: 7
"#;

#[test]
fn yaml_timeline_builds_and_validates() {
    let raw: TimelineGraph = serde_yaml::from_str(RESPIRATORY_DISTRESS).unwrap();
    let graph: TimelineBuilder = raw.into_nodes().into_iter().collect();
    let graph = graph.build().unwrap();

    assert_eq!(graph.len(), 3);
    let root = graph.root().unwrap();
    assert_eq!(root.vitals.blood_pressure.as_deref(), Some("110/70"));
    assert_eq!(root.timer_s, 120);
    assert_eq!(root.done_successor(), Some(NodeIndex::new(1)));

    let reassess = graph.node(NodeIndex::new(1)).unwrap();
    assert_eq!(reassess.vitals.oxygen_flow, Some(8.0));
    assert_eq!(reassess.parameter("LAC").unwrap().unit, "mmol/L");
    assert_eq!(graph.parameter_count(), 1);

    // node 2 points at a node that was never authored
    assert_eq!(
        graph.dangling_successors(),
        vec![(NodeIndex::new(2), NodeIndex::new(7))]
    );
}

#[test]
fn invalid_last_node_fails_whole_graph() {
    let mut builder = TimelineBuilder::new();
    builder.add(TimelineNode::new(NodeIndex::ROOT).with_branches("a", 1, 1));
    builder.add(TimelineNode::new(NodeIndex::new(1)).with_branches("b", 2, 2));
    builder.add(TimelineNode::new(NodeIndex::new(2)).with_vitals(VitalSigns {
        spo2: Some(120),
        ..VitalSigns::default()
    }));

    let err = builder.build().unwrap_err();
    assert_eq!(err.node, Some(NodeIndex::new(2)));
    assert_eq!(err.field, Field::Vital(VitalField::SpO2));
    assert_eq!(err.rule, Rule::Percentage);
}

#[test]
fn graph_without_root_is_valid() {
    let mut builder = TimelineBuilder::new();
    builder.add(TimelineNode::new(NodeIndex::new(3)));
    let graph = builder.build().unwrap();
    assert!(graph.root().is_none());
    assert!(validate_graph(&graph).is_ok());
}

#[test]
fn serialized_graph_keeps_vitals_flat() {
    let mut builder = TimelineBuilder::new();
    builder.add(
        TimelineNode::new(NodeIndex::ROOT).with_vitals(VitalSigns {
            heart_rate: Some(80),
            ..VitalSigns::default()
        }),
    );
    let graph = builder.build().unwrap();

    let yaml = serde_yaml::to_string(&graph).unwrap();
    assert!(yaml.contains("heart_rate: 80"));
    let back: TimelineGraph = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, graph);
}
