//! Timeline nodes and their additional parameters.

use indexmap::IndexMap;
use sc_core::{NodeIndex, ParameterId, VitalSigns};
use serde::{Deserialize, Serialize};

/// Value and unit of an author-defined parameter attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterValue {
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

/// A persisted additional parameter, as listed by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalParameter {
    pub id: ParameterId,
    pub node: NodeIndex,
    pub name: String,
    pub value: f64,
    pub unit: String,
}

impl AdditionalParameter {
    /// Value in its persisted text form ("12", "7.4").
    pub fn value_text(&self) -> String {
        self.value.to_string()
    }
}

/// One authored state of the branching timeline.
///
/// `on_action_done` / `on_action_not_done` are plain node indices. They are
/// kept as raw integers so that negative input can be reported by the
/// validator, and they are never checked against the set of existing nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineNode {
    pub index: NodeIndex,
    #[serde(flatten)]
    pub vitals: VitalSigns,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub on_action_done: i64,
    #[serde(default)]
    pub on_action_not_done: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Only meaningful for pediatric scenarios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caregiver_role: Option<String>,
    #[serde(default)]
    pub timer_s: i64,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterValue>,
}

impl TimelineNode {
    pub fn new(index: NodeIndex) -> Self {
        Self {
            index,
            vitals: VitalSigns::default(),
            action: String::new(),
            on_action_done: 0,
            on_action_not_done: 0,
            notes: None,
            caregiver_role: None,
            timer_s: 0,
            parameters: IndexMap::new(),
        }
    }

    pub fn with_vitals(mut self, vitals: VitalSigns) -> Self {
        self.vitals = vitals;
        self
    }

    pub fn with_branches(mut self, action: impl Into<String>, done: i64, not_done: i64) -> Self {
        self.action = action.into();
        self.on_action_done = done;
        self.on_action_not_done = not_done;
        self
    }

    pub fn with_timer(mut self, seconds: i64) -> Self {
        self.timer_s = seconds;
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: f64, unit: &str) -> Self {
        self.set_parameter(name, value, Some(unit));
        self
    }

    /// Add or update a parameter keyed by name.
    ///
    /// An existing entry keeps its unit unless a new one is supplied.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: f64, unit: Option<&str>) {
        let name = name.into();
        match self.parameters.get_mut(&name) {
            Some(existing) => {
                existing.value = value;
                if let Some(unit) = unit {
                    existing.unit = unit.to_string();
                }
            }
            None => {
                self.parameters.insert(
                    name,
                    ParameterValue {
                        value,
                        unit: unit.unwrap_or_default().to_string(),
                    },
                );
            }
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    /// Successor when the action was performed, if the raw value is a valid index.
    pub fn done_successor(&self) -> Option<NodeIndex> {
        NodeIndex::try_from_i64(self.on_action_done).ok()
    }

    /// Successor when the action was not performed.
    pub fn not_done_successor(&self) -> Option<NodeIndex> {
        NodeIndex::try_from_i64(self.on_action_not_done).ok()
    }
}
