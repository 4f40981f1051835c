//! Vital-sign and timeline validation.
//!
//! Every function here is pure: it inspects its input and reports the first
//! violated rule without touching storage. The same checks guard the
//! baseline write path and the timeline write path.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use sc_core::{NodeIndex, ValueKind, VitalField, VitalSigns, VitalValue};

use crate::graph::TimelineGraph;
use crate::node::TimelineNode;

static BLOOD_PRESSURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\s*/\s*\d+\s*$").expect("static blood pressure pattern"));

/// The field a validation rule was checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Vital(VitalField),
    OnActionDone,
    OnActionNotDone,
    Timer,
    /// An additional parameter, by name.
    Parameter(String),
    NodeIndex,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Vital(v) => write!(f, "{}", v.name()),
            Field::OnActionDone => f.write_str("on_action_done"),
            Field::OnActionNotDone => f.write_str("on_action_not_done"),
            Field::Timer => f.write_str("timer_s"),
            Field::Parameter(name) => write!(f, "parameter '{}'", name),
            Field::NodeIndex => f.write_str("index"),
        }
    }
}

/// The rule that was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Value must be >= 0.
    NonNegative,
    /// Value must lie in [0, 100].
    Percentage,
    /// Text must look like "systolic/diastolic".
    BloodPressureFormat,
    /// Text input did not parse as a number of the expected kind.
    Numeric,
    /// Node index already used in the same timeline.
    UniqueIndex,
    /// No index above this one is representable.
    IndexLimit,
    NonEmptyName,
    /// Parameter name already used on the same node (compared trimmed).
    UniqueName,
    Finite,
}

impl Rule {
    pub fn describe(self) -> &'static str {
        match self {
            Rule::NonNegative => "must be >= 0",
            Rule::Percentage => "must be between 0 and 100",
            Rule::BloodPressureFormat => "must have the form systolic/diastolic",
            Rule::Numeric => "is not a valid number",
            Rule::UniqueIndex => "is already used by another node",
            Rule::IndexLimit => "leaves no index for a following node",
            Rule::NonEmptyName => "must have a non-empty name",
            Rule::UniqueName => "is already used on this node",
            Rule::Finite => "must be a finite number",
        }
    }
}

/// A rejected value: which field, which rule and, when known, which node.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub node: Option<NodeIndex>,
    pub field: Field,
    pub rule: Rule,
    /// The offending value as text.
    pub value: String,
}

impl ValidationError {
    pub fn new(field: Field, rule: Rule, value: impl ToString) -> Self {
        Self {
            node: None,
            field,
            rule,
            value: value.to_string(),
        }
    }

    pub fn at(mut self, node: NodeIndex) -> Self {
        self.node = Some(node);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(node) => write!(
                f,
                "Node {}: {} {} (got '{}')",
                node,
                self.field,
                self.rule.describe(),
                self.value
            ),
            None => write!(
                f,
                "{} {} (got '{}')",
                self.field,
                self.rule.describe(),
                self.value
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a single vital-sign value against the rule of its field.
pub fn validate_value(field: VitalField, value: &VitalValue) -> Result<(), ValidationError> {
    let fail = |rule| Err(ValidationError::new(Field::Vital(field), rule, value));

    if field == VitalField::BloodPressure {
        return match value {
            VitalValue::Text(text) if text.trim().is_empty() => Ok(()),
            VitalValue::Text(text) if BLOOD_PRESSURE.is_match(text) => Ok(()),
            _ => fail(Rule::BloodPressureFormat),
        };
    }

    let number = match *value {
        VitalValue::Integer(v) => f64::from(v),
        VitalValue::Decimal(v) => v,
        VitalValue::Text(_) => return fail(Rule::Numeric),
    };
    if !number.is_finite() {
        return fail(Rule::Finite);
    }

    match field {
        VitalField::SpO2 | VitalField::FiO2 if !(0.0..=100.0).contains(&number) => {
            fail(Rule::Percentage)
        }
        VitalField::HeartRate
        | VitalField::RespiratoryRate
        | VitalField::EtCO2
        | VitalField::OxygenFlow
            if number < 0.0 =>
        {
            fail(Rule::NonNegative)
        }
        _ => Ok(()),
    }
}

/// Check every recorded field of a vital-sign set. Absent fields are valid.
pub fn validate_vitals(vitals: &VitalSigns) -> Result<(), ValidationError> {
    vitals
        .recorded()
        .try_for_each(|(field, value)| validate_value(field, &value))
}

pub fn validate_successor(field: Field, raw: i64) -> Result<(), ValidationError> {
    if raw < 0 {
        return Err(ValidationError::new(field, Rule::NonNegative, raw));
    }
    Ok(())
}

pub fn validate_timer(seconds: i64) -> Result<(), ValidationError> {
    if seconds < 0 {
        return Err(ValidationError::new(Field::Timer, Rule::NonNegative, seconds));
    }
    Ok(())
}

pub fn validate_parameter(name: &str, value: f64) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new(
            Field::Parameter(name.to_string()),
            Rule::NonEmptyName,
            name,
        ));
    }
    if !value.is_finite() {
        return Err(ValidationError::new(
            Field::Parameter(name.to_string()),
            Rule::Finite,
            value,
        ));
    }
    Ok(())
}

/// Validate one node: vitals, successors, timer and its parameters.
///
/// Errors are tagged with the node index.
pub fn validate_node(node: &TimelineNode) -> Result<(), ValidationError> {
    validate_vitals(&node.vitals)
        .and_then(|()| validate_successor(Field::OnActionDone, node.on_action_done))
        .and_then(|()| validate_successor(Field::OnActionNotDone, node.on_action_not_done))
        .and_then(|()| validate_timer(node.timer_s))
        .and_then(|()| validate_parameters(node))
        .map_err(|e| e.at(node.index))
}

fn validate_parameters(node: &TimelineNode) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for (name, p) in &node.parameters {
        validate_parameter(name, p.value)?;
        if !seen.insert(name.trim()) {
            return Err(ValidationError::new(
                Field::Parameter(name.to_string()),
                Rule::UniqueName,
                name,
            ));
        }
    }
    Ok(())
}

/// Validate a whole graph: unique indices, then every node in index order.
///
/// Successors are not required to reference existing nodes.
pub fn validate_graph(graph: &TimelineGraph) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for node in graph.nodes() {
        if !seen.insert(node.index) {
            let err = ValidationError::new(Field::NodeIndex, Rule::UniqueIndex, node.index);
            return Err(err.at(node.index));
        }
    }
    graph.nodes().iter().try_for_each(validate_node)
}

/// Parse user-entered text for a single vital-sign field.
///
/// Empty input clears the field (`Ok(None)`). Decimal fields accept either a
/// dot or a comma as separator. The parsed value is validated.
pub fn parse_vital_value(
    field: VitalField,
    raw: &str,
) -> Result<Option<VitalValue>, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let numeric = || ValidationError::new(Field::Vital(field), Rule::Numeric, text);

    let value = match field.kind() {
        ValueKind::Text => VitalValue::Text(text.to_string()),
        ValueKind::Integer => VitalValue::Integer(text.parse::<i32>().map_err(|_| numeric())?),
        ValueKind::Decimal => VitalValue::Decimal(parse_decimal(text).ok_or_else(numeric)?),
    };
    validate_value(field, &value)?;
    Ok(Some(value))
}

/// Parse the textual value of an additional parameter.
pub fn parse_parameter_value(name: &str, raw: &str) -> Result<f64, ValidationError> {
    let text = raw.trim();
    let value = parse_decimal(text).ok_or_else(|| {
        ValidationError::new(Field::Parameter(name.to_string()), Rule::Numeric, text)
    })?;
    validate_parameter(name, value)?;
    Ok(value)
}

fn parse_decimal(text: &str) -> Option<f64> {
    text.replace(',', ".").parse::<f64>().ok()
}


#[cfg(test)]
mod purity {
    use super::*;
    use proptest::prelude::*;

    fn arb_vitals() -> impl Strategy<Value = VitalSigns> {
        (
            proptest::option::of("[0-9]{1,3}/[0-9]{1,3}|[a-z ]{0,6}"),
            proptest::option::of(-20..250_i32),
            proptest::option::of(-20..80_i32),
            proptest::option::of(30.0..45.0_f64),
            proptest::option::of(-10..120_i32),
            proptest::option::of(-10..120_i32),
            proptest::option::of(-5.0..20.0_f64),
            proptest::option::of(-10..90_i32),
        )
            .prop_map(|(bp, hr, rr, t, spo2, fio2, flow, etco2)| VitalSigns {
                blood_pressure: bp,
                heart_rate: hr,
                respiratory_rate: rr,
                temperature: t,
                spo2,
                fio2,
                oxygen_flow: flow,
                etco2,
            })
    }

    proptest! {
        #[test]
        fn validation_is_deterministic_and_leaves_input_untouched(v in arb_vitals()) {
            let before = v.clone();
            let first = validate_vitals(&v);
            let second = validate_vitals(&v);
            prop_assert_eq!(first, second);
            prop_assert_eq!(v, before);
        }

        #[test]
        fn in_range_percentages_always_pass(spo2 in 0..=100_i32, fio2 in 0..=100_i32) {
            let v = VitalSigns { spo2: Some(spo2), fio2: Some(fio2), ..VitalSigns::default() };
            prop_assert!(validate_vitals(&v).is_ok());
        }
    }
}
