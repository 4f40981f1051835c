//! Column helpers for the vital-sign set stored in `baselines` and `timeline_nodes`.

use rusqlite::Row;
use rusqlite::types::Value;
use sc_core::{VitalField, VitalSigns, VitalValue};

/// Vital columns in `VitalField::ALL` order.
pub(crate) const VITAL_COLUMNS: &str =
    "blood_pressure, heart_rate, respiratory_rate, temperature, spo2, fio2, oxygen_flow, etco2";

pub(crate) fn to_value(value: Option<VitalValue>) -> Value {
    match value {
        None => Value::Null,
        Some(VitalValue::Text(s)) => Value::Text(s),
        Some(VitalValue::Integer(i)) => Value::Integer(i64::from(i)),
        Some(VitalValue::Decimal(d)) => Value::Real(d),
    }
}

pub(crate) fn vital_values(vitals: &VitalSigns) -> Vec<Value> {
    VitalField::ALL
        .iter()
        .map(|field| to_value(vitals.get(*field)))
        .collect()
}

/// `"blood_pressure = ?3, heart_rate = ?4, ..."`, numbering from `first`.
pub(crate) fn vital_assignments(first: usize) -> String {
    VitalField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{} = ?{}", field.name(), first + i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `"?1, ?2, ..., ?n"`
pub(crate) fn placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn read_vitals(row: &Row<'_>) -> rusqlite::Result<VitalSigns> {
    Ok(VitalSigns {
        blood_pressure: row.get("blood_pressure")?,
        heart_rate: row.get("heart_rate")?,
        respiratory_rate: row.get("respiratory_rate")?,
        temperature: row.get("temperature")?,
        spo2: row.get("spo2")?,
        fio2: row.get("fio2")?,
        oxygen_flow: row.get("oxygen_flow")?,
        etco2: row.get("etco2")?,
    })
}
