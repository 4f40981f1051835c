//! The fixed vital-sign field set.
//!
//! The same set is carried by the scenario baseline and by every timeline
//! node. Every field is optional: an absent value means "not recorded".

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Storage kind of a vital-sign field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Integer,
    Decimal,
}

impl ValueKind {
    pub fn describe(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Decimal => "decimal",
        }
    }
}

/// One of the fixed vital-sign fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum VitalField {
    BloodPressure,
    HeartRate,
    RespiratoryRate,
    Temperature,
    SpO2,
    FiO2,
    OxygenFlow,
    EtCO2,
}

impl VitalField {
    pub const ALL: [VitalField; 8] = [
        VitalField::BloodPressure,
        VitalField::HeartRate,
        VitalField::RespiratoryRate,
        VitalField::Temperature,
        VitalField::SpO2,
        VitalField::FiO2,
        VitalField::OxygenFlow,
        VitalField::EtCO2,
    ];

    /// Canonical snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            VitalField::BloodPressure => "blood_pressure",
            VitalField::HeartRate => "heart_rate",
            VitalField::RespiratoryRate => "respiratory_rate",
            VitalField::Temperature => "temperature",
            VitalField::SpO2 => "spo2",
            VitalField::FiO2 => "fio2",
            VitalField::OxygenFlow => "oxygen_flow",
            VitalField::EtCO2 => "etco2",
        }
    }

    /// Short monitor label.
    pub fn label(self) -> &'static str {
        match self {
            VitalField::BloodPressure => "PA",
            VitalField::HeartRate => "FC",
            VitalField::RespiratoryRate => "RR",
            VitalField::Temperature => "T",
            VitalField::SpO2 => "SpO2",
            VitalField::FiO2 => "FiO2",
            VitalField::OxygenFlow => "LitriO2",
            VitalField::EtCO2 => "EtCO2",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            VitalField::BloodPressure => "mmHg",
            VitalField::HeartRate => "bpm",
            VitalField::RespiratoryRate => "atti/min",
            VitalField::Temperature => "°C",
            VitalField::SpO2 | VitalField::FiO2 => "%",
            VitalField::OxygenFlow => "L/min",
            VitalField::EtCO2 => "mmHg",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            VitalField::BloodPressure => ValueKind::Text,
            VitalField::Temperature | VitalField::OxygenFlow => ValueKind::Decimal,
            _ => ValueKind::Integer,
        }
    }

    /// Resolve a field from its canonical name or one of the monitor labels.
    ///
    /// Returns `None` for names outside the fixed set; those are additional
    /// parameters.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase();
        let field = match key.as_str() {
            "pa" | "blood_pressure" => VitalField::BloodPressure,
            "fc" | "hr" | "heart_rate" => VitalField::HeartRate,
            "rr" | "respiratory_rate" => VitalField::RespiratoryRate,
            "t" | "temp" | "temperature" => VitalField::Temperature,
            "spo2" | "spo₂" => VitalField::SpO2,
            "fio2" | "fio₂" => VitalField::FiO2,
            "litrio2" | "litri o2" | "litri o₂" | "oxygen_flow" => VitalField::OxygenFlow,
            "etco2" | "etco₂" => VitalField::EtCO2,
            _ => return None,
        };
        Some(field)
    }

    /// Coerce a value to this field's kind and apply the stored-form
    /// normalization. A blank blood pressure normalizes to `None`.
    pub fn normalize(self, value: VitalValue) -> CoreResult<Option<VitalValue>> {
        let mut scratch = VitalSigns::default();
        scratch.set(self, Some(value))?;
        Ok(scratch.normalized().get(self))
    }

    pub fn parse(name: &str) -> CoreResult<Self> {
        Self::from_name(name).ok_or_else(|| CoreError::UnknownField {
            name: name.to_string(),
        })
    }
}

impl fmt::Display for VitalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single typed vital-sign value.
#[derive(Debug, Clone, PartialEq)]
pub enum VitalValue {
    Text(String),
    Integer(i32),
    Decimal(f64),
}

impl VitalValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            VitalValue::Text(_) => ValueKind::Text,
            VitalValue::Integer(_) => ValueKind::Integer,
            VitalValue::Decimal(_) => ValueKind::Decimal,
        }
    }
}

impl fmt::Display for VitalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VitalValue::Text(s) => f.write_str(s),
            VitalValue::Integer(v) => write!(f, "{}", v),
            VitalValue::Decimal(v) => write!(f, "{}", v),
        }
    }
}

/// The vital-sign set carried by the baseline and by every timeline node.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct VitalSigns {
    /// "systolic/diastolic", e.g. "120/80".
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<i32>,
    pub respiratory_rate: Option<i32>,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    pub spo2: Option<i32>,
    /// Zero or absent means no oxygen is administered.
    pub fio2: Option<i32>,
    /// Supplemental oxygen flow in L/min.
    pub oxygen_flow: Option<f64>,
    pub etco2: Option<i32>,
}

impl VitalSigns {
    pub fn get(&self, field: VitalField) -> Option<VitalValue> {
        match field {
            VitalField::BloodPressure => self.blood_pressure.clone().map(VitalValue::Text),
            VitalField::HeartRate => self.heart_rate.map(VitalValue::Integer),
            VitalField::RespiratoryRate => self.respiratory_rate.map(VitalValue::Integer),
            VitalField::Temperature => self.temperature.map(VitalValue::Decimal),
            VitalField::SpO2 => self.spo2.map(VitalValue::Integer),
            VitalField::FiO2 => self.fio2.map(VitalValue::Integer),
            VitalField::OxygenFlow => self.oxygen_flow.map(VitalValue::Decimal),
            VitalField::EtCO2 => self.etco2.map(VitalValue::Integer),
        }
    }

    /// Set (or clear, with `None`) one field. The value kind must match the field.
    pub fn set(&mut self, field: VitalField, value: Option<VitalValue>) -> CoreResult<()> {
        let wrong = || CoreError::WrongValueKind {
            field: field.name(),
            expected: field.kind().describe(),
        };
        match (field, value) {
            (VitalField::BloodPressure, None) => self.blood_pressure = None,
            (VitalField::BloodPressure, Some(VitalValue::Text(s))) => self.blood_pressure = Some(s),
            (VitalField::Temperature, v) => self.temperature = decimal(v).map_err(|_| wrong())?,
            (VitalField::OxygenFlow, v) => self.oxygen_flow = decimal(v).map_err(|_| wrong())?,
            (VitalField::HeartRate, v) => self.heart_rate = integer(v).map_err(|_| wrong())?,
            (VitalField::RespiratoryRate, v) => {
                self.respiratory_rate = integer(v).map_err(|_| wrong())?
            }
            (VitalField::SpO2, v) => self.spo2 = integer(v).map_err(|_| wrong())?,
            (VitalField::FiO2, v) => self.fio2 = integer(v).map_err(|_| wrong())?,
            (VitalField::EtCO2, v) => self.etco2 = integer(v).map_err(|_| wrong())?,
            (VitalField::BloodPressure, Some(_)) => return Err(wrong()),
        }
        Ok(())
    }

    /// Canonical stored form: blood pressure trimmed, temperature rounded to
    /// one decimal.
    pub fn normalized(&self) -> VitalSigns {
        VitalSigns {
            blood_pressure: self
                .blood_pressure
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            temperature: self.temperature.map(round_temperature),
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        VitalField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Iterate over the fields that carry a value.
    pub fn recorded(&self) -> impl Iterator<Item = (VitalField, VitalValue)> + '_ {
        VitalField::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f, v)))
    }
}

pub fn round_temperature(t: f64) -> f64 {
    (t * 10.0).round() / 10.0
}

fn integer(v: Option<VitalValue>) -> Result<Option<i32>, ()> {
    match v {
        None => Ok(None),
        Some(VitalValue::Integer(i)) => Ok(Some(i)),
        Some(_) => Err(()),
    }
}

fn decimal(v: Option<VitalValue>) -> Result<Option<f64>, ()> {
    match v {
        None => Ok(None),
        Some(VitalValue::Decimal(d)) => Ok(Some(d)),
        Some(VitalValue::Integer(i)) => Ok(Some(f64::from(i))),
        Some(_) => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_aliases_resolve() {
        assert_eq!(VitalField::from_name("FC"), Some(VitalField::HeartRate));
        assert_eq!(VitalField::from_name("heart_rate"), Some(VitalField::HeartRate));
        assert_eq!(VitalField::from_name(" SpO₂ "), Some(VitalField::SpO2));
        assert_eq!(VitalField::from_name("Litri O₂"), Some(VitalField::OxygenFlow));
        assert_eq!(VitalField::from_name("EtCO₂"), Some(VitalField::EtCO2));
        assert_eq!(VitalField::from_name("PVC"), None);
        assert!(VitalField::parse("GCS").is_err());
    }

    #[test]
    fn every_field_round_trips_its_own_name() {
        for field in VitalField::ALL {
            assert_eq!(VitalField::from_name(field.name()), Some(field));
            assert_eq!(VitalField::from_name(field.label()), Some(field));
        }
    }

    #[test]
    fn set_and_get() {
        let mut v = VitalSigns::default();
        v.set(VitalField::HeartRate, Some(VitalValue::Integer(80))).unwrap();
        v.set(VitalField::Temperature, Some(VitalValue::Integer(37))).unwrap();
        assert_eq!(v.heart_rate, Some(80));
        assert_eq!(v.temperature, Some(37.0));
        assert_eq!(v.get(VitalField::HeartRate), Some(VitalValue::Integer(80)));

        v.set(VitalField::HeartRate, None).unwrap();
        assert_eq!(v.heart_rate, None);
    }

    #[test]
    fn set_rejects_wrong_kind() {
        let mut v = VitalSigns::default();
        let err = v
            .set(VitalField::SpO2, Some(VitalValue::Text("high".into())))
            .unwrap_err();
        assert!(matches!(err, CoreError::WrongValueKind { field: "spo2", .. }));
        assert!(v
            .set(VitalField::BloodPressure, Some(VitalValue::Integer(120)))
            .is_err());
    }

    #[test]
    fn normalized_trims_and_rounds() {
        let v = VitalSigns {
            blood_pressure: Some(" 120 / 80 ".into()),
            temperature: Some(36.66),
            ..Default::default()
        };
        let n = v.normalized();
        assert_eq!(n.blood_pressure.as_deref(), Some("120 / 80"));
        assert_eq!(n.temperature, Some(36.7));

        let blank = VitalSigns {
            blood_pressure: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(blank.normalized().blood_pressure, None);
        assert!(blank.normalized().is_empty());
    }

    #[test]
    fn field_normalize_coerces_and_rounds() {
        assert_eq!(
            VitalField::Temperature.normalize(VitalValue::Decimal(38.04)).unwrap(),
            Some(VitalValue::Decimal(38.0))
        );
        assert_eq!(
            VitalField::OxygenFlow.normalize(VitalValue::Integer(2)).unwrap(),
            Some(VitalValue::Decimal(2.0))
        );
        assert_eq!(
            VitalField::BloodPressure
                .normalize(VitalValue::Text("".into()))
                .unwrap(),
            None
        );
    }

    #[test]
    fn recorded_lists_only_present_fields() {
        let v = VitalSigns {
            heart_rate: Some(75),
            spo2: Some(98),
            ..Default::default()
        };
        let fields: Vec<_> = v.recorded().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![VitalField::HeartRate, VitalField::SpO2]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalization_is_idempotent(
            bp in proptest::option::of("[ ]{0,2}[0-9]{2,3}/[0-9]{2,3}[ ]{0,2}"),
            t in proptest::option::of(30.0..45.0_f64),
        ) {
            let v = VitalSigns { blood_pressure: bp, temperature: t, ..VitalSigns::default() };
            let once = v.normalized();
            prop_assert_eq!(once.normalized(), once.clone());
            if let Some(t) = once.temperature {
                prop_assert!((t * 10.0 - (t * 10.0).round()).abs() < 1e-6);
            }
        }
    }
}
