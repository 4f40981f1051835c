//! Predefined additional parameters.
//!
//! Authors may attach any name to a node; these are the ones the monitor
//! knows a label and unit for.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
}

const fn entry(key: &'static str, label: &'static str, unit: &'static str) -> CatalogEntry {
    CatalogEntry { key, label, unit }
}

pub static CATALOG: &[CatalogEntry] = &[
    // cardiovascular
    entry("PVC", "Central venous pressure", "cmH2O"),
    entry("QTc", "QT/QTc", "ms"),
    entry("ST", "ST segment", "mV"),
    entry("SI", "Shock index", "HR/SBP"),
    // respiratory
    entry("PIP", "Peak inspiratory pressure", "cmH2O"),
    entry("VT", "Tidal volume", "mL/kg"),
    entry("COMP", "Lung compliance", "mL/cmH2O"),
    entry("RAW", "Airway resistance", "cmH2O/L/s"),
    entry("RSBI", "Rapid shallow breathing index", "breaths/min/L"),
    // neurological
    entry("GCS", "Glasgow coma scale", "3-15"),
    entry("ICP", "Intracranial pressure", "mmHg"),
    entry("PRx", "Pressure reactivity index", ""),
    entry("BIS", "Bispectral index", "0-100"),
    entry("TOF", "Train of four", "%"),
    // hemodynamic
    entry("CO", "Cardiac output", "L/min"),
    entry("CI", "Cardiac index", "L/min/m²"),
    entry("PCWP", "Pulmonary capillary wedge pressure", "mmHg"),
    entry("SvO2", "Mixed venous saturation", "%"),
    entry("SVR", "Systemic vascular resistance", "dyn·s·cm⁻⁵"),
    // metabolic
    entry("GLY", "Blood glucose", "mg/dL"),
    entry("LAC", "Lactate", "mmol/L"),
    entry("NA", "Sodium", "mmol/L"),
    entry("K", "Potassium", "mmol/L"),
    entry("CA", "Ionized calcium", "mmol/L"),
    // renal
    entry("UO", "Urine output", "mL/h"),
    entry("CR", "Creatinine", "mg/dL"),
    entry("BUN", "Blood urea nitrogen", "mg/dL"),
    // infection / sepsis
    entry("WBC", "White blood cells", "10³/μL"),
    entry("qSOFA", "qSOFA", "0-4"),
    // coagulation
    entry("INR", "INR", ""),
    entry("PTT", "PTT", "s"),
    entry("PLT", "Platelets", "10³/μL"),
    // other
    entry("NIRS", "Cerebral oximetry", "%"),
];

/// Case-insensitive lookup by key.
pub fn lookup(name: &str) -> Option<&'static CatalogEntry> {
    let name = name.trim();
    CATALOG.iter().find(|e| e.key.eq_ignore_ascii_case(name))
}

/// Catalog unit for a name, if any. Empty catalog units count as none.
pub fn unit_for(name: &str) -> Option<&'static str> {
    lookup(name).map(|e| e.unit).filter(|unit| !unit.is_empty())
}

/// Display label including the unit, e.g. "Lactate (mmol/L)".
pub fn display_label(entry: &CatalogEntry) -> String {
    if entry.unit.is_empty() {
        entry.label.to_string()
    } else {
        format!("{} ({})", entry.label, entry.unit)
    }
}
