//! The scenario baseline: patient state before the timeline starts.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::ids::AccessId;
use crate::vitals::VitalSigns;

/// Which access list a vascular access belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum AccessKind {
    Venous,
    Arterial,
}

impl AccessKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessKind::Venous => "venous",
            AccessKind::Arterial => "arterial",
        }
    }

    pub fn parse(raw: &str) -> CoreResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "venous" | "venoso" => Ok(AccessKind::Venous),
            "arterial" | "arterioso" => Ok(AccessKind::Arterial),
            _ => Err(CoreError::UnknownAccessKind {
                name: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A venous or arterial line present at baseline.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct VascularAccess {
    /// Assigned by the store; `None` until persisted.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub id: Option<AccessId>,
    /// Device category, e.g. "CVC" or "peripheral cannula".
    pub category: String,
    /// Anatomical site.
    pub site: String,
    pub side: String,
    /// Gauge size, when relevant.
    pub gauge: Option<i32>,
}

impl VascularAccess {
    pub fn new(category: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            site: site.into(),
            ..Self::default()
        }
    }
}

/// Baseline record, one per scenario.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Baseline {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub vitals: VitalSigns,
    /// Free-text monitor description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub monitor: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub venous: Vec<VascularAccess>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub arterial: Vec<VascularAccess>,
}

impl Baseline {
    pub fn accesses(&self, kind: AccessKind) -> &[VascularAccess] {
        match kind {
            AccessKind::Venous => &self.venous,
            AccessKind::Arterial => &self.arterial,
        }
    }

    pub fn accesses_mut(&mut self, kind: AccessKind) -> &mut Vec<VascularAccess> {
        match kind {
            AccessKind::Venous => &mut self.venous,
            AccessKind::Arterial => &mut self.arterial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_kind_parse() {
        assert_eq!(AccessKind::parse(" Venous "), Ok(AccessKind::Venous));
        assert_eq!(AccessKind::parse("arterioso"), Ok(AccessKind::Arterial));
        assert!(AccessKind::parse("intraosseous").is_err());
    }

    #[test]
    fn accesses_by_kind() {
        let mut baseline = Baseline::default();
        baseline
            .accesses_mut(AccessKind::Arterial)
            .push(VascularAccess::new("arterial line", "radial"));
        assert!(baseline.accesses(AccessKind::Venous).is_empty());
        assert_eq!(baseline.accesses(AccessKind::Arterial)[0].site, "radial");
    }
}
