//! # Highway Code Thresholds
//!
//! Road classifications and the settlement limits they select, per
//! JTG D30-2015 (Specifications for Design of Highway Subgrades), plus the
//! fixed code constants used by the pipe-jacking checks (JTG D60-2015).
//!
//! ## Settlement Limits (mm)
//!
//! | Class        | General | Bridge | Approach | Culvert |
//! |--------------|---------|--------|----------|---------|
//! | Highway      | 200     | 150    | 80       | 150     |
//! | First-class  | 300     | 200    | 100      | 200     |
//! | Second-class | 400     | 300    | 150      | 300     |
//! | Third-class  | 500     | 400    | 200      | 400     |
//! | Fourth-class | 600     | 500    | 250      | 500     |
//!
//! Approach limits are the strictest, so the classifier checks them first.

use serde::{Deserialize, Serialize};

// ============================================================================
// Code Section References
// ============================================================================

/// Code references for the checks performed by the engine.
pub mod code_ref {
    /// Subgrade settlement limits
    pub const SETTLEMENT_LIMITS: &str = "JTG D30-2015";
    /// Vehicle live load on buried structures
    pub const VEHICLE_LOAD: &str = "JTG D60-2015";
    /// Bearing capacity width/depth correction
    pub const BEARING_CORRECTION: &str = "GB 50007-2011 5.2.4";
}

// ============================================================================
// Code Constants
// ============================================================================

/// Settlement above which a sample point counts as influenced (mm)
pub const INFLUENCE_THRESHOLD_MM: f64 = 5.0;

/// Fraction of danger points above which the exceedance is considered widespread
pub const WIDESPREAD_EXCEEDANCE_FRACTION: f64 = 0.3;

/// Standard vehicle wheel load (kN)
pub const VEHICLE_WHEEL_LOAD_KN: f64 = 260.0;

/// Standard wheel contact width (m)
pub const WHEEL_CONTACT_WIDTH_M: f64 = 0.2;

/// Standard wheel contact length (m)
pub const WHEEL_CONTACT_LENGTH_M: f64 = 0.6;

/// Allowable pipe deformation as a fraction of diameter
pub const ALLOWABLE_DEFORMATION_RATIO: f64 = 0.05;

/// Live-load pressure from the standard wheel on its contact area (kPa)
pub fn vehicle_live_load_pressure_kpa() -> f64 {
    VEHICLE_WHEEL_LOAD_KN / (WHEEL_CONTACT_WIDTH_M * WHEEL_CONTACT_LENGTH_M)
}

// ============================================================================
// Road Classification
// ============================================================================

/// Highway classification tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoadClassification {
    /// Expressway
    Highway,
    /// First-class highway
    #[default]
    FirstClass,
    /// Second-class highway
    SecondClass,
    /// Third-class highway
    ThirdClass,
    /// Fourth-class highway
    FourthClass,
}

impl RoadClassification {
    /// All classifications for UI selection
    pub const ALL: [RoadClassification; 5] = [
        RoadClassification::Highway,
        RoadClassification::FirstClass,
        RoadClassification::SecondClass,
        RoadClassification::ThirdClass,
        RoadClassification::FourthClass,
    ];

    /// Parse a classification label.
    ///
    /// Accepts English forms ("first-class highway", "first class", "class 1")
    /// and the labels used on Chinese design drawings ("一级公路").
    pub fn parse_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match normalized.as_str() {
            "highway" | "expressway" | "freeway" | "motorway" | "高速公路" => Some(RoadClassification::Highway),
            "firstclasshighway" | "firstclass" | "firstclassroad" | "class1" | "classi" | "一级公路" => {
                Some(RoadClassification::FirstClass)
            }
            "secondclasshighway" | "secondclass" | "secondclassroad" | "class2" | "classii" | "二级公路" => {
                Some(RoadClassification::SecondClass)
            }
            "thirdclasshighway" | "thirdclass" | "thirdclassroad" | "class3" | "classiii" | "三级公路" => {
                Some(RoadClassification::ThirdClass)
            }
            "fourthclasshighway" | "fourthclass" | "fourthclassroad" | "class4" | "classiv" | "四级公路" => {
                Some(RoadClassification::FourthClass)
            }
            _ => None,
        }
    }

    /// Resolve a label, falling back to first-class highway when unrecognised.
    ///
    /// Returns the classification and whether the fallback was used.
    pub fn resolve(label: &str) -> (Self, bool) {
        match Self::parse_label(label) {
            Some(classification) => (classification, false),
            None => (RoadClassification::FirstClass, true),
        }
    }

    /// Canonical label, accepted by [`RoadClassification::parse_label`]
    pub fn label(&self) -> &'static str {
        match self {
            RoadClassification::Highway => "highway",
            RoadClassification::FirstClass => "first-class highway",
            RoadClassification::SecondClass => "second-class highway",
            RoadClassification::ThirdClass => "third-class highway",
            RoadClassification::FourthClass => "fourth-class highway",
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            RoadClassification::Highway => "Expressway",
            RoadClassification::FirstClass => "First-class Highway",
            RoadClassification::SecondClass => "Second-class Highway",
            RoadClassification::ThirdClass => "Third-class Highway",
            RoadClassification::FourthClass => "Fourth-class Highway",
        }
    }
}

impl std::fmt::Display for RoadClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Settlement limits for one road classification (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettlementLimits {
    /// Classification these limits apply to
    pub classification: RoadClassification,
    /// General road section limit
    pub general_limit_mm: f64,
    /// Bridge works limit
    pub bridge_limit_mm: f64,
    /// Bridge approach limit (strictest)
    pub approach_limit_mm: f64,
    /// Culvert / passage limit (reported, not used for classification)
    pub culvert_limit_mm: f64,
}

/// Default JTG D30-2015 settlement limit table
pub fn standard_settlement_limits() -> Vec<SettlementLimits> {
    let row = |classification, general, bridge, approach, culvert| SettlementLimits {
        classification,
        general_limit_mm: general,
        bridge_limit_mm: bridge,
        approach_limit_mm: approach,
        culvert_limit_mm: culvert,
    };
    vec![
        row(RoadClassification::Highway, 200.0, 150.0, 80.0, 150.0),
        row(RoadClassification::FirstClass, 300.0, 200.0, 100.0, 200.0),
        row(RoadClassification::SecondClass, 400.0, 300.0, 150.0, 300.0),
        row(RoadClassification::ThirdClass, 500.0, 400.0, 200.0, 400.0),
        row(RoadClassification::FourthClass, 600.0, 500.0, 250.0, 500.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_english_labels() {
        assert_eq!(RoadClassification::parse_label("first-class highway"), Some(RoadClassification::FirstClass));
        assert_eq!(RoadClassification::parse_label("Second Class"), Some(RoadClassification::SecondClass));
        assert_eq!(RoadClassification::parse_label("class 4"), Some(RoadClassification::FourthClass));
        assert_eq!(RoadClassification::parse_label("Expressway"), Some(RoadClassification::Highway));
    }

    #[test]
    fn test_parse_chinese_labels() {
        assert_eq!(RoadClassification::parse_label("高速公路"), Some(RoadClassification::Highway));
        assert_eq!(RoadClassification::parse_label("三级公路"), Some(RoadClassification::ThirdClass));
    }

    #[test]
    fn test_resolve_fallback() {
        assert_eq!(RoadClassification::resolve("village lane"), (RoadClassification::FirstClass, true));
        assert_eq!(RoadClassification::resolve("highway"), (RoadClassification::Highway, false));
    }

    #[test]
    fn test_labels_roundtrip() {
        for classification in RoadClassification::ALL {
            assert_eq!(RoadClassification::parse_label(classification.label()), Some(classification));
        }
    }

    #[test]
    fn test_limit_table_is_ordered() {
        for limits in standard_settlement_limits() {
            assert!(limits.approach_limit_mm <= limits.bridge_limit_mm);
            assert!(limits.bridge_limit_mm <= limits.general_limit_mm);
        }
    }

    #[test]
    fn test_live_load_pressure() {
        // 260 / (0.2 × 0.6) = 2166.67 kPa
        assert!((vehicle_live_load_pressure_kpa() - 2166.6667).abs() < 1e-3);
    }
}
