//! # Impact Calculations
//!
//! One module per analysis domain. Each follows the same pattern:
//!
//! - `*Request` - Input parameters (JSON-serializable), with `validate()`
//! - `*Result` - Calculation results (JSON-serializable)
//! - `*Calculator::new(&tables).calculate(&request)` - Pure calculation
//!   against injected design tables
//! - `calculate(&request)` - Same, against the standard tables
//!
//! Validation runs before any model evaluation; an invalid request produces
//! an error and no partial result.
//!
//! ## Available Calculations
//!
//! - [`settlement`] - Roadbed settlement from two new pile foundations
//! - [`pipeline`] - Pipe jacking under a roadbed
//! - [`tower`] - Transmission tower pad foundation

pub mod pipeline;
pub mod settlement;
pub mod tower;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assessment::SafetyLevel;
use crate::config::DesignTables;
use crate::equations::Equation;
use crate::errors::{CalcError, CalcResult};

// Re-export commonly used types
pub use pipeline::{Backstop, PipelineCalculator, PipelineRequest, PipelineResult};
pub use settlement::{SettlementCalculator, SettlementRequest, SettlementResult};
pub use tower::{TowerCalculator, TowerRequest, TowerResult};

/// Serde adapter for factors that are +∞ when nothing acts: written as
/// `null`, read back from `null` as +∞.
pub(crate) mod unbounded {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// How a result was computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInfo {
    /// Calculation method in a few words
    pub method: String,
    /// Governing code
    pub standard: String,
    /// Equations evaluated, in order of use
    pub equations: Vec<Equation>,
}

/// Enum wrapper for all calculation requests.
///
/// Tagged by `"type"` in JSON:
///
/// ```json
/// { "type": "Tower", "tower_load_kn": 500, "horizontal_force_kn": 50,
///   "base_width_m": 2, "base_length_m": 3 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Dual-pile roadbed settlement
    Settlement(SettlementRequest),
    /// Pipe jacking
    Pipeline(PipelineRequest),
    /// Tower foundation
    Tower(TowerRequest),
}

impl CalculationItem {
    /// Parse a tagged request bundle.
    ///
    /// Missing required fields map to `CalcError::MissingField`, other parse
    /// failures to `CalcError::SerializationError`.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        serde_json::from_str(json).map_err(|e| CalcError::from_json_error(&e))
    }

    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Settlement(r) => &r.label,
            CalculationItem::Pipeline(r) => &r.label,
            CalculationItem::Tower(r) => &r.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Settlement(_) => "Settlement",
            CalculationItem::Pipeline(_) => "Pipeline",
            CalculationItem::Tower(_) => "Tower",
        }
    }

    /// Run the calculation against `tables`.
    pub fn run(&self, tables: &DesignTables) -> CalcResult<CalculationOutput> {
        debug!(calc_type = self.calc_type(), label = self.label(), "dispatching calculation");
        Ok(match self {
            CalculationItem::Settlement(r) => {
                CalculationOutput::Settlement(SettlementCalculator::new(tables).calculate(r)?)
            }
            CalculationItem::Pipeline(r) => CalculationOutput::Pipeline(PipelineCalculator::new(tables).calculate(r)?),
            CalculationItem::Tower(r) => CalculationOutput::Tower(TowerCalculator::new(tables).calculate(r)?),
        })
    }
}

/// Result of a [`CalculationItem`], tagged by `"type"` like its request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    Settlement(SettlementResult),
    Pipeline(PipelineResult),
    Tower(TowerResult),
}

impl CalculationOutput {
    pub fn label(&self) -> &str {
        match self {
            CalculationOutput::Settlement(r) => &r.label,
            CalculationOutput::Pipeline(r) => &r.label,
            CalculationOutput::Tower(r) => &r.label,
        }
    }

    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationOutput::Settlement(_) => "Settlement",
            CalculationOutput::Pipeline(_) => "Pipeline",
            CalculationOutput::Tower(_) => "Tower",
        }
    }

    /// Overall safety level
    pub fn level(&self) -> SafetyLevel {
        match self {
            CalculationOutput::Settlement(r) => r.safety.level,
            CalculationOutput::Pipeline(r) => r.level,
            CalculationOutput::Tower(r) => r.level,
        }
    }

    /// Recommendations in display order
    pub fn recommendations(&self) -> &[String] {
        match self {
            CalculationOutput::Settlement(r) => &r.safety.recommendations,
            CalculationOutput::Pipeline(r) => &r.recommendations,
            CalculationOutput::Tower(r) => &r.recommendations,
        }
    }

    /// Check if all design checks pass
    pub fn passes(&self) -> bool {
        match self {
            CalculationOutput::Settlement(r) => r.passes(),
            CalculationOutput::Pipeline(r) => r.passes(),
            CalculationOutput::Tower(r) => r.passes(),
        }
    }

    pub fn calculation_info(&self) -> &CalculationInfo {
        match self {
            CalculationOutput::Settlement(r) => &r.calculation_info,
            CalculationOutput::Pipeline(r) => &r.calculation_info,
            CalculationOutput::Tower(r) => &r.calculation_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOWER_JSON: &str = r#"{
        "type": "Tower",
        "label": "T-14",
        "tower_load_kn": 500.0,
        "horizontal_force_kn": 50.0,
        "base_width_m": 2.0,
        "base_length_m": 3.0
    }"#;

    #[test]
    fn test_tower_bundle_dispatch() {
        let item = CalculationItem::from_json(TOWER_JSON).unwrap();
        assert_eq!(item.calc_type(), "Tower");
        assert_eq!(item.label(), "T-14");

        let output = item.run(DesignTables::standard()).unwrap();
        assert_eq!(output.calc_type(), "Tower");
        assert_eq!(output.level(), SafetyLevel::Danger);
        assert!(!output.passes());
        assert!(!output.recommendations().is_empty());
        assert_eq!(output.calculation_info().equations.len(), 4);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["type"], "Tower");
        assert_eq!(json["level"], "danger");
    }

    #[test]
    fn test_pipeline_bundle_requires_geometry() {
        let err = CalculationItem::from_json(r#"{ "type": "Pipeline", "label": "x" }"#).unwrap_err();
        assert!(matches!(err, CalcError::MissingField { .. }), "{:?}", err);

        let json = r#"{ "type": "Pipeline", "pipe_diameter_m": 1.0, "pipe_length_m": 100.0, "cover_depth_m": 2.0 }"#;
        let item = CalculationItem::from_json(json).unwrap();
        assert_eq!(item, CalculationItem::Pipeline(PipelineRequest::new(1.0, 100.0, 2.0)));
        let output = item.run(DesignTables::standard()).unwrap();
        assert_eq!(output.level(), SafetyLevel::Danger);
    }

    #[test]
    fn test_settlement_bundle_dispatch() {
        let json = r#"{
            "type": "Settlement",
            "label": "K12+300",
            "pile1": { "diameter_m": 1.0, "length_m": 20.0, "load_kn": 1000.0 },
            "pile2": { "diameter_m": 1.2, "length_m": 25.0, "load_kn": 1200.0 },
            "roadbed": { "width_m": 12.0, "pile1_distance_m": 6.0, "pile2_distance_m": 8.0 },
            "soil_layers": [
                { "depth_range": "0-5", "name": "clay", "compression_modulus_mpa": 10.0, "poisson_ratio": 0.35 }
            ],
            "road_classification": "highway"
        }"#;
        let output = CalculationItem::from_json(json).unwrap().run(DesignTables::standard()).unwrap();
        match output {
            CalculationOutput::Settlement(result) => assert_eq!(result.points.len(), 16),
            other => panic!("unexpected output {}", other.calc_type()),
        }
    }

    #[test]
    fn test_missing_field_mapping() {
        let err = CalculationItem::from_json(r#"{ "type": "Tower", "tower_load_kn": 500.0 }"#).unwrap_err();
        assert!(matches!(err, CalcError::MissingField { .. }), "{:?}", err);
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_unknown_type_is_serialization_error() {
        let err = CalculationItem::from_json(r#"{ "type": "Bridge" }"#).unwrap_err();
        assert!(matches!(err, CalcError::SerializationError { .. }));
    }

    #[test]
    fn test_invalid_values_rejected_on_run() {
        let item = CalculationItem::Tower(TowerRequest {
            label: String::new(),
            tower_load_kn: -5.0,
            horizontal_force_kn: 50.0,
            force_height_m: 15.0,
            base_weight_kn: 200.0,
            base_width_m: 2.0,
            base_length_m: 3.0,
            embedment_depth_m: 1.5,
            soil: Default::default(),
        });
        assert!(item.run(DesignTables::standard()).unwrap_err().is_validation_error());
    }
}
