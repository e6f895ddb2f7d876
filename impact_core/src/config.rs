//! # Design Tables
//!
//! Immutable lookup configuration injected into every domain calculator:
//! settlement limits, pipe materials, soil parameters and the tower stability
//! requirements. Tables are never mutated after construction.
//!
//! The standard tables are built once per process and shared:
//!
//! ```rust
//! use impact_core::config::DesignTables;
//! use impact_core::road_standards::RoadClassification;
//!
//! let tables = DesignTables::standard();
//! let limits = tables.settlement_limits(RoadClassification::Highway).unwrap();
//! assert_eq!(limits.approach_limit_mm, 80.0);
//! ```
//!
//! Project-specific tables can be loaded from JSON. Omitted sections keep
//! their standard values:
//!
//! ```rust
//! use impact_core::config::DesignTables;
//!
//! let tables = DesignTables::from_json(r#"{ "tower": {
//!     "overturning_normal": 1.6, "overturning_extreme": 1.3,
//!     "sliding_normal": 1.3, "sliding_extreme": 1.1,
//!     "extreme_load_factor": 1.2 } }"#).unwrap();
//! assert_eq!(tables.tower.overturning_normal, 1.6);
//! assert_eq!(tables.settlement_limits.len(), 5);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::{
    standard_foundation_soils, standard_jacking_soils, standard_pipe_materials, FoundationSoilProperties,
    JackingSoilProperties, PipeMaterial, PipeMaterialProperties, SoilType,
};
use crate::road_standards::{standard_settlement_limits, RoadClassification, SettlementLimits};

static STANDARD_TABLES: Lazy<DesignTables> = Lazy::new(DesignTables::default);

/// Required stability factors for tower foundations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerRequirements {
    /// Required overturning factor, normal load case
    pub overturning_normal: f64,
    /// Required overturning factor, extreme load case
    pub overturning_extreme: f64,
    /// Required sliding factor, normal load case
    pub sliding_normal: f64,
    /// Required sliding factor, extreme load case
    pub sliding_extreme: f64,
    /// Multiplier on tower load and horizontal force for the extreme case
    pub extreme_load_factor: f64,
}

impl Default for TowerRequirements {
    fn default() -> Self {
        TowerRequirements {
            overturning_normal: 1.5,
            overturning_extreme: 1.2,
            sliding_normal: 1.3,
            sliding_extreme: 1.1,
            extreme_load_factor: 1.2,
        }
    }
}

/// All lookup tables used by the calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignTables {
    /// Settlement limits per road classification
    pub settlement_limits: Vec<SettlementLimits>,
    /// Pipe material properties
    pub pipe_materials: Vec<PipeMaterialProperties>,
    /// Soil parameters for pipe jacking
    pub jacking_soils: Vec<JackingSoilProperties>,
    /// Soil parameters for tower foundations
    pub foundation_soils: Vec<FoundationSoilProperties>,
    /// Tower stability requirements
    pub tower: TowerRequirements,
}

impl Default for DesignTables {
    fn default() -> Self {
        DesignTables {
            settlement_limits: standard_settlement_limits(),
            pipe_materials: standard_pipe_materials(),
            jacking_soils: standard_jacking_soils(),
            foundation_soils: standard_foundation_soils(),
            tower: TowerRequirements::default(),
        }
    }
}

impl DesignTables {
    /// Shared standard tables
    pub fn standard() -> &'static DesignTables {
        &STANDARD_TABLES
    }

    /// Parse and validate tables from JSON
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let tables: DesignTables = serde_json::from_str(json).map_err(|e| CalcError::from_json_error(&e))?;
        tables.validate()?;
        Ok(tables)
    }

    /// Check that every table is complete and internally consistent.
    pub fn validate(&self) -> CalcResult<()> {
        for classification in RoadClassification::ALL {
            let count = self
                .settlement_limits
                .iter()
                .filter(|l| l.classification == classification)
                .count();
            if count != 1 {
                return Err(CalcError::invalid_configuration(
                    "settlement_limits",
                    format!("expected exactly one row for {}, found {}", classification, count),
                ));
            }
        }
        for limits in &self.settlement_limits {
            let values = [
                limits.approach_limit_mm,
                limits.bridge_limit_mm,
                limits.general_limit_mm,
                limits.culvert_limit_mm,
            ];
            if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err(CalcError::invalid_configuration(
                    "settlement_limits",
                    format!("limits for {} must be positive", limits.classification),
                ));
            }
            if limits.approach_limit_mm > limits.bridge_limit_mm || limits.bridge_limit_mm > limits.general_limit_mm {
                return Err(CalcError::invalid_configuration(
                    "settlement_limits",
                    format!(
                        "limits for {} must satisfy approach <= bridge <= general",
                        limits.classification
                    ),
                ));
            }
        }

        for props in &self.pipe_materials {
            if props.elastic_modulus_mpa <= 0.0 || props.tensile_strength_mpa <= 0.0 || props.unit_weight_kn_m3 <= 0.0 {
                return Err(CalcError::invalid_configuration(
                    "pipe_materials",
                    format!("properties of {} must be positive", props.material),
                ));
            }
        }

        for props in &self.jacking_soils {
            let phi = props.friction_angle_deg;
            if !(props.unit_weight_kn_m3 > 0.0 && props.unit_weight_kn_m3.is_finite()) || !(phi > 0.0 && phi < 90.0) {
                return Err(CalcError::invalid_configuration(
                    "jacking_soils",
                    format!("{} needs a positive unit weight and a friction angle in (0, 90)", props.soil),
                ));
            }
        }

        for props in &self.foundation_soils {
            if props.bearing_capacity_kpa <= 0.0 || props.unit_weight_kn_m3 <= 0.0 || props.friction_coefficient <= 0.0 {
                return Err(CalcError::invalid_configuration(
                    "foundation_soils",
                    format!("{} needs positive capacity, unit weight and friction coefficient", props.soil),
                ));
            }
        }

        let t = &self.tower;
        if [t.overturning_normal, t.overturning_extreme, t.sliding_normal, t.sliding_extreme]
            .iter()
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err(CalcError::invalid_configuration("tower", "required factors must be positive"));
        }
        if !t.extreme_load_factor.is_finite() || t.extreme_load_factor < 1.0 {
            return Err(CalcError::invalid_configuration("tower", "extreme load factor must be at least 1.0"));
        }
        Ok(())
    }

    /// Settlement limits for a classification
    pub fn settlement_limits(&self, classification: RoadClassification) -> CalcResult<SettlementLimits> {
        self.settlement_limits
            .iter()
            .find(|l| l.classification == classification)
            .copied()
            .ok_or_else(|| {
                CalcError::invalid_configuration("settlement_limits", format!("no row for {}", classification))
            })
    }

    /// Properties of a pipe material
    pub fn pipe_material(&self, material: PipeMaterial) -> CalcResult<PipeMaterialProperties> {
        self.pipe_materials
            .iter()
            .find(|p| p.material == material)
            .copied()
            .ok_or_else(|| CalcError::material_not_found(material.display_name()))
    }

    /// Jacking parameters of a soil
    pub fn jacking_soil(&self, soil: SoilType) -> CalcResult<JackingSoilProperties> {
        self.jacking_soils
            .iter()
            .find(|p| p.soil == soil)
            .copied()
            .ok_or_else(|| CalcError::material_not_found(soil.display_name()))
    }

    /// Foundation parameters of a soil
    pub fn foundation_soil(&self, soil: SoilType) -> CalcResult<FoundationSoilProperties> {
        self.foundation_soils
            .iter()
            .find(|p| p.soil == soil)
            .copied()
            .ok_or_else(|| CalcError::material_not_found(soil.display_name()))
    }
}
