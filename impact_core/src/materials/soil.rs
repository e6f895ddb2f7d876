//! Soil Categories
//!
//! Soil categories and their reference parameters. Two tables exist because
//! the jacking checks and the foundation checks were calibrated separately:
//! the jacking table carries strength parameters for earth-pressure
//! calculations, the foundation table carries characteristic bearing
//! capacity and the GB 50007-2011 Table 5.2.4 correction factors.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Soil category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SoilType {
    /// Cohesive clay
    #[default]
    Clay,
    /// Sand
    Sand,
    /// Silt
    Silt,
    /// Rock
    Rock,
}

impl SoilType {
    /// All soil categories for UI selection
    pub const ALL: [SoilType; 4] = [SoilType::Clay, SoilType::Sand, SoilType::Silt, SoilType::Rock];

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "CLAY" | "COHESIVE" | "黏土" | "粘土" => Ok(SoilType::Clay),
            "SAND" | "SANDY" | "砂土" => Ok(SoilType::Sand),
            "SILT" | "SILTY" | "粉土" => Ok(SoilType::Silt),
            "ROCK" | "BEDROCK" | "岩石" => Ok(SoilType::Rock),
            _ => Err(CalcError::material_not_found(s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SoilType::Clay => "Clay",
            SoilType::Sand => "Sand",
            SoilType::Silt => "Silt",
            SoilType::Rock => "Rock",
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Soil parameters used by the pipe-jacking checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JackingSoilProperties {
    /// Soil category
    pub soil: SoilType,
    /// Unit weight γ (kN/m³)
    pub unit_weight_kn_m3: f64,
    /// Cohesion c (kPa)
    pub cohesion_kpa: f64,
    /// Internal friction angle φ (degrees)
    pub friction_angle_deg: f64,
    /// Pipe-soil friction coefficient
    pub friction_coefficient: f64,
}

/// Soil parameters used by the tower foundation checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoundationSoilProperties {
    /// Soil category
    pub soil: SoilType,
    /// Characteristic bearing capacity fak (kPa)
    pub bearing_capacity_kpa: f64,
    /// Unit weight γ (kN/m³)
    pub unit_weight_kn_m3: f64,
    /// Base-soil friction coefficient μ
    pub friction_coefficient: f64,
    /// Cohesion c (kPa)
    pub cohesion_kpa: f64,
    /// Internal friction angle φ (degrees)
    pub friction_angle_deg: f64,
    /// Width correction factor ηb
    pub width_correction_factor: f64,
    /// Depth correction factor ηd
    pub depth_correction_factor: f64,
}

/// Default soil table for pipe jacking (no rock entry)
pub fn standard_jacking_soils() -> Vec<JackingSoilProperties> {
    vec![
        JackingSoilProperties {
            soil: SoilType::Clay,
            unit_weight_kn_m3: 18.0,
            cohesion_kpa: 25.0,
            friction_angle_deg: 15.0,
            friction_coefficient: 0.3,
        },
        JackingSoilProperties {
            soil: SoilType::Sand,
            unit_weight_kn_m3: 19.0,
            cohesion_kpa: 0.0,
            friction_angle_deg: 30.0,
            friction_coefficient: 0.4,
        },
        JackingSoilProperties {
            soil: SoilType::Silt,
            unit_weight_kn_m3: 18.5,
            cohesion_kpa: 15.0,
            friction_angle_deg: 20.0,
            friction_coefficient: 0.35,
        },
    ]
}

/// Default soil table for tower foundations
pub fn standard_foundation_soils() -> Vec<FoundationSoilProperties> {
    vec![
        FoundationSoilProperties {
            soil: SoilType::Clay,
            bearing_capacity_kpa: 150.0,
            unit_weight_kn_m3: 18.0,
            friction_coefficient: 0.25,
            cohesion_kpa: 25.0,
            friction_angle_deg: 15.0,
            width_correction_factor: 0.0,
            depth_correction_factor: 1.0,
        },
        FoundationSoilProperties {
            soil: SoilType::Sand,
            bearing_capacity_kpa: 200.0,
            unit_weight_kn_m3: 19.0,
            friction_coefficient: 0.4,
            cohesion_kpa: 0.0,
            friction_angle_deg: 30.0,
            width_correction_factor: 2.0,
            depth_correction_factor: 3.0,
        },
        FoundationSoilProperties {
            soil: SoilType::Silt,
            bearing_capacity_kpa: 180.0,
            unit_weight_kn_m3: 18.5,
            friction_coefficient: 0.3,
            cohesion_kpa: 15.0,
            friction_angle_deg: 20.0,
            width_correction_factor: 2.0,
            depth_correction_factor: 2.0,
        },
        FoundationSoilProperties {
            soil: SoilType::Rock,
            bearing_capacity_kpa: 500.0,
            unit_weight_kn_m3: 25.0,
            friction_coefficient: 0.6,
            cohesion_kpa: 50.0,
            friction_angle_deg: 40.0,
            width_correction_factor: 0.5,
            depth_correction_factor: 4.4,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flexible() {
        assert_eq!(SoilType::from_str_flexible(" clay ").unwrap(), SoilType::Clay);
        assert_eq!(SoilType::from_str_flexible("粉土").unwrap(), SoilType::Silt);
        assert_eq!(SoilType::from_str_flexible("Rock").unwrap(), SoilType::Rock);
        assert!(SoilType::from_str_flexible("peat").is_err());
    }

    #[test]
    fn test_foundation_table_covers_all_soils() {
        let table = standard_foundation_soils();
        for soil in SoilType::ALL {
            assert!(table.iter().any(|p| p.soil == soil), "{} missing", soil);
        }
    }

    #[test]
    fn test_jacking_table_has_no_rock() {
        assert!(!standard_jacking_soils().iter().any(|p| p.soil == SoilType::Rock));
    }
}
