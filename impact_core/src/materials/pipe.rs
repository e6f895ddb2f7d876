//! Jacking Pipe Materials
//!
//! Reference properties for the pipe materials supported by the pipe-jacking
//! checks. Concrete values are for C30 concrete.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Pipe material for jacked pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PipeMaterial {
    /// Reinforced concrete pipe (C30)
    #[default]
    Concrete,
    /// High-density polyethylene pipe
    #[serde(rename = "HDPE")]
    Hdpe,
}

impl PipeMaterial {
    /// All pipe materials for UI selection
    pub const ALL: [PipeMaterial; 2] = [PipeMaterial::Concrete, PipeMaterial::Hdpe];

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().replace([' ', '_', '-'], "").as_str() {
            "CONCRETE" | "RC" | "C30" | "混凝土" => Ok(PipeMaterial::Concrete),
            "HDPE" | "POLYETHYLENE" | "HIGHDENSITYPOLYETHYLENE" | "高密度聚乙烯" => Ok(PipeMaterial::Hdpe),
            _ => Err(CalcError::material_not_found(s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            PipeMaterial::Concrete => "Concrete (C30)",
            PipeMaterial::Hdpe => "HDPE",
        }
    }
}

impl std::fmt::Display for PipeMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Reference properties for a pipe material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeMaterialProperties {
    /// Material
    pub material: PipeMaterial,
    /// Elastic modulus E (MPa)
    pub elastic_modulus_mpa: f64,
    /// Design tensile strength ft (MPa)
    pub tensile_strength_mpa: f64,
    /// Unit weight γ (kN/m³)
    pub unit_weight_kn_m3: f64,
}

/// Default pipe material table
pub fn standard_pipe_materials() -> Vec<PipeMaterialProperties> {
    vec![
        PipeMaterialProperties {
            material: PipeMaterial::Concrete,
            elastic_modulus_mpa: 30000.0,
            tensile_strength_mpa: 2.01,
            unit_weight_kn_m3: 25.0,
        },
        PipeMaterialProperties {
            material: PipeMaterial::Hdpe,
            elastic_modulus_mpa: 800.0,
            tensile_strength_mpa: 20.0,
            unit_weight_kn_m3: 9.5,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flexible() {
        assert_eq!(PipeMaterial::from_str_flexible("concrete").unwrap(), PipeMaterial::Concrete);
        assert_eq!(PipeMaterial::from_str_flexible("high-density polyethylene").unwrap(), PipeMaterial::Hdpe);
        assert_eq!(PipeMaterial::from_str_flexible("混凝土").unwrap(), PipeMaterial::Concrete);
        assert!(PipeMaterial::from_str_flexible("steel").is_err());
    }

    #[test]
    fn test_table_covers_all_materials() {
        let table = standard_pipe_materials();
        for material in PipeMaterial::ALL {
            assert!(table.iter().any(|p| p.material == material), "{} missing", material);
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&PipeMaterial::Hdpe).unwrap(), "\"HDPE\"");
        let m: PipeMaterial = serde_json::from_str("\"Concrete\"").unwrap();
        assert_eq!(m, PipeMaterial::Concrete);
    }
}
