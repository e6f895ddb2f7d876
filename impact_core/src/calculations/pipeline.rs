//! # Pipe Jacking Checks
//!
//! Push force for a jacked pipe under a roadbed, checked against the pipe's
//! axial capacity and the work-well backstop, plus the buried-pipe response to
//! overburden and the JTG D60-2015 standard wheel load.
//!
//! ## Checks
//!
//! | Check       | Passes when                         |
//! |-------------|-------------------------------------|
//! | Strength    | push force ≤ pipe axial capacity    |
//! | Work well   | push force ≤ backstop capacity      |
//! | Stress      | hoop stress ≤ tensile strength      |
//! | Deformation | ring deflection ≤ 5% of diameter    |
//!
//! The result is [`SafetyLevel::Safe`] when all four pass and
//! [`SafetyLevel::Danger`] otherwise.
//!
//! ## Example
//!
//! ```rust
//! use impact_core::calculations::pipeline::{calculate, PipelineRequest};
//!
//! let request = PipelineRequest {
//!     label: "Culvert crossing".to_string(),
//!     ..PipelineRequest::new(1.0, 60.0, 2.0)
//! };
//! let result = calculate(&request).unwrap();
//! println!("Push force: {:.1} kN ({})", result.push_force.total_kn, result.level);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assessment::{evaluate_rules, RecommendationRule, SafetyLevel};
use crate::config::DesignTables;
use crate::equations::earth_pressure::triangular_resultant;
use crate::equations::jacking::{
    face_resistance, hoop_stress_kpa, joint_friction_resistance, pipe_axial_capacity, ring_deflection_mm,
    skin_friction_resistance, total_push_force,
};
use crate::equations::{active_coefficient, passive_coefficient, pipeline_equations, Equation};
use crate::errors::{
    require_finite, require_finite_result, require_non_negative, require_positive, CalcError, CalcResult,
};
use crate::materials::{JackingSoilProperties, PipeMaterial, SoilType};
use crate::road_standards::{code_ref, vehicle_live_load_pressure_kpa, ALLOWABLE_DEFORMATION_RATIO};
use crate::units::{Kilopascals, Megapascals, Meters, Millimeters};

use super::CalculationInfo;

/// Largest pipe diameter accepted (m)
pub const MAX_PIPE_DIAMETER_M: f64 = 5.0;

/// Smallest cover depth accepted (m)
pub const MIN_COVER_DEPTH_M: f64 = 1.0;

/// Accepted push-force safety factor range
pub const SAFETY_FACTOR_RANGE: (f64, f64) = (1.1, 2.0);

// ============================================================================
// Backstops
// ============================================================================

/// Gravity backstop wall resisting by passive earth pressure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityWall {
    pub wall_height_m: f64,
    pub wall_width_m: f64,
    pub wall_length_m: f64,
    pub soil_unit_weight_kn_m3: f64,
    pub friction_angle_deg: f64,
}

impl Default for GravityWall {
    fn default() -> Self {
        GravityWall {
            wall_height_m: 3.0,
            wall_width_m: 2.0,
            wall_length_m: 4.0,
            soil_unit_weight_kn_m3: 18.0,
            friction_angle_deg: 30.0,
        }
    }
}

/// Backstop of bored piles resisting by skin friction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PileWall {
    pub pile_count: u32,
    pub pile_diameter_m: f64,
    pub pile_length_m: f64,
    /// Unit skin friction q_s (kPa)
    pub skin_friction_kpa: f64,
}

impl Default for PileWall {
    fn default() -> Self {
        PileWall {
            pile_count: 4,
            pile_diameter_m: 0.8,
            pile_length_m: 15.0,
            skin_friction_kpa: 50.0,
        }
    }
}

/// Steel sheet-pile backstop resisting by passive pressure on its embedment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetPileWall {
    pub pile_length_m: f64,
    pub embedment_depth_m: f64,
    pub soil_unit_weight_kn_m3: f64,
    pub friction_angle_deg: f64,
}

impl Default for SheetPileWall {
    fn default() -> Self {
        SheetPileWall {
            pile_length_m: 8.0,
            embedment_depth_m: 4.0,
            soil_unit_weight_kn_m3: 18.0,
            friction_angle_deg: 30.0,
        }
    }
}

/// Work-well backstop, tagged by `"kind"` in JSON.
///
/// ```json
/// { "kind": "pile_wall", "pile_count": 6, "pile_diameter_m": 1.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Backstop {
    Gravity(GravityWall),
    PileWall(PileWall),
    SheetPile(SheetPileWall),
}

impl Default for Backstop {
    fn default() -> Self {
        Backstop::Gravity(GravityWall::default())
    }
}

impl Backstop {
    /// Resisting force (kN).
    ///
    /// - gravity: 0.5·γ·H²·(Kp − Ka)·wall width
    /// - pile wall: π·d·l·q_s × count
    /// - sheet pile: 0.5·γ·t²·Kp × pile length
    pub fn capacity_kn(&self) -> f64 {
        match self {
            Backstop::Gravity(wall) => {
                let k = passive_coefficient(wall.friction_angle_deg) - active_coefficient(wall.friction_angle_deg);
                triangular_resultant(wall.soil_unit_weight_kn_m3, wall.wall_height_m, k) * wall.wall_width_m
            }
            Backstop::PileWall(wall) => {
                let single = skin_friction_resistance(wall.pile_diameter_m, wall.pile_length_m, wall.skin_friction_kpa);
                single * wall.pile_count as f64
            }
            Backstop::SheetPile(wall) => {
                let kp = passive_coefficient(wall.friction_angle_deg);
                triangular_resultant(wall.soil_unit_weight_kn_m3, wall.embedment_depth_m, kp) * wall.pile_length_m
            }
        }
    }

    /// Take unit weight and friction angle from a soil entry.
    ///
    /// Pile walls carry no soil strength parameters and are returned unchanged.
    pub fn in_soil(self, soil: &JackingSoilProperties) -> Self {
        match self {
            Backstop::Gravity(wall) => Backstop::Gravity(GravityWall {
                soil_unit_weight_kn_m3: soil.unit_weight_kn_m3,
                friction_angle_deg: soil.friction_angle_deg,
                ..wall
            }),
            Backstop::SheetPile(wall) => Backstop::SheetPile(SheetPileWall {
                soil_unit_weight_kn_m3: soil.unit_weight_kn_m3,
                friction_angle_deg: soil.friction_angle_deg,
                ..wall
            }),
            Backstop::PileWall(_) => self,
        }
    }

    /// Registry entry for this backstop's formula
    pub fn equation(&self) -> Equation {
        match self {
            Backstop::Gravity(_) => Equation::GravityBackstop,
            Backstop::PileWall(_) => Equation::PileBackstop,
            Backstop::SheetPile(_) => Equation::SheetPileBackstop,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Backstop::Gravity(_) => "Gravity wall",
            Backstop::PileWall(_) => "Pile wall",
            Backstop::SheetPile(_) => "Sheet pile",
        }
    }

    fn validate(&self) -> CalcResult<()> {
        match self {
            Backstop::Gravity(wall) => {
                require_positive("backstop.wall_height_m", wall.wall_height_m, "Wall height must be positive")?;
                require_positive("backstop.wall_width_m", wall.wall_width_m, "Wall width must be positive")?;
                require_positive("backstop.wall_length_m", wall.wall_length_m, "Wall length must be positive")?;
                require_positive(
                    "backstop.soil_unit_weight_kn_m3",
                    wall.soil_unit_weight_kn_m3,
                    "Soil unit weight must be positive",
                )?;
                validate_friction_angle(wall.friction_angle_deg)
            }
            Backstop::PileWall(wall) => {
                if wall.pile_count == 0 {
                    return Err(CalcError::invalid_input(
                        "backstop.pile_count",
                        "0",
                        "A pile wall needs at least one pile",
                    ));
                }
                require_positive("backstop.pile_diameter_m", wall.pile_diameter_m, "Pile diameter must be positive")?;
                require_positive("backstop.pile_length_m", wall.pile_length_m, "Pile length must be positive")?;
                require_positive(
                    "backstop.skin_friction_kpa",
                    wall.skin_friction_kpa,
                    "Skin friction must be positive",
                )
            }
            Backstop::SheetPile(wall) => {
                require_positive("backstop.pile_length_m", wall.pile_length_m, "Sheet pile length must be positive")?;
                require_positive(
                    "backstop.embedment_depth_m",
                    wall.embedment_depth_m,
                    "Embedment depth must be positive",
                )?;
                require_positive(
                    "backstop.soil_unit_weight_kn_m3",
                    wall.soil_unit_weight_kn_m3,
                    "Soil unit weight must be positive",
                )?;
                validate_friction_angle(wall.friction_angle_deg)
            }
        }
    }
}

fn validate_friction_angle(angle_deg: f64) -> CalcResult<()> {
    let field = "backstop.friction_angle_deg";
    require_finite(field, angle_deg)?;
    if angle_deg <= 0.0 || angle_deg >= 90.0 {
        return Err(CalcError::invalid_input(
            field,
            angle_deg.to_string(),
            "Friction angle must be between 0 and 90 degrees",
        ));
    }
    Ok(())
}

// ============================================================================
// Request
// ============================================================================

fn default_tool_diameter() -> f64 {
    1.2
}

fn default_unit_friction() -> f64 {
    5.0
}

fn default_face_pressure() -> f64 {
    100.0
}

fn default_joint_friction_coefficient() -> f64 {
    0.2
}

fn default_joint_normal_force() -> f64 {
    100.0
}

fn default_safety_factor() -> f64 {
    1.5
}

fn default_wall_thickness() -> f64 {
    0.1
}

fn default_reduction_factor() -> f64 {
    0.85
}

fn default_soil_modulus() -> f64 {
    10.0
}

/// Input for a pipe-jacking analysis.
///
/// Diameter, jacking length and cover depth are required; every other JSON
/// field may be omitted and takes the value [`PipelineRequest::new`] uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    #[serde(default)]
    pub label: String,
    /// Pipe outer diameter D (m)
    pub pipe_diameter_m: f64,
    /// Tool-head diameter Dt (m)
    #[serde(default = "default_tool_diameter")]
    pub tool_diameter_m: f64,
    /// Jacking length L (m)
    pub pipe_length_m: f64,
    /// Unit skin friction f (kPa)
    #[serde(default = "default_unit_friction")]
    pub unit_friction_kpa: f64,
    /// Face pressure P (kPa)
    #[serde(default = "default_face_pressure")]
    pub face_pressure_kpa: f64,
    /// Pipe joints n
    #[serde(default)]
    pub joint_count: u32,
    /// Joint friction coefficient μ
    #[serde(default = "default_joint_friction_coefficient")]
    pub joint_friction_coefficient: f64,
    /// Normal force per joint N (kN)
    #[serde(default = "default_joint_normal_force")]
    pub joint_normal_force_kn: f64,
    /// Push-force safety factor K
    #[serde(default = "default_safety_factor")]
    pub safety_factor: f64,
    /// Wall thickness t (m)
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness_m: f64,
    #[serde(default)]
    pub material: PipeMaterial,
    /// Reduction on the pipe's axial capacity
    #[serde(default = "default_reduction_factor")]
    pub reduction_factor: f64,
    /// Cover depth H (m)
    pub cover_depth_m: f64,
    /// Soil reaction modulus E′ (MPa)
    #[serde(default = "default_soil_modulus")]
    pub soil_modulus_mpa: f64,
    /// Overrides the material table's unit weight for the overburden pressure
    #[serde(default)]
    pub unit_weight_kn_m3: Option<f64>,
    #[serde(default)]
    pub backstop: Backstop,
    /// When set, the backstop's γ and φ come from this soil's jacking entry
    #[serde(default)]
    pub backstop_soil: Option<SoilType>,
}

impl PipelineRequest {
    /// Request for the given geometry with the remaining parameters at their
    /// usual values: concrete pipe, no joints, K = 1.5, gravity backstop.
    pub fn new(pipe_diameter_m: f64, pipe_length_m: f64, cover_depth_m: f64) -> Self {
        PipelineRequest {
            label: String::new(),
            pipe_diameter_m,
            tool_diameter_m: default_tool_diameter(),
            pipe_length_m,
            unit_friction_kpa: default_unit_friction(),
            face_pressure_kpa: default_face_pressure(),
            joint_count: 0,
            joint_friction_coefficient: default_joint_friction_coefficient(),
            joint_normal_force_kn: default_joint_normal_force(),
            safety_factor: default_safety_factor(),
            wall_thickness_m: default_wall_thickness(),
            material: PipeMaterial::default(),
            reduction_factor: default_reduction_factor(),
            cover_depth_m,
            soil_modulus_mpa: default_soil_modulus(),
            unit_weight_kn_m3: None,
            backstop: Backstop::default(),
            backstop_soil: None,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("pipe_diameter_m", self.pipe_diameter_m, "Pipe diameter must be positive")?;
        if self.pipe_diameter_m > MAX_PIPE_DIAMETER_M {
            return Err(CalcError::invalid_input(
                "pipe_diameter_m",
                self.pipe_diameter_m.to_string(),
                format!("Pipe diameter cannot exceed {} m", MAX_PIPE_DIAMETER_M),
            ));
        }
        require_positive("tool_diameter_m", self.tool_diameter_m, "Tool-head diameter must be positive")?;
        require_positive("pipe_length_m", self.pipe_length_m, "Jacking length must be positive")?;
        require_positive("wall_thickness_m", self.wall_thickness_m, "Wall thickness must be positive")?;

        require_positive("cover_depth_m", self.cover_depth_m, "Cover depth must be positive")?;
        if self.cover_depth_m < MIN_COVER_DEPTH_M {
            return Err(CalcError::invalid_input(
                "cover_depth_m",
                self.cover_depth_m.to_string(),
                format!("Cover depth must be at least {} m", MIN_COVER_DEPTH_M),
            ));
        }

        require_finite("safety_factor", self.safety_factor)?;
        let (k_min, k_max) = SAFETY_FACTOR_RANGE;
        if self.safety_factor < k_min || self.safety_factor > k_max {
            return Err(CalcError::invalid_input(
                "safety_factor",
                self.safety_factor.to_string(),
                format!("Safety factor must be between {} and {}", k_min, k_max),
            ));
        }

        require_finite("reduction_factor", self.reduction_factor)?;
        if self.reduction_factor <= 0.0 || self.reduction_factor > 1.0 {
            return Err(CalcError::invalid_input(
                "reduction_factor",
                self.reduction_factor.to_string(),
                "Reduction factor must be in (0, 1]",
            ));
        }

        require_non_negative("unit_friction_kpa", self.unit_friction_kpa, "Unit friction cannot be negative")?;
        require_non_negative("face_pressure_kpa", self.face_pressure_kpa, "Face pressure cannot be negative")?;
        require_non_negative(
            "joint_friction_coefficient",
            self.joint_friction_coefficient,
            "Joint friction coefficient cannot be negative",
        )?;
        require_non_negative(
            "joint_normal_force_kn",
            self.joint_normal_force_kn,
            "Joint normal force cannot be negative",
        )?;
        require_positive("soil_modulus_mpa", self.soil_modulus_mpa, "Soil modulus must be positive")?;
        if let Some(gamma) = self.unit_weight_kn_m3 {
            require_positive("unit_weight_kn_m3", gamma, "Unit weight must be positive")?;
        }
        self.backstop.validate()
    }
}

// ============================================================================
// Result
// ============================================================================

/// Push-force breakdown (kN)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PushForce {
    /// F₁ skin friction along the pipe
    pub friction_resistance_kn: f64,
    /// F₂ resistance at the tool head
    pub face_resistance_kn: f64,
    /// F₃ joint friction, zero without joints
    pub joint_resistance_kn: f64,
    pub safety_factor: f64,
    /// K·(F₁ + F₂ + F₃)
    pub total_kn: f64,
}

/// Buried-pipe response to overburden and live load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeResponse {
    /// Pv = γ·H (kPa)
    pub vertical_pressure_kpa: f64,
    /// q from the standard wheel (kPa)
    pub live_load_pressure_kpa: f64,
    pub total_pressure_kpa: f64,
    pub hoop_stress_kpa: f64,
    pub allowable_stress_kpa: f64,
    pub deformation_mm: f64,
    pub allowable_deformation_mm: f64,
}

/// Pass/fail of each check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineChecks {
    pub strength: bool,
    pub work_well: bool,
    pub stress: bool,
    pub deformation: bool,
}

impl PipelineChecks {
    pub fn all_pass(&self) -> bool {
        self.strength && self.work_well && self.stress && self.deformation
    }
}

/// Pipe-jacking analysis results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub label: String,
    pub material: PipeMaterial,
    pub backstop: Backstop,
    pub push_force: PushForce,
    /// Axial capacity of the pipe wall (kN), zero for a solid section
    pub pipe_capacity_kn: f64,
    pub backstop_capacity_kn: f64,
    pub response: PipeResponse,
    pub checks: PipelineChecks,
    /// Push force / pipe capacity, +∞ (JSON `null`) when the capacity is zero
    #[serde(with = "super::unbounded")]
    pub strength_ratio: f64,
    /// Deformation / allowable deformation
    pub deformation_ratio: f64,
    pub overall_safe: bool,
    pub level: SafetyLevel,
    pub recommendations: Vec<String>,
    pub calculation_info: CalculationInfo,
}

impl PipelineResult {
    pub fn passes(&self) -> bool {
        self.overall_safe
    }
}

// ============================================================================
// Recommendations
// ============================================================================

type Rule = RecommendationRule<PipelineChecks>;

const PROCEED_RECOMMENDATIONS: [&str; 2] = [
    "All checks pass; construct to the design parameters",
    "Strengthen monitoring during construction to ensure safety",
];

fn recommendation_rules() -> [Rule; 4] {
    [
        Rule::new(
            |c| !c.strength,
            |_| "Pipe strength is insufficient; increase wall thickness or use a higher-strength material".to_string(),
        ),
        Rule::new(
            |c| !c.work_well,
            |_| "Work-well backstop resistance is insufficient; strengthen the backstop structure".to_string(),
        ),
        Rule::new(
            |c| !c.stress,
            |_| "Hoop stress exceeds the allowable; increase cover depth or use a higher-strength pipe".to_string(),
        ),
        Rule::new(
            |c| !c.deformation,
            |_| "Pipe deformation exceeds the allowable; reduce the diameter or increase wall thickness".to_string(),
        ),
    ]
}

// ============================================================================
// Calculation
// ============================================================================

/// Pipe-jacking calculator bound to a set of design tables.
#[derive(Debug, Clone, Copy)]
pub struct PipelineCalculator<'a> {
    tables: &'a DesignTables,
}

impl<'a> PipelineCalculator<'a> {
    pub fn new(tables: &'a DesignTables) -> Self {
        PipelineCalculator { tables }
    }

    /// Run the push-force, backstop and pipe-response checks.
    ///
    /// # Errors
    ///
    /// `CalcError::InvalidInput` for out-of-range parameters,
    /// `CalcError::MaterialNotFound` when the material or backstop soil is
    /// missing from the tables, `CalcError::NonFiniteResult` when inputs
    /// overflow the push force, capacities or pipe response.
    pub fn calculate(&self, request: &PipelineRequest) -> CalcResult<PipelineResult> {
        request.validate()?;
        debug!(label = %request.label, material = %request.material, "calculating pipe jacking");

        let material = self.tables.pipe_material(request.material)?;
        let backstop = match request.backstop_soil {
            Some(soil) => {
                let backstop = request.backstop.in_soil(&self.tables.jacking_soil(soil)?);
                backstop.validate().map_err(|e| {
                    CalcError::invalid_configuration(
                        "jacking_soils",
                        format!("{} entry unusable for the backstop: {}", soil, e),
                    )
                })?;
                backstop
            }
            None => request.backstop,
        };

        let friction = skin_friction_resistance(request.pipe_diameter_m, request.pipe_length_m, request.unit_friction_kpa);
        let face = face_resistance(request.tool_diameter_m, request.face_pressure_kpa);
        let joints = joint_friction_resistance(
            request.joint_count,
            request.joint_friction_coefficient,
            request.joint_normal_force_kn,
        );
        let push_force = PushForce {
            friction_resistance_kn: friction,
            face_resistance_kn: face,
            joint_resistance_kn: joints,
            safety_factor: request.safety_factor,
            total_kn: require_finite_result(
                "push_force.total_kn",
                total_push_force(request.safety_factor, friction, face, joints),
            )?,
        };

        let tensile_strength = Megapascals(material.tensile_strength_mpa);
        let pipe_capacity = pipe_axial_capacity(
            request.pipe_diameter_m,
            request.wall_thickness_m,
            tensile_strength,
            request.reduction_factor,
        );
        if pipe_capacity == 0.0 {
            warn!(
                wall_thickness_m = request.wall_thickness_m,
                diameter_m = request.pipe_diameter_m,
                "wall thickness reaches the pipe radius, axial capacity taken as zero"
            );
        }
        let pipe_capacity = require_finite_result("pipe_capacity_kn", pipe_capacity)?;
        let backstop_capacity = require_finite_result("backstop_capacity_kn", backstop.capacity_kn())?;

        let unit_weight = request.unit_weight_kn_m3.unwrap_or(material.unit_weight_kn_m3);
        let vertical_pressure = unit_weight * request.cover_depth_m;
        let live_load = vehicle_live_load_pressure_kpa();
        let total_pressure = vertical_pressure + live_load;
        let diameter = Meters(request.pipe_diameter_m);
        let allowable_deformation: Millimeters = (diameter * ALLOWABLE_DEFORMATION_RATIO).into();
        let response = PipeResponse {
            vertical_pressure_kpa: vertical_pressure,
            live_load_pressure_kpa: live_load,
            total_pressure_kpa: total_pressure,
            hoop_stress_kpa: hoop_stress_kpa(total_pressure, request.pipe_diameter_m, request.wall_thickness_m),
            allowable_stress_kpa: Kilopascals::from(tensile_strength).value(),
            deformation_mm: ring_deflection_mm(
                total_pressure,
                diameter,
                Meters(request.wall_thickness_m),
                Megapascals(material.elastic_modulus_mpa),
                Megapascals(request.soil_modulus_mpa),
            ),
            allowable_deformation_mm: allowable_deformation.value(),
        };
        require_finite_result("response.hoop_stress_kpa", response.hoop_stress_kpa)?;
        require_finite_result("response.deformation_mm", response.deformation_mm)?;

        let checks = PipelineChecks {
            strength: push_force.total_kn <= pipe_capacity,
            work_well: push_force.total_kn <= backstop_capacity,
            stress: response.hoop_stress_kpa <= response.allowable_stress_kpa,
            deformation: response.deformation_mm <= response.allowable_deformation_mm,
        };
        let overall_safe = checks.all_pass();
        let level = if overall_safe { SafetyLevel::Safe } else { SafetyLevel::Danger };
        debug!(push_force_kn = push_force.total_kn, %level, "pipe jacking complete");

        Ok(PipelineResult {
            label: request.label.clone(),
            material: request.material,
            backstop,
            push_force,
            pipe_capacity_kn: pipe_capacity,
            backstop_capacity_kn: backstop_capacity,
            response,
            checks,
            strength_ratio: if pipe_capacity > 0.0 {
                push_force.total_kn / pipe_capacity
            } else {
                f64::INFINITY
            },
            deformation_ratio: response.deformation_mm / response.allowable_deformation_mm,
            overall_safe,
            level,
            recommendations: evaluate_rules(&recommendation_rules(), &checks, &PROCEED_RECOMMENDATIONS),
            calculation_info: CalculationInfo {
                method: format!("Push force superposition with {} backstop", backstop.display_name().to_lowercase()),
                standard: code_ref::VEHICLE_LOAD.to_string(),
                equations: pipeline_equations(backstop.equation()),
            },
        })
    }
}

/// Run a pipe-jacking analysis with the standard design tables.
pub fn calculate(request: &PipelineRequest) -> CalcResult<PipelineResult> {
    PipelineCalculator::new(DesignTables::standard()).calculate(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn passing_request() -> PipelineRequest {
        PipelineRequest {
            label: "HDPE sleeve".to_string(),
            tool_diameter_m: 0.7,
            unit_friction_kpa: 2.0,
            face_pressure_kpa: 50.0,
            wall_thickness_m: 0.06,
            material: PipeMaterial::Hdpe,
            // very stiff surround keeps the ring deflection (21.6 mm) under 5% of D
            soil_modulus_mpa: 1.0e6,
            backstop: Backstop::PileWall(PileWall::default()),
            ..PipelineRequest::new(0.6, 20.0, 3.0)
        }
    }

    /// 1 m concrete pipe jacked 100 m under 2 m of cover
    fn reference_request() -> PipelineRequest {
        PipelineRequest::new(1.0, 100.0, 2.0)
    }

    #[test]
    fn test_default_case() {
        let result = calculate(&reference_request()).unwrap();

        assert_relative_eq!(result.push_force.friction_resistance_kn, 1570.796, epsilon = 1e-3);
        assert_relative_eq!(result.push_force.face_resistance_kn, 113.097, epsilon = 1e-3);
        assert_eq!(result.push_force.joint_resistance_kn, 0.0);
        assert_relative_eq!(result.push_force.total_kn, 2525.84, epsilon = 1e-2);
        assert_relative_eq!(result.pipe_capacity_kn, 483.07, epsilon = 1e-2);
        // 0.5·18·9·(3 − 1/3)·2 = 432
        assert_relative_eq!(result.backstop_capacity_kn, 432.0, epsilon = 1e-9);

        assert_relative_eq!(result.response.vertical_pressure_kpa, 50.0);
        assert_relative_eq!(result.response.total_pressure_kpa, 50.0 + 260.0 / 0.12, epsilon = 1e-9);
        assert_relative_eq!(result.response.allowable_stress_kpa, 2010.0, epsilon = 1e-9);
        assert_relative_eq!(result.response.allowable_deformation_mm, 50.0, epsilon = 1e-9);

        assert!(!result.checks.strength);
        assert!(!result.checks.work_well);
        assert!(!result.overall_safe);
        assert_eq!(result.level, SafetyLevel::Danger);
        assert_eq!(result.recommendations.len(), 4);
        assert!(result.recommendations[0].starts_with("Pipe strength is insufficient"));
    }

    #[test]
    fn test_zero_joints_give_zero_joint_resistance() {
        let request = PipelineRequest {
            joint_count: 0,
            joint_friction_coefficient: 0.9,
            joint_normal_force_kn: 1.0e6,
            ..reference_request()
        };
        assert_eq!(calculate(&request).unwrap().push_force.joint_resistance_kn, 0.0);

        let with_joints = PipelineRequest { joint_count: 10, ..reference_request() };
        // 10 · 0.2 · 100
        assert_relative_eq!(calculate(&with_joints).unwrap().push_force.joint_resistance_kn, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_solid_section_has_zero_capacity() {
        let request = PipelineRequest { wall_thickness_m: 0.5, ..reference_request() };
        let result = calculate(&request).unwrap();
        assert_eq!(result.pipe_capacity_kn, 0.0);
        assert!(result.strength_ratio.is_infinite());
        assert!(!result.checks.strength);

        let json = serde_json::to_string(&result).unwrap();
        let back: PipelineResult = serde_json::from_str(&json).unwrap();
        assert!(back.strength_ratio.is_infinite());
        assert_eq!(back.checks, result.checks);
    }

    #[test]
    fn test_all_pass_gives_proceed_messages() {
        let result = calculate(&passing_request()).unwrap();
        assert!(result.checks.all_pass(), "{:?}", result.checks);
        assert_eq!(result.level, SafetyLevel::Safe);
        assert_eq!(result.recommendations, PROCEED_RECOMMENDATIONS.map(String::from).to_vec());
        assert!(result.strength_ratio < 1.0);
        assert!(result.deformation_ratio < 1.0);
    }

    #[test]
    fn test_backstop_capacities() {
        // π·0.8·15·50·4
        let piles = Backstop::PileWall(PileWall::default());
        assert_relative_eq!(piles.capacity_kn(), std::f64::consts::PI * 2400.0, epsilon = 1e-9);

        // 0.5·18·16·3·8 = 3456
        let sheet = Backstop::SheetPile(SheetPileWall::default());
        assert_relative_eq!(sheet.capacity_kn(), 3456.0, epsilon = 1e-9);
    }

    #[test]
    fn test_backstop_soil_from_tables() {
        let request = PipelineRequest {
            backstop_soil: Some(SoilType::Clay),
            ..reference_request()
        };
        let result = calculate(&request).unwrap();
        match result.backstop {
            Backstop::Gravity(wall) => {
                assert_eq!(wall.friction_angle_deg, 15.0);
                assert_eq!(wall.soil_unit_weight_kn_m3, 18.0);
            }
            other => panic!("unexpected backstop {:?}", other),
        }
        assert!(result.backstop_capacity_kn < 432.0);

        // No rock entry in the jacking table
        let rock = PipelineRequest { backstop_soil: Some(SoilType::Rock), ..reference_request() };
        assert!(matches!(calculate(&rock).unwrap_err(), CalcError::MaterialNotFound { .. }));
    }

    #[test]
    fn test_backstop_soil_entry_is_checked() {
        let mut tables = DesignTables::default();
        let clay = tables.jacking_soils.iter_mut().find(|s| s.soil == SoilType::Clay).unwrap();
        clay.friction_angle_deg = 0.0;
        let request = PipelineRequest { backstop_soil: Some(SoilType::Clay), ..reference_request() };
        let err = PipelineCalculator::new(&tables).calculate(&request).unwrap_err();
        assert!(matches!(err, CalcError::InvalidConfiguration { ref table, .. } if table == "jacking_soils"), "{:?}", err);
    }

    #[test]
    fn test_unit_weight_override() {
        let request = PipelineRequest { unit_weight_kn_m3: Some(20.0), ..reference_request() };
        assert_relative_eq!(calculate(&request).unwrap().response.vertical_pressure_kpa, 40.0);
    }

    #[test]
    fn test_validation() {
        let cases = [
            PipelineRequest { pipe_diameter_m: 6.0, ..reference_request() },
            PipelineRequest { cover_depth_m: 0.5, ..reference_request() },
            PipelineRequest { safety_factor: 2.5, ..reference_request() },
            PipelineRequest { reduction_factor: 0.0, ..reference_request() },
            PipelineRequest { wall_thickness_m: 0.0, ..reference_request() },
            PipelineRequest { unit_friction_kpa: -1.0, ..reference_request() },
            PipelineRequest {
                backstop: Backstop::Gravity(GravityWall { friction_angle_deg: 90.0, ..Default::default() }),
                ..reference_request()
            },
            PipelineRequest {
                backstop: Backstop::PileWall(PileWall { pile_count: 0, ..Default::default() }),
                ..reference_request()
            },
        ];
        for request in &cases {
            assert!(calculate(request).unwrap_err().is_validation_error(), "{:?}", request);
        }
    }

    #[test]
    fn test_overflowing_inputs_rejected() {
        let request = PipelineRequest { unit_friction_kpa: 1.0e306, ..reference_request() };
        assert_eq!(calculate(&request).unwrap_err(), CalcError::non_finite_result("push_force.total_kn"));

        let request = PipelineRequest {
            backstop: Backstop::PileWall(PileWall { pile_count: u32::MAX, skin_friction_kpa: 1.0e300, ..Default::default() }),
            ..reference_request()
        };
        assert_eq!(calculate(&request).unwrap_err(), CalcError::non_finite_result("backstop_capacity_kn"));
    }

    #[test]
    fn test_request_from_partial_json() {
        let json = r#"{
            "pipe_diameter_m": 0.8,
            "pipe_length_m": 50.0,
            "cover_depth_m": 2.5,
            "material": "HDPE",
            "backstop": { "kind": "sheet_pile", "embedment_depth_m": 5.0 }
        }"#;
        let request: PipelineRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.material, PipeMaterial::Hdpe);
        assert_eq!(
            request.backstop,
            Backstop::SheetPile(SheetPileWall { embedment_depth_m: 5.0, ..Default::default() })
        );
        let expected = PipelineRequest {
            material: PipeMaterial::Hdpe,
            backstop: request.backstop,
            ..PipelineRequest::new(0.8, 50.0, 2.5)
        };
        assert_eq!(request, expected);
    }

    #[test]
    fn test_geometry_fields_are_required() {
        for field in ["pipe_diameter_m", "pipe_length_m", "cover_depth_m"] {
            let mut json = serde_json::json!({
                "pipe_diameter_m": 1.0,
                "pipe_length_m": 100.0,
                "cover_depth_m": 2.0
            });
            json.as_object_mut().unwrap().remove(field);
            let err = serde_json::from_value::<PipelineRequest>(json).unwrap_err();
            assert!(err.to_string().contains(field), "{}", err);
        }
    }

    #[test]
    fn test_equations_follow_backstop() {
        let result = calculate(&passing_request()).unwrap();
        assert!(result.calculation_info.equations.contains(&Equation::PileBackstop));
        assert!(!result.calculation_info.equations.contains(&Equation::RankineCoefficients));
    }
}
