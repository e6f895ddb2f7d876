//! # Dual-Pile Settlement Analysis
//!
//! Settlement of an existing roadbed caused by two new pile foundations, one
//! on each side, evaluated on the standard 16-point grid with the
//! Boussinesq point-load solution, empirical pile corrections and a pile
//! interaction factor, then classified against the JTG D30-2015 limits.
//!
//! ## Coordinate System
//!
//! - x across the roadbed, centreline at 0, negative to the left
//! - y along the road, both piles on the y = 0 section
//! - z depth below ground, positive downward
//!
//! Pile 1 sits at x = −(width/2 + pile1_distance), pile 2 at
//! x = +(width/2 + pile2_distance).
//!
//! ## Example
//!
//! ```rust
//! use impact_core::calculations::settlement::{
//!     calculate, PileSpec, RoadbedSpec, SettlementRequest, SoilLayer,
//! };
//!
//! let request = SettlementRequest {
//!     label: "K12+300 overpass".to_string(),
//!     pile1: PileSpec { diameter_m: 1.0, length_m: 20.0, load_kn: 1000.0 },
//!     pile2: PileSpec { diameter_m: 1.2, length_m: 25.0, load_kn: 1200.0 },
//!     roadbed: RoadbedSpec { width_m: 12.0, pile1_distance_m: 6.0, pile2_distance_m: 8.0 },
//!     soil_layers: vec![
//!         SoilLayer::new("0-5".parse().unwrap(), "Clay", 10.0, 0.35),
//!         SoilLayer::new("5-10".parse().unwrap(), "Sand", 15.0, 0.30),
//!     ],
//!     road_classification: "first-class highway".to_string(),
//! };
//!
//! let result = calculate(&request).unwrap();
//! assert_eq!(result.points.len(), 16);
//! println!("Max settlement: {:.2} mm ({})", result.statistics.max_settlement_mm, result.safety.level);
//! ```

pub mod grid;
pub mod safety;
pub mod soil;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DesignTables;
use crate::equations::{
    combined_correction, diameter_correction, influence_factor, length_correction, pile_interaction_factor,
    point_load_settlement_m, point_load_stresses, settlement_equations, StressComponents, MAX_CORRECTED_PILE_LENGTH_M,
};
use crate::errors::{require_finite_result, require_non_negative, require_positive, CalcError, CalcResult};
use crate::road_standards::{code_ref, RoadClassification};
use crate::units::{Kilonewtons, Megapascals, Meters, Millimeters};

use super::CalculationInfo;

pub use grid::{analysis_span, standard_points, CalculationPoint, GRID_POINT_COUNT};
pub use safety::{check_physics, classify, Compliance, ExceedanceCounts, PhysicsCheck, SafetyAssessment, SafetyStatistics};
pub use soil::{equivalent_soil, soil_at_depth, validate_layers, DepthRange, EquivalentSoil, LocalSoil, SoilLayer};

/// Practical Poisson's ratio range; values outside are reported, not rejected
pub const TYPICAL_POISSON_RANGE: (f64, f64) = (0.1, 0.45);

/// Practical pile slenderness L/D range
pub const TYPICAL_SLENDERNESS_RANGE: (f64, f64) = (5.0, 100.0);

/// Practical compression modulus range (MPa)
pub const TYPICAL_MODULUS_RANGE_MPA: (f64, f64) = (1.0, 50.0);

// ============================================================================
// Request
// ============================================================================

/// A bored pile acting as a point load at its head.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PileSpec {
    /// Pile diameter (m)
    pub diameter_m: f64,
    /// Embedded length below grade (m)
    pub length_m: f64,
    /// Design load (kN)
    pub load_kn: f64,
}

impl PileSpec {
    fn validate(&self, name: &str) -> CalcResult<()> {
        require_positive(&format!("{}.diameter_m", name), self.diameter_m, "Pile diameter must be positive")?;
        require_positive(&format!("{}.length_m", name), self.length_m, "Pile length must be positive")?;
        if self.length_m >= MAX_CORRECTED_PILE_LENGTH_M {
            return Err(CalcError::invalid_input(
                format!("{}.length_m", name),
                self.length_m.to_string(),
                format!(
                    "Pile length must be below {:.0} m, where the length correction reaches zero",
                    MAX_CORRECTED_PILE_LENGTH_M
                ),
            ));
        }
        require_positive(&format!("{}.load_kn", name), self.load_kn, "Pile load must be positive")?;
        Ok(())
    }

    /// Slenderness L/D
    pub fn slenderness(&self) -> f64 {
        self.length_m / self.diameter_m
    }
}

/// Existing roadbed geometry and the clear distances to the new piles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadbedSpec {
    /// Roadbed width (m)
    pub width_m: f64,
    /// Distance from the left roadbed edge to pile 1 (m)
    pub pile1_distance_m: f64,
    /// Distance from the right roadbed edge to pile 2 (m)
    pub pile2_distance_m: f64,
}

impl RoadbedSpec {
    fn validate(&self) -> CalcResult<()> {
        require_positive("roadbed.width_m", self.width_m, "Roadbed width must be positive")?;
        require_non_negative(
            "roadbed.pile1_distance_m",
            self.pile1_distance_m,
            "Distance to pile 1 cannot be negative",
        )?;
        require_non_negative(
            "roadbed.pile2_distance_m",
            self.pile2_distance_m,
            "Distance to pile 2 cannot be negative",
        )?;
        Ok(())
    }

    /// x coordinate of pile 1 (left of the roadbed)
    pub fn pile1_x(&self) -> f64 {
        -(self.width_m / 2.0 + self.pile1_distance_m)
    }

    /// x coordinate of pile 2 (right of the roadbed)
    pub fn pile2_x(&self) -> f64 {
        self.width_m / 2.0 + self.pile2_distance_m
    }

    /// Centre-to-centre pile spacing = width + d1 + d2
    pub fn pile_spacing(&self) -> f64 {
        self.pile2_x() - self.pile1_x()
    }
}

/// Input for a settlement analysis.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "K12+300 overpass",
///   "pile1": { "diameter_m": 1.0, "length_m": 20.0, "load_kn": 1000.0 },
///   "pile2": { "diameter_m": 1.2, "length_m": 25.0, "load_kn": 1200.0 },
///   "roadbed": { "width_m": 12.0, "pile1_distance_m": 6.0, "pile2_distance_m": 8.0 },
///   "soil_layers": [
///     { "depth_range": "0-5", "name": "Clay", "compression_modulus_mpa": 10.0, "poisson_ratio": 0.35 },
///     { "depth_range": "5-10", "name": "Sand", "compression_modulus_mpa": 15.0, "poisson_ratio": 0.30 }
///   ],
///   "road_classification": "first-class highway"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// User label for this analysis
    #[serde(default)]
    pub label: String,
    pub pile1: PileSpec,
    pub pile2: PileSpec,
    pub roadbed: RoadbedSpec,
    /// Layers top-down, contiguous from the ground surface
    pub soil_layers: Vec<SoilLayer>,
    /// Road classification label, e.g. "highway" or "一级公路"
    pub road_classification: String,
}

impl SettlementRequest {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        self.pile1.validate("pile1")?;
        self.pile2.validate("pile2")?;
        self.roadbed.validate()?;
        validate_layers(&self.soil_layers)
    }

    /// Non-fatal warnings about parameters outside their practical range.
    pub fn advisories(&self) -> Vec<String> {
        let mut advisories = Vec::new();
        for (name, pile) in [("Pile 1", &self.pile1), ("Pile 2", &self.pile2)] {
            let ratio = pile.slenderness();
            if ratio < TYPICAL_SLENDERNESS_RANGE.0 || ratio > TYPICAL_SLENDERNESS_RANGE.1 {
                advisories.push(format!(
                    "{} length/diameter ratio {:.1} is outside the typical range {}-{}",
                    name, ratio, TYPICAL_SLENDERNESS_RANGE.0, TYPICAL_SLENDERNESS_RANGE.1
                ));
            }
        }
        for layer in &self.soil_layers {
            let nu = layer.poisson_ratio;
            if nu < TYPICAL_POISSON_RANGE.0 || nu > TYPICAL_POISSON_RANGE.1 {
                advisories.push(format!(
                    "Layer '{}' Poisson's ratio {} is outside the typical range {}-{}",
                    layer.name, nu, TYPICAL_POISSON_RANGE.0, TYPICAL_POISSON_RANGE.1
                ));
            }
            let e = layer.compression_modulus_mpa;
            if e < TYPICAL_MODULUS_RANGE_MPA.0 || e > TYPICAL_MODULUS_RANGE_MPA.1 {
                advisories.push(format!(
                    "Layer '{}' compression modulus {} MPa is outside the typical range {}-{} MPa",
                    layer.name, e, TYPICAL_MODULUS_RANGE_MPA.0, TYPICAL_MODULUS_RANGE_MPA.1
                ));
            }
        }
        advisories
    }
}

// ============================================================================
// Result
// ============================================================================

/// Settlement and stress at one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementPoint {
    /// `W1` to `W16`
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// 3-D distance to pile 1 (m)
    pub pile1_distance_m: f64,
    /// 3-D distance to pile 2 (m)
    pub pile2_distance_m: f64,
    /// Corrected settlement from pile 1 alone (m)
    pub pile1_settlement_m: f64,
    /// Corrected settlement from pile 2 alone (m)
    pub pile2_settlement_m: f64,
    /// (pile1 + pile2) × interaction factor (m)
    pub total_settlement_m: f64,
    pub settlement_mm: f64,
    pub interaction_factor: f64,
    /// Superposed stresses from both piles
    pub stresses: StressComponents,
    /// Influence factor relative to the centreline origin
    pub influence_factor: f64,
    /// Soil parameters used at this depth
    pub soil: LocalSoil,
}

/// Empirical correction factors of one pile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionFactors {
    /// Length correction a
    pub length: f64,
    /// Diameter correction b
    pub diameter: f64,
    /// a·b
    pub combined: f64,
}

impl CorrectionFactors {
    pub fn for_pile(pile: &PileSpec) -> Self {
        CorrectionFactors {
            length: length_correction(pile.length_m),
            diameter: diameter_correction(pile.diameter_m),
            combined: combined_correction(pile.length_m, pile.diameter_m),
        }
    }
}

/// Pile layout derived from the roadbed geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PileLayout {
    pub pile1_x_m: f64,
    pub pile2_x_m: f64,
    pub spacing_m: f64,
    pub analysis_span_m: f64,
    pub pile1_corrections: CorrectionFactors,
    pub pile2_corrections: CorrectionFactors,
    pub interaction_factor: f64,
}

/// Aggregate statistics over the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementStatistics {
    pub max_settlement_m: f64,
    pub min_settlement_m: f64,
    pub mean_settlement_m: f64,
    pub max_settlement_mm: f64,
    pub min_settlement_mm: f64,
    pub mean_settlement_mm: f64,
    /// Point with the largest settlement
    pub max_point_id: String,
}

/// Number of contour levels spread over the settlement range
pub const CONTOUR_LEVEL_COUNT: usize = 10;

/// Grid values arranged for contour plotting, one entry per point in grid
/// order, plus evenly spaced levels from the minimum to the maximum settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub settlement_mm: Vec<f64>,
    pub levels_mm: Vec<f64>,
}

/// Settlement analysis results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub label: String,
    pub layout: PileLayout,
    pub equivalent_soil: EquivalentSoil,
    /// Grid results, depth-major
    pub points: Vec<SettlementPoint>,
    pub statistics: SettlementStatistics,
    pub safety: SafetyAssessment,
    pub physics_check: PhysicsCheck,
    /// Parameters outside their practical range
    pub advisories: Vec<String>,
    /// True when any point used the fallback soil layer or the road
    /// classification label was not recognised
    pub used_fallback: bool,
    pub calculation_info: CalculationInfo,
}

impl SettlementResult {
    /// True when the maximum settlement is within the approach limit
    pub fn passes(&self) -> bool {
        self.safety.passes()
    }

    /// Point by id (`"W1"` … `"W16"`)
    pub fn point(&self, id: &str) -> Option<&SettlementPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Grid values and [`CONTOUR_LEVEL_COUNT`] levels for a contour plot
    pub fn contour_data(&self) -> ContourData {
        let (min, max) = (self.statistics.min_settlement_mm, self.statistics.max_settlement_mm);
        let step = (max - min) / (CONTOUR_LEVEL_COUNT - 1) as f64;
        ContourData {
            x: self.points.iter().map(|p| p.x).collect(),
            y: self.points.iter().map(|p| p.y).collect(),
            z: self.points.iter().map(|p| p.z).collect(),
            settlement_mm: self.points.iter().map(|p| p.settlement_mm).collect(),
            levels_mm: (0..CONTOUR_LEVEL_COUNT).map(|i| min + step * i as f64).collect(),
        }
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// Settlement calculator bound to a set of design tables.
#[derive(Debug, Clone, Copy)]
pub struct SettlementCalculator<'a> {
    tables: &'a DesignTables,
}

impl<'a> SettlementCalculator<'a> {
    pub fn new(tables: &'a DesignTables) -> Self {
        SettlementCalculator { tables }
    }

    /// Run a settlement analysis.
    ///
    /// # Errors
    ///
    /// Returns `CalcError::InvalidInput` for out-of-range parameters, an empty
    /// or non-contiguous soil stack, or a malformed depth range, and
    /// `CalcError::NonFiniteResult` when loads are large enough to overflow
    /// the superposed settlement or stresses.
    pub fn calculate(&self, request: &SettlementRequest) -> CalcResult<SettlementResult> {
        request.validate()?;
        debug!(label = %request.label, "calculating dual-pile settlement");

        let (classification, classification_fallback) = RoadClassification::resolve(&request.road_classification);
        if classification_fallback {
            warn!(
                label = %request.road_classification,
                "unrecognised road classification, using {}",
                classification
            );
        }
        let limits = self.tables.settlement_limits(classification)?;

        let roadbed = &request.roadbed;
        let span = analysis_span(roadbed.width_m);
        let layout = PileLayout {
            pile1_x_m: roadbed.pile1_x(),
            pile2_x_m: roadbed.pile2_x(),
            spacing_m: roadbed.pile_spacing(),
            analysis_span_m: span,
            pile1_corrections: CorrectionFactors::for_pile(&request.pile1),
            pile2_corrections: CorrectionFactors::for_pile(&request.pile2),
            interaction_factor: pile_interaction_factor(
                roadbed.pile_spacing(),
                request.pile1.diameter_m,
                request.pile2.diameter_m,
            ),
        };

        let points = standard_points(roadbed.width_m)
            .into_iter()
            .map(|p| self.evaluate_point(&p, request, &layout))
            .collect::<CalcResult<Vec<_>>>()?;

        let soil_fallback = points.iter().any(|p| p.soil.used_fallback);
        if soil_fallback {
            warn!(label = %request.label, "sample depth below the soil stack, deepest layer used");
        }

        let statistics = statistics(&points);
        require_finite_result("mean_settlement_m", statistics.mean_settlement_m)?;
        let safety = safety::assess(&points, limits, classification_fallback);
        let physics_check = check_physics(&points, span);
        debug!(
            max_mm = statistics.max_settlement_mm,
            level = %safety.level,
            "settlement analysis complete"
        );

        Ok(SettlementResult {
            label: request.label.clone(),
            layout,
            equivalent_soil: equivalent_soil(&request.soil_layers)?,
            points,
            statistics,
            safety,
            physics_check,
            advisories: request.advisories(),
            used_fallback: soil_fallback || classification_fallback,
            calculation_info: CalculationInfo {
                method: "Boussinesq point load with dual-pile superposition".to_string(),
                standard: code_ref::SETTLEMENT_LIMITS.to_string(),
                equations: settlement_equations(),
            },
        })
    }

    fn evaluate_point(
        &self,
        point: &CalculationPoint,
        request: &SettlementRequest,
        layout: &PileLayout,
    ) -> CalcResult<SettlementPoint> {
        let soil = soil_at_depth(&request.soil_layers, point.z)?;
        let modulus = Megapascals(soil.compression_modulus_mpa);
        let nu = soil.poisson_ratio;

        let dx1 = point.x - layout.pile1_x_m;
        let dx2 = point.x - layout.pile2_x_m;
        let (y, z) = (point.y, point.z);

        let load1 = Kilonewtons(request.pile1.load_kn);
        let load2 = Kilonewtons(request.pile2.load_kn);

        let pile1_settlement = point_load_settlement_m(load1, dx1, y, z, modulus, nu) * layout.pile1_corrections.combined;
        let pile2_settlement = point_load_settlement_m(load2, dx2, y, z, modulus, nu) * layout.pile2_corrections.combined;
        let total = require_finite_result(
            "total_settlement_m",
            (pile1_settlement + pile2_settlement) * layout.interaction_factor,
        )?;
        let total_mm: Millimeters = Meters(total).into();
        let stresses = point_load_stresses(load1, dx1, y, z) + point_load_stresses(load2, dx2, y, z);
        require_finite_result("stresses.sigma_z_kpa", stresses.sigma_z_kpa)?;
        require_finite_result("stresses.tau_xz_kpa", stresses.tau_xz_kpa)?;
        require_finite_result("stresses.tau_yz_kpa", stresses.tau_yz_kpa)?;

        Ok(SettlementPoint {
            id: point.id.clone(),
            x: point.x,
            y,
            z,
            pile1_distance_m: (dx1 * dx1 + y * y + z * z).sqrt(),
            pile2_distance_m: (dx2 * dx2 + y * y + z * z).sqrt(),
            pile1_settlement_m: pile1_settlement,
            pile2_settlement_m: pile2_settlement,
            total_settlement_m: total,
            settlement_mm: total_mm.value(),
            interaction_factor: layout.interaction_factor,
            stresses,
            influence_factor: influence_factor(point.x, y, z),
            soil,
        })
    }
}

fn statistics(points: &[SettlementPoint]) -> SettlementStatistics {
    let max_point = points
        .iter()
        .max_by(|a, b| a.total_settlement_m.total_cmp(&b.total_settlement_m));
    let max = max_point.map_or(0.0, |p| p.total_settlement_m);
    let min = points.iter().map(|p| p.total_settlement_m).fold(f64::INFINITY, f64::min);
    let mean = points.iter().map(|p| p.total_settlement_m).sum::<f64>() / points.len().max(1) as f64;
    SettlementStatistics {
        max_settlement_m: max,
        min_settlement_m: min,
        mean_settlement_m: mean,
        max_settlement_mm: max * 1000.0,
        min_settlement_mm: min * 1000.0,
        mean_settlement_mm: mean * 1000.0,
        max_point_id: max_point.map(|p| p.id.clone()).unwrap_or_default(),
    }
}

/// Run a settlement analysis with the standard design tables.
pub fn calculate(request: &SettlementRequest) -> CalcResult<SettlementResult> {
    SettlementCalculator::new(DesignTables::standard()).calculate(request)
}
