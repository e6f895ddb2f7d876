//! # Equation Registry
//!
//! Central registry of every closed-form equation the engine evaluates. Each
//! equation carries its plain-text formula, code reference and the source
//! function that implements it, so an exporter can print an audit appendix
//! listing exactly what a result was computed from.
//!
//! ## Usage
//!
//! ```rust
//! use impact_core::equations::registry::{settlement_equations, Equation};
//!
//! let meta = Equation::BoussinesqSettlement.metadata();
//! println!("{}: {}", meta.name, meta.formula_plain);
//! assert!(settlement_equations().contains(&Equation::PileInteractionFactor));
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Code References
// ============================================================================

/// Source of an equation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    /// Chinese highway industry standard (JTG)
    Jtg {
        code: &'static str,
        year: u16,
        section: &'static str,
    },
    /// Chinese national building standard (GB)
    Gb {
        code: &'static str,
        year: u16,
        section: &'static str,
    },
    /// Elastic half-space theory
    ElasticTheory { source: &'static str },
    /// Empirical fit calibrated against numerical simulation
    Empirical { basis: &'static str },
    /// Fundamental mechanics (no specific code reference needed)
    Mechanics,
}

impl CodeReference {
    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Jtg { code, year, section } => format!("JTG {}-{} {}", code, year, section),
            CodeReference::Gb { code, year, section } => format!("GB {}-{} {}", code, year, section),
            CodeReference::ElasticTheory { source } => format!("Elastic theory ({})", source),
            CodeReference::Empirical { basis } => format!("Empirical ({})", basis),
            CodeReference::Mechanics => "Fundamental Mechanics".to_string(),
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            CodeReference::Jtg { .. } => "JTG",
            CodeReference::Gb { .. } => "GB",
            CodeReference::ElasticTheory { .. } => "Elastic",
            CodeReference::Empirical { .. } => "Empirical",
            CodeReference::Mechanics => "Mechanics",
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for organizing equations in an appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Elastic displacement and stress under point loads
    ElasticSolutions,
    /// Empirical correction and interaction factors
    Corrections,
    /// Jacking resistances and capacities
    Jacking,
    /// Earth pressure on backstops
    EarthPressure,
    /// Buried pipe stress and deformation
    PipeResponse,
    /// Foundation bearing and base pressure
    Bearing,
    /// Overturning and sliding
    Stability,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::ElasticSolutions => "Elastic Solutions",
            EquationCategory::Corrections => "Corrections",
            EquationCategory::Jacking => "Jacking",
            EquationCategory::EarthPressure => "Earth Pressure",
            EquationCategory::PipeResponse => "Pipe Response",
            EquationCategory::Bearing => "Bearing",
            EquationCategory::Stability => "Stability",
        }
    }

    /// Sort order for the appendix (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::ElasticSolutions => 1,
            EquationCategory::Corrections => 2,
            EquationCategory::Jacking => 3,
            EquationCategory::EarthPressure => 4,
            EquationCategory::PipeResponse => 5,
            EquationCategory::Bearing => 6,
            EquationCategory::Stability => 7,
        }
    }

    /// All categories in appendix order
    pub fn all() -> Vec<EquationCategory> {
        use EquationCategory::*;
        let mut cats = vec![
            ElasticSolutions,
            Corrections,
            Jacking,
            EarthPressure,
            PipeResponse,
            Bearing,
            Stability,
        ];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "P", "R", "ν")
    pub symbol: &'static str,
    pub description: &'static str,
    /// Units (e.g., "kN", "m", "MPa")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for an equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    pub description: &'static str,
    /// The formula in plain text
    pub formula_plain: &'static str,
    pub reference: CodeReference,
    pub variables: Vec<Variable>,
    /// Assumptions or limitations
    pub assumptions: Vec<&'static str>,
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    /// Function name implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All equations evaluated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    // Settlement
    /// ω = P/(4πG)·[z²/R³ + 2(1−ν)/R]
    BoussinesqSettlement,
    /// σz, τxz, τyz
    BoussinesqStresses,
    /// I = (1/2π)(z/R³)(1 + z/R)
    InfluenceFactor,
    /// a = 0.985 − 0.00051L
    PileLengthCorrection,
    /// b = 0.038D² − 0.206D + 1.159
    PileDiameterCorrection,
    /// Piecewise spacing/diameter factor
    PileInteractionFactor,

    // Pipe jacking
    /// F = K(F₁ + F₂ + F₃)
    JackingPushForce,
    /// ft·A·1000·reduction
    PipeAxialCapacity,
    /// Ka, Kp
    RankineCoefficients,
    /// 0.5γH²(Kp − Ka)·B
    GravityBackstop,
    /// πdlq·n
    PileBackstop,
    /// 0.5γt²Kp·L
    SheetPileBackstop,
    /// Pv = γH, q = 260/(0.2·0.6)
    PipeVerticalLoad,
    /// σ = (Pv + q)D/(2t)
    PipeHoopStress,
    /// S = (Pv+q)D⁴/(3.67Et³ + 0.061E′D³)
    PipeRingDeflection,

    // Tower foundation
    /// fa = fak + ηbγ(b−3) + ηdγ(d−0.5)
    CorrectedBearingCapacity,
    /// (N+G)/A ± M/W
    EccentricBasePressure,
    /// (N+G)(b/2) / (H·h)
    OverturningFactor,
    /// (N+G)μ / H
    SlidingFactor,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::BoussinesqSettlement => EquationMetadata {
                name: "Point Load Settlement",
                description: "Vertical displacement of an elastic half-space under a surface point load",
                formula_plain: "w = P/(4*pi*G) * (z^2/R^3 + 2(1-nu)/R), G = E/(2(1+nu))",
                reference: CodeReference::ElasticTheory { source: "Boussinesq 1885" },
                variables: vec![
                    Variable::new("P", "Pile load", "kN"),
                    Variable::new("R", "Distance from load to point", "m"),
                    Variable::new("z", "Depth of point", "m"),
                    Variable::new("E", "Compression modulus", "MPa"),
                    Variable::new("nu", "Poisson's ratio", "-"),
                ],
                assumptions: vec![
                    "Homogeneous, isotropic, linear elastic half-space",
                    "Soil parameters taken from the layer at the point's depth",
                    "w = 0 at R = 0",
                ],
                category: EquationCategory::ElasticSolutions,
                source_module: "equations/boussinesq.rs",
                source_function: "point_load_settlement_m",
            },

            Equation::BoussinesqStresses => EquationMetadata {
                name: "Point Load Stresses",
                description: "Vertical normal and shear stresses beneath a surface point load",
                formula_plain: "sz = 3Pz^3/(2*pi*R^5), txz = 3Pxz^2/(2*pi*R^5), tyz = 3Pyz^2/(2*pi*R^5)",
                reference: CodeReference::ElasticTheory { source: "Boussinesq 1885" },
                variables: vec![
                    Variable::new("P", "Pile load", "kN"),
                    Variable::new("x, y", "Horizontal offsets from the load", "m"),
                ],
                assumptions: vec!["Stresses from both piles are superposed"],
                category: EquationCategory::ElasticSolutions,
                source_module: "equations/boussinesq.rs",
                source_function: "point_load_stresses",
            },

            Equation::InfluenceFactor => EquationMetadata {
                name: "Influence Factor",
                description: "Dimensionless influence factor relative to the roadbed centreline",
                formula_plain: "I = (1/(2*pi)) * (z/R^3) * (1 + z/R)",
                reference: CodeReference::ElasticTheory { source: "Boussinesq 1885" },
                variables: vec![],
                assumptions: vec![],
                category: EquationCategory::ElasticSolutions,
                source_module: "equations/boussinesq.rs",
                source_function: "influence_factor",
            },

            Equation::PileLengthCorrection => EquationMetadata {
                name: "Pile Length Correction",
                description: "Multiplier on raw settlement for pile length",
                formula_plain: "a = 0.985 - 0.00051 * L",
                reference: CodeReference::Empirical { basis: "FLAC3D calibration" },
                variables: vec![Variable::new("L", "Pile length", "m")],
                assumptions: vec![],
                category: EquationCategory::Corrections,
                source_module: "equations/correction.rs",
                source_function: "length_correction",
            },

            Equation::PileDiameterCorrection => EquationMetadata {
                name: "Pile Diameter Correction",
                description: "Multiplier on raw settlement for pile diameter",
                formula_plain: "b = 0.038 * D^2 - 0.206 * D + 1.159 (D < 2.5 m), else 1.0",
                reference: CodeReference::Empirical { basis: "FLAC3D calibration" },
                variables: vec![Variable::new("D", "Pile diameter", "m")],
                assumptions: vec!["Fit valid for D < 2.5 m"],
                category: EquationCategory::Corrections,
                source_module: "equations/correction.rs",
                source_function: "diameter_correction",
            },

            Equation::PileInteractionFactor => EquationMetadata {
                name: "Pile Interaction Factor",
                description: "Multiplier on superposed settlement of two neighbouring piles",
                formula_plain: "r = s/D_avg; r<=3: 0.8+0.2r/3; r<=6: 1.0-0.1(r-3)/3; else 0.9+0.1*min(1,(r-6)/4)",
                reference: CodeReference::Empirical { basis: "pile group interaction" },
                variables: vec![
                    Variable::new("s", "Pile spacing", "m"),
                    Variable::new("D_avg", "Mean pile diameter", "m"),
                ],
                assumptions: vec!["Clamped to [0.8, 1.2]"],
                category: EquationCategory::Corrections,
                source_module: "equations/correction.rs",
                source_function: "pile_interaction_factor",
            },

            Equation::JackingPushForce => EquationMetadata {
                name: "Jacking Push Force",
                description: "Total force required to advance the pipe string",
                formula_plain: "F = K * (pi*D*L*f + pi*Dt^2/4*P + n*mu*N)",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("K", "Safety factor", "-"),
                    Variable::new("f", "Unit skin friction", "kPa"),
                    Variable::new("P", "Face pressure", "kPa"),
                    Variable::new("n", "Joint count", "-"),
                ],
                assumptions: vec!["Joint friction only when n > 0"],
                category: EquationCategory::Jacking,
                source_module: "equations/jacking.rs",
                source_function: "total_push_force",
            },

            Equation::PipeAxialCapacity => EquationMetadata {
                name: "Pipe Axial Capacity",
                description: "Axial force the pipe wall can transmit",
                formula_plain: "C = ft * pi * (ro^2 - ri^2) * 1000 * reduction",
                reference: CodeReference::Mechanics,
                variables: vec![Variable::new("ft", "Design tensile strength", "MPa")],
                assumptions: vec!["C = 0 when the wall is as thick as the radius"],
                category: EquationCategory::Jacking,
                source_module: "equations/jacking.rs",
                source_function: "pipe_axial_capacity",
            },

            Equation::RankineCoefficients => EquationMetadata {
                name: "Rankine Coefficients",
                description: "Active and passive earth-pressure coefficients",
                formula_plain: "Ka = tan^2(45 - phi/2), Kp = tan^2(45 + phi/2)",
                reference: CodeReference::Mechanics,
                variables: vec![Variable::new("phi", "Internal friction angle", "deg")],
                assumptions: vec!["Vertical smooth wall, horizontal backfill"],
                category: EquationCategory::EarthPressure,
                source_module: "equations/earth_pressure.rs",
                source_function: "passive_coefficient",
            },

            Equation::GravityBackstop => EquationMetadata {
                name: "Gravity Backstop Resistance",
                description: "Net passive resistance of a gravity rear wall",
                formula_plain: "R = 0.5 * gamma * H^2 * (Kp - Ka) * B",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("H", "Wall height", "m"),
                    Variable::new("B", "Wall width", "m"),
                ],
                assumptions: vec![],
                category: EquationCategory::EarthPressure,
                source_module: "calculations/pipeline.rs",
                source_function: "Backstop::capacity_kn",
            },

            Equation::PileBackstop => EquationMetadata {
                name: "Pile Backstop Resistance",
                description: "Skin-friction resistance of a pile-supported rear wall",
                formula_plain: "R = pi * d * l * qs * n",
                reference: CodeReference::Mechanics,
                variables: vec![Variable::new("qs", "Unit skin friction", "kPa")],
                assumptions: vec![],
                category: EquationCategory::EarthPressure,
                source_module: "calculations/pipeline.rs",
                source_function: "Backstop::capacity_kn",
            },

            Equation::SheetPileBackstop => EquationMetadata {
                name: "Sheet Pile Backstop Resistance",
                description: "Passive resistance of an embedded sheet-pile rear wall",
                formula_plain: "R = 0.5 * gamma * t^2 * Kp * L",
                reference: CodeReference::Mechanics,
                variables: vec![Variable::new("t", "Embedment depth", "m")],
                assumptions: vec![],
                category: EquationCategory::EarthPressure,
                source_module: "calculations/pipeline.rs",
                source_function: "Backstop::capacity_kn",
            },

            Equation::PipeVerticalLoad => EquationMetadata {
                name: "Pipe Vertical Load",
                description: "Overburden plus standard-wheel live load on the pipe crown",
                formula_plain: "Pv = gamma * H, q = 260 / (0.2 * 0.6)",
                reference: CodeReference::Jtg { code: "D60", year: 2015, section: "4.3.1" },
                variables: vec![Variable::new("H", "Cover depth", "m")],
                assumptions: vec!["Live load uniformly distributed over the wheel contact area"],
                category: EquationCategory::PipeResponse,
                source_module: "road_standards.rs",
                source_function: "vehicle_live_load_pressure_kpa",
            },

            Equation::PipeHoopStress => EquationMetadata {
                name: "Pipe Hoop Stress",
                description: "Thin-wall ring stress from external pressure",
                formula_plain: "sigma = (Pv + q) * D / (2t)",
                reference: CodeReference::Mechanics,
                variables: vec![Variable::new("t", "Wall thickness", "m")],
                assumptions: vec!["Thin-walled ring"],
                category: EquationCategory::PipeResponse,
                source_module: "equations/jacking.rs",
                source_function: "hoop_stress_kpa",
            },

            Equation::PipeRingDeflection => EquationMetadata {
                name: "Pipe Ring Deflection",
                description: "Diametral deformation of a buried flexible ring",
                formula_plain: "S = (Pv + q) * D^4 / (3.67 * E * t^3 + 0.061 * E' * D^3)",
                reference: CodeReference::Empirical { basis: "modified Iowa formula" },
                variables: vec![
                    Variable::new("D, t", "Diameter and wall thickness", "mm"),
                    Variable::new("E'", "Soil reaction modulus", "MPa"),
                ],
                assumptions: vec!["Allowable deformation is 5 % of diameter"],
                category: EquationCategory::PipeResponse,
                source_module: "equations/jacking.rs",
                source_function: "ring_deflection_mm",
            },

            Equation::CorrectedBearingCapacity => EquationMetadata {
                name: "Corrected Bearing Capacity",
                description: "Characteristic bearing capacity corrected for width and depth",
                formula_plain: "fa = fak + eta_b * gamma * (b - 3) + eta_d * gamma * (d - 0.5)",
                reference: CodeReference::Gb { code: "50007", year: 2011, section: "5.2.4" },
                variables: vec![
                    Variable::new("fak", "Characteristic bearing capacity", "kPa"),
                    Variable::new("b", "Base width", "m"),
                    Variable::new("d", "Embedment depth", "m"),
                ],
                assumptions: vec!["(b - 3) and (d - 0.5) floored at zero"],
                category: EquationCategory::Bearing,
                source_module: "equations/foundation.rs",
                source_function: "corrected_bearing_capacity",
            },

            Equation::EccentricBasePressure => EquationMetadata {
                name: "Eccentric Base Pressure",
                description: "Maximum and minimum base pressure under axial load and moment",
                formula_plain: "p = (N + G)/A +/- M/W, M = H*h, W = l*b^2/6",
                reference: CodeReference::Gb { code: "50007", year: 2011, section: "5.2.2" },
                variables: vec![Variable::new("W", "Base section modulus", "m^3")],
                assumptions: vec!["Rigid base, linear pressure", "Reported minimum floored at 0"],
                category: EquationCategory::Bearing,
                source_module: "equations/foundation.rs",
                source_function: "base_pressure",
            },

            Equation::OverturningFactor => EquationMetadata {
                name: "Overturning Safety Factor",
                description: "Resisting moment over overturning moment about the base edge",
                formula_plain: "K = (N + G) * (b/2) / (H * h)",
                reference: CodeReference::Mechanics,
                variables: vec![Variable::new("h", "Force height", "m")],
                assumptions: vec!["K = infinity when H * h = 0"],
                category: EquationCategory::Stability,
                source_module: "equations/foundation.rs",
                source_function: "stability_factor",
            },

            Equation::SlidingFactor => EquationMetadata {
                name: "Sliding Safety Factor",
                description: "Base friction resistance over horizontal force",
                formula_plain: "K = (N + G) * mu / H",
                reference: CodeReference::Mechanics,
                variables: vec![Variable::new("mu", "Base-soil friction coefficient", "-")],
                assumptions: vec!["K = infinity when H = 0"],
                category: EquationCategory::Stability,
                source_module: "equations/foundation.rs",
                source_function: "stability_factor",
            },
        }
    }

    /// Get all equations in a given category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::BoussinesqSettlement,
    Equation::BoussinesqStresses,
    Equation::InfluenceFactor,
    Equation::PileLengthCorrection,
    Equation::PileDiameterCorrection,
    Equation::PileInteractionFactor,
    Equation::JackingPushForce,
    Equation::PipeAxialCapacity,
    Equation::RankineCoefficients,
    Equation::GravityBackstop,
    Equation::PileBackstop,
    Equation::SheetPileBackstop,
    Equation::PipeVerticalLoad,
    Equation::PipeHoopStress,
    Equation::PipeRingDeflection,
    Equation::CorrectedBearingCapacity,
    Equation::EccentricBasePressure,
    Equation::OverturningFactor,
    Equation::SlidingFactor,
];

/// Equations evaluated by a settlement analysis
pub fn settlement_equations() -> Vec<Equation> {
    vec![
        Equation::BoussinesqSettlement,
        Equation::BoussinesqStresses,
        Equation::InfluenceFactor,
        Equation::PileLengthCorrection,
        Equation::PileDiameterCorrection,
        Equation::PileInteractionFactor,
    ]
}

/// Equations evaluated by a pipe-jacking analysis with the given backstop
pub fn pipeline_equations(backstop: Equation) -> Vec<Equation> {
    let mut equations = vec![Equation::JackingPushForce, Equation::PipeAxialCapacity];
    if matches!(backstop, Equation::GravityBackstop | Equation::SheetPileBackstop) {
        equations.push(Equation::RankineCoefficients);
    }
    equations.push(backstop);
    equations.extend([
        Equation::PipeVerticalLoad,
        Equation::PipeHoopStress,
        Equation::PipeRingDeflection,
    ]);
    equations
}

/// Equations evaluated by a tower foundation analysis
pub fn tower_equations() -> Vec<Equation> {
    vec![
        Equation::CorrectedBearingCapacity,
        Equation::EccentricBasePressure,
        Equation::OverturningFactor,
        Equation::SlidingFactor,
    ]
}

/// Generate a markdown reference of every registered equation, grouped by
/// category.
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(16_000);
    output.push_str("# Equations Reference\n\n");
    output.push_str(
        "Every closed-form equation evaluated by impact_core, with its source and the function implementing it.\n\n",
    );

    let categories = EquationCategory::all();
    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }
        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();
            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** `{}` in `{}`\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }
            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!("Total equations: {}\n", ALL_EQUATIONS.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equations_have_metadata() {
        assert_eq!(ALL_EQUATIONS.len(), 19);
        for eq in ALL_EQUATIONS {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty(), "Equation {:?} has no name", eq);
            assert!(!meta.formula_plain.is_empty(), "Equation {:?} has no formula", eq);
            assert!(!meta.source_module.is_empty());
            assert!(!meta.source_function.is_empty());
        }
    }

    #[test]
    fn test_code_reference_citation() {
        let r = CodeReference::Gb { code: "50007", year: 2011, section: "5.2.4" };
        assert_eq!(r.citation(), "GB 50007-2011 5.2.4");
        assert_eq!(r.short_form(), "GB");
    }

    #[test]
    fn test_every_category_populated() {
        for category in EquationCategory::all() {
            assert!(!Equation::in_category(category).is_empty(), "{:?} empty", category);
        }
    }

    #[test]
    fn test_pipeline_equations_follow_backstop() {
        let pile = pipeline_equations(Equation::PileBackstop);
        assert!(!pile.contains(&Equation::RankineCoefficients));
        let gravity = pipeline_equations(Equation::GravityBackstop);
        assert!(gravity.contains(&Equation::RankineCoefficients));
    }

    #[test]
    fn test_generate_markdown() {
        let md = generate_equations_markdown();
        assert!(md.contains("## Elastic Solutions"));
        assert!(md.contains("Point Load Settlement"));
        assert!(md.contains("GB 50007-2011 5.2.4"));
    }
}
