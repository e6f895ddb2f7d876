//! Settlement safety classification.
//!
//! The maximum settlement is compared against the selected road
//! classification's limits with strict greater-than, strictest first:
//!
//! | max settlement          | level   |
//! |-------------------------|---------|
//! | ≤ approach              | safe    |
//! | > approach, ≤ bridge    | warning |
//! | > bridge, ≤ general     | danger  |
//! | > general               | danger (severe) |
//!
//! Recommendations come from the ordered rule lists below; the first list is
//! evaluated in full and falls back to the "safe" messages when nothing fires.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assessment::{collect_rules, evaluate_rules, RecommendationRule, SafetyLevel};
use crate::road_standards::{
    RoadClassification, SettlementLimits, INFLUENCE_THRESHOLD_MM, WIDESPREAD_EXCEEDANCE_FRACTION,
};

use super::SettlementPoint;

/// Fraction by which the centre mean may exceed the edge mean before the
/// result is flagged
pub const CENTRE_EDGE_TOLERANCE: f64 = 0.2;

/// Point counts per exceedance tier (cumulative)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExceedanceCounts {
    /// Points above the 5 mm influence threshold
    pub influence_points: usize,
    /// Points above the approach limit
    pub warning_points: usize,
    /// Points above the bridge limit
    pub danger_points: usize,
}

/// Exclusive partition of the sample points by tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SafetyStatistics {
    pub safe_points: usize,
    pub influence_points: usize,
    pub warning_points: usize,
    pub danger_points: usize,
}

/// Pass/fail against each limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compliance {
    pub meets_general: bool,
    pub meets_bridge: bool,
    pub meets_approach: bool,
    /// Same as `meets_approach`, the strictest limit
    pub overall: bool,
}

/// Safety assessment of a settlement field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyAssessment {
    pub level: SafetyLevel,
    /// Max settlement above the general limit
    pub severe: bool,
    /// Display colour of `level`
    pub color: String,
    pub classification: RoadClassification,
    /// True when the classification label was not recognised
    pub classification_used_fallback: bool,
    /// Limits used for classification
    pub limits: SettlementLimits,
    pub max_settlement_mm: f64,
    pub exceeds_approach: bool,
    pub exceeds_bridge: bool,
    pub exceeds_general: bool,
    pub counts: ExceedanceCounts,
    pub safety_statistics: SafetyStatistics,
    pub compliance: Compliance,
    /// π·r², r = largest planar distance of a point above 5 mm (m²)
    pub influence_area_m2: f64,
    pub recommendations: Vec<String>,
    pub technical_recommendations: Vec<String>,
}

impl SafetyAssessment {
    /// True when no limit is exceeded
    pub fn passes(&self) -> bool {
        self.compliance.overall
    }
}

/// Centre-versus-edge self-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsCheck {
    /// False when the centre mean exceeds the edge mean by more than 20 %
    pub centre_vs_edge_consistent: bool,
    /// Mean settlement of points with |x| ≤ span/4 (m)
    pub centre_mean_settlement_m: Option<f64>,
    /// Mean settlement of points with |x| > span/4 (m)
    pub edge_mean_settlement_m: Option<f64>,
    pub warnings: Vec<String>,
}

struct TierContext {
    max_mm: f64,
    limits: SettlementLimits,
    danger_fraction: f64,
}

impl TierContext {
    fn above_general(&self) -> bool {
        self.max_mm > self.limits.general_limit_mm
    }
    fn above_bridge(&self) -> bool {
        self.max_mm > self.limits.bridge_limit_mm
    }
    fn above_approach(&self) -> bool {
        self.max_mm > self.limits.approach_limit_mm
    }
}

const SAFE_RECOMMENDATIONS: [&str; 3] = [
    "Settlement meets the code requirements; the works are safe",
    "Proceed with the current design",
    "Keep up settlement observation during construction",
];

type Rule = RecommendationRule<TierContext>;

fn recommendation_rules() -> Vec<Rule> {
    vec![
        // Severe: above the general limit
        Rule::new(
            |c| c.above_general(),
            |c| {
                format!(
                    "Settlement of {:.1} mm severely exceeds the {} mm code limit; the works pose a major safety hazard",
                    c.max_mm, c.limits.general_limit_mm
                )
            },
        ),
        Rule::new(
            |c| c.above_general(),
            |_| "Stop work immediately and redesign the pile foundation system".to_string(),
        ),
        Rule::new(
            |c| c.above_general(),
            |_| "Add piles, enlarge the pile diameter or adopt a composite foundation".to_string(),
        ),
        Rule::new(
            |c| c.above_general(),
            |_| "Verify the redesign with a three-dimensional numerical analysis".to_string(),
        ),
        // Danger: above the bridge limit only
        Rule::new(
            |c| c.above_bridge() && !c.above_general(),
            |c| {
                format!(
                    "Settlement of {:.1} mm exceeds the {} mm bridge works limit; redesign is required",
                    c.max_mm, c.limits.bridge_limit_mm
                )
            },
        ),
        Rule::new(
            |c| c.above_bridge() && !c.above_general(),
            |_| "Optimise the pile design parameters or apply reinforcement measures".to_string(),
        ),
        Rule::new(
            |c| c.above_bridge() && !c.above_general(),
            |_| "Consider prestressed pipe piles or a piled raft foundation".to_string(),
        ),
        // Warning: above the approach limit only
        Rule::new(
            |c| c.above_approach() && !c.above_bridge(),
            |c| {
                format!(
                    "Settlement of {:.1} mm exceeds the {} mm bridge approach limit; a special design is required",
                    c.max_mm, c.limits.approach_limit_mm
                )
            },
        ),
        Rule::new(
            |c| c.above_approach() && !c.above_bridge(),
            |_| "Provide a transition section at the bridge head to reduce differential settlement".to_string(),
        ),
        Rule::new(
            |c| c.above_approach() && !c.above_bridge(),
            |_| "Strengthen construction monitoring to control settlement development".to_string(),
        ),
        // Detail for anything above the bridge limit
        Rule::new(
            |c| c.above_bridge(),
            |_| "Check pile bearing capacity and deformation".to_string(),
        ),
        Rule::new(
            |c| c.above_bridge(),
            |_| "Consider PHC prestressed pipe piles or steel pipe piles".to_string(),
        ),
        Rule::new(
            |c| c.above_bridge(),
            |_| "Assess whether ground improvement is necessary".to_string(),
        ),
        Rule::new(
            |c| c.danger_fraction > WIDESPREAD_EXCEEDANCE_FRACTION,
            |_| "Exceedance is widespread; redesign the foundation scheme as a whole".to_string(),
        ),
    ]
}

fn technical_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            |c| c.above_approach(),
            |_| "Install a bridge approach slab to reduce vehicle bump".to_string(),
        ),
        Rule::new(
            |c| c.above_approach(),
            |_| "Use lightweight fill to reduce the additional load".to_string(),
        ),
        Rule::new(
            |c| c.above_approach(),
            |_| "Build in layers and stages to control the settlement rate".to_string(),
        ),
    ]
}

/// Classify a maximum settlement (mm) against a limit row.
pub fn classify(max_settlement_mm: f64, limits: &SettlementLimits) -> SafetyLevel {
    if max_settlement_mm > limits.bridge_limit_mm {
        SafetyLevel::Danger
    } else if max_settlement_mm > limits.approach_limit_mm {
        SafetyLevel::Warning
    } else {
        SafetyLevel::Safe
    }
}

/// Assess the settlement field. `points` must be non-empty.
pub fn assess(
    points: &[SettlementPoint],
    limits: SettlementLimits,
    classification_used_fallback: bool,
) -> SafetyAssessment {
    let max_mm = points.iter().map(|p| p.settlement_mm).fold(f64::NEG_INFINITY, f64::max);

    let mut counts = ExceedanceCounts::default();
    let mut stats = SafetyStatistics::default();
    let mut influence_radius: Option<f64> = None;
    for point in points {
        let s = point.settlement_mm;
        if s > INFLUENCE_THRESHOLD_MM {
            counts.influence_points += 1;
            let r = (point.x * point.x + point.y * point.y).sqrt();
            influence_radius = Some(influence_radius.map_or(r, |m| m.max(r)));
        }
        if s > limits.approach_limit_mm {
            counts.warning_points += 1;
        }
        if s > limits.bridge_limit_mm {
            counts.danger_points += 1;
        }

        if s > limits.bridge_limit_mm {
            stats.danger_points += 1;
        } else if s > limits.approach_limit_mm {
            stats.warning_points += 1;
        } else if s > INFLUENCE_THRESHOLD_MM {
            stats.influence_points += 1;
        } else {
            stats.safe_points += 1;
        }
    }

    let context = TierContext {
        max_mm,
        limits,
        danger_fraction: counts.danger_points as f64 / points.len() as f64,
    };
    let recommendations = evaluate_rules(&recommendation_rules(), &context, &SAFE_RECOMMENDATIONS);
    let technical_recommendations = collect_rules(&technical_rules(), &context);

    let level = classify(max_mm, &limits);
    let compliance = Compliance {
        meets_general: max_mm <= limits.general_limit_mm,
        meets_bridge: max_mm <= limits.bridge_limit_mm,
        meets_approach: max_mm <= limits.approach_limit_mm,
        overall: max_mm <= limits.approach_limit_mm,
    };

    SafetyAssessment {
        level,
        severe: context.above_general(),
        color: level.color().to_string(),
        classification: limits.classification,
        classification_used_fallback,
        limits,
        max_settlement_mm: max_mm,
        exceeds_approach: context.above_approach(),
        exceeds_bridge: context.above_bridge(),
        exceeds_general: context.above_general(),
        counts,
        safety_statistics: stats,
        compliance,
        influence_area_m2: influence_radius.map_or(0.0, |r| std::f64::consts::PI * r * r),
        recommendations,
        technical_recommendations,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Flag a centre mean settlement more than 20 % above the edge mean.
///
/// Both piles sit outside the roadbed, so settlement should not peak at the
/// centreline.
pub fn check_physics(points: &[SettlementPoint], analysis_span_m: f64) -> PhysicsCheck {
    let band = analysis_span_m / 4.0;
    let centre: Vec<f64> = points
        .iter()
        .filter(|p| p.x.abs() <= band)
        .map(|p| p.total_settlement_m)
        .collect();
    let edge: Vec<f64> = points
        .iter()
        .filter(|p| p.x.abs() > band)
        .map(|p| p.total_settlement_m)
        .collect();

    let centre_mean = mean(&centre);
    let edge_mean = mean(&edge);
    let mut check = PhysicsCheck {
        centre_vs_edge_consistent: true,
        centre_mean_settlement_m: centre_mean,
        edge_mean_settlement_m: edge_mean,
        warnings: Vec::new(),
    };

    if let (Some(c), Some(e)) = (centre_mean, edge_mean) {
        if c > e * (1.0 + CENTRE_EDGE_TOLERANCE) {
            check.centre_vs_edge_consistent = false;
            let message = format!(
                "Mean centreline settlement ({:.3} m) exceeds mean edge settlement ({:.3} m); \
                 inconsistent with piles outside the roadbed",
                c, e
            );
            warn!(centre_m = c, edge_m = e, "settlement physics check failed");
            check.warnings.push(message);
        }
    }
    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::settlement::soil::LocalSoil;
    use crate::equations::StressComponents;
    use crate::road_standards::standard_settlement_limits;

    fn first_class() -> SettlementLimits {
        standard_settlement_limits()[1]
    }

    fn point(x: f64, mm: f64) -> SettlementPoint {
        SettlementPoint {
            id: "W".to_string(),
            x,
            y: 0.0,
            z: 1.0,
            pile1_distance_m: 1.0,
            pile2_distance_m: 1.0,
            pile1_settlement_m: mm / 2000.0,
            pile2_settlement_m: mm / 2000.0,
            total_settlement_m: mm / 1000.0,
            settlement_mm: mm,
            interaction_factor: 1.0,
            stresses: StressComponents::default(),
            influence_factor: 0.0,
            soil: LocalSoil {
                name: "clay".to_string(),
                compression_modulus_mpa: 10.0,
                poisson_ratio: 0.35,
                used_fallback: false,
            },
        }
    }

    #[test]
    fn test_limit_equal_is_not_exceeding() {
        let limits = first_class();
        assert_eq!(classify(100.0, &limits), SafetyLevel::Safe);
        assert_eq!(classify(100.0001, &limits), SafetyLevel::Warning);
        assert_eq!(classify(200.0, &limits), SafetyLevel::Warning);
        assert_eq!(classify(200.5, &limits), SafetyLevel::Danger);
    }

    #[test]
    fn test_safe_field() {
        let points = vec![point(-6.0, 2.0), point(6.0, 8.0)];
        let a = assess(&points, first_class(), false);
        assert_eq!(a.level, SafetyLevel::Safe);
        assert_eq!(a.recommendations.len(), 3);
        assert!(a.technical_recommendations.is_empty());
        assert_eq!(a.counts.influence_points, 1);
        // r = 6 → π·36
        assert!((a.influence_area_m2 - std::f64::consts::PI * 36.0).abs() < 1e-9);
        assert!(a.passes());
    }

    #[test]
    fn test_no_influence_gives_zero_area() {
        let a = assess(&[point(-6.0, 1.0), point(6.0, 4.9)], first_class(), false);
        assert_eq!(a.influence_area_m2, 0.0);
        assert_eq!(a.safety_statistics.safe_points, 2);
    }

    #[test]
    fn test_warning_tier() {
        let a = assess(&[point(-6.0, 150.0), point(6.0, 20.0)], first_class(), false);
        assert_eq!(a.level, SafetyLevel::Warning);
        assert!(a.recommendations[0].contains("bridge approach limit"));
        assert_eq!(a.recommendations.len(), 3);
        assert_eq!(a.technical_recommendations.len(), 3);
        assert!(!a.compliance.overall);
        assert!(a.compliance.meets_bridge);
    }

    #[test]
    fn test_severe_tier_with_widespread_exceedance() {
        let a = assess(&[point(-6.0, 350.0), point(6.0, 250.0)], first_class(), false);
        assert_eq!(a.level, SafetyLevel::Danger);
        assert!(a.severe);
        // 4 severe + 3 detail + 1 widespread
        assert_eq!(a.recommendations.len(), 8);
        assert!(a.recommendations.last().unwrap().contains("widespread"));
        assert_eq!(a.color, "red");
    }

    #[test]
    fn test_statistics_partition() {
        let points = vec![point(-6.0, 1.0), point(-2.0, 50.0), point(2.0, 150.0), point(6.0, 250.0)];
        let a = assess(&points, first_class(), true);
        let s = a.safety_statistics;
        assert_eq!((s.safe_points, s.influence_points, s.warning_points, s.danger_points), (1, 1, 1, 1));
        assert_eq!(a.counts.influence_points, 3);
        assert_eq!(a.counts.warning_points, 2);
        assert_eq!(a.counts.danger_points, 1);
        assert!(a.classification_used_fallback);
    }

    #[test]
    fn test_physics_check_flags_centre_peak() {
        let points = vec![point(-6.0, 10.0), point(-2.0, 30.0), point(2.0, 30.0), point(6.0, 10.0)];
        let check = check_physics(&points, 20.0);
        assert!(!check.centre_vs_edge_consistent);
        assert_eq!(check.warnings.len(), 1);

        let points = vec![point(-6.0, 30.0), point(-2.0, 10.0), point(2.0, 10.0), point(6.0, 30.0)];
        assert!(check_physics(&points, 20.0).centre_vs_edge_consistent);
    }
}
