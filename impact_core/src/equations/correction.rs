//! # Empirical Pile Corrections
//!
//! Multipliers applied to the raw Boussinesq settlement of a pile load,
//! calibrated against numerical simulation of bored piles, plus the
//! interaction factor for two neighbouring piles.
//!
//! All functions are pure functions of geometry.

/// Diameter at and above which the diameter correction is 1.0 (m)
pub const DIAMETER_CORRECTION_CUTOFF_M: f64 = 2.5;

/// Interaction factor bounds
pub const INTERACTION_FACTOR_MIN: f64 = 0.8;
pub const INTERACTION_FACTOR_MAX: f64 = 1.2;

/// Length at which the length correction reaches zero (m); longer piles
/// would reverse the sign of the corrected settlement
pub const MAX_CORRECTED_PILE_LENGTH_M: f64 = 0.985 / 0.00051;

/// Pile length correction a = 0.985 − 0.00051·L
#[inline]
pub fn length_correction(length_m: f64) -> f64 {
    0.985 - 0.00051 * length_m
}

/// Pile diameter correction.
///
/// - b = 0.038·D² − 0.206·D + 1.159 for D < 2.5 m
/// - b = 1.0 otherwise
///
/// The quadratic has its minimum at D = 0.206/0.076 ≈ 2.71 m, so over the
/// applicable range it decreases monotonically.
#[inline]
pub fn diameter_correction(diameter_m: f64) -> f64 {
    if diameter_m < DIAMETER_CORRECTION_CUTOFF_M {
        0.038 * diameter_m * diameter_m - 0.206 * diameter_m + 1.159
    } else {
        1.0
    }
}

/// Combined correction a·b
#[inline]
pub fn combined_correction(length_m: f64, diameter_m: f64) -> f64 {
    length_correction(length_m) * diameter_correction(diameter_m)
}

/// Interaction factor from the spacing / average-diameter ratio.
///
/// ```text
/// ratio ≤ 3:      0.8 + 0.2·(ratio/3)
/// 3 < ratio ≤ 6:  1.0 − 0.1·((ratio−3)/3)
/// ratio > 6:      0.9 + 0.1·min(1, (ratio−6)/4)
/// ```
/// clamped to [0.8, 1.2].
pub fn pile_interaction_factor(spacing_m: f64, diameter1_m: f64, diameter2_m: f64) -> f64 {
    let avg_diameter = (diameter1_m + diameter2_m) / 2.0;
    let ratio = spacing_m / avg_diameter;

    let factor = if ratio <= 3.0 {
        0.8 + 0.2 * (ratio / 3.0)
    } else if ratio <= 6.0 {
        1.0 - 0.1 * ((ratio - 3.0) / 3.0)
    } else {
        0.9 + 0.1 * ((ratio - 6.0) / 4.0).min(1.0)
    };
    factor.clamp(INTERACTION_FACTOR_MIN, INTERACTION_FACTOR_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_length_correction_values() {
        assert_relative_eq!(length_correction(20.0), 0.9748, epsilon = 1e-12);
        assert_relative_eq!(length_correction(25.0), 0.97225, epsilon = 1e-12);
    }

    #[test]
    fn test_diameter_correction_values() {
        // 0.038 − 0.206 + 1.159 = 0.991
        assert_relative_eq!(diameter_correction(1.0), 0.991, epsilon = 1e-12);
        // 0.038·1.44 − 0.206·1.2 + 1.159 = 0.96092
        assert_relative_eq!(diameter_correction(1.2), 0.96092, epsilon = 1e-12);
        assert_eq!(diameter_correction(2.5), 1.0);
        assert_eq!(diameter_correction(3.0), 1.0);
    }

    #[test]
    fn test_interaction_branches() {
        // ratio 3 → 1.0, ratio 6 → 0.9, ratio ≥ 10 → 1.0
        assert_relative_eq!(pile_interaction_factor(3.0, 1.0, 1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pile_interaction_factor(6.0, 1.0, 1.0), 0.9, epsilon = 1e-12);
        assert_relative_eq!(pile_interaction_factor(8.0, 1.0, 1.0), 0.95, epsilon = 1e-12);
        assert_relative_eq!(pile_interaction_factor(40.0, 1.0, 1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pile_interaction_factor(0.0, 1.0, 1.0), 0.8, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn length_correction_strictly_decreasing(a in 0.1f64..200.0, delta in 0.01f64..50.0) {
            prop_assert!(length_correction(a + delta) < length_correction(a));
        }

        #[test]
        fn diameter_correction_decreasing_below_cutoff(d in 0.05f64..2.4) {
            prop_assert!(diameter_correction(d + 0.05) < diameter_correction(d));
        }

        #[test]
        fn interaction_factor_in_bounds(spacing in 0.0f64..500.0, d1 in 0.1f64..5.0, d2 in 0.1f64..5.0) {
            let f = pile_interaction_factor(spacing, d1, d2);
            prop_assert!((INTERACTION_FACTOR_MIN..=INTERACTION_FACTOR_MAX).contains(&f));
        }
    }
}
