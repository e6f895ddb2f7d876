//! # Spread Foundation Formulas
//!
//! Bearing capacity correction (GB 50007-2011 §5.2.4), eccentric base
//! pressure and rigid-body stability factors for a rectangular pad under a
//! vertical load and a horizontal force applied at height h.
//!
//! ## Notation
//!
//! - `N` = Tower vertical load (kN)
//! - `G` = Foundation self-weight (kN)
//! - `H` = Horizontal force (kN), acting at height `h` (m)
//! - `b` = Base width (m), the dimension in the direction of `H`
//! - `l` = Base length (m)
//! - `d` = Embedment depth (m)

/// Corrected bearing capacity fa = fak + ηb·γ·max(0, b−3) + ηd·γ·max(0, d−0.5)
pub fn corrected_bearing_capacity(
    fak_kpa: f64,
    width_factor: f64,
    depth_factor: f64,
    unit_weight_kn_m3: f64,
    width_m: f64,
    depth_m: f64,
) -> f64 {
    fak_kpa
        + width_factor * unit_weight_kn_m3 * (width_m - 3.0).max(0.0)
        + depth_factor * unit_weight_kn_m3 * (depth_m - 0.5).max(0.0)
}

/// Base pressures under eccentric load (kPa)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasePressure {
    pub average_kpa: f64,
    pub max_kpa: f64,
    /// Minimum, unfloored; negative means the base lifts off on one edge
    pub min_raw_kpa: f64,
}

/// Pmax,min = (N+G)/A ± M/W, with W = l·b²/6 and M = H·h
pub fn base_pressure(vertical_kn: f64, moment_knm: f64, width_m: f64, length_m: f64) -> BasePressure {
    let area = width_m * length_m;
    let section_modulus = length_m * width_m * width_m / 6.0;
    let average = vertical_kn / area;
    let flexural = moment_knm / section_modulus;
    BasePressure {
        average_kpa: average,
        max_kpa: average + flexural,
        min_raw_kpa: average - flexural,
    }
}

/// Resisting / acting ratio, +∞ when nothing acts
#[inline]
pub fn stability_factor(resisting: f64, acting: f64) -> f64 {
    if acting > 0.0 {
        resisting / acting
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_correction_for_small_shallow_base() {
        assert_eq!(corrected_bearing_capacity(150.0, 0.0, 1.0, 18.0, 2.0, 0.5), 150.0);
    }

    #[test]
    fn test_depth_correction() {
        // 150 + 1.0·18·(1.5−0.5) = 168
        assert_relative_eq!(corrected_bearing_capacity(150.0, 0.0, 1.0, 18.0, 2.0, 1.5), 168.0);
        // sand, b = 4: 200 + 2·19·1 + 3·19·1 = 295
        assert_relative_eq!(corrected_bearing_capacity(200.0, 2.0, 3.0, 19.0, 4.0, 1.5), 295.0);
    }

    #[test]
    fn test_base_pressure() {
        // N+G = 700, A = 6, W = 3·4/6 = 2, M = 750
        let p = base_pressure(700.0, 750.0, 2.0, 3.0);
        assert_relative_eq!(p.average_kpa, 116.6667, epsilon = 1e-4);
        assert_relative_eq!(p.max_kpa, 491.6667, epsilon = 1e-4);
        assert!(p.min_raw_kpa < 0.0);
    }

    #[test]
    fn test_stability_factor_infinite_when_unloaded() {
        assert!(stability_factor(700.0, 0.0).is_infinite());
        assert_relative_eq!(stability_factor(700.0, 750.0), 0.93333, epsilon = 1e-5);
    }
}
