//! # Rankine Earth Pressure
//!
//! Active and passive earth-pressure coefficients for a vertical wall with a
//! horizontal backfill and no wall friction.

/// Active coefficient Ka = tan²(45° − φ/2)
#[inline]
pub fn active_coefficient(friction_angle_deg: f64) -> f64 {
    (45.0 - friction_angle_deg / 2.0).to_radians().tan().powi(2)
}

/// Passive coefficient Kp = tan²(45° + φ/2)
#[inline]
pub fn passive_coefficient(friction_angle_deg: f64) -> f64 {
    (45.0 + friction_angle_deg / 2.0).to_radians().tan().powi(2)
}

/// Resultant of a triangular pressure distribution 0.5·γ·H²·K (kN per m of wall)
#[inline]
pub fn triangular_resultant(unit_weight_kn_m3: f64, height_m: f64, coefficient: f64) -> f64 {
    0.5 * unit_weight_kn_m3 * height_m * height_m * coefficient
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_phi_30() {
        assert_relative_eq!(active_coefficient(30.0), 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(passive_coefficient(30.0), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_coefficients_are_reciprocal() {
        for phi in [10.0, 15.0, 20.0, 35.0] {
            assert_relative_eq!(active_coefficient(phi) * passive_coefficient(phi), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_triangular_resultant() {
        // 0.5 · 18 · 3² · 3 = 243
        assert_relative_eq!(triangular_resultant(18.0, 3.0, 3.0), 243.0);
    }
}
