//! # Boussinesq Point-Load Solutions
//!
//! Closed-form elastic half-space solutions for a vertical point load P acting
//! at the origin of the ground surface.
//!
//! ## Notation
//!
//! - `P` = Point load (kN)
//! - `x`, `y` = Horizontal offsets from the load (m)
//! - `z` = Depth below the surface, positive downward (m)
//! - `R` = √(x² + y² + z²) (m)
//! - `E` = Compression modulus of the soil (MPa)
//! - `ν` = Poisson's ratio
//! - `G` = Shear modulus E / (2(1+ν)) (MPa)
//!
//! ## Degenerate Geometry
//!
//! Every function returns exactly zero when R = 0 so that grid evaluation
//! never produces NaN or infinity.
//!
//! ## References
//!
//! - Boussinesq, J. (1885), *Application des potentiels*
//! - Poulos & Davis, *Elastic Solutions for Soil and Rock Mechanics*, Ch. 2

use std::f64::consts::PI;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::units::{Kilonewtons, Megapascals, Newtons, Pascals};

/// Stress components beneath a point load (kPa)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StressComponents {
    /// Vertical normal stress σz
    pub sigma_z_kpa: f64,
    /// Shear stress τxz
    pub tau_xz_kpa: f64,
    /// Shear stress τyz
    pub tau_yz_kpa: f64,
}

impl Add for StressComponents {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        StressComponents {
            sigma_z_kpa: self.sigma_z_kpa + rhs.sigma_z_kpa,
            tau_xz_kpa: self.tau_xz_kpa + rhs.tau_xz_kpa,
            tau_yz_kpa: self.tau_yz_kpa + rhs.tau_yz_kpa,
        }
    }
}

/// R = √(x² + y² + z²)
#[inline]
pub fn radial_distance(x: f64, y: f64, z: f64) -> f64 {
    (x * x + y * y + z * z).sqrt()
}

/// G = E / (2(1+ν)), in the units of `e`
#[inline]
pub fn shear_modulus(e: Megapascals, nu: f64) -> Megapascals {
    e / (2.0 * (1.0 + nu))
}

/// Surface-load vertical displacement at (x, y, z), in metres.
///
/// # Formula
/// ```text
/// ω = P / (4πG) · [ z²/R³ + 2(1−ν)/R ]
/// ```
/// with P in N and G in Pa.
pub fn point_load_settlement_m(load: Kilonewtons, x: f64, y: f64, z: f64, e: Megapascals, nu: f64) -> f64 {
    let r = radial_distance(x, y, z);
    if r == 0.0 {
        return 0.0;
    }
    let p: Newtons = load.into();
    let g: Pascals = shear_modulus(e, nu).into();
    p.value() / (4.0 * PI * g.value()) * (z * z / r.powi(3) + 2.0 * (1.0 - nu) / r)
}

/// Stress components at (x, y, z).
///
/// # Formulas
/// - σz = 3Pz³ / (2πR⁵)
/// - τxz = 3Pxz² / (2πR⁵)
/// - τyz = 3Pyz² / (2πR⁵)
pub fn point_load_stresses(load: Kilonewtons, x: f64, y: f64, z: f64) -> StressComponents {
    let r = radial_distance(x, y, z);
    if r == 0.0 {
        return StressComponents::default();
    }
    let k = 3.0 * load.value() / (2.0 * PI * r.powi(5));
    StressComponents {
        sigma_z_kpa: k * z.powi(3),
        tau_xz_kpa: k * x * z * z,
        tau_yz_kpa: k * y * z * z,
    }
}

/// Dimensionless influence factor I = (1/2π) · (z/R³) · (1 + z/R)
pub fn influence_factor(x: f64, y: f64, z: f64) -> f64 {
    let r = radial_distance(x, y, z);
    if r == 0.0 {
        return 0.0;
    }
    (1.0 / (2.0 * PI)) * (z / r.powi(3)) * (1.0 + z / r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance_is_zero() {
        let w = point_load_settlement_m(Kilonewtons(1000.0), 0.0, 0.0, 0.0, Megapascals(10.0), 0.35);
        assert_eq!(w, 0.0);
        assert_eq!(point_load_stresses(Kilonewtons(1000.0), 0.0, 0.0, 0.0), StressComponents::default());
        assert_eq!(influence_factor(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_settlement_directly_below() {
        // x = y = 0, z = 1: ω = P/(4πG)·(1 + 2(1−ν))
        // G = 10/(2·1.35) = 3.7037 MPa
        // ω = 1e6/(4π·3.7037e6)·(1 + 1.3) = 0.049418 m
        let w = point_load_settlement_m(Kilonewtons(1000.0), 0.0, 0.0, 1.0, Megapascals(10.0), 0.35);
        assert_relative_eq!(w, 0.049418, max_relative = 1e-4);
    }

    #[test]
    fn test_sigma_z_directly_below() {
        // σz = 3P/(2πz²) = 3·100/(2π·4) = 11.937 kPa
        let s = point_load_stresses(Kilonewtons(100.0), 0.0, 0.0, 2.0);
        assert_relative_eq!(s.sigma_z_kpa, 11.9366, max_relative = 1e-4);
        assert_eq!(s.tau_xz_kpa, 0.0);
        assert_eq!(s.tau_yz_kpa, 0.0);
    }

    #[test]
    fn test_shear_stress_antisymmetric_in_x() {
        let left = point_load_stresses(Kilonewtons(500.0), -3.0, 0.0, 2.0);
        let right = point_load_stresses(Kilonewtons(500.0), 3.0, 0.0, 2.0);
        assert_relative_eq!(left.tau_xz_kpa, -right.tau_xz_kpa);
        assert_relative_eq!(left.sigma_z_kpa, right.sigma_z_kpa);
    }

    #[test]
    fn test_influence_factor_below_load() {
        // z/R³ = 1, 1 + z/R = 2 → I = 1/π
        assert_relative_eq!(influence_factor(0.0, 0.0, 1.0), 1.0 / PI);
    }

    #[test]
    fn test_settlement_decays_with_offset() {
        let e = Megapascals(12.0);
        let near = point_load_settlement_m(Kilonewtons(800.0), 2.0, 0.0, 2.0, e, 0.3);
        let far = point_load_settlement_m(Kilonewtons(800.0), 8.0, 0.0, 2.0, e, 0.3);
        assert!(near > far);
        assert!(far > 0.0);
    }
}
