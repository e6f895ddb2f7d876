//! # Pipe-Jacking Formulas
//!
//! Push-force, pipe-capacity and buried-pipe deformation formulas.
//!
//! ## Notation
//!
//! - `D` = Pipe outer diameter (m)
//! - `Dt` = Tool-head diameter (m)
//! - `L` = Jacking length (m)
//! - `f` = Unit skin friction (kPa)
//! - `P` = Face pressure at the tool head (kPa)
//! - `n`, `μ`, `N` = Joint count, joint friction coefficient, joint normal force (kN)
//! - `K` = Push-force safety factor
//! - `t` = Wall thickness (m)
//!
//! Forces are in kN, pressures in kPa unless a suffix says otherwise.

use std::f64::consts::PI;

use crate::units::{Kilopascals, Megapascals, Meters, Millimeters};

/// Skin friction F₁ = π·D·L·f
#[inline]
pub fn skin_friction_resistance(diameter_m: f64, length_m: f64, unit_friction_kpa: f64) -> f64 {
    PI * diameter_m * length_m * unit_friction_kpa
}

/// Face resistance F₂ = (π·Dt²/4)·P
#[inline]
pub fn face_resistance(tool_diameter_m: f64, face_pressure_kpa: f64) -> f64 {
    PI * tool_diameter_m * tool_diameter_m / 4.0 * face_pressure_kpa
}

/// Joint friction F₃ = n·μ·N, exactly zero when there are no joints
#[inline]
pub fn joint_friction_resistance(joint_count: u32, friction_coefficient: f64, normal_force_kn: f64) -> f64 {
    if joint_count > 0 {
        joint_count as f64 * friction_coefficient * normal_force_kn
    } else {
        0.0
    }
}

/// Total push force F = K·(F₁ + F₂ + F₃)
#[inline]
pub fn total_push_force(safety_factor: f64, friction: f64, face: f64, joints: f64) -> f64 {
    safety_factor * (friction + face + joints)
}

/// Axial capacity of the pipe wall = ft·π(ro² − ri²)·1000·reduction (kN).
///
/// Returns 0 when the wall is at least as thick as the radius.
pub fn pipe_axial_capacity(
    diameter_m: f64,
    wall_thickness_m: f64,
    tensile_strength: Megapascals,
    reduction_factor: f64,
) -> f64 {
    let outer_radius = diameter_m / 2.0;
    let inner_radius = outer_radius - wall_thickness_m;
    if inner_radius <= 0.0 {
        return 0.0;
    }
    let area_m2 = PI * (outer_radius * outer_radius - inner_radius * inner_radius);
    let strength: Kilopascals = tensile_strength.into();
    strength.value() * area_m2 * reduction_factor
}

/// Hoop stress σ = (Pv + q)·D / (2t) (kPa)
#[inline]
pub fn hoop_stress_kpa(total_pressure_kpa: f64, diameter_m: f64, wall_thickness_m: f64) -> f64 {
    total_pressure_kpa * diameter_m / (2.0 * wall_thickness_m)
}

/// Ring deflection S = (Pv + q)·D⁴ / (3.67·E·t³ + 0.061·E′·D³) (mm).
///
/// D and t enter in millimetres; E and E′ in MPa. Returns 0 for a
/// non-positive denominator.
pub fn ring_deflection_mm(
    total_pressure_kpa: f64,
    diameter: Meters,
    wall_thickness: Meters,
    pipe_modulus: Megapascals,
    soil_modulus: Megapascals,
) -> f64 {
    let d_mm: Millimeters = diameter.into();
    let t_mm: Millimeters = wall_thickness.into();
    let numerator = total_pressure_kpa * d_mm.value().powi(4);
    let denominator =
        3.67 * pipe_modulus.value() * t_mm.value().powi(3) + 0.061 * soil_modulus.value() * d_mm.value().powi(3);
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_push_force() {
        // F1 = π·1·100·5 = 1570.80, F2 = π·1.44/4·100 = 113.10
        let f1 = skin_friction_resistance(1.0, 100.0, 5.0);
        let f2 = face_resistance(1.2, 100.0);
        assert_relative_eq!(f1, 1570.796, epsilon = 1e-3);
        assert_relative_eq!(f2, 113.097, epsilon = 1e-3);
        assert_relative_eq!(total_push_force(1.5, f1, f2, 0.0), 2525.84, epsilon = 1e-2);
    }

    #[test]
    fn test_no_joints_is_exactly_zero() {
        assert_eq!(joint_friction_resistance(0, 0.2, 100.0), 0.0);
        assert_relative_eq!(joint_friction_resistance(10, 0.2, 100.0), 200.0, epsilon = 1e-12);
    }

    #[test]
    fn test_capacity() {
        // ro = 0.5, ri = 0.4 → A = π·0.09 = 0.28274 m²
        // 2.01·1000·0.28274·0.85 = 483.07 kN
        let cap = pipe_axial_capacity(1.0, 0.1, Megapascals(2.01), 0.85);
        assert_relative_eq!(cap, 483.07, epsilon = 1e-2);
        assert_eq!(pipe_axial_capacity(1.0, 0.5, Megapascals(2.01), 0.85), 0.0);
    }

    #[test]
    fn test_deflection() {
        // (2216.67)·1e12 / (3.67·30000·1e6 + 0.061·10·1e9)
        let s = ring_deflection_mm(2216.6667, Meters(1.0), Meters(0.1), Megapascals(30000.0), Megapascals(10.0));
        assert_relative_eq!(s, 2216.6667e12 / (1.101e11 + 6.1e8), max_relative = 1e-9);
    }
}
