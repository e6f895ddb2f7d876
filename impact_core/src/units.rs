//! # Unit Types
//!
//! Type-safe wrappers for the SI units the engine converts between. These
//! are plain f64 newtypes so JSON stays clean (just numbers).
//!
//! ## SI Units
//!
//! Request and result fields carry their unit in the field name
//! (`diameter_m`, `load_kn`, `compression_modulus_mpa`). The wrappers below
//! are used where a formula needs a different base unit than its inputs:
//! - Length: metres (m), millimetres (mm)
//! - Force: kilonewtons (kN), newtons (N)
//! - Stress / modulus: megapascals (MPa), kilopascals (kPa), pascals (Pa)
//!
//! ## Example
//!
//! ```rust
//! use impact_core::units::{Kilonewtons, Meters, Millimeters, Newtons};
//!
//! let settlement = Meters(0.0125);
//! let settlement_mm: Millimeters = settlement.into();
//! assert!((settlement_mm.0 - 12.5).abs() < 1e-12);
//!
//! let load: Newtons = Kilonewtons(1.5).into();
//! assert_eq!(load.0, 1500.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilonewtons(pub f64);

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

impl From<Kilonewtons> for Newtons {
    fn from(kn: Kilonewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

impl From<Newtons> for Kilonewtons {
    fn from(n: Newtons) -> Self {
        Kilonewtons(n.0 / 1000.0)
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress or modulus in megapascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megapascals(pub f64);

/// Stress in kilopascals (kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilopascals(pub f64);

/// Stress in pascals (N/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

impl From<Megapascals> for Pascals {
    fn from(mpa: Megapascals) -> Self {
        Pascals(mpa.0 * 1e6)
    }
}

impl From<Megapascals> for Kilopascals {
    fn from(mpa: Megapascals) -> Self {
        Kilopascals(mpa.0 * 1000.0)
    }
}

impl From<Kilopascals> for Megapascals {
    fn from(kpa: Kilopascals) -> Self {
        Megapascals(kpa.0 / 1000.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Kilonewtons);
impl_arithmetic!(Newtons);
impl_arithmetic!(Megapascals);
impl_arithmetic!(Kilopascals);
impl_arithmetic!(Pascals);
