//! # Property Tables
//!
//! Material and soil definitions used as lookup defaults by the pipe-jacking
//! and tower-foundation domains. The settlement domain takes its soil
//! parameters directly from the request's layer stack.
//!
//! ## Example
//!
//! ```rust
//! use impact_core::materials::{PipeMaterial, SoilType};
//!
//! let material = PipeMaterial::from_str_flexible("hdpe").unwrap();
//! assert_eq!(material, PipeMaterial::Hdpe);
//!
//! let soil = SoilType::from_str_flexible("sand").unwrap();
//! println!("{}", soil);
//! ```

pub mod pipe;
pub mod soil;

pub use pipe::{standard_pipe_materials, PipeMaterial, PipeMaterialProperties};
pub use soil::{
    standard_foundation_soils, standard_jacking_soils, FoundationSoilProperties, JackingSoilProperties,
    SoilType,
};
