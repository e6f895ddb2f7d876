//! # Physical Model Equations
//!
//! Closed-form equations evaluated by the three analysis domains. Keeping them
//! in one place lets each formula be checked against its source independently
//! of the orchestration that feeds it.
//!
//! ## Modules
//!
//! - [`boussinesq`] - Point-load settlement, stresses and influence factor
//! - [`correction`] - Empirical pile length/diameter corrections, pile interaction
//! - [`earth_pressure`] - Rankine coefficients for jacking backstops
//! - [`jacking`] - Push force, pipe capacity, buried pipe response
//! - [`foundation`] - Bearing capacity, base pressure, stability factors
//! - [`registry`] - Equation metadata for audit appendices
//!
//! ## Sign Conventions
//!
//! - **x**: Across the roadbed, centreline at 0, negative to the left
//! - **y**: Along the road, piles on the y = 0 section
//! - **z**: Depth below ground, positive downward
//! - **Loads**: Positive downward
//! - **Settlement**: Positive downward

pub mod boussinesq;
pub mod correction;
pub mod earth_pressure;
pub mod foundation;
pub mod jacking;
pub mod registry;

pub use boussinesq::{influence_factor, point_load_settlement_m, point_load_stresses, StressComponents};
pub use correction::{
    combined_correction, diameter_correction, length_correction, pile_interaction_factor, MAX_CORRECTED_PILE_LENGTH_M,
};
pub use earth_pressure::{active_coefficient, passive_coefficient};
pub use foundation::{base_pressure, corrected_bearing_capacity, stability_factor, BasePressure};
pub use registry::{
    generate_equations_markdown, pipeline_equations, settlement_equations, tower_equations, CodeReference, Equation,
    EquationCategory, EquationMetadata, Variable, ALL_EQUATIONS,
};
