//! # impact_core - Construction Impact Assessment Engine
//!
//! `impact_core` evaluates how construction next to a highway affects the
//! road: settlement of the roadbed from new pile foundations, pipe jacking
//! beneath it, and the stability of transmission tower foundations beside
//! it. Results are classified against JTG D30-2015 / JTG D60-2015 /
//! GB 50007-2011 and carry ordered engineering recommendations.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions from an immutable request to a result
//! - **JSON-First**: All requests and results implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, never partial results
//! - **Injected Tables**: Code limits and material data live in [`config::DesignTables`]
//!
//! ## Quick Start
//!
//! ```rust
//! use impact_core::calculations::tower::{calculate, TowerRequest};
//! use impact_core::materials::SoilType;
//!
//! let request = TowerRequest {
//!     label: "T-14".to_string(),
//!     tower_load_kn: 500.0,
//!     horizontal_force_kn: 50.0,
//!     force_height_m: 15.0,
//!     base_weight_kn: 200.0,
//!     base_width_m: 2.0,
//!     base_length_m: 3.0,
//!     embedment_depth_m: 1.5,
//!     soil: SoilType::Clay,
//! };
//! let result = calculate(&request).unwrap();
//!
//! // Serialize to JSON for reports or transmission
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Settlement, pipe-jacking and tower analyses
//! - [`equations`] - Closed-form physical models and their registry
//! - [`assessment`] - Safety levels and recommendation rules
//! - [`road_standards`] - Road classifications and code constants
//! - [`config`] - Design tables
//! - [`materials`] - Pipe material and soil reference data
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod assessment;
pub mod calculations;
pub mod config;
pub mod equations;
pub mod errors;
pub mod materials;
pub mod road_standards;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use assessment::SafetyLevel;
pub use calculations::{CalculationItem, CalculationOutput};
pub use config::DesignTables;
pub use errors::{CalcError, CalcResult};
pub use road_standards::RoadClassification;
