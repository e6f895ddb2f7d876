//! Soil layer stack.
//!
//! Layers are listed top-down, start at the ground surface and follow each
//! other without gaps or overlaps (0.1 m tolerance). A sample point takes the
//! parameters of the first layer whose depth range contains it; points below
//! the stack take the deepest layer and are flagged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{require_finite, require_positive, CalcError, CalcResult};

/// Gap or overlap allowed between consecutive layers (m)
pub const LAYER_CONTIGUITY_TOLERANCE_M: f64 = 0.1;

/// Depth interval of a layer (m).
///
/// Deserializes from either `{"start_m": 0, "end_m": 5}` or the textual form
/// `"0-5"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DepthRangeRepr")]
pub struct DepthRange {
    pub start_m: f64,
    pub end_m: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DepthRangeRepr {
    Text(String),
    Bounds { start_m: f64, end_m: f64 },
}

impl TryFrom<DepthRangeRepr> for DepthRange {
    type Error = CalcError;

    fn try_from(repr: DepthRangeRepr) -> Result<Self, Self::Error> {
        match repr {
            DepthRangeRepr::Text(text) => text.parse(),
            DepthRangeRepr::Bounds { start_m, end_m } => DepthRange::new(start_m, end_m),
        }
    }
}

impl DepthRange {
    /// Create a validated range
    pub fn new(start_m: f64, end_m: f64) -> CalcResult<Self> {
        let range = DepthRange { start_m, end_m };
        range.validate("depth_range")?;
        Ok(range)
    }

    pub fn validate(&self, field: &str) -> CalcResult<()> {
        require_finite(field, self.start_m)?;
        require_finite(field, self.end_m)?;
        if self.start_m < 0.0 {
            return Err(CalcError::invalid_input(
                field,
                self.to_string(),
                "Depth range cannot start above the ground surface",
            ));
        }
        if self.start_m >= self.end_m {
            return Err(CalcError::invalid_input(
                field,
                self.to_string(),
                "Depth range start must be less than its end",
            ));
        }
        Ok(())
    }

    /// Layer thickness (m)
    pub fn thickness(&self) -> f64 {
        self.end_m - self.start_m
    }

    /// Inclusive containment
    pub fn contains(&self, depth_m: f64) -> bool {
        self.start_m <= depth_m && depth_m <= self.end_m
    }
}

impl FromStr for DepthRange {
    type Err = CalcError;

    /// Parse `"start-end"`, e.g. `"0-5"` or `"5.5-10"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CalcError::invalid_input("depth_range", s, "Expected a depth range such as \"0-5\"");
        let (start, end) = s.trim().split_once('-').ok_or_else(malformed)?;
        let start_m: f64 = start.trim().parse().map_err(|_| malformed())?;
        let end_m: f64 = end.trim().parse().map_err(|_| malformed())?;
        DepthRange::new(start_m, end_m)
    }
}

impl fmt::Display for DepthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_m, self.end_m)
    }
}

/// One soil layer of the settlement model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    pub depth_range: DepthRange,
    /// Layer name (e.g., "Silty clay")
    pub name: String,
    /// Compression modulus Es (MPa)
    pub compression_modulus_mpa: f64,
    /// Poisson's ratio, strictly inside (−1, 0.5)
    pub poisson_ratio: f64,
}

impl SoilLayer {
    pub fn new(depth_range: DepthRange, name: impl Into<String>, compression_modulus_mpa: f64, poisson_ratio: f64) -> Self {
        SoilLayer {
            depth_range,
            name: name.into(),
            compression_modulus_mpa,
            poisson_ratio,
        }
    }

    fn validate(&self, index: usize) -> CalcResult<()> {
        self.depth_range.validate(&format!("soil_layers[{}].depth_range", index))?;
        require_positive(
            &format!("soil_layers[{}].compression_modulus_mpa", index),
            self.compression_modulus_mpa,
            "Compression modulus must be positive",
        )?;
        let field = format!("soil_layers[{}].poisson_ratio", index);
        require_finite(&field, self.poisson_ratio)?;
        if self.poisson_ratio <= -1.0 || self.poisson_ratio >= 0.5 {
            return Err(CalcError::invalid_input(
                field,
                self.poisson_ratio.to_string(),
                "Poisson's ratio must be in (-1, 0.5)",
            ));
        }
        Ok(())
    }
}

/// Validate each layer and the contiguity of the stack.
pub fn validate_layers(layers: &[SoilLayer]) -> CalcResult<()> {
    if layers.is_empty() {
        return Err(CalcError::invalid_input("soil_layers", "[]", "At least one soil layer is required"));
    }
    for (i, layer) in layers.iter().enumerate() {
        layer.validate(i)?;
    }

    let first = &layers[0].depth_range;
    if first.start_m > LAYER_CONTIGUITY_TOLERANCE_M {
        return Err(CalcError::invalid_input(
            "soil_layers[0].depth_range",
            first.to_string(),
            "The first layer must start at the ground surface",
        ));
    }
    for (i, pair) in layers.windows(2).enumerate() {
        let (upper, lower) = (&pair[0].depth_range, &pair[1].depth_range);
        if (lower.start_m - upper.end_m).abs() > LAYER_CONTIGUITY_TOLERANCE_M {
            return Err(CalcError::invalid_input(
                format!("soil_layers[{}].depth_range", i + 1),
                lower.to_string(),
                format!(
                    "Layer must start where the layer above ends ({} m)",
                    upper.end_m
                ),
            ));
        }
    }
    Ok(())
}

/// Soil parameters used at one sample point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalSoil {
    pub name: String,
    pub compression_modulus_mpa: f64,
    pub poisson_ratio: f64,
    /// True when no layer contains the depth and the deepest layer was used
    pub used_fallback: bool,
}

/// Soil at `depth_m`; falls back to the last layer below the stack.
///
/// `layers` must be non-empty (see [`validate_layers`]).
pub fn soil_at_depth(layers: &[SoilLayer], depth_m: f64) -> CalcResult<LocalSoil> {
    let (layer, used_fallback) = match layers.iter().find(|l| l.depth_range.contains(depth_m)) {
        Some(layer) => (layer, false),
        None => {
            let last = layers
                .last()
                .ok_or_else(|| CalcError::invalid_input("soil_layers", "[]", "At least one soil layer is required"))?;
            (last, true)
        }
    };
    Ok(LocalSoil {
        name: layer.name.clone(),
        compression_modulus_mpa: layer.compression_modulus_mpa,
        poisson_ratio: layer.poisson_ratio,
        used_fallback,
    })
}

/// Thickness-weighted average soil parameters over the whole stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquivalentSoil {
    pub compression_modulus_mpa: f64,
    pub poisson_ratio: f64,
    pub total_thickness_m: f64,
}

/// Thickness-weighted E and ν.
pub fn equivalent_soil(layers: &[SoilLayer]) -> CalcResult<EquivalentSoil> {
    let total: f64 = layers.iter().map(|l| l.depth_range.thickness()).sum();
    if total <= 0.0 {
        return Err(CalcError::invalid_input(
            "soil_layers",
            total.to_string(),
            "Total soil thickness must be positive",
        ));
    }
    let weighted_e: f64 = layers
        .iter()
        .map(|l| l.compression_modulus_mpa * l.depth_range.thickness())
        .sum();
    let weighted_nu: f64 = layers.iter().map(|l| l.poisson_ratio * l.depth_range.thickness()).sum();
    Ok(EquivalentSoil {
        compression_modulus_mpa: weighted_e / total,
        poisson_ratio: weighted_nu / total,
        total_thickness_m: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn layer(start: f64, end: f64, e: f64, nu: f64) -> SoilLayer {
        SoilLayer::new(DepthRange { start_m: start, end_m: end }, "layer", e, nu)
    }

    #[test]
    fn test_parse_depth_range() {
        let r: DepthRange = "5.5-10".parse().unwrap();
        assert_eq!(r, DepthRange { start_m: 5.5, end_m: 10.0 });
        assert_eq!(" 0 - 5 ".parse::<DepthRange>().unwrap().thickness(), 5.0);
    }

    #[test]
    fn test_parse_depth_range_rejects_malformed() {
        assert!("5".parse::<DepthRange>().is_err());
        assert!("a-b".parse::<DepthRange>().is_err());
        assert!("10-5".parse::<DepthRange>().is_err());
        assert!("5-5".parse::<DepthRange>().is_err());
    }

    #[test]
    fn test_depth_range_from_json_text_or_object() {
        let a: DepthRange = serde_json::from_str("\"0-5\"").unwrap();
        let b: DepthRange = serde_json::from_str(r#"{"start_m": 0.0, "end_m": 5.0}"#).unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<DepthRange>("\"7-3\"").is_err());
    }

    #[test]
    fn test_contiguous_stack_accepted() {
        let layers = vec![layer(0.0, 5.0, 10.0, 0.35), layer(5.05, 10.0, 15.0, 0.3)];
        assert!(validate_layers(&layers).is_ok());
    }

    #[test]
    fn test_gap_rejected() {
        let layers = vec![layer(0.0, 5.0, 10.0, 0.35), layer(6.0, 10.0, 15.0, 0.3)];
        let err = validate_layers(&layers).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "soil_layers[1].depth_range"));
    }

    #[test]
    fn test_first_layer_must_start_at_surface() {
        assert!(validate_layers(&[layer(1.0, 5.0, 10.0, 0.35)]).is_err());
    }

    #[test]
    fn test_empty_and_bad_poisson_rejected() {
        assert!(validate_layers(&[]).is_err());
        assert!(validate_layers(&[layer(0.0, 5.0, 10.0, 0.5)]).is_err());
        assert!(validate_layers(&[layer(0.0, 5.0, 0.0, 0.3)]).is_err());
    }

    #[test]
    fn test_soil_lookup_inclusive_and_fallback() {
        let layers = vec![layer(0.0, 2.0, 10.0, 0.35), layer(2.0, 3.0, 15.0, 0.3)];
        // z = 2 is in both; the first match wins
        let at_two = soil_at_depth(&layers, 2.0).unwrap();
        assert_eq!(at_two.compression_modulus_mpa, 10.0);
        assert!(!at_two.used_fallback);

        let below = soil_at_depth(&layers, 4.0).unwrap();
        assert_eq!(below.compression_modulus_mpa, 15.0);
        assert!(below.used_fallback);
    }

    #[test]
    fn test_equivalent_soil() {
        let layers = vec![layer(0.0, 5.0, 10.0, 0.35), layer(5.0, 10.0, 20.0, 0.25)];
        let eq = equivalent_soil(&layers).unwrap();
        assert_relative_eq!(eq.compression_modulus_mpa, 15.0, epsilon = 1e-12);
        assert_relative_eq!(eq.poisson_ratio, 0.30, epsilon = 1e-12);
        assert_relative_eq!(eq.total_thickness_m, 10.0);
    }
}
