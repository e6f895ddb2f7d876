//! # Error Types
//!
//! Structured error types for impact_core. Validation failures are the only
//! failure channel of the engine: a calculation either returns a complete
//! result bundle or one of these errors, never a partial result.
//!
//! ## Example
//!
//! ```rust
//! use impact_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(width_m: f64) -> CalcResult<()> {
//!     if width_m <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "roadbed.width_m".to_string(),
//!             value: width_m.to_string(),
//!             reason: "Roadbed width must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for impact_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// Each variant carries enough context for a caller to show the message
/// verbatim and point the user at the offending field.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-finite, malformed)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing from a request bundle
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material or soil not present in the injected design tables
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Design tables are inconsistent (e.g. limits out of order)
    #[error("Invalid configuration in {table}: {reason}")]
    InvalidConfiguration { table: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Finite inputs whose magnitude overflows an intermediate result
    #[error("Non-finite result for '{quantity}': inputs are too large to evaluate")]
    NonFiniteResult { quantity: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create an InvalidConfiguration error
    pub fn invalid_configuration(table: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidConfiguration {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create a NonFiniteResult error
    pub fn non_finite_result(quantity: impl Into<String>) -> Self {
        CalcError::NonFiniteResult {
            quantity: quantity.into(),
        }
    }

    /// Map a serde_json error, recognising serde's "missing field" message so
    /// that absent keys surface as [`CalcError::MissingField`].
    pub fn from_json_error(err: &serde_json::Error) -> Self {
        let message = err.to_string();
        if let Some(rest) = message.strip_prefix("missing field `") {
            if let Some(end) = rest.find('`') {
                return CalcError::missing_field(&rest[..end]);
            }
        }
        CalcError::SerializationError { reason: message }
    }

    /// True for errors caused by the caller's input (as opposed to tables)
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::MissingField { .. } | CalcError::NonFiniteResult { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::NonFiniteResult { .. } => "NON_FINITE_RESULT",
        }
    }
}

/// Reject NaN and infinities before any range check.
pub(crate) fn require_finite(field: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Value must be a finite number"))
    }
}

/// Reject a computed value that overflowed to infinity or NaN.
pub(crate) fn require_finite_result(quantity: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::non_finite_result(quantity))
    }
}

/// Require `value > 0`.
pub(crate) fn require_positive(field: &str, value: f64, reason: &str) -> CalcResult<()> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), reason));
    }
    Ok(())
}

/// Require `value >= 0`.
pub(crate) fn require_non_negative(field: &str, value: f64, reason: &str) -> CalcResult<()> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), reason));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("pile1.diameter_m", "-1", "Pile diameter must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::material_not_found("Peat").error_code(), "MATERIAL_NOT_FOUND");
        assert_eq!(
            CalcError::invalid_configuration("settlement_limits", "x").error_code(),
            "INVALID_CONFIGURATION"
        );
    }

    #[test]
    fn test_missing_field_mapping() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Roadbed {
            width_m: f64,
        }
        let err = serde_json::from_str::<Roadbed>("{}").unwrap_err();
        assert_eq!(CalcError::from_json_error(&err), CalcError::missing_field("width_m"));
    }

    #[test]
    fn test_numeric_guards() {
        assert!(require_positive("x", 0.0, "must be positive").is_err());
        assert!(require_positive("x", f64::NAN, "must be positive").is_err());
        assert!(require_non_negative("x", 0.0, "cannot be negative").is_ok());
        assert!(require_non_negative("x", -0.1, "cannot be negative").unwrap_err().is_validation_error());
    }

    #[test]
    fn test_non_finite_result_guard() {
        assert_eq!(require_finite_result("sigma_z_kpa", 12.5), Ok(12.5));
        let err = require_finite_result("total_settlement_m", f64::INFINITY).unwrap_err();
        assert_eq!(err, CalcError::non_finite_result("total_settlement_m"));
        assert_eq!(err.error_code(), "NON_FINITE_RESULT");
        assert!(err.is_validation_error());
        assert!(require_finite_result("sigma_z_kpa", f64::NAN).is_err());
    }
}
