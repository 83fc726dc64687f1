//! Parameter error types.
//!
//! These errors mean the caller's input is at fault. They are reported
//! once, before any search starts.

use super::OptimizeType;

/// A search parameter failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    /// Some, but not all, of the three triangle factors were given
    #[error("all three triangle factors must be set if any of them is")]
    UnderspecifiedTriangle,

    /// Triangle factors were given with a non-triangle objective
    #[error("triangle factors require optimize=TRIANGLE, got {0}")]
    TriangleOptimizeTypeMismatch(OptimizeType),

    /// Triangle factors do not sum to one
    #[error("triangle factors must sum to 1, got {sum}")]
    TriangleNotAffine { sum: f64 },

    /// optimize=TRIANGLE without any factors
    #[error("optimize=TRIANGLE requires triangle factors")]
    TriangleValuesNotSet,

    /// A single triangle factor lies outside 0..1
    #[error("{field} must be within 0..1, got {value}")]
    TriangleFactorOutOfRange { field: &'static str, value: f64 },

    /// A required parameter is absent
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// A parameter could not be parsed
    #[error("invalid {field} '{value}': {reason}")]
    Malformed {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl ParameterError {
    /// Build a `Malformed` error from any displayable parse failure.
    pub fn malformed(field: &'static str, value: &str, reason: impl ToString) -> Self {
        ParameterError::Malformed {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
