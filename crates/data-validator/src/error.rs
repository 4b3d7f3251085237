//! Validation Error Types

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors during payload validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value below the allowed minimum
    #[error("{field} value {value} must be >= {min}")]
    OutOfRange {
        field: &'static str,
        value: Decimal,
        min: Decimal,
    },

    /// Value of the wrong type or not a recognized variant
    #[error("{field}: {reason}")]
    InvalidFormat { field: &'static str, reason: String },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. } => field,
            ValidationError::InvalidFormat { field, .. } => field,
            ValidationError::MissingField(field) => field,
        }
    }
}
