//! Error types for critical point domain validation.

use thiserror::Error;

/// Errors returned while constructing critical point domain values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CriticalPointDomainError {
    /// The attribute name is empty after trimming.
    #[error("attribute name must not be empty")]
    EmptyAttributeName,

    /// The attribute name exceeds the 255-character storage limit.
    #[error("attribute name exceeds 255 character limit: {0}")]
    AttributeNameTooLong(String),

    /// A threshold is NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NonFiniteThreshold {
        /// Threshold field name.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// The minimum threshold is greater than the maximum threshold.
    #[error("min_value {min} is greater than max_value {max}")]
    InvertedRange {
        /// Minimum threshold.
        min: f64,
        /// Maximum threshold.
        max: f64,
    },
}
