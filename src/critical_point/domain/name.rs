//! Validated attribute name used as the critical point key.

use super::CriticalPointDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an attribute name, matching the `VARCHAR(255)` column.
const MAX_ATTRIBUTE_NAME_LENGTH: usize = 255;

/// Name of the telemetry attribute a critical point applies to.
///
/// Names are trimmed but otherwise kept verbatim, since they must match
/// attribute names from telemetry payloads exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeName(String);

impl AttributeName {
    /// Creates a validated attribute name.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalPointDomainError::EmptyAttributeName`] when the value
    /// is empty after trimming, or
    /// [`CriticalPointDomainError::AttributeNameTooLong`] when it exceeds 255
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, CriticalPointDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(CriticalPointDomainError::EmptyAttributeName);
        }

        if trimmed.chars().count() > MAX_ATTRIBUTE_NAME_LENGTH {
            return Err(CriticalPointDomainError::AttributeNameTooLong(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the attribute name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AttributeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
