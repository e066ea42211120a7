//! Critical point aggregate and its threshold values.

use super::{AttributeName, CriticalPointDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Threshold values attached to a critical point.
///
/// Every threshold is optional. Thresholds are stored only; nothing in this
/// crate evaluates telemetry against them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Thresholds {
    /// Lower bound.
    pub min_value: Option<f64>,
    /// Upper bound.
    pub max_value: Option<f64>,
    /// Exact expected value.
    pub exact_value: Option<f64>,
}

impl Thresholds {
    /// Creates an empty threshold set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_value: None,
            max_value: None,
            exact_value: None,
        }
    }

    /// Sets the lower bound.
    #[must_use]
    pub const fn with_min(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub const fn with_max(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }

    /// Sets the exact expected value.
    #[must_use]
    pub const fn with_exact(mut self, value: f64) -> Self {
        self.exact_value = Some(value);
        self
    }

    /// Checks that every threshold is finite and that `min <= max`.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalPointDomainError::NonFiniteThreshold`] or
    /// [`CriticalPointDomainError::InvertedRange`].
    pub fn validate(&self) -> Result<(), CriticalPointDomainError> {
        ensure_finite("min_value", self.min_value)?;
        ensure_finite("max_value", self.max_value)?;
        ensure_finite("exact_value", self.exact_value)?;

        if let (Some(min), Some(max)) = (self.min_value, self.max_value)
            && min > max
        {
            return Err(CriticalPointDomainError::InvertedRange { min, max });
        }
        Ok(())
    }
}

fn ensure_finite(field: &'static str, value: Option<f64>) -> Result<(), CriticalPointDomainError> {
    match value {
        Some(number) if !number.is_finite() => Err(CriticalPointDomainError::NonFiniteThreshold {
            field,
            value: number,
        }),
        _ => Ok(()),
    }
}

/// Partial update of a critical point's thresholds.
///
/// The outer `Option` tells whether a field was supplied; the inner `Option`
/// is the new value, where `None` clears the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CriticalPointPatch {
    /// Replacement lower bound, when supplied.
    pub min_value: Option<Option<f64>>,
    /// Replacement upper bound, when supplied.
    pub max_value: Option<Option<f64>>,
    /// Replacement exact value, when supplied.
    pub exact_value: Option<Option<f64>>,
}

impl CriticalPointPatch {
    /// Creates a patch that changes nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_value: None,
            max_value: None,
            exact_value: None,
        }
    }

    /// Supplies a new lower bound (`None` clears it).
    #[must_use]
    pub const fn set_min(mut self, value: Option<f64>) -> Self {
        self.min_value = Some(value);
        self
    }

    /// Supplies a new upper bound (`None` clears it).
    #[must_use]
    pub const fn set_max(mut self, value: Option<f64>) -> Self {
        self.max_value = Some(value);
        self
    }

    /// Supplies a new exact value (`None` clears it).
    #[must_use]
    pub const fn set_exact(mut self, value: Option<f64>) -> Self {
        self.exact_value = Some(value);
        self
    }

    /// Returns `thresholds` with the supplied fields overwritten.
    #[must_use]
    pub fn apply_to(&self, thresholds: Thresholds) -> Thresholds {
        Thresholds {
            min_value: self.min_value.unwrap_or(thresholds.min_value),
            max_value: self.max_value.unwrap_or(thresholds.max_value),
            exact_value: self.exact_value.unwrap_or(thresholds.exact_value),
        }
    }
}

/// Named threshold definition for one telemetry attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPoint {
    attribute_name: AttributeName,
    thresholds: Thresholds,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted critical point.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedCriticalPointData {
    /// Persisted attribute name.
    pub attribute_name: AttributeName,
    /// Persisted thresholds.
    pub thresholds: Thresholds,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl CriticalPoint {
    /// Creates a critical point stamped with the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalPointDomainError`] when the thresholds are invalid.
    pub fn new(
        attribute_name: AttributeName,
        thresholds: Thresholds,
        clock: &impl Clock,
    ) -> Result<Self, CriticalPointDomainError> {
        thresholds.validate()?;
        Ok(Self {
            attribute_name,
            thresholds,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a critical point from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCriticalPointData) -> Self {
        Self {
            attribute_name: data.attribute_name,
            thresholds: data.thresholds,
            created_at: data.created_at,
        }
    }

    /// Overwrites the thresholds supplied in `patch`, leaving the others
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalPointDomainError`] when the patched thresholds are
    /// invalid; the critical point is left unchanged in that case.
    pub fn apply_patch(&mut self, patch: &CriticalPointPatch) -> Result<(), CriticalPointDomainError> {
        let patched = patch.apply_to(self.thresholds);
        patched.validate()?;
        self.thresholds = patched;
        Ok(())
    }

    /// Returns the attribute name.
    #[must_use]
    pub const fn attribute_name(&self) -> &AttributeName {
        &self.attribute_name
    }

    /// Returns the thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Returns the lower bound.
    #[must_use]
    pub const fn min_value(&self) -> Option<f64> {
        self.thresholds.min_value
    }

    /// Returns the upper bound.
    #[must_use]
    pub const fn max_value(&self) -> Option<f64> {
        self.thresholds.max_value
    }

    /// Returns the exact expected value.
    #[must_use]
    pub const fn exact_value(&self) -> Option<f64> {
        self.thresholds.exact_value
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
