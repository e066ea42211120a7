//! Schema-less telemetry payload submitted for a single host.

use super::{HostName, TelemetryDomainError, scalar_text};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute key that names the host a payload describes.
pub const HOST_ATTRIBUTE: &str = "host";

/// One telemetry submission: a mapping from attribute name to value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelemetryPayload(Map<String, Value>);

impl TelemetryPayload {
    /// Wraps an attribute mapping.
    #[must_use]
    pub const fn new(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }

    /// Builds a payload from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryDomainError::PayloadNotObject`] when the value is
    /// not a JSON object, and [`TelemetryDomainError::HostNameTooLong`] when
    /// its host does not fit a host name.
    pub fn from_value(value: Value) -> Result<Self, TelemetryDomainError> {
        match value {
            Value::Object(attributes) => {
                let payload = Self(attributes);
                payload.host()?;
                Ok(payload)
            }
            other => Err(TelemetryDomainError::PayloadNotObject(json_kind(&other))),
        }
    }

    /// Resolves the host this payload describes.
    ///
    /// String hosts are used verbatim and other scalars use their text
    /// projection. Missing, null, or blank hosts resolve to
    /// [`HostName::unknown`].
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryDomainError::HostNameTooLong`] when the host is
    /// longer than a host name may be.
    pub fn host(&self) -> Result<HostName, TelemetryDomainError> {
        let text = match self.0.get(HOST_ATTRIBUTE) {
            None | Some(Value::Null) => return Ok(HostName::unknown()),
            Some(value) => scalar_text(value),
        };
        match HostName::new(text) {
            Err(TelemetryDomainError::EmptyHostName) => Ok(HostName::unknown()),
            resolved => resolved,
        }
    }

    /// Returns the attribute mapping.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the number of top-level attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the payload has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the payload back into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for TelemetryPayload {
    fn from(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }
}

impl TryFrom<Value> for TelemetryPayload {
    type Error = TelemetryDomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
