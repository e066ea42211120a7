//! Projection of schema-less payloads into flat attribute triples.
//!
//! Each top-level attribute is classified as a scalar, a list, or a nested
//! mapping. Scalars become one text value. Lists follow a [`ListPolicy`]
//! chosen by the caller: direct ingestion keeps a list as one row holding its
//! literal form, bulk import explodes it into one row per element. Nested
//! mappings are rejected.
//!
//! Downstream filtering compares attribute values by exact string match, so
//! the text projection is fixed:
//!
//! - strings are used verbatim,
//! - numbers use their JSON decimal form (`8`, `16.5`),
//! - booleans become `True` and `False`,
//! - lists render as literals: `[8, 16]`, `['a', 'b']`, with `None` for null.

use super::{HostName, TelemetryDomainError, TelemetryPayload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Write as _;

/// How list-valued attributes are projected onto attribute rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListPolicy {
    /// The whole list becomes one row holding its literal text form.
    Serialize,
    /// Each list element becomes its own row under the same attribute name.
    Explode,
}

impl ListPolicy {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serialize => "serialize",
            Self::Explode => "explode",
        }
    }
}

/// One flattened `(host, attribute name, attribute value)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlatAttribute {
    /// Host the attribute belongs to.
    pub host: HostName,
    /// Attribute name taken from the payload key.
    pub name: String,
    /// Text projection of the attribute value.
    pub value: String,
}

impl FlatAttribute {
    /// Creates a flattened attribute triple.
    #[must_use]
    pub fn new(host: HostName, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            host,
            name: name.into(),
            value: value.into(),
        }
    }
}

enum AttributeShape<'a> {
    Absent,
    Scalar(String),
    List(&'a [Value]),
    Nested,
}

fn classify(value: &Value) -> AttributeShape<'_> {
    match value {
        Value::Null => AttributeShape::Absent,
        Value::Array(items) => AttributeShape::List(items),
        Value::Object(_) => AttributeShape::Nested,
        scalar => AttributeShape::Scalar(scalar_text(scalar)),
    }
}

/// Flattens a payload into attribute triples for `host`.
///
/// The `host` key of the payload is emitted like any other attribute.
/// Null-valued attributes produce no rows.
///
/// # Errors
///
/// Returns [`TelemetryDomainError::NestedValue`] when a top-level attribute
/// holds a nested mapping.
pub fn flatten(
    host: &HostName,
    payload: &TelemetryPayload,
    policy: ListPolicy,
) -> Result<Vec<FlatAttribute>, TelemetryDomainError> {
    let mut flattened = Vec::with_capacity(payload.len());

    for (name, value) in payload.attributes() {
        match classify(value) {
            AttributeShape::Absent => {}
            AttributeShape::Scalar(text) => {
                flattened.push(FlatAttribute::new(host.clone(), name, text));
            }
            AttributeShape::List(items) => match policy {
                ListPolicy::Serialize => {
                    flattened.push(FlatAttribute::new(host.clone(), name, list_literal(items)));
                }
                ListPolicy::Explode => flattened.extend(
                    items
                        .iter()
                        .map(|item| FlatAttribute::new(host.clone(), name, scalar_text(item))),
                ),
            },
            AttributeShape::Nested => {
                return Err(TelemetryDomainError::NestedValue {
                    attribute: name.clone(),
                });
            }
        }
    }

    Ok(flattened)
}

/// Returns the text projection used for a single value.
///
/// Strings are returned verbatim; every other value uses its literal form.
#[must_use]
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => {
            let mut rendered = String::new();
            write_literal(&mut rendered, other);
            rendered
        }
    }
}

fn list_literal(items: &[Value]) -> String {
    let mut rendered = String::new();
    write_list(&mut rendered, items);
    rendered
}

fn write_literal(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(number) => {
            // Writing into a `String` cannot fail.
            let _ignored = write!(out, "{number}");
        }
        Value::String(text) => write_quoted(out, text),
        Value::Array(items) => write_list(out, items),
        Value::Object(entries) => write_map(out, entries),
    }
}

fn write_list(out: &mut String, items: &[Value]) {
    out.push('[');
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        write_literal(out, item);
    }
    out.push(']');
}

fn write_map(out: &mut String, entries: &Map<String, Value>) {
    out.push('{');
    for (index, (key, item)) in entries.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        write_quoted(out, key);
        out.push_str(": ");
        write_literal(out, item);
    }
    out.push('}');
}

fn write_quoted(out: &mut String, text: &str) {
    out.push('\'');
    for character in text.chars() {
        match character {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            other => out.push(other),
        }
    }
    out.push('\'');
}
