//! Typed attribute values carried by update records.

use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// The old or new value of an updated attribute.
///
/// A closed set of variants keeps type information without reflection. On
/// the wire each value is adjacently tagged, e.g.
/// `{"type": "float", "value": 607.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// Free text (names, enumerated modes).
    Text(String),
    /// Double precision number (setpoints, impedances, limits).
    Float(f64),
    /// Signed integer (tap positions, section counts).
    Integer(i64),
    /// Flag (switch open, regulation on).
    Boolean(bool),
    /// Reference to another network object.
    Reference(EntityId),
}

impl AttributeValue {
    /// Name of the value's type, as used in the serialized tag.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Float(_) => "float",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::Reference(_) => "reference",
        }
    }

    /// The value as a float, if it is one.
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl core::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Text(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Reference(v) => write!(f, "@{v}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<EntityId> for AttributeValue {
    fn from(v: EntityId) -> Self {
        Self::Reference(v)
    }
}
