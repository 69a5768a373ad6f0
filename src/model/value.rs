//! Field value type for resources and concepts.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Concept, RelationshipRef};

/// A typed field value.
///
/// Covers every primitive a resource field can hold, plus the two
/// structured kinds:
/// - Scalars: String, Double, Integer, Long, DateTime, Boolean
/// - Enumeration symbols: Enum
/// - Structured: Concept (nested, no identity), Relationship (unresolved reference)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    String(String),
    Double(f64),
    Integer(i32),
    Long(i64),
    DateTime(DateTime<Utc>),
    Boolean(bool),
    Enum(String),
    Concept(Box<Concept>),
    Relationship(RelationshipRef),
}

// ============================================================================
// Type checking
// ============================================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Double(_) => "Double",
            Value::Integer(_) => "Integer",
            Value::Long(_) => "Long",
            Value::DateTime(_) => "DateTime",
            Value::Boolean(_) => "Boolean",
            Value::Enum(_) => "Enum",
            Value::Concept(_) => "Concept",
            Value::Relationship(_) => "Relationship",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Double(_) | Value::Integer(_) | Value::Long(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(f) => Some(*f),
            Value::Integer(i) => Some(f64::from(*i)),
            Value::Long(l) => Some(*l as f64),
            _ => None,
        }
    }

    /// Integral value, for Integer and Long only.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(i64::from(*i)),
            Value::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_concept(&self) -> Option<&Concept> {
        match self {
            Value::Concept(c) => Some(c),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Boolean(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Integer(v) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Long(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Double(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl From<DateTime<Utc>> for Value { fn from(v: DateTime<Utc>) -> Self { Value::DateTime(v) } }
impl From<Concept> for Value { fn from(v: Concept) -> Self { Value::Concept(Box::new(v)) } }
impl From<RelationshipRef> for Value { fn from(v: RelationshipRef) -> Self { Value::Relationship(v) } }

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Value::Double(v) => write!(f, "{v}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Long(l) => write!(f, "{l}"),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Enum(sym) => write!(f, "{sym}"),
            Value::Concept(c) => write!(f, "{c}"),
            Value::Relationship(r) => write!(f, "{r}"),
        }
    }
}

// ============================================================================
// Comparison (loose query semantics)
// ============================================================================

impl Value {
    /// Query equality. Returns `None` when the two kinds cannot be compared,
    /// which the executor treats as "does not match".
    pub fn loose_eq(&self, other: &Value) -> Option<bool> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a == b),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a == b),
            (Value::Enum(a), Value::Enum(b)) => Some(a == b),
            (Value::Enum(a), Value::String(b)) | (Value::String(b), Value::Enum(a)) => Some(a == b),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a == b),
            (Value::DateTime(a), Value::String(s)) | (Value::String(s), Value::DateTime(a)) => {
                parse_instant(s).map(|b| *a == b)
            }
            (Value::Relationship(a), Value::Relationship(b)) => Some(a == b),
            (Value::Relationship(a), Value::String(s)) | (Value::String(s), Value::Relationship(a)) => {
                Some(a.to_uri() == *s)
            }
            (Value::Concept(a), Value::Concept(b)) => Some(a == b),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                Some(numeric_cmp(a, b) == Some(Ordering::Equal))
            }
            _ => None,
        }
    }

    /// Query ordering, defined for numbers, strings and date-times.
    pub fn loose_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::String(s)) => parse_instant(s).map(|b| a.cmp(&b)),
            (Value::String(s), Value::DateTime(b)) => parse_instant(s).map(|a| a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => numeric_cmp(a, b),
            _ => None,
        }
    }
}

fn numeric_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    // Exact for integral pairs; f64 otherwise.
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc))
}
