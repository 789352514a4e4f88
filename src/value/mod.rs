//! Type coercion between document values and record fields
//!
//! Each supported in-memory type implements [`FieldValue`], which knows its
//! [`FieldShape`] and how to move between itself and a `serde_yml::Value`.
//! Collection element types implement [`Scalar`].
//!
//! Numeric loads narrow with plain `as` casts: a document `70000` read into an
//! `i16` field wraps and a double read into an `f32` loses precision. Existing
//! configuration files rely on this, so narrowing is never reported as an
//! error.

use serde_yml::Value;
use std::fmt;

mod collection;
mod host;
mod scalar;

pub use host::Host;

/// The scalar element types the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Short,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    String,
    /// Opaque host type stored as an arbitrary structured value
    Host,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Short => "Short",
            ScalarKind::Integer => "Integer",
            ScalarKind::Long => "Long",
            ScalarKind::Float => "Float",
            ScalarKind::Double => "Double",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::String => "String",
            ScalarKind::Host => "Host",
        };
        f.write_str(name)
    }
}

/// Declared shape of a registered option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    Scalar(ScalarKind),
    Array(ScalarKind, usize),
    List(ScalarKind),
    Set(ScalarKind),
    /// A field that may be left unset
    Optional(Box<FieldShape>),
}

impl FieldShape {
    /// Check the shape against the coercion matrix.
    ///
    /// The type system already rules out nested collections; what remains are
    /// collections of host values and doubly optional fields.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            FieldShape::Scalar(_) => Ok(()),
            FieldShape::Array(ScalarKind::Host, _)
            | FieldShape::List(ScalarKind::Host)
            | FieldShape::Set(ScalarKind::Host) => {
                Err("collections of host values are not supported".to_string())
            }
            FieldShape::Array(..) | FieldShape::List(_) | FieldShape::Set(_) => Ok(()),
            FieldShape::Optional(inner) => match inner.as_ref() {
                FieldShape::Optional(_) => Err("nested optional fields are not supported".to_string()),
                other => other.validate(),
            },
        }
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldShape::Scalar(kind) => write!(f, "{kind}"),
            FieldShape::Array(kind, len) => write!(f, "{kind}[{len}]"),
            FieldShape::List(kind) => write!(f, "List<{kind}>"),
            FieldShape::Set(kind) => write!(f, "Set<{kind}>"),
            FieldShape::Optional(inner) => write!(f, "Option<{inner}>"),
        }
    }
}

/// Failure converting a single value. The engine attaches the option path.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionError {
    Mismatch { expected: String, found: String },
    Encode(String),
}

impl CoercionError {
    pub(crate) fn mismatch(expected: impl fmt::Display, found: &Value) -> Self {
        CoercionError::Mismatch {
            expected: expected.to_string(),
            found: describe(found),
        }
    }
}

/// Element types allowed inside arrays, lists and sets.
pub trait Scalar: Sized + Clone {
    const KIND: ScalarKind;

    fn to_scalar(&self) -> Result<Value, CoercionError>;

    fn from_scalar(node: &Value) -> Result<Self, CoercionError>;
}

/// A type that can back a registered option.
pub trait FieldValue: Sized {
    fn shape() -> FieldShape;

    /// Encode for saving. `None` means the field is unset and is left out.
    fn to_node(&self) -> Result<Option<Value>, CoercionError>;

    fn from_node(node: &Value) -> Result<Self, CoercionError>;

    /// Whether the field currently holds no value. A field unset in the
    /// record's default is required.
    fn is_unset(&self) -> bool {
        false
    }
}

/// Short human description of a document value for error messages.
pub fn describe(node: &Value) -> String {
    match node {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) if n.is_f64() => format!("float {n}"),
        Value::Number(n) => format!("integer {n}"),
        Value::String(s) => format!("string \"{s}\""),
        Value::Sequence(items) => format!("sequence of {} items", items.len()),
        Value::Mapping(_) => "mapping".to_string(),
        Value::Tagged(_) => "tagged value".to_string(),
    }
}
