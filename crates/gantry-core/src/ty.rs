//! Static type tags for signatures
//!
//! Every field, parameter, and return position in the hosted runtime
//! carries a `Ty`. Object types name the class by its slash-separated
//! path; strings are a value type of their own rather than a class.

use std::fmt;

use crate::value::Value;

/// Type tag for a field, parameter, or return position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    /// Boolean primitive
    Bool,
    /// 32-bit signed integer primitive
    Int,
    /// 64-bit signed integer primitive
    Long,
    /// 32-bit IEEE 754 primitive
    Float,
    /// 64-bit IEEE 754 primitive
    Double,
    /// String value
    Str,
    /// Object reference, named by class path (e.g. `test/Example`)
    Object(String),
    /// No value (return positions only)
    Void,
}

impl Ty {
    /// Convenience constructor for object types
    pub fn object(path: impl Into<String>) -> Self {
        Ty::Object(path.into())
    }

    /// The zero value a freshly allocated field of this type holds
    /// before any constructor runs.
    pub fn default_value(&self) -> Value {
        match self {
            Ty::Bool => Value::bool(false),
            Ty::Int => Value::int(0),
            Ty::Long => Value::long(0),
            Ty::Float => Value::float(0.0),
            Ty::Double => Value::double(0.0),
            Ty::Str | Ty::Object(_) | Ty::Void => Value::null(),
        }
    }

    /// Check whether this tag denotes a reference type (object or string)
    pub fn is_reference(&self) -> bool {
        matches!(self, Ty::Str | Ty::Object(_))
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Bool => write!(f, "bool"),
            Ty::Int => write!(f, "int"),
            Ty::Long => write!(f, "long"),
            Ty::Float => write!(f, "float"),
            Ty::Double => write!(f, "double"),
            Ty::Str => write!(f, "string"),
            Ty::Object(path) => write!(f, "{}", path),
            Ty::Void => write!(f, "void"),
        }
    }
}
