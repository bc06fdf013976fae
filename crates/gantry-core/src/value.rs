//! Value representation for the hosted runtime
//!
//! Values are a tagged enum over the primitive universe plus strings and
//! object references. Primitives carry their exact width so that float
//! arithmetic performed by hosted code keeps IEEE 754 f32 semantics
//! distinct from f64.

use std::fmt;

use crate::object::ObjectRef;

/// A hosted runtime value.
#[derive(Clone)]
pub enum Value {
    /// Null reference
    Null,
    /// Boolean primitive
    Bool(bool),
    /// 32-bit signed integer primitive
    Int(i32),
    /// 64-bit signed integer primitive
    Long(i64),
    /// 32-bit IEEE 754 primitive
    Float(f32),
    /// 64-bit IEEE 754 primitive
    Double(f64),
    /// String value (exact content, no identity)
    Str(String),
    /// Reference to a heap object
    Object(ObjectRef),
}

impl Value {
    /// Create a null value
    #[inline]
    pub const fn null() -> Self {
        Value::Null
    }

    /// Create a boolean value
    #[inline]
    pub const fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an i32 value
    #[inline]
    pub const fn int(i: i32) -> Self {
        Value::Int(i)
    }

    /// Create an i64 value
    #[inline]
    pub const fn long(i: i64) -> Self {
        Value::Long(i)
    }

    /// Create an f32 value
    #[inline]
    pub const fn float(f: f32) -> Self {
        Value::Float(f)
    }

    /// Create an f64 value
    #[inline]
    pub const fn double(f: f64) -> Self {
        Value::Double(f)
    }

    /// Create a string value
    #[inline]
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Create an object reference value
    #[inline]
    pub fn object(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }

    /// Check if this value is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is an object reference
    #[inline]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Extract boolean value
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract i32 value
    #[inline]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract i64 value
    #[inline]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract f32 value
    #[inline]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract f64 value
    #[inline]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract string content
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Extract object reference
    #[inline]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Get type name for diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            // Objects compare by identity, not structure
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "bool({})", b),
            Value::Int(i) => write!(f, "int({})", i),
            Value::Long(i) => write!(f, "long({})", i),
            Value::Float(v) => write!(f, "float({})", v),
            Value::Double(v) => write!(f, "double({})", v),
            Value::Str(s) => write!(f, "str({:?})", s),
            Value::Object(obj) => write!(f, "object@{:#x}", obj.addr()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
            Value::Object(obj) => write!(f, "[object@{:#x}]", obj.addr()),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectRef;

    #[test]
    fn test_value_null() {
        let v = Value::null();
        assert!(v.is_null());
        assert!(!v.is_object());
        assert_eq!(v.type_name(), "null");
    }

    #[test]
    fn test_value_primitives() {
        assert_eq!(Value::bool(true).as_bool(), Some(true));
        assert_eq!(Value::int(42).as_int(), Some(42));
        assert_eq!(Value::long(-7).as_long(), Some(-7));
        assert_eq!(Value::float(1.5).as_float(), Some(1.5));
        assert_eq!(Value::double(2.25).as_double(), Some(2.25));
    }

    #[test]
    fn test_value_width_discrimination() {
        // An Int never reads back as a Long, a Float never as a Double.
        assert_eq!(Value::int(1).as_long(), None);
        assert_eq!(Value::long(1).as_int(), None);
        assert_eq!(Value::float(1.0).as_double(), None);
        assert_eq!(Value::double(1.0).as_float(), None);
    }

    #[test]
    fn test_value_string() {
        let v = Value::str("hello");
        assert_eq!(v.as_str(), Some("hello"));
        assert_eq!(v.type_name(), "string");
        assert_eq!(v.to_string(), "hello");
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::null(), Value::null());
        assert_eq!(Value::int(42), Value::int(42));
        assert_ne!(Value::int(42), Value::long(42));
        assert_eq!(Value::str("a"), Value::str("a"));
        assert_ne!(Value::null(), Value::bool(false));
    }

    #[test]
    fn test_object_identity_equality() {
        let a = ObjectRef::new(0, 1);
        let b = ObjectRef::new(0, 1);

        let va = Value::object(a.clone());
        assert_eq!(va, Value::object(a));
        assert_ne!(va, Value::object(b));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::null().to_string(), "null");
        assert_eq!(Value::bool(true).to_string(), "true");
        assert_eq!(Value::int(-10).to_string(), "-10");
        assert_eq!(Value::double(2.25).to_string(), "2.25");
    }
}
