//! Scripting-side dynamic values
//!
//! Call sites on the bridge traffick in `ScriptValue`: the loosely typed
//! universe a dynamic caller works with. Numbers carry no declared width
//! (integers are `i64`, floats `f64`); the marshalling layer narrows them
//! to the selected parameter's primitive at the boundary.

use std::fmt;

use crate::handle::InstanceHandle;
use crate::proxy::ProxyInstance;

/// A dynamic value at the bridge's call surface.
#[derive(Clone)]
pub enum ScriptValue {
    /// Null reference
    Null,
    /// Boolean
    Bool(bool),
    /// Integer literal (width chosen by overload resolution)
    Int(i64),
    /// Float literal (width chosen by overload resolution)
    Float(f64),
    /// String
    Str(String),
    /// Handle to a hosted object, bound to its concrete runtime type
    Instance(InstanceHandle),
    /// Scripting-side implementation of a hosted interface
    Proxy(ProxyInstance),
}

impl ScriptValue {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, ScriptValue::Null)
    }

    /// Extract boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScriptValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScriptValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ScriptValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract string content
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Extract instance handle
    pub fn as_instance(&self) -> Option<&InstanceHandle> {
        match self {
            ScriptValue::Instance(h) => Some(h),
            _ => None,
        }
    }

    /// Extract proxy
    pub fn as_proxy(&self) -> Option<&ProxyInstance> {
        match self {
            ScriptValue::Proxy(p) => Some(p),
            _ => None,
        }
    }

    /// Type description for error messages; instances report their
    /// concrete class path.
    pub fn describe(&self) -> String {
        match self {
            ScriptValue::Null => "null".to_string(),
            ScriptValue::Bool(_) => "bool".to_string(),
            ScriptValue::Int(_) => "int".to_string(),
            ScriptValue::Float(_) => "float".to_string(),
            ScriptValue::Str(_) => "string".to_string(),
            ScriptValue::Instance(h) => h.path().to_string(),
            ScriptValue::Proxy(p) => format!("proxy<{}>", p.interface_path()),
        }
    }
}

/// Comma-joined argument type display for overload errors.
pub(crate) fn describe_args(args: &[ScriptValue]) -> String {
    args.iter()
        .map(ScriptValue::describe)
        .collect::<Vec<_>>()
        .join(", ")
}

impl PartialEq for ScriptValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScriptValue::Null, ScriptValue::Null) => true,
            (ScriptValue::Bool(a), ScriptValue::Bool(b)) => a == b,
            (ScriptValue::Int(a), ScriptValue::Int(b)) => a == b,
            (ScriptValue::Float(a), ScriptValue::Float(b)) => a == b,
            (ScriptValue::Str(a), ScriptValue::Str(b)) => a == b,
            (ScriptValue::Instance(a), ScriptValue::Instance(b)) => a.ptr_eq(b),
            (ScriptValue::Proxy(a), ScriptValue::Proxy(b)) => a.id() == b.id(),
            _ => false,
        }
    }
}

impl fmt::Debug for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Null => write!(f, "null"),
            ScriptValue::Bool(b) => write!(f, "{}", b),
            ScriptValue::Int(i) => write!(f, "{}", i),
            ScriptValue::Float(v) => write!(f, "{}", v),
            ScriptValue::Str(s) => write!(f, "{:?}", s),
            ScriptValue::Instance(h) => write!(f, "<{}>", h.path()),
            ScriptValue::Proxy(p) => write!(f, "<proxy {} #{}>", p.interface_path(), p.id()),
        }
    }
}

impl From<bool> for ScriptValue {
    fn from(b: bool) -> Self {
        ScriptValue::Bool(b)
    }
}

impl From<i32> for ScriptValue {
    fn from(i: i32) -> Self {
        ScriptValue::Int(i as i64)
    }
}

impl From<i64> for ScriptValue {
    fn from(i: i64) -> Self {
        ScriptValue::Int(i)
    }
}

impl From<f32> for ScriptValue {
    fn from(f: f32) -> Self {
        ScriptValue::Float(f as f64)
    }
}

impl From<f64> for ScriptValue {
    fn from(f: f64) -> Self {
        ScriptValue::Float(f)
    }
}

impl From<&str> for ScriptValue {
    fn from(s: &str) -> Self {
        ScriptValue::Str(s.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(s: String) -> Self {
        ScriptValue::Str(s)
    }
}

impl From<InstanceHandle> for ScriptValue {
    fn from(h: InstanceHandle) -> Self {
        ScriptValue::Instance(h)
    }
}

impl From<ProxyInstance> for ScriptValue {
    fn from(p: ProxyInstance) -> Self {
        ScriptValue::Proxy(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_impls() {
        assert_eq!(ScriptValue::from(42i32), ScriptValue::Int(42));
        assert_eq!(ScriptValue::from(42i64), ScriptValue::Int(42));
        assert_eq!(ScriptValue::from(1.5f64), ScriptValue::Float(1.5));
        assert_eq!(ScriptValue::from(true), ScriptValue::Bool(true));
        assert_eq!(ScriptValue::from("x"), ScriptValue::Str("x".to_string()));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ScriptValue::Int(7).as_int(), Some(7));
        assert_eq!(ScriptValue::Int(7).as_float(), None);
        assert_eq!(ScriptValue::Str("a".into()).as_str(), Some("a"));
        assert!(ScriptValue::Null.is_null());
    }

    #[test]
    fn test_describe_args() {
        let args = [
            ScriptValue::Int(1),
            ScriptValue::Str("s".into()),
            ScriptValue::Null,
        ];
        assert_eq!(describe_args(&args), "int, string, null");
    }
}
