//! Binary type descriptors
//!
//! Human-readable class paths and `Ty` signatures convert to the host's
//! compact descriptor form: one letter per primitive, `L<path>;` for
//! reference types, `(<params>)<ret>` for method signatures. The
//! path→descriptor mapping is cached process-wide since the same classes
//! are described over and over during reflection.

use std::sync::Arc;

use dashmap::DashMap;
use gantry_core::Ty;
use once_cell::sync::Lazy;

use crate::error::{BridgeError, BridgeResult};

/// Class path the `Str` value type maps to in descriptors.
pub const STRING_CLASS: &str = "lang/String";

static CLASS_DESCRIPTORS: Lazy<DashMap<String, Arc<str>>> = Lazy::new(DashMap::new);

/// Descriptor for a class path: `test/Example` → `Ltest/Example;`.
/// Cached; repeated calls return the same allocation.
pub fn class_descriptor(path: &str) -> Arc<str> {
    if let Some(cached) = CLASS_DESCRIPTORS.get(path) {
        return cached.clone();
    }
    let descriptor: Arc<str> = Arc::from(format!("L{};", path));
    CLASS_DESCRIPTORS.insert(path.to_string(), descriptor.clone());
    descriptor
}

/// Descriptor for one type signature.
pub fn ty_descriptor(ty: &Ty) -> Arc<str> {
    match ty {
        Ty::Bool => Arc::from("Z"),
        Ty::Int => Arc::from("I"),
        Ty::Long => Arc::from("J"),
        Ty::Float => Arc::from("F"),
        Ty::Double => Arc::from("D"),
        Ty::Void => Arc::from("V"),
        Ty::Str => class_descriptor(STRING_CLASS),
        Ty::Object(path) => class_descriptor(path),
    }
}

/// Method descriptor: `(params...)ret`, e.g. `(IF)V`.
pub fn method_descriptor(params: &[Ty], ret: &Ty) -> String {
    let mut out = String::from("(");
    for p in params {
        out.push_str(&ty_descriptor(p));
    }
    out.push(')');
    out.push_str(&ty_descriptor(ret));
    out
}

/// Parse a single type descriptor back into a signature.
pub fn parse_descriptor(descriptor: &str) -> BridgeResult<Ty> {
    match descriptor {
        "Z" => Ok(Ty::Bool),
        "I" => Ok(Ty::Int),
        "J" => Ok(Ty::Long),
        "F" => Ok(Ty::Float),
        "D" => Ok(Ty::Double),
        "V" => Ok(Ty::Void),
        _ => {
            let inner = descriptor
                .strip_prefix('L')
                .and_then(|rest| rest.strip_suffix(';'))
                .filter(|path| !path.is_empty())
                .ok_or_else(|| BridgeError::BadDescriptor(descriptor.to_string()))?;
            if inner == STRING_CLASS {
                Ok(Ty::Str)
            } else {
                Ok(Ty::Object(inner.to_string()))
            }
        }
    }
}
