//! Boundary conversions between dynamic values and hosted values
//!
//! Conversion is driven by the declared parameter or field type that
//! overload resolution (or the member descriptor) already picked, so this
//! layer narrows widths and checks reference assignability but never
//! re-decides which member was meant. Inbound conversion (`from_host`)
//! binds returned objects to their concrete runtime class, not the
//! declared return type.

use std::sync::Arc;

use gantry_core::{Ty, Value, ROOT_CLASS};

use crate::descriptor::STRING_CLASS;
use crate::error::{BridgeError, BridgeResult};
use crate::handle::{BridgeShared, InstanceHandle};
use crate::overload::TypeRelation;
use crate::value::ScriptValue;

fn mismatch(target: &Ty, got: &ScriptValue) -> BridgeError {
    BridgeError::TypeMismatch {
        expected: target.to_string(),
        got: got.describe(),
    }
}

/// Convert one outbound value to the hosted representation demanded by
/// `target`.
pub(crate) fn to_host(
    shared: &BridgeShared,
    value: &ScriptValue,
    target: &Ty,
) -> BridgeResult<Value> {
    match (value, target) {
        (ScriptValue::Bool(b), Ty::Bool) => Ok(Value::bool(*b)),
        (ScriptValue::Int(i), Ty::Int) => match i32::try_from(*i) {
            Ok(narrow) => Ok(Value::int(narrow)),
            Err(_) => Err(mismatch(target, value)),
        },
        (ScriptValue::Int(i), Ty::Long) => Ok(Value::long(*i)),
        (ScriptValue::Int(i), Ty::Float) => Ok(Value::float(*i as f32)),
        (ScriptValue::Int(i), Ty::Double) => Ok(Value::double(*i as f64)),
        (ScriptValue::Float(f), Ty::Float) => Ok(Value::float(*f as f32)),
        (ScriptValue::Float(f), Ty::Double) => Ok(Value::double(*f)),
        (ScriptValue::Str(s), Ty::Str) => Ok(Value::str(s.clone())),
        (ScriptValue::Str(s), Ty::Object(path))
            if path == ROOT_CLASS || path == STRING_CLASS =>
        {
            Ok(Value::str(s.clone()))
        }
        (ScriptValue::Null, Ty::Str) | (ScriptValue::Null, Ty::Object(_)) => Ok(Value::null()),
        (ScriptValue::Instance(h), Ty::Object(path)) => {
            if shared.distance(h.class_id(), path).is_some() {
                Ok(h.raw().clone())
            } else {
                Err(mismatch(target, value))
            }
        }
        (ScriptValue::Proxy(p), Ty::Object(path)) => {
            if shared.distance(p.interface_id(), path).is_some() {
                Ok(p.raw().clone())
            } else {
                Err(mismatch(target, value))
            }
        }
        _ => Err(mismatch(target, value)),
    }
}

/// Convert a full argument list against the selected signature.
pub(crate) fn to_host_args(
    shared: &BridgeShared,
    params: &[Ty],
    args: &[ScriptValue],
) -> BridgeResult<Vec<Value>> {
    args.iter()
        .zip(params)
        .map(|(arg, param)| to_host(shared, arg, param))
        .collect()
}

/// Convert an inbound hosted value to the dynamic representation.
///
/// Primitive widths collapse to the dynamic `Int`/`Float`; objects come
/// back as handles bound to the concrete class recorded on the object
/// header.
pub(crate) fn from_host(shared: &Arc<BridgeShared>, value: Value) -> BridgeResult<ScriptValue> {
    Ok(match value {
        Value::Null => ScriptValue::Null,
        Value::Bool(b) => ScriptValue::Bool(b),
        Value::Int(i) => ScriptValue::Int(i64::from(i)),
        Value::Long(l) => ScriptValue::Int(l),
        Value::Float(f) => ScriptValue::Float(f64::from(f)),
        Value::Double(d) => ScriptValue::Float(d),
        Value::Str(s) => ScriptValue::Str(s),
        Value::Object(ref obj) => {
            let meta = shared.cache.resolve(&shared.host, obj.class_id())?;
            ScriptValue::Instance(InstanceHandle::bind(Arc::clone(shared), meta, value))
        }
    })
}
