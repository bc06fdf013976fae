//! # Gantry Bridge
//!
//! Dynamic-dispatch bridge onto a [`gantry_core`] object host. The bridge
//! lets loosely typed calling code drive a statically declared class
//! system by name:
//!
//! - **Handles** ([`Bridge`], [`ClassHandle`], [`InstanceHandle`]) expose
//!   constructor, field, and method access with a strict split between
//!   static and instance context.
//! - **Reflection** ([`ReflectionCache`], [`ClassMeta`]) resolves each
//!   class once into its ancestor descriptor chain and flattened member
//!   table, with nearest-declaration shadowing.
//! - **Overloads** are selected by arity and then per-argument coercion
//!   cost; ties are an error, never a guess.
//! - **Marshalling** converts dynamic values to declared hosted types at
//!   the boundary and binds returned objects to their concrete runtime
//!   class.
//! - **Proxies** ([`ProxyBuilder`], [`ProxyInstance`]) implement hosted
//!   interfaces with script-side closures, dispatched back through the
//!   host's callback hook.
//!
//! ## Example
//!
//! ```ignore
//! let bridge = Bridge::new(host);
//! let class = bridge.class_of("test/Example")?;
//! let obj = class.construct(&[ScriptValue::Int(2242)])?;
//! let sum = obj.call("add", &[ScriptValue::Int(5)])?;
//! ```

mod descriptor;
mod error;
mod handle;
mod marshal;
mod overload;
mod proxy;
mod reflect;
mod value;

pub use descriptor::{
    class_descriptor, method_descriptor, parse_descriptor, ty_descriptor, STRING_CLASS,
};
pub use error::{BridgeError, BridgeResult};
pub use handle::{Bridge, ClassHandle, InstanceHandle};
pub use proxy::{ProxyBuilder, ProxyInstance, ProxyMethod};
pub use reflect::{
    ClassMeta, CtorDesc, DeclaredMembers, FieldDesc, MemberEntry, MethodDesc, ReflectionCache,
};
pub use value::ScriptValue;
