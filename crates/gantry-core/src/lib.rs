//! Gantry core — an in-process hosted object runtime
//!
//! This crate is the "managed" side of the Gantry bridge: a class registry
//! with single inheritance and interfaces, slot-addressed objects, static
//! fields, constructor/method bodies backed by Rust closures, and a
//! registered reverse-dispatch entry point through which interface sends
//! on proxy objects re-enter foreign code.
//!
//! The bridge crate (`gantry-bridge`) programs against the `Host` surface
//! only; nothing here knows about handles, overload resolution, or
//! marshalling.

pub mod class;
pub mod error;
pub mod host;
pub mod object;
pub mod ty;
pub mod value;

pub use class::{ClassDef, ClassDefBuilder, ClassId, CtorBody, MethodBody, ROOT_CLASS};
pub use error::{HostError, HostResult};
pub use host::{CtorInfo, FieldInfo, Host, MethodInfo, ProxyDispatcher, StaticFieldInfo};
pub use object::ObjectRef;
pub use ty::Ty;
pub use value::Value;
