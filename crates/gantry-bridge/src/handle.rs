//! Class and instance handles
//!
//! `Bridge` owns the shared state (host connection, reflection cache,
//! proxy table) and hands out cheap clonable handles. `ClassHandle` is the
//! static-context surface of a class: constructor dispatch, static fields,
//! static methods. `InstanceHandle` wraps one hosted object and exposes
//! the instance-context surface. Each surface rejects members declared on
//! the other side rather than silently forwarding.

use std::sync::Arc;

use gantry_core::{ClassId, Host, HostError, Ty, Value};

use crate::descriptor::{parse_descriptor, STRING_CLASS};
use crate::error::{BridgeError, BridgeResult};
use crate::marshal::{from_host, to_host, to_host_args};
use crate::overload::{self, TypeRelation};
use crate::proxy::{BridgeDispatcher, ProxyBuilder, ProxyTable};
use crate::reflect::{ClassMeta, FieldDesc, MemberEntry, ReflectionCache};
use crate::value::ScriptValue;

/// State shared by every handle minted from one `Bridge`.
pub(crate) struct BridgeShared {
    pub(crate) host: Arc<Host>,
    pub(crate) cache: ReflectionCache,
    pub(crate) proxies: ProxyTable,
}

impl TypeRelation for BridgeShared {
    fn distance(&self, arg_class: ClassId, target_path: &str) -> Option<usize> {
        let meta = self.cache.resolve(&self.host, arg_class).ok()?;
        let target = crate::descriptor::class_descriptor(target_path);
        meta.type_chain.iter().position(|d| **d == *target)
    }
}

/// Entry point to a hosted object system.
#[derive(Clone)]
pub struct Bridge {
    shared: Arc<BridgeShared>,
}

impl Bridge {
    /// Connect to a host. Installs this bridge as the host's reverse
    /// dispatch target for proxy callbacks.
    pub fn new(host: Arc<Host>) -> Bridge {
        let shared = Arc::new(BridgeShared {
            host,
            cache: ReflectionCache::new(),
            proxies: ProxyTable::new(),
        });
        shared
            .host
            .set_proxy_dispatcher(Arc::new(BridgeDispatcher::new(Arc::downgrade(&shared))));
        Bridge { shared }
    }

    /// The underlying host
    pub fn host(&self) -> &Arc<Host> {
        &self.shared.host
    }

    /// Handle for a class. Accepts either the bare slash-separated path
    /// (`test/Example`) or its descriptor form (`Ltest/Example;`).
    /// Resolves the path eagerly; member metadata stays unloaded until
    /// first access.
    pub fn class_of(&self, path: &str) -> BridgeResult<ClassHandle> {
        let path = if path.starts_with('L') && path.ends_with(';') {
            match parse_descriptor(path)? {
                Ty::Object(inner) => inner,
                Ty::Str => STRING_CLASS.to_string(),
                _ => return Err(BridgeError::BadDescriptor(path.to_string())),
            }
        } else {
            path.to_string()
        };
        let class_id = self
            .shared
            .host
            .find_class(&path)
            .ok_or_else(|| BridgeError::ClassNotFound(path.clone()))?;
        Ok(ClassHandle {
            shared: Arc::clone(&self.shared),
            class_id,
            path,
        })
    }

    /// Handle for an interface path; rejects concrete classes.
    pub fn interface_of(&self, path: &str) -> BridgeResult<ClassHandle> {
        let handle = self.class_of(path)?;
        if !self.shared.host.is_interface(handle.class_id)? {
            return Err(BridgeError::NotAnInterface(path.to_string()));
        }
        Ok(handle)
    }

    /// Start building a dynamic implementation of `interface`.
    pub fn implement(&self, interface: &ClassHandle) -> BridgeResult<ProxyBuilder> {
        let meta = interface.meta()?;
        if !meta.is_interface {
            return Err(BridgeError::NotAnInterface(meta.path.clone()));
        }
        Ok(ProxyBuilder::new(Arc::clone(&self.shared), meta))
    }
}

/// Static-context handle for one class.
#[derive(Clone)]
pub struct ClassHandle {
    shared: Arc<BridgeShared>,
    class_id: ClassId,
    path: String,
}

impl ClassHandle {
    /// Class path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Host class id
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Force (re)resolution of the class metadata and return it.
    pub fn load(&self) -> BridgeResult<Arc<ClassMeta>> {
        self.shared.cache.reload(&self.shared.host, self.class_id)
    }

    pub(crate) fn meta(&self) -> BridgeResult<Arc<ClassMeta>> {
        self.shared.cache.resolve(&self.shared.host, self.class_id)
    }

    /// Construct an instance, selecting among the class's constructors.
    pub fn construct(&self, args: &[ScriptValue]) -> BridgeResult<InstanceHandle> {
        let meta = self.meta()?;
        if meta.is_interface {
            return Err(HostError::InterfaceInstantiation(meta.path.clone()).into());
        }
        let ctor = overload::select(
            &*self.shared,
            &meta.path,
            "<init>",
            meta.ctors.iter(),
            args,
        )?;
        let host_args = to_host_args(&self.shared, &ctor.params, args)?;
        let value = self.shared.host.construct(self.class_id, ctor.index, &host_args)?;
        Ok(InstanceHandle::bind(Arc::clone(&self.shared), meta, value))
    }

    /// Read a static field.
    pub fn get(&self, name: &str) -> BridgeResult<ScriptValue> {
        let meta = self.meta()?;
        let entry = member_of(&meta, name)?;
        let field = static_field(&meta, entry, name, "class")?;
        let value = self.shared.host.get_static(field.owner, field.slot)?;
        from_host(&self.shared, value)
    }

    /// Write a static field. The value is coerced to the declared field
    /// type with the same rules as argument marshalling.
    pub fn set(&self, name: &str, value: impl Into<ScriptValue>) -> BridgeResult<()> {
        let meta = self.meta()?;
        let entry = member_of(&meta, name)?;
        let field = static_field(&meta, entry, name, "class")?;
        let host_value = to_host(&self.shared, &value.into(), &field.ty)?;
        self.shared.host.set_static(field.owner, field.slot, host_value)?;
        Ok(())
    }

    /// Invoke a static method, selecting among same-name overloads.
    pub fn call(&self, name: &str, args: &[ScriptValue]) -> BridgeResult<ScriptValue> {
        let meta = self.meta()?;
        let entry = member_of(&meta, name)?;
        if entry.static_methods.is_empty() {
            return Err(wrong_side(&meta, entry, name, "class"));
        }
        let method = overload::select(
            &*self.shared,
            &meta.path,
            name,
            entry.static_methods.iter(),
            args,
        )?;
        let host_args = to_host_args(&self.shared, &method.params, args)?;
        let out = self.shared.host.invoke_static(method.owner, method.index, &host_args)?;
        from_host(&self.shared, out)
    }
}

/// Handle to one hosted object, bound to its concrete runtime class.
#[derive(Clone)]
pub struct InstanceHandle {
    shared: Arc<BridgeShared>,
    meta: Arc<ClassMeta>,
    value: Value,
}

impl std::fmt::Debug for InstanceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceHandle")
            .field("meta", &self.meta)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl InstanceHandle {
    pub(crate) fn bind(shared: Arc<BridgeShared>, meta: Arc<ClassMeta>, value: Value) -> Self {
        InstanceHandle { shared, meta, value }
    }

    /// Concrete class path of the wrapped object
    pub fn path(&self) -> &str {
        &self.meta.path
    }

    /// Host class id of the concrete class
    pub fn class_id(&self) -> ClassId {
        self.meta.class_id
    }

    /// Static-context handle for the concrete class
    pub fn class(&self) -> ClassHandle {
        ClassHandle {
            shared: Arc::clone(&self.shared),
            class_id: self.meta.class_id,
            path: self.meta.path.clone(),
        }
    }

    /// Ancestor descriptor chain of the concrete class
    pub fn type_chain(&self) -> &[Arc<str>] {
        &self.meta.type_chain
    }

    pub(crate) fn raw(&self) -> &Value {
        &self.value
    }

    /// Identity comparison: same hosted object
    pub fn ptr_eq(&self, other: &InstanceHandle) -> bool {
        match (&self.value, &other.value) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Read an instance field.
    pub fn get(&self, name: &str) -> BridgeResult<ScriptValue> {
        let entry = member_of(&self.meta, name)?;
        let field = instance_field(&self.meta, entry, name)?;
        let value = self.shared.host.get_field(&self.value, field.slot)?;
        from_host(&self.shared, value)
    }

    /// Write an instance field, coercing to the declared type.
    pub fn set(&self, name: &str, value: impl Into<ScriptValue>) -> BridgeResult<()> {
        let entry = member_of(&self.meta, name)?;
        let field = instance_field(&self.meta, entry, name)?;
        let host_value = to_host(&self.shared, &value.into(), &field.ty)?;
        self.shared.host.set_field(&self.value, field.slot, host_value)?;
        Ok(())
    }

    /// Invoke an instance method. Dispatch is virtual: the overload set
    /// was flattened from the concrete class upward, so the nearest
    /// override wins regardless of any declared supertype.
    pub fn call(&self, name: &str, args: &[ScriptValue]) -> BridgeResult<ScriptValue> {
        let entry = member_of(&self.meta, name)?;
        if entry.methods.is_empty() {
            return Err(wrong_side(&self.meta, entry, name, "instance"));
        }
        let method = overload::select(
            &*self.shared,
            &self.meta.path,
            name,
            entry.methods.iter(),
            args,
        )?;
        let host_args = to_host_args(&self.shared, &method.params, args)?;
        let out = self
            .shared
            .host
            .invoke(method.owner, method.index, &self.value, &host_args)?;
        from_host(&self.shared, out)
    }
}

fn no_such_attribute(meta: &ClassMeta, name: &str) -> BridgeError {
    BridgeError::NoSuchAttribute {
        class: meta.path.clone(),
        name: name.to_string(),
    }
}

fn member_of<'a>(meta: &'a ClassMeta, name: &str) -> BridgeResult<&'a MemberEntry> {
    meta.member(name).ok_or_else(|| no_such_attribute(meta, name))
}

/// The name exists but not on the side it was accessed from. Reports the
/// other side when the name is declared there, otherwise the member kind
/// simply is not an attribute (a method name reached via get/set).
fn wrong_side(meta: &ClassMeta, entry: &MemberEntry, name: &str, context: &'static str) -> BridgeError {
    let declared = match context {
        "class" if entry.has_instance_side() => "an instance member",
        "instance" if entry.has_static_side() => "static",
        _ => return no_such_attribute(meta, name),
    };
    BridgeError::WrongContext {
        class: meta.path.clone(),
        name: name.to_string(),
        declared,
        context,
    }
}

fn static_field<'a>(
    meta: &ClassMeta,
    entry: &'a MemberEntry,
    name: &str,
    context: &'static str,
) -> BridgeResult<&'a FieldDesc> {
    entry
        .static_field
        .as_ref()
        .ok_or_else(|| wrong_side(meta, entry, name, context))
}

fn instance_field<'a>(
    meta: &ClassMeta,
    entry: &'a MemberEntry,
    name: &str,
) -> BridgeResult<&'a FieldDesc> {
    entry
        .field
        .as_ref()
        .ok_or_else(|| wrong_side(meta, entry, name, "instance"))
}
