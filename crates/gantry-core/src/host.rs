//! The hosted runtime facade
//!
//! `Host` owns the class registry, allocates instances, reads and writes
//! slot-addressed fields, and invokes constructor/method bodies. It also
//! carries the single registered [`ProxyDispatcher`] entry point through
//! which interface sends on proxy objects re-enter foreign code.
//!
//! Method bodies receive `&Host`, so hosted code can itself construct
//! objects and perform interface sends. No registry lock is held while a
//! body runs.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::class::{ClassDef, ClassId, CtorDef, FieldDef, MethodDef, ROOT_CLASS};
use crate::error::{HostError, HostResult};
use crate::object::ObjectRef;
use crate::ty::Ty;
use crate::value::Value;

/// Reverse-dispatch entry point for interface sends on proxy objects.
///
/// The bridge registers exactly one dispatcher; the host holds it for its
/// whole lifetime and calls it from whichever thread performs the send.
pub trait ProxyDispatcher: Send + Sync {
    /// Invoke `method` on the foreign implementation behind `proxy_id`.
    fn dispatch(&self, proxy_id: u64, method: &str, args: &[Value]) -> HostResult<Value>;
}

/// Declared instance field with its absolute slot
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: Ty,
    /// Absolute slot index (inherited slots come first)
    pub slot: usize,
}

/// Declared static field with its per-class slot
#[derive(Debug, Clone)]
pub struct StaticFieldInfo {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: Ty,
    /// Slot in the class's static storage
    pub slot: usize,
}

/// Declared constructor
#[derive(Debug, Clone)]
pub struct CtorInfo {
    /// Index into the class's constructor table
    pub index: usize,
    /// Parameter types
    pub params: Vec<Ty>,
}

/// Declared method
#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// Method name
    pub name: String,
    /// Index into the class's method table
    pub index: usize,
    /// Parameter types
    pub params: Vec<Ty>,
    /// Return type
    pub ret: Ty,
    /// Static methods take no receiver
    pub is_static: bool,
    /// Bodyless methods cannot be invoked on plain objects
    pub is_abstract: bool,
}

/// Registered class with resolved hierarchy and field layout.
struct ClassRuntime {
    path: String,
    superclass: Option<ClassId>,
    interfaces: Vec<ClassId>,
    is_interface: bool,
    /// First slot owned by this class (== superclass's total)
    field_base: usize,
    fields: Vec<FieldDef>,
    /// Slot count including inherited fields
    total_fields: usize,
    statics_meta: Vec<(String, Ty)>,
    statics: RwLock<Vec<Value>>,
    ctors: Vec<CtorDef>,
    methods: Vec<MethodDef>,
}

/// The hosted object runtime.
pub struct Host {
    classes: RwLock<Vec<Arc<ClassRuntime>>>,
    index: RwLock<FxHashMap<String, ClassId>>,
    dispatcher: RwLock<Option<Arc<dyn ProxyDispatcher>>>,
}

impl Host {
    /// Create a host with the root class `lang/Object` installed.
    pub fn new() -> Self {
        let host = Host {
            classes: RwLock::new(Vec::new()),
            index: RwLock::new(FxHashMap::default()),
            dispatcher: RwLock::new(None),
        };

        let mut root = ClassDef::builder(ROOT_CLASS)
            .method("toString", vec![], Ty::Str, |host, recv, _| {
                let obj = recv.ok_or_else(|| HostError::NotAnObject("null".to_string()))?;
                let path = host.class_path(obj.class_id())?;
                Ok(Value::str(format!("{}@{:x}", path, obj.addr())))
            })
            .constructor(vec![], |_, _, _| Ok(()))
            .build();
        root.superclass = None;

        // Registering the root cannot fail on a fresh registry.
        host.register(root)
            .unwrap_or_else(|e| panic!("root class registration failed: {}", e));
        host
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a class. Its superclass and interfaces must already be
    /// registered; the new class id is returned.
    pub fn register(&self, def: ClassDef) -> HostResult<ClassId> {
        if self.find_class(&def.path).is_some() {
            return Err(HostError::DuplicateClass(def.path));
        }

        let superclass = match &def.superclass {
            Some(path) => Some(self.lookup_class(path)?),
            None => None,
        };
        let mut interfaces = Vec::with_capacity(def.interfaces.len());
        for path in &def.interfaces {
            let id = self.lookup_class(path)?;
            if !self.is_interface(id)? {
                return Err(HostError::NotAnInterface(path.clone()));
            }
            interfaces.push(id);
        }

        let field_base = match superclass {
            Some(id) => self.class(id)?.total_fields,
            None => 0,
        };
        let total_fields = field_base + def.fields.len();

        let statics_meta: Vec<(String, Ty)> = def
            .statics
            .iter()
            .map(|s| (s.name.clone(), s.ty.clone()))
            .collect();
        let statics = def.statics.into_iter().map(|s| s.init).collect();

        let runtime = Arc::new(ClassRuntime {
            path: def.path.clone(),
            superclass,
            interfaces,
            is_interface: def.is_interface,
            field_base,
            fields: def.fields,
            total_fields,
            statics_meta,
            statics: RwLock::new(statics),
            ctors: def.ctors,
            methods: def.methods,
        });

        let mut classes = self.classes.write();
        let id = classes.len();
        classes.push(runtime);
        self.index.write().insert(def.path, id);
        Ok(id)
    }

    // ========================================================================
    // Reflection surface
    // ========================================================================

    /// Find a class id by path
    pub fn find_class(&self, path: &str) -> Option<ClassId> {
        self.index.read().get(path).copied()
    }

    /// Find a class id by path, failing with `ClassNotFound`
    pub fn lookup_class(&self, path: &str) -> HostResult<ClassId> {
        self.find_class(path)
            .ok_or_else(|| HostError::ClassNotFound(path.to_string()))
    }

    /// Path of a class
    pub fn class_path(&self, id: ClassId) -> HostResult<String> {
        Ok(self.class(id)?.path.clone())
    }

    /// Superclass of a class (`None` for the root)
    pub fn superclass(&self, id: ClassId) -> HostResult<Option<ClassId>> {
        Ok(self.class(id)?.superclass)
    }

    /// Directly implemented interfaces, in declaration order
    pub fn interfaces(&self, id: ClassId) -> HostResult<Vec<ClassId>> {
        Ok(self.class(id)?.interfaces.clone())
    }

    /// Whether the class is an interface
    pub fn is_interface(&self, id: ClassId) -> HostResult<bool> {
        Ok(self.class(id)?.is_interface)
    }

    /// Declared instance fields with absolute slots
    pub fn declared_fields(&self, id: ClassId) -> HostResult<Vec<FieldInfo>> {
        let class = self.class(id)?;
        Ok(class
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| FieldInfo {
                name: f.name.clone(),
                ty: f.ty.clone(),
                slot: class.field_base + i,
            })
            .collect())
    }

    /// Declared static fields
    pub fn declared_statics(&self, id: ClassId) -> HostResult<Vec<StaticFieldInfo>> {
        let class = self.class(id)?;
        Ok(class
            .statics_meta
            .iter()
            .enumerate()
            .map(|(i, (name, ty))| StaticFieldInfo {
                name: name.clone(),
                ty: ty.clone(),
                slot: i,
            })
            .collect())
    }

    /// Declared constructors
    pub fn constructors(&self, id: ClassId) -> HostResult<Vec<CtorInfo>> {
        let class = self.class(id)?;
        Ok(class
            .ctors
            .iter()
            .enumerate()
            .map(|(i, c)| CtorInfo {
                index: i,
                params: c.params.clone(),
            })
            .collect())
    }

    /// Declared methods (instance and static)
    pub fn methods(&self, id: ClassId) -> HostResult<Vec<MethodInfo>> {
        let class = self.class(id)?;
        Ok(class
            .methods
            .iter()
            .enumerate()
            .map(|(i, m)| MethodInfo {
                name: m.name.clone(),
                index: i,
                params: m.params.clone(),
                ret: m.ret.clone(),
                is_static: m.is_static,
                is_abstract: m.body.is_none(),
            })
            .collect())
    }

    /// Full ancestor chain in canonical order: self, superclass chain,
    /// transitively implemented interfaces, root last. Stable for a given
    /// registry.
    pub fn ancestry(&self, id: ClassId) -> HostResult<Vec<ClassId>> {
        let mut supers = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            cur = self.superclass(c)?;
            supers.push(c);
        }

        // The last entry is the root; interfaces slot in just before it.
        let root = supers.pop().unwrap_or(id);
        let mut chain = supers;

        let mut interfaces = Vec::new();
        let mut pending: Vec<ClassId> = Vec::new();
        for &c in &chain {
            pending.extend(self.interfaces(c)?);
        }
        while !pending.is_empty() {
            let mut next = Vec::new();
            for iface in pending {
                if !interfaces.contains(&iface) && !chain.contains(&iface) {
                    next.extend(self.interfaces(iface)?);
                    interfaces.push(iface);
                }
            }
            pending = next;
        }

        chain.extend(interfaces);
        chain.push(root);
        Ok(chain)
    }

    /// Whether `sub` is assignable to `sup` (identity counts)
    pub fn is_assignable(&self, sub: ClassId, sup: ClassId) -> HostResult<bool> {
        Ok(self.ancestry(sub)?.contains(&sup))
    }

    // ========================================================================
    // Object operations
    // ========================================================================

    /// Allocate an instance and run the selected constructor.
    pub fn construct(&self, id: ClassId, ctor: usize, args: &[Value]) -> HostResult<Value> {
        let class = self.class(id)?;
        if class.is_interface {
            return Err(HostError::InterfaceInstantiation(class.path.clone()));
        }
        let ctor = class.ctors.get(ctor).ok_or_else(|| HostError::NoSuchMember {
            class: class.path.clone(),
            name: format!("<init>#{}", ctor),
        })?;
        if ctor.params.len() != args.len() {
            return Err(HostError::ArityMismatch {
                expected: ctor.params.len(),
                got: args.len(),
            });
        }

        let obj = ObjectRef::new(id, class.total_fields);
        self.init_field_defaults(id, &obj)?;
        (ctor.body)(self, &obj, args)?;
        Ok(Value::object(obj))
    }

    /// Typed zero values for every declared field along the chain.
    fn init_field_defaults(&self, id: ClassId, obj: &ObjectRef) -> HostResult<()> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            for field in self.declared_fields(c)? {
                obj.set_field(field.slot, field.ty.default_value())?;
            }
            cur = self.superclass(c)?;
        }
        Ok(())
    }

    /// Read a slot-addressed instance field
    pub fn get_field(&self, receiver: &Value, slot: usize) -> HostResult<Value> {
        let obj = self.expect_object(receiver)?;
        obj.get_field(slot).ok_or_else(|| HostError::SlotOutOfBounds {
            class: self.class_path(obj.class_id()).unwrap_or_default(),
            slot,
        })
    }

    /// Write a slot-addressed instance field
    pub fn set_field(&self, receiver: &Value, slot: usize, value: Value) -> HostResult<()> {
        let obj = self.expect_object(receiver)?;
        obj.set_field(slot, value).map_err(|_| HostError::SlotOutOfBounds {
            class: self.class_path(obj.class_id()).unwrap_or_default(),
            slot,
        })
    }

    /// Read a static field slot
    pub fn get_static(&self, id: ClassId, slot: usize) -> HostResult<Value> {
        let class = self.class(id)?;
        let statics = class.statics.read();
        statics.get(slot).cloned().ok_or_else(|| HostError::SlotOutOfBounds {
            class: class.path.clone(),
            slot,
        })
    }

    /// Write a static field slot
    pub fn set_static(&self, id: ClassId, slot: usize, value: Value) -> HostResult<()> {
        let class = self.class(id)?;
        let mut statics = class.statics.write();
        if slot < statics.len() {
            statics[slot] = value;
            Ok(())
        } else {
            Err(HostError::SlotOutOfBounds {
                class: class.path.clone(),
                slot,
            })
        }
    }

    // ========================================================================
    // Invocation
    // ========================================================================

    /// Invoke an instance method pre-resolved to `(owner, index)`.
    pub fn invoke(
        &self,
        owner: ClassId,
        index: usize,
        receiver: &Value,
        args: &[Value],
    ) -> HostResult<Value> {
        let class = self.class(owner)?;
        let method = class.methods.get(index).ok_or_else(|| HostError::NoSuchMember {
            class: class.path.clone(),
            name: format!("<method#{}>", index),
        })?;
        if method.is_static {
            return Err(HostError::NoSuchMember {
                class: class.path.clone(),
                name: method.name.clone(),
            });
        }
        self.check_arity(method, args)?;
        let obj = self.expect_object(receiver)?.clone();
        let body = method.body.clone().ok_or_else(|| HostError::AbstractCall {
            class: class.path.clone(),
            name: method.name.clone(),
        })?;
        drop(class);
        body(self, Some(&obj), args)
    }

    /// Invoke a static method pre-resolved to `(class, index)`.
    pub fn invoke_static(&self, id: ClassId, index: usize, args: &[Value]) -> HostResult<Value> {
        let class = self.class(id)?;
        let method = class.methods.get(index).ok_or_else(|| HostError::NoSuchMember {
            class: class.path.clone(),
            name: format!("<method#{}>", index),
        })?;
        if !method.is_static {
            return Err(HostError::NoSuchMember {
                class: class.path.clone(),
                name: method.name.clone(),
            });
        }
        self.check_arity(method, args)?;
        let body = method.body.clone().ok_or_else(|| HostError::AbstractCall {
            class: class.path.clone(),
            name: method.name.clone(),
        })?;
        drop(class);
        body(self, None, args)
    }

    /// Name-addressed virtual send, the form hosted method bodies use when
    /// calling through an interface-typed reference. Proxy receivers route
    /// through the registered dispatcher; plain receivers resolve by name
    /// and arity on the concrete class chain.
    pub fn invoke_interface(
        &self,
        receiver: &Value,
        name: &str,
        args: &[Value],
    ) -> HostResult<Value> {
        let obj = self.expect_object(receiver)?.clone();

        if let Some(proxy_id) = obj.proxy_id() {
            let dispatcher = self
                .dispatcher
                .read()
                .clone()
                .ok_or(HostError::NoDispatcher)?;
            return dispatcher.dispatch(proxy_id, name, args);
        }

        for class_id in self.ancestry(obj.class_id())? {
            let class = self.class(class_id)?;
            let found = class
                .methods
                .iter()
                .find(|m| m.name == name && !m.is_static && m.params.len() == args.len());
            if let Some(method) = found {
                let body = method.body.clone().ok_or_else(|| HostError::AbstractCall {
                    class: class.path.clone(),
                    name: name.to_string(),
                })?;
                drop(class);
                return body(self, Some(&obj), args);
            }
        }

        Err(HostError::NoSuchMember {
            class: self.class_path(obj.class_id())?,
            name: name.to_string(),
        })
    }

    // ========================================================================
    // Proxy support
    // ========================================================================

    /// Install the reverse-dispatch entry point. The bridge calls this
    /// once at construction.
    pub fn set_proxy_dispatcher(&self, dispatcher: Arc<dyn ProxyDispatcher>) {
        *self.dispatcher.write() = Some(dispatcher);
    }

    /// Allocate a proxy instance of an interface, carrying `proxy_id`.
    pub fn new_proxy(&self, interface: ClassId, proxy_id: u64) -> HostResult<Value> {
        let class = self.class(interface)?;
        if !class.is_interface {
            return Err(HostError::NotAnInterface(class.path.clone()));
        }
        Ok(Value::object(ObjectRef::new_proxy(interface, proxy_id)))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn class(&self, id: ClassId) -> HostResult<Arc<ClassRuntime>> {
        self.classes
            .read()
            .get(id)
            .cloned()
            .ok_or(HostError::UnknownClassId(id))
    }

    fn expect_object<'a>(&self, value: &'a Value) -> HostResult<&'a ObjectRef> {
        value
            .as_object()
            .ok_or_else(|| HostError::NotAnObject(value.type_name().to_string()))
    }

    fn check_arity(&self, method: &MethodDef, args: &[Value]) -> HostResult<()> {
        if method.params.len() == args.len() {
            Ok(())
        } else {
            Err(HostError::ArityMismatch {
                expected: method.params.len(),
                got: args.len(),
            })
        }
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}
