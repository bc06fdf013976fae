//! Reflection cache
//!
//! First member access on a class (or an explicit `load`) resolves its
//! full metadata: the ordered ancestor descriptor chain and every
//! constructor, field, and method declared along it, flattened into a
//! name lookup where the nearest declaration shadows. Resolution is
//! cached per class and idempotent; concurrent first-use resolution of
//! one class builds at most once (losers block on the cache shard and
//! reuse the winner's entry).

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use gantry_core::{ClassId, Host, Ty};
use rustc_hash::FxHashMap;

use crate::descriptor::{class_descriptor, method_descriptor};
use crate::error::BridgeResult;

/// Resolved field (instance or static)
#[derive(Debug, Clone)]
pub struct FieldDesc {
    /// Declaring class
    pub owner: ClassId,
    /// Field name
    pub name: String,
    /// Field type
    pub ty: Ty,
    /// Slot index (absolute for instance fields, per-class for statics)
    pub slot: usize,
    /// Static fields live on the class, not the instance
    pub is_static: bool,
}

/// Resolved method
#[derive(Debug, Clone)]
pub struct MethodDesc {
    /// Declaring class
    pub owner: ClassId,
    /// Method name (overloads share it)
    pub name: String,
    /// Index into the declaring class's method table
    pub index: usize,
    /// Parameter types
    pub params: Vec<Ty>,
    /// Return type
    pub ret: Ty,
    /// Static methods take no receiver
    pub is_static: bool,
    /// Bodyless; must be supplied by an implementor or proxy
    pub is_abstract: bool,
}

impl MethodDesc {
    /// Binary signature of this method, e.g. `(II)V`.
    pub fn descriptor(&self) -> String {
        method_descriptor(&self.params, &self.ret)
    }
}

/// Resolved constructor
#[derive(Debug, Clone)]
pub struct CtorDesc {
    /// Declaring class
    pub owner: ClassId,
    /// Index into the class's constructor table
    pub index: usize,
    /// Parameter types
    pub params: Vec<Ty>,
}

/// Members declared by one type in the ancestor chain.
#[derive(Debug, Clone)]
pub struct DeclaredMembers {
    /// Declaring class
    pub owner: ClassId,
    /// Declaring class path
    pub path: String,
    /// Instance and static fields declared here
    pub fields: Vec<FieldDesc>,
    /// Methods declared here
    pub methods: Vec<MethodDesc>,
}

/// Everything reachable under one member name, split by kind and context.
#[derive(Debug, Clone, Default)]
pub struct MemberEntry {
    /// Instance field (nearest declaration)
    pub field: Option<FieldDesc>,
    /// Static field (nearest declaration)
    pub static_field: Option<FieldDesc>,
    /// Instance method overloads, nearest override first
    pub methods: Vec<MethodDesc>,
    /// Static method overloads
    pub static_methods: Vec<MethodDesc>,
}

impl MemberEntry {
    fn is_empty(&self) -> bool {
        self.field.is_none()
            && self.static_field.is_none()
            && self.methods.is_empty()
            && self.static_methods.is_empty()
    }

    /// Whether anything under this name is reachable from an instance
    pub fn has_instance_side(&self) -> bool {
        self.field.is_some() || !self.methods.is_empty()
    }

    /// Whether anything under this name is reachable from the class
    pub fn has_static_side(&self) -> bool {
        self.static_field.is_some() || !self.static_methods.is_empty()
    }
}

/// Resolved metadata for one class: the ancestor descriptor chain,
/// per-declaring-type member sets, and the flattened name lookup.
#[derive(Debug)]
pub struct ClassMeta {
    /// The class this metadata describes
    pub class_id: ClassId,
    /// Class path
    pub path: String,
    /// Whether the class is an interface
    pub is_interface: bool,
    /// Ancestor descriptors: self, superclasses, interfaces, root last
    pub type_chain: Vec<Arc<str>>,
    /// Members keyed by declaring type, chain order
    pub declared: Vec<DeclaredMembers>,
    /// Constructors of the class itself
    pub ctors: Vec<CtorDesc>,
    members: FxHashMap<String, MemberEntry>,
}

impl ClassMeta {
    /// Look up the flattened entry for a member name
    pub fn member(&self, name: &str) -> Option<&MemberEntry> {
        self.members.get(name)
    }

    /// Iterate all flattened member entries
    pub fn members(&self) -> impl Iterator<Item = (&str, &MemberEntry)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Instance methods with no implementation anywhere in the chain.
    /// For an interface this is its full method surface.
    pub fn abstract_methods(&self) -> Vec<&MethodDesc> {
        self.members
            .values()
            .flat_map(|entry| entry.methods.iter())
            .filter(|m| m.is_abstract)
            .collect()
    }
}

/// Per-class metadata cache.
pub struct ReflectionCache {
    cache: DashMap<ClassId, Arc<ClassMeta>>,
}

impl ReflectionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Resolve metadata, building it on first use. Repeated calls return
    /// the same `Arc`.
    pub fn resolve(&self, host: &Host, id: ClassId) -> BridgeResult<Arc<ClassMeta>> {
        match self.cache.entry(id) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let meta = Arc::new(Self::build(host, id)?);
                entry.insert(meta.clone());
                Ok(meta)
            }
        }
    }

    /// Rebuild metadata from the host, replacing the cached entry.
    pub fn reload(&self, host: &Host, id: ClassId) -> BridgeResult<Arc<ClassMeta>> {
        let meta = Arc::new(Self::build(host, id)?);
        self.cache.insert(id, meta.clone());
        Ok(meta)
    }

    fn build(host: &Host, id: ClassId) -> BridgeResult<ClassMeta> {
        let ancestry = host.ancestry(id)?;

        let mut type_chain = Vec::with_capacity(ancestry.len());
        let mut declared = Vec::with_capacity(ancestry.len());
        let mut members: FxHashMap<String, MemberEntry> = FxHashMap::default();

        for &ancestor in &ancestry {
            let path = host.class_path(ancestor)?;
            type_chain.push(class_descriptor(&path));

            let mut fields = Vec::new();
            for f in host.declared_fields(ancestor)? {
                fields.push(FieldDesc {
                    owner: ancestor,
                    name: f.name,
                    ty: f.ty,
                    slot: f.slot,
                    is_static: false,
                });
            }
            for f in host.declared_statics(ancestor)? {
                fields.push(FieldDesc {
                    owner: ancestor,
                    name: f.name,
                    ty: f.ty,
                    slot: f.slot,
                    is_static: true,
                });
            }

            let mut methods = Vec::new();
            for m in host.methods(ancestor)? {
                methods.push(MethodDesc {
                    owner: ancestor,
                    name: m.name,
                    index: m.index,
                    params: m.params,
                    ret: m.ret,
                    is_static: m.is_static,
                    is_abstract: m.is_abstract,
                });
            }

            // Flatten with nearest-declaration shadowing: a field hides a
            // supertype field of the same name; a method replaces a
            // supertype method with an identical parameter signature and
            // otherwise joins the overload set.
            for field in &fields {
                let entry = members.entry(field.name.clone()).or_default();
                let target = if field.is_static {
                    &mut entry.static_field
                } else {
                    &mut entry.field
                };
                if target.is_none() {
                    *target = Some(field.clone());
                }
            }
            for method in &methods {
                let entry = members.entry(method.name.clone()).or_default();
                let overloads = if method.is_static {
                    &mut entry.static_methods
                } else {
                    &mut entry.methods
                };
                if !overloads.iter().any(|m| m.params == method.params) {
                    overloads.push(method.clone());
                }
            }

            declared.push(DeclaredMembers {
                owner: ancestor,
                path,
                fields,
                methods,
            });
        }

        members.retain(|_, entry| !entry.is_empty());

        let ctors = host
            .constructors(id)?
            .into_iter()
            .map(|c| CtorDesc {
                owner: id,
                index: c.index,
                params: c.params,
            })
            .collect();

        Ok(ClassMeta {
            class_id: id,
            path: host.class_path(id)?,
            is_interface: host.is_interface(id)?,
            type_chain,
            declared,
            ctors,
            members,
        })
    }
}

impl Default for ReflectionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::{ClassDef, HostError, Value};

    fn host_with_hierarchy() -> (Host, ClassId) {
        let host = Host::new();
        host.register(
            ClassDef::builder("test/IGreet")
                .interface()
                .abstract_method("greet", vec![], Ty::Str)
                .build(),
        )
        .unwrap();
        host.register(
            ClassDef::builder("test/Base")
                .field("base_field", Ty::Int)
                .static_field("BASE_STATIC", Ty::Int, Value::int(1))
                .constructor(vec![], |_, _, _| Ok(()))
                .method("describe", vec![], Ty::Str, |_, _, _| {
                    Ok(Value::str("base"))
                })
                .build(),
        )
        .unwrap();
        let sub = host
            .register(
                ClassDef::builder("test/Sub")
                    .extends("test/Base")
                    .implements("test/IGreet")
                    .field("sub_field", Ty::Int)
                    .constructor(vec![], |_, _, _| Ok(()))
                    .constructor(vec![Ty::Int], |_, obj, args| {
                        obj.set_field(1, args[0].clone())
                    })
                    .method("describe", vec![], Ty::Str, |_, _, _| {
                        Ok(Value::str("sub"))
                    })
                    .method("describe", vec![Ty::Int], Ty::Str, |_, _, _| {
                        Ok(Value::str("sub-int"))
                    })
                    .method("greet", vec![], Ty::Str, |_, _, _| Ok(Value::str("hi")))
                    .build(),
            )
            .unwrap();
        (host, sub)
    }

    #[test]
    fn test_type_chain_order() {
        let (host, sub) = host_with_hierarchy();
        let cache = ReflectionCache::new();
        let meta = cache.resolve(&host, sub).unwrap();

        let chain: Vec<&str> = meta.type_chain.iter().map(|d| &**d).collect();
        assert_eq!(
            chain,
            vec!["Ltest/Sub;", "Ltest/Base;", "Ltest/IGreet;", "Llang/Object;"]
        );
    }

    #[test]
    fn test_resolution_idempotent() {
        let (host, sub) = host_with_hierarchy();
        let cache = ReflectionCache::new();

        let a = cache.resolve(&host, sub).unwrap();
        let b = cache.resolve(&host, sub).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_reload_is_stable() {
        let (host, sub) = host_with_hierarchy();
        let cache = ReflectionCache::new();

        let first = cache.resolve(&host, sub).unwrap();
        let second = cache.reload(&host, sub).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.type_chain, second.type_chain);
    }

    #[test]
    fn test_inherited_members_visible() {
        let (host, sub) = host_with_hierarchy();
        let cache = ReflectionCache::new();
        let meta = cache.resolve(&host, sub).unwrap();

        let base_field = meta.member("base_field").unwrap();
        assert!(base_field.has_instance_side());
        assert_eq!(base_field.field.as_ref().unwrap().slot, 0);

        let sub_field = meta.member("sub_field").unwrap();
        assert_eq!(sub_field.field.as_ref().unwrap().slot, 1);

        let base_static = meta.member("BASE_STATIC").unwrap();
        assert!(base_static.has_static_side());
        assert!(!base_static.has_instance_side());
    }

    #[test]
    fn test_override_shadows_same_signature() {
        let (host, sub) = host_with_hierarchy();
        let cache = ReflectionCache::new();
        let meta = cache.resolve(&host, sub).unwrap();

        // describe() is overridden (one zero-arg entry, owned by Sub) and
        // overloaded (one int-arg entry).
        let entry = meta.member("describe").unwrap();
        assert_eq!(entry.methods.len(), 2);
        let zero_arg = entry.methods.iter().find(|m| m.params.is_empty()).unwrap();
        assert_eq!(zero_arg.owner, sub);
    }

    #[test]
    fn test_method_descriptors() {
        let (host, sub) = host_with_hierarchy();
        let cache = ReflectionCache::new();
        let meta = cache.resolve(&host, sub).unwrap();

        let entry = meta.member("describe").unwrap();
        let mut descriptors: Vec<String> =
            entry.methods.iter().map(|m| m.descriptor()).collect();
        descriptors.sort();
        assert_eq!(descriptors, vec!["()Llang/String;", "(I)Llang/String;"]);
    }

    #[test]
    fn test_interface_method_implemented() {
        let (host, sub) = host_with_hierarchy();
        let cache = ReflectionCache::new();
        let meta = cache.resolve(&host, sub).unwrap();

        // Sub implements greet, so the concrete entry shadows the
        // abstract interface declaration.
        let entry = meta.member("greet").unwrap();
        assert_eq!(entry.methods.len(), 1);
        assert!(!entry.methods[0].is_abstract);
        assert!(meta.abstract_methods().is_empty());
    }

    #[test]
    fn test_interface_meta() {
        let (host, _) = host_with_hierarchy();
        let cache = ReflectionCache::new();
        let iface = host.lookup_class("test/IGreet").unwrap();
        let meta = cache.resolve(&host, iface).unwrap();

        assert!(meta.is_interface);
        assert_eq!(meta.abstract_methods().len(), 1);
        let chain: Vec<&str> = meta.type_chain.iter().map(|d| &**d).collect();
        assert_eq!(chain, vec!["Ltest/IGreet;", "Llang/Object;"]);
    }

    #[test]
    fn test_ctors_are_own_class_only() {
        let (host, sub) = host_with_hierarchy();
        let cache = ReflectionCache::new();
        let meta = cache.resolve(&host, sub).unwrap();

        assert_eq!(meta.ctors.len(), 2);
        assert!(meta.ctors.iter().all(|c| c.owner == sub));
    }

    #[test]
    fn test_unknown_class_id() {
        let host = Host::new();
        let cache = ReflectionCache::new();
        let err = cache.resolve(&host, 999).unwrap_err();
        assert!(matches!(
            err,
            crate::error::BridgeError::Runtime(HostError::UnknownClassId(_))
        ));
    }
}
