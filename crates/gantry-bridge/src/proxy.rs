//! Dynamic interface implementations
//!
//! A proxy is a hosted object whose method bodies live on the scripting
//! side. `ProxyBuilder` collects one handler closure per interface method
//! and registers the finished set in the bridge's proxy table; the host
//! object carries only the table key. When hosted code calls through the
//! interface, the host routes to `BridgeDispatcher`, which looks up the
//! handler, marshals the arguments inbound, and marshals the result back
//! out against the declared return type.
//!
//! Registration is permanent for the lifetime of the bridge: hosted code
//! may retain a proxy reference indefinitely, so dropping the script-side
//! `ProxyInstance` never removes the table entry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use gantry_core::{ClassId, HostError, HostResult, ProxyDispatcher, Ty, Value};
use rustc_hash::FxHashMap;

use crate::error::{BridgeError, BridgeResult};
use crate::handle::BridgeShared;
use crate::marshal::{from_host, to_host};
use crate::reflect::ClassMeta;
use crate::value::ScriptValue;

/// Script-side handler for one interface method.
pub type ProxyMethod = Arc<dyn Fn(&[ScriptValue]) -> BridgeResult<ScriptValue> + Send + Sync>;

struct ProxyEntry {
    interface: Arc<ClassMeta>,
    methods: FxHashMap<String, ProxyMethod>,
}

/// Registry of live proxies, keyed by the id stored on the host object.
pub(crate) struct ProxyTable {
    entries: DashMap<u64, Arc<ProxyEntry>>,
    next_id: AtomicU64,
}

impl ProxyTable {
    pub(crate) fn new() -> Self {
        ProxyTable {
            entries: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    fn register(&self, entry: Arc<ProxyEntry>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(id, entry);
        id
    }

    fn get(&self, id: u64) -> Option<Arc<ProxyEntry>> {
        self.entries.get(&id).map(|e| Arc::clone(e.value()))
    }
}

/// Collects method handlers for one interface before registration.
pub struct ProxyBuilder {
    shared: Arc<BridgeShared>,
    interface: Arc<ClassMeta>,
    methods: FxHashMap<String, ProxyMethod>,
}

impl ProxyBuilder {
    pub(crate) fn new(shared: Arc<BridgeShared>, interface: Arc<ClassMeta>) -> Self {
        ProxyBuilder {
            shared,
            interface,
            methods: FxHashMap::default(),
        }
    }

    /// Supply the handler for one interface method.
    pub fn method<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&[ScriptValue]) -> BridgeResult<ScriptValue> + Send + Sync + 'static,
    {
        self.methods.insert(name.to_string(), Arc::new(handler));
        self
    }

    /// Validate coverage, register the handler set, and mint the hosted
    /// proxy object.
    pub fn build(self) -> BridgeResult<ProxyInstance> {
        for name in self.methods.keys() {
            let declared = self
                .interface
                .member(name)
                .map(|entry| !entry.methods.is_empty())
                .unwrap_or(false);
            if !declared {
                return Err(BridgeError::NoSuchAttribute {
                    class: self.interface.path.clone(),
                    name: name.clone(),
                });
            }
        }
        for method in self.interface.abstract_methods() {
            if !self.methods.contains_key(&method.name) {
                return Err(BridgeError::UnimplementedMethod {
                    interface: self.interface.path.clone(),
                    method: method.name.clone(),
                });
            }
        }

        let entry = Arc::new(ProxyEntry {
            interface: Arc::clone(&self.interface),
            methods: self.methods,
        });
        let id = self.shared.proxies.register(entry);
        let value = self.shared.host.new_proxy(self.interface.class_id, id)?;
        Ok(ProxyInstance {
            id,
            interface: self.interface,
            value,
        })
    }
}

/// A registered dynamic implementation of a hosted interface.
#[derive(Clone, Debug)]
pub struct ProxyInstance {
    id: u64,
    interface: Arc<ClassMeta>,
    value: Value,
}

impl ProxyInstance {
    /// Table id carried by the hosted object
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Implemented interface path
    pub fn interface_path(&self) -> &str {
        &self.interface.path
    }

    /// Host class id of the implemented interface
    pub fn interface_id(&self) -> ClassId {
        self.interface.class_id
    }

    pub(crate) fn raw(&self) -> &Value {
        &self.value
    }
}

/// The host's reverse-dispatch target, installed once per bridge.
///
/// Holds the bridge state weakly; the bridge owns the dispatcher through
/// the host, and a strong reference here would keep both alive forever.
pub(crate) struct BridgeDispatcher {
    shared: Weak<BridgeShared>,
}

impl BridgeDispatcher {
    pub(crate) fn new(shared: Weak<BridgeShared>) -> Self {
        BridgeDispatcher { shared }
    }
}

impl ProxyDispatcher for BridgeDispatcher {
    fn dispatch(&self, proxy_id: u64, method: &str, args: &[Value]) -> HostResult<Value> {
        let shared = self.shared.upgrade().ok_or(HostError::NoDispatcher)?;
        let entry = shared.proxies.get(proxy_id).ok_or_else(|| {
            HostError::Thrown(format!("proxy #{} is no longer registered", proxy_id))
        })?;
        let handler = entry.methods.get(method).ok_or_else(|| HostError::NoSuchMember {
            class: entry.interface.path.clone(),
            name: method.to_string(),
        })?;

        let mut script_args = Vec::with_capacity(args.len());
        for arg in args {
            script_args.push(from_host(&shared, arg.clone()).map_err(into_host_error)?);
        }
        let out = handler(&script_args).map_err(into_host_error)?;

        let ret = entry
            .interface
            .member(method)
            .and_then(|e| e.methods.iter().find(|m| m.params.len() == args.len()))
            .map(|m| m.ret.clone());
        match ret {
            Some(Ty::Void) | None => Ok(Value::null()),
            Some(ty) => to_host(&shared, &out, &ty).map_err(into_host_error),
        }
    }
}

/// Handler failures cross back into the host as hosted errors; native
/// runtime errors pass through unchanged.
fn into_host_error(err: BridgeError) -> HostError {
    match err {
        BridgeError::Runtime(host) => host,
        other => HostError::Thrown(other.to_string()),
    }
}
