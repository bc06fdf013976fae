//! Heap object instances
//!
//! Objects are slot-addressed field records tied to a class in the host
//! registry. A second object kind carries a proxy id instead of fields:
//! interface sends on it are routed through the registered dispatcher
//! back into foreign (scripting-side) code.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::class::ClassId;
use crate::error::HostError;
use crate::value::Value;

/// Storage behind an object reference.
#[derive(Debug)]
enum ObjectKind {
    /// Ordinary instance: one slot per instance field, inherited slots first
    Fields(Vec<Value>),
    /// Foreign interface implementation, addressed by proxy id
    Proxy(u64),
}

/// Object instance (heap-allocated).
#[derive(Debug)]
pub struct Object {
    /// Concrete runtime class of this instance
    class_id: ClassId,
    kind: ObjectKind,
}

/// Shared, mutable reference to a heap object.
///
/// Equality is pointer identity. Field access takes the inner lock, so
/// references can be shared freely across threads.
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<Object>>);

impl ObjectRef {
    /// Allocate a new instance with `field_count` null-initialized slots.
    pub fn new(class_id: ClassId, field_count: usize) -> Self {
        ObjectRef(Arc::new(RwLock::new(Object {
            class_id,
            kind: ObjectKind::Fields(vec![Value::null(); field_count]),
        })))
    }

    /// Allocate a proxy instance for an interface, carrying the dispatch id.
    pub fn new_proxy(class_id: ClassId, proxy_id: u64) -> Self {
        ObjectRef(Arc::new(RwLock::new(Object {
            class_id,
            kind: ObjectKind::Proxy(proxy_id),
        })))
    }

    /// Concrete runtime class of this instance
    pub fn class_id(&self) -> ClassId {
        self.0.read().class_id
    }

    /// The proxy dispatch id, if this is a proxy instance
    pub fn proxy_id(&self) -> Option<u64> {
        match self.0.read().kind {
            ObjectKind::Proxy(id) => Some(id),
            ObjectKind::Fields(_) => None,
        }
    }

    /// Get a field value by slot index
    pub fn get_field(&self, slot: usize) -> Option<Value> {
        match &self.0.read().kind {
            ObjectKind::Fields(fields) => fields.get(slot).cloned(),
            ObjectKind::Proxy(_) => None,
        }
    }

    /// Set a field value by slot index
    pub fn set_field(&self, slot: usize, value: Value) -> Result<(), HostError> {
        let mut obj = self.0.write();
        let class_id = obj.class_id;
        match &mut obj.kind {
            ObjectKind::Fields(fields) => {
                if slot < fields.len() {
                    fields[slot] = value;
                    Ok(())
                } else {
                    Err(HostError::SlotOutOfBounds {
                        class: format!("#{}", class_id),
                        slot,
                    })
                }
            }
            ObjectKind::Proxy(_) => Err(HostError::SlotOutOfBounds {
                class: format!("#{}", class_id),
                slot,
            }),
        }
    }

    /// Number of field slots (zero for proxies)
    pub fn field_count(&self) -> usize {
        match &self.0.read().kind {
            ObjectKind::Fields(fields) => fields.len(),
            ObjectKind::Proxy(_) => 0,
        }
    }

    /// Stable address for identity and diagnostics
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let obj = self.0.read();
        match &obj.kind {
            ObjectKind::Fields(fields) => write!(
                f,
                "ObjectRef(class={}, fields={}, addr={:#x})",
                obj.class_id,
                fields.len(),
                self.addr()
            ),
            ObjectKind::Proxy(id) => write!(
                f,
                "ObjectRef(class={}, proxy={}, addr={:#x})",
                obj.class_id,
                id,
                self.addr()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_creation() {
        let obj = ObjectRef::new(3, 2);
        assert_eq!(obj.class_id(), 3);
        assert_eq!(obj.field_count(), 2);
        assert_eq!(obj.proxy_id(), None);
    }

    #[test]
    fn test_field_access() {
        let obj = ObjectRef::new(0, 2);

        obj.set_field(0, Value::int(42)).unwrap();
        obj.set_field(1, Value::str("x")).unwrap();

        assert_eq!(obj.get_field(0), Some(Value::int(42)));
        assert_eq!(obj.get_field(1), Some(Value::str("x")));
    }

    #[test]
    fn test_field_defaults_to_null() {
        let obj = ObjectRef::new(0, 1);
        assert_eq!(obj.get_field(0), Some(Value::null()));
    }

    #[test]
    fn test_field_bounds() {
        let obj = ObjectRef::new(0, 2);
        assert!(obj.set_field(2, Value::null()).is_err());
        assert_eq!(obj.get_field(10), None);
    }

    #[test]
    fn test_proxy_object() {
        let proxy = ObjectRef::new_proxy(7, 99);
        assert_eq!(proxy.class_id(), 7);
        assert_eq!(proxy.proxy_id(), Some(99));
        assert_eq!(proxy.field_count(), 0);
        assert!(proxy.set_field(0, Value::null()).is_err());
    }

    #[test]
    fn test_identity() {
        let a = ObjectRef::new(0, 0);
        let b = a.clone();
        let c = ObjectRef::new(0, 0);

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(a.addr(), b.addr());
    }

    #[test]
    fn test_shared_mutation() {
        let a = ObjectRef::new(0, 1);
        let b = a.clone();

        a.set_field(0, Value::int(5)).unwrap();
        assert_eq!(b.get_field(0), Some(Value::int(5)));
    }
}
