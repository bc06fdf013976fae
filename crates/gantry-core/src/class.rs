//! Class definitions and the registration builder
//!
//! A `ClassDef` describes one class before registration: its place in the
//! type hierarchy (by path name, so supertypes must be registered first),
//! its declared fields, and its constructors and methods with Rust
//! closure bodies. Interface methods carry no body.

use std::sync::Arc;

use crate::error::HostError;
use crate::host::Host;
use crate::object::ObjectRef;
use crate::ty::Ty;
use crate::value::Value;

/// Class id (index into the host registry)
pub type ClassId = usize;

/// Path of the root class every chain terminates at.
pub const ROOT_CLASS: &str = "lang/Object";

/// Constructor body: initializes the freshly allocated instance.
pub type CtorBody =
    Arc<dyn Fn(&Host, &ObjectRef, &[Value]) -> Result<(), HostError> + Send + Sync>;

/// Method body. Instance methods receive `Some(receiver)`, static
/// methods `None`.
pub type MethodBody =
    Arc<dyn Fn(&Host, Option<&ObjectRef>, &[Value]) -> Result<Value, HostError> + Send + Sync>;

/// Declared instance field
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: Ty,
}

/// Declared static field with its initial value
#[derive(Debug, Clone)]
pub struct StaticFieldDef {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: Ty,
    /// Value the slot holds at registration
    pub init: Value,
}

/// Declared constructor
#[derive(Clone)]
pub struct CtorDef {
    /// Parameter types
    pub params: Vec<Ty>,
    /// Initialization body
    pub body: CtorBody,
}

/// Declared method
#[derive(Clone)]
pub struct MethodDef {
    /// Method name (overloads share it)
    pub name: String,
    /// Parameter types
    pub params: Vec<Ty>,
    /// Return type
    pub ret: Ty,
    /// Static methods take no receiver
    pub is_static: bool,
    /// `None` for abstract/interface methods
    pub body: Option<MethodBody>,
}

/// One class, ready for registration with [`Host::register`].
pub struct ClassDef {
    /// Slash-separated path, `$` for inner classes
    pub path: String,
    /// Superclass path (`None` only for the root class)
    pub superclass: Option<String>,
    /// Implemented interface paths, in declaration order
    pub interfaces: Vec<String>,
    /// Interfaces have no fields or constructors and bodyless methods
    pub is_interface: bool,
    /// Declared instance fields (slots are assigned after inherited ones)
    pub fields: Vec<FieldDef>,
    /// Declared static fields
    pub statics: Vec<StaticFieldDef>,
    /// Declared constructors
    pub ctors: Vec<CtorDef>,
    /// Declared methods
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    /// Start building a class rooted at `lang/Object`.
    pub fn builder(path: impl Into<String>) -> ClassDefBuilder {
        ClassDefBuilder {
            def: ClassDef {
                path: path.into(),
                superclass: Some(ROOT_CLASS.to_string()),
                interfaces: Vec::new(),
                is_interface: false,
                fields: Vec::new(),
                statics: Vec::new(),
                ctors: Vec::new(),
                methods: Vec::new(),
            },
        }
    }
}

/// Fluent builder for [`ClassDef`].
pub struct ClassDefBuilder {
    def: ClassDef,
}

impl ClassDefBuilder {
    /// Set the superclass path
    pub fn extends(mut self, path: impl Into<String>) -> Self {
        self.def.superclass = Some(path.into());
        self
    }

    /// Add an implemented interface
    pub fn implements(mut self, path: impl Into<String>) -> Self {
        self.def.interfaces.push(path.into());
        self
    }

    /// Mark this class as an interface
    pub fn interface(mut self) -> Self {
        self.def.is_interface = true;
        self
    }

    /// Declare an instance field
    pub fn field(mut self, name: &str, ty: Ty) -> Self {
        self.def.fields.push(FieldDef {
            name: name.to_string(),
            ty,
        });
        self
    }

    /// Declare a static field with an initial value
    pub fn static_field(mut self, name: &str, ty: Ty, init: Value) -> Self {
        self.def.statics.push(StaticFieldDef {
            name: name.to_string(),
            ty,
            init,
        });
        self
    }

    /// Declare a constructor
    pub fn constructor(
        mut self,
        params: Vec<Ty>,
        body: impl Fn(&Host, &ObjectRef, &[Value]) -> Result<(), HostError> + Send + Sync + 'static,
    ) -> Self {
        self.def.ctors.push(CtorDef {
            params,
            body: Arc::new(body),
        });
        self
    }

    /// Declare an instance method
    pub fn method(
        mut self,
        name: &str,
        params: Vec<Ty>,
        ret: Ty,
        body: impl Fn(&Host, Option<&ObjectRef>, &[Value]) -> Result<Value, HostError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.def.methods.push(MethodDef {
            name: name.to_string(),
            params,
            ret,
            is_static: false,
            body: Some(Arc::new(body)),
        });
        self
    }

    /// Declare a static method
    pub fn static_method(
        mut self,
        name: &str,
        params: Vec<Ty>,
        ret: Ty,
        body: impl Fn(&Host, Option<&ObjectRef>, &[Value]) -> Result<Value, HostError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.def.methods.push(MethodDef {
            name: name.to_string(),
            params,
            ret,
            is_static: true,
            body: Some(Arc::new(body)),
        });
        self
    }

    /// Declare a bodyless method (interface or abstract)
    pub fn abstract_method(mut self, name: &str, params: Vec<Ty>, ret: Ty) -> Self {
        self.def.methods.push(MethodDef {
            name: name.to_string(),
            params,
            ret,
            is_static: false,
            body: None,
        });
        self
    }

    /// Finish the definition
    pub fn build(mut self) -> ClassDef {
        if self.def.is_interface && self.def.path != ROOT_CLASS {
            // Interfaces still sit under the root in the type chain.
            self.def.superclass = Some(ROOT_CLASS.to_string());
        }
        self.def
    }
}
