//! Hosted class fixtures shared by the integration tests
//!
//! Registers a small class hierarchy on a fresh host:
//!
//! ```text
//! lang/Object
//!  ├── test/BaseExample          base_int_field + accessors
//!  │    └── test/Example         int_field, statics, callbacks, overloaded ctors
//!  ├── test/Thing                named object with a toString override
//!  ├── test/ICallback            interface: poke / peek
//!  ├── test/AbstractCallback     interface extending ICallback
//!  └── test/Example$Inner        nested class holding a constant
//! ```

use std::sync::Arc;

use gantry_bridge::Bridge;
use gantry_core::{ClassDef, Host, HostError, Ty, Value};

// Absolute field slots. BaseExample declares slot 0; Example appends.
const BASE_INT_FIELD: usize = 0;
const INT_FIELD: usize = 1;
const CALLBACK: usize = 2;
const THING: usize = 3;

fn base_example() -> ClassDef {
    ClassDef::builder("test/BaseExample")
        .field("base_int_field", Ty::Int)
        .constructor(vec![], |_, obj, _| obj.set_field(BASE_INT_FIELD, Value::int(22)))
        .constructor(vec![Ty::Int], |_, obj, args| {
            obj.set_field(BASE_INT_FIELD, args[0].clone())
        })
        .method("get_base_int_field", vec![], Ty::Int, |_, recv, _| {
            Ok(recv.and_then(|o| o.get_field(BASE_INT_FIELD)).unwrap_or_default())
        })
        .method("set_base_int_field", vec![Ty::Int], Ty::Void, |_, recv, args| {
            let obj = recv.ok_or_else(|| HostError::NotAnObject("null".into()))?;
            obj.set_field(BASE_INT_FIELD, args[0].clone())?;
            Ok(Value::null())
        })
        .build()
}

fn example() -> ClassDef {
    ClassDef::builder("test/Example")
        .extends("test/BaseExample")
        .field("int_field", Ty::Int)
        .field("callback", Ty::object("test/ICallback"))
        .field("thing", Ty::object("test/Thing"))
        .static_field("static_int_field", Ty::Int, Value::int(11))
        .constructor(vec![], |_, obj, _| {
            obj.set_field(BASE_INT_FIELD, Value::int(22))?;
            obj.set_field(INT_FIELD, Value::int(33))
        })
        .constructor(vec![Ty::Int], |_, obj, args| {
            obj.set_field(BASE_INT_FIELD, Value::int(44))?;
            obj.set_field(INT_FIELD, args[0].clone())
        })
        .constructor(vec![Ty::Int, Ty::Int], |_, obj, args| {
            obj.set_field(BASE_INT_FIELD, args[0].clone())?;
            obj.set_field(INT_FIELD, args[1].clone())
        })
        .method("get_int_field", vec![], Ty::Int, |_, recv, _| {
            Ok(recv.and_then(|o| o.get_field(INT_FIELD)).unwrap_or_default())
        })
        .method("set_int_field", vec![Ty::Int], Ty::Void, |_, recv, args| {
            let obj = recv.ok_or_else(|| HostError::NotAnObject("null".into()))?;
            obj.set_field(INT_FIELD, args[0].clone())?;
            Ok(Value::null())
        })
        .method("duplicate_string", vec![Ty::Str], Ty::Str, |_, _, args| {
            let s = args[0].as_str().unwrap_or_default();
            Ok(Value::str(format!("{}{}", s, s)))
        })
        .method("area_of_square", vec![Ty::Float], Ty::Float, |_, _, args| {
            let side = args[0].as_float().unwrap_or_default();
            Ok(Value::float(side * side))
        })
        .method("area_of_circle", vec![Ty::Double], Ty::Double, |_, _, args| {
            let radius = args[0].as_double().unwrap_or_default();
            Ok(Value::double(radius * std::f64::consts::PI))
        })
        .method(
            "set_thing",
            vec![Ty::object("test/Thing")],
            Ty::Void,
            |_, recv, args| {
                let obj = recv.ok_or_else(|| HostError::NotAnObject("null".into()))?;
                obj.set_field(THING, args[0].clone())?;
                Ok(Value::null())
            },
        )
        // Declared to return the root type; callers still get the
        // concrete stored object back.
        .method("get_thing", vec![], Ty::object("lang/Object"), |_, recv, _| {
            Ok(recv.and_then(|o| o.get_field(THING)).unwrap_or_default())
        })
        .method(
            "set_callback",
            vec![Ty::object("test/ICallback")],
            Ty::Void,
            |_, recv, args| {
                let obj = recv.ok_or_else(|| HostError::NotAnObject("null".into()))?;
                obj.set_field(CALLBACK, args[0].clone())?;
                Ok(Value::null())
            },
        )
        .method("test_poke", vec![Ty::Int], Ty::Void, |host, recv, args| {
            let obj = recv.ok_or_else(|| HostError::NotAnObject("null".into()))?;
            let callback = obj.get_field(CALLBACK).unwrap_or_default();
            let me = Value::object(obj.clone());
            host.invoke_interface(&callback, "poke", &[me, args[0].clone()])?;
            Ok(Value::null())
        })
        .method("test_peek", vec![Ty::Int], Ty::Void, |host, recv, args| {
            let obj = recv.ok_or_else(|| HostError::NotAnObject("null".into()))?;
            let callback = obj.get_field(CALLBACK).unwrap_or_default();
            let me = Value::object(obj.clone());
            host.invoke_interface(&callback, "peek", &[me, args[0].clone()])?;
            Ok(Value::null())
        })
        .method("explode", vec![], Ty::Void, |_, _, _| {
            Err(HostError::Thrown("Look out!".to_string()))
        })
        .static_method("get_static_int_field", vec![], Ty::Int, |host, _, _| {
            let id = host.lookup_class("test/Example")?;
            host.get_static(id, 0)
        })
        .static_method(
            "set_static_int_field",
            vec![Ty::Int],
            Ty::Void,
            |host, _, args| {
                let id = host.lookup_class("test/Example")?;
                host.set_static(id, 0, args[0].clone())?;
                Ok(Value::null())
            },
        )
        .build()
}

fn thing() -> ClassDef {
    ClassDef::builder("test/Thing")
        .field("name", Ty::Str)
        .constructor(vec![Ty::Str], |_, obj, args| obj.set_field(0, args[0].clone()))
        .method("toString", vec![], Ty::Str, |_, recv, _| {
            let name = recv
                .and_then(|o| o.get_field(0))
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            Ok(Value::str(format!("This is {}", name)))
        })
        .build()
}

fn icallback() -> ClassDef {
    ClassDef::builder("test/ICallback")
        .interface()
        .abstract_method("poke", vec![Ty::object("test/Example"), Ty::Int], Ty::Void)
        .abstract_method("peek", vec![Ty::object("test/Example"), Ty::Int], Ty::Void)
        .build()
}

fn abstract_callback() -> ClassDef {
    ClassDef::builder("test/AbstractCallback")
        .interface()
        .implements("test/ICallback")
        .build()
}

fn inner() -> ClassDef {
    ClassDef::builder("test/Example$Inner")
        .static_field("INNER_CONSTANT", Ty::Int, Value::int(1234))
        .constructor(vec![], |_, _, _| Ok(()))
        .static_method("the_answer", vec![], Ty::Int, |_, _, _| Ok(Value::int(42)))
        .static_method("the_answer", vec![Ty::Int], Ty::Int, |_, _, args| {
            let n = args[0].as_int().unwrap_or_default();
            Ok(Value::int(42 * n))
        })
        .build()
}

/// Fresh host with the full fixture hierarchy registered.
pub fn host() -> Arc<Host> {
    let host = Host::new();
    for def in [
        base_example(),
        icallback(),
        abstract_callback(),
        example(),
        thing(),
        inner(),
    ] {
        host.register(def).unwrap();
    }
    Arc::new(host)
}

/// Bridge connected to a fresh fixture host.
pub fn bridge() -> Bridge {
    Bridge::new(host())
}
