//! ToBoolean: used when a non-boolean value is coerced to a boolean

use quirks_coercion::builtins;
use quirks_foundation::Value;
use quirks_runtime::{Realm, RealmConfig};

#[test]
fn falsy_values_become_false() {
    let realm = Realm::new(RealmConfig::browser()).unwrap();
    let all = realm.document_all().unwrap().clone();
    let falsy = [
        Value::Number(0.0),
        Value::Number(-0.0),
        Value::Number(f64::NAN),
        Value::from(""),
        Value::Null,
        Value::Undefined,
        all,
    ];
    for value in &falsy {
        assert_eq!(builtins::boolean(realm.heap(), value), Value::Bool(false), "{value:?}");
    }
}

#[test]
fn everything_else_becomes_true() {
    let mut realm = Realm::new(RealmConfig::node()).unwrap();
    let array = Value::Object(realm.heap_mut().create_array(Vec::<Value>::new()));
    let object = Value::Object(realm.heap_mut().create_object());
    let arrow = realm.native_function("", |_heap, _this, _args| Ok(Value::Undefined));
    for value in [&array, &object, &arrow] {
        assert_eq!(builtins::boolean(realm.heap(), value), Value::Bool(true));
    }
}
