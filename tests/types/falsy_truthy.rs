//! Falsy and truthy values

use quirks_coercion::{bootstrap, builtins, to_boolean};
use quirks_foundation::Value;
use quirks_runtime::{Realm, RealmConfig};

// =============================================================================
// Falsy Values
// =============================================================================

#[test]
fn false_is_falsy() {
    let heap = bootstrap().unwrap();
    assert!(!to_boolean(&heap, &Value::Bool(false)));
}

#[test]
fn positive_zero_is_falsy() {
    let heap = bootstrap().unwrap();
    assert!(!to_boolean(&heap, &Value::Number(0.0)));
}

#[test]
fn negative_zero_is_falsy() {
    let heap = bootstrap().unwrap();
    assert!(!to_boolean(&heap, &Value::Number(-0.0)));
}

#[test]
fn nan_is_falsy() {
    let heap = bootstrap().unwrap();
    assert!(!to_boolean(&heap, &Value::Number(f64::NAN)));
}

#[test]
fn empty_string_is_falsy() {
    let heap = bootstrap().unwrap();
    assert!(!to_boolean(&heap, &Value::from("")));
}

#[test]
fn null_is_falsy() {
    let heap = bootstrap().unwrap();
    assert!(!to_boolean(&heap, &Value::Null));
}

#[test]
fn undefined_is_falsy() {
    let heap = bootstrap().unwrap();
    assert!(!to_boolean(&heap, &Value::Undefined));
}

#[test]
fn document_all_is_falsy() {
    let realm = Realm::new(RealmConfig::browser()).unwrap();
    let all = realm.document_all().unwrap();
    assert!(!to_boolean(realm.heap(), all));
}

// =============================================================================
// Truthy Values
// =============================================================================

#[test]
fn true_is_truthy() {
    let heap = bootstrap().unwrap();
    assert!(to_boolean(&heap, &Value::Bool(true)));
}

#[test]
fn one_is_truthy() {
    let heap = bootstrap().unwrap();
    assert!(to_boolean(&heap, &Value::from(1)));
}

#[test]
fn non_empty_strings_are_truthy() {
    let heap = bootstrap().unwrap();
    assert!(to_boolean(&heap, &Value::from("0")));
    assert!(to_boolean(&heap, &Value::from("abc")));
}

#[test]
fn arrays_are_truthy_even_when_empty() {
    let mut heap = bootstrap().unwrap();
    let empty = Value::Object(heap.create_array([]));
    let full = Value::Object(heap.create_array([1, 2, 3].map(Value::from)));
    assert!(to_boolean(&heap, &empty));
    assert!(to_boolean(&heap, &full));
}

#[test]
fn objects_are_truthy() {
    let mut heap = bootstrap().unwrap();
    let object = Value::Object(heap.create_object());
    assert!(to_boolean(&heap, &object));
}

#[test]
fn functions_are_truthy() {
    let mut heap = bootstrap().unwrap();
    let f = heap.native_function("f", |_heap, _this, _args| Ok(Value::Undefined));
    assert!(to_boolean(&heap, &f));
}

#[test]
fn symbols_are_truthy() {
    let mut heap = bootstrap().unwrap();
    let sym = builtins::symbol(&mut heap, &Value::Undefined).unwrap();
    assert!(to_boolean(&heap, &sym));
}
