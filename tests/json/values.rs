//! Which values have a JSON form, and what happens to the ones that don't

use quirks_coercion::builtins;
use quirks_foundation::{ErrorName, Value};
use quirks_json::stringify_value;

use crate::heap;

#[test]
fn safe_values_serialize() {
    let mut heap = heap();
    let empty = Value::Object(heap.create_array(Vec::new()));
    let cases = [
        (Value::from(42), "42"),
        (Value::Null, "null"),
        (Value::Bool(true), "true"),
        (empty.clone(), "[]"),
        (Value::from("42"), "\"42\""),
    ];
    for (value, expected) in &cases {
        assert_eq!(stringify_value(&mut heap, value).unwrap().as_deref(), Some(*expected));
    }

    let mixed = Value::Object(heap.create_array([
        Value::from(42),
        Value::Null,
        Value::Bool(true),
        empty,
        Value::from("42"),
    ]));
    assert_eq!(
        stringify_value(&mut heap, &mixed).unwrap().as_deref(),
        Some(r#"[42,null,true,[],"42"]"#)
    );
}

#[test]
fn unsafe_values_at_the_top_level_have_no_result() {
    let mut heap = heap();
    let f = heap.native_function("f", |_heap, _this, _args| Ok(Value::Undefined));
    let sym = Value::Symbol(heap.symbols_mut().create(Some("test")));
    for value in [Value::Undefined, f, sym] {
        assert_eq!(stringify_value(&mut heap, &value).unwrap(), None);
    }
}

#[test]
fn unsafe_values_become_null_in_arrays() {
    let mut heap = heap();
    let f = heap.native_function("f", |_heap, _this, _args| Ok(Value::Undefined));
    let sym = Value::Symbol(heap.symbols_mut().create(Some("test")));
    let array = Value::Object(heap.create_array([
        Value::from(1),
        Value::Undefined,
        f,
        sym,
        Value::from(5),
    ]));
    assert_eq!(
        stringify_value(&mut heap, &array).unwrap().as_deref(),
        Some("[1,null,null,null,5]")
    );
}

#[test]
fn unsafe_values_are_dropped_from_objects() {
    let mut heap = heap();
    let f = heap.native_function("f", |_heap, _this, _args| Ok(Value::Undefined));
    let sym = Value::Symbol(heap.symbols_mut().create(Some("test")));
    let empty = Value::Object(heap.create_array(Vec::new()));
    let record = heap.create_record([
        ("a", Value::from(1)),
        ("b", Value::Undefined),
        ("c", f),
        ("d", sym),
        ("e", empty),
    ]);
    assert_eq!(
        stringify_value(&mut heap, &Value::Object(record)).unwrap().as_deref(),
        Some(r#"{"a":1,"e":[]}"#)
    );
}

#[test]
fn error_objects_serialize_as_empty_records() {
    let mut heap = heap();
    let error = Value::Object(heap.create_error(ErrorName::Error, Some("x")));
    assert_eq!(stringify_value(&mut heap, &error).unwrap().as_deref(), Some("{}"));

    let type_error = builtins::error(&mut heap, ErrorName::TypeError, &Value::from("y")).unwrap();
    let record = heap.create_record([("e", type_error)]);
    assert_eq!(
        stringify_value(&mut heap, &Value::Object(record)).unwrap().as_deref(),
        Some(r#"{"e":{}}"#)
    );
}

// =============================================================================
// Cycles
// =============================================================================

#[test]
fn cycles_are_a_type_error() {
    let mut heap = heap();
    let o = heap.create_object();
    let a = heap.create_record([("b", Value::from(42)), ("c", Value::Object(o))]);
    heap.set(o, "e", Value::Object(a)).unwrap();

    let err = stringify_value(&mut heap, &Value::Object(a)).unwrap_err();
    assert_eq!(err.error_name(), Some(ErrorName::TypeError));
}

#[test]
fn to_json_can_break_a_cycle() {
    let mut heap = heap();
    let o = heap.create_object();
    let a = heap.create_record([("b", Value::from(42)), ("c", Value::Object(o))]);
    heap.set(o, "e", Value::Object(a)).unwrap();

    let to_json = heap.native_function("toJSON", |heap, _this, _args| {
        Ok(Value::Object(heap.create_record([("y", Value::from("has cycles!"))])))
    });
    heap.set(a, "toJSON", to_json).unwrap();

    assert_eq!(
        stringify_value(&mut heap, &Value::Object(a)).unwrap().as_deref(),
        Some(r#"{"y":"has cycles!"}"#)
    );
}
