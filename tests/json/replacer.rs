//! The replacer argument: allow-lists and callbacks

use quirks_foundation::Value;

use crate::{heap, json};

#[test]
fn array_replacer_is_an_allow_list() {
    let mut heap = heap();
    let child = heap.create_record([("secret", Value::from("x"))]);
    let record = heap.create_record([
        ("public", Value::Bool(true)),
        ("secret", Value::from("hunter2")),
        ("child", Value::Object(child)),
    ]);
    let allow = Value::Object(heap.create_array([Value::from("public"), Value::from("child")]));

    assert_eq!(
        json(&mut heap, &Value::Object(record), &allow, &Value::Undefined).as_deref(),
        Some(r#"{"public":true,"child":{}}"#)
    );
}

#[test]
fn function_replacer_can_drop_keys() {
    let mut heap = heap();
    let record = heap.create_record([
        ("public", Value::Bool(true)),
        ("secret", Value::from("hunter2")),
    ]);
    let replacer = heap.native_function("replacer", |_heap, _this, args| {
        let key = args.first().and_then(Value::as_str);
        let value = args.get(1).cloned().unwrap_or(Value::Undefined);
        Ok(if key == Some("secret") { Value::Undefined } else { value })
    });

    assert_eq!(
        json(&mut heap, &Value::Object(record), &replacer, &Value::Undefined).as_deref(),
        Some(r#"{"public":true}"#)
    );
}

#[test]
fn function_replacer_sees_array_indices_as_string_keys() {
    let mut heap = heap();
    let array = Value::Object(heap.create_array([Value::from(1), Value::from(2), Value::from(3)]));
    let record = heap.create_record([("x", array)]);
    let replacer = heap.native_function("replacer", |_heap, _this, args| {
        let key = args.first().and_then(Value::as_str);
        let value = args.get(1).cloned().unwrap_or(Value::Undefined);
        Ok(if key == Some("1") { Value::Undefined } else { value })
    });

    assert_eq!(
        json(&mut heap, &Value::Object(record), &replacer, &Value::Undefined).as_deref(),
        Some(r#"{"x":[1,null,3]}"#)
    );
}

#[test]
fn function_replacer_is_called_first_with_the_empty_key() {
    let mut heap = heap();
    let record = heap.create_record([("a", Value::from(1))]);
    let replacer = heap.native_function("replacer", |heap, _this, args| {
        let key = args.first().and_then(Value::as_str);
        if key == Some("") {
            return Ok(Value::Object(heap.create_record([("c", Value::from("hi"))])));
        }
        Ok(args.get(1).cloned().unwrap_or(Value::Undefined))
    });

    assert_eq!(
        json(&mut heap, &Value::Object(record), &replacer, &Value::Undefined).as_deref(),
        Some(r#"{"c":"hi"}"#)
    );
}
