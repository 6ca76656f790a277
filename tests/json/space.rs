//! The space argument

use quirks_foundation::Value;

use crate::{heap, json};

#[test]
fn numeric_space_indents_with_spaces() {
    let mut heap = heap();
    let record = heap.create_record([("a", Value::Bool(true))]);
    assert_eq!(
        json(&mut heap, &Value::Object(record), &Value::Null, &Value::from(2)).as_deref(),
        Some("{\n  \"a\": true\n}")
    );
}

#[test]
fn string_space_is_used_verbatim() {
    let mut heap = heap();
    let record = heap.create_record([("a", Value::Bool(true))]);
    assert_eq!(
        json(&mut heap, &Value::Object(record), &Value::Null, &Value::from("***")).as_deref(),
        Some("{\n***\"a\": true\n}")
    );
}

#[test]
fn space_is_capped_at_ten() {
    let mut heap = heap();
    let record = heap.create_record([("a", Value::Bool(true))]);
    let out = json(&mut heap, &Value::Object(record), &Value::Null, &Value::from(20)).unwrap();
    assert_eq!(out, format!("{{\n{}\"a\": true\n}}", " ".repeat(10)));
}
