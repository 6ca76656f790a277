//! Abstract conversion operations.

use std::sync::Arc;

use quirks_foundation::{
    Error, Heap, PropertyKey, Result, Value, number_to_string, string_to_number,
};

use crate::primitive::{Hint, to_primitive};

/// `ToBoolean`.
///
/// Falsy values are `false`, `+0`, `-0`, `NaN`, `""`, `null`, `undefined`
/// and `document.all`; everything else is truthy.
#[must_use]
pub fn to_boolean(heap: &Heap, value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => !(*n == 0.0 || n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Symbol(_) => true,
        Value::Object(_) => !heap.is_html_dda(value),
    }
}

/// `ToNumber`.
pub fn to_number(heap: &mut Heap, value: &Value) -> Result<f64> {
    match value {
        Value::Undefined => Ok(f64::NAN),
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Ok(*n),
        Value::String(s) => Ok(string_to_number(s)),
        Value::Symbol(_) => Err(Error::type_error(
            "Cannot convert a Symbol value to a number",
        )),
        Value::Object(_) => {
            let primitive = to_primitive(heap, value, Hint::Number)?;
            to_number(heap, &primitive)
        }
    }
}

/// `ToIntegerOrInfinity`: truncates toward zero, maps NaN to 0.
pub fn to_integer_or_infinity(heap: &mut Heap, value: &Value) -> Result<f64> {
    let n = to_number(heap, value)?;
    if n.is_nan() || n == 0.0 {
        return Ok(0.0);
    }
    Ok(n.trunc())
}

/// Converts an array-like `length` to an element count, clamped to the
/// array index range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_length(heap: &mut Heap, length: &Value) -> Result<u32> {
    let n = to_integer_or_infinity(heap, length)?;
    Ok(if n <= 0.0 {
        0
    } else {
        n.min(f64::from(u32::MAX)) as u32
    })
}

/// `ToString`.
///
/// Symbols cannot be converted implicitly and raise `TypeError`; use
/// [`crate::builtins::string`] for the explicit `String(symbol)` form.
pub fn to_string(heap: &mut Heap, value: &Value) -> Result<Arc<str>> {
    match value {
        Value::Undefined => Ok("undefined".into()),
        Value::Null => Ok("null".into()),
        Value::Bool(b) => Ok(if *b { "true" } else { "false" }.into()),
        Value::Number(n) => Ok(number_to_string(*n).into()),
        Value::String(s) => Ok(s.clone()),
        Value::Symbol(_) => Err(Error::type_error(
            "Cannot convert a Symbol value to a string",
        )),
        Value::Object(_) => {
            let primitive = to_primitive(heap, value, Hint::String)?;
            to_string(heap, &primitive)
        }
    }
}

/// `ToPropertyKey`.
pub fn to_property_key(heap: &mut Heap, value: &Value) -> Result<PropertyKey> {
    let key = to_primitive(heap, value, Hint::String)?;
    match key {
        Value::Symbol(id) => Ok(PropertyKey::Symbol(id)),
        other => Ok(PropertyKey::String(to_string(heap, &other)?)),
    }
}

/// `GetV(V, P)`: property read on any value.
///
/// Strings expose `length` and their characters by index. Other primitives
/// read through `Object.prototype`. `undefined` and `null` have no
/// properties and raise `TypeError`.
pub fn get_v(heap: &Heap, value: &Value, key: impl Into<PropertyKey>) -> Result<Value> {
    let key = key.into();
    match value {
        Value::Object(id) => heap.get(*id, key),
        Value::Undefined | Value::Null => Err(Error::type_error(format!(
            "Cannot read properties of {value:?} (reading '{key}')"
        ))),
        Value::String(s) => {
            if key.as_str() == Some("length") {
                return Ok(Value::from(utf16_length(s)));
            }
            if let Some(index) = key.array_index() {
                return Ok(s
                    .chars()
                    .nth(index as usize)
                    .map_or(Value::Undefined, |c| Value::from(c.to_string())));
            }
            heap.get(heap.intrinsics().object_prototype, key)
        }
        Value::Bool(_) | Value::Number(_) | Value::Symbol(_) => {
            heap.get(heap.intrinsics().object_prototype, key)
        }
    }
}

/// `Invoke(V, P, args)`: reads a method with [`get_v`] and calls it with `V`
/// as the receiver.
pub fn invoke(
    heap: &mut Heap,
    value: &Value,
    key: impl Into<PropertyKey>,
    args: &[Value],
) -> Result<Value> {
    let key = key.into();
    let method = get_v(heap, value, &key)?;
    if !heap.is_callable(&method) {
        return Err(Error::type_error(format!("{key} is not a function")));
    }
    heap.call(&method, value, args)
}

fn utf16_length(s: &str) -> u32 {
    u32::try_from(s.encode_utf16().count()).unwrap_or(u32::MAX)
}
