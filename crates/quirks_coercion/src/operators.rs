//! Unary and binary operators that coerce their operands.

use quirks_foundation::{Heap, Result, TypeTag, Value};

use crate::convert::{to_boolean, to_number, to_string};
use crate::primitive::{Hint, to_primitive};

/// `typeof`.
#[must_use]
pub fn type_of(heap: &Heap, value: &Value) -> TypeTag {
    match value {
        Value::Undefined => TypeTag::Undefined,
        Value::Null => TypeTag::Object,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Number(_) => TypeTag::Number,
        Value::String(_) => TypeTag::String,
        Value::Symbol(_) => TypeTag::Symbol,
        Value::Object(_) if heap.is_html_dda(value) => TypeTag::Undefined,
        Value::Object(_) if heap.is_callable(value) => TypeTag::Function,
        Value::Object(_) => TypeTag::Object,
    }
}

/// The `+` operator.
///
/// Both operands go through `ToPrimitive` with no hint. If either result is
/// a string the operation concatenates, otherwise it adds numerically.
pub fn add(heap: &mut Heap, a: &Value, b: &Value) -> Result<Value> {
    let lprim = to_primitive(heap, a, Hint::Default)?;
    let rprim = to_primitive(heap, b, Hint::Default)?;
    if matches!(lprim, Value::String(_)) || matches!(rprim, Value::String(_)) {
        let l = to_string(heap, &lprim)?;
        let r = to_string(heap, &rprim)?;
        return Ok(Value::from(format!("{l}{r}")));
    }
    let l = to_number(heap, &lprim)?;
    let r = to_number(heap, &rprim)?;
    Ok(Value::Number(l + r))
}

/// Unary `+`.
pub fn unary_plus(heap: &mut Heap, value: &Value) -> Result<Value> {
    Ok(Value::Number(to_number(heap, value)?))
}

/// Unary `-`.
pub fn negate(heap: &mut Heap, value: &Value) -> Result<Value> {
    Ok(Value::Number(-to_number(heap, value)?))
}

/// `!`.
#[must_use]
pub fn logical_not(heap: &Heap, value: &Value) -> bool {
    !to_boolean(heap, value)
}
