//! Equality algorithms: `IsStrictlyEqual`, `IsLooselyEqual`, `SameValue`,
//! and `SameValueZero`.

use std::mem::discriminant;

use quirks_foundation::{Heap, Result, Value, string_to_number};

use crate::convert::to_number;
use crate::primitive::{Hint, to_primitive};

/// `===`: no coercion. NaN is unequal to itself and `+0 === -0`.
#[must_use]
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        _ => a == b,
    }
}

/// `Object.is`.
#[must_use]
pub fn same_value(a: &Value, b: &Value) -> bool {
    a == b
}

/// `SameValueZero`: like [`same_value`] but `+0` equals `-0`.
#[must_use]
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => a == b,
    }
}

/// `==`: equality with coercion.
///
/// Same-type operands compare strictly. `null` and `undefined` (and
/// `document.all`) only equal each other. Strings compared with numbers are
/// converted with `ToNumber`; booleans are always converted to numbers
/// first; objects compared with primitives go through `ToPrimitive`.
pub fn loose_equals(heap: &mut Heap, a: &Value, b: &Value) -> Result<bool> {
    if discriminant(a) == discriminant(b) {
        return Ok(strict_equals(a, b));
    }

    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => Ok(true),
        (Value::Undefined | Value::Null, Value::Object(_)) => Ok(heap.is_html_dda(b)),
        (Value::Object(_), Value::Undefined | Value::Null) => Ok(heap.is_html_dda(a)),
        (Value::Number(x), Value::String(s)) | (Value::String(s), Value::Number(x)) => {
            Ok(*x == string_to_number(s))
        }
        (Value::Bool(_), _) => {
            let n = Value::Number(to_number(heap, a)?);
            loose_equals(heap, &n, b)
        }
        (_, Value::Bool(_)) => {
            let n = Value::Number(to_number(heap, b)?);
            loose_equals(heap, a, &n)
        }
        (Value::String(_) | Value::Number(_) | Value::Symbol(_), Value::Object(_)) => {
            let p = to_primitive(heap, b, Hint::Default)?;
            loose_equals(heap, a, &p)
        }
        (Value::Object(_), Value::String(_) | Value::Number(_) | Value::Symbol(_)) => {
            let p = to_primitive(heap, a, Hint::Default)?;
            loose_equals(heap, &p, b)
        }
        _ => Ok(false),
    }
}
