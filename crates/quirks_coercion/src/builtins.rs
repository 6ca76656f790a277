//! Global functions and constructors, called as plain Rust functions.
//!
//! Each function mirrors one callable global: `String(v)`, `Number(v)`,
//! `new Array(n)`, `isNaN(v)`, and so on.

use quirks_foundation::{Error, ErrorName, Heap, ObjectKind, Result, Value};

use crate::convert::{to_boolean, to_number, to_string};
use crate::date::{local_time_value, now, time_clip};

/// `String(value)`.
///
/// Unlike [`to_string`], an explicit conversion renders symbols as
/// `Symbol(description)`.
pub fn string(heap: &mut Heap, value: &Value) -> Result<Value> {
    if let Value::Symbol(id) = value {
        return Ok(Value::from(heap.symbols().descriptive_string(*id)));
    }
    Ok(Value::String(to_string(heap, value)?))
}

/// `Number(value)`.
pub fn number(heap: &mut Heap, value: &Value) -> Result<Value> {
    Ok(Value::Number(to_number(heap, value)?))
}

/// `Boolean(value)`.
#[must_use]
pub fn boolean(heap: &Heap, value: &Value) -> Value {
    Value::Bool(to_boolean(heap, value))
}

/// `Symbol(description)`: a fresh, unique symbol.
pub fn symbol(heap: &mut Heap, description: &Value) -> Result<Value> {
    let description = match description {
        Value::Undefined => None,
        other => Some(to_string(heap, other)?),
    };
    Ok(Value::Symbol(
        heap.symbols_mut().create(description.as_deref()),
    ))
}

/// Global `isNaN(value)`: coerces with `ToNumber` first.
pub fn is_nan(heap: &mut Heap, value: &Value) -> Result<bool> {
    Ok(to_number(heap, value)?.is_nan())
}

/// `Number.isNaN(value)`: true only for the number NaN.
#[must_use]
pub fn number_is_nan(value: &Value) -> bool {
    value.is_nan()
}

/// `new Array(...args)`.
///
/// A single numeric argument pre-sizes the array with holes and must be a
/// valid length; any other argument list becomes the elements.
pub fn array_constructor(heap: &mut Heap, args: &[Value]) -> Result<Value> {
    if let [Value::Number(n)] = args {
        let n = *n;
        if n.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&n) {
            return Err(Error::range_error("Invalid array length"));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let length = n as u32;
        return Ok(Value::Object(heap.create_array_with_length(length)));
    }
    Ok(Value::Object(heap.create_array(args.iter().cloned())))
}

/// `new Error(message)` and its subclasses.
pub fn error(heap: &mut Heap, name: ErrorName, message: &Value) -> Result<Value> {
    let message = match message {
        Value::Undefined => None,
        other => Some(to_string(heap, other)?),
    };
    Ok(Value::Object(heap.create_error(name, message.as_deref())))
}

/// `new Date(year, month, ...)` from local calendar fields.
pub fn date_from_local(heap: &mut Heap, fields: &[Value]) -> Result<Value> {
    let numbers = fields
        .iter()
        .map(|v| to_number(heap, v))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Object(heap.create_date(local_time_value(&numbers))))
}

/// `Date.now()`: the current time value.
#[must_use]
pub fn date_now() -> Value {
    Value::Number(now())
}

/// `new Date(...args)`.
///
/// No arguments is the current time, one argument is a time value (or a
/// date to copy), two or more are local calendar fields.
pub fn date_constructor(heap: &mut Heap, args: &[Value]) -> Result<Value> {
    match args {
        [] => Ok(Value::Object(heap.create_date(now()))),
        [single] => {
            let time = match single.as_object().map(|id| heap.object(id)) {
                Some(Ok(object)) => match object.kind {
                    ObjectKind::Date(t) => Some(t),
                    _ => None,
                },
                Some(Err(e)) => return Err(e),
                None => None,
            };
            let time = match time {
                Some(t) => t,
                None => to_number(heap, single)?,
            };
            Ok(Value::Object(heap.create_date(time_clip(time))))
        }
        fields => date_from_local(heap, fields),
    }
}

/// `new RegExp(pattern, flags)`.
///
/// Only the textual form is modelled: the pattern is kept as the source
/// (empty patterns become `(?:)`, bare slashes are escaped) and flags are
/// validated.
pub fn regexp(heap: &mut Heap, pattern: &Value, flags: &Value) -> Result<Value> {
    let source = match pattern {
        Value::Undefined => "".into(),
        other => to_string(heap, other)?,
    };
    let flags = match flags {
        Value::Undefined => "".into(),
        other => to_string(heap, other)?,
    };

    let mut seen = String::new();
    for flag in flags.chars() {
        if !"dgimsuvy".contains(flag) || seen.contains(flag) {
            return Err(Error::syntax_error(format!(
                "Invalid flags supplied to RegExp constructor '{flags}'"
            )));
        }
        seen.push(flag);
    }

    let source = if source.is_empty() {
        "(?:)".to_string()
    } else {
        escape_slashes(&source)
    };
    Ok(Value::Object(heap.create_regexp(&source, &flags)))
}

fn escape_slashes(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut escaped = false;
    for c in source.chars() {
        if c == '/' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out
}
