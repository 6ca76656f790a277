//! Methods installed on the intrinsic prototypes.
//!
//! The heap allocates the prototype objects; this module gives them the
//! conversion-related methods (`toString`, `valueOf`, `join`, `bind`, ...)
//! that `ToPrimitive` and friends end up calling.

use quirks_foundation::{Error, ErrorName, Heap, ObjectId, ObjectKind, Result, SymbolId, Value};

use crate::convert::{invoke, to_length, to_string};
use crate::date::{to_date_string, to_iso_string};
use crate::primitive::{Hint, ordinary_to_primitive, to_primitive};

type Method = fn(&mut Heap, &Value, &[Value]) -> Result<Value>;

/// Installs every coercion-layer method on the heap's intrinsics.
pub fn install(heap: &mut Heap) -> Result<()> {
    let intrinsics = heap.intrinsics().clone();

    let object_methods: [(&str, Method); 3] = [
        ("toString", object_to_string),
        ("valueOf", object_value_of),
        ("hasOwnProperty", object_has_own_property),
    ];
    define_methods(heap, intrinsics.object_prototype, &object_methods)?;

    let function_methods: [(&str, Method); 4] = [
        ("toString", function_to_string),
        ("bind", function_bind),
        ("call", function_call),
        ("apply", function_apply),
    ];
    define_methods(heap, intrinsics.function_prototype, &function_methods)?;

    let array_methods: [(&str, Method); 2] =
        [("join", array_join), ("toString", array_to_string)];
    define_methods(heap, intrinsics.array_prototype, &array_methods)?;

    let error_methods: [(&str, Method); 1] = [("toString", error_to_string)];
    define_methods(heap, intrinsics.error_prototype(ErrorName::Error), &error_methods)?;

    let date_methods: [(&str, Method); 5] = [
        ("toString", date_to_string),
        ("valueOf", date_value_of),
        ("getTime", date_value_of),
        ("toISOString", date_to_iso_string),
        ("toJSON", date_to_json),
    ];
    define_methods(heap, intrinsics.date_prototype, &date_methods)?;
    let to_primitive_fn = heap.native_function("[Symbol.toPrimitive]", date_to_primitive);
    heap.define_hidden(intrinsics.date_prototype, SymbolId::TO_PRIMITIVE, to_primitive_fn)?;

    let regexp_methods: [(&str, Method); 1] = [("toString", regexp_to_string)];
    define_methods(heap, intrinsics.regexp_prototype, &regexp_methods)?;

    tracing::debug!(objects = heap.len(), "installed coercion intrinsics");
    Ok(())
}

/// Defines non-enumerable native methods on `target`.
pub fn define_methods(heap: &mut Heap, target: ObjectId, methods: &[(&str, Method)]) -> Result<()> {
    for &(name, method) in methods {
        let f = heap.native_function(name, method);
        heap.define_hidden(target, name, f)?;
    }
    Ok(())
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

fn this_object(this: &Value, method: &str) -> Result<ObjectId> {
    this.as_object().ok_or_else(|| {
        Error::type_error(format!("{method} called on non-object"))
    })
}

// =============================================================================
// Object.prototype
// =============================================================================

fn object_to_string(heap: &mut Heap, this: &Value, _: &[Value]) -> Result<Value> {
    let builtin = match this {
        Value::Undefined => return Ok(Value::from("[object Undefined]")),
        Value::Null => return Ok(Value::from("[object Null]")),
        Value::Bool(_) => "Boolean",
        Value::Number(_) => "Number",
        Value::String(_) => "String",
        Value::Symbol(_) => "Symbol",
        Value::Object(id) => match heap.object(*id)?.kind {
            ObjectKind::Array(_) => "Array",
            ObjectKind::Function(_) => "Function",
            ObjectKind::Error(_) => "Error",
            ObjectKind::Date(_) => "Date",
            ObjectKind::RegExp { .. } => "RegExp",
            ObjectKind::Ordinary | ObjectKind::Promise(_) | ObjectKind::LegacyHtmlDda => {
                "Object"
            }
        },
    };
    let tag = match this {
        Value::Object(id) => heap.get(*id, SymbolId::TO_STRING_TAG)?,
        _ => Value::Undefined,
    };
    Ok(Value::from(match tag.as_str() {
        Some(tag) => format!("[object {tag}]"),
        None => format!("[object {builtin}]"),
    }))
}

fn object_value_of(_: &mut Heap, this: &Value, _: &[Value]) -> Result<Value> {
    if this.is_nullish() {
        return Err(Error::type_error("Cannot convert undefined or null to object"));
    }
    Ok(this.clone())
}

fn object_has_own_property(heap: &mut Heap, this: &Value, args: &[Value]) -> Result<Value> {
    let key = crate::convert::to_property_key(heap, &arg(args, 0))?;
    let id = this_object(this, "Object.prototype.hasOwnProperty")?;
    Ok(Value::Bool(heap.get_own(id, key)?.is_some()))
}

// =============================================================================
// Function.prototype
// =============================================================================

fn function_to_string(heap: &mut Heap, this: &Value, _: &[Value]) -> Result<Value> {
    let source = this
        .as_object()
        .and_then(|id| heap.object(id).ok())
        .and_then(|object| object.as_function())
        .map(|data| data.source.clone());
    source.map(Value::String).ok_or_else(|| {
        Error::type_error("Function.prototype.toString requires that 'this' be a Function")
    })
}

fn function_bind(heap: &mut Heap, this: &Value, args: &[Value]) -> Result<Value> {
    let target = match this {
        Value::Object(id) if heap.is_callable(this) => *id,
        _ => return Err(Error::type_error("Bind must be called on a function")),
    };
    let bound_this = arg(args, 0);
    let bound_args = args.get(1..).unwrap_or_default().to_vec();
    Ok(Value::Object(heap.create_bound_function(target, bound_this, bound_args)?))
}

fn function_call(heap: &mut Heap, this: &Value, args: &[Value]) -> Result<Value> {
    let receiver = arg(args, 0);
    heap.call(this, &receiver, args.get(1..).unwrap_or_default())
}

fn function_apply(heap: &mut Heap, this: &Value, args: &[Value]) -> Result<Value> {
    let receiver = arg(args, 0);
    let list = match arg(args, 1) {
        Value::Undefined | Value::Null => Vec::new(),
        Value::Object(id) => {
            let length = heap.get(id, "length")?;
            let length = to_length(heap, &length)?;
            (0..length)
                .map(|i| heap.get(id, i))
                .collect::<Result<Vec<_>>>()?
        }
        _ => return Err(Error::type_error("CreateListFromArrayLike called on non-object")),
    };
    heap.call(this, &receiver, &list)
}

// =============================================================================
// Array.prototype
// =============================================================================

fn array_join(heap: &mut Heap, this: &Value, args: &[Value]) -> Result<Value> {
    let id = this_object(this, "Array.prototype.join")?;
    let separator = match arg(args, 0) {
        Value::Undefined => ",".into(),
        other => to_string(heap, &other)?,
    };
    let length = heap.get(id, "length")?;
    let length = to_length(heap, &length)?;

    let mut out = String::new();
    for index in 0..length {
        if index > 0 {
            out.push_str(&separator);
        }
        let element = heap.get(id, index)?;
        if !element.is_nullish() {
            out.push_str(&to_string(heap, &element)?);
        }
    }
    Ok(Value::from(out))
}

fn array_to_string(heap: &mut Heap, this: &Value, _: &[Value]) -> Result<Value> {
    let id = this_object(this, "Array.prototype.toString")?;
    let join = heap.get(id, "join")?;
    if heap.is_callable(&join) {
        return heap.call(&join, this, &[]);
    }
    object_to_string(heap, this, &[])
}

// =============================================================================
// Error.prototype
// =============================================================================

fn error_to_string(heap: &mut Heap, this: &Value, _: &[Value]) -> Result<Value> {
    let id = this_object(this, "Error.prototype.toString")?;
    let name = match heap.get(id, "name")? {
        Value::Undefined => "Error".into(),
        other => to_string(heap, &other)?,
    };
    let message = match heap.get(id, "message")? {
        Value::Undefined => "".into(),
        other => to_string(heap, &other)?,
    };
    let text = if name.is_empty() {
        message.to_string()
    } else if message.is_empty() {
        name.to_string()
    } else {
        format!("{name}: {message}")
    };
    Ok(Value::from(text))
}

// =============================================================================
// Date.prototype
// =============================================================================

fn this_time_value(heap: &Heap, this: &Value) -> Result<f64> {
    let time = this
        .as_object()
        .and_then(|id| heap.object(id).ok())
        .and_then(|object| match object.kind {
            ObjectKind::Date(time) => Some(time),
            _ => None,
        });
    time.ok_or_else(|| Error::type_error("this is not a Date object."))
}

fn date_to_string(heap: &mut Heap, this: &Value, _: &[Value]) -> Result<Value> {
    Ok(Value::from(to_date_string(this_time_value(heap, this)?)))
}

fn date_value_of(heap: &mut Heap, this: &Value, _: &[Value]) -> Result<Value> {
    Ok(Value::Number(this_time_value(heap, this)?))
}

fn date_to_iso_string(heap: &mut Heap, this: &Value, _: &[Value]) -> Result<Value> {
    Ok(Value::from(to_iso_string(this_time_value(heap, this)?)?))
}

fn date_to_json(heap: &mut Heap, this: &Value, _: &[Value]) -> Result<Value> {
    this_object(this, "Date.prototype.toJSON")?;
    let time = to_primitive(heap, this, Hint::Number)?;
    if let Value::Number(n) = time {
        if !n.is_finite() {
            return Ok(Value::Null);
        }
    }
    invoke(heap, this, "toISOString", &[])
}

fn date_to_primitive(heap: &mut Heap, this: &Value, args: &[Value]) -> Result<Value> {
    let id = this_object(this, "Date.prototype[Symbol.toPrimitive]")?;
    let hint = match arg(args, 0).as_str() {
        Some("string" | "default") => Hint::String,
        Some("number") => Hint::Number,
        _ => return Err(Error::type_error("Invalid hint")),
    };
    ordinary_to_primitive(heap, id, hint)
}

// =============================================================================
// RegExp.prototype
// =============================================================================

fn regexp_to_string(heap: &mut Heap, this: &Value, _: &[Value]) -> Result<Value> {
    let id = this_object(this, "RegExp.prototype.toString")?;
    if let ObjectKind::RegExp { source, flags } = &heap.object(id)?.kind {
        return Ok(Value::from(format!("/{source}/{flags}")));
    }
    let source = heap.get(id, "source")?;
    let source = to_string(heap, &source)?;
    let flags = heap.get(id, "flags")?;
    let flags = to_string(heap, &flags)?;
    Ok(Value::from(format!("/{source}/{flags}")))
}
