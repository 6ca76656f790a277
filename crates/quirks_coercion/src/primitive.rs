//! `ToPrimitive` and `OrdinaryToPrimitive`.

use quirks_foundation::{Error, Heap, ObjectId, Result, SymbolId, Value};

/// Preferred type passed to `ToPrimitive`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Hint {
    /// No preference (`+`, `==`).
    Default,
    /// Numeric context.
    Number,
    /// String context.
    String,
}

impl Hint {
    /// The hint string handed to `@@toPrimitive`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

/// `ToPrimitive(input, hint)`.
///
/// Primitives are returned unchanged. Objects consult `@@toPrimitive` first
/// and otherwise fall back to [`ordinary_to_primitive`], treating the default
/// hint as numeric.
pub fn to_primitive(heap: &mut Heap, input: &Value, hint: Hint) -> Result<Value> {
    let Value::Object(id) = input else {
        return Ok(input.clone());
    };

    let exotic = heap.get(*id, SymbolId::TO_PRIMITIVE)?;
    if !exotic.is_nullish() {
        if !heap.is_callable(&exotic) {
            return Err(Error::type_error(
                "Symbol.toPrimitive is not a function",
            ));
        }
        let result = heap.call(&exotic, input, &[Value::from(hint.as_str())])?;
        if result.is_object() {
            return Err(Error::type_error("Cannot convert object to primitive value"));
        }
        return Ok(result);
    }

    let hint = match hint {
        Hint::Default => Hint::Number,
        other => other,
    };
    ordinary_to_primitive(heap, *id, hint)
}

/// `OrdinaryToPrimitive(O, hint)`.
///
/// Tries `valueOf` then `toString` (reversed for the string hint). A method
/// that is missing, not callable, or returns an object is skipped; if no
/// method yields a primitive the conversion fails with `TypeError`.
pub fn ordinary_to_primitive(heap: &mut Heap, id: ObjectId, hint: Hint) -> Result<Value> {
    let order = match hint {
        Hint::String => ["toString", "valueOf"],
        Hint::Number | Hint::Default => ["valueOf", "toString"],
    };
    let receiver = Value::Object(id);
    for name in order {
        let method = heap.get(id, name)?;
        if heap.is_callable(&method) {
            let result = heap.call(&method, &receiver, &[])?;
            if result.is_primitive() {
                return Ok(result);
            }
        }
    }
    Err(Error::type_error("Cannot convert object to primitive value"))
}
