//! The replacer and space arguments, resolved once before serialization.

use quirks_coercion::{to_integer_or_infinity, to_string};
use quirks_foundation::{Heap, PropertyKey, Result, Value};

/// Maximum indentation width.
pub const MAX_GAP: usize = 10;

/// A resolved replacer argument.
#[derive(Clone, Debug, Default)]
pub enum Replacer {
    /// No replacer.
    #[default]
    None,
    /// `(key, value)` callback invoked with the holder as receiver.
    Function(Value),
    /// Property names allowed at every nesting level of records.
    AllowList(Vec<PropertyKey>),
}

impl Replacer {
    /// Resolves the second argument of `JSON.stringify`.
    ///
    /// Callables become a callback. Arrays become an allow-list built from
    /// their string and number elements, deduplicated in order. Anything
    /// else is ignored.
    pub fn resolve(heap: &mut Heap, value: &Value) -> Result<Self> {
        if heap.is_callable(value) {
            return Ok(Self::Function(value.clone()));
        }
        let Some(id) = value.as_object().filter(|_| heap.is_array(value)) else {
            return Ok(Self::None);
        };

        let length = heap.array_length(id).unwrap_or(0);
        let mut keys: Vec<PropertyKey> = Vec::new();
        for index in 0..length {
            let element = heap.get(id, index)?;
            let key = match element {
                Value::String(s) => PropertyKey::String(s),
                Value::Number(_) => PropertyKey::String(to_string(heap, &element)?),
                _ => continue,
            };
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Ok(Self::AllowList(keys))
    }
}

/// Resolves the third argument of `JSON.stringify` into the indentation
/// unit.
///
/// Numbers give that many spaces (clamped to 10, nothing below 1); strings
/// are used verbatim up to 10 characters; anything else means no
/// indentation.
pub fn resolve_gap(heap: &mut Heap, space: &Value) -> Result<String> {
    match space {
        Value::Number(_) => {
            let width = to_integer_or_infinity(heap, space)?;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let width = width.clamp(0.0, 10.0) as usize;
            Ok(" ".repeat(width))
        }
        Value::String(s) => Ok(s.chars().take(MAX_GAP).collect()),
        _ => Ok(String::new()),
    }
}
