//! `JSON.stringify` semantics for quirks values.
//!
//! [`stringify`] follows the serialization algorithm step by step: `toJSON`
//! hooks, replacer callbacks and allow-lists, the space argument, and cycle
//! detection. Values with no JSON form (`undefined`, functions, symbols)
//! are dropped from records, become `null` inside arrays, and make the
//! whole result `None` at the top level.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod options;
pub mod quote;
mod serializer;

pub use options::{MAX_GAP, Replacer, resolve_gap};
pub use quote::quote;

use quirks_foundation::{Heap, PropertyKey, Result, Value};

use serializer::Serializer;

/// `JSON.stringify(value, replacer, space)`.
///
/// Returns `Ok(None)` where the language returns `undefined`. Fails with
/// `TypeError` on a reference cycle, with the offending property path in
/// the error context, and propagates anything thrown by `toJSON` or the
/// replacer.
pub fn stringify(
    heap: &mut Heap,
    value: &Value,
    replacer: &Value,
    space: &Value,
) -> Result<Option<String>> {
    let replacer = Replacer::resolve(heap, replacer)?;
    let gap = resolve_gap(heap, space)?;
    tracing::trace!(?replacer, gap = gap.len(), "JSON.stringify");

    let root = PropertyKey::from("");
    let wrapper = heap.create_record([(root.clone(), value.clone())]);
    Serializer::new(heap, replacer, gap).property(wrapper, &root)
}

/// `JSON.stringify(value)` with no replacer and no indentation.
pub fn stringify_value(heap: &mut Heap, value: &Value) -> Result<Option<String>> {
    stringify(heap, value, &Value::Undefined, &Value::Undefined)
}
