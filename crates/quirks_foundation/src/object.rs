//! Heap object layout: property keys, object kinds, and array storage.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::heap::{Heap, ObjectId};
use crate::number::number_to_string;
use crate::promise::PromiseState;
use crate::symbol::SymbolId;
use crate::types::ErrorName;
use crate::value::Value;

// =============================================================================
// Property Keys
// =============================================================================

/// A property key: a string or a symbol.
///
/// Numeric keys are always strings; `a[2]` and `a["2"]` address the same
/// property.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropertyKey {
    /// String key.
    String(Arc<str>),
    /// Symbol key.
    Symbol(SymbolId),
}

impl PropertyKey {
    /// Returns the array index this key denotes, if it is a canonical
    /// numeric string in `0..2^32 - 1`.
    #[must_use]
    pub fn array_index(&self) -> Option<u32> {
        let Self::String(s) = self else {
            return None;
        };
        if s.as_ref() == "0" {
            return Some(0);
        }
        if !s.starts_with(|c: char| matches!(c, '1'..='9'))
            || !s.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        s.parse::<u32>().ok().filter(|&i| i != u32::MAX)
    }

    /// Returns the string form of a string key.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Symbol(_) => None,
        }
    }

    /// Returns true if this is a symbol key.
    #[must_use]
    pub const fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// Converts the key to the value passed to replacers and `toJSON`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Symbol(id) => Value::Symbol(*id),
        }
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Symbol(id) => write!(f, "[Symbol #{}]", id.index()),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Symbol(id) => write!(f, "[Symbol #{}]", id.index()),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for PropertyKey {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<&PropertyKey> for PropertyKey {
    fn from(key: &PropertyKey) -> Self {
        key.clone()
    }
}

impl From<SymbolId> for PropertyKey {
    fn from(id: SymbolId) -> Self {
        Self::Symbol(id)
    }
}

impl From<u32> for PropertyKey {
    fn from(index: u32) -> Self {
        Self::String(number_to_string(f64::from(index)).into())
    }
}

// =============================================================================
// Array Storage
// =============================================================================

/// Element storage of an array.
///
/// Elements are kept sparsely: an index that was never assigned is a hole,
/// and `length` is tracked separately so `new Array(3)` and `a[2] = x` on an
/// empty array both report length 3 without materializing holes.
#[derive(Clone, Debug, Default)]
pub struct ArrayElements {
    length: u32,
    elements: BTreeMap<u32, Value>,
}

impl ArrayElements {
    /// Creates a dense array from values.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX - 1` values are supplied.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut elements = BTreeMap::new();
        let mut length = 0u32;
        for value in values {
            elements.insert(length, value);
            length = length.checked_add(1).expect("array too long");
        }
        Self { length, elements }
    }

    /// Creates an array of `length` holes.
    #[must_use]
    pub fn with_length(length: u32) -> Self {
        Self {
            length,
            elements: BTreeMap::new(),
        }
    }

    /// Returns the `length` property.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Gets the element at `index`; `None` for holes and out-of-range reads.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&Value> {
        self.elements.get(&index)
    }

    /// Assigns an element, growing `length` past `index` if needed.
    pub fn set(&mut self, index: u32, value: Value) {
        self.elements.insert(index, value);
        if index >= self.length {
            self.length = index + 1;
        }
    }

    /// Removes an element, leaving a hole. Length is unchanged.
    pub fn remove(&mut self, index: u32) -> bool {
        self.elements.remove(&index).is_some()
    }

    /// Sets `length`, dropping elements at or past the new length.
    pub fn set_length(&mut self, length: u32) {
        self.elements.retain(|&i, _| i < length);
        self.length = length;
    }

    /// Returns true if `index` is a hole (or beyond the end).
    #[must_use]
    pub fn is_hole(&self, index: u32) -> bool {
        !self.elements.contains_key(&index)
    }

    /// Iterates over assigned indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.elements.keys().copied()
    }
}

// =============================================================================
// Functions
// =============================================================================

type NativeFnBody = dyn Fn(&mut Heap, &Value, &[Value]) -> Result<Value>;

/// A function implemented in Rust.
///
/// Receives the heap, the receiver (`this`) and the arguments. The receiver
/// is always explicit; a method called without one sees `undefined`.
#[derive(Clone)]
pub struct NativeFn(Rc<NativeFnBody>);

impl NativeFn {
    /// Wraps a closure.
    pub fn new(f: impl Fn(&mut Heap, &Value, &[Value]) -> Result<Value> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invokes the function.
    pub fn call(&self, heap: &mut Heap, this: &Value, args: &[Value]) -> Result<Value> {
        (self.0)(heap, this, args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn")
    }
}

/// A function produced by `Function.prototype.bind`.
#[derive(Clone, Debug)]
pub struct BoundFunction {
    /// Function being wrapped.
    pub target: ObjectId,
    /// Receiver supplied on every call.
    pub this: Value,
    /// Arguments prepended on every call.
    pub args: Vec<Value>,
}

/// How a function runs when called.
#[derive(Clone, Debug)]
pub enum Behavior {
    /// Rust closure.
    Native(NativeFn),
    /// Bound function.
    Bound(BoundFunction),
}

/// Function object payload.
#[derive(Clone, Debug)]
pub struct FunctionData {
    /// The `name` of the function.
    pub name: Arc<str>,
    /// Source text returned by `Function.prototype.toString`.
    pub source: Arc<str>,
    /// Call behavior.
    pub behavior: Behavior,
}

// =============================================================================
// Objects
// =============================================================================

/// The exotic behavior (or internal slots) of an object.
#[derive(Clone, Debug)]
pub enum ObjectKind {
    /// Plain record.
    Ordinary,
    /// Array exotic object.
    Array(ArrayElements),
    /// Callable object.
    Function(FunctionData),
    /// Instance of one of the built-in error constructors.
    Error(ErrorName),
    /// Date holding a time value in milliseconds since the epoch (NaN when invalid).
    Date(f64),
    /// Regular expression literal.
    RegExp {
        /// Pattern text between the slashes.
        source: Arc<str>,
        /// Flags after the closing slash.
        flags: Arc<str>,
    },
    /// Promise with its internal state.
    Promise(PromiseState),
    /// `document.all`: an object that converts to false and has
    /// `typeof` "undefined" for compatibility with legacy detection code.
    LegacyHtmlDda,
}

/// A heap object.
#[derive(Clone, Debug)]
pub struct Object {
    /// Exotic behavior and internal slots.
    pub kind: ObjectKind,
    /// `[[Prototype]]`; `None` for objects created with a null prototype.
    pub prototype: Option<ObjectId>,
    /// Ordinary own properties in insertion order.
    properties: Vec<Property>,
}

/// An ordinary own property.
#[derive(Clone, Debug)]
struct Property {
    key: PropertyKey,
    value: Value,
    enumerable: bool,
}

impl Object {
    /// Creates an object with no own properties.
    #[must_use]
    pub fn new(kind: ObjectKind, prototype: Option<ObjectId>) -> Self {
        Self {
            kind,
            prototype,
            properties: Vec::new(),
        }
    }

    /// Looks up an ordinary own property.
    #[must_use]
    pub fn property(&self, key: &PropertyKey) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.key == *key)
            .map(|p| &p.value)
    }

    /// Inserts or overwrites an ordinary own property, keeping its original
    /// position and enumerability when it already exists. New properties
    /// are enumerable.
    pub fn insert_property(&mut self, key: PropertyKey, value: Value) {
        self.upsert(key, value, true);
    }

    /// Inserts or overwrites a non-enumerable own property, as built-ins
    /// define `message` and prototype data.
    pub fn define_hidden_property(&mut self, key: PropertyKey, value: Value) {
        if let Some(slot) = self.properties.iter_mut().find(|p| p.key == key) {
            slot.value = value;
            slot.enumerable = false;
        } else {
            self.upsert(key, value, false);
        }
    }

    fn upsert(&mut self, key: PropertyKey, value: Value, enumerable: bool) {
        if let Some(slot) = self.properties.iter_mut().find(|p| p.key == key) {
            slot.value = value;
        } else {
            self.properties.push(Property {
                key,
                value,
                enumerable,
            });
        }
    }

    /// Removes an ordinary own property.
    pub fn remove_property(&mut self, key: &PropertyKey) -> bool {
        let before = self.properties.len();
        self.properties.retain(|p| p.key != *key);
        self.properties.len() != before
    }

    /// Iterates over ordinary own properties in insertion order, hidden
    /// ones included.
    pub fn properties(&self) -> impl Iterator<Item = (&PropertyKey, &Value)> {
        self.properties.iter().map(|p| (&p.key, &p.value))
    }

    /// Iterates over the keys of enumerable ordinary own properties in
    /// insertion order.
    pub fn enumerable_keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.properties
            .iter()
            .filter(|p| p.enumerable)
            .map(|p| &p.key)
    }

    /// Returns the array storage if this is an array.
    #[must_use]
    pub const fn as_array(&self) -> Option<&ArrayElements> {
        match &self.kind {
            ObjectKind::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the function payload if this is callable.
    #[must_use]
    pub const fn as_function(&self) -> Option<&FunctionData> {
        match &self.kind {
            ObjectKind::Function(data) => Some(data),
            _ => None,
        }
    }
}
