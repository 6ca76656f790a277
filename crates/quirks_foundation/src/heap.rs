//! Object heap with identity-based references.
//!
//! The `Heap` owns every object created during a check. Objects are never
//! freed; an [`ObjectId`] stays valid for the lifetime of its heap, and two
//! objects are the same object exactly when their ids are equal.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::object::{
    ArrayElements, Behavior, BoundFunction, FunctionData, NativeFn, Object, ObjectKind,
    PropertyKey,
};
use crate::promise::PromiseState;
use crate::symbol::SymbolRegistry;
use crate::types::ErrorName;
use crate::value::Value;

/// Heap object identifier.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    /// Returns the raw index of this object.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object(#{})", self.0)
    }
}

/// Prototype objects allocated when the heap is created.
///
/// Their methods are installed by higher layers; the heap only guarantees
/// that the objects and their prototype links exist.
#[derive(Clone, Debug)]
pub struct Intrinsics {
    /// `Object.prototype`
    pub object_prototype: ObjectId,
    /// `Function.prototype`
    pub function_prototype: ObjectId,
    /// `Array.prototype`
    pub array_prototype: ObjectId,
    /// `Date.prototype`
    pub date_prototype: ObjectId,
    /// `RegExp.prototype`
    pub regexp_prototype: ObjectId,
    /// `Promise.prototype`
    pub promise_prototype: ObjectId,
    error_prototypes: [ObjectId; 5],
}

impl Intrinsics {
    /// Returns the prototype of the given error constructor.
    #[must_use]
    pub fn error_prototype(&self, name: ErrorName) -> ObjectId {
        self.error_prototypes[name.index()]
    }
}

/// Arena of heap objects plus the symbol registry.
#[derive(Clone, Debug)]
pub struct Heap {
    objects: Vec<Object>,
    symbols: SymbolRegistry,
    intrinsics: Intrinsics,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// Creates a heap with the intrinsic prototypes allocated.
    #[must_use]
    pub fn new() -> Self {
        let mut objects = Vec::new();
        let mut push = |kind: ObjectKind, prototype: Option<ObjectId>| {
            let id = ObjectId(u32::try_from(objects.len()).unwrap_or(u32::MAX));
            objects.push(Object::new(kind, prototype));
            id
        };

        let object_prototype = push(ObjectKind::Ordinary, None);
        let function_prototype = push(ObjectKind::Ordinary, Some(object_prototype));
        let array_prototype = push(ObjectKind::Ordinary, Some(object_prototype));
        let date_prototype = push(ObjectKind::Ordinary, Some(object_prototype));
        let regexp_prototype = push(ObjectKind::Ordinary, Some(object_prototype));
        let promise_prototype = push(ObjectKind::Ordinary, Some(object_prototype));

        let base_error = push(ObjectKind::Ordinary, Some(object_prototype));
        let mut error_prototypes = [base_error; 5];
        for name in ErrorName::ALL.into_iter().skip(1) {
            error_prototypes[name.index()] = push(ObjectKind::Ordinary, Some(base_error));
        }

        let mut heap = Self {
            objects,
            symbols: SymbolRegistry::new(),
            intrinsics: Intrinsics {
                object_prototype,
                function_prototype,
                array_prototype,
                date_prototype,
                regexp_prototype,
                promise_prototype,
                error_prototypes,
            },
        };

        for name in ErrorName::ALL {
            let proto = heap.intrinsics.error_prototype(name);
            let object = &mut heap.objects[proto.0 as usize];
            object.define_hidden_property("name".into(), Value::from(name.as_str()));
            object.define_hidden_property("message".into(), Value::from(""));
        }

        heap
    }

    /// Returns the intrinsic prototypes.
    #[must_use]
    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    /// Returns the symbol registry.
    #[must_use]
    pub fn symbols(&self) -> &SymbolRegistry {
        &self.symbols
    }

    /// Returns the symbol registry for creating symbols.
    pub fn symbols_mut(&mut self) -> &mut SymbolRegistry {
        &mut self.symbols
    }

    /// Returns the number of allocated objects, including intrinsics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if no objects exist (never the case after [`Self::new`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Allocates an object.
    ///
    /// # Panics
    ///
    /// Panics if the number of objects exceeds `u32::MAX`.
    pub fn alloc(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(u32::try_from(self.objects.len()).expect("too many objects"));
        self.objects.push(object);
        id
    }

    /// Returns an object by id.
    pub fn object(&self, id: ObjectId) -> Result<&Object> {
        self.objects
            .get(id.0 as usize)
            .ok_or_else(|| Error::internal(format!("dangling {id:?}")))
    }

    /// Returns an object by id for mutation.
    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut Object> {
        self.objects
            .get_mut(id.0 as usize)
            .ok_or_else(|| Error::internal(format!("dangling {id:?}")))
    }

    /// Creates an empty record inheriting from `Object.prototype`.
    pub fn create_object(&mut self) -> ObjectId {
        let proto = self.intrinsics.object_prototype;
        self.alloc(Object::new(ObjectKind::Ordinary, Some(proto)))
    }

    /// Creates an empty record with an explicit prototype.
    pub fn create_object_with_proto(&mut self, prototype: Option<ObjectId>) -> ObjectId {
        self.alloc(Object::new(ObjectKind::Ordinary, prototype))
    }

    /// Creates a record from key/value pairs, in order.
    pub fn create_record<K: Into<PropertyKey>>(
        &mut self,
        entries: impl IntoIterator<Item = (K, Value)>,
    ) -> ObjectId {
        let id = self.create_object();
        let object = &mut self.objects[id.0 as usize];
        for (key, value) in entries {
            object.insert_property(key.into(), value);
        }
        id
    }

    /// Creates a dense array.
    pub fn create_array(&mut self, values: impl IntoIterator<Item = Value>) -> ObjectId {
        let proto = self.intrinsics.array_prototype;
        self.alloc(Object::new(
            ObjectKind::Array(ArrayElements::from_values(values)),
            Some(proto),
        ))
    }

    /// Creates an array of `length` holes.
    pub fn create_array_with_length(&mut self, length: u32) -> ObjectId {
        let proto = self.intrinsics.array_prototype;
        self.alloc(Object::new(
            ObjectKind::Array(ArrayElements::with_length(length)),
            Some(proto),
        ))
    }

    /// Creates a function object with explicit source text.
    pub fn create_function(
        &mut self,
        name: &str,
        source: &str,
        native: NativeFn,
    ) -> ObjectId {
        let proto = self.intrinsics.function_prototype;
        self.alloc(Object::new(
            ObjectKind::Function(FunctionData {
                name: name.into(),
                source: source.into(),
                behavior: Behavior::Native(native),
            }),
            Some(proto),
        ))
    }

    /// Creates a built-in style function whose source reads
    /// `function name() { [native code] }`.
    pub fn native_function(
        &mut self,
        name: &str,
        f: impl Fn(&mut Heap, &Value, &[Value]) -> Result<Value> + 'static,
    ) -> Value {
        let source = format!("function {name}() {{ [native code] }}");
        Value::Object(self.create_function(name, &source, NativeFn::new(f)))
    }

    /// Creates a bound function, as `target.bind(this, ...args)` does.
    pub fn create_bound_function(
        &mut self,
        target: ObjectId,
        this: Value,
        args: Vec<Value>,
    ) -> Result<ObjectId> {
        let target_name = match &self.object(target)?.kind {
            ObjectKind::Function(data) => data.name.clone(),
            _ => return Err(Error::type_error("Bind must be called on a function")),
        };
        let proto = self.object(target)?.prototype;
        Ok(self.alloc(Object::new(
            ObjectKind::Function(FunctionData {
                name: format!("bound {target_name}").into(),
                source: "function () { [native code] }".into(),
                behavior: Behavior::Bound(BoundFunction { target, this, args }),
            }),
            proto,
        )))
    }

    /// Creates an error object. `None` leaves `message` to the prototype (`""`).
    pub fn create_error(&mut self, name: ErrorName, message: Option<&str>) -> ObjectId {
        let proto = self.intrinsics.error_prototype(name);
        let mut object = Object::new(ObjectKind::Error(name), Some(proto));
        if let Some(message) = message {
            object.define_hidden_property("message".into(), Value::from(message));
        }
        self.alloc(object)
    }

    /// Creates a date from a time value in milliseconds since the epoch.
    pub fn create_date(&mut self, time: f64) -> ObjectId {
        let proto = self.intrinsics.date_prototype;
        self.alloc(Object::new(ObjectKind::Date(time), Some(proto)))
    }

    /// Creates a regular expression object.
    pub fn create_regexp(&mut self, source: &str, flags: &str) -> ObjectId {
        let proto = self.intrinsics.regexp_prototype;
        self.alloc(Object::new(
            ObjectKind::RegExp {
                source: source.into(),
                flags: flags.into(),
            },
            Some(proto),
        ))
    }

    /// Creates a pending promise.
    pub fn create_promise(&mut self) -> ObjectId {
        let proto = self.intrinsics.promise_prototype;
        self.alloc(Object::new(
            ObjectKind::Promise(PromiseState::pending()),
            Some(proto),
        ))
    }

    /// Creates a `document.all`-style object.
    pub fn create_legacy_html_dda(&mut self) -> ObjectId {
        let proto = self.intrinsics.object_prototype;
        self.alloc(Object::new(ObjectKind::LegacyHtmlDda, Some(proto)))
    }

    // =========================================================================
    // Property Access
    // =========================================================================

    fn own_value(object: &Object, key: &PropertyKey) -> Option<Value> {
        if let ObjectKind::Array(elements) = &object.kind {
            if let Some(index) = key.array_index() {
                return elements.get(index).cloned();
            }
            if key.as_str() == Some("length") {
                return Some(Value::from(elements.length()));
            }
        }
        object.property(key).cloned()
    }

    /// Reads an own property without consulting the prototype chain.
    pub fn get_own(&self, id: ObjectId, key: impl Into<PropertyKey>) -> Result<Option<Value>> {
        let key = key.into();
        Ok(Self::own_value(self.object(id)?, &key))
    }

    /// `[[Get]]`: reads a property, walking the prototype chain. Missing
    /// properties read as `undefined`.
    pub fn get(&self, id: ObjectId, key: impl Into<PropertyKey>) -> Result<Value> {
        let key = key.into();
        let mut current = Some(id);
        while let Some(id) = current {
            let object = self.object(id)?;
            if let Some(value) = Self::own_value(object, &key) {
                return Ok(value);
            }
            current = object.prototype;
        }
        Ok(Value::Undefined)
    }

    /// `[[HasProperty]]`: checks own and inherited properties.
    pub fn has_property(&self, id: ObjectId, key: impl Into<PropertyKey>) -> Result<bool> {
        let key = key.into();
        let mut current = Some(id);
        while let Some(id) = current {
            let object = self.object(id)?;
            if Self::own_value(object, &key).is_some() {
                return Ok(true);
            }
            current = object.prototype;
        }
        Ok(false)
    }

    /// `[[Set]]`: creates or overwrites an own property.
    ///
    /// On arrays, index keys write elements (growing `length` and leaving
    /// holes), `length` truncates or extends, and every other key is an
    /// ordinary property that leaves `length` alone.
    pub fn set(&mut self, id: ObjectId, key: impl Into<PropertyKey>, value: Value) -> Result<()> {
        let key = key.into();
        let object = self.object_mut(id)?;
        if let ObjectKind::Array(elements) = &mut object.kind {
            if let Some(index) = key.array_index() {
                elements.set(index, value);
                return Ok(());
            }
            if key.as_str() == Some("length") {
                let length = array_length_from(&value)?;
                elements.set_length(length);
                return Ok(());
            }
        }
        object.insert_property(key, value);
        Ok(())
    }

    /// Defines a non-enumerable own property, the way built-in methods and
    /// error `message`s are defined. Key enumeration and JSON skip it.
    pub fn define_hidden(
        &mut self,
        id: ObjectId,
        key: impl Into<PropertyKey>,
        value: Value,
    ) -> Result<()> {
        self.object_mut(id)?.define_hidden_property(key.into(), value);
        Ok(())
    }

    /// `[[Delete]]`: removes an own property. Array `length` cannot be
    /// deleted; deleting an element leaves a hole.
    pub fn delete(&mut self, id: ObjectId, key: impl Into<PropertyKey>) -> Result<bool> {
        let key = key.into();
        let object = self.object_mut(id)?;
        if let ObjectKind::Array(elements) = &mut object.kind {
            if let Some(index) = key.array_index() {
                elements.remove(index);
                return Ok(true);
            }
            if key.as_str() == Some("length") {
                return Ok(false);
            }
        }
        object.remove_property(&key);
        Ok(true)
    }

    /// Own enumerable keys in property order: array indices ascending, then
    /// string keys in insertion order, then symbols.
    pub fn own_enumerable_keys(&self, id: ObjectId) -> Result<Vec<PropertyKey>> {
        let object = self.object(id)?;
        let mut indices: Vec<u32> = Vec::new();
        if let ObjectKind::Array(elements) = &object.kind {
            indices.extend(elements.indices());
        }

        let mut strings = Vec::new();
        let mut symbols = Vec::new();
        for key in object.enumerable_keys() {
            match key {
                PropertyKey::Symbol(_) => symbols.push(key.clone()),
                PropertyKey::String(_) => match key.array_index() {
                    Some(index) => indices.push(index),
                    None => strings.push(key.clone()),
                },
            }
        }
        indices.sort_unstable();

        let mut keys: Vec<PropertyKey> = indices.into_iter().map(PropertyKey::from).collect();
        keys.extend(strings);
        keys.extend(symbols);
        Ok(keys)
    }

    /// Returns the `length` of an array, or `None` for non-arrays.
    #[must_use]
    pub fn array_length(&self, id: ObjectId) -> Option<u32> {
        self.object(id)
            .ok()
            .and_then(Object::as_array)
            .map(ArrayElements::length)
    }

    // =========================================================================
    // Classification
    // =========================================================================

    fn kind_of(&self, value: &Value) -> Option<&ObjectKind> {
        value
            .as_object()
            .and_then(|id| self.object(id).ok())
            .map(|object| &object.kind)
    }

    /// `IsArray`.
    #[must_use]
    pub fn is_array(&self, value: &Value) -> bool {
        matches!(self.kind_of(value), Some(ObjectKind::Array(_)))
    }

    /// `IsCallable`.
    #[must_use]
    pub fn is_callable(&self, value: &Value) -> bool {
        matches!(self.kind_of(value), Some(ObjectKind::Function(_)))
    }

    /// Returns true for `document.all`-style objects.
    #[must_use]
    pub fn is_html_dda(&self, value: &Value) -> bool {
        matches!(self.kind_of(value), Some(ObjectKind::LegacyHtmlDda))
    }

    /// Returns true for promise objects.
    #[must_use]
    pub fn is_promise(&self, value: &Value) -> bool {
        matches!(self.kind_of(value), Some(ObjectKind::Promise(_)))
    }

    /// Returns the built-in error name of an error object.
    #[must_use]
    pub fn error_name_of(&self, value: &Value) -> Option<ErrorName> {
        match self.kind_of(value) {
            Some(ObjectKind::Error(name)) => Some(*name),
            _ => None,
        }
    }

    /// Returns the `name` of a function object.
    #[must_use]
    pub fn function_name(&self, value: &Value) -> Option<Arc<str>> {
        match self.kind_of(value) {
            Some(ObjectKind::Function(data)) => Some(data.name.clone()),
            _ => None,
        }
    }

    // =========================================================================
    // Calls and Errors
    // =========================================================================

    /// `Call(f, this, args)`.
    ///
    /// Bound functions substitute their receiver and prepend their bound
    /// arguments; anything that is not a function raises `TypeError`.
    pub fn call(&mut self, f: &Value, this: &Value, args: &[Value]) -> Result<Value> {
        let behavior = match self.kind_of(f) {
            Some(ObjectKind::Function(data)) => data.behavior.clone(),
            _ => return Err(Error::type_error(format!("{} is not a function", describe(f)))),
        };
        match behavior {
            Behavior::Native(native) => native.call(self, this, args),
            Behavior::Bound(bound) => {
                let mut full = bound.args.clone();
                full.extend_from_slice(args);
                self.call(&Value::Object(bound.target), &bound.this, &full)
            }
        }
    }

    /// Converts a Rust-side error into the value language code would catch.
    ///
    /// Thrown values come back unchanged; built-in error kinds become error
    /// objects of the matching constructor.
    pub fn materialize(&mut self, error: Error) -> Value {
        let (name, message) = match error.kind {
            ErrorKind::Thrown(value) => return value,
            ErrorKind::TypeError(message) => (ErrorName::TypeError, message),
            ErrorKind::ReferenceError(message) => (ErrorName::ReferenceError, message),
            ErrorKind::RangeError(message) => (ErrorName::RangeError, message),
            ErrorKind::SyntaxError(message) => (ErrorName::SyntaxError, message),
            ErrorKind::LimitExceeded(_) | ErrorKind::Internal(_) => {
                let message = error.kind.to_string();
                (ErrorName::Error, message)
            }
        };
        Value::Object(self.create_error(name, Some(&message)))
    }
}

/// Validates a value assigned to an array's `length`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn array_length_from(value: &Value) -> Result<u32> {
    let invalid = || Error::range_error("Invalid array length");
    let n = value.as_number().ok_or_else(invalid)?;
    if n.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&n) {
        return Err(invalid());
    }
    Ok(n as u32)
}

/// Short description of a value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Object(_) => "object".to_string(),
        other => format!("{other:?}"),
    }
}
