//! Core value type.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::heap::ObjectId;
use crate::number::number_to_string;
use crate::symbol::SymbolId;

/// A language value.
///
/// Primitives are stored inline; objects live in a [`crate::Heap`] and are
/// referenced by id, so cloning a `Value` never copies an object.
#[derive(Clone)]
pub enum Value {
    /// The absent-value marker.
    Undefined,
    /// The null marker.
    Null,
    /// Boolean value.
    Bool(bool),
    /// IEEE 754 double, the only numeric type.
    Number(f64),
    /// Immutable string.
    String(Arc<str>),
    /// Unique symbol.
    Symbol(SymbolId),
    /// Reference to a heap object.
    Object(ObjectId),
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Self::String(s.into())
    }

    /// Returns true if this value is `undefined`.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns true if this value is `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for `undefined` and `null`.
    #[must_use]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Returns true for everything except objects.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        !matches!(self, Self::Object(_))
    }

    /// Returns true if this value is an object reference.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a symbol id.
    #[must_use]
    pub const fn as_symbol(&self) -> Option<SymbolId> {
        match self {
            Self::Symbol(id) => Some(*id),
            _ => None,
        }
    }

    /// Attempts to extract an object id.
    #[must_use]
    pub const fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns true if this is the number NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Number(n) if n.is_nan())
    }
}

// `==` on `Value` is SameValue: NaN equals itself and +0 differs from -0.
// Strict and loose equality live in the coercion layer.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => {
                (a.is_nan() && b.is_nan())
                    || (a == b && a.is_sign_negative() == b.is_sign_negative())
            }
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Undefined | Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Number(n) => {
                let bits = if n.is_nan() { f64::NAN.to_bits() } else { n.to_bits() };
                bits.hash(state);
            }
            Self::String(s) => s.hash(state),
            Self::Symbol(id) => id.hash(state),
            Self::Object(id) => id.hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if *n == 0.0 && n.is_sign_negative() => write!(f, "-0"),
            Self::Number(n) => write!(f, "{}", number_to_string(*n)),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Symbol(id) => write!(f, "Symbol(#{})", id.index()),
            Self::Object(id) => write!(f, "{id:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Object(_) => write!(f, "[object]"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<SymbolId> for Value {
    fn from(id: SymbolId) -> Self {
        Self::Symbol(id)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Self::Object(id)
    }
}
