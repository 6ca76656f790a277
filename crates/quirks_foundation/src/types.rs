//! Type tags reported by `typeof` and the names of built-in error kinds.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of the `typeof` operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeTag {
    /// `"undefined"`, also reported for `document.all`.
    Undefined,
    /// `"object"`, also reported for `null` and arrays.
    Object,
    /// `"boolean"`.
    Boolean,
    /// `"number"`.
    Number,
    /// `"string"`.
    String,
    /// `"symbol"`.
    Symbol,
    /// `"function"`, reported for every callable object.
    Function,
}

impl TypeTag {
    /// Returns the string `typeof` evaluates to.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Object => "object",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the built-in error constructors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ErrorName {
    /// `Error`
    Error,
    /// `TypeError`
    TypeError,
    /// `ReferenceError`
    ReferenceError,
    /// `RangeError`
    RangeError,
    /// `SyntaxError`
    SyntaxError,
}

impl ErrorName {
    /// All error names, in the order their prototypes are allocated.
    pub const ALL: [ErrorName; 5] = [
        Self::Error,
        Self::TypeError,
        Self::ReferenceError,
        Self::RangeError,
        Self::SyntaxError,
    ];

    /// Returns the constructor name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::TypeError => "TypeError",
            Self::ReferenceError => "ReferenceError",
            Self::RangeError => "RangeError",
            Self::SyntaxError => "SyntaxError",
        }
    }

    /// Looks up an error name by its constructor name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.as_str() == name)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ErrorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
