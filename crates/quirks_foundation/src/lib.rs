//! Core values, heap objects, symbols, and errors for quirks.
//!
//! This crate provides:
//! - [`Value`] - The language value type (primitives inline, objects by id)
//! - [`Heap`] - The object arena with property access and calls
//! - [`SymbolRegistry`] - Unique symbols and the well-known ones
//! - [`Error`] - Language-level and harness-level errors with context
//! - Number/text conversions ([`number_to_string`], [`string_to_number`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod heap;
pub mod number;
pub mod object;
pub mod promise;
pub mod symbol;
pub mod types;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, Result, SemanticLimit};
pub use heap::{Heap, Intrinsics, ObjectId};
pub use number::{is_js_whitespace, number_to_string, string_to_number};
pub use object::{
    ArrayElements, Behavior, BoundFunction, FunctionData, NativeFn, Object, ObjectKind,
    PropertyKey,
};
pub use promise::{
    PromiseCapability, PromiseReaction, PromiseState, PromiseStatus, ReactionKind,
};
pub use symbol::{SymbolId, SymbolRegistry};
pub use types::{ErrorName, TypeTag};
pub use value::Value;
