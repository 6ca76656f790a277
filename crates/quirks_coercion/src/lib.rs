//! Type conversions, equality, operators, and built-in methods for quirks.
//!
//! This crate provides:
//! - The conversion ladder ([`to_primitive`], [`to_number`], [`to_string`], [`to_boolean`])
//! - Equality ([`strict_equals`], [`loose_equals`], [`same_value`], [`same_value_zero`])
//! - Coercing operators ([`type_of`], [`add`], [`logical_not`])
//! - Global functions and constructors ([`builtins`])
//! - The conversion methods of the intrinsic prototypes ([`intrinsics`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtins;
pub mod convert;
pub mod date;
pub mod equality;
pub mod intrinsics;
pub mod operators;
pub mod primitive;

pub use convert::{
    get_v, invoke, to_boolean, to_integer_or_infinity, to_length, to_number, to_property_key,
    to_string,
};
pub use equality::{loose_equals, same_value, same_value_zero, strict_equals};
pub use operators::{add, logical_not, negate, type_of, unary_plus};
pub use primitive::{Hint, ordinary_to_primitive, to_primitive};

use quirks_foundation::{Heap, Result};

/// Creates a heap whose intrinsic prototypes carry the conversion methods.
pub fn bootstrap() -> Result<Heap> {
    let mut heap = Heap::new();
    intrinsics::install(&mut heap)?;
    Ok(heap)
}
