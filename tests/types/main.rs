//! Conformance tests: basic properties of the language's types
//!
//! `typeof`, undefined vs. undeclared names, falsy and truthy values,
//! null checks, NaN, and signed zero.

mod falsy_truthy;
mod nan_and_null;
mod type_of;
