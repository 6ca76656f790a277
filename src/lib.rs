//! quirks - Executable reference of dynamic-language semantics
//!
//! This crate re-exports all layers of the quirks system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: quirks_runtime     - Realm, fake timers, promises, done signal
//! Layer 2: quirks_json        - JSON.stringify
//!          quirks_scope       - Hoisting, block scoping, closures
//! Layer 1: quirks_coercion    - Conversions, equality, operators, built-ins
//! Layer 0: quirks_foundation  - Core types (Value, Heap, Error)
//! ```

pub use quirks_coercion as coercion;
pub use quirks_foundation as foundation;
pub use quirks_json as json;
pub use quirks_runtime as runtime;
pub use quirks_scope as scope;
