//! Conformance tests: scopes, hoisting, and closures
//!
//! Programs are declaration trees run by `quirks_scope::run`; each
//! `observe` point records what a name evaluated to, or the error it raised.

mod hoisting;
mod nesting;
mod strict_mode;

use quirks_coercion::bootstrap;
use quirks_scope::{Program, Transcript, run};

/// Runs `program` on a fresh heap.
pub fn transcript(program: &Program) -> Transcript {
    let mut heap = bootstrap().unwrap();
    run(&mut heap, program).unwrap()
}
