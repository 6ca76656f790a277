//! Hoisting, block scoping, and closures for quirks.
//!
//! This crate provides:
//! - A declaration tree ([`Program`], [`Stmt`], [`Expr`]) built from helpers
//! - The declaration pre-pass ([`hoist`]) with its early errors
//! - The scope chain ([`Environments`]) with dead zones and constants
//! - The sequential pass ([`run`]) producing a [`Transcript`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod env;
pub mod exec;
pub mod hoist;
pub mod pretty;

pub use ast::{DeclKind, Expr, FunctionDecl, Program, Stmt};
pub use env::{Binding, BindingKind, EnvId, Environments, ScopeKind};
pub use exec::{Outcome, Transcript, run};
pub use hoist::{BlockScope, LexicalDecl, VarScope, block_scope, var_scope};
pub use pretty::{expr_source, function_source};
