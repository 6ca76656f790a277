//! Declaration pre-pass.
//!
//! Before a function body (or the script) runs, its declarations are
//! collected: `var` names from anywhere in the body except nested
//! functions, function declarations at the top level, and `let`/`const` at
//! the top level. Blocks get the same treatment for their own lexical
//! declarations when they are entered. Conflicting declarations are early
//! `SyntaxError`s.

use std::rc::Rc;
use std::sync::Arc;

use quirks_foundation::{Error, Result};

use crate::ast::{DeclKind, FunctionDecl, Stmt};

/// A `let` or `const` declaration found by the pre-pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexicalDecl {
    /// Bound name.
    pub name: Arc<str>,
    /// `let` or `const`.
    pub kind: DeclKind,
}

/// Declarations hoisted to the top of a function body or script.
#[derive(Clone, Debug, Default)]
pub struct VarScope {
    /// `var` names, first occurrence order, no duplicates.
    pub var_names: Vec<Arc<str>>,
    /// Top-level function declarations, in order. Later declarations of the
    /// same name win when instantiated.
    pub functions: Vec<Rc<FunctionDecl>>,
    /// Top-level lexical declarations.
    pub lexical: Vec<LexicalDecl>,
}

/// Declarations scoped to one block.
#[derive(Clone, Debug, Default)]
pub struct BlockScope {
    /// `let`/`const` declarations directly in the block.
    pub lexical: Vec<LexicalDecl>,
    /// Function declarations directly in the block; block-scoped.
    pub functions: Vec<Rc<FunctionDecl>>,
}

fn redeclared(name: &str) -> Error {
    Error::syntax_error(format!("Identifier '{name}' has already been declared"))
}

/// Collects `var` names declared anywhere in `body`, descending into blocks
/// but not into nested functions.
fn collect_var_names(body: &[Stmt], out: &mut Vec<Arc<str>>) {
    for stmt in body {
        match stmt {
            Stmt::Declare {
                kind: DeclKind::Var,
                name,
                ..
            } => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Stmt::Block(inner) => collect_var_names(inner, out),
            _ => {}
        }
    }
}

fn collect_lexical(body: &[Stmt]) -> Result<Vec<LexicalDecl>> {
    let mut lexical: Vec<LexicalDecl> = Vec::new();
    for stmt in body {
        if let Stmt::Declare { kind, name, init } = stmt {
            if !kind.is_lexical() {
                continue;
            }
            if *kind == DeclKind::Const && init.is_none() {
                return Err(Error::syntax_error("Missing initializer in const declaration"));
            }
            if lexical.iter().any(|decl| decl.name == *name) {
                return Err(redeclared(name));
            }
            lexical.push(LexicalDecl {
                name: name.clone(),
                kind: *kind,
            });
        }
    }
    Ok(lexical)
}

fn collect_functions(body: &[Stmt]) -> Vec<Rc<FunctionDecl>> {
    body.iter()
        .filter_map(|stmt| match stmt {
            Stmt::Function(decl) => Some(decl.clone()),
            _ => None,
        })
        .collect()
}

/// Pre-pass over a function body or script.
///
/// `params` are the function's parameter names (empty for scripts); a
/// lexical declaration may not reuse a parameter, a `var` name, or a
/// function name of the same scope.
pub fn var_scope(params: &[Arc<str>], body: &[Stmt]) -> Result<VarScope> {
    let mut var_names = Vec::new();
    collect_var_names(body, &mut var_names);
    let functions = collect_functions(body);
    let lexical = collect_lexical(body)?;

    for decl in &lexical {
        let clashes = params.contains(&decl.name)
            || var_names.contains(&decl.name)
            || functions.iter().any(|f| f.name == decl.name);
        if clashes {
            return Err(redeclared(&decl.name));
        }
    }

    tracing::debug!(
        vars = var_names.len(),
        functions = functions.len(),
        lexical = lexical.len(),
        "hoisted function scope"
    );
    Ok(VarScope {
        var_names,
        functions,
        lexical,
    })
}

/// Pre-pass over a block.
///
/// Function declarations in a block are block-scoped, so they conflict with
/// lexical declarations and with each other, and every block-level name
/// conflicts with a `var` declared anywhere inside the block.
pub fn block_scope(body: &[Stmt]) -> Result<BlockScope> {
    let lexical = collect_lexical(body)?;
    let functions = collect_functions(body);

    let mut seen: Vec<&Arc<str>> = lexical.iter().map(|decl| &decl.name).collect();
    for f in &functions {
        if seen.contains(&&f.name) {
            return Err(redeclared(&f.name));
        }
        seen.push(&f.name);
    }

    let mut var_names = Vec::new();
    collect_var_names(body, &mut var_names);
    if let Some(name) = var_names.iter().find(|name| seen.contains(name)) {
        return Err(redeclared(name));
    }

    tracing::trace!(
        lexical = lexical.len(),
        functions = functions.len(),
        "hoisted block scope"
    );
    Ok(BlockScope { lexical, functions })
}
