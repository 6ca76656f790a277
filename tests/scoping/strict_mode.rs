//! Assignment to undeclared names in strict and sloppy mode

use quirks_foundation::{ErrorName, Value};
use quirks_scope::{Expr, Program, Stmt};

use crate::transcript;

fn assign_undeclared(program: fn(Vec<Stmt>) -> Program) -> Program {
    program(vec![
        Stmt::function("leak", &[], vec![Stmt::assign("a", Expr::num(1))]),
        Stmt::observe("leak()", Expr::call(Expr::ident("leak"), vec![])),
        Stmt::observe("a", Expr::ident("a")),
    ])
}

#[test]
fn strict_mode_rejects_implicit_globals() {
    let t = transcript(&assign_undeclared(Program::strict));
    assert_eq!(t.error("leak()"), Some(ErrorName::ReferenceError));
    assert_eq!(t.error("a"), Some(ErrorName::ReferenceError));
}

#[test]
fn sloppy_mode_creates_a_global() {
    let t = transcript(&assign_undeclared(Program::sloppy));
    assert_eq!(t.value("leak()"), Some(&Value::Undefined));
    assert_eq!(t.value("a"), Some(&Value::from(1)));
}
