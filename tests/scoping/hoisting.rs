//! Hoisting of `var` and function declarations

use quirks_foundation::{ErrorName, Value};
use quirks_scope::{Expr, Program, Stmt};

use crate::transcript;

#[test]
fn functions_can_be_called_before_their_declaration() {
    // var a = 2;
    // foo();
    // function foo() { a = 3; observe(a); var a; }
    // observe(a);
    let program = Program::strict(vec![
        Stmt::var("a", Some(Expr::num(2))),
        Stmt::call("foo", vec![]),
        Stmt::function(
            "foo",
            &[],
            vec![
                Stmt::assign("a", Expr::num(3)),
                Stmt::observe("inner a", Expr::ident("a")),
                Stmt::var("a", None),
            ],
        ),
        Stmt::observe("outer a", Expr::ident("a")),
    ]);

    let t = transcript(&program);
    assert_eq!(t.value("inner a"), Some(&Value::from(3)));
    assert_eq!(t.value("outer a"), Some(&Value::from(2)));
}

#[test]
fn var_reads_undefined_before_its_declaration() {
    let program = Program::strict(vec![
        Stmt::observe("before", Expr::ident("x")),
        Stmt::var("x", Some(Expr::num(1))),
        Stmt::observe("after", Expr::ident("x")),
    ]);

    let t = transcript(&program);
    assert_eq!(t.value("before"), Some(&Value::Undefined));
    assert_eq!(t.value("after"), Some(&Value::from(1)));
}

#[test]
fn let_is_hoisted_but_uninitialized() {
    let program = Program::strict(vec![
        Stmt::observe("before", Expr::ident("x")),
        Stmt::let_decl("x", Some(Expr::num(1))),
    ]);

    let t = transcript(&program);
    assert_eq!(t.error("before"), Some(ErrorName::ReferenceError));
}

#[test]
fn var_inside_a_block_is_hoisted_to_the_function() {
    let program = Program::strict(vec![
        Stmt::block(vec![Stmt::var("x", Some(Expr::num(1)))]),
        Stmt::observe("x", Expr::ident("x")),
    ]);

    let t = transcript(&program);
    assert_eq!(t.value("x"), Some(&Value::from(1)));
}
