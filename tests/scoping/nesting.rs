//! Inner scopes see outer names; outer scopes never see inner ones

use quirks_foundation::{ErrorName, Value};
use quirks_scope::{Expr, Program, Stmt};

use crate::transcript;

fn ident_sum(names: &[&str]) -> Expr {
    names
        .iter()
        .map(|name| Expr::ident(name))
        .reduce(Expr::add)
        .unwrap_or_else(Expr::undefined)
}

#[test]
fn names_resolve_outward_only() {
    let baz = Stmt::function(
        "baz",
        &[],
        vec![
            Stmt::var("c", Some(Expr::num(3))),
            Stmt::observe("a + b + c", ident_sum(&["a", "b", "c"])),
        ],
    );
    let bar = Stmt::function(
        "bar",
        &[],
        vec![
            Stmt::var("b", Some(Expr::num(2))),
            baz,
            Stmt::call("baz", vec![]),
            Stmt::observe("a + b", ident_sum(&["a", "b"])),
            Stmt::observe("c in bar", Expr::ident("c")),
        ],
    );
    let foo = Stmt::function(
        "foo",
        &[],
        vec![
            Stmt::var("a", Some(Expr::num(1))),
            bar,
            Stmt::call("bar", vec![]),
            Stmt::observe("a", Expr::ident("a")),
            Stmt::observe("b in foo", Expr::ident("b")),
            Stmt::observe("c in foo", Expr::ident("c")),
        ],
    );
    let program = Program::strict(vec![foo, Stmt::call("foo", vec![])]);

    let t = transcript(&program);
    assert_eq!(t.value("a + b + c"), Some(&Value::from(6)));
    assert_eq!(t.value("a + b"), Some(&Value::from(3)));
    assert_eq!(t.value("a"), Some(&Value::from(1)));
    for label in ["c in bar", "b in foo", "c in foo"] {
        assert_eq!(t.error(label), Some(ErrorName::ReferenceError), "{label}");
    }
}

#[test]
fn closures_capture_the_binding_not_the_value() {
    let program = Program::strict(vec![
        Stmt::var("n", Some(Expr::num(1))),
        Stmt::function("read", &[], vec![Stmt::ret(Some(Expr::ident("n")))]),
        Stmt::assign("n", Expr::num(2)),
        Stmt::observe("read()", Expr::call(Expr::ident("read"), vec![])),
    ]);

    let t = transcript(&program);
    assert_eq!(t.value("read()"), Some(&Value::from(2)));
}

#[test]
fn parameters_shadow_outer_names() {
    let program = Program::strict(vec![
        Stmt::var("x", Some(Expr::lit("outer"))),
        Stmt::function("f", &["x"], vec![Stmt::observe("param", Expr::ident("x"))]),
        Stmt::Expr(Expr::call(Expr::ident("f"), vec![Expr::lit("inner")])),
        Stmt::observe("global", Expr::ident("x")),
    ]);

    let t = transcript(&program);
    assert_eq!(t.value("param"), Some(&Value::from("inner")));
    assert_eq!(t.value("global"), Some(&Value::from("outer")));
}
