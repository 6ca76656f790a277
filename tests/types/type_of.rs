//! Behavior of `typeof`, and undefined vs. undeclared variables

use quirks_coercion::{bootstrap, builtins, type_of};
use quirks_foundation::{ErrorName, Heap, Value};
use quirks_scope::{Expr, Program, Stmt, run};

fn type_name(heap: &Heap, value: &Value) -> &'static str {
    type_of(heap, value).as_str()
}

// =============================================================================
// typeof
// =============================================================================

#[test]
fn typeof_number() {
    let heap = bootstrap().unwrap();
    assert_eq!(type_name(&heap, &Value::from(42)), "number");
}

#[test]
fn typeof_string() {
    let heap = bootstrap().unwrap();
    assert_eq!(type_name(&heap, &Value::from("42")), "string");
}

#[test]
fn typeof_boolean() {
    let heap = bootstrap().unwrap();
    assert_eq!(type_name(&heap, &Value::Bool(true)), "boolean");
    assert_eq!(type_name(&heap, &Value::Bool(false)), "boolean");
}

#[test]
fn typeof_object() {
    let mut heap = bootstrap().unwrap();
    let object = Value::Object(heap.create_object());
    assert_eq!(type_name(&heap, &object), "object");
}

#[test]
fn typeof_undefined() {
    let heap = bootstrap().unwrap();
    assert_eq!(type_name(&heap, &Value::Undefined), "undefined");
}

#[test]
fn typeof_symbol() {
    let mut heap = bootstrap().unwrap();
    let sym = builtins::symbol(&mut heap, &Value::Undefined).unwrap();
    assert_eq!(type_name(&heap, &sym), "symbol");
}

#[test]
fn typeof_null_is_object() {
    let heap = bootstrap().unwrap();
    assert_eq!(type_name(&heap, &Value::Null), "object");
}

#[test]
fn typeof_function() {
    let mut heap = bootstrap().unwrap();
    let f = heap.native_function("f", |_heap, _this, _args| Ok(Value::Undefined));
    assert_eq!(type_name(&heap, &f), "function");
}

#[test]
fn typeof_array_is_object() {
    let mut heap = bootstrap().unwrap();
    let array = Value::Object(heap.create_array([1, 2, 3].map(Value::from)));
    assert_eq!(type_name(&heap, &array), "object");
}

// =============================================================================
// Undefined vs. Undeclared
// =============================================================================

#[test]
fn typeof_undeclared_variable_is_undefined() {
    let mut heap = bootstrap().unwrap();
    let program = Program::strict(vec![Stmt::observe("typeof a", Expr::type_of(Expr::ident("a")))]);
    let transcript = run(&mut heap, &program).unwrap();
    assert_eq!(transcript.value("typeof a"), Some(&Value::from("undefined")));
}

#[test]
fn typeof_declared_but_unassigned_variable_is_undefined() {
    let mut heap = bootstrap().unwrap();
    let program = Program::strict(vec![
        Stmt::let_decl("a", None),
        Stmt::observe("typeof a", Expr::type_of(Expr::ident("a"))),
    ]);
    let transcript = run(&mut heap, &program).unwrap();
    assert_eq!(transcript.value("typeof a"), Some(&Value::from("undefined")));
}

#[test]
fn referencing_undeclared_variable_is_reference_error() {
    let mut heap = bootstrap().unwrap();
    let program = Program::strict(vec![Stmt::observe("b", Expr::ident("b"))]);
    let transcript = run(&mut heap, &program).unwrap();
    assert_eq!(transcript.error("b"), Some(ErrorName::ReferenceError));
}
