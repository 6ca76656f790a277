//! Passing methods as callbacks: the receiver is lost unless bound
//!
//! The record below stands in for an instance of
//! `class X { doSomething() { return this.someAttribute; } }`.

use quirks_coercion::{get_v, invoke};
use quirks_foundation::{ErrorName, Result, Value};
use quirks_runtime::{CheckOutcome, Realm, run_async_check};

use crate::{always_fail, done_if, is_error, realm};

fn instance(realm: &mut Realm, some_attribute: i32) -> Result<Value> {
    let do_something = realm.native_function("doSomething", |heap, this, _args| {
        get_v(heap, this, "someAttribute")
    });
    let x = realm.heap_mut().create_record([
        ("someAttribute", Value::from(some_attribute)),
        ("doSomething", do_something),
    ]);
    Ok(Value::Object(x))
}

#[test]
fn unbound_method_reference_loses_this() {
    let mut realm = realm();
    let outcome = run_async_check(&mut realm, |realm, done| {
        let x = instance(realm, 0)?;
        let method = get_v(realm.heap(), &x, "doSomething")?;

        let resolved = realm.promise_resolve(Value::Undefined)?;
        let unexpected = always_fail(realm, done)?;
        let on_error = done_if(realm, done, |heap, error| {
            is_error(heap, error, ErrorName::TypeError)
        })?;
        let fail = done.fail_callback(realm)?;

        let chained = realm.invoke(&resolved, "then", &[method])?;
        let chained = realm.invoke(&chained, "then", &[unexpected])?;
        let chained = realm.invoke(&chained, "catch", &[on_error])?;
        realm.invoke(&chained, "catch", &[fail])?;
        Ok(())
    });
    assert_eq!(outcome, CheckOutcome::Passed);
}

#[test]
fn the_lost_receiver_error_names_the_property() {
    let mut realm = realm();
    let x = instance(&mut realm, 0).unwrap();
    let method = get_v(realm.heap(), &x, "doSomething").unwrap();
    let err = realm.call(&method, &Value::Undefined, &[]).unwrap_err();
    assert_eq!(err.error_name(), Some(ErrorName::TypeError));
    let text = realm.describe_error(err);
    assert!(text.contains("Cannot read properties of undefined"), "{text}");
}

#[test]
fn bound_method_reference_keeps_this() {
    let some_attribute = 1;
    let mut realm = realm();
    let outcome = run_async_check(&mut realm, |realm, done| {
        let x = instance(realm, some_attribute)?;
        let method = get_v(realm.heap(), &x, "doSomething")?;
        let bound = realm.invoke(&method, "bind", &[x])?;

        let resolved = realm.promise_resolve(Value::Undefined)?;
        let on_result = done_if(realm, done, move |_heap, result| {
            *result == Value::from(some_attribute)
        })?;
        let fail = done.fail_callback(realm)?;

        let chained = realm.invoke(&resolved, "then", &[bound])?;
        let chained = realm.invoke(&chained, "then", &[on_result])?;
        realm.invoke(&chained, "catch", &[fail])?;
        Ok(())
    });
    assert_eq!(outcome, CheckOutcome::Passed);
}

#[test]
fn arrow_wrapper_keeps_this() {
    let some_attribute = 1;
    let mut realm = realm();
    let outcome = run_async_check(&mut realm, |realm, done| {
        let x = instance(realm, some_attribute)?;
        let arrow = realm.native_function("", move |heap, _this, _args| {
            invoke(heap, &x, "doSomething", &[])
        });

        let resolved = realm.promise_resolve(Value::Undefined)?;
        let on_result = done_if(realm, done, move |_heap, result| {
            *result == Value::from(some_attribute)
        })?;
        let fail = done.fail_callback(realm)?;

        let chained = realm.invoke(&resolved, "then", &[arrow])?;
        let chained = realm.invoke(&chained, "then", &[on_result])?;
        realm.invoke(&chained, "catch", &[fail])?;
        Ok(())
    });
    assert_eq!(outcome, CheckOutcome::Passed);
}
