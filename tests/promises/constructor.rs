//! `new Promise(executor)`: the executor's `resolve` and `reject`

use quirks_foundation::Value;
use quirks_runtime::{CheckOutcome, run_async_check};

use crate::{always_fail, done_if, realm};

#[test]
fn resolve_signals_success() {
    let mut realm = realm();
    let outcome = run_async_check(&mut realm, |realm, done| {
        let executor = realm.native_function("", |heap, _this, args| {
            let resolve = args.first().cloned().unwrap_or(Value::Undefined);
            heap.call(&resolve, &Value::Undefined, &[Value::from(42)])
        });
        let promise = realm.promise_new(&executor)?;

        let on_result = done_if(realm, done, |_heap, result| *result == Value::from(42))?;
        let chained = realm.invoke(&promise, "then", &[on_result])?;
        let fail = done.fail_callback(realm)?;
        realm.invoke(&chained, "catch", &[fail])?;
        Ok(())
    });
    assert_eq!(outcome, CheckOutcome::Passed);
}

#[test]
fn reject_signals_failure() {
    let mut realm = realm();
    let outcome = run_async_check(&mut realm, |realm, done| {
        let executor = realm.native_function("", |heap, _this, args| {
            let reject = args.get(1).cloned().unwrap_or(Value::Undefined);
            heap.call(&reject, &Value::Undefined, &[Value::from(42)])
        });
        let promise = realm.promise_new(&executor)?;

        let unexpected = always_fail(realm, done)?;
        let on_error = done_if(realm, done, |_heap, error| *error == Value::from(42))?;
        let fail = done.fail_callback(realm)?;
        let chained = realm.invoke(&promise, "then", &[unexpected])?;
        let chained = realm.invoke(&chained, "catch", &[on_error])?;
        realm.invoke(&chained, "catch", &[fail])?;
        Ok(())
    });
    assert_eq!(outcome, CheckOutcome::Passed);
}

#[test]
fn a_throwing_executor_rejects() {
    let mut realm = realm();
    let outcome = run_async_check(&mut realm, |realm, done| {
        let executor = realm.native_function("", |_heap, _this, _args| {
            Err(quirks_foundation::Error::thrown(Value::from("boom")))
        });
        let promise = realm.promise_new(&executor)?;
        let on_error = done_if(realm, done, |_heap, error| *error == Value::from("boom"))?;
        realm.invoke(&promise, "catch", &[on_error])?;
        Ok(())
    });
    assert_eq!(outcome, CheckOutcome::Passed);
}

#[test]
fn the_constructor_is_a_global() {
    let mut realm = realm();
    let promise_ctor = realm.global_get("Promise").unwrap();
    let resolved = realm.invoke(&promise_ctor, "resolve", &[Value::from(1)]).unwrap();
    assert!(realm.heap().is_promise(&resolved));
}
