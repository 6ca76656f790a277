//! When promise callbacks run relative to synchronous code and timers

use std::cell::RefCell;
use std::rc::Rc;

use quirks_coercion::invoke;
use quirks_foundation::{ErrorName, PromiseStatus, Value};
use quirks_runtime::{CheckOutcome, Realm, RealmConfig, run_async_check};

use crate::{done_if, is_error, realm};

type Log = Rc<RefCell<Vec<&'static str>>>;

fn logger(realm: &mut Realm, log: &Log, entry: &'static str) -> Value {
    let log = Rc::clone(log);
    realm.native_function("", move |_heap, _this, _args| {
        log.borrow_mut().push(entry);
        Ok(Value::Undefined)
    })
}

#[test]
fn handlers_wait_for_the_current_job_to_finish() {
    let mut realm = realm();
    let log: Log = Rc::default();

    let resolved = realm.promise_resolve(Value::from(1)).unwrap();
    let handler = logger(&mut realm, &log, "then");
    realm.invoke(&resolved, "then", &[handler]).unwrap();
    log.borrow_mut().push("sync");
    assert_eq!(*log.borrow(), vec!["sync"]);

    realm.run_microtasks().unwrap();
    assert_eq!(*log.borrow(), vec!["sync", "then"]);
}

#[test]
fn microtasks_run_before_timers() {
    let mut realm = realm();
    let log: Log = Rc::default();

    let timeout = logger(&mut realm, &log, "timeout");
    realm.set_timeout(timeout, 0, vec![]).unwrap();
    let resolved = realm.promise_resolve(Value::Undefined).unwrap();
    let handler = logger(&mut realm, &log, "promise");
    realm.invoke(&resolved, "then", &[handler]).unwrap();

    realm.run_microtasks().unwrap();
    realm.run_all_timers().unwrap();
    assert_eq!(*log.borrow(), vec!["promise", "timeout"]);
}

#[test]
fn promises_settled_by_timers_are_awaited() {
    let mut realm = realm();
    let outcome = run_async_check(&mut realm, |realm, done| {
        let captured = Rc::new(RefCell::new(Value::Undefined));
        let executor = {
            let captured = Rc::clone(&captured);
            realm.native_function("", move |_heap, _this, args| {
                *captured.borrow_mut() = args.first().cloned().unwrap_or(Value::Undefined);
                Ok(Value::Undefined)
            })
        };
        let promise = realm.promise_new(&executor)?;
        let later = realm.native_function("", move |heap, _this, _args| {
            let resolve = captured.borrow().clone();
            heap.call(&resolve, &Value::Undefined, &[Value::from("late")])
        });
        realm.set_timeout(later, 1000, vec![])?;

        let on_result = done_if(realm, done, |_heap, result| *result == Value::from("late"))?;
        realm.invoke(&promise, "then", &[on_result])?;
        Ok(())
    });
    assert_eq!(outcome, CheckOutcome::Passed);
    assert_eq!(realm.now(), 1000);
}

#[test]
fn resolving_a_promise_with_itself_is_a_type_error() {
    let mut realm = realm();
    let captured = Rc::new(RefCell::new(Value::Undefined));
    let executor = {
        let captured = Rc::clone(&captured);
        realm.native_function("", move |_heap, _this, args| {
            *captured.borrow_mut() = args.first().cloned().unwrap_or(Value::Undefined);
            Ok(Value::Undefined)
        })
    };
    let promise = realm.promise_new(&executor).unwrap();
    let resolve = captured.borrow().clone();
    realm.call(&resolve, &Value::Undefined, &[promise.clone()]).unwrap();
    realm.run_microtasks().unwrap();
    assert!(matches!(
        realm.promise_status(&promise),
        Some(PromiseStatus::Rejected(_))
    ));

    let outcome = run_async_check(&mut realm, |realm, done| {
        let on_error = done_if(realm, done, |heap, error| {
            is_error(heap, error, ErrorName::TypeError)
        })?;
        realm.invoke(&promise, "catch", &[on_error])?;
        Ok(())
    });
    assert_eq!(outcome, CheckOutcome::Passed);
}

#[test]
fn finally_passes_the_value_through() {
    let mut realm = realm();
    let log: Log = Rc::default();
    let outcome = run_async_check(&mut realm, |realm, done| {
        let resolved = realm.promise_resolve(Value::from(7))?;
        let cleanup = logger(realm, &log, "finally");
        let on_result = done_if(realm, done, |_heap, result| *result == Value::from(7))?;
        let chained = realm.invoke(&resolved, "finally", &[cleanup])?;
        realm.invoke(&chained, "then", &[on_result])?;
        Ok(())
    });
    assert_eq!(outcome, CheckOutcome::Passed);
    assert_eq!(*log.borrow(), vec!["finally"]);
}

#[test]
fn an_endless_then_chain_trips_the_microtask_limit() {
    let mut realm = Realm::new(RealmConfig::default().with_microtask_limit(100)).unwrap();
    let promise_ctor = realm.global_get("Promise").unwrap();

    // handler = () => Promise.resolve().then(handler)
    let this_handler = Rc::new(RefCell::new(Value::Undefined));
    let handler = {
        let this_handler = Rc::clone(&this_handler);
        realm.native_function("", move |heap, _this, _args| {
            let handler = this_handler.borrow().clone();
            let next = invoke(heap, &promise_ctor, "resolve", &[])?;
            invoke(heap, &next, "then", &[handler])
        })
    };
    *this_handler.borrow_mut() = handler.clone();

    let resolved = realm.promise_resolve(Value::Undefined).unwrap();
    realm.invoke(&resolved, "then", &[handler]).unwrap();

    let err = realm.run_microtasks().unwrap_err();
    assert!(!err.is_catchable());
}
