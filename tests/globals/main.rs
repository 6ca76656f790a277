//! Conformance tests: globally available functions
//!
//! `setTimeout` and friends under fake timers: callbacks wait for the clock
//! to pass their delay and run exactly once.

use std::cell::Cell;
use std::rc::Rc;

use quirks_foundation::Value;
use quirks_runtime::{CheckOutcome, Realm, RealmConfig, run_async_check};

fn realm() -> Realm {
    Realm::new(RealmConfig::default()).unwrap()
}

/// A callback that counts its calls and sets `x` to 5.
fn counting_callback(realm: &mut Realm) -> (Value, Rc<Cell<u32>>, Rc<Cell<i32>>) {
    let calls = Rc::new(Cell::new(0));
    let x = Rc::new(Cell::new(0));
    let callback = {
        let calls = Rc::clone(&calls);
        let x = Rc::clone(&x);
        realm.native_function("", move |_heap, _this, _args| {
            calls.set(calls.get() + 1);
            x.set(5);
            Ok(Value::Undefined)
        })
    };
    (callback, calls, x)
}

// =============================================================================
// setTimeout
// =============================================================================

#[test]
fn set_timeout_delays_the_callback() {
    let time_to_wait = 200;
    let mut realm = realm();
    let (callback, calls, x) = counting_callback(&mut realm);

    realm.set_timeout(callback, time_to_wait, vec![]).unwrap();
    assert_eq!(x.get(), 0);

    realm.advance_timers_by_time(time_to_wait - 1).unwrap();
    assert_eq!(calls.get(), 0);

    realm.advance_timers_by_time(1).unwrap();
    assert_eq!(x.get(), 5);
    assert_eq!(calls.get(), 1);

    realm.advance_timers_by_time(time_to_wait * 10).unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn set_timeout_signals_done_from_the_callback() {
    let mut realm = realm();
    let x = Rc::new(Cell::new(0));
    let seen = Rc::clone(&x);

    let outcome = run_async_check(&mut realm, move |realm, done| {
        let done = done.callback().clone();
        let callback = realm.native_function("", move |heap, _this, _args| {
            seen.set(5);
            heap.call(&done, &Value::Undefined, &[])
        });
        realm.set_timeout(callback, 200, vec![])?;
        Ok(())
    });

    assert_eq!(outcome, CheckOutcome::Passed);
    assert_eq!(x.get(), 5);
    assert_eq!(realm.now(), 200);
}

#[test]
fn extra_arguments_are_passed_to_the_callback() {
    let mut realm = realm();
    let received = Rc::new(Cell::new(0.0));
    let callback = {
        let received = Rc::clone(&received);
        realm.native_function("", move |_heap, _this, args| {
            received.set(args.first().and_then(Value::as_number).unwrap_or(f64::NAN));
            Ok(Value::Undefined)
        })
    };

    realm.set_timeout(callback, 0, vec![Value::from(7)]).unwrap();
    realm.run_all_timers().unwrap();
    assert!((received.get() - 7.0).abs() < f64::EPSILON);
}

#[test]
fn cleared_timeouts_never_run() {
    let mut realm = realm();
    let (callback, calls, _x) = counting_callback(&mut realm);
    let id = realm.set_timeout(callback, 50, vec![]).unwrap();
    assert!(realm.clear_timer(id));
    realm.advance_timers_by_time(100).unwrap();
    assert_eq!(calls.get(), 0);
}

#[test]
fn timers_are_reachable_as_globals() {
    let mut realm = realm();
    let (callback, calls, _x) = counting_callback(&mut realm);
    let global = realm.global();
    let id = realm
        .invoke(&global, "setTimeout", &[callback, Value::from(10)])
        .unwrap();
    assert!(id.as_number().is_some());

    realm.invoke(&global, "clearTimeout", &[id]).unwrap();
    realm.run_all_timers().unwrap();
    assert_eq!(calls.get(), 0);
}

#[test]
fn non_callable_callback_is_a_type_error() {
    let mut realm = realm();
    let err = realm.set_timeout(Value::from(1), 10, vec![]).unwrap_err();
    assert_eq!(err.error_name(), Some(quirks_foundation::ErrorName::TypeError));
}

// =============================================================================
// setInterval
// =============================================================================

#[test]
fn intervals_repeat_until_cleared() {
    let mut realm = realm();
    let (callback, calls, _x) = counting_callback(&mut realm);
    let id = realm.set_interval(callback, 100, vec![]).unwrap();

    realm.advance_timers_by_time(350).unwrap();
    assert_eq!(calls.get(), 3);

    realm.clear_timer(id);
    realm.advance_timers_by_time(1000).unwrap();
    assert_eq!(calls.get(), 3);
}

#[test]
fn run_only_pending_timers_skips_newly_scheduled_runs() {
    let mut realm = realm();
    let (callback, calls, _x) = counting_callback(&mut realm);
    realm.set_interval(callback, 10, vec![]).unwrap();

    realm.run_only_pending_timers().unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(realm.pending_timers(), 1);
}

#[test]
fn run_all_timers_stops_runaway_intervals() {
    let mut realm = Realm::new(RealmConfig::default().with_timer_loop_limit(50)).unwrap();
    let (callback, calls, _x) = counting_callback(&mut realm);
    realm.set_interval(callback, 1, vec![]).unwrap();

    let err = realm.run_all_timers().unwrap_err();
    assert!(!err.is_catchable());
    assert_eq!(calls.get(), 50);
}
