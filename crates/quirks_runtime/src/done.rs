//! Completion signal for asynchronous checks.

use std::cell::RefCell;
use std::rc::Rc;

use quirks_coercion::to_string;
use quirks_foundation::{Error, Heap, Result, Value};

use crate::realm::Realm;

/// How an asynchronous check ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// `done()` was called exactly once without an error.
    Passed,
    /// The check failed; the reason is display text.
    Failed(String),
    /// The simulated timeout elapsed before any signal.
    TimedOut,
}

impl CheckOutcome {
    /// Returns true for [`CheckOutcome::Passed`].
    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

type Signals = Rc<RefCell<Vec<std::result::Result<(), String>>>>;

/// The `done` callback handed to an asynchronous check.
///
/// `done()` signals success, `done(error)` and `done.fail(reason)` signal
/// failure. Exactly one signal is expected.
pub struct Done {
    callback: Value,
    signals: Signals,
}

fn describe(heap: &mut Heap, value: &Value) -> String {
    match to_string(heap, value) {
        Ok(text) => text.to_string(),
        Err(_) => format!("{value:?}"),
    }
}

impl Done {
    /// Creates the `done` function (with its `fail` method) in `realm`.
    ///
    /// # Errors
    /// Returns an error if the function object cannot be built.
    pub fn new(realm: &mut Realm) -> Result<Self> {
        let signals: Signals = Rc::default();

        let callback = {
            let signals = Rc::clone(&signals);
            realm.native_function("done", move |heap, _this, args| {
                let signal = match args.first() {
                    None | Some(Value::Undefined) => Ok(()),
                    Some(error) => Err(describe(heap, error)),
                };
                signals.borrow_mut().push(signal);
                Ok(Value::Undefined)
            })
        };
        let fail = {
            let signals = Rc::clone(&signals);
            realm.native_function("fail", move |heap, _this, args| {
                let reason = match args.first() {
                    Some(reason) => describe(heap, reason),
                    None => "done.fail() called".to_string(),
                };
                signals.borrow_mut().push(Err(reason));
                Ok(Value::Undefined)
            })
        };
        let Some(id) = callback.as_object() else {
            return Err(Error::internal("done callback is not an object"));
        };
        realm.heap_mut().set(id, "fail", fail)?;

        Ok(Self { callback, signals })
    }

    /// The `done` function value.
    #[must_use]
    pub fn callback(&self) -> &Value {
        &self.callback
    }

    /// The `done.fail` function value.
    ///
    /// # Errors
    /// Returns an error if the property cannot be read.
    pub fn fail_callback(&self, realm: &Realm) -> Result<Value> {
        let Some(id) = self.callback.as_object() else {
            return Err(Error::internal("done callback is not an object"));
        };
        realm.heap().get(id, "fail")
    }

    /// Number of signals received so far.
    #[must_use]
    pub fn signal_count(&self) -> usize {
        self.signals.borrow().len()
    }

    /// The outcome the signals received so far imply, if any.
    #[must_use]
    pub fn outcome(&self) -> Option<CheckOutcome> {
        let signals = self.signals.borrow();
        match signals.as_slice() {
            [] => None,
            [Ok(())] => Some(CheckOutcome::Passed),
            [Err(reason)] => Some(CheckOutcome::Failed(reason.clone())),
            _ => Some(CheckOutcome::Failed(format!(
                "done() called {} times",
                signals.len()
            ))),
        }
    }
}

/// Runs an asynchronous check.
///
/// `body` schedules work and arranges for `done` to be called. The realm
/// then drains microtasks and advances fake time, timer by timer, until a
/// signal arrives or `async_timeout_ms` of simulated time has passed. An
/// error escaping `body`, a timer callback, or a microtask fails the check.
pub fn run_async_check(
    realm: &mut Realm,
    body: impl FnOnce(&mut Realm, &Done) -> Result<()>,
) -> CheckOutcome {
    let done = match Done::new(realm) {
        Ok(done) => done,
        Err(error) => return CheckOutcome::Failed(realm.describe_error(error)),
    };
    if let Err(error) = body(realm, &done) {
        return CheckOutcome::Failed(realm.describe_error(error));
    }

    let deadline = realm.now().saturating_add(realm.config().async_timeout_ms);
    loop {
        if let Err(error) = realm.run_microtasks() {
            return CheckOutcome::Failed(realm.describe_error(error));
        }
        if done.signal_count() > 0 {
            break;
        }
        let now = realm.now();
        let step = match realm.next_timer_due() {
            Some(due) if due <= deadline => due.saturating_sub(now),
            _ => {
                if let Err(error) = realm.advance_timers_by_time(deadline.saturating_sub(now)) {
                    return CheckOutcome::Failed(realm.describe_error(error));
                }
                if done.signal_count() > 0 {
                    break;
                }
                tracing::debug!(deadline, "asynchronous check timed out");
                return CheckOutcome::TimedOut;
            }
        };
        if let Err(error) = realm.advance_timers_by_time(step) {
            return CheckOutcome::Failed(realm.describe_error(error));
        }
    }

    // Late signals queued behind the first one still count.
    if let Err(error) = realm.run_microtasks() {
        return CheckOutcome::Failed(realm.describe_error(error));
    }
    done.outcome().unwrap_or(CheckOutcome::TimedOut)
}
