//! A realm: heap, globals, microtasks, and the fake clock.

use std::cell::RefCell;
use std::rc::Rc;

use quirks_coercion::{to_number, to_string};
use quirks_foundation::{
    Error, Heap, ObjectId, PromiseStatus, PropertyKey, Result, SemanticLimit, Value,
};

use crate::config::RealmConfig;
use crate::jobs::{self, JobQueue, SharedJobs};
use crate::promise;
use crate::timers::{SharedTimers, TimerId, TimerQueue};

/// Everything one check runs against.
///
/// The realm owns its heap with every intrinsic method installed, a global
/// object holding the timer functions and `Promise` (and `document` when
/// configured), the microtask queue, and the fake timer queue.
pub struct Realm {
    heap: Heap,
    global: ObjectId,
    jobs: SharedJobs,
    timers: SharedTimers,
    document_all: Option<Value>,
    config: RealmConfig,
}

impl Realm {
    /// Creates a realm.
    ///
    /// # Errors
    /// Returns an error if installing the intrinsics fails.
    pub fn new(config: RealmConfig) -> Result<Self> {
        let mut heap = quirks_coercion::bootstrap()?;
        let jobs: SharedJobs = Rc::new(RefCell::new(JobQueue::default()));
        let timers: SharedTimers = Rc::new(RefCell::new(TimerQueue::default()));
        promise::install(&mut heap, &jobs)?;

        let global = heap.create_object();
        let promise_ctor = promise::constructor(&mut heap, &jobs)?;
        heap.set(global, "Promise", promise_ctor)?;
        install_timer_globals(&mut heap, global, &timers)?;

        let document_all = if config.legacy_document_all {
            let all = Value::Object(heap.create_legacy_html_dda());
            let document = heap.create_record([("all", all.clone())]);
            heap.set(global, "document", Value::Object(document))?;
            Some(all)
        } else {
            None
        };

        tracing::debug!(
            objects = heap.len(),
            document_all = document_all.is_some(),
            "realm created"
        );
        Ok(Self {
            heap,
            global,
            jobs,
            timers,
            document_all,
            config,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The heap.
    #[must_use]
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The heap, mutably.
    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// The configuration the realm was created with.
    #[must_use]
    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    /// The global object.
    #[must_use]
    pub fn global(&self) -> Value {
        Value::Object(self.global)
    }

    /// Reads a global binding, such as `setTimeout` or `Promise`.
    ///
    /// # Errors
    /// Returns `ReferenceError` if no such global exists.
    pub fn global_get(&self, name: &str) -> Result<Value> {
        match self.heap.get_own(self.global, name)? {
            Some(value) => Ok(value),
            None => Err(Error::reference_error(format!("{name} is not defined"))),
        }
    }

    /// `document.all`, when the realm was configured with it.
    #[must_use]
    pub fn document_all(&self) -> Option<&Value> {
        self.document_all.as_ref()
    }

    // =========================================================================
    // Calls
    // =========================================================================

    /// `value[method](...args)`.
    ///
    /// # Errors
    /// Propagates property read and call errors.
    pub fn invoke(
        &mut self,
        value: &Value,
        method: impl Into<PropertyKey>,
        args: &[Value],
    ) -> Result<Value> {
        quirks_coercion::invoke(&mut self.heap, value, method, args)
    }

    /// `f.call(this, ...args)`.
    ///
    /// # Errors
    /// Propagates errors raised by `f`.
    pub fn call(&mut self, f: &Value, this: &Value, args: &[Value]) -> Result<Value> {
        self.heap.call(f, this, args)
    }

    /// Creates a native function in this realm.
    pub fn native_function(
        &mut self,
        name: &str,
        f: impl Fn(&mut Heap, &Value, &[Value]) -> Result<Value> + 'static,
    ) -> Value {
        self.heap.native_function(name, f)
    }

    /// Renders an error the way an uncaught exception would print.
    pub fn describe_error(&mut self, error: Error) -> String {
        if !error.is_catchable() {
            return error.to_string();
        }
        let value = self.heap.materialize(error);
        self.describe_value(&value)
    }

    /// Converts a value to display text, falling back to its debug form when
    /// it cannot be converted.
    pub fn describe_value(&mut self, value: &Value) -> String {
        match to_string(&mut self.heap, value) {
            Ok(text) => text.to_string(),
            Err(_) => format!("{value:?}"),
        }
    }

    // =========================================================================
    // Promises and Microtasks
    // =========================================================================

    /// `new Promise(executor)`.
    ///
    /// # Errors
    /// Returns `TypeError` if `executor` is not callable.
    pub fn promise_new(&mut self, executor: &Value) -> Result<Value> {
        promise::promise_new(&mut self.heap, &self.jobs, executor)
    }

    /// `Promise.resolve(value)`.
    ///
    /// # Errors
    /// Propagates errors that cannot become rejections.
    pub fn promise_resolve(&mut self, value: Value) -> Result<Value> {
        promise::promise_resolve(&mut self.heap, &self.jobs, value)
    }

    /// `Promise.reject(reason)`.
    ///
    /// # Errors
    /// Propagates errors that cannot become rejections.
    pub fn promise_reject(&mut self, reason: Value) -> Result<Value> {
        promise::promise_reject(&mut self.heap, &self.jobs, reason)
    }

    /// The state of a promise, or `None` for other values.
    #[must_use]
    pub fn promise_status(&self, value: &Value) -> Option<PromiseStatus> {
        promise::status(&self.heap, value)
    }

    /// Runs microtasks until the queue is empty. Returns how many ran.
    ///
    /// # Errors
    /// Returns `LimitExceeded` past the configured microtask limit.
    pub fn run_microtasks(&mut self) -> Result<usize> {
        jobs::drain(&mut self.heap, &self.jobs, self.config.microtask_limit)
    }

    /// Number of queued microtasks.
    #[must_use]
    pub fn pending_microtasks(&self) -> usize {
        self.jobs.borrow().len()
    }

    // =========================================================================
    // Fake Timers
    // =========================================================================

    /// `setTimeout(callback, delay, ...args)`.
    ///
    /// # Errors
    /// Returns `TypeError` if `callback` is not callable.
    pub fn set_timeout(&mut self, callback: Value, delay: u64, args: Vec<Value>) -> Result<TimerId> {
        schedule(&self.heap, &self.timers, callback, delay, args, false)
    }

    /// `setInterval(callback, delay, ...args)`.
    ///
    /// # Errors
    /// Returns `TypeError` if `callback` is not callable.
    pub fn set_interval(&mut self, callback: Value, delay: u64, args: Vec<Value>) -> Result<TimerId> {
        schedule(&self.heap, &self.timers, callback, delay, args, true)
    }

    /// `clearTimeout` / `clearInterval`. Returns false if the timer was not
    /// pending.
    pub fn clear_timer(&mut self, id: TimerId) -> bool {
        self.timers.borrow_mut().cancel(id)
    }

    /// Current fake time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.timers.borrow().now()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_timer_due(&self) -> Option<u64> {
        self.timers.borrow().next_due()
    }

    /// Moves the clock forward by `ms`, firing every timer that falls due,
    /// including ones scheduled along the way.
    ///
    /// # Errors
    /// Propagates errors thrown by callbacks, and returns `LimitExceeded`
    /// past the configured timer limit.
    pub fn advance_timers_by_time(&mut self, ms: u64) -> Result<()> {
        let target = self.now().saturating_add(ms);
        let mut ran = 0;
        while self.fire_next(|due, _| due <= target, &mut ran)? {}
        self.timers.borrow_mut().set_now(target);
        Ok(())
    }

    /// Advances to the next pending timer and fires it, `steps` times.
    ///
    /// # Errors
    /// Same as [`Realm::advance_timers_by_time`].
    pub fn advance_timers_to_next_timer(&mut self, steps: usize) -> Result<()> {
        for _ in 0..steps {
            let Some(due) = self.next_timer_due() else {
                break;
            };
            let now = self.now();
            self.advance_timers_by_time(due.saturating_sub(now))?;
        }
        Ok(())
    }

    /// Fires only the timers pending right now. Timers they schedule stay
    /// pending.
    ///
    /// # Errors
    /// Same as [`Realm::advance_timers_by_time`].
    pub fn run_only_pending_timers(&mut self) -> Result<()> {
        let mut pending = self.timers.borrow().pending_ids();
        let mut ran = 0;
        loop {
            let snapshot = pending.clone();
            let Some(id) = self.fire_next_matching(|_, id| snapshot.contains(&id), &mut ran)? else {
                break;
            };
            pending.retain(|p| *p != id);
        }
        Ok(())
    }

    /// Fires timers until none are left.
    ///
    /// # Errors
    /// Returns `LimitExceeded` when timers keep scheduling more timers past
    /// the configured limit.
    pub fn run_all_timers(&mut self) -> Result<()> {
        let mut ran = 0;
        while self.fire_next(|_, _| true, &mut ran)? {}
        Ok(())
    }

    fn fire_next(&mut self, filter: impl Fn(u64, TimerId) -> bool, ran: &mut usize) -> Result<bool> {
        Ok(self.fire_next_matching(filter, ran)?.is_some())
    }

    /// Pops the earliest accepted timer, moves the clock to it, runs it, and
    /// drains microtasks.
    fn fire_next_matching(
        &mut self,
        filter: impl Fn(u64, TimerId) -> bool,
        ran: &mut usize,
    ) -> Result<Option<TimerId>> {
        let popped = self.timers.borrow_mut().pop_next(filter);
        let Some((due, timer)) = popped else {
            return Ok(None);
        };

        *ran += 1;
        let limit = self.config.timer_loop_limit;
        if *ran > limit {
            tracing::debug!(limit, "timer kill switch tripped");
            return Err(Error::limit_exceeded(SemanticLimit::MaxTimerRuns { limit }));
        }

        {
            let mut timers = self.timers.borrow_mut();
            timers.set_now(due);
            if let Some(period) = timer.interval {
                timers.reschedule(due.saturating_add(period), timer.clone());
            }
        }

        tracing::trace!(id = timer.id.get(), due, "timer fired");
        self.heap.call(&timer.callback, &Value::Undefined, &timer.args)?;
        self.run_microtasks()?;
        Ok(Some(timer.id))
    }
}

fn schedule(
    heap: &Heap,
    timers: &SharedTimers,
    callback: Value,
    delay: u64,
    args: Vec<Value>,
    repeat: bool,
) -> Result<TimerId> {
    if !heap.is_callable(&callback) {
        return Err(Error::type_error(
            "The \"callback\" argument must be of type function",
        ));
    }
    Ok(timers.borrow_mut().schedule(callback, delay, args, repeat))
}

/// Converts a delay argument to whole milliseconds; NaN and negatives are 0.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn delay_from(heap: &mut Heap, value: Option<&Value>) -> Result<u64> {
    let n = match value {
        Some(value) => to_number(heap, value)?,
        None => 0.0,
    };
    if n.is_nan() || n <= 0.0 {
        return Ok(0);
    }
    Ok(n.min(u64::MAX as f64) as u64)
}

fn install_timer_globals(heap: &mut Heap, global: ObjectId, timers: &SharedTimers) -> Result<()> {
    for (name, repeat) in [("setTimeout", false), ("setInterval", true)] {
        let timers = Rc::clone(timers);
        let f = heap.native_function(name, move |heap, _this, args| {
            let callback = args.first().cloned().unwrap_or(Value::Undefined);
            let delay = delay_from(heap, args.get(1))?;
            let extra = args.iter().skip(2).cloned().collect();
            let id = schedule(heap, &timers, callback, delay, extra, repeat)?;
            Ok(Value::from(id.get()))
        });
        heap.set(global, name, f)?;
    }

    for name in ["clearTimeout", "clearInterval"] {
        let timers = Rc::clone(timers);
        let f = heap.native_function(name, move |heap, _this, args| {
            let id = match args.first() {
                Some(value) => to_number(heap, value)?,
                None => f64::NAN,
            };
            if let Some(id) = TimerId::from_number(id) {
                timers.borrow_mut().cancel(id);
            }
            Ok(Value::Undefined)
        });
        heap.set(global, name, f)?;
    }
    Ok(())
}
