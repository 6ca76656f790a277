//! Fake timer queue.
//!
//! Time only moves when the realm advances it. Timers are ordered by due
//! time, then by the order they were scheduled in.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use quirks_foundation::Value;

/// Handle returned by `setTimeout` / `setInterval`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u32);

impl TimerId {
    /// Returns the numeric id language code sees.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Recovers an id from the number language code passed back.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_number(n: f64) -> Option<Self> {
        if n.fract() != 0.0 || !(1.0..=f64::from(u32::MAX)).contains(&n) {
            return None;
        }
        Some(Self(n as u32))
    }
}

/// A scheduled callback.
#[derive(Clone, Debug)]
pub struct Timer {
    /// Handle.
    pub id: TimerId,
    /// Function to call.
    pub callback: Value,
    /// Extra arguments passed to the callback.
    pub args: Vec<Value>,
    /// Repeat period for intervals.
    pub interval: Option<u64>,
}

/// Pending timers and the fake clock.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: u64,
    next_id: u32,
    next_seq: u64,
    timers: BTreeMap<(u64, u64), Timer>,
}

/// Queue shared between a realm and its timer globals.
pub type SharedTimers = Rc<RefCell<TimerQueue>>;

impl TimerQueue {
    /// Current fake time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Returns true if no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.timers.keys().next().map(|(due, _)| *due)
    }

    /// Ids of every pending timer, in firing order.
    #[must_use]
    pub fn pending_ids(&self) -> Vec<TimerId> {
        self.timers.values().map(|timer| timer.id).collect()
    }

    /// Schedules `callback` to run `delay` ms from now.
    ///
    /// Intervals repeat every `delay` ms, with a minimum period of 1 ms.
    pub fn schedule(&mut self, callback: Value, delay: u64, args: Vec<Value>, repeat: bool) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let interval = repeat.then_some(delay.max(1));
        let due = self.now.saturating_add(interval.unwrap_or(delay));
        tracing::trace!(id = id.get(), due, repeat, "timer scheduled");
        self.insert(
            due,
            Timer {
                id,
                callback,
                args,
                interval,
            },
        );
        id
    }

    fn insert(&mut self, due: u64, timer: Timer) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert((due, seq), timer);
    }

    /// Puts an interval back in the queue for its next run.
    pub fn reschedule(&mut self, due: u64, timer: Timer) {
        self.insert(due, timer);
    }

    /// Cancels a pending timer. Returns false if it was not pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self
            .timers
            .iter()
            .find(|(_, timer)| timer.id == id)
            .map(|(key, _)| *key);
        match key {
            Some(key) => {
                self.timers.remove(&key);
                tracing::trace!(id = id.get(), "timer cleared");
                true
            }
            None => false,
        }
    }

    /// Removes and returns the earliest timer accepted by `filter`, with its
    /// due time.
    pub fn pop_next(&mut self, filter: impl Fn(u64, TimerId) -> bool) -> Option<(u64, Timer)> {
        let key = self
            .timers
            .iter()
            .find(|((due, _), timer)| filter(*due, timer.id))
            .map(|(key, _)| *key)?;
        let timer = self.timers.remove(&key)?;
        Some((key.0, timer))
    }

    /// Moves the clock forward. The clock never runs backwards.
    pub fn set_now(&mut self, now: u64) {
        self.now = self.now.max(now);
    }
}
