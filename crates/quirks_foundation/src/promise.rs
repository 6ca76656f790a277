//! Promise internal slots.
//!
//! Only the data lives here. Resolution, reaction jobs and the microtask
//! queue belong to the runtime layer.

use crate::value::Value;

/// `[[PromiseState]]` together with the settled value.
#[derive(Clone, Debug, PartialEq)]
pub enum PromiseStatus {
    /// Not settled yet.
    Pending,
    /// Fulfilled with a value.
    Fulfilled(Value),
    /// Rejected with a reason.
    Rejected(Value),
}

/// Which settlement a reaction waits for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReactionKind {
    /// Runs when the promise fulfills.
    Fulfill,
    /// Runs when the promise rejects.
    Reject,
}

/// A promise plus the functions that settle it.
#[derive(Clone, Debug)]
pub struct PromiseCapability {
    /// The derived promise.
    pub promise: Value,
    /// Its resolve function.
    pub resolve: Value,
    /// Its reject function.
    pub reject: Value,
}

/// A registered `then` handler.
#[derive(Clone, Debug)]
pub struct PromiseReaction {
    /// Promise settled with the handler's outcome (absent for internal awaits).
    pub capability: Option<PromiseCapability>,
    /// Fulfill or reject.
    pub kind: ReactionKind,
    /// Handler; `None` passes the value (or reason) straight through.
    pub handler: Option<Value>,
}

/// Internal slots of a promise object.
#[derive(Clone, Debug)]
pub struct PromiseState {
    /// Current state.
    pub status: PromiseStatus,
    /// Reactions waiting for fulfillment.
    pub fulfill_reactions: Vec<PromiseReaction>,
    /// Reactions waiting for rejection.
    pub reject_reactions: Vec<PromiseReaction>,
    /// Whether a rejection handler was ever attached.
    pub is_handled: bool,
}

impl PromiseState {
    /// Creates a pending promise state.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            status: PromiseStatus::Pending,
            fulfill_reactions: Vec::new(),
            reject_reactions: Vec::new(),
            is_handled: false,
        }
    }

    /// Returns true while the promise is unsettled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == PromiseStatus::Pending
    }
}

impl Default for PromiseState {
    fn default() -> Self {
        Self::pending()
    }
}
