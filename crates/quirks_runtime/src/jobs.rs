//! The microtask queue.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use quirks_foundation::{Error, Heap, ObjectId, PromiseReaction, Result, SemanticLimit, Value};

use crate::promise;

/// A queued microtask.
#[derive(Clone, Debug)]
pub enum Job {
    /// Runs a `then` handler with the settled value.
    Reaction {
        /// The registered reaction.
        reaction: PromiseReaction,
        /// Fulfillment value or rejection reason.
        argument: Value,
    },
    /// Calls a thenable's `then` to adopt its state into `promise`.
    ResolveThenable {
        /// Promise being resolved.
        promise: ObjectId,
        /// The object that was resolved with.
        thenable: Value,
        /// Its `then` method.
        then: Value,
    },
}

/// FIFO of pending microtasks.
#[derive(Debug, Default)]
pub struct JobQueue {
    queue: VecDeque<Job>,
    executed: usize,
}

/// Queue shared between a realm and the functions it installs.
pub type SharedJobs = Rc<RefCell<JobQueue>>;

impl JobQueue {
    /// Appends a job.
    pub fn enqueue(&mut self, job: Job) {
        self.queue.push_back(job);
    }

    /// Number of queued jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total jobs run over the queue's lifetime.
    #[must_use]
    pub fn executed(&self) -> usize {
        self.executed
    }

    fn next(&mut self) -> Option<Job> {
        let job = self.queue.pop_front()?;
        self.executed += 1;
        Some(job)
    }
}

/// Runs queued jobs, including ones they enqueue, until the queue is empty.
///
/// Returns the number of jobs run.
///
/// # Errors
/// Returns `LimitExceeded` if more than `limit` jobs run, and propagates
/// errors that language code cannot catch.
pub fn drain(heap: &mut Heap, jobs: &SharedJobs, limit: usize) -> Result<usize> {
    let mut ran = 0;
    loop {
        let Some(job) = jobs.borrow_mut().next() else {
            break;
        };
        ran += 1;
        if ran > limit {
            tracing::debug!(limit, "microtask kill switch tripped");
            return Err(Error::limit_exceeded(SemanticLimit::MaxMicrotasks { limit }));
        }
        promise::run_job(heap, jobs, job)?;
    }
    if ran > 0 {
        tracing::trace!(ran, "drained microtasks");
    }
    Ok(ran)
}
