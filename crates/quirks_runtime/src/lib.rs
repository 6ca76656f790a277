//! Realm, fake timers, promises, and asynchronous checks for quirks.
//!
//! This crate provides:
//! - [`Realm`] - A heap with globals, a microtask queue, and a fake clock
//! - [`RealmConfig`] - Host objects and runaway-loop kill switches
//! - Promise resolution and `Promise.prototype` methods ([`promise`])
//! - [`Done`] and [`run_async_check`] for checks that finish later

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod done;
pub mod jobs;
pub mod promise;
pub mod realm;
pub mod timers;

pub use config::RealmConfig;
pub use done::{CheckOutcome, Done, run_async_check};
pub use jobs::{Job, JobQueue, SharedJobs};
pub use realm::Realm;
pub use timers::{SharedTimers, Timer, TimerId, TimerQueue};
