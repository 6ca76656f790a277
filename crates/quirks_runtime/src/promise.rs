//! Promise resolution, reactions, and the `Promise.prototype` methods.
//!
//! Settling a promise never runs handlers directly. It queues one
//! [`Job::Reaction`] per registered handler, and the realm runs them when it
//! drains the microtask queue. Resolving with a thenable queues a
//! [`Job::ResolveThenable`] that adopts the thenable's eventual state.

use std::cell::Cell;
use std::rc::Rc;

use quirks_coercion::invoke;
use quirks_foundation::{
    Error, Heap, ObjectId, ObjectKind, PromiseCapability, PromiseReaction, PromiseState,
    PromiseStatus, ReactionKind, Result, SymbolId, Value,
};

use crate::jobs::{Job, SharedJobs};

fn state_mut(heap: &mut Heap, id: ObjectId) -> Result<&mut PromiseState> {
    match &mut heap.object_mut(id)?.kind {
        ObjectKind::Promise(state) => Ok(state),
        _ => Err(Error::internal(format!("{id:?} is not a promise"))),
    }
}

/// Returns the state of a promise, or `None` for non-promises.
#[must_use]
pub fn status(heap: &Heap, value: &Value) -> Option<PromiseStatus> {
    let object = heap.object(value.as_object()?).ok()?;
    match &object.kind {
        ObjectKind::Promise(state) => Some(state.status.clone()),
        _ => None,
    }
}

fn receiver(heap: &Heap, this: &Value, method: &str) -> Result<ObjectId> {
    match this.as_object() {
        Some(id) if heap.is_promise(this) => Ok(id),
        _ => Err(Error::type_error(format!(
            "Method Promise.prototype.{method} called on incompatible receiver"
        ))),
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Creates the `resolve` and `reject` functions handed to an executor.
///
/// Whichever is called first wins; later calls to either are ignored.
pub fn create_resolving_functions(
    heap: &mut Heap,
    jobs: &SharedJobs,
    promise: ObjectId,
) -> (Value, Value) {
    let already_resolved = Rc::new(Cell::new(false));

    let resolve = {
        let already_resolved = Rc::clone(&already_resolved);
        let jobs = Rc::clone(jobs);
        heap.native_function("", move |heap, _this, args| {
            if already_resolved.replace(true) {
                return Ok(Value::Undefined);
            }
            let resolution = args.first().cloned().unwrap_or(Value::Undefined);
            resolve_promise(heap, &jobs, promise, resolution)?;
            Ok(Value::Undefined)
        })
    };

    let reject = {
        let jobs = Rc::clone(jobs);
        heap.native_function("", move |heap, _this, args| {
            if already_resolved.replace(true) {
                return Ok(Value::Undefined);
            }
            let reason = args.first().cloned().unwrap_or(Value::Undefined);
            reject_promise(heap, &jobs, promise, reason)?;
            Ok(Value::Undefined)
        })
    };

    (resolve, reject)
}

/// The promise resolve function's body.
fn resolve_promise(
    heap: &mut Heap,
    jobs: &SharedJobs,
    promise: ObjectId,
    resolution: Value,
) -> Result<()> {
    let Some(id) = resolution.as_object() else {
        return fulfill_promise(heap, jobs, promise, resolution);
    };
    if id == promise {
        let error = Error::type_error("Chaining cycle detected for promise #<Promise>");
        let reason = heap.materialize(error);
        return reject_promise(heap, jobs, promise, reason);
    }
    let then = match heap.get(id, "then") {
        Ok(then) => then,
        Err(error) if error.is_catchable() => {
            let reason = heap.materialize(error);
            return reject_promise(heap, jobs, promise, reason);
        }
        Err(error) => return Err(error),
    };
    if !heap.is_callable(&then) {
        return fulfill_promise(heap, jobs, promise, resolution);
    }
    jobs.borrow_mut().enqueue(Job::ResolveThenable {
        promise,
        thenable: resolution,
        then,
    });
    Ok(())
}

fn fulfill_promise(heap: &mut Heap, jobs: &SharedJobs, promise: ObjectId, value: Value) -> Result<()> {
    settle(heap, jobs, promise, ReactionKind::Fulfill, value)
}

fn reject_promise(heap: &mut Heap, jobs: &SharedJobs, promise: ObjectId, reason: Value) -> Result<()> {
    settle(heap, jobs, promise, ReactionKind::Reject, reason)
}

fn settle(
    heap: &mut Heap,
    jobs: &SharedJobs,
    promise: ObjectId,
    kind: ReactionKind,
    argument: Value,
) -> Result<()> {
    let state = state_mut(heap, promise)?;
    if !state.is_pending() {
        return Ok(());
    }
    let fulfill_reactions = std::mem::take(&mut state.fulfill_reactions);
    let reject_reactions = std::mem::take(&mut state.reject_reactions);
    let reactions = match kind {
        ReactionKind::Fulfill => {
            state.status = PromiseStatus::Fulfilled(argument.clone());
            fulfill_reactions
        }
        ReactionKind::Reject => {
            state.status = PromiseStatus::Rejected(argument.clone());
            reject_reactions
        }
    };
    tracing::trace!(?promise, ?kind, reactions = reactions.len(), "promise settled");

    let mut queue = jobs.borrow_mut();
    for reaction in reactions {
        queue.enqueue(Job::Reaction {
            reaction,
            argument: argument.clone(),
        });
    }
    Ok(())
}

/// Creates a pending promise with its resolving functions.
pub fn new_capability(heap: &mut Heap, jobs: &SharedJobs) -> PromiseCapability {
    let id = heap.create_promise();
    let (resolve, reject) = create_resolving_functions(heap, jobs, id);
    PromiseCapability {
        promise: Value::Object(id),
        resolve,
        reject,
    }
}

/// Registers handlers on `promise`, queueing them at once if it already
/// settled. Handlers that are not callable pass the value through.
pub fn perform_then(
    heap: &mut Heap,
    jobs: &SharedJobs,
    promise: ObjectId,
    on_fulfilled: &Value,
    on_rejected: &Value,
    capability: Option<PromiseCapability>,
) -> Result<()> {
    let fulfill = PromiseReaction {
        capability: capability.clone(),
        kind: ReactionKind::Fulfill,
        handler: heap.is_callable(on_fulfilled).then(|| on_fulfilled.clone()),
    };
    let reject = PromiseReaction {
        capability,
        kind: ReactionKind::Reject,
        handler: heap.is_callable(on_rejected).then(|| on_rejected.clone()),
    };

    let state = state_mut(heap, promise)?;
    state.is_handled = true;
    match state.status.clone() {
        PromiseStatus::Pending => {
            state.fulfill_reactions.push(fulfill);
            state.reject_reactions.push(reject);
        }
        PromiseStatus::Fulfilled(value) => jobs.borrow_mut().enqueue(Job::Reaction {
            reaction: fulfill,
            argument: value,
        }),
        PromiseStatus::Rejected(reason) => jobs.borrow_mut().enqueue(Job::Reaction {
            reaction: reject,
            argument: reason,
        }),
    }
    Ok(())
}

// =============================================================================
// Jobs
// =============================================================================

/// Runs one microtask.
pub(crate) fn run_job(heap: &mut Heap, jobs: &SharedJobs, job: Job) -> Result<()> {
    match job {
        Job::Reaction { reaction, argument } => {
            let outcome = match &reaction.handler {
                Some(handler) => heap.call(handler, &Value::Undefined, &[argument]),
                None => match reaction.kind {
                    ReactionKind::Fulfill => Ok(argument),
                    ReactionKind::Reject => Err(Error::thrown(argument)),
                },
            };
            let Some(capability) = reaction.capability else {
                return match outcome {
                    Err(error) if !error.is_catchable() => Err(error),
                    _ => Ok(()),
                };
            };
            match outcome {
                Ok(value) => {
                    heap.call(&capability.resolve, &Value::Undefined, &[value])?;
                }
                Err(error) if error.is_catchable() => {
                    let reason = heap.materialize(error);
                    heap.call(&capability.reject, &Value::Undefined, &[reason])?;
                }
                Err(error) => return Err(error),
            }
            Ok(())
        }
        Job::ResolveThenable {
            promise,
            thenable,
            then,
        } => {
            let (resolve, reject) = create_resolving_functions(heap, jobs, promise);
            match heap.call(&then, &thenable, &[resolve, reject.clone()]) {
                Ok(_) => Ok(()),
                Err(error) if error.is_catchable() => {
                    let reason = heap.materialize(error);
                    heap.call(&reject, &Value::Undefined, &[reason])?;
                    Ok(())
                }
                Err(error) => Err(error),
            }
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// `new Promise(executor)`.
///
/// An executor that throws rejects the promise instead of propagating.
pub fn promise_new(heap: &mut Heap, jobs: &SharedJobs, executor: &Value) -> Result<Value> {
    if !heap.is_callable(executor) {
        return Err(Error::type_error(format!(
            "Promise resolver {executor:?} is not a function"
        )));
    }
    let id = heap.create_promise();
    let (resolve, reject) = create_resolving_functions(heap, jobs, id);
    match heap.call(executor, &Value::Undefined, &[resolve, reject.clone()]) {
        Ok(_) => {}
        Err(error) if error.is_catchable() => {
            let reason = heap.materialize(error);
            heap.call(&reject, &Value::Undefined, &[reason])?;
        }
        Err(error) => return Err(error),
    }
    Ok(Value::Object(id))
}

/// `Promise.resolve(value)`: promises come back unchanged.
pub fn promise_resolve(heap: &mut Heap, jobs: &SharedJobs, value: Value) -> Result<Value> {
    if heap.is_promise(&value) {
        return Ok(value);
    }
    let capability = new_capability(heap, jobs);
    heap.call(&capability.resolve, &Value::Undefined, &[value])?;
    Ok(capability.promise)
}

/// `Promise.reject(reason)`.
pub fn promise_reject(heap: &mut Heap, jobs: &SharedJobs, reason: Value) -> Result<Value> {
    let capability = new_capability(heap, jobs);
    heap.call(&capability.reject, &Value::Undefined, &[reason])?;
    Ok(capability.promise)
}

// =============================================================================
// Prototype Methods
// =============================================================================

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

/// Installs `then`, `catch` and `finally` on `Promise.prototype`.
pub fn install(heap: &mut Heap, jobs: &SharedJobs) -> Result<()> {
    let proto = heap.intrinsics().promise_prototype;

    let then = {
        let jobs = Rc::clone(jobs);
        heap.native_function("then", move |heap, this, args| {
            let promise = receiver(heap, this, "then")?;
            let capability = new_capability(heap, &jobs);
            let derived = capability.promise.clone();
            perform_then(heap, &jobs, promise, &arg(args, 0), &arg(args, 1), Some(capability))?;
            Ok(derived)
        })
    };
    heap.define_hidden(proto, "then", then)?;

    let catch = heap.native_function("catch", |heap, this, args| {
        invoke(heap, this, "then", &[Value::Undefined, arg(args, 0)])
    });
    heap.define_hidden(proto, "catch", catch)?;

    let finally = {
        let jobs = Rc::clone(jobs);
        heap.native_function("finally", move |heap, this, args| {
            let on_finally = arg(args, 0);
            if !heap.is_callable(&on_finally) {
                return invoke(heap, this, "then", &[on_finally.clone(), on_finally]);
            }
            let then_finally = finally_handler(heap, &jobs, on_finally.clone(), false);
            let catch_finally = finally_handler(heap, &jobs, on_finally, true);
            invoke(heap, this, "then", &[then_finally, catch_finally])
        })
    };
    heap.define_hidden(proto, "finally", finally)?;

    heap.define_hidden(proto, SymbolId::TO_STRING_TAG, Value::from("Promise"))?;
    tracing::debug!("installed promise intrinsics");
    Ok(())
}

/// Wraps `on_finally` so it runs without arguments and then passes the
/// original value (or rethrows the original reason) once its own result
/// settles.
fn finally_handler(heap: &mut Heap, jobs: &SharedJobs, on_finally: Value, rethrow: bool) -> Value {
    let jobs = Rc::clone(jobs);
    heap.native_function("", move |heap, _this, args| {
        let original = arg(args, 0);
        let result = heap.call(&on_finally, &Value::Undefined, &[])?;
        let settled = promise_resolve(heap, &jobs, result)?;
        let pass_through = heap.native_function("", move |_heap, _this, _args| {
            if rethrow {
                Err(Error::thrown(original.clone()))
            } else {
                Ok(original.clone())
            }
        });
        invoke(heap, &settled, "then", &[pass_through])
    })
}

/// Creates the `Promise` constructor with its `resolve` and `reject`
/// statics.
pub fn constructor(heap: &mut Heap, jobs: &SharedJobs) -> Result<Value> {
    let ctor = {
        let jobs = Rc::clone(jobs);
        heap.native_function("Promise", move |heap, _this, args| {
            promise_new(heap, &jobs, &arg(args, 0))
        })
    };
    let Some(id) = ctor.as_object() else {
        return Err(Error::internal("Promise constructor is not an object"));
    };

    let resolve = {
        let jobs = Rc::clone(jobs);
        heap.native_function("resolve", move |heap, _this, args| {
            promise_resolve(heap, &jobs, arg(args, 0))
        })
    };
    let reject = {
        let jobs = Rc::clone(jobs);
        heap.native_function("reject", move |heap, _this, args| {
            promise_reject(heap, &jobs, arg(args, 0))
        })
    };
    let proto = heap.intrinsics().promise_prototype;
    heap.define_hidden(id, "resolve", resolve)?;
    heap.define_hidden(id, "reject", reject)?;
    heap.define_hidden(id, "prototype", Value::Object(proto))?;
    heap.define_hidden(proto, "constructor", ctor.clone())?;
    Ok(ctor)
}
