//! Sequential pass: runs a declaration tree against a heap.
//!
//! Every function and block is hoisted first (see [`crate::hoist`]), then
//! its statements run in order. Declared functions become real heap
//! function objects that close over the environment they were declared in,
//! so they can be called, bound, or passed around like any other function.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use quirks_coercion::{add, type_of};
use quirks_foundation::{Error, ErrorName, Heap, NativeFn, Result, Value};

use crate::ast::{DeclKind, Expr, FunctionDecl, Program, Stmt};
use crate::env::{BindingKind, EnvId, Environments, ScopeKind};
use crate::hoist::{self, LexicalDecl};
use crate::pretty::function_source;

// =============================================================================
// Transcript
// =============================================================================

/// What an `observe` point saw.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The expression evaluated to a value.
    Value(Value),
    /// The expression raised a built-in error.
    Error(ErrorName),
    /// The expression threw a value that is not a built-in error.
    Thrown(Value),
}

/// Observations recorded while a program ran, in execution order.
///
/// A label observed more than once keeps every entry; [`Transcript::get`]
/// returns the first.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    entries: Vec<(Arc<str>, Outcome)>,
}

impl Transcript {
    /// Returns the first outcome recorded under `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|(l, _)| l.as_ref() == label)
            .map(|(_, outcome)| outcome)
    }

    /// Returns every outcome recorded under `label`.
    pub fn all<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Outcome> + 'a {
        self.entries
            .iter()
            .filter(move |(l, _)| l.as_ref() == label)
            .map(|(_, outcome)| outcome)
    }

    /// Returns the value observed under `label`, if it evaluated normally.
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&Value> {
        match self.get(label)? {
            Outcome::Value(value) => Some(value),
            Outcome::Error(_) | Outcome::Thrown(_) => None,
        }
    }

    /// Returns the error kind observed under `label`, if it raised one.
    #[must_use]
    pub fn error(&self, label: &str) -> Option<ErrorName> {
        match self.get(label)? {
            Outcome::Error(name) => Some(*name),
            Outcome::Value(_) | Outcome::Thrown(_) => None,
        }
    }

    /// Iterates over `(label, outcome)` pairs in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries.iter().map(|(l, o)| (l.as_ref(), o))
    }

    /// Number of recorded observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record(&mut self, label: Arc<str>, outcome: Outcome) {
        self.entries.push((label, outcome));
    }
}

// =============================================================================
// Interpreter
// =============================================================================

/// State shared between the top-level run and every declared function.
///
/// Borrows are kept short and never held across a call into the heap, since
/// a heap call may re-enter a declared function.
struct State {
    envs: Environments,
    transcript: Transcript,
    strict: bool,
}

type Shared = Rc<RefCell<State>>;

enum Completion {
    Normal,
    Return(Value),
}

/// Runs `program` and returns what its `observe` points recorded.
///
/// Early errors (conflicting declarations) and errors that escape the
/// top level are returned as `Err`. Errors raised inside an `observe`
/// expression are recorded instead.
pub fn run(heap: &mut Heap, program: &Program) -> Result<Transcript> {
    let state: Shared = Rc::new(RefCell::new(State {
        envs: Environments::new(),
        transcript: Transcript::default(),
        strict: program.strict,
    }));
    let global = state.borrow().envs.global();

    let scope = hoist::var_scope(&[], &program.body)?;
    declare_names(&state, global, &scope.var_names, &scope.lexical)?;
    instantiate_functions(heap, &state, global, &scope.functions)?;
    exec_body(heap, &state, global, &program.body)?;

    let transcript = std::mem::take(&mut state.borrow_mut().transcript);
    tracing::debug!(observations = transcript.len(), "program finished");
    Ok(transcript)
}

fn declare_names(
    state: &Shared,
    env: EnvId,
    var_names: &[Arc<str>],
    lexical: &[LexicalDecl],
) -> Result<()> {
    let mut st = state.borrow_mut();
    for name in var_names {
        st.envs.declare(env, name, BindingKind::Var)?;
    }
    for decl in lexical {
        st.envs.declare(env, &decl.name, decl.kind.into())?;
    }
    Ok(())
}

fn instantiate_functions(
    heap: &mut Heap,
    state: &Shared,
    env: EnvId,
    functions: &[Rc<FunctionDecl>],
) -> Result<()> {
    for decl in functions {
        let value = make_function(heap, state, decl, env);
        state
            .borrow_mut()
            .envs
            .declare_function(env, &decl.name, value)?;
    }
    Ok(())
}

/// Creates the heap function object for a declaration closing over `env`.
fn make_function(heap: &mut Heap, state: &Shared, decl: &Rc<FunctionDecl>, env: EnvId) -> Value {
    let source = function_source(decl);
    let shared = Rc::clone(state);
    let body = Rc::clone(decl);
    let native = NativeFn::new(move |heap: &mut Heap, _this: &Value, args: &[Value]| {
        call_declared(heap, &shared, &body, env, args)
    });
    Value::Object(heap.create_function(&decl.name, &source, native))
}

fn call_declared(
    heap: &mut Heap,
    state: &Shared,
    decl: &FunctionDecl,
    closure: EnvId,
    args: &[Value],
) -> Result<Value> {
    let scope = hoist::var_scope(&decl.params, &decl.body)?;
    let local = {
        let mut st = state.borrow_mut();
        let local = st.envs.push(ScopeKind::Function, closure);
        for (i, param) in decl.params.iter().enumerate() {
            st.envs.declare(local, param, BindingKind::Parameter)?;
            let arg = args.get(i).cloned().unwrap_or(Value::Undefined);
            st.envs.initialize(local, param, arg)?;
        }
        local
    };
    tracing::trace!(function = %decl.name, env = local.index(), "entering function");

    declare_names(state, local, &scope.var_names, &scope.lexical)?;
    instantiate_functions(heap, state, local, &scope.functions)?;
    match exec_body(heap, state, local, &decl.body)? {
        Completion::Return(value) => Ok(value),
        Completion::Normal => Ok(Value::Undefined),
    }
}

fn exec_body(heap: &mut Heap, state: &Shared, env: EnvId, body: &[Stmt]) -> Result<Completion> {
    for stmt in body {
        if let Completion::Return(value) = exec_stmt(heap, state, env, stmt)? {
            return Ok(Completion::Return(value));
        }
    }
    Ok(Completion::Normal)
}

fn exec_stmt(heap: &mut Heap, state: &Shared, env: EnvId, stmt: &Stmt) -> Result<Completion> {
    match stmt {
        Stmt::Declare {
            kind: DeclKind::Var,
            name,
            init,
        } => {
            if let Some(init) = init {
                let value = eval(heap, state, env, init)?;
                let mut st = state.borrow_mut();
                let target = st.envs.var_scope_of(env)?;
                st.envs.initialize(target, name, value)?;
            }
        }
        Stmt::Declare { name, init, .. } => {
            let value = match init {
                Some(init) => eval(heap, state, env, init)?,
                None => Value::Undefined,
            };
            state.borrow_mut().envs.initialize(env, name, value)?;
        }
        // Bound during hoisting.
        Stmt::Function(_) => {}
        Stmt::Assign { name, value } => {
            let value = eval(heap, state, env, value)?;
            let mut st = state.borrow_mut();
            let strict = st.strict;
            st.envs.assign(env, name, value, strict)?;
        }
        Stmt::Expr(expr) => {
            eval(heap, state, env, expr)?;
        }
        Stmt::Block(body) => {
            let scope = hoist::block_scope(body)?;
            let block = state.borrow_mut().envs.push(ScopeKind::Block, env);
            declare_names(state, block, &[], &scope.lexical)?;
            instantiate_functions(heap, state, block, &scope.functions)?;
            return exec_body(heap, state, block, body);
        }
        Stmt::Return(value) => {
            let value = match value {
                Some(expr) => eval(heap, state, env, expr)?,
                None => Value::Undefined,
            };
            return Ok(Completion::Return(value));
        }
        Stmt::Observe { label, expr } => {
            let outcome = match eval(heap, state, env, expr) {
                Ok(value) => Outcome::Value(value),
                Err(error) if error.is_catchable() => outcome_of(heap, error),
                Err(error) => return Err(error),
            };
            tracing::trace!(label = %label, ?outcome, "observed");
            state
                .borrow_mut()
                .transcript
                .record(label.clone(), outcome);
        }
    }
    Ok(Completion::Normal)
}

fn outcome_of(heap: &mut Heap, error: Error) -> Outcome {
    if let Some(name) = error.error_name() {
        return Outcome::Error(name);
    }
    let value = heap.materialize(error);
    match heap.error_name_of(&value) {
        Some(name) => Outcome::Error(name),
        None => Outcome::Thrown(value),
    }
}

fn eval(heap: &mut Heap, state: &Shared, env: EnvId, expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Ident(name) => state.borrow().envs.get(env, name),
        Expr::Add(left, right) => {
            let a = eval(heap, state, env, left)?;
            let b = eval(heap, state, env, right)?;
            add(heap, &a, &b)
        }
        Expr::TypeOf(operand) => {
            if let Expr::Ident(name) = operand.as_ref() {
                if state.borrow().envs.resolve(env, name)?.is_none() {
                    return Ok(Value::from("undefined"));
                }
            }
            let value = eval(heap, state, env, operand)?;
            Ok(Value::from(type_of(heap, &value).as_str()))
        }
        Expr::Call { callee, args } => {
            let f = eval(heap, state, env, callee)?;
            let args = args
                .iter()
                .map(|arg| eval(heap, state, env, arg))
                .collect::<Result<Vec<_>>>()?;
            heap.call(&f, &Value::Undefined, &args)
        }
    }
}
