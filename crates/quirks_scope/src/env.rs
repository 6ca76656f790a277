//! Environment records and the scope chain.
//!
//! Environments live in an arena addressed by [`EnvId`]; each one links to
//! its parent. Closures keep the id of the environment they were declared
//! in, so environments are never freed while the arena lives.

use std::sync::Arc;

use quirks_foundation::{Error, Result, Value};

use crate::ast::DeclKind;

/// Handle to an environment record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnvId(u32);

impl EnvId {
    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What kind of scope an environment belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// The script's outermost scope.
    Global,
    /// A function body. Holds `var` and parameter bindings.
    Function,
    /// A `{ ... }` block. Holds only lexical bindings.
    Block,
}

impl ScopeKind {
    /// Returns true if `var` declarations land here.
    #[must_use]
    pub const fn is_var_scope(self) -> bool {
        matches!(self, Self::Global | Self::Function)
    }
}

/// How a binding was introduced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BindingKind {
    /// `var`, or an implicit global created by a sloppy assignment.
    Var,
    /// `let`
    Let,
    /// `const`
    Const,
    /// Function declaration.
    Function,
    /// Function parameter.
    Parameter,
}

impl From<DeclKind> for BindingKind {
    fn from(kind: DeclKind) -> Self {
        match kind {
            DeclKind::Var => Self::Var,
            DeclKind::Let => Self::Let,
            DeclKind::Const => Self::Const,
        }
    }
}

/// One name in an environment. `value` is `None` while the binding is in its
/// temporal dead zone.
#[derive(Clone, Debug)]
pub struct Binding {
    /// How the binding was introduced.
    pub kind: BindingKind,
    /// Current value; `None` before initialization.
    pub value: Option<Value>,
}

#[derive(Debug)]
struct Record {
    kind: ScopeKind,
    parent: Option<EnvId>,
    bindings: Vec<(Arc<str>, Binding)>,
}

impl Record {
    fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|(n, _)| n.as_ref() == name)
            .map(|(_, b)| b)
    }

    fn binding_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.bindings
            .iter_mut()
            .find(|(n, _)| n.as_ref() == name)
            .map(|(_, b)| b)
    }
}

/// Arena of environment records.
#[derive(Debug)]
pub struct Environments {
    records: Vec<Record>,
}

impl Default for Environments {
    fn default() -> Self {
        Self::new()
    }
}

impl Environments {
    /// Creates an arena holding only the global environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: vec![Record {
                kind: ScopeKind::Global,
                parent: None,
                bindings: Vec::new(),
            }],
        }
    }

    /// The global environment.
    #[must_use]
    pub const fn global(&self) -> EnvId {
        EnvId(0)
    }

    /// Number of environments ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; the global environment exists from the start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Creates a child environment of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` environments are created.
    pub fn push(&mut self, kind: ScopeKind, parent: EnvId) -> EnvId {
        let id = EnvId(u32::try_from(self.records.len()).expect("too many environments"));
        self.records.push(Record {
            kind,
            parent: Some(parent),
            bindings: Vec::new(),
        });
        id
    }

    fn record(&self, env: EnvId) -> Result<&Record> {
        self.records
            .get(env.index())
            .ok_or_else(|| Error::internal(format!("dangling environment {env:?}")))
    }

    fn record_mut(&mut self, env: EnvId) -> Result<&mut Record> {
        self.records
            .get_mut(env.index())
            .ok_or_else(|| Error::internal(format!("dangling environment {env:?}")))
    }

    /// Returns the kind of `env`.
    pub fn kind(&self, env: EnvId) -> Result<ScopeKind> {
        Ok(self.record(env)?.kind)
    }

    /// Returns the parent of `env`.
    pub fn parent(&self, env: EnvId) -> Result<Option<EnvId>> {
        Ok(self.record(env)?.parent)
    }

    /// Returns the binding `name` declared directly in `env`.
    pub fn own_binding(&self, env: EnvId, name: &str) -> Result<Option<&Binding>> {
        Ok(self.record(env)?.binding(name))
    }

    /// Walks outward from `env` to the nearest function or global
    /// environment.
    pub fn var_scope_of(&self, env: EnvId) -> Result<EnvId> {
        let mut current = env;
        loop {
            let record = self.record(current)?;
            if record.kind.is_var_scope() {
                return Ok(current);
            }
            match record.parent {
                Some(parent) => current = parent,
                None => return Ok(current),
            }
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Declares `name` in `env`.
    ///
    /// `var` and parameters start as `undefined` and redeclaring them is a
    /// no-op. `let` and `const` start uninitialized; declaring one twice in
    /// the same environment is a `SyntaxError`.
    pub fn declare(&mut self, env: EnvId, name: &str, kind: BindingKind) -> Result<()> {
        let record = self.record_mut(env)?;
        if let Some(existing) = record.binding(name) {
            let lexical = |k: BindingKind| matches!(k, BindingKind::Let | BindingKind::Const);
            if lexical(kind) || lexical(existing.kind) {
                return Err(Error::syntax_error(format!(
                    "Identifier '{name}' has already been declared"
                )));
            }
            return Ok(());
        }
        let value = match kind {
            BindingKind::Let | BindingKind::Const => None,
            BindingKind::Var | BindingKind::Parameter | BindingKind::Function => {
                Some(Value::Undefined)
            }
        };
        record.bindings.push((name.into(), Binding { kind, value }));
        Ok(())
    }

    /// Declares or overwrites a function binding with its value. Later
    /// function declarations of the same name replace earlier ones.
    pub fn declare_function(&mut self, env: EnvId, name: &str, value: Value) -> Result<()> {
        let record = self.record_mut(env)?;
        if let Some(binding) = record.binding_mut(name) {
            if matches!(binding.kind, BindingKind::Let | BindingKind::Const) {
                return Err(Error::syntax_error(format!(
                    "Identifier '{name}' has already been declared"
                )));
            }
            binding.value = Some(value);
            return Ok(());
        }
        record.bindings.push((
            name.into(),
            Binding {
                kind: BindingKind::Function,
                value: Some(value),
            },
        ));
        Ok(())
    }

    /// Moves a declared binding out of its dead zone.
    pub fn initialize(&mut self, env: EnvId, name: &str, value: Value) -> Result<()> {
        let binding = self
            .record_mut(env)?
            .binding_mut(name)
            .ok_or_else(|| Error::internal(format!("'{name}' was never declared")))?;
        binding.value = Some(value);
        Ok(())
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Finds the nearest environment, starting at `env`, that declares
    /// `name`.
    pub fn resolve(&self, env: EnvId, name: &str) -> Result<Option<EnvId>> {
        let mut current = Some(env);
        while let Some(id) = current {
            let record = self.record(id)?;
            if record.binding(name).is_some() {
                return Ok(Some(id));
            }
            current = record.parent;
        }
        Ok(None)
    }

    /// Reads `name` as seen from `env`.
    ///
    /// Unresolvable names and bindings still in their dead zone raise
    /// `ReferenceError`.
    pub fn get(&self, env: EnvId, name: &str) -> Result<Value> {
        let Some(found) = self.resolve(env, name)? else {
            return Err(Error::reference_error(format!("{name} is not defined")));
        };
        match self.record(found)?.binding(name).and_then(|b| b.value.clone()) {
            Some(value) => Ok(value),
            None => Err(Error::reference_error(format!(
                "Cannot access '{name}' before initialization"
            ))),
        }
    }

    /// Assigns `value` to `name` as seen from `env`.
    ///
    /// Constants raise `TypeError`; dead-zone bindings raise
    /// `ReferenceError`. An unresolvable name raises `ReferenceError` in
    /// strict mode and becomes a global `var` otherwise.
    pub fn assign(&mut self, env: EnvId, name: &str, value: Value, strict: bool) -> Result<()> {
        let Some(found) = self.resolve(env, name)? else {
            if strict {
                return Err(Error::reference_error(format!("{name} is not defined")));
            }
            tracing::debug!(name, "implicit global created by assignment");
            let global = self.global();
            self.declare(global, name, BindingKind::Var)?;
            return self.initialize(global, name, value);
        };
        let binding = self
            .record_mut(found)?
            .binding_mut(name)
            .ok_or_else(|| Error::internal(format!("'{name}' vanished during assignment")))?;
        if binding.value.is_none() {
            return Err(Error::reference_error(format!(
                "Cannot access '{name}' before initialization"
            )));
        }
        if binding.kind == BindingKind::Const {
            return Err(Error::type_error("Assignment to constant variable."));
        }
        binding.value = Some(value);
        Ok(())
    }
}
