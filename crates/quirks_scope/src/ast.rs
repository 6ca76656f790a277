//! Declaration tree for scope analysis.
//!
//! Programs are built with the constructor helpers on [`Stmt`] and [`Expr`];
//! there is no source parser. The tree only covers what hoisting and block
//! scoping need: declarations, assignments, blocks, calls, and observation
//! points that record what a name evaluates to.

use std::rc::Rc;
use std::sync::Arc;

use quirks_foundation::Value;

/// A whole script.
#[derive(Clone, Debug)]
pub struct Program {
    /// Whether the script runs in strict mode.
    pub strict: bool,
    /// Top-level statements.
    pub body: Vec<Stmt>,
}

impl Program {
    /// Creates a strict-mode program.
    #[must_use]
    pub fn strict(body: Vec<Stmt>) -> Self {
        Self { strict: true, body }
    }

    /// Creates a sloppy-mode program.
    #[must_use]
    pub fn sloppy(body: Vec<Stmt>) -> Self {
        Self {
            strict: false,
            body,
        }
    }
}

/// Declaration keyword.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    /// `var`: function-scoped, hoisted as `undefined`.
    Var,
    /// `let`: block-scoped, uninitialized until its declaration runs.
    Let,
    /// `const`: like `let`, but cannot be reassigned.
    Const,
}

impl DeclKind {
    /// Returns true for `let` and `const`.
    #[must_use]
    pub const fn is_lexical(self) -> bool {
        matches!(self, Self::Let | Self::Const)
    }

    /// Returns the keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

/// A function declaration.
#[derive(Clone, Debug)]
pub struct FunctionDecl {
    /// Binding name.
    pub name: Arc<str>,
    /// Parameter names.
    pub params: Vec<Arc<str>>,
    /// Body statements.
    pub body: Vec<Stmt>,
}

impl FunctionDecl {
    /// Creates a function declaration.
    #[must_use]
    pub fn new(name: &str, params: &[&str], body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            params: params.iter().map(|p| Arc::from(*p)).collect(),
            body,
        }
    }
}

/// A statement.
#[derive(Clone, Debug)]
pub enum Stmt {
    /// `var`/`let`/`const name = init;`
    Declare {
        /// Keyword.
        kind: DeclKind,
        /// Bound name.
        name: Arc<str>,
        /// Initializer.
        init: Option<Expr>,
    },
    /// `function name(params) { body }`
    Function(Rc<FunctionDecl>),
    /// `name = value;`
    Assign {
        /// Target name.
        name: Arc<str>,
        /// Assigned value.
        value: Expr,
    },
    /// Expression evaluated for its effects.
    Expr(Expr),
    /// `{ ... }`
    Block(Vec<Stmt>),
    /// `return value;`
    Return(Option<Expr>),
    /// Evaluates an expression and records its value, or the error it
    /// raised, in the transcript under `label`.
    Observe {
        /// Transcript key.
        label: Arc<str>,
        /// Observed expression.
        expr: Expr,
    },
}

impl Stmt {
    /// `kind name = init;`
    #[must_use]
    pub fn declare(kind: DeclKind, name: &str, init: Option<Expr>) -> Self {
        Self::Declare {
            kind,
            name: name.into(),
            init,
        }
    }

    /// `var name = init;`
    #[must_use]
    pub fn var(name: &str, init: Option<Expr>) -> Self {
        Self::declare(DeclKind::Var, name, init)
    }

    /// `let name = init;`
    #[must_use]
    pub fn let_decl(name: &str, init: Option<Expr>) -> Self {
        Self::declare(DeclKind::Let, name, init)
    }

    /// `const name = init;`
    #[must_use]
    pub fn const_decl(name: &str, init: Expr) -> Self {
        Self::declare(DeclKind::Const, name, Some(init))
    }

    /// `function name(params) { body }`
    #[must_use]
    pub fn function(name: &str, params: &[&str], body: Vec<Stmt>) -> Self {
        Self::Function(Rc::new(FunctionDecl::new(name, params, body)))
    }

    /// `name = value;`
    #[must_use]
    pub fn assign(name: &str, value: Expr) -> Self {
        Self::Assign {
            name: name.into(),
            value,
        }
    }

    /// `name += value;`
    #[must_use]
    pub fn add_assign(name: &str, value: Expr) -> Self {
        Self::assign(name, Expr::add(Expr::ident(name), value))
    }

    /// `callee(args);`
    #[must_use]
    pub fn call(callee: &str, args: Vec<Expr>) -> Self {
        Self::Expr(Expr::call(Expr::ident(callee), args))
    }

    /// `{ body }`
    #[must_use]
    pub fn block(body: Vec<Stmt>) -> Self {
        Self::Block(body)
    }

    /// `return value;`
    #[must_use]
    pub fn ret(value: Option<Expr>) -> Self {
        Self::Return(value)
    }

    /// Records `expr` under `label`.
    #[must_use]
    pub fn observe(label: &str, expr: Expr) -> Self {
        Self::Observe {
            label: label.into(),
            expr,
        }
    }
}

/// An expression.
#[derive(Clone, Debug)]
pub enum Expr {
    /// A primitive literal.
    Literal(Value),
    /// A name reference.
    Ident(Arc<str>),
    /// `left + right`
    Add(Box<Expr>, Box<Expr>),
    /// `typeof operand`
    TypeOf(Box<Expr>),
    /// `callee(args)`
    Call {
        /// Called expression.
        callee: Box<Expr>,
        /// Arguments.
        args: Vec<Expr>,
    },
}

impl Expr {
    /// A primitive literal.
    #[must_use]
    pub fn lit(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// A number literal.
    #[must_use]
    pub fn num(n: impl Into<f64>) -> Self {
        Self::Literal(Value::Number(n.into()))
    }

    /// The `undefined` literal.
    #[must_use]
    pub fn undefined() -> Self {
        Self::Literal(Value::Undefined)
    }

    /// A name reference.
    #[must_use]
    pub fn ident(name: &str) -> Self {
        Self::Ident(name.into())
    }

    /// `left + right`
    #[must_use]
    pub fn add(left: Expr, right: Expr) -> Self {
        Self::Add(Box::new(left), Box::new(right))
    }

    /// `typeof operand`
    #[must_use]
    pub fn type_of(operand: Expr) -> Self {
        Self::TypeOf(Box::new(operand))
    }

    /// `callee(args)`
    #[must_use]
    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            args,
        }
    }
}
