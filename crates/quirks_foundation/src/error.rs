//! Error types for quirks.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Errors the language itself would throw (`TypeError`, `ReferenceError`, ...)
//! are kinds of [`Error`]; a thrown arbitrary value travels as
//! [`ErrorKind::Thrown`].

use std::fmt;

use thiserror::Error;

use crate::types::ErrorName;
use crate::value::Value;

/// The main error type for quirks operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a `TypeError`.
    #[must_use]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError(message.into()))
    }

    /// Creates a `ReferenceError`.
    #[must_use]
    pub fn reference_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReferenceError(message.into()))
    }

    /// Creates a `RangeError`.
    #[must_use]
    pub fn range_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeError(message.into()))
    }

    /// Creates a `SyntaxError`.
    #[must_use]
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SyntaxError(message.into()))
    }

    /// Wraps an arbitrary thrown value.
    #[must_use]
    pub fn thrown(value: Value) -> Self {
        Self::new(ErrorKind::Thrown(value))
    }

    /// Creates a semantic limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: SemanticLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns the built-in error name for language-level errors.
    ///
    /// Thrown values are not inspected here; use
    /// [`crate::Heap::error_name_of`] for those.
    #[must_use]
    pub fn error_name(&self) -> Option<ErrorName> {
        match self.kind {
            ErrorKind::TypeError(_) => Some(ErrorName::TypeError),
            ErrorKind::ReferenceError(_) => Some(ErrorName::ReferenceError),
            ErrorKind::RangeError(_) => Some(ErrorName::RangeError),
            ErrorKind::SyntaxError(_) => Some(ErrorName::SyntaxError),
            ErrorKind::Thrown(_) | ErrorKind::LimitExceeded(_) | ErrorKind::Internal(_) => None,
        }
    }

    /// Returns true if this error could be caught by language code.
    ///
    /// Limits and internal errors abort the whole check instead.
    #[must_use]
    pub fn is_catchable(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::LimitExceeded(_) | ErrorKind::Internal(_)
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A value had the wrong type for an operation.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// A name could not be resolved, or was read before initialization.
    #[error("ReferenceError: {0}")]
    ReferenceError(String),

    /// A numeric argument was outside its allowed range.
    #[error("RangeError: {0}")]
    RangeError(String),

    /// A declaration tree violated an early-error rule.
    #[error("SyntaxError: {0}")]
    SyntaxError(String),

    /// An arbitrary value was thrown (or a promise rejected with it).
    #[error("uncaught {0:?}")]
    Thrown(Value),

    /// Semantic limit exceeded (kill switch triggered).
    #[error("limit exceeded: {0}")]
    LimitExceeded(SemanticLimit),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Semantic limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticLimit {
    /// Too many timer callbacks ran during one advance of the fake clock.
    MaxTimerRuns {
        /// The configured limit.
        limit: usize,
    },
    /// Too many microtasks ran during one drain of the job queue.
    MaxMicrotasks {
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for SemanticLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxTimerRuns { limit } => {
                write!(
                    f,
                    "ran {limit} timers, assuming an infinite loop and aborting"
                )
            }
            Self::MaxMicrotasks { limit } => {
                write!(f, "max microtasks ({limit}) exceeded")
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation that raised the error.
    pub operation: Option<String>,
    /// Path of property names or frames leading to the error.
    pub path: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Adds a path segment.
    #[must_use]
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.path.push(segment.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
        }
        if !self.path.is_empty() {
            writeln!(f)?;
            for segment in &self.path {
                writeln!(f, "  --> {segment}")?;
            }
        }
        Ok(())
    }
}

/// Result alias used throughout quirks.
pub type Result<T> = std::result::Result<T, Error>;
