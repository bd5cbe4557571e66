//! Runtime errors for the interpreter

use crate::ast::Span;
use thiserror::Error;

/// Runtime error during interpretation. Never recoverable from inside a script.
#[derive(Debug, Clone, Error)]
#[error("Runtime error{}: {message}", location(.span))]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// Innermost call site that failed, when known
    pub span: Option<Span>,
}

fn location(span: &Option<Span>) -> String {
    span.map(|s| format!(" at {s}")).unwrap_or_default()
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unbound variable name
    UndefinedVariable,
    /// Unknown function or global operation on the `this` dispatcher
    UndefinedFunction,
    /// Operation not supported by the receiver's kind
    UnknownMethod,
    /// Operand or condition of the wrong runtime kind
    TypeError,
    /// Argument count mismatch
    ArityMismatch,
    /// Integer division or modulo by zero
    DivisionByZero,
    /// Container or string index outside `[0, len)`
    IndexOutOfBounds,
    /// Malformed input to a numeric/string conversion
    InvalidConversion,
    /// `break`/`continue` reached a function boundary
    ControlFlow,
    /// Recursion deeper than the configured limit
    StackOverflow,
    /// Console or file failure
    IoError,
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError {
            kind,
            message,
            span: None,
        }
    }

    /// Attach a location unless a more precise one is already recorded
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    pub fn undefined_variable(name: &str, hint: &str) -> Self {
        Self::new(ErrorKind::UndefinedVariable, format!("undefined variable: {name}{hint}"))
    }

    pub fn undefined_function(name: &str, hint: &str) -> Self {
        Self::new(ErrorKind::UndefinedFunction, format!("undefined function: {name}{hint}"))
    }

    pub fn unknown_method(type_name: &str, method: &str, hint: &str) -> Self {
        Self::new(
            ErrorKind::UnknownMethod,
            format!("{type_name} has no operation `{method}`{hint}"),
        )
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        Self::new(ErrorKind::TypeError, format!("type error: expected {expected}, got {got}"))
    }

    /// Operand kind differs from the receiver kind
    pub fn operand_mismatch(method: &str, receiver: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("type error: `{method}` on {receiver} expects {receiver}, got {got}"),
        )
    }

    pub fn void_operation(method: &str) -> Self {
        Self::new(ErrorKind::TypeError, format!("type error: cannot call `{method}` on void"))
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("{name} expects {expected} argument(s), got {got}"),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "division by zero".to_string())
    }

    pub fn index_out_of_bounds(index: i64, len: usize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfBounds,
            format!("index {index} out of bounds for length {len}"),
        )
    }

    pub fn invalid_conversion(from: &str, to: &str) -> Self {
        Self::new(ErrorKind::InvalidConversion, format!("cannot convert {from} to {to}"))
    }

    pub fn control_flow(keyword: &str) -> Self {
        Self::new(
            ErrorKind::ControlFlow,
            format!("`{keyword}` escaped the enclosing function"),
        )
    }

    pub fn stack_overflow(limit: usize) -> Self {
        Self::new(
            ErrorKind::StackOverflow,
            format!("stack overflow: recursion deeper than {limit} calls"),
        )
    }

    pub fn io_error(msg: &str) -> Self {
        Self::new(ErrorKind::IoError, format!("IO error: {msg}"))
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
