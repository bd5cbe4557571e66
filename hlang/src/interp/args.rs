//! Call arguments
//!
//! Arguments reach an operation unevaluated so that `and`/`or` can skip
//! their right operand. Every other operation forces all of them, left to
//! right, before doing any work.

use super::env::EnvRef;
use super::error::{InterpResult, RuntimeError};
use super::eval::Interpreter;
use super::value::Value;
use crate::ast::{Expr, Spanned};

/// One argument, evaluated on demand
pub enum Thunk<'a> {
    /// Not yet evaluated; `env` is the caller's scope
    Deferred { expr: &'a Spanned<Expr>, env: EnvRef },
    /// Already a value (host calls, re-dispatch)
    Ready(Value),
}

impl Thunk<'_> {
    pub fn force(self, interp: &mut Interpreter) -> InterpResult<Value> {
        match self {
            Thunk::Deferred { expr, env } => interp.eval(expr, &env),
            Thunk::Ready(value) => Ok(value),
        }
    }
}

/// Arguments of one call site
pub struct Args<'a> {
    thunks: Vec<Thunk<'a>>,
}

impl<'a> Args<'a> {
    pub fn new(thunks: Vec<Thunk<'a>>) -> Self {
        Args { thunks }
    }

    /// Arguments that are already values
    pub fn ready(values: Vec<Value>) -> Args<'static> {
        Args {
            thunks: values.into_iter().map(Thunk::Ready).collect(),
        }
    }

    /// Exactly `N` unevaluated arguments
    pub fn exactly<const N: usize>(self, op: &str) -> InterpResult<[Thunk<'a>; N]> {
        let got = self.thunks.len();
        self.thunks
            .try_into()
            .map_err(|_| RuntimeError::arity_mismatch(op, N, got))
    }

    /// Exactly `N` arguments, forced left to right
    pub fn values<const N: usize>(self, op: &str, interp: &mut Interpreter) -> InterpResult<[Value; N]> {
        let got = self.thunks.len();
        if got != N {
            return Err(RuntimeError::arity_mismatch(op, N, got));
        }
        let values = self.force_all(interp)?;
        values
            .try_into()
            .map_err(|_| RuntimeError::arity_mismatch(op, N, got))
    }

    /// Any number of arguments, forced left to right
    pub fn force_all(self, interp: &mut Interpreter) -> InterpResult<Vec<Value>> {
        self.thunks.into_iter().map(|t| t.force(interp)).collect()
    }

    /// Reject any arguments
    pub fn none(self, op: &str) -> InterpResult<()> {
        match self.thunks.len() {
            0 => Ok(()),
            got => Err(RuntimeError::arity_mismatch(op, 0, got)),
        }
    }
}
