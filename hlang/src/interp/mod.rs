//! Tree-walking interpreter
//!
//! Values are handles and every operation is a named call on a receiver;
//! see `ops` for the per-kind operation tables.

mod args;
mod check;
mod env;
mod error;
mod eval;
mod ops;
mod value;

pub use check::{check_program, check_statements};
pub use env::{child_env, EnvRef, Environment};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{Flow, Interpreter};
pub use value::{Cursor, Lambda, Value};
