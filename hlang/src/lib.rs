//! hlang interpreter library
//!
//! A small dynamically-typed scripting language where every value is a
//! handle and every operation is a named method call.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod util;

pub use ast::Span;
pub use config::Config;
pub use error::{CompileError, Error, Result};
pub use interp::{Interpreter, RuntimeError, Value};

/// Tokenize and parse a whole program
pub fn parse_source(source: &str) -> Result<ast::Program> {
    let tokens = lexer::tokenize(source)?;
    parser::parse(source, tokens)
}

/// Tokenize, parse, and run `source` on the process's stdin/stdout
pub fn run_source(source: &str) -> std::result::Result<Value, Error> {
    run_source_with(Interpreter::new(), source)
}

/// Tokenize, parse, and run `source` on a prepared interpreter
pub fn run_source_with(mut interpreter: Interpreter, source: &str) -> std::result::Result<Value, Error> {
    let program = parse_source(source)?;
    interpreter.run(&program)
}
