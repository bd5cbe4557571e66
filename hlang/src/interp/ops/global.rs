//! Built-in operations of the `this` dispatcher
//!
//! Built-ins are looked up before user functions, so a script function
//! named `println` is never reachable through a bare call.

use super::factory::to_integer;
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::eval::Interpreter;
use crate::interp::value::Value;
use std::collections::HashMap;

/// Built-in function type. Arguments arrive already forced.
pub type BuiltinFn = fn(&mut Interpreter, Vec<Value>) -> InterpResult<Value>;

pub fn register(builtins: &mut HashMap<&'static str, BuiltinFn>) {
    builtins.insert("println", builtin_println);
    builtins.insert("print", builtin_print);
    builtins.insert("readln", builtin_readln);
    builtins.insert("int", builtin_int);
}

/// Arguments rendered and joined by single spaces
fn render(args: &[Value]) -> String {
    args.iter().map(Value::to_string).collect::<Vec<_>>().join(" ")
}

fn builtin_print(interp: &mut Interpreter, args: Vec<Value>) -> InterpResult<Value> {
    interp.write_output(&render(&args))?;
    Ok(Value::Void)
}

fn builtin_println(interp: &mut Interpreter, args: Vec<Value>) -> InterpResult<Value> {
    let mut line = render(&args);
    line.push('\n');
    interp.write_output(&line)?;
    Ok(Value::Void)
}

/// One line of input without its terminator; `void` at end of input
fn builtin_readln(interp: &mut Interpreter, args: Vec<Value>) -> InterpResult<Value> {
    if !args.is_empty() {
        return Err(RuntimeError::arity_mismatch("readln", 0, args.len()));
    }
    Ok(interp.read_line()?.map_or(Value::Void, Value::str))
}

fn builtin_int(_interp: &mut Interpreter, args: Vec<Value>) -> InterpResult<Value> {
    match args.as_slice() {
        [value] => to_integer(value, "int").map(Value::int),
        _ => Err(RuntimeError::arity_mismatch("int", 1, args.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::test_support::interpreter;
    use crate::interp::ErrorKind;

    #[test]
    fn test_print_and_println() {
        let (mut interp, out) = interpreter("");
        builtin_print(&mut interp, vec![Value::str("a"), Value::int(1)]).unwrap();
        builtin_println(&mut interp, vec![Value::double(2.0)]).unwrap();
        builtin_println(&mut interp, vec![]).unwrap();
        assert_eq!(out.contents(), "a 12.0\n\n");
    }

    #[test]
    fn test_readln_strips_terminator_then_void() {
        let (mut interp, _) = interpreter("first\r\nsecond");
        assert_eq!(builtin_readln(&mut interp, vec![]).unwrap(), Value::str("first"));
        assert_eq!(builtin_readln(&mut interp, vec![]).unwrap(), Value::str("second"));
        assert_eq!(builtin_readln(&mut interp, vec![]).unwrap(), Value::Void);
    }

    #[test]
    fn test_int_parses_or_fails() {
        let (mut interp, _) = interpreter("");
        assert_eq!(builtin_int(&mut interp, vec![Value::str("-12")]).unwrap(), Value::int(-12));
        let err = builtin_int(&mut interp, vec![Value::str("12x")]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidConversion);
        let err = builtin_int(&mut interp, vec![]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
    }
}
