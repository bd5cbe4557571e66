//! `bool` operations. `and`/`or` evaluate their operand only when needed.

use super::{equality, unknown};
use crate::interp::args::Args;
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::eval::Interpreter;
use crate::interp::value::Value;
use std::cell::Cell;
use std::rc::Rc;

pub const METHODS: &[&str] = &["and", "or", "not", "equal", "notEqual", "set", "copy", "toString"];

pub fn call(
    receiver: &Value,
    b: &Rc<Cell<bool>>,
    method: &str,
    args: Args<'_>,
    interp: &mut Interpreter,
) -> InterpResult<Value> {
    match method {
        "and" | "or" => {
            let [rhs] = args.exactly(method)?;
            let lhs = b.get();
            // Short circuit: `false.and(x)` and `true.or(x)` never touch x
            if lhs != (method == "and") {
                return Ok(Value::bool(lhs));
            }
            let rhs = rhs.force(interp)?;
            rhs.as_bool()
                .map(Value::bool)
                .ok_or_else(|| RuntimeError::operand_mismatch(method, "bool", rhs.type_name()))
        }
        "not" => {
            args.none(method)?;
            Ok(Value::bool(!b.get()))
        }
        "equal" | "notEqual" => equality(receiver, method, args, interp),
        "set" => {
            let [operand] = args.values(method, interp)?;
            let v = operand
                .as_bool()
                .ok_or_else(|| RuntimeError::operand_mismatch(method, "bool", operand.type_name()))?;
            b.set(v);
            Ok(receiver.clone())
        }
        "copy" => {
            args.none(method)?;
            Ok(receiver.deep_copy())
        }
        "toString" => {
            args.none(method)?;
            Ok(Value::str(receiver.to_string()))
        }
        _ => Err(unknown(receiver, method, METHODS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;

    fn run(receiver: &Value, method: &str, args: Vec<Value>) -> InterpResult<Value> {
        let mut interp = Interpreter::new();
        let env = interp.global_env();
        crate::interp::ops::dispatch(receiver, method, Args::ready(args), &env, &mut interp)
    }

    #[test]
    fn test_truth_tables() {
        for a in [false, true] {
            for b in [false, true] {
                let and = run(&Value::bool(a), "and", vec![Value::bool(b)]).unwrap();
                let or = run(&Value::bool(a), "or", vec![Value::bool(b)]).unwrap();
                assert_eq!(and, Value::bool(a && b));
                assert_eq!(or, Value::bool(a || b));
            }
        }
    }

    #[test]
    fn test_short_circuit_ignores_operand_kind() {
        assert_eq!(run(&Value::bool(false), "and", vec![Value::int(1)]).unwrap(), Value::bool(false));
        assert_eq!(run(&Value::bool(true), "or", vec![Value::Void]).unwrap(), Value::bool(true));
    }

    #[test]
    fn test_evaluated_operand_must_be_bool() {
        let err = run(&Value::bool(true), "and", vec![Value::int(1)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_not_and_set() {
        assert_eq!(run(&Value::bool(true), "not", vec![]).unwrap(), Value::bool(false));
        let flag = Value::bool(false);
        run(&flag, "set", vec![Value::bool(true)]).unwrap();
        assert_eq!(flag, Value::bool(true));
    }

    #[test]
    fn test_and_requires_one_operand() {
        let err = run(&Value::bool(true), "and", vec![]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
    }
}
