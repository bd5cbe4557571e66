//! `int`, `long` and `double` operations
//!
//! Binary operations require an operand of the receiver's own kind. Integer
//! arithmetic wraps; integer division and modulo by zero are errors while
//! double division follows IEEE 754.

use super::{equality, unknown};
use crate::interp::args::Args;
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::eval::Interpreter;
use crate::interp::value::Value;

pub const METHODS: &[&str] = &[
    "plus",
    "minus",
    "multiply",
    "divide",
    "mod",
    "less",
    "greater",
    "lessOrEqual",
    "greaterOrEqual",
    "equal",
    "notEqual",
    "negate",
    "set",
    "increment",
    "decrement",
    "plusAssign",
    "minusAssign",
    "multiplyAssign",
    "divideAssign",
    "copy",
    "toString",
];

/// Operand pair of one numeric kind
#[derive(Debug, Clone, Copy, PartialEq)]
enum Pair {
    Int(i64, i64),
    Long(i64, i64),
    Double(f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arith {
    Plus,
    Minus,
    Multiply,
    Divide,
    Mod,
}

impl Arith {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "plus" | "plusAssign" => Arith::Plus,
            "minus" | "minusAssign" => Arith::Minus,
            "multiply" | "multiplyAssign" => Arith::Multiply,
            "divide" | "divideAssign" => Arith::Divide,
            "mod" => Arith::Mod,
            _ => return None,
        })
    }

    fn ints(self, a: i64, b: i64) -> InterpResult<i64> {
        Ok(match self {
            Arith::Plus => a.wrapping_add(b),
            Arith::Minus => a.wrapping_sub(b),
            Arith::Multiply => a.wrapping_mul(b),
            Arith::Divide if b == 0 => return Err(RuntimeError::division_by_zero()),
            Arith::Divide => a.wrapping_div(b),
            Arith::Mod if b == 0 => return Err(RuntimeError::division_by_zero()),
            Arith::Mod => a.wrapping_rem(b),
        })
    }

    fn doubles(self, a: f64, b: f64) -> f64 {
        match self {
            Arith::Plus => a + b,
            Arith::Minus => a - b,
            Arith::Multiply => a * b,
            Arith::Divide => a / b,
            Arith::Mod => a % b,
        }
    }

    fn apply(self, pair: Pair) -> InterpResult<Value> {
        Ok(match pair {
            Pair::Int(a, b) => Value::int(self.ints(a, b)?),
            Pair::Long(a, b) => Value::long(self.ints(a, b)?),
            Pair::Double(a, b) => Value::double(self.doubles(a, b)),
        })
    }
}

fn compare(method: &str, pair: Pair) -> Option<bool> {
    fn cmp<T: PartialOrd>(method: &str, a: T, b: T) -> Option<bool> {
        Some(match method {
            "less" => a < b,
            "greater" => a > b,
            "lessOrEqual" => a <= b,
            "greaterOrEqual" => a >= b,
            _ => return None,
        })
    }
    match pair {
        Pair::Int(a, b) | Pair::Long(a, b) => cmp(method, a, b),
        Pair::Double(a, b) => cmp(method, a, b),
    }
}

fn pair(method: &str, receiver: &Value, operand: &Value) -> InterpResult<Pair> {
    match (receiver, operand) {
        (Value::Int(a), Value::Int(b)) => Ok(Pair::Int(a.get(), b.get())),
        (Value::Long(a), Value::Long(b)) => Ok(Pair::Long(a.get(), b.get())),
        (Value::Double(a), Value::Double(b)) => Ok(Pair::Double(a.get(), b.get())),
        _ => Err(RuntimeError::operand_mismatch(
            method,
            receiver.type_name(),
            operand.type_name(),
        )),
    }
}

/// Overwrite the receiver's payload with a value of the same kind
fn store(receiver: &Value, value: &Value) {
    match (receiver, value) {
        (Value::Int(dst), Value::Int(src)) | (Value::Long(dst), Value::Long(src)) => dst.set(src.get()),
        (Value::Double(dst), Value::Double(src)) => dst.set(src.get()),
        _ => {}
    }
}

fn step(receiver: &Value, delta: i64) {
    match receiver {
        Value::Int(n) | Value::Long(n) => n.set(n.get().wrapping_add(delta)),
        Value::Double(x) => x.set(x.get() + delta as f64),
        _ => {}
    }
}

pub fn call(receiver: &Value, method: &str, args: Args<'_>, interp: &mut Interpreter) -> InterpResult<Value> {
    match method {
        "equal" | "notEqual" => equality(receiver, method, args, interp),
        "negate" => {
            args.none(method)?;
            Ok(match receiver {
                Value::Int(n) => Value::int(n.get().wrapping_neg()),
                Value::Long(n) => Value::long(n.get().wrapping_neg()),
                Value::Double(x) => Value::double(-x.get()),
                _ => return Err(unknown(receiver, method, METHODS)),
            })
        }
        "increment" | "decrement" => {
            args.none(method)?;
            step(receiver, if method == "increment" { 1 } else { -1 });
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
        "set" => {
            let [operand] = args.values(method, interp)?;
            pair(method, receiver, &operand)?;
            store(receiver, &operand);
            Ok(receiver.clone())
        }
        "plusAssign" | "minusAssign" | "multiplyAssign" | "divideAssign" => {
            let [operand] = args.values(method, interp)?;
            let op = Arith::from_name(method).ok_or_else(|| unknown(receiver, method, METHODS))?;
            let result = op.apply(pair(method, receiver, &operand)?)?;
            store(receiver, &result);
            Ok(receiver.clone())
        }
        "plus" | "minus" | "multiply" | "divide" | "mod" => {
            let [operand] = args.values(method, interp)?;
            let op = Arith::from_name(method).ok_or_else(|| unknown(receiver, method, METHODS))?;
            op.apply(pair(method, receiver, &operand)?)
        }
        "less" | "greater" | "lessOrEqual" | "greaterOrEqual" => {
            let [operand] = args.values(method, interp)?;
            let ordered = compare(method, pair(method, receiver, &operand)?)
                .ok_or_else(|| unknown(receiver, method, METHODS))?;
            Ok(Value::bool(ordered))
        }
        _ => Err(unknown(receiver, method, METHODS)),
    }
}
