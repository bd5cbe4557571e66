//! Operation tables, one module per receiver kind
//!
//! Every operation in the language is a named call on a receiver. Each
//! module exposes `call` plus a `METHODS` list used for "did you mean"
//! hints when a name is not found.

pub(crate) mod boolean;
pub(crate) mod container;
pub(crate) mod factory;
pub(crate) mod file;
pub(crate) mod global;
pub(crate) mod number;
pub(crate) mod string;

use super::args::Args;
use super::env::EnvRef;
use super::error::{InterpResult, RuntimeError};
use super::eval::Interpreter;
use super::value::Value;
use crate::util::suggestion_hint;

/// Run `method` on `receiver`
pub fn dispatch(
    receiver: &Value,
    method: &str,
    args: Args<'_>,
    env: &EnvRef,
    interp: &mut Interpreter,
) -> InterpResult<Value> {
    match receiver {
        Value::Int(_) | Value::Long(_) | Value::Double(_) => number::call(receiver, method, args, interp),
        Value::Bool(b) => boolean::call(receiver, b, method, args, interp),
        Value::Str(s) => string::call(receiver, s, method, args, interp),
        Value::List(items) => container::call_list(receiver, items, method, args, interp),
        Value::Array(items) => container::call_array(receiver, items, method, args, interp),
        Value::Iterator(cursor) => container::call_iterator(receiver, cursor, method, args, interp),
        Value::File(path) => file::call(receiver, path, method, args, interp),
        Value::Lambda(lambda) => match method {
            "invoke" => {
                let values = args.force_all(interp)?;
                interp.invoke_lambda(lambda, values)
            }
            "equal" | "notEqual" => equality(receiver, method, args, interp),
            "toString" => {
                args.none(method)?;
                Ok(Value::str(receiver.to_string()))
            }
            _ => Err(unknown(receiver, method, &["invoke", "equal", "notEqual", "toString"])),
        },
        Value::Void => Err(RuntimeError::void_operation(method)),
        Value::This => interp.call_global(method, args, env),
        Value::New => factory::call(method, args, interp),
    }
}

/// `equal`/`notEqual`, total over every pair of kinds
pub(crate) fn equality(receiver: &Value, method: &str, args: Args<'_>, interp: &mut Interpreter) -> InterpResult<Value> {
    let [other] = args.values(method, interp)?;
    let eq = receiver.script_eq(&other);
    Ok(Value::bool(if method == "equal" { eq } else { !eq }))
}

pub(crate) fn unknown(receiver: &Value, method: &str, methods: &[&str]) -> RuntimeError {
    RuntimeError::unknown_method(receiver.type_name(), method, &suggestion_hint(method, methods.iter().copied()))
}

/// Validate an index argument against `len`
pub(crate) fn index(value: &Value, len: usize) -> InterpResult<usize> {
    let i = value
        .as_int()
        .ok_or_else(|| RuntimeError::type_error("int index", value.type_name()))?;
    usize::try_from(i)
        .ok()
        .filter(|&u| u < len)
        .ok_or_else(|| RuntimeError::index_out_of_bounds(i, len))
}

/// The string payload of `value`, or a type error
pub(crate) fn expect_str(value: &Value) -> InterpResult<String> {
    value
        .as_str()
        .ok_or_else(|| RuntimeError::type_error("string", value.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;

    #[test]
    fn test_index_bounds() {
        assert_eq!(index(&Value::int(0), 1).unwrap(), 0);
        assert_eq!(index(&Value::int(1), 1).unwrap_err().kind, ErrorKind::IndexOutOfBounds);
        assert_eq!(index(&Value::int(-1), 3).unwrap_err().kind, ErrorKind::IndexOutOfBounds);
        assert_eq!(index(&Value::str("0"), 3).unwrap_err().kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_unknown_suggests_close_name() {
        let err = unknown(&Value::int(1), "pluss", number::METHODS);
        assert_eq!(err.kind, ErrorKind::UnknownMethod);
        assert!(err.message.contains("did you mean `plus`"), "{}", err.message);
    }
}
