//! `new` factory and conversions between scalar kinds

use super::{expect_str, unknown};
use crate::interp::args::Args;
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::eval::Interpreter;
use crate::interp::value::Value;

pub const METHODS: &[&str] = &["list", "array", "int", "long", "double", "string", "File"];

pub fn call(method: &str, args: Args<'_>, interp: &mut Interpreter) -> InterpResult<Value> {
    match method {
        "list" => Ok(Value::list(args.force_all(interp)?)),
        "array" => {
            let [size] = args.values(method, interp)?;
            let n = size
                .as_int()
                .ok_or_else(|| RuntimeError::type_error("int size", size.type_name()))?;
            let len = usize::try_from(n).map_err(|_| RuntimeError::index_out_of_bounds(n, 0))?;
            Ok(Value::array(len))
        }
        "int" => {
            let [value] = args.values(method, interp)?;
            to_integer(&value, "int").map(Value::int)
        }
        "long" => {
            let [value] = args.values(method, interp)?;
            to_integer(&value, "long").map(Value::long)
        }
        "double" => {
            let [value] = args.values(method, interp)?;
            to_double(&value).map(Value::double)
        }
        "string" => {
            let [value] = args.values(method, interp)?;
            to_string(&value).map(Value::str)
        }
        "File" => {
            let [path] = args.values(method, interp)?;
            Ok(Value::file(expect_str(&path)?))
        }
        _ => Err(unknown(&Value::New, method, METHODS)),
    }
}

/// Integer conversion shared by `new.int`, `new.long` and global `int`.
/// Doubles truncate toward zero.
pub fn to_integer(value: &Value, target: &str) -> InterpResult<i64> {
    let invalid = || RuntimeError::invalid_conversion(&describe(value), target);
    match value {
        Value::Int(n) | Value::Long(n) => Ok(n.get()),
        Value::Double(x) => {
            let x = x.get();
            if x.is_finite() && x >= i64::MIN as f64 && x < i64::MAX as f64 {
                Ok(x as i64)
            } else {
                Err(invalid())
            }
        }
        Value::Str(s) => s.borrow().trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

pub fn to_double(value: &Value) -> InterpResult<f64> {
    let invalid = || RuntimeError::invalid_conversion(&describe(value), "double");
    match value {
        Value::Int(n) | Value::Long(n) => Ok(n.get() as f64),
        Value::Double(x) => Ok(x.get()),
        Value::Str(s) => s.borrow().trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

pub fn to_string(value: &Value) -> InterpResult<String> {
    match value {
        Value::Int(_) | Value::Long(_) | Value::Double(_) | Value::Str(_) => Ok(value.to_string()),
        _ => Err(RuntimeError::invalid_conversion(value.type_name(), "string")),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("string {:?}", s.borrow()),
        other => other.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;

    fn run(method: &str, args: Vec<Value>) -> InterpResult<Value> {
        let mut interp = Interpreter::new();
        call(method, Args::ready(args), &mut interp)
    }

    #[test]
    fn test_list_keeps_argument_handles() {
        let x = Value::int(1);
        let list = run("list", vec![x.clone(), Value::str("a")]).unwrap();
        let Value::List(items) = &list else {
            panic!("expected list");
        };
        assert!(items.borrow()[0].same_handle(&x));
        assert_eq!(run("list", vec![]).unwrap(), Value::list(vec![]));
    }

    #[test]
    fn test_array_of_voids() {
        assert_eq!(run("array", vec![Value::int(3)]).unwrap().to_string(), "[void, void, void]");
        let err = run("array", vec![Value::int(-1)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexOutOfBounds);
        let err = run("array", vec![Value::str("3")]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(run("int", vec![Value::str(" 42 ")]).unwrap(), Value::int(42));
        assert_eq!(run("int", vec![Value::double(-2.9)]).unwrap(), Value::int(-2));
        assert_eq!(run("long", vec![Value::int(7)]).unwrap(), Value::long(7));
        assert_eq!(run("double", vec![Value::int(2)]).unwrap(), Value::double(2.0));
        assert_eq!(run("double", vec![Value::str("0.5")]).unwrap(), Value::double(0.5));
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!(run("string", vec![Value::double(1.0)]).unwrap(), Value::str("1.0"));
        assert_eq!(run("string", vec![Value::long(-3)]).unwrap(), Value::str("-3"));
    }

    #[test]
    fn test_unsupported_conversions() {
        for (method, value) in [
            ("int", Value::str("abc")),
            ("int", Value::bool(true)),
            ("int", Value::double(f64::NAN)),
            ("double", Value::Void),
            ("string", Value::list(vec![])),
        ] {
            let err = run(method, vec![value]).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidConversion, "{method}");
        }
    }

    #[test]
    fn test_conversion_copies() {
        let x = Value::int(5);
        let y = run("int", vec![x.clone()]).unwrap();
        assert!(!y.same_handle(&x));
    }

    #[test]
    fn test_unknown_factory_method() {
        let err = run("lst", vec![]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownMethod);
        assert!(err.message.contains("did you mean `list`"), "{}", err.message);
    }
}
