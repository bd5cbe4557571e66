//! `string` operations. Indices count characters, not bytes.

use super::{equality, expect_str, index, unknown};
use crate::interp::args::Args;
use crate::interp::error::InterpResult;
use crate::interp::eval::Interpreter;
use crate::interp::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

pub const METHODS: &[&str] = &[
    "get",
    "split",
    "replaceAt",
    "plus",
    "plusAssign",
    "set",
    "get_size",
    "size",
    "equal",
    "notEqual",
    "copy",
    "toString",
];

pub fn call(
    receiver: &Value,
    s: &Rc<RefCell<String>>,
    method: &str,
    args: Args<'_>,
    interp: &mut Interpreter,
) -> InterpResult<Value> {
    match method {
        "get" => {
            let [i] = args.values(method, interp)?;
            let text = s.borrow();
            let i = index(&i, text.chars().count())?;
            Ok(Value::str(text.chars().nth(i).map(String::from).unwrap_or_default()))
        }
        "split" => {
            let [sep] = args.values(method, interp)?;
            let sep = expect_str(&sep)?;
            let text = s.borrow();
            let parts = if sep.is_empty() {
                text.chars().map(|c| Value::str(c.to_string())).collect()
            } else {
                text.split(sep.as_str()).map(Value::str).collect()
            };
            Ok(Value::list(parts))
        }
        "replaceAt" => {
            let [i, replacement] = args.values(method, interp)?;
            let replacement = expect_str(&replacement)?;
            let text = s.borrow();
            let i = index(&i, text.chars().count())?;
            let replaced: String = text
                .chars()
                .enumerate()
                .map(|(j, c)| if j == i { replacement.clone() } else { c.to_string() })
                .collect();
            Ok(Value::str(replaced))
        }
        "plus" => {
            let [other] = args.values(method, interp)?;
            Ok(Value::str(format!("{}{other}", s.borrow())))
        }
        "plusAssign" => {
            let [other] = args.values(method, interp)?;
            // Render first: `s.plusAssign(s)` reads the payload being extended
            let suffix = other.to_string();
            s.borrow_mut().push_str(&suffix);
            Ok(receiver.clone())
        }
        "set" => {
            let [other] = args.values(method, interp)?;
            let text = expect_str(&other)?;
            *s.borrow_mut() = text;
            Ok(receiver.clone())
        }
        "get_size" | "size" => {
            args.none(method)?;
            let len = s.borrow().chars().count();
            Ok(Value::int(len as i64))
        }
        "equal" | "notEqual" => equality(receiver, method, args, interp),
        "copy" => {
            args.none(method)?;
            Ok(receiver.deep_copy())
        }
        "toString" => {
            args.none(method)?;
            Ok(Value::str(s.borrow().as_str()))
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
    fn test_get_by_character() {
        let s = Value::str("héllo");
        assert_eq!(run(&s, "get", vec![Value::int(1)]).unwrap(), Value::str("é"));
        assert_eq!(run(&s, "size", vec![]).unwrap(), Value::int(5));
        let err = run(&s, "get", vec![Value::int(5)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexOutOfBounds);
    }

    #[test]
    fn test_split() {
        let parts = run(&Value::str("a,b,,c"), "split", vec![Value::str(",")]).unwrap();
        assert_eq!(
            parts,
            Value::list(vec![Value::str("a"), Value::str("b"), Value::str(""), Value::str("c")])
        );
    }

    #[test]
    fn test_split_empty_separator_gives_characters() {
        let parts = run(&Value::str("abc"), "split", vec![Value::str("")]).unwrap();
        assert_eq!(parts, Value::list(vec![Value::str("a"), Value::str("b"), Value::str("c")]));
    }

    #[test]
    fn test_replace_at_returns_new_string() {
        let s = Value::str("cat");
        let replaced = run(&s, "replaceAt", vec![Value::int(0), Value::str("b")]).unwrap();
        assert_eq!(replaced, Value::str("bat"));
        assert_eq!(s, Value::str("cat"));
    }

    #[test]
    fn test_plus_renders_operand() {
        let s = Value::str("n=");
        assert_eq!(run(&s, "plus", vec![Value::int(4)]).unwrap(), Value::str("n=4"));
        assert_eq!(s, Value::str("n="));
    }

    #[test]
    fn test_plus_assign_self() {
        let s = Value::str("ab");
        run(&s, "plusAssign", vec![s.clone()]).unwrap();
        assert_eq!(s, Value::str("abab"));
    }

    #[test]
    fn test_set_requires_string() {
        let s = Value::str("x");
        run(&s, "set", vec![Value::str("y")]).unwrap();
        assert_eq!(s, Value::str("y"));
        let err = run(&s, "set", vec![Value::int(1)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_equality_by_contents() {
        let eq = run(&Value::str("a"), "equal", vec![Value::str("a")]).unwrap();
        assert_eq!(eq, Value::bool(true));
        let ne = run(&Value::str("a"), "notEqual", vec![Value::int(1)]).unwrap();
        assert_eq!(ne, Value::bool(true));
    }
}
