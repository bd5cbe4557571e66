//! `list`, `array` and `iterator` operations
//!
//! Containers hold element handles; storing a value never copies it.
//! Arguments are forced before the container is borrowed, since forcing
//! can run code that touches the same container.

use super::{equality, index, unknown};
use crate::interp::args::Args;
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::eval::Interpreter;
use crate::interp::value::{Cursor, Value};
use std::cell::RefCell;
use std::rc::Rc;

pub const LIST_METHODS: &[&str] = &[
    "get",
    "set",
    "add",
    "remove",
    "get_size",
    "size",
    "getIterator",
    "equal",
    "notEqual",
    "copy",
    "toString",
];

pub const ARRAY_METHODS: &[&str] = &[
    "get",
    "set",
    "get_size",
    "size",
    "getIterator",
    "equal",
    "notEqual",
    "copy",
    "toString",
];

pub const ITERATOR_METHODS: &[&str] = &["hasNext", "moveNext", "equal", "notEqual"];

type Items = Rc<RefCell<Vec<Value>>>;

/// Operations common to lists and arrays; `None` when `method` is not one
fn call_sequence(
    receiver: &Value,
    items: &Items,
    method: &str,
    args: Args<'_>,
    interp: &mut Interpreter,
) -> Option<InterpResult<Value>> {
    let result = match method {
        "get" => args.values(method, interp).and_then(|[i]| {
            let items = items.borrow();
            let i = index(&i, items.len())?;
            Ok(items[i].clone())
        }),
        "set" => args.values(method, interp).and_then(|[i, value]| {
            let mut items = items.borrow_mut();
            let i = index(&i, items.len())?;
            items[i] = value;
            Ok(receiver.clone())
        }),
        "get_size" | "size" => args.none(method).map(|()| Value::int(items.borrow().len() as i64)),
        "getIterator" => args
            .none(method)
            .map(|()| Value::Iterator(Rc::new(Cursor::new(Rc::clone(items))))),
        "equal" | "notEqual" => equality(receiver, method, args, interp),
        "copy" => args.none(method).map(|()| receiver.deep_copy()),
        "toString" => args.none(method).map(|()| Value::str(receiver.to_string())),
        _ => return None,
    };
    Some(result)
}

pub fn call_list(
    receiver: &Value,
    items: &Items,
    method: &str,
    args: Args<'_>,
    interp: &mut Interpreter,
) -> InterpResult<Value> {
    match method {
        "add" => {
            let [value] = args.values(method, interp)?;
            items.borrow_mut().push(value);
            Ok(receiver.clone())
        }
        "remove" => {
            let [i] = args.values(method, interp)?;
            let mut items = items.borrow_mut();
            let i = index(&i, items.len())?;
            Ok(items.remove(i))
        }
        _ => call_sequence(receiver, items, method, args, interp)
            .unwrap_or_else(|| Err(unknown(receiver, method, LIST_METHODS))),
    }
}

pub fn call_array(
    receiver: &Value,
    items: &Items,
    method: &str,
    args: Args<'_>,
    interp: &mut Interpreter,
) -> InterpResult<Value> {
    call_sequence(receiver, items, method, args, interp)
        .unwrap_or_else(|| Err(unknown(receiver, method, ARRAY_METHODS)))
}

pub fn call_iterator(
    receiver: &Value,
    cursor: &Rc<Cursor>,
    method: &str,
    args: Args<'_>,
    interp: &mut Interpreter,
) -> InterpResult<Value> {
    match method {
        "hasNext" => {
            args.none(method)?;
            Ok(Value::bool(cursor.has_next()))
        }
        "moveNext" => {
            args.none(method)?;
            cursor
                .advance()
                .map_err(|(i, len)| RuntimeError::index_out_of_bounds(i as i64, len))
        }
        "equal" | "notEqual" => equality(receiver, method, args, interp),
        _ => Err(unknown(receiver, method, ITERATOR_METHODS)),
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
    fn test_list_add_get_size() {
        let list = Value::list(vec![]);
        run(&list, "add", vec![Value::int(1)]).unwrap();
        run(&list, "add", vec![Value::str("two")]).unwrap();
        assert_eq!(run(&list, "size", vec![]).unwrap(), Value::int(2));
        assert_eq!(run(&list, "get_size", vec![]).unwrap(), Value::int(2));
        assert_eq!(run(&list, "get", vec![Value::int(1)]).unwrap(), Value::str("two"));
    }

    #[test]
    fn test_list_stores_handles() {
        let x = Value::int(1);
        let list = Value::list(vec![]);
        run(&list, "add", vec![x.clone()]).unwrap();
        run(&x, "increment", vec![]).unwrap();
        assert_eq!(run(&list, "get", vec![Value::int(0)]).unwrap(), Value::int(2));
    }

    #[test]
    fn test_list_remove_returns_element() {
        let list = Value::list(vec![Value::int(1), Value::int(2), Value::int(3)]);
        assert_eq!(run(&list, "remove", vec![Value::int(1)]).unwrap(), Value::int(2));
        assert_eq!(list, Value::list(vec![Value::int(1), Value::int(3)]));
    }

    #[test]
    fn test_bounds() {
        let list = Value::list(vec![Value::int(1)]);
        for i in [-1, 1, 100] {
            let err = run(&list, "get", vec![Value::int(i)]).unwrap_err();
            assert_eq!(err.kind, ErrorKind::IndexOutOfBounds);
        }
        let err = run(&list, "remove", vec![Value::int(1)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexOutOfBounds);
    }

    #[test]
    fn test_array_is_fixed_size() {
        let array = Value::array(2);
        run(&array, "set", vec![Value::int(1), Value::str("x")]).unwrap();
        assert_eq!(run(&array, "get", vec![Value::int(0)]).unwrap(), Value::Void);
        assert_eq!(run(&array, "get", vec![Value::int(1)]).unwrap(), Value::str("x"));
        let err = run(&array, "add", vec![Value::int(1)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownMethod);
        let err = run(&array, "set", vec![Value::int(2), Value::int(0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexOutOfBounds);
    }

    #[test]
    fn test_iterator_walks_then_fails() {
        let list = Value::list(vec![Value::int(1), Value::int(2)]);
        let it = run(&list, "getIterator", vec![]).unwrap();
        let mut seen = Vec::new();
        while run(&it, "hasNext", vec![]).unwrap() == Value::bool(true) {
            seen.push(run(&it, "moveNext", vec![]).unwrap());
        }
        assert_eq!(seen, [Value::int(1), Value::int(2)]);
        let err = run(&it, "moveNext", vec![]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexOutOfBounds);
    }

    #[test]
    fn test_list_equality_is_identity() {
        let a = Value::list(vec![]);
        let b = Value::list(vec![]);
        assert_eq!(run(&a, "equal", vec![a.clone()]).unwrap(), Value::bool(true));
        assert_eq!(run(&a, "equal", vec![b]).unwrap(), Value::bool(false));
        assert_eq!(run(&a, "notEqual", vec![Value::int(0)]).unwrap(), Value::bool(true));
    }
}
