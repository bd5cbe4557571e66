//! `file` operations

use super::{equality, unknown};
use crate::interp::args::Args;
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::eval::Interpreter;
use crate::interp::value::Value;
use std::path::Path;
use tracing::debug;

pub const METHODS: &[&str] = &["readText", "readLines", "equal", "notEqual", "toString"];

fn read(path: &Path) -> InterpResult<String> {
    debug!(path = %path.display(), "reading file");
    std::fs::read_to_string(path).map_err(|e| RuntimeError::io_error(&format!("{}: {e}", path.display())))
}

pub fn call(
    receiver: &Value,
    path: &Path,
    method: &str,
    args: Args<'_>,
    interp: &mut Interpreter,
) -> InterpResult<Value> {
    match method {
        "readText" => {
            args.none(method)?;
            read(path).map(Value::str)
        }
        "readLines" => {
            args.none(method)?;
            let text = read(path)?;
            Ok(Value::list(text.lines().map(Value::str).collect()))
        }
        "equal" | "notEqual" => equality(receiver, method, args, interp),
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

    fn run(receiver: &Value, method: &str) -> InterpResult<Value> {
        let mut interp = Interpreter::new();
        let env = interp.global_env();
        crate::interp::ops::dispatch(receiver, method, Args::ready(vec![]), &env, &mut interp)
    }

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("hlang-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_text_and_lines() {
        let path = temp_file("lines.txt", "one\ntwo\r\nthree\n");
        let file = Value::file(&path);
        assert_eq!(run(&file, "readText").unwrap(), Value::str("one\ntwo\r\nthree\n"));
        assert_eq!(
            run(&file, "readLines").unwrap(),
            Value::list(vec![Value::str("one"), Value::str("two"), Value::str("three")])
        );
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let file = Value::file("/definitely/not/here.txt");
        let err = run(&file, "readText").unwrap_err();
        assert_eq!(err.kind, ErrorKind::IoError);
        assert!(err.message.contains("here.txt"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::file("a/b.txt").to_string(), "<file a/b.txt>");
    }
}
