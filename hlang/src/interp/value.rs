//! Runtime values for the interpreter
//!
//! Every value is a handle. Cloning a `Value` aliases its payload, so
//! `var b = a` followed by `a.increment()` is visible through `b`. Fresh
//! payloads come only from literals, arithmetic results, and `copy`.

use super::env::EnvRef;
use crate::ast::{Constant, Function};
use crate::util::ensure_sufficient_stack;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

/// Runtime value
#[derive(Clone)]
pub enum Value {
    /// 64-bit integer, the kind of integer literals
    Int(Rc<Cell<i64>>),
    /// 64-bit integer created by `new.long(...)`; never mixes with `Int`
    Long(Rc<Cell<i64>>),
    /// 64-bit floating point
    Double(Rc<Cell<f64>>),
    Bool(Rc<Cell<bool>>),
    Str(Rc<RefCell<String>>),
    /// Growable sequence
    List(Rc<RefCell<Vec<Value>>>),
    /// Fixed-length sequence, slots start out `void`
    Array(Rc<RefCell<Vec<Value>>>),
    Iterator(Rc<Cursor>),
    File(Rc<PathBuf>),
    Lambda(Rc<Lambda>),
    /// Absence of a value
    Void,
    /// The global dispatcher behind bare calls like `println(x)`
    This,
    /// The factory behind `new.list()`, `new.int("5")`, ...
    New,
}

type Items = RefCell<Vec<Value>>;

/// Forward cursor over the live contents of a list or array
#[derive(Debug)]
pub struct Cursor {
    items: Rc<RefCell<Vec<Value>>>,
    next: Cell<usize>,
}

impl Cursor {
    pub fn new(items: Rc<RefCell<Vec<Value>>>) -> Self {
        Cursor {
            items,
            next: Cell::new(0),
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.get() < self.items.borrow().len()
    }

    /// Element under the cursor, advancing past it. `Err` carries the
    /// offending position and the current length.
    pub fn advance(&self) -> Result<Value, (usize, usize)> {
        let items = self.items.borrow();
        let index = self.next.get();
        match items.get(index) {
            Some(value) => {
                self.next.set(index + 1);
                Ok(value.clone())
            }
            None => Err((index, items.len())),
        }
    }
}

/// A function literal closed over the scope it was evaluated in
pub struct Lambda {
    pub function: Rc<Function>,
    pub captured: EnvRef,
}

impl Lambda {
    pub fn arity(&self) -> usize {
        self.function.params.len()
    }
}

impl fmt::Debug for Lambda {
    // The captured scope may contain this lambda
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda")
            .field("params", &self.function.params.len())
            .finish_non_exhaustive()
    }
}

impl Value {
    pub fn int(n: i64) -> Self {
        Value::Int(Rc::new(Cell::new(n)))
    }

    pub fn long(n: i64) -> Self {
        Value::Long(Rc::new(Cell::new(n)))
    }

    pub fn double(x: f64) -> Self {
        Value::Double(Rc::new(Cell::new(x)))
    }

    pub fn bool(b: bool) -> Self {
        Value::Bool(Rc::new(Cell::new(b)))
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(Rc::new(RefCell::new(s.into())))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    /// Array of `len` void slots
    pub fn array(len: usize) -> Self {
        Value::Array(Rc::new(RefCell::new(vec![Value::Void; len])))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Value::File(Rc::new(path.into()))
    }

    /// Fresh value for a literal. Each evaluation gets its own payload.
    pub fn from_constant(constant: &Constant) -> Self {
        match constant {
            Constant::Int(n) => Value::int(*n),
            Constant::Double(x) => Value::double(*x),
            Constant::Bool(b) => Value::bool(*b),
            Constant::Str(s) => Value::str(s.as_str()),
            Constant::Void => Value::Void,
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Array(_) => "array",
            Value::Iterator(_) => "iterator",
            Value::File(_) => "file",
            Value::Lambda(_) => "lambda",
            Value::Void => "void",
            Value::This => "this",
            Value::New => "new",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(n.get()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(b.get()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.borrow().clone()),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    /// Independent payload with the same contents. Containers copy their
    /// element handles, not the elements.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Int(n) => Value::int(n.get()),
            Value::Long(n) => Value::long(n.get()),
            Value::Double(x) => Value::double(x.get()),
            Value::Bool(b) => Value::bool(b.get()),
            Value::Str(s) => Value::str(s.borrow().as_str()),
            Value::List(items) => Value::list(items.borrow().clone()),
            Value::Array(items) => Value::Array(Rc::new(RefCell::new(items.borrow().clone()))),
            other => other.clone(),
        }
    }

    /// Script-level equality: scalars compare contents, everything else
    /// compares identity. Different kinds are never equal.
    pub fn script_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) | (Value::Long(a), Value::Long(b)) => a.get() == b.get(),
            (Value::Double(a), Value::Double(b)) => a.get() == b.get(),
            (Value::Bool(a), Value::Bool(b)) => a.get() == b.get(),
            (Value::Str(a), Value::Str(b)) => *a.borrow() == *b.borrow(),
            (Value::List(a), Value::List(b)) | (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Iterator(a), Value::Iterator(b)) => Rc::ptr_eq(a, b),
            (Value::File(a), Value::File(b)) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => Rc::ptr_eq(a, b),
            (Value::Void, Value::Void) | (Value::This, Value::This) | (Value::New, Value::New) => true,
            _ => false,
        }
    }

    /// Whether both values share one payload
    pub fn same_handle(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) | (Value::Long(a), Value::Long(b)) => Rc::ptr_eq(a, b),
            (Value::Double(a), Value::Double(b)) => Rc::ptr_eq(a, b),
            (Value::Bool(a), Value::Bool(b)) => Rc::ptr_eq(a, b),
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            _ => self.script_eq(other),
        }
    }
}

impl Value {
    /// Render `self`; a container already open higher up prints as `[...]`
    fn render(&self, f: &mut fmt::Formatter<'_>, open: &mut Vec<*const Items>) -> fmt::Result {
        match self {
            Value::List(items) | Value::Array(items) => {
                let ptr = Rc::as_ptr(items);
                if open.contains(&ptr) {
                    return write!(f, "[...]");
                }
                open.push(ptr);
                let result = write_items(f, &items.borrow(), open);
                open.pop();
                result
            }
            other => write!(f, "{other}"),
        }
    }

    /// Element-wise equality that treats a pair of containers already
    /// under comparison as equal, so cyclic contents terminate
    fn structural_eq(&self, other: &Value, open: &mut Vec<(*const Items, *const Items)>) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) | (Value::Array(a), Value::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let pair = (Rc::as_ptr(a), Rc::as_ptr(b));
                if open.contains(&pair) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                if a.len() != b.len() {
                    return false;
                }
                open.push(pair);
                let eq = a
                    .iter()
                    .zip(b.iter())
                    .all(|(x, y)| ensure_sufficient_stack(|| x.structural_eq(y, open)));
                open.pop();
                eq
            }
            _ => self.script_eq(other),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value], open: &mut Vec<*const Items>) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        ensure_sufficient_stack(|| item.render(f, open))?;
    }
    write!(f, "]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) | Value::Long(n) => write!(f, "{}", n.get()),
            Value::Double(x) => {
                let x = x.get();
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Value::Bool(b) => write!(f, "{}", b.get()),
            Value::Str(s) => write!(f, "{}", s.borrow()),
            Value::List(_) | Value::Array(_) => self.render(f, &mut Vec::new()),
            Value::Iterator(_) => write!(f, "<iterator>"),
            Value::File(path) => write!(f, "<file {}>", path.display()),
            Value::Lambda(l) => write!(f, "<lambda/{}>", l.arity()),
            Value::Void => write!(f, "void"),
            Value::This => write!(f, "this"),
            Value::New => write!(f, "new"),
        }
    }
}

/// Kind and rendered contents; containers print like `Display`
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "string({:?})", s.borrow()),
            Value::Void | Value::This | Value::New => f.write_str(self.type_name()),
            other => write!(f, "{}({other})", other.type_name()),
        }
    }
}

/// Structural equality for host code and tests. Containers compare their
/// elements; scripts use [`Value::script_eq`] instead.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other, &mut Vec::new())
    }
}
