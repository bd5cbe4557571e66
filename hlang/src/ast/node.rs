//! Statement and expression nodes

use super::{Function, Spanned};
use serde::Serialize;
use std::rc::Rc;

/// A braced statement sequence. Owns its own scope when evaluated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Body {
    pub stmts: Vec<Spanned<Stmt>>,
}

impl Body {
    pub fn new(stmts: Vec<Spanned<Stmt>>) -> Self {
        Self { stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

/// Statement
#[derive(Debug, Clone, Serialize)]
pub enum Stmt {
    /// `if (c) { } else if (c2) { } else { }`
    If {
        branches: Vec<(Spanned<Expr>, Body)>,
        else_body: Option<Body>,
    },

    /// `while (c) { }`
    While { cond: Spanned<Expr>, body: Body },

    /// `var name = init`: binds in the innermost scope
    VarDecl {
        name: Spanned<String>,
        init: Spanned<Expr>,
    },

    /// `name = value`: rebinds the nearest existing binding, else creates a local
    Assign {
        name: Spanned<String>,
        value: Spanned<Expr>,
    },

    /// `return expr`; a bare `return` yields void
    Return(Option<Spanned<Expr>>),

    Break,

    Continue,

    /// Nested block, either written as `{ ... }` or produced by `for` desugaring
    Block(Body),

    /// Expression evaluated for its side effects
    Expr(Spanned<Expr>),
}

/// Expression ("evaluable")
#[derive(Debug, Clone, Serialize)]
pub enum Expr {
    /// `receiver.method(args)`; implicit calls use the `this` variable as receiver
    Call {
        receiver: Box<Spanned<Expr>>,
        method: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },

    /// Variable reference
    Var(String),

    /// Literal
    Const(Constant),

    /// `fun (params) { body }`
    Lambda(Rc<Function>),
}

/// Literal value fixed at parse time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Constant {
    Int(i64),
    Double(f64),
    Bool(bool),
    Str(String),
    Void,
}

/// Name of the global dispatcher binding
pub const THIS: &str = "this";

/// Name of the constructor factory binding
pub const NEW: &str = "new";
