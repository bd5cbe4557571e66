//! Abstract Syntax Tree definitions

mod node;
mod span;

pub use node::*;
pub use span::*;

use serde::Serialize;
use std::collections::HashMap;
use std::rc::Rc;

/// A program is the ordered sequence of its function declarations
#[derive(Debug, Clone, Serialize)]
pub struct Program {
    pub functions: Vec<Rc<Function>>,
}

impl Program {
    /// Name to declaration map. A later declaration with the same name wins.
    pub fn function_map(&self) -> HashMap<&str, &Rc<Function>> {
        self.functions
            .iter()
            .map(|f| (f.name.node.as_str(), f))
            .collect()
    }
}

/// Function declaration, also used as the body of a lambda literal
#[derive(Debug, Clone, Serialize)]
pub struct Function {
    pub name: Spanned<String>,
    pub params: Vec<Spanned<String>>,
    pub body: Body,
    pub span: Span,
}

impl Function {
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.node.as_str())
    }
}

/// Name given to functions built from `fun (...) { ... }` literals
pub const LAMBDA_NAME: &str = "<lambda>";
