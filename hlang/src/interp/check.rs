//! Control-flow check run before execution
//!
//! `break` and `continue` must sit inside a `while` of the same function.
//! Lambda bodies start over: a loop around a lambda literal does not
//! cover the lambda's own statements.

use crate::ast::{Body, Expr, Program, Spanned, Stmt};
use crate::error::{CompileError, Result};

/// Check every function of `program`
pub fn check_program(program: &Program) -> Result<()> {
    for function in &program.functions {
        check_body(&function.body, 0)?;
    }
    Ok(())
}

/// Check a top-level statement sequence (REPL input)
pub fn check_statements(stmts: &[Spanned<Stmt>]) -> Result<()> {
    check_stmts(stmts, 0)
}

fn check_body(body: &Body, loops: usize) -> Result<()> {
    check_stmts(&body.stmts, loops)
}

fn check_stmts(stmts: &[Spanned<Stmt>], loops: usize) -> Result<()> {
    for stmt in stmts {
        check_stmt(stmt, loops)?;
    }
    Ok(())
}

fn check_stmt(stmt: &Spanned<Stmt>, loops: usize) -> Result<()> {
    match &stmt.node {
        Stmt::Break | Stmt::Continue if loops == 0 => {
            let keyword = if matches!(stmt.node, Stmt::Break) { "break" } else { "continue" };
            Err(CompileError::control_flow(format!("`{keyword}` outside of a loop"), stmt.span))
        }
        Stmt::Break | Stmt::Continue => Ok(()),
        Stmt::If { branches, else_body } => {
            for (cond, body) in branches {
                check_expr(cond)?;
                check_body(body, loops)?;
            }
            else_body.as_ref().map_or(Ok(()), |b| check_body(b, loops))
        }
        Stmt::While { cond, body } => {
            check_expr(cond)?;
            check_body(body, loops + 1)
        }
        Stmt::VarDecl { init: expr, .. } | Stmt::Assign { value: expr, .. } | Stmt::Expr(expr) => check_expr(expr),
        Stmt::Return(expr) => expr.as_ref().map_or(Ok(()), check_expr),
        Stmt::Block(body) => check_body(body, loops),
    }
}

fn check_expr(expr: &Spanned<Expr>) -> Result<()> {
    match &expr.node {
        Expr::Call { receiver, args, .. } => {
            check_expr(receiver)?;
            args.iter().try_for_each(check_expr)
        }
        Expr::Lambda(function) => check_body(&function.body, 0),
        Expr::Var(_) | Expr::Const(_) => Ok(()),
    }
}
