//! Recursive-descent parser
//!
//! A single cursor into the token vector is threaded through every parsing
//! method. Call chains are left-deep: `a.b().c()` parses as
//! `Call(Call(a, b, []), c, [])`, and a bare word directly followed by `(`
//! is a call on the implicit `this` dispatcher.

use crate::ast::{Body, Constant, Expr, Function, LineIndex, Program, Span, Spanned, Stmt, LAMBDA_NAME, THIS};
use crate::error::{CompileError, Result};
use crate::lexer::Token;
use crate::util::ensure_sufficient_stack;
use std::rc::Rc;


/// Parse tokens into a program of function declarations
pub fn parse(source: &str, tokens: Vec<(Token, Span)>) -> Result<Program> {
    let mut parser = Parser::new(source, tokens);
    let mut functions = Vec::new();
    while !parser.at_end() {
        functions.push(Rc::new(parser.function()?));
    }
    Ok(Program { functions })
}

/// Parse a bare statement sequence (REPL input)
pub fn parse_statements(source: &str, tokens: Vec<(Token, Span)>) -> Result<Vec<Spanned<Stmt>>> {
    let mut parser = Parser::new(source, tokens);
    let mut stmts = Vec::new();
    while !parser.at_end() {
        stmts.push(parser.statement()?);
    }
    Ok(stmts)
}

struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    eof: Span,
    /// Numbers the hidden iterator variable of each desugared `for`
    loops_desugared: usize,
}

impl Parser {
    fn new(source: &str, tokens: Vec<(Token, Span)>) -> Self {
        let eof = LineIndex::new(source).span(source.len()..source.len());
        Parser {
            tokens,
            pos: 0,
            eof,
            loops_desugared: 0,
        }
    }

    // ---------------------------------------------------------------
    // Cursor
    // ---------------------------------------------------------------

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|(t, _)| t)
    }

    fn span(&self) -> Span {
        self.tokens.get(self.pos).map_or(self.eof, |(_, s)| *s)
    }

    fn prev_span(&self) -> Span {
        match self.pos.checked_sub(1) {
            Some(i) => self.tokens[i].1,
            None => self.eof,
        }
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<Span> {
        if self.eat(expected) {
            Ok(self.prev_span())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn expect_word(&mut self, what: &str) -> Result<Spanned<String>> {
        match self.tokens.get(self.pos) {
            Some((Token::Word(w), span)) => {
                let name = Spanned::new(w.clone(), *span);
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        match self.tokens.get(self.pos) {
            Some((token, span)) => CompileError::parser(format!("expected {expected}, found {token}"), *span),
            None => CompileError::parser(format!("expected {expected}, found end of input"), self.eof),
        }
    }

    // ---------------------------------------------------------------
    // Declarations
    // ---------------------------------------------------------------

    /// `fun name(a, b) { ... }`
    fn function(&mut self) -> Result<Function> {
        let start = self.expect(&Token::Fun)?;
        let name = self.expect_word("function name")?;
        self.function_rest(name, start)
    }

    /// Parameter list and body, shared by declarations and lambda literals
    fn function_rest(&mut self, name: Spanned<String>, start: Span) -> Result<Function> {
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                params.push(self.expect_word("parameter name")?);
                if self.eat(&Token::RParen) {
                    break;
                }
                if !self.eat(&Token::Comma) {
                    return Err(self.unexpected("`,` or `)` in parameter list"));
                }
            }
        }
        let body = self.body()?;
        Ok(Function {
            name,
            params,
            body,
            span: start.merge(self.prev_span()),
        })
    }

    /// `{ stmt* }`
    fn body(&mut self) -> Result<Body> {
        let open = self.expect(&Token::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            if self.eat(&Token::RBrace) {
                return Ok(Body::new(stmts));
            }
            if self.at_end() {
                return Err(CompileError::parser(
                    format!("unterminated body: `{{` opened at {open} is never closed"),
                    self.eof,
                ));
            }
            stmts.push(self.statement()?);
        }
    }

    // ---------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------

    fn statement(&mut self) -> Result<Spanned<Stmt>> {
        ensure_sufficient_stack(|| self.statement_inner())
    }

    fn statement_inner(&mut self) -> Result<Spanned<Stmt>> {
        let start = self.span();
        let stmt = match self.peek() {
            Some(Token::If) => self.if_stmt()?,
            Some(Token::While) => {
                self.pos += 1;
                let cond = self.condition()?;
                let body = self.body()?;
                Stmt::While { cond, body }
            }
            Some(Token::For) => self.for_stmt(start)?,
            Some(Token::Var) => {
                self.pos += 1;
                let name = self.expect_word("variable name")?;
                self.expect(&Token::Eq)?;
                let init = self.expr()?;
                Stmt::VarDecl { name, init }
            }
            Some(Token::Return) => {
                self.pos += 1;
                if self.check(&Token::RBrace) || self.at_end() {
                    Stmt::Return(None)
                } else {
                    Stmt::Return(Some(self.expr()?))
                }
            }
            Some(Token::Break) => {
                self.pos += 1;
                Stmt::Break
            }
            Some(Token::Continue) => {
                self.pos += 1;
                Stmt::Continue
            }
            Some(Token::LBrace) => Stmt::Block(self.body()?),
            Some(Token::Word(_)) if self.peek_at(1) == Some(&Token::Eq) => {
                let name = self.expect_word("variable name")?;
                self.expect(&Token::Eq)?;
                let value = self.expr()?;
                Stmt::Assign { name, value }
            }
            _ => Stmt::Expr(self.expr()?),
        };
        Ok(Spanned::new(stmt, start.merge(self.prev_span())))
    }

    /// `( expr )` after `if`/`while`
    fn condition(&mut self) -> Result<Spanned<Expr>> {
        self.expect(&Token::LParen)?;
        let cond = self.expr()?;
        self.expect(&Token::RParen)?;
        Ok(cond)
    }

    fn if_stmt(&mut self) -> Result<Stmt> {
        self.expect(&Token::If)?;
        let mut branches = vec![(self.condition()?, self.body()?)];
        let mut else_body = None;
        while self.eat(&Token::Else) {
            if self.eat(&Token::If) {
                branches.push((self.condition()?, self.body()?));
            } else {
                else_body = Some(self.body()?);
                break;
            }
        }
        Ok(Stmt::If { branches, else_body })
    }

    /// `for (x in expr) { body }` becomes
    /// `{ var it = expr.getIterator() while (it.hasNext()) { var x = it.moveNext() body } }`
    fn for_stmt(&mut self, start: Span) -> Result<Stmt> {
        self.expect(&Token::For)?;
        self.expect(&Token::LParen)?;
        let var = self.expect_word("loop variable name")?;
        match self.peek() {
            Some(Token::Word(w)) if w == "in" => self.pos += 1,
            _ => return Err(self.unexpected("`in`")),
        }
        let iterable = self.expr()?;
        self.expect(&Token::RParen)?;
        let user_body = self.body()?;

        // `.` never appears inside a lexed word, so this cannot shadow user names
        let hidden = format!("for.{}", self.loops_desugared);
        self.loops_desugared += 1;

        let iter_call = |method: &str| {
            Spanned::new(
                Expr::Call {
                    receiver: Box::new(Spanned::new(Expr::Var(hidden.clone()), start)),
                    method: Spanned::new(method.to_string(), start),
                    args: Vec::new(),
                },
                start,
            )
        };

        let mut loop_body = vec![Spanned::new(
            Stmt::VarDecl {
                name: var,
                init: iter_call("moveNext"),
            },
            start,
        )];
        loop_body.extend(user_body.stmts);

        let iterable_span = iterable.span;
        let init = Spanned::new(
            Expr::Call {
                receiver: Box::new(iterable),
                method: Spanned::new("getIterator".to_string(), iterable_span),
                args: Vec::new(),
            },
            iterable_span,
        );
        let cond = iter_call("hasNext");
        Ok(Stmt::Block(Body::new(vec![
            Spanned::new(
                Stmt::VarDecl {
                    name: Spanned::new(hidden, start),
                    init,
                },
                start,
            ),
            Spanned::new(
                Stmt::While {
                    cond,
                    body: Body::new(loop_body),
                },
                start,
            ),
        ])))
    }

    // ---------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------

    fn expr(&mut self) -> Result<Spanned<Expr>> {
        ensure_sufficient_stack(|| -> Result<Spanned<Expr>> {
            let mut expr = self.primary()?;
            while self.eat(&Token::Dot) {
                let method = self.expect_word("method name")?;
                let args = self.call_args()?;
                let span = expr.span.merge(self.prev_span());
                expr = Spanned::new(
                    Expr::Call {
                        receiver: Box::new(expr),
                        method,
                        args,
                    },
                    span,
                );
            }
            Ok(expr)
        })
    }

    fn primary(&mut self) -> Result<Spanned<Expr>> {
        let span = self.span();
        let Some(token) = self.peek().cloned() else {
            return Err(self.unexpected("expression"));
        };
        let constant = |c| Ok(Spanned::new(Expr::Const(c), span));
        match token {
            Token::IntLit(n) => {
                self.pos += 1;
                constant(Constant::Int(n))
            }
            Token::DoubleLit(x) => {
                self.pos += 1;
                constant(Constant::Double(x))
            }
            Token::StringLit(s) => {
                self.pos += 1;
                constant(Constant::Str(s))
            }
            Token::True | Token::False => {
                self.pos += 1;
                constant(Constant::Bool(token == Token::True))
            }
            Token::Void => {
                self.pos += 1;
                constant(Constant::Void)
            }
            Token::Fun if self.peek_at(1) == Some(&Token::LParen) => {
                self.pos += 1;
                let name = Spanned::new(LAMBDA_NAME.to_string(), span);
                let function = self.function_rest(name, span)?;
                let span = function.span;
                Ok(Spanned::new(Expr::Lambda(Rc::new(function)), span))
            }
            Token::Word(name) => {
                self.pos += 1;
                if self.check(&Token::LParen) {
                    let method = Spanned::new(name, span);
                    let args = self.call_args()?;
                    Ok(Spanned::new(
                        Expr::Call {
                            receiver: Box::new(Spanned::new(Expr::Var(THIS.to_string()), span)),
                            method,
                            args,
                        },
                        span.merge(self.prev_span()),
                    ))
                } else {
                    Ok(Spanned::new(Expr::Var(name), span))
                }
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// `( expr, expr, ... )`
    fn call_args(&mut self) -> Result<Vec<Spanned<Expr>>> {
        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.eat(&Token::RParen) {
                return Ok(args);
            }
            if !self.eat(&Token::Comma) {
                return Err(self.unexpected("`,` or `)` in argument list"));
            }
        }
    }
}
