//! Tree-walking evaluator

use super::args::{Args, Thunk};
use super::check::check_program;
use super::env::{child_env, root_of, EnvRef, Environment};
use super::error::{InterpResult, RuntimeError};
use super::ops::{self, global::BuiltinFn};
use super::value::{Lambda, Value};
use crate::ast::{Body, Expr, Function, Program, Spanned, Stmt, NEW, THIS};
use crate::config::Config;
use crate::error::Error;
use crate::util::{ensure_sufficient_stack, suggestion_hint};
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// How a statement finished
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Fell through to the next statement
    Pass,
    Return(Value),
    Break,
    Continue,
}

/// The interpreter
pub struct Interpreter {
    /// Global environment
    global_env: EnvRef,
    /// User-defined functions
    functions: HashMap<String, Rc<Function>>,
    /// Builtin functions of the `this` dispatcher
    builtins: HashMap<&'static str, BuiltinFn>,
    /// Current depth of nested function and lambda calls
    recursion_depth: usize,
    config: Config,
    /// Console input for `readln`
    input: Box<dyn BufRead>,
    /// Console output for `print`/`println`
    output: Box<dyn Write>,
}

impl Interpreter {
    /// Create a new interpreter on the process's stdin/stdout
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_io(config, Box::new(BufReader::new(io::stdin())), Box::new(io::stdout()))
    }

    /// Create an interpreter on the given console streams. The global
    /// scope starts out holding the `this` dispatcher and the `new` factory.
    pub fn with_io(config: Config, input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        let mut builtins = HashMap::new();
        ops::global::register(&mut builtins);
        let mut globals = Environment::new();
        globals.define(THIS.to_string(), Value::This);
        globals.define(NEW.to_string(), Value::New);
        Interpreter {
            global_env: globals.into_ref(),
            functions: HashMap::new(),
            builtins,
            recursion_depth: 0,
            config,
            input,
            output,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check and register a program's functions. A later declaration
    /// replaces an earlier one with the same name.
    pub fn load(&mut self, program: &Program) -> crate::Result<()> {
        check_program(program)?;
        for function in &program.functions {
            debug!(function = %function.name.node, params = function.params.len(), "loaded function");
            self.functions.insert(function.name.node.clone(), Rc::clone(function));
        }
        Ok(())
    }

    /// Load a program and call its entry function with no arguments
    #[instrument(level = "debug", skip_all, fields(entry = %self.config.entry))]
    pub fn run(&mut self, program: &Program) -> Result<Value, Error> {
        self.load(program)?;
        let entry = self.config.entry.clone();
        debug!(functions = self.functions.len(), "starting entry function");
        Ok(self.call_function_with_args(&entry, Vec::new())?)
    }

    /// Call a builtin or user function by name from host code
    pub fn call_function_with_args(&mut self, name: &str, args: Vec<Value>) -> InterpResult<Value> {
        let global = Rc::clone(&self.global_env);
        self.call_global(name, Args::ready(args), &global)
    }

    /// Bind a variable in the global scope, visible to every function
    pub fn define_global(&mut self, name: impl Into<String>, value: Value) {
        self.global_env.borrow_mut().define(name.into(), value);
    }

    /// Look up a global variable
    pub fn global(&self, name: &str) -> Option<Value> {
        self.global_env.borrow().get(name)
    }

    pub fn global_env(&self) -> EnvRef {
        Rc::clone(&self.global_env)
    }

    /// Names of loaded user functions, sorted
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run top-level statements directly in `env` (REPL input). Yields
    /// the value of a trailing expression statement or `return`.
    pub fn eval_statements(&mut self, stmts: &[Spanned<Stmt>], env: &EnvRef) -> InterpResult<Option<Value>> {
        let mut last = None;
        for stmt in stmts {
            last = None;
            if let Stmt::Expr(expr) = &stmt.node {
                last = Some(self.eval(expr, env)?);
                continue;
            }
            match self.exec_stmt(stmt, env)? {
                Flow::Pass => {}
                Flow::Return(value) => return Ok(Some(value)),
                Flow::Break => return Err(RuntimeError::control_flow("break").with_span(stmt.span)),
                Flow::Continue => return Err(RuntimeError::control_flow("continue").with_span(stmt.span)),
            }
        }
        Ok(last)
    }

    // ---------------------------------------------------------------
    // Console
    // ---------------------------------------------------------------

    pub(crate) fn write_output(&mut self, text: &str) -> InterpResult<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(|e| RuntimeError::io_error(&e.to_string()))
    }

    /// Next input line without its terminator; `None` at end of input
    pub(crate) fn read_line(&mut self) -> InterpResult<Option<String>> {
        self.output.flush().map_err(|e| RuntimeError::io_error(&e.to_string()))?;
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .map_err(|e| RuntimeError::io_error(&e.to_string()))?;
        if n == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    // ---------------------------------------------------------------
    // Calls
    // ---------------------------------------------------------------

    /// Resolve a call on the `this` dispatcher: builtins first, then user
    /// functions. A user function runs in a fresh scope under the root of
    /// the caller's chain, so caller locals are invisible to it.
    pub(crate) fn call_global(&mut self, name: &str, args: Args<'_>, env: &EnvRef) -> InterpResult<Value> {
        if let Some(builtin) = self.builtins.get(name).copied() {
            let values = args.force_all(self)?;
            return builtin(self, values);
        }

        if let Some(function) = self.functions.get(name).cloned() {
            let values = args.force_all(self)?;
            let scope = child_env(&root_of(env));
            return self.call_function(&function, values, scope);
        }

        let candidates = self
            .builtins
            .keys()
            .copied()
            .chain(self.functions.keys().map(String::as_str));
        Err(RuntimeError::undefined_function(name, &suggestion_hint(name, candidates)))
    }

    /// Call a lambda in a fresh scope enclosed by its captured scope
    pub(crate) fn invoke_lambda(&mut self, lambda: &Rc<Lambda>, args: Vec<Value>) -> InterpResult<Value> {
        let scope = child_env(&lambda.captured);
        self.call_function(&lambda.function, args, scope)
    }

    /// Call a user-defined function with automatic stack growth
    fn call_function(&mut self, function: &Function, args: Vec<Value>, scope: EnvRef) -> InterpResult<Value> {
        ensure_sufficient_stack(|| self.call_function_inner(function, args, scope))
    }

    fn call_function_inner(&mut self, function: &Function, args: Vec<Value>, scope: EnvRef) -> InterpResult<Value> {
        if function.params.len() != args.len() {
            return Err(RuntimeError::arity_mismatch(
                &function.name.node,
                function.params.len(),
                args.len(),
            ));
        }

        self.recursion_depth += 1;
        if self.recursion_depth > self.config.max_recursion_depth {
            self.recursion_depth -= 1;
            return Err(RuntimeError::stack_overflow(self.config.max_recursion_depth));
        }
        trace!(function = %function.name.node, depth = self.recursion_depth, "call");

        {
            let mut frame = scope.borrow_mut();
            for (param, arg) in function.param_names().zip(args) {
                frame.define(param.to_string(), arg);
            }
        }

        let result = self.exec_stmts(&function.body.stmts, &scope);
        self.recursion_depth -= 1;

        match result? {
            Flow::Return(value) => Ok(value),
            Flow::Pass => Ok(Value::Void),
            Flow::Break => Err(RuntimeError::control_flow("break")),
            Flow::Continue => Err(RuntimeError::control_flow("continue")),
        }
    }

    // ---------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------

    /// Run a body in a new child scope
    fn exec_body(&mut self, body: &Body, env: &EnvRef) -> InterpResult<Flow> {
        let scope = child_env(env);
        self.exec_stmts(&body.stmts, &scope)
    }

    fn exec_stmts(&mut self, stmts: &[Spanned<Stmt>], env: &EnvRef) -> InterpResult<Flow> {
        for stmt in stmts {
            match self.exec_stmt(stmt, env)? {
                Flow::Pass => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Pass)
    }

    fn exec_stmt(&mut self, stmt: &Spanned<Stmt>, env: &EnvRef) -> InterpResult<Flow> {
        match &stmt.node {
            Stmt::If { branches, else_body } => {
                for (cond, body) in branches {
                    if self.condition(cond, env)? {
                        return self.exec_body(body, env);
                    }
                }
                match else_body {
                    Some(body) => self.exec_body(body, env),
                    None => Ok(Flow::Pass),
                }
            }
            Stmt::While { cond, body } => {
                while self.condition(cond, env)? {
                    match self.exec_body(body, env)? {
                        Flow::Break => break,
                        Flow::Pass | Flow::Continue => {}
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Pass)
            }
            Stmt::VarDecl { name, init } => {
                let value = self.eval(init, env)?;
                env.borrow_mut().define(name.node.clone(), value);
                Ok(Flow::Pass)
            }
            Stmt::Assign { name, value } => {
                let value = self.eval(value, env)?;
                env.borrow_mut().set(&name.node, value);
                Ok(Flow::Pass)
            }
            Stmt::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval(expr, env)?,
                    None => Value::Void,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Break => Ok(Flow::Break),
            Stmt::Continue => Ok(Flow::Continue),
            Stmt::Block(body) => self.exec_body(body, env),
            Stmt::Expr(expr) => {
                self.eval(expr, env)?;
                Ok(Flow::Pass)
            }
        }
    }

    /// Evaluate an `if`/`while` condition, which must be a bool
    fn condition(&mut self, cond: &Spanned<Expr>, env: &EnvRef) -> InterpResult<bool> {
        let value = self.eval(cond, env)?;
        value
            .as_bool()
            .ok_or_else(|| RuntimeError::type_error("bool condition", value.type_name()).with_span(cond.span))
    }

    // ---------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------

    /// Evaluate an expression with automatic stack growth for deep recursion
    pub(crate) fn eval(&mut self, expr: &Spanned<Expr>, env: &EnvRef) -> InterpResult<Value> {
        ensure_sufficient_stack(|| self.eval_inner(expr, env))
    }

    fn eval_inner(&mut self, expr: &Spanned<Expr>, env: &EnvRef) -> InterpResult<Value> {
        match &expr.node {
            Expr::Const(constant) => Ok(Value::from_constant(constant)),
            Expr::Var(name) => self.lookup(name, env).map_err(|e| e.with_span(expr.span)),
            Expr::Lambda(function) => Ok(Value::Lambda(Rc::new(Lambda {
                function: Rc::clone(function),
                captured: Rc::clone(env),
            }))),
            Expr::Call { receiver, method, args } => {
                let target = self.eval(receiver, env)?;
                trace!(method = %method.node, receiver = target.type_name(), "dispatch");
                let thunks = args
                    .iter()
                    .map(|arg| Thunk::Deferred {
                        expr: arg,
                        env: Rc::clone(env),
                    })
                    .collect();
                ops::dispatch(&target, &method.node, Args::new(thunks), env, self)
                    .map_err(|e| e.with_span(method.span))
            }
        }
    }

    fn lookup(&self, name: &str, env: &EnvRef) -> InterpResult<Value> {
        env.borrow().get(name).ok_or_else(|| {
            let visible = env.borrow().visible_names();
            let candidates = visible.iter().map(String::as_str).filter(|n| !n.contains('.'));
            RuntimeError::undefined_variable(name, &suggestion_hint(name, candidates))
        })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
