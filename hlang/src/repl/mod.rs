//! REPL (Read-Eval-Print Loop) for hlang

use crate::error::{report_error, Error};
use crate::interp::{check_statements, child_env, EnvRef, Interpreter, Value};
use crate::lexer::{tokenize, Token};
use crate::parser::{parse, parse_statements};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "> ";
const HISTORY_FILE: &str = ".hlang_history";
const SOURCE_NAME: &str = "<repl>";

/// Interpreter state that survives between inputs
pub struct Session {
    interpreter: Interpreter,
    /// Scope of top-level statements, below the global scope
    scope: EnvRef,
}

impl Session {
    pub fn new(interpreter: Interpreter) -> Self {
        let scope = child_env(&interpreter.global_env());
        Session { interpreter, scope }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Evaluate one input. Function declarations are loaded; anything else
    /// runs as statements whose final expression value is returned.
    pub fn eval(&mut self, input: &str) -> Result<Option<Value>, Error> {
        let tokens = tokenize(input)?;
        if let [(Token::Fun, _), (Token::Word(_), _), ..] = tokens.as_slice() {
            let program = parse(input, tokens)?;
            self.interpreter.load(&program)?;
            return Ok(None);
        }
        let stmts = parse_statements(input, tokens)?;
        check_statements(&stmts)?;
        Ok(self.interpreter.eval_statements(&stmts, &self.scope)?)
    }

    /// Drop every top-level binding
    pub fn reset(&mut self) {
        self.scope = child_env(&self.interpreter.global_env());
    }

    /// Handle REPL commands (starting with :). Returns true to quit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                print_help();
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            ":reset" => {
                self.reset();
                println!("Bindings cleared.");
                false
            }
            ":functions" | ":f" => {
                for name in self.interpreter.function_names() {
                    println!("  {name}");
                }
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }
}

/// Print help message
fn print_help() {
    println!("hlang REPL Commands:");
    println!("  :help, :h, :?      Show this help");
    println!("  :quit, :q          Exit the REPL");
    println!("  :clear             Clear the screen");
    println!("  :reset             Forget top-level variables");
    println!("  :functions, :f     List declared functions");
    println!();
    println!("You can enter:");
    println!("  - Statements: var x = 1  x.increment()");
    println!("  - Expressions: x.plus(2).multiply(3)");
    println!("  - Function declarations: fun twice(n) {{ return n.multiply(2) }}");
    println!();
    println!("Built-in functions:");
    println!("  println(x, ...)    Print values with newline");
    println!("  print(x, ...)      Print values without newline");
    println!("  readln()           Read a line of input");
    println!("  int(s)             Parse an integer");
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new(interpreter: Interpreter) -> RlResult<Self> {
        let editor = DefaultEditor::new()?;

        // Try to find history file in home directory
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            session: Session::new(interpreter),
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("hlang REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with(':') {
                        if self.session.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.eval_input(line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Evaluate user input, printing any non-void result
    fn eval_input(&mut self, input: &str) {
        match self.session.eval(input) {
            Ok(Some(value)) if !value.is_void() => println!("{value}"),
            Ok(_) => {}
            Err(err) => {
                if report_error(SOURCE_NAME, input, &err).is_err() {
                    eprintln!("{err}");
                }
            }
        }
    }
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
