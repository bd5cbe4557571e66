//! hlang CLI

use clap::{Parser, Subcommand};
use hlang::error::report_error;
use hlang::{Config, Error, Interpreter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "hlang", version, about = "hlang - a handle-based scripting language")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a script by calling its entry function
    Run {
        /// Script to run
        file: PathBuf,
        /// Function to call instead of `main`
        #[arg(long, default_value = hlang::config::DEFAULT_ENTRY)]
        entry: String,
        /// Nested calls allowed before a stack overflow error
        #[arg(long, default_value_t = hlang::config::DEFAULT_MAX_RECURSION_DEPTH)]
        max_depth: usize,
    },
    /// Lex, parse and validate a script without running it
    Check {
        /// Source file to check
        file: PathBuf,
    },
    /// Parse and dump AST as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Start an interactive session
    Repl,
}

/// Log to stderr, only when HLANG_LOG or RUST_LOG is set
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match std::env::var("HLANG_LOG") {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        Err(_) => return,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { file, entry, max_depth } => {
            let config = Config::new().entry(entry).max_recursion_depth(max_depth);
            run_file(&file, config)
        }
        Command::Check { file } => check_file(&file),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
        Command::Repl => run_repl(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Print a diagnostic for `error` and turn it into a one-line summary
fn diagnose(path: &Path, source: &str, error: Error) -> Box<dyn std::error::Error> {
    let filename = path.display().to_string();
    if report_error(&filename, source, &error).is_err() {
        return error.into();
    }
    "script failed".into()
}

fn run_file(path: &Path, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let interpreter = Interpreter::with_config(config);
    hlang::run_source_with(interpreter, &source).map_err(|e| diagnose(path, &source, e))?;
    Ok(())
}

fn check_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let program = hlang::parse_source(&source).map_err(|e| diagnose(path, &source, e.into()))?;
    hlang::interp::check_program(&program).map_err(|e| diagnose(path, &source, e.into()))?;

    println!("✓ {} is well-formed ({} functions)", path.display(), program.functions.len());
    Ok(())
}

fn parse_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let ast = hlang::parse_source(&source).map_err(|e| diagnose(path, &source, e.into()))?;

    println!("{}", serde_json::to_string_pretty(&ast)?);
    Ok(())
}

fn tokenize_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;

    let tokens = hlang::lexer::tokenize(&source).map_err(|e| diagnose(path, &source, e.into()))?;
    for (tok, span) in &tokens {
        println!("{tok:?} @ {span}");
    }

    Ok(())
}

fn run_repl() -> Result<(), Box<dyn std::error::Error>> {
    let mut repl = hlang::repl::Repl::new(Interpreter::new())?;
    repl.run()?;
    Ok(())
}
