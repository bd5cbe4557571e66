//! Error types and reporting

use crate::ast::Span;
use crate::interp::RuntimeError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CompileError>;

/// Error raised before any script code runs
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Lexer error at {span}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span}: {message}")]
    Parser { message: String, span: Span },

    /// `break`/`continue` outside of any loop
    #[error("Control flow error at {span}: {message}")]
    ControlFlow { message: String, span: Span },
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn control_flow(message: impl Into<String>, span: Span) -> Self {
        Self::ControlFlow {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Lexer { span, .. } | Self::Parser { span, .. } | Self::ControlFlow { span, .. } => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexer { message, .. } => message,
            Self::Parser { message, .. } => message,
            Self::ControlFlow { message, .. } => message,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Lexer { .. } => "Lexer",
            Self::Parser { .. } => "Parser",
            Self::ControlFlow { .. } => "Control flow",
        }
    }
}

/// Any failure of a whole tokenize-parse-run pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Compile(e) => Some(e.span()),
            Error::Runtime(e) => e.span,
        }
    }
}

/// Report an error against its source with ariadne, on stderr
pub fn report_error(filename: &str, source: &str, error: &Error) -> std::io::Result<()> {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let (kind, message) = match error {
        Error::Compile(e) => (e.kind(), e.message()),
        Error::Runtime(e) => ("Runtime", e.message.as_str()),
    };

    match error.span() {
        Some(span) if span.end > span.start => Report::build(ReportKind::Error, (filename, span.start..span.end))
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename, Source::from(source))),
        _ => Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind} error: {message}"))
            .finish()
            .eprint((filename, Source::from(source))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_error_display() {
        let err = CompileError::lexer("bad escape `\\q`", Span::new(4, 6, 1, 5));
        assert_eq!(err.to_string(), "Lexer error at 1:5: bad escape `\\q`");
        assert_eq!(err.span(), Span::new(4, 6, 1, 5));
    }

    #[test]
    fn test_parser_error_message() {
        let err = CompileError::parser("expected `(`", Span::new(0, 1, 2, 1));
        assert_eq!(err.message(), "expected `(`");
        assert!(err.to_string().starts_with("Parser error at 2:1"));
    }

    #[test]
    fn test_error_from_compile_is_transparent() {
        let err: Error = CompileError::control_flow("`break` outside of a loop", Span::new(0, 5, 1, 1)).into();
        assert_eq!(
            err.to_string(),
            "Control flow error at 1:1: `break` outside of a loop"
        );
    }
}
