//! Token definitions

use logos::{Lexer, Logos};
use std::fmt;

/// Why a slice of input could not become a token
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexError {
    #[default]
    UnexpectedCharacter,
    /// `\x` inside a string literal where `x` is not one of `r n t \ "`
    BadEscape(char),
    /// All-digit word that does not fit a 64-bit integer
    MalformedNumber,
}

/// hlang token
///
/// A "word" is a maximal run of characters that are neither whitespace nor
/// punctuation. Keywords and integers are words that match the keyword table
/// or parse fully as a base-10 integer; everything else stays a `Word`.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // Keywords
    #[token("fun")]
    Fun,
    #[token("var")]
    Var,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("void")]
    Void,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,

    // Literals
    #[regex(r"-?[0-9]+", parse_int, priority = 3)]
    IntLit(i64),
    #[regex(r"-?[0-9]+\.[0-9]+", parse_double)]
    DoubleLit(f64),
    #[regex(r#""([^"\\]|\\.)*""#, unescape)]
    StringLit(String),

    #[regex(r#"[^ \t\r\n\f(){}.,="/]+"#, |lex| lex.slice().to_string())]
    Word(String),
}

fn parse_int(lex: &mut Lexer<Token>) -> Result<i64, LexError> {
    lex.slice().parse().map_err(|_| LexError::MalformedNumber)
}

fn parse_double(lex: &mut Lexer<Token>) -> Result<f64, LexError> {
    lex.slice().parse().map_err(|_| LexError::MalformedNumber)
}

/// Strip the quotes and decode `\r \n \t \\ \"`.
fn unescape(lex: &mut Lexer<Token>) -> Result<String, LexError> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => return Err(LexError::BadEscape(other)),
            // the regex only accepts a backslash followed by a character
            None => return Err(LexError::UnexpectedCharacter),
        }
    }
    Ok(out)
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Fun => write!(f, "`fun`"),
            Token::Var => write!(f, "`var`"),
            Token::If => write!(f, "`if`"),
            Token::Else => write!(f, "`else`"),
            Token::For => write!(f, "`for`"),
            Token::While => write!(f, "`while`"),
            Token::Return => write!(f, "`return`"),
            Token::Break => write!(f, "`break`"),
            Token::Continue => write!(f, "`continue`"),
            Token::True => write!(f, "`true`"),
            Token::False => write!(f, "`false`"),
            Token::Void => write!(f, "`void`"),
            Token::LParen => write!(f, "`(`"),
            Token::RParen => write!(f, "`)`"),
            Token::LBrace => write!(f, "`{{`"),
            Token::RBrace => write!(f, "`}}`"),
            Token::Dot => write!(f, "`.`"),
            Token::Comma => write!(f, "`,`"),
            Token::Eq => write!(f, "`=`"),
            Token::IntLit(n) => write!(f, "integer `{n}`"),
            Token::DoubleLit(x) => write!(f, "double `{x}`"),
            Token::StringLit(s) => write!(f, "string {s:?}"),
            Token::Word(w) => write!(f, "`{w}`"),
        }
    }
}
