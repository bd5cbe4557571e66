//! Lexer implementation using logos

mod token;

pub use token::{LexError, Token};

use crate::ast::{LineIndex, Span};
use crate::error::{CompileError, Result};
use logos::Logos;

/// Tokenize source code. Stops at the first lexical error.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let index = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = index.span(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(err) => {
                let slice = lexer.slice();
                let message = match err {
                    LexError::BadEscape(c) => format!("invalid escape sequence `\\{c}` in string literal"),
                    LexError::MalformedNumber => format!("malformed numeric literal `{slice}`"),
                    LexError::UnexpectedCharacter if slice.starts_with('"') => {
                        "unterminated string literal".to_string()
                    }
                    LexError::UnexpectedCharacter => format!("unexpected character: {slice:?}"),
                };
                return Err(CompileError::lexer(message, span));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_whitespace_only() {
        assert!(tokenize("   \t\t\n\n\r\n   ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_keywords() {
        assert_eq!(
            kinds("fun var if else for while return break continue true false void"),
            vec![
                Token::Fun,
                Token::Var,
                Token::If,
                Token::Else,
                Token::For,
                Token::While,
                Token::Return,
                Token::Break,
                Token::Continue,
                Token::True,
                Token::False,
                Token::Void,
            ]
        );
    }

    #[test]
    fn test_tokenize_punctuation() {
        assert_eq!(
            kinds("( ) { } . , ="),
            vec![
                Token::LParen,
                Token::RParen,
                Token::LBrace,
                Token::RBrace,
                Token::Dot,
                Token::Comma,
                Token::Eq,
            ]
        );
    }

    #[test]
    fn test_punctuation_never_merges_into_words() {
        assert_eq!(
            kinds("a.b(c,d)={}"),
            vec![
                word("a"),
                Token::Dot,
                word("b"),
                Token::LParen,
                word("c"),
                Token::Comma,
                word("d"),
                Token::RParen,
                Token::Eq,
                Token::LBrace,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_negative_integer_is_single_token() {
        assert_eq!(kinds("-10"), vec![Token::IntLit(-10)]);
    }

    #[test]
    fn test_positive_integer() {
        assert_eq!(kinds("1"), vec![Token::IntLit(1)]);
    }

    #[test]
    fn test_identifier_is_not_keyword() {
        assert_eq!(kinds("variable"), vec![word("variable")]);
        assert_eq!(kinds("funny iffy voids"), vec![word("funny"), word("iffy"), word("voids")]);
    }

    #[test]
    fn test_words_with_digits_or_symbols_stay_words() {
        assert_eq!(
            kinds("10abc -x + <="),
            vec![word("10abc"), word("-x"), word("+"), word("<"), Token::Eq]
        );
    }

    #[test]
    fn test_plus_prefixed_number_is_a_word() {
        assert_eq!(kinds("+5"), vec![word("+5")]);
    }

    #[test]
    fn test_double_literal() {
        assert_eq!(kinds("1.5 -0.25"), vec![Token::DoubleLit(1.5), Token::DoubleLit(-0.25)]);
    }

    #[test]
    fn test_method_call_on_integer_is_not_double() {
        assert_eq!(
            kinds("1.plus(2)"),
            vec![
                Token::IntLit(1),
                Token::Dot,
                word("plus"),
                Token::LParen,
                Token::IntLit(2),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_integer_overflow_is_malformed() {
        let err = tokenize("99999999999999999999").unwrap_err();
        assert!(err.message().contains("malformed numeric literal"));
    }

    #[test]
    fn test_string_escapes_decode_in_order() {
        let tokens = kinds(r#""\r\n\t\\\"""#);
        assert_eq!(tokens, vec![Token::StringLit("\r\n\t\\\"".to_string())]);
        if let Token::StringLit(s) = &tokens[0] {
            assert_eq!(s.chars().collect::<Vec<_>>(), ['\r', '\n', '\t', '\\', '"']);
        }
    }

    #[test]
    fn test_empty_string_literal() {
        assert_eq!(kinds(r#""""#), vec![Token::StringLit(String::new())]);
    }

    #[test]
    fn test_string_keeps_punctuation_and_spaces() {
        assert_eq!(kinds(r#""a (b), c // d""#), vec![Token::StringLit("a (b), c // d".to_string())]);
    }

    #[test]
    fn test_bad_escape_is_error() {
        let err = tokenize(r#"var s = "a\qb""#).unwrap_err();
        assert!(err.message().contains("\\q"));
        let span = err.span();
        assert_eq!((span.line, span.column), (1, 9));
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = tokenize("\"abc").unwrap_err();
        assert!(err.message().contains("unterminated"));
    }

    #[test]
    fn test_lone_slash_is_error() {
        let err = tokenize("a / b").unwrap_err();
        assert!(err.message().contains("unexpected character"));
    }

    #[test]
    fn test_tokenize_skips_comments() {
        assert_eq!(kinds("fun // this is a comment\nmain"), vec![Token::Fun, word("main")]);
    }

    #[test]
    fn test_comment_at_end_of_input() {
        assert_eq!(kinds("x // trailing"), vec![word("x")]);
    }

    #[test]
    fn test_positions_are_line_and_column() {
        let tokens = tokenize("fun main() {\n  return 1\n}").unwrap();
        let positions: Vec<_> = tokens.iter().map(|(_, s)| (s.line, s.column)).collect();
        assert_eq!(
            positions,
            vec![(1, 1), (1, 5), (1, 9), (1, 10), (1, 12), (2, 3), (2, 10), (3, 1)]
        );
    }

    #[test]
    fn test_byte_spans() {
        let tokens = tokenize("fun main").unwrap();
        assert_eq!((tokens[0].1.start, tokens[0].1.end), (0, 3));
        assert_eq!((tokens[1].1.start, tokens[1].1.end), (4, 8));
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let src = "fun f(a) { var x = a.plus(1.5) return x }";
        assert_eq!(tokenize(src).unwrap(), tokenize(src).unwrap());
    }
}
