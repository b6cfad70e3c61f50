//! Token definitions for UTL directive code
//!
//! Tokens are defined with the logos derive macro. Strings, block comments,
//! and numbers use callbacks: strings decode their escape sequences (and
//! reject anything outside `\' \" \\ \n \r \t`), comments scan to `*/`, and
//! numbers reject exponent/hex suffixes the grammar does not support.
//!
//! The close markers `%]` / `-%]` are ordinary tokens here; longest-match
//! keeps them from colliding with `%` and `-`.

use logos::{Lexer, Logos};
use std::fmt;

/// Lexical error classification carried in the token stream.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    #[default]
    UnrecognizedCharacter,
    UnterminatedString,
    InvalidEscape,
    UnterminatedComment,
    MalformedNumber,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LexError::UnrecognizedCharacter => "unrecognized character",
            LexError::UnterminatedString => "unterminated string",
            LexError::InvalidEscape => "invalid escape sequence",
            LexError::UnterminatedComment => "unterminated comment",
            LexError::MalformedNumber => "malformed number",
        };
        write!(f, "{}", text)
    }
}

impl std::error::Error for LexError {}

/// All tokens of UTL directive code.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"\s+")]
#[logos(error = LexError)]
pub enum Token {
    // Keywords
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("foreach")]
    Foreach,
    #[token("as")]
    As,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("macro")]
    Macro,
    #[token("echo")]
    Echo,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("call")]
    Call,
    #[token("include")]
    Include,
    #[token("end")]
    End,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Identifier(String),

    // The trailing alphanumeric tail catches exponent/hex shapes like
    // `1e5` or `0x10`, which the callback rejects as MalformedNumber.
    #[regex(r"[0-9]+(\.[0-9]+)?[0-9A-Za-z_]*", validate_number)]
    Number(String),

    #[token("\"", |lex| scan_string(lex, '"'))]
    #[token("'", |lex| scan_string(lex, '\''))]
    Str(String),

    #[token("/*", scan_block_comment)]
    Comment,

    // Operators and punctuation
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("|")]
    Pipe,
    #[token("..")]
    DotDot,
    #[token(".")]
    Dot,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,

    // Directive close markers; the lexer driver stops on these.
    #[token("%]")]
    Close,
    #[token("-%]")]
    CloseTrim,
}

impl Token {
    /// Keywords that can begin a statement; used by error recovery to find
    /// the next statement boundary.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            Token::If
                | Token::Else
                | Token::Foreach
                | Token::While
                | Token::For
                | Token::Macro
                | Token::Echo
                | Token::Return
                | Token::Break
                | Token::Continue
                | Token::Call
                | Token::Include
                | Token::End
                | Token::Comment
        )
    }

    /// Human-readable token description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::Number(value) => format!("number '{}'", value),
            Token::Str(_) => "string literal".to_string(),
            Token::Comment => "comment".to_string(),
            Token::Close => "'%]'".to_string(),
            Token::CloseTrim => "'-%]'".to_string(),
            other => format!("'{}'", other.text()),
        }
    }

    fn text(&self) -> &'static str {
        match self {
            Token::If => "if",
            Token::Then => "then",
            Token::Else => "else",
            Token::Foreach => "foreach",
            Token::As => "as",
            Token::While => "while",
            Token::For => "for",
            Token::Macro => "macro",
            Token::Echo => "echo",
            Token::Return => "return",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Call => "call",
            Token::Include => "include",
            Token::End => "end",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::LtEq => "<=",
            Token::GtEq => ">=",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Bang => "!",
            Token::PlusEq => "+=",
            Token::MinusEq => "-=",
            Token::Eq => "=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Pipe => "|",
            Token::DotDot => "..",
            Token::Dot => ".",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Semicolon => ";",
            Token::Close => "%]",
            Token::CloseTrim => "-%]",
            Token::Identifier(_) | Token::Number(_) | Token::Str(_) | Token::Comment => "",
        }
    }
}

/// Reject numbers the grammar does not support: anything beyond
/// `[0-9]+` or `[0-9]+\.[0-9]+` (no exponents, no hex, no suffixes).
fn validate_number(lex: &mut Lexer<Token>) -> Result<String, LexError> {
    let slice = lex.slice();
    let (int_part, frac_part) = match slice.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (slice, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if all_digits(int_part) && frac_part.map_or(true, all_digits) {
        Ok(slice.to_owned())
    } else {
        Err(LexError::MalformedNumber)
    }
}

/// Scan a quoted string starting just after the opening quote, decoding
/// the supported escapes and rejecting everything else.
fn scan_string(lex: &mut Lexer<Token>, quote: char) -> Result<String, LexError> {
    let rest = lex.remainder();
    let mut value = String::new();
    let mut chars = rest.char_indices();
    while let Some((offset, ch)) = chars.next() {
        if ch == quote {
            lex.bump(offset + ch.len_utf8());
            return Ok(value);
        }
        if ch == '\\' {
            match chars.next() {
                Some((esc_offset, esc)) => {
                    let decoded = match esc {
                        '\'' => '\'',
                        '"' => '"',
                        '\\' => '\\',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        _ => {
                            lex.bump(esc_offset + esc.len_utf8());
                            return Err(LexError::InvalidEscape);
                        }
                    };
                    value.push(decoded);
                }
                None => {
                    lex.bump(rest.len());
                    return Err(LexError::UnterminatedString);
                }
            }
        } else {
            value.push(ch);
        }
    }
    lex.bump(rest.len());
    Err(LexError::UnterminatedString)
}

/// Scan a `/* ... */` block comment; the body is not tokenized.
fn scan_block_comment(lex: &mut Lexer<Token>) -> Result<(), LexError> {
    match lex.remainder().find("*/") {
        Some(offset) => {
            lex.bump(offset + 2);
            Ok(())
        }
        None => {
            let len = lex.remainder().len();
            lex.bump(len);
            Err(LexError::UnterminatedComment)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Result<Token, LexError>> {
        Token::lexer(source).collect()
    }

    #[test]
    fn test_keywords_vs_identifiers() {
        assert_eq!(
            tokens("if iffy end ends"),
            vec![
                Ok(Token::If),
                Ok(Token::Identifier("iffy".to_string())),
                Ok(Token::End),
                Ok(Token::Identifier("ends".to_string())),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("1 42 3.14"),
            vec![
                Ok(Token::Number("1".to_string())),
                Ok(Token::Number("42".to_string())),
                Ok(Token::Number("3.14".to_string())),
            ]
        );
    }

    #[test]
    fn test_range_does_not_eat_float_dot() {
        assert_eq!(
            tokens("1..5"),
            vec![
                Ok(Token::Number("1".to_string())),
                Ok(Token::DotDot),
                Ok(Token::Number("5".to_string())),
            ]
        );
    }

    #[test]
    fn test_exponent_and_hex_are_lex_errors() {
        assert_eq!(tokens("1e5"), vec![Err(LexError::MalformedNumber)]);
        assert_eq!(tokens("0x10"), vec![Err(LexError::MalformedNumber)]);
    }

    #[test]
    fn test_strings_decode_escapes() {
        assert_eq!(
            tokens(r#""a\tb" 'c\'d'"#),
            vec![
                Ok(Token::Str("a\tb".to_string())),
                Ok(Token::Str("c'd".to_string())),
            ]
        );
    }

    #[test]
    fn test_invalid_escape() {
        assert_eq!(tokens(r#""a\qb""#)[0], Err(LexError::InvalidEscape));
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(tokens("\"open"), vec![Err(LexError::UnterminatedString)]);
    }

    #[test]
    fn test_string_may_contain_close_marker() {
        assert_eq!(
            tokens("\"a %] b\""),
            vec![Ok(Token::Str("a %] b".to_string()))]
        );
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(
            tokens("/* anything [% %] */ x"),
            vec![Ok(Token::Comment), Ok(Token::Identifier("x".to_string()))]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        assert_eq!(tokens("/* open"), vec![Err(LexError::UnterminatedComment)]);
    }

    #[test]
    fn test_close_markers_longest_match() {
        assert_eq!(
            tokens("a -%]"),
            vec![
                Ok(Token::Identifier("a".to_string())),
                Ok(Token::CloseTrim),
            ]
        );
        assert_eq!(
            tokens("a - %]"),
            vec![
                Ok(Token::Identifier("a".to_string())),
                Ok(Token::Minus),
                Ok(Token::Close),
            ]
        );
        assert_eq!(
            tokens("a % ]"),
            vec![
                Ok(Token::Identifier("a".to_string())),
                Ok(Token::Percent),
                Ok(Token::RBracket),
            ]
        );
    }

    #[test]
    fn test_compound_assignment_operators() {
        assert_eq!(
            tokens("x += 1; y -= 2;"),
            vec![
                Ok(Token::Identifier("x".to_string())),
                Ok(Token::PlusEq),
                Ok(Token::Number("1".to_string())),
                Ok(Token::Semicolon),
                Ok(Token::Identifier("y".to_string())),
                Ok(Token::MinusEq),
                Ok(Token::Number("2".to_string())),
                Ok(Token::Semicolon),
            ]
        );
    }

    #[test]
    fn test_unrecognized_character() {
        assert_eq!(tokens("@"), vec![Err(LexError::UnrecognizedCharacter)]);
    }
}
