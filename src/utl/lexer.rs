//! Directive lexer driver
//!
//! Tokenization itself is handled entirely by logos (see [`tokens`]); this
//! module runs the lexer over one directive's code region, rebases spans to
//! absolute buffer offsets, and stops at the first close marker. Lexical
//! errors stay in the stream as `Err` entries so the parser can turn them
//! into localized error nodes instead of aborting.

pub mod tokens;

pub use tokens::{LexError, Token};

use crate::utl::ast::Span;
use logos::Logos;

/// The lexed code region of a single directive.
#[derive(Debug, Clone, PartialEq)]
pub struct LexedCode {
    /// Tokens (or lexical errors) with absolute spans, close marker excluded.
    pub tokens: Vec<(Result<Token, LexError>, Span)>,
    /// The close marker (`trim`, span), or `None` when the directive is
    /// unterminated.
    pub close: Option<(bool, Span)>,
}

/// Lex directive code beginning at `start` (just past the open marker),
/// up to and including the first `%]` / `-%]`.
pub fn lex_directive_code(source: &str, start: usize) -> LexedCode {
    let mut lexer = Token::lexer(&source[start..]);
    let mut tokens = Vec::new();
    let mut close = None;
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let span = span.start + start..span.end + start;
        match result {
            Ok(Token::Close) => {
                close = Some((false, span));
                break;
            }
            Ok(Token::CloseTrim) => {
                close = Some((true, span));
                break;
            }
            other => tokens.push((other, span)),
        }
    }
    LexedCode { tokens, close }
}
