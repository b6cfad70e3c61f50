//! Parser for UTL directive code
//!
//! A hand-written recursive-descent parser over the token stream of one
//! directive body. Expressions use precedence climbing (see
//! [`expressions`]); statements, including the two-phase block-vs-split
//! resolution, live in [`statements`].
//!
//! The parser is error tolerant: a strict parse failure never propagates
//! out of [`Parser::parse_code_items`]. Instead the failed region becomes
//! an error node and parsing resumes at the next statement boundary —
//! just past the next `;`, or before the next statement keyword, or at the
//! end of the directive body.

pub mod expressions;
pub mod statements;

use std::collections::HashSet;

use crate::utl::ast::{CodeItem, Comment, ErrorKind, ErrorNode, Identifier, Span, Statement};
use crate::utl::lexer::{LexError, Token};

/// Nesting bound shared by expression and statement recursion. Past it a
/// parse aborts, which surfaces as an error node at top level or as a
/// split-form fallback inside block speculation.
pub(crate) const MAX_DEPTH: usize = 128;

/// A strict parse failure, converted into an error node by the lenient
/// code-item loop (or discarded by block-form speculation).
#[derive(Debug, Clone)]
pub(crate) struct ParseAbort {
    pub kind: ErrorKind,
    pub message: String,
}

pub(crate) type PResult<T> = Result<T, ParseAbort>;

/// Parser state over one directive's lexed code region.
pub struct Parser<'t> {
    tokens: &'t [(Result<Token, LexError>, Span)],
    pos: usize,
    depth: usize,
    failed_block_tails: HashSet<usize>,
    failed_if_tails: HashSet<usize>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [(Result<Token, LexError>, Span)]) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            failed_block_tails: HashSet::new(),
            failed_if_tails: HashSet::new(),
        }
    }

    /// Parse the whole code region leniently, emitting error nodes for
    /// regions that match no rule. Never fails, always consumes all tokens.
    pub fn parse_code_items(&mut self) -> Vec<CodeItem> {
        let mut items = Vec::new();
        while self.pos < self.tokens.len() {
            let start = self.pos;
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(abort) => {
                    let error = self.recover(start, abort);
                    items.push(CodeItem::Statement(Statement::Error(error)));
                }
            }
        }
        items
    }

    /// Skip to the next statement boundary and build the error node
    /// covering everything consumed since `start`.
    fn recover(&mut self, start: usize, abort: ParseAbort) -> ErrorNode {
        if self.pos <= start {
            self.pos = start + 1;
        }
        while self.pos < self.tokens.len() {
            if matches!(self.tokens[self.pos - 1].0, Ok(Token::Semicolon)) {
                break;
            }
            match &self.tokens[self.pos].0 {
                Ok(token) if token.starts_statement() => break,
                _ => self.pos += 1,
            }
        }
        let span = self.tokens[start].1.start..self.tokens[self.pos - 1].1.end;
        ErrorNode {
            span,
            kind: abort.kind,
            message: abort.message,
        }
    }

    /// Parse one code item: a statement, or a bare expression. Bare
    /// expressions are legal in a directive's code sequence; block bodies
    /// reject them in [`Parser::parse_statement`].
    fn parse_item(&mut self) -> PResult<CodeItem> {
        if self.depth >= MAX_DEPTH {
            return Err(self.abort_syntax("statement nesting too deep".to_string()));
        }
        self.depth += 1;
        let result = self.parse_item_inner();
        self.depth -= 1;
        result
    }

    fn parse_item_inner(&mut self) -> PResult<CodeItem> {
        let token = match self.tokens.get(self.pos) {
            Some((Ok(token), _)) => token.clone(),
            Some((Err(error), _)) => {
                return Err(ParseAbort {
                    kind: ErrorKind::Lex,
                    message: error.to_string(),
                })
            }
            None => return Err(self.abort_syntax("expected statement".to_string())),
        };
        match token {
            Token::Comment => {
                let span = self.advance_span();
                Ok(CodeItem::Statement(Statement::Comment(Comment { span })))
            }
            Token::Echo => self.parse_echo().map(CodeItem::Statement),
            Token::Return => self.parse_return().map(CodeItem::Statement),
            Token::Break => self.parse_break().map(CodeItem::Statement),
            Token::Continue => self.parse_continue().map(CodeItem::Statement),
            Token::Call => self.parse_call_statement().map(CodeItem::Statement),
            Token::Include => self.parse_include().map(CodeItem::Statement),
            Token::If => self.parse_if().map(CodeItem::Statement),
            Token::Foreach => self.parse_foreach().map(CodeItem::Statement),
            Token::While => self.parse_while().map(CodeItem::Statement),
            Token::For => self.parse_for().map(CodeItem::Statement),
            Token::Macro => self.parse_macro().map(CodeItem::Statement),
            Token::Else => self.parse_split_else().map(CodeItem::Statement),
            Token::End => self.parse_split_end().map(CodeItem::Statement),
            _ => self.parse_expression_leading(),
        }
    }

    /// Parse one statement in a block body. A bare expression is not a
    /// statement there; rejecting it fails the body parse and with it any
    /// enclosing block-form speculation.
    fn parse_statement(&mut self) -> PResult<Statement> {
        match self.parse_item()? {
            CodeItem::Statement(statement) => Ok(statement),
            CodeItem::Expression(_) => Err(self.abort_syntax(format!(
                "expected ';' after expression, found {}",
                self.describe_here()
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Token stream helpers
    // ------------------------------------------------------------------

    fn peek_token(&self) -> Option<&Token> {
        self.tokens
            .get(self.pos)
            .and_then(|(result, _)| result.as_ref().ok())
    }

    fn peek2_token(&self) -> Option<&Token> {
        self.tokens
            .get(self.pos + 1)
            .and_then(|(result, _)| result.as_ref().ok())
    }

    fn check(&self, token: &Token) -> bool {
        matches!(self.tokens.get(self.pos), Some((Ok(t), _)) if t == token)
    }

    fn eat(&mut self, token: &Token) -> Option<Span> {
        match self.tokens.get(self.pos) {
            Some((Ok(t), span)) if t == token => {
                let span = span.clone();
                self.pos += 1;
                Some(span)
            }
            _ => None,
        }
    }

    /// Consume the current token unconditionally, returning its span.
    fn advance_span(&mut self) -> Span {
        let span = self
            .tokens
            .get(self.pos)
            .map(|(_, span)| span.clone())
            .unwrap_or_default();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        span
    }

    /// End offset of the most recently consumed token.
    fn prev_span_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].1.end
        }
    }

    fn expect(&mut self, token: &Token, what: &str) -> PResult<Span> {
        if let Some(span) = self.eat(token) {
            return Ok(span);
        }
        if let Some((Err(error), _)) = self.tokens.get(self.pos) {
            return Err(ParseAbort {
                kind: ErrorKind::Lex,
                message: error.to_string(),
            });
        }
        Err(self.abort_syntax(format!(
            "expected {}, found {}",
            what,
            self.describe_here()
        )))
    }

    fn expect_semicolon(&mut self, after: &str) -> PResult<Span> {
        if let Some(span) = self.eat(&Token::Semicolon) {
            return Ok(span);
        }
        if let Some((Err(error), _)) = self.tokens.get(self.pos) {
            return Err(ParseAbort {
                kind: ErrorKind::Lex,
                message: error.to_string(),
            });
        }
        Err(self.abort_syntax(format!(
            "expected ';' after {}, found {}",
            after,
            self.describe_here()
        )))
    }

    fn parse_identifier(&mut self) -> PResult<Identifier> {
        match self.tokens.get(self.pos) {
            Some((Ok(Token::Identifier(name)), span)) => {
                let identifier = Identifier {
                    span: span.clone(),
                    name: name.clone(),
                };
                self.pos += 1;
                Ok(identifier)
            }
            Some((Err(error), _)) => Err(ParseAbort {
                kind: ErrorKind::Lex,
                message: error.to_string(),
            }),
            _ => Err(self.abort_syntax(format!(
                "expected identifier, found {}",
                self.describe_here()
            ))),
        }
    }

    fn describe_here(&self) -> String {
        match self.tokens.get(self.pos) {
            Some((Ok(token), _)) => token.describe(),
            Some((Err(error), _)) => error.to_string(),
            None => "end of directive".to_string(),
        }
    }

    fn abort_syntax(&self, message: String) -> ParseAbort {
        ParseAbort {
            kind: ErrorKind::Syntax,
            message,
        }
    }
}
