//! Expression grammar: precedence climbing
//!
//! Binding powers, lowest to highest: `||` (1) < `&&` (2) < comparison (3)
//! < filter `|` (4) < additive (5) < multiplicative (6) < unary (7) <
//! postfix member/subscript/call (8). All binary operators left-associative,
//! so `a + b | f == c` parses as `((a + b) | f) == c`.

use super::{PResult, Parser, MAX_DEPTH};
use crate::utl::ast::{
    Argument, BinaryOp, ErrorKind, Expr, HashKey, HashPair, Identifier, Span, StringLit, UnaryOp,
};
use crate::utl::lexer::Token;
use crate::utl::parser::ParseAbort;

const FILTER_BP: u8 = 4;
const UNARY_BP: u8 = 7;
const POSTFIX_BP: u8 = 8;

enum InfixOp {
    Binary(u8, BinaryOp),
    Filter,
    Member,
    Subscript,
    Call,
}

fn infix_op(token: &Token) -> Option<InfixOp> {
    let op = match token {
        Token::OrOr => InfixOp::Binary(1, BinaryOp::Or),
        Token::AndAnd => InfixOp::Binary(2, BinaryOp::And),
        Token::EqEq => InfixOp::Binary(3, BinaryOp::Eq),
        Token::NotEq => InfixOp::Binary(3, BinaryOp::Ne),
        Token::Lt => InfixOp::Binary(3, BinaryOp::Lt),
        Token::Gt => InfixOp::Binary(3, BinaryOp::Gt),
        Token::LtEq => InfixOp::Binary(3, BinaryOp::Le),
        Token::GtEq => InfixOp::Binary(3, BinaryOp::Ge),
        Token::Pipe => InfixOp::Filter,
        Token::Plus => InfixOp::Binary(5, BinaryOp::Add),
        Token::Minus => InfixOp::Binary(5, BinaryOp::Sub),
        Token::Star => InfixOp::Binary(6, BinaryOp::Mul),
        Token::Slash => InfixOp::Binary(6, BinaryOp::Div),
        Token::Percent => InfixOp::Binary(6, BinaryOp::Mod),
        Token::Dot => InfixOp::Member,
        Token::LBracket => InfixOp::Subscript,
        Token::LParen => InfixOp::Call,
        _ => return None,
    };
    Some(op)
}

impl Parser<'_> {
    pub(crate) fn parse_expression_root(&mut self) -> PResult<Expr> {
        self.parse_expression(0)
    }

    fn parse_expression(&mut self, min_bp: u8) -> PResult<Expr> {
        if self.depth >= MAX_DEPTH {
            return Err(self.abort_syntax("expression nesting too deep".to_string()));
        }
        self.depth += 1;
        let result = self.parse_expression_inner(min_bp);
        self.depth -= 1;
        result
    }

    fn parse_expression_inner(&mut self, min_bp: u8) -> PResult<Expr> {
        let mut lhs = self.parse_prefix()?;
        loop {
            let op = match self.peek_token().and_then(infix_op) {
                Some(op) => op,
                None => break,
            };
            match op {
                InfixOp::Binary(bp, operator) => {
                    if bp <= min_bp {
                        break;
                    }
                    self.advance_span();
                    let rhs = self.parse_expression(bp)?;
                    let span = lhs.span().start..rhs.span().end;
                    lhs = Expr::Binary {
                        span,
                        left: Box::new(lhs),
                        operator,
                        right: Box::new(rhs),
                    };
                }
                InfixOp::Filter => {
                    if FILTER_BP <= min_bp {
                        break;
                    }
                    self.advance_span();
                    let filter = self.parse_filter_target()?;
                    let span = lhs.span().start..filter.span().end;
                    lhs = Expr::Filter {
                        span,
                        value: Box::new(lhs),
                        filter: Box::new(filter),
                    };
                }
                InfixOp::Member => {
                    if POSTFIX_BP <= min_bp {
                        break;
                    }
                    self.advance_span();
                    let property = self.parse_identifier()?;
                    let span = lhs.span().start..property.span.end;
                    lhs = Expr::Member {
                        span,
                        object: Box::new(lhs),
                        property,
                    };
                }
                InfixOp::Subscript => {
                    if POSTFIX_BP <= min_bp {
                        break;
                    }
                    self.advance_span();
                    let index = self.parse_expression_root()?;
                    let close = self.expect(&Token::RBracket, "']'")?;
                    let span = lhs.span().start..close.end;
                    lhs = Expr::Subscript {
                        span,
                        object: Box::new(lhs),
                        index: Box::new(index),
                    };
                }
                InfixOp::Call => {
                    if POSTFIX_BP <= min_bp {
                        break;
                    }
                    // Callees are restricted to identifiers and member
                    // access; a '(' after anything else is not a call.
                    if !matches!(lhs, Expr::Identifier(_) | Expr::Member { .. }) {
                        break;
                    }
                    lhs = self.parse_call(lhs)?;
                }
            }
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> PResult<Expr> {
        let (result, span) = match self.tokens.get(self.pos) {
            Some(entry) => entry.clone(),
            None => {
                return Err(self.abort_syntax(format!(
                    "expected expression, found {}",
                    self.describe_here()
                )))
            }
        };
        let token = match result {
            Ok(token) => token,
            Err(error) => {
                return Err(ParseAbort {
                    kind: ErrorKind::Lex,
                    message: error.to_string(),
                })
            }
        };
        match token {
            Token::Identifier(name) => {
                self.advance_span();
                Ok(Expr::Identifier(Identifier { span, name }))
            }
            Token::Number(value) => {
                self.advance_span();
                Ok(Expr::Number { span, value })
            }
            Token::Str(value) => {
                self.advance_span();
                Ok(Expr::String { span, value })
            }
            Token::True => {
                self.advance_span();
                Ok(Expr::Boolean { span, value: true })
            }
            Token::False => {
                self.advance_span();
                Ok(Expr::Boolean { span, value: false })
            }
            Token::Null => {
                self.advance_span();
                Ok(Expr::Null { span })
            }
            Token::Bang => self.parse_unary(UnaryOp::Not, span),
            Token::Minus => self.parse_unary(UnaryOp::Neg, span),
            Token::LParen => {
                self.advance_span();
                let expression = self.parse_expression_root()?;
                let close = self.expect(&Token::RParen, "')'")?;
                Ok(Expr::Parenthesized {
                    span: span.start..close.end,
                    expression: Box::new(expression),
                })
            }
            Token::LBracket => self.parse_bracket_literal(span),
            other => Err(self.abort_syntax(format!(
                "expected expression, found {}",
                other.describe()
            ))),
        }
    }

    fn parse_unary(&mut self, operator: UnaryOp, op_span: Span) -> PResult<Expr> {
        self.advance_span();
        let operand = self.parse_expression(UNARY_BP)?;
        let span = op_span.start..operand.span().end;
        Ok(Expr::Unary {
            span,
            operator,
            operand: Box::new(operand),
        })
    }

    /// The right-hand side of `|`: a bare filter name or a filter call.
    fn parse_filter_target(&mut self) -> PResult<Expr> {
        let identifier = self.parse_identifier()?;
        let mut target = Expr::Identifier(identifier);
        loop {
            match self.peek_token() {
                Some(Token::Dot) => {
                    self.advance_span();
                    let property = self.parse_identifier()?;
                    let span = target.span().start..property.span.end;
                    target = Expr::Member {
                        span,
                        object: Box::new(target),
                        property,
                    };
                }
                Some(Token::LParen) => return self.parse_call(target),
                _ => break,
            }
        }
        if matches!(target, Expr::Member { .. }) {
            return Err(self.abort_syntax(
                "a filter must be a name or a call, not a member access".to_string(),
            ));
        }
        Ok(target)
    }

    /// Parse `( arguments? )` with `function` already consumed; the current
    /// token is the opening parenthesis.
    pub(crate) fn parse_call(&mut self, function: Expr) -> PResult<Expr> {
        self.advance_span();
        let mut arguments = Vec::new();
        if let Some(close) = self.eat(&Token::RParen) {
            return Ok(Expr::Call {
                span: function.span().start..close.end,
                function: Box::new(function),
                arguments,
            });
        }
        loop {
            arguments.push(self.parse_argument()?);
            if self.eat(&Token::Comma).is_none() {
                break;
            }
            if self.check(&Token::RParen) {
                break;
            }
        }
        let close = self.expect(&Token::RParen, "')'")?;
        Ok(Expr::Call {
            span: function.span().start..close.end,
            function: Box::new(function),
            arguments,
        })
    }

    /// One call argument: `"name": value` or a plain expression. Named and
    /// positional arguments may interleave in any order.
    fn parse_argument(&mut self) -> PResult<Argument> {
        let named = matches!(
            (self.peek_token(), self.peek2_token()),
            (Some(Token::Str(_)), Some(Token::Colon))
        );
        if named {
            let (result, span) = self.tokens[self.pos].clone();
            self.advance_span();
            let value_text = match result {
                Ok(Token::Str(text)) => text,
                // unreachable by the `named` check above
                _ => String::new(),
            };
            let name = StringLit {
                span,
                value: value_text,
            };
            self.advance_span(); // ':'
            let value = self.parse_expression_root()?;
            Ok(Argument {
                span: name.span.start..value.span().end,
                name: Some(name),
                value,
            })
        } else {
            let value = self.parse_expression_root()?;
            Ok(Argument {
                span: value.span().clone(),
                name: None,
                value,
            })
        }
    }

    /// `[...]` is an array literal unless the first element is a
    /// `string-or-identifier :` pair, which makes it a hash literal.
    /// Empty `[]` is an array.
    fn parse_bracket_literal(&mut self, open: Span) -> PResult<Expr> {
        self.advance_span();
        if let Some(close) = self.eat(&Token::RBracket) {
            return Ok(Expr::ArrayLiteral {
                span: open.start..close.end,
                elements: Vec::new(),
            });
        }
        let is_hash = matches!(
            (self.peek_token(), self.peek2_token()),
            (Some(Token::Str(_)), Some(Token::Colon))
                | (Some(Token::Identifier(_)), Some(Token::Colon))
        );
        if is_hash {
            let mut pairs = Vec::new();
            loop {
                pairs.push(self.parse_hash_pair()?);
                if self.eat(&Token::Comma).is_none() {
                    break;
                }
                if self.check(&Token::RBracket) {
                    break;
                }
            }
            let close = self.expect(&Token::RBracket, "']'")?;
            Ok(Expr::HashLiteral {
                span: open.start..close.end,
                pairs,
            })
        } else {
            let mut elements = Vec::new();
            loop {
                elements.push(self.parse_expression_root()?);
                if self.eat(&Token::Comma).is_none() {
                    break;
                }
                if self.check(&Token::RBracket) {
                    break;
                }
            }
            let close = self.expect(&Token::RBracket, "']'")?;
            Ok(Expr::ArrayLiteral {
                span: open.start..close.end,
                elements,
            })
        }
    }

    fn parse_hash_pair(&mut self) -> PResult<HashPair> {
        let key = match self.tokens.get(self.pos) {
            Some((Ok(Token::Str(value)), span)) => {
                let key = HashKey::String(StringLit {
                    span: span.clone(),
                    value: value.clone(),
                });
                self.pos += 1;
                key
            }
            Some((Ok(Token::Identifier(name)), span)) => {
                let key = HashKey::Identifier(Identifier {
                    span: span.clone(),
                    name: name.clone(),
                });
                self.pos += 1;
                key
            }
            _ => {
                return Err(self.abort_syntax(format!(
                    "expected hash key, found {}",
                    self.describe_here()
                )))
            }
        };
        self.expect(&Token::Colon, "':'")?;
        let value = self.parse_expression_root()?;
        let key_start = match &key {
            HashKey::String(s) => s.span.start,
            HashKey::Identifier(i) => i.span.start,
        };
        Ok(HashPair {
            span: key_start..value.span().end,
            key,
            value,
        })
    }
}
