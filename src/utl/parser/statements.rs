//! Statement grammar and the block-vs-split control-flow state machine
//!
//! Every block construct follows `header ';' body* 'end' ';'` (with an
//! optional else-chain on `if`). The same headers also exist as standalone
//! split statements with an optional trailing `;` and no body, so that a
//! construct can straddle directive boundaries.
//!
//! Resolution is two-phase: after `header ';'`, the full block form is
//! attempted speculatively; only when no matching `end ';'` parses within
//! the same directive body does the header fall back to its split form.
//! Speculation recurses, so nested headers claim terminators
//! innermost-first, which is also what binds a dangling `else` to the
//! innermost `if`. Failed speculations are memoized by token position, so
//! each header backtracks at most once regardless of nesting.

use super::{CodeItem, PResult, Parser, MAX_DEPTH};
use crate::utl::ast::{
    AssignOp, ElseClause, Expr, IfBody, Parameter, Span, Statement,
};
use crate::utl::lexer::Token;

impl Parser<'_> {
    pub(crate) fn parse_echo(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start;
        let value = self.parse_expression_root()?;
        let semi = self.expect_semicolon("'echo' value")?;
        Ok(Statement::Echo {
            span: start..semi.end,
            value,
        })
    }

    pub(crate) fn parse_return(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start;
        let value = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expression_root()?)
        };
        let semi = self.expect_semicolon("'return'")?;
        Ok(Statement::Return {
            span: start..semi.end,
            value,
        })
    }

    pub(crate) fn parse_break(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start;
        let semi = self.expect_semicolon("'break'")?;
        Ok(Statement::Break {
            span: start..semi.end,
        })
    }

    pub(crate) fn parse_continue(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start;
        let semi = self.expect_semicolon("'continue'")?;
        Ok(Statement::Continue {
            span: start..semi.end,
        })
    }

    pub(crate) fn parse_call_statement(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start;
        let value = self.parse_expression_root()?;
        let semi = self.expect_semicolon("'call' target")?;
        Ok(Statement::Call {
            span: start..semi.end,
            value,
        })
    }

    pub(crate) fn parse_include(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start;
        let value = self.parse_expression_root()?;
        let semi = self.expect_semicolon("'include' target")?;
        Ok(Statement::Include {
            span: start..semi.end,
            value,
        })
    }

    /// Expression-leading items: assignment, expression statement, or a
    /// bare expression when neither an assignment operator nor `;`
    /// follows.
    pub(crate) fn parse_expression_leading(&mut self) -> PResult<CodeItem> {
        let expr = self.parse_expression_root()?;
        let operator = match self.peek_token() {
            Some(Token::Eq) => Some(AssignOp::Assign),
            Some(Token::PlusEq) => Some(AssignOp::AddAssign),
            Some(Token::MinusEq) => Some(AssignOp::SubAssign),
            _ => None,
        };
        if let Some(operator) = operator {
            if !expr.is_lvalue() {
                return Err(self.abort_syntax(
                    "invalid assignment target: expected identifier, member access, or subscript"
                        .to_string(),
                ));
            }
            self.advance_span();
            let value = self.parse_expression_root()?;
            let semi = self.expect_semicolon("assignment")?;
            return Ok(CodeItem::Statement(Statement::Assignment {
                span: expr.span().start..semi.end,
                target: expr,
                operator,
                value,
            }));
        }
        if let Some(semi) = self.eat(&Token::Semicolon) {
            return Ok(CodeItem::Statement(Statement::ExpressionStatement {
                span: expr.span().start..semi.end,
                expression: expr,
            }));
        }
        Ok(CodeItem::Expression(expr))
    }

    // ------------------------------------------------------------------
    // Control flow
    // ------------------------------------------------------------------

    pub(crate) fn parse_if(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start;
        let condition = self.parse_expression_root()?;
        if self.eat(&Token::Then).is_some() {
            let statement = self.parse_statement()?;
            let span = start..statement.span().end;
            return Ok(Statement::If {
                span,
                condition,
                body: IfBody::Then {
                    statement: Box::new(statement),
                },
            });
        }
        if self.check(&Token::Semicolon) {
            let save = self.pos;
            if !self.failed_if_tails.contains(&save) {
                if let Ok(statement) = self.parse_if_block_tail(start, &condition) {
                    return Ok(statement);
                }
                self.failed_if_tails.insert(save);
                self.pos = save;
            }
        }
        let end = match self.eat(&Token::Semicolon) {
            Some(semi) => semi.end,
            None => condition.span().end,
        };
        Ok(Statement::SplitIfStart {
            span: start..end,
            condition,
        })
    }

    fn parse_if_block_tail(&mut self, start: usize, condition: &Expr) -> PResult<Statement> {
        self.advance_span(); // ';'
        let statements = self.parse_block_body(true)?;
        let else_clause = match self.peek_token() {
            Some(Token::Else) => Some(Box::new(self.parse_else_clause()?)),
            _ => None,
        };
        self.expect(&Token::End, "'end'")?;
        let semi = self.expect_semicolon("'end'")?;
        Ok(Statement::If {
            span: start..semi.end,
            condition: condition.clone(),
            body: IfBody::Block {
                statements,
                else_clause,
            },
        })
    }

    fn parse_else_clause(&mut self) -> PResult<ElseClause> {
        // The chain recurses per `else if` link without going through
        // parse_item, so it carries its own depth accounting.
        if self.depth >= MAX_DEPTH {
            return Err(self.abort_syntax("else chain nesting too deep".to_string()));
        }
        self.depth += 1;
        let result = self.parse_else_clause_inner();
        self.depth -= 1;
        result
    }

    fn parse_else_clause_inner(&mut self) -> PResult<ElseClause> {
        let start = self.advance_span().start; // 'else'
        let condition = if self.eat(&Token::If).is_some() {
            Some(self.parse_expression_root()?)
        } else {
            None
        };
        self.expect_semicolon("'else'")?;
        let body = self.parse_block_body(true)?;
        let else_clause = match self.peek_token() {
            Some(Token::Else) => Some(Box::new(self.parse_else_clause()?)),
            _ => None,
        };
        let end = else_clause
            .as_ref()
            .map(|clause| clause.span.end)
            .or_else(|| body.last().map(|statement| statement.span().end))
            .unwrap_or_else(|| self.prev_span_end());
        Ok(ElseClause {
            span: start..end,
            condition,
            body,
            else_clause,
        })
    }

    pub(crate) fn parse_foreach(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start;
        let iterable = self.parse_expression_root()?;
        self.expect(&Token::As, "'as'")?;
        let binding = self.parse_identifier()?;
        let value_binding = if self.eat(&Token::Comma).is_some() {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        if let Some((body, semi)) = self.try_block_tail() {
            return Ok(Statement::Foreach {
                span: start..semi.end,
                iterable,
                binding,
                value_binding,
                body,
            });
        }
        let end = self.split_header_end();
        Ok(Statement::SplitForeachStart {
            span: start..end,
            iterable,
            binding,
            value_binding,
        })
    }

    pub(crate) fn parse_while(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start;
        let condition = self.parse_expression_root()?;
        if let Some((body, semi)) = self.try_block_tail() {
            return Ok(Statement::While {
                span: start..semi.end,
                condition,
                body,
            });
        }
        let end = self.split_header_end();
        Ok(Statement::SplitWhileStart {
            span: start..end,
            condition,
        })
    }

    pub(crate) fn parse_for(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start;
        let from = self.parse_expression_root()?;
        self.expect(&Token::DotDot, "'..'")?;
        let to = self.parse_expression_root()?;
        self.expect(&Token::As, "'as'")?;
        let binding = self.parse_identifier()?;
        if let Some((body, semi)) = self.try_block_tail() {
            return Ok(Statement::For {
                span: start..semi.end,
                from,
                to,
                binding,
                body,
            });
        }
        let end = self.split_header_end();
        Ok(Statement::SplitForStart {
            span: start..end,
            from,
            to,
            binding,
        })
    }

    pub(crate) fn parse_macro(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start;
        let name = self.parse_identifier()?;
        self.expect(&Token::LParen, "'('")?;
        let parameters = if self.check(&Token::RParen) {
            Vec::new()
        } else {
            self.parse_parameter_list()?
        };
        self.expect(&Token::RParen, "')'")?;
        if let Some((body, semi)) = self.try_block_tail() {
            return Ok(Statement::MacroDefinition {
                span: start..semi.end,
                name,
                parameters,
                body,
            });
        }
        let end = self.split_header_end();
        Ok(Statement::SplitMacroStart {
            span: start..end,
            name,
            parameters,
        })
    }

    fn parse_parameter_list(&mut self) -> PResult<Vec<Parameter>> {
        let mut parameters = Vec::new();
        loop {
            let name = self.parse_identifier()?;
            let default = if self.eat(&Token::Eq).is_some() {
                Some(self.parse_expression_root()?)
            } else {
                None
            };
            let end = default
                .as_ref()
                .map(|expr| expr.span().end)
                .unwrap_or(name.span.end);
            parameters.push(Parameter {
                span: name.span.start..end,
                name,
                default,
            });
            if self.eat(&Token::Comma).is_none() {
                break;
            }
            if self.check(&Token::RParen) {
                break;
            }
        }
        Ok(parameters)
    }

    pub(crate) fn parse_split_else(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start; // 'else'
        // Greedy: `else if` is a split-else-if, never a split-else
        // followed by a separate if statement.
        if self.eat(&Token::If).is_some() {
            let condition = self.parse_expression_root()?;
            let end = match self.eat(&Token::Semicolon) {
                Some(semi) => semi.end,
                None => condition.span().end,
            };
            return Ok(Statement::SplitElseIf {
                span: start..end,
                condition,
            });
        }
        let end = self.split_header_end();
        Ok(Statement::SplitElse { span: start..end })
    }

    pub(crate) fn parse_split_end(&mut self) -> PResult<Statement> {
        let start = self.advance_span().start; // 'end'
        let end = self.split_header_end();
        Ok(Statement::SplitEnd { span: start..end })
    }

    // ------------------------------------------------------------------
    // Shared block machinery
    // ------------------------------------------------------------------

    /// Body statements of a block form, up to the terminating `end` (or
    /// `else` when the construct carries an else-chain).
    fn parse_block_body(&mut self, stop_at_else: bool) -> PResult<Vec<Statement>> {
        let mut body = Vec::new();
        loop {
            match self.peek_token() {
                Some(Token::End) => break,
                Some(Token::Else) if stop_at_else => break,
                None if self.pos >= self.tokens.len() => break,
                _ => body.push(self.parse_statement()?),
            }
        }
        Ok(body)
    }

    /// Speculatively parse `';' body* 'end' ';'`; on failure the position
    /// is restored and the caller emits the split form instead. A failure
    /// is memoized by token position so re-parsing the same header, for
    /// example after an enclosing speculation unwound, does not repeat it.
    fn try_block_tail(&mut self) -> Option<(Vec<Statement>, Span)> {
        if !self.check(&Token::Semicolon) {
            return None;
        }
        let save = self.pos;
        if self.failed_block_tails.contains(&save) {
            return None;
        }
        match self.parse_block_tail() {
            Ok(tail) => Some(tail),
            Err(_) => {
                self.failed_block_tails.insert(save);
                self.pos = save;
                None
            }
        }
    }

    fn parse_block_tail(&mut self) -> PResult<(Vec<Statement>, Span)> {
        self.advance_span(); // ';'
        let body = self.parse_block_body(false)?;
        self.expect(&Token::End, "'end'")?;
        let semi = self.expect_semicolon("'end'")?;
        Ok((body, semi))
    }

    /// Consume the optional trailing `;` of a split header and return the
    /// header's end offset.
    fn split_header_end(&mut self) -> usize {
        match self.eat(&Token::Semicolon) {
            Some(semi) => semi.end,
            None => self.prev_span_end(),
        }
    }
}
