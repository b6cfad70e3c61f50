//! Syntax tree node definitions for the UTL template language
//!
//! Every node carries the byte span of the source text it covers. Top-level
//! spans tile the buffer exactly: concatenating the text of all top-level
//! nodes in document order reproduces the original source byte-for-byte.
//!
//! Nodes are immutable once produced. A re-parse builds a fresh tree; the
//! previous tree is never touched, so callers may keep superseded trees
//! around for diffing without synchronization.

use serde::Serialize;
use std::fmt;

/// Byte range into the source buffer.
pub type Span = std::ops::Range<usize>;

/// Root node: the ordered sequence of top-level nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFile {
    pub span: Span,
    pub nodes: Vec<TopLevel>,
}

/// A top-level node: literal content, a directive, or a comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopLevel {
    Content(ContentSpan),
    Directive(Directive),
    Comment(Comment),
}

impl TopLevel {
    pub fn span(&self) -> &Span {
        match self {
            TopLevel::Content(c) => &c.span,
            TopLevel::Directive(d) => &d.span,
            TopLevel::Comment(c) => &c.span,
        }
    }
}

/// Literal template text outside any directive, emitted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentSpan {
    pub span: Span,
}

/// A `/* ... */` comment, either at top level or in statement position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub span: Span,
}

/// A `[% ... %]` directive block.
///
/// The `-` marker variants (`[%-`, `-%]`) record whitespace-trimming intent
/// for a downstream renderer; they do not alter parsing. `close` is `None`
/// when the directive is unterminated, in which case a delimiter error node
/// sits in the code and the span extends to the end of the buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Directive {
    pub span: Span,
    pub trim_open: bool,
    pub code: Option<Code>,
    pub close: Option<CloseMarker>,
}

/// The closing `%]` / `-%]` of a directive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseMarker {
    pub span: Span,
    pub trim: bool,
}

/// The code body of a directive: statements and bare expressions in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Code {
    pub span: Span,
    pub items: Vec<CodeItem>,
}

/// One item of a code body. Bare expressions are legal anywhere in the
/// sequence, not just in trailing position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CodeItem {
    Statement(Statement),
    Expression(Expr),
}

impl CodeItem {
    pub fn span(&self) -> &Span {
        match self {
            CodeItem::Statement(s) => s.span(),
            CodeItem::Expression(e) => e.span(),
        }
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    AddAssign,
    #[serde(rename = "-=")]
    SubAssign,
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
        };
        write!(f, "{}", text)
    }
}

/// Binary operators, lowest to highest binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        };
        write!(f, "{}", text)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "-")]
    Neg,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if *self == UnaryOp::Not { "!" } else { "-" })
    }
}

/// An identifier with its span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub span: Span,
    pub name: String,
}

/// A string literal with its cooked (escape-processed) value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLit {
    pub span: Span,
    pub value: String,
}

/// One macro parameter: a name with an optional default expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub span: Span,
    pub name: Identifier,
    pub default: Option<Expr>,
}

/// One call argument, positional or named (`"key": value`).
///
/// Named and positional arguments may interleave freely; the grammar does
/// not enforce named-after-positional ordering and this parser preserves
/// the written order verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    pub span: Span,
    pub name: Option<StringLit>,
    pub value: Expr,
}

impl Argument {
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

/// A `key: value` pair in a hash literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashPair {
    pub span: Span,
    pub key: HashKey,
    pub value: Expr,
}

/// Hash keys are restricted to string literals and identifiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HashKey {
    String(StringLit),
    Identifier(Identifier),
}

/// An else-chain link: `else ; body` or `else if cond ; body`, optionally
/// chained right-recursively until the enclosing `if`'s `end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElseClause {
    pub span: Span,
    pub condition: Option<Expr>,
    pub body: Vec<Statement>,
    pub else_clause: Option<Box<ElseClause>>,
}

/// The two terminal shapes of an `if` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum IfBody {
    /// Block form: `if cond ; body* else-chain? end ;`
    Block {
        statements: Vec<Statement>,
        else_clause: Option<Box<ElseClause>>,
    },
    /// Inline form: `if cond then stmt` — no `end`, no else-chain.
    Then { statement: Box<Statement> },
}

/// The error taxonomy exposed through error nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Lex,
    Syntax,
    Delimiter,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::Lex => "lex error",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Delimiter => "delimiter error",
        };
        write!(f, "{}", text)
    }
}

/// An error region, emitted in statement position at the smallest enclosing
/// scope. A well-formed input yields a tree with zero error nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorNode {
    pub span: Span,
    pub kind: ErrorKind,
    pub message: String,
}

/// Statements of the directive code grammar.
///
/// The `Split*` variants are the standalone forms whose body lives in the
/// surrounding top-level sequence; they own only their header and are
/// syntactically self-terminating. Which content belongs to which split
/// block is a downstream reassembly decision, not a tree-shape decision
/// made here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Comment(Comment),
    #[serde(rename = "assignment_statement")]
    Assignment {
        span: Span,
        target: Expr,
        operator: AssignOp,
        value: Expr,
    },
    #[serde(rename = "echo_statement")]
    Echo { span: Span, value: Expr },
    #[serde(rename = "return_statement")]
    Return { span: Span, value: Option<Expr> },
    #[serde(rename = "break_statement")]
    Break { span: Span },
    #[serde(rename = "continue_statement")]
    Continue { span: Span },
    #[serde(rename = "call_statement")]
    Call { span: Span, value: Expr },
    #[serde(rename = "include_statement")]
    Include { span: Span, value: Expr },
    #[serde(rename = "if_statement")]
    If {
        span: Span,
        condition: Expr,
        body: IfBody,
    },
    #[serde(rename = "foreach_statement")]
    Foreach {
        span: Span,
        iterable: Expr,
        binding: Identifier,
        value_binding: Option<Identifier>,
        body: Vec<Statement>,
    },
    #[serde(rename = "while_statement")]
    While {
        span: Span,
        condition: Expr,
        body: Vec<Statement>,
    },
    #[serde(rename = "for_statement")]
    For {
        span: Span,
        from: Expr,
        to: Expr,
        binding: Identifier,
        body: Vec<Statement>,
    },
    MacroDefinition {
        span: Span,
        name: Identifier,
        parameters: Vec<Parameter>,
        body: Vec<Statement>,
    },
    SplitIfStart { span: Span, condition: Expr },
    SplitElse { span: Span },
    SplitElseIf { span: Span, condition: Expr },
    SplitForeachStart {
        span: Span,
        iterable: Expr,
        binding: Identifier,
        value_binding: Option<Identifier>,
    },
    SplitWhileStart { span: Span, condition: Expr },
    SplitForStart {
        span: Span,
        from: Expr,
        to: Expr,
        binding: Identifier,
    },
    SplitMacroStart {
        span: Span,
        name: Identifier,
        parameters: Vec<Parameter>,
    },
    SplitEnd { span: Span },
    ExpressionStatement { span: Span, expression: Expr },
    Error(ErrorNode),
}

impl Statement {
    pub fn span(&self) -> &Span {
        match self {
            Statement::Comment(c) => &c.span,
            Statement::Assignment { span, .. }
            | Statement::Echo { span, .. }
            | Statement::Return { span, .. }
            | Statement::Break { span }
            | Statement::Continue { span }
            | Statement::Call { span, .. }
            | Statement::Include { span, .. }
            | Statement::If { span, .. }
            | Statement::Foreach { span, .. }
            | Statement::While { span, .. }
            | Statement::For { span, .. }
            | Statement::MacroDefinition { span, .. }
            | Statement::SplitIfStart { span, .. }
            | Statement::SplitElse { span }
            | Statement::SplitElseIf { span, .. }
            | Statement::SplitForeachStart { span, .. }
            | Statement::SplitWhileStart { span, .. }
            | Statement::SplitForStart { span, .. }
            | Statement::SplitMacroStart { span, .. }
            | Statement::SplitEnd { span }
            | Statement::ExpressionStatement { span, .. } => span,
            Statement::Error(e) => &e.span,
        }
    }

    /// Collect error nodes in this statement and any nested block bodies.
    pub fn collect_errors<'a>(&'a self, out: &mut Vec<&'a ErrorNode>) {
        match self {
            Statement::Error(e) => out.push(e),
            Statement::If { body, .. } => match body {
                IfBody::Block {
                    statements,
                    else_clause,
                } => {
                    for stmt in statements {
                        stmt.collect_errors(out);
                    }
                    let mut clause = else_clause.as_deref();
                    while let Some(c) = clause {
                        for stmt in &c.body {
                            stmt.collect_errors(out);
                        }
                        clause = c.else_clause.as_deref();
                    }
                }
                IfBody::Then { statement } => statement.collect_errors(out),
            },
            Statement::Foreach { body, .. }
            | Statement::While { body, .. }
            | Statement::For { body, .. }
            | Statement::MacroDefinition { body, .. } => {
                for stmt in body {
                    stmt.collect_errors(out);
                }
            }
            _ => {}
        }
    }
}

/// Expressions of the directive code grammar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Identifier(Identifier),
    Number { span: Span, value: String },
    String { span: Span, value: String },
    Boolean { span: Span, value: bool },
    Null { span: Span },
    ArrayLiteral { span: Span, elements: Vec<Expr> },
    HashLiteral { span: Span, pairs: Vec<HashPair> },
    #[serde(rename = "binary_expression")]
    Binary {
        span: Span,
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },
    #[serde(rename = "unary_expression")]
    Unary {
        span: Span,
        operator: UnaryOp,
        operand: Box<Expr>,
    },
    #[serde(rename = "filter_expression")]
    Filter {
        span: Span,
        value: Box<Expr>,
        filter: Box<Expr>,
    },
    #[serde(rename = "member_expression")]
    Member {
        span: Span,
        object: Box<Expr>,
        property: Identifier,
    },
    #[serde(rename = "subscript_expression")]
    Subscript {
        span: Span,
        object: Box<Expr>,
        index: Box<Expr>,
    },
    #[serde(rename = "call_expression")]
    Call {
        span: Span,
        function: Box<Expr>,
        arguments: Vec<Argument>,
    },
    #[serde(rename = "parenthesized_expression")]
    Parenthesized { span: Span, expression: Box<Expr> },
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::Identifier(id) => &id.span,
            Expr::Number { span, .. }
            | Expr::String { span, .. }
            | Expr::Boolean { span, .. }
            | Expr::Null { span }
            | Expr::ArrayLiteral { span, .. }
            | Expr::HashLiteral { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Filter { span, .. }
            | Expr::Member { span, .. }
            | Expr::Subscript { span, .. }
            | Expr::Call { span, .. }
            | Expr::Parenthesized { span, .. } => span,
        }
    }

    /// Valid assignment targets: identifiers, member access, subscripts.
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self,
            Expr::Identifier(_) | Expr::Member { .. } | Expr::Subscript { .. }
        )
    }
}
