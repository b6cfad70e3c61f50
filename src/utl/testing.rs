//! Shared helpers for parser tests
//!
//! Conveniences for unwrapping the common tree shapes test inputs produce:
//! one directive, one statement, one expression. All helpers panic with a
//! readable message on an unexpected shape, so they belong in tests only.

use crate::utl::ast::{CodeItem, Expr, Statement, TopLevel};
use crate::utl::tree::{parse, SyntaxTree};

/// Parse and assert the buffer produced no error nodes.
pub fn parse_clean(source: &str) -> SyntaxTree {
    let tree = parse(source);
    let errors = tree.errors();
    assert!(
        errors.is_empty(),
        "expected clean parse of {:?}, got errors: {:?}",
        source,
        errors
    );
    tree
}

/// The code items of the first directive in the buffer.
pub fn directive_items(source: &str) -> Vec<CodeItem> {
    let tree = parse(source);
    for node in &tree.root().nodes {
        if let TopLevel::Directive(directive) = node {
            return directive
                .code
                .as_ref()
                .map(|code| code.items.clone())
                .unwrap_or_default();
        }
    }
    panic!("no directive in {:?}", source);
}

/// The single statement of a one-statement directive.
pub fn single_statement(source: &str) -> Statement {
    let items = directive_items(source);
    assert_eq!(items.len(), 1, "expected one item in {:?}, got {:?}", source, items);
    match items.into_iter().next() {
        Some(CodeItem::Statement(statement)) => statement,
        other => panic!("expected statement in {:?}, got {:?}", source, other),
    }
}

/// Parse `expr` inside `[% echo expr; %]` and return the expression.
pub fn parse_expression(expr: &str) -> Expr {
    let source = format!("[% echo {}; %]", expr);
    match single_statement(&source) {
        Statement::Echo { value, .. } => value,
        other => panic!("expected echo of {:?}, got {:?}", expr, other),
    }
}

/// Kind discriminant of an expression, matching the catalog names.
pub fn expr_kind(expr: &Expr) -> &'static str {
    match expr {
        Expr::Identifier(_) => "identifier",
        Expr::Number { .. } => "number",
        Expr::String { .. } => "string",
        Expr::Boolean { .. } => "boolean",
        Expr::Null { .. } => "null",
        Expr::ArrayLiteral { .. } => "array_literal",
        Expr::HashLiteral { .. } => "hash_literal",
        Expr::Binary { .. } => "binary_expression",
        Expr::Unary { .. } => "unary_expression",
        Expr::Filter { .. } => "filter_expression",
        Expr::Member { .. } => "member_expression",
        Expr::Subscript { .. } => "subscript_expression",
        Expr::Call { .. } => "call_expression",
        Expr::Parenthesized { .. } => "parenthesized_expression",
    }
}

/// Render an expression back to a fully parenthesized form, for concise
/// precedence assertions.
pub fn parenthesize(expr: &Expr, source: &str) -> String {
    match expr {
        Expr::Identifier(id) => id.name.clone(),
        Expr::Number { value, .. } => value.clone(),
        Expr::String { value, .. } => format!("{:?}", value),
        Expr::Boolean { value, .. } => value.to_string(),
        Expr::Null { .. } => "null".to_string(),
        Expr::ArrayLiteral { elements, .. } => {
            let inner: Vec<String> = elements
                .iter()
                .map(|element| parenthesize(element, source))
                .collect();
            format!("[{}]", inner.join(", "))
        }
        Expr::HashLiteral { span, .. } => source[span.clone()].to_string(),
        Expr::Binary {
            left,
            operator,
            right,
            ..
        } => format!(
            "({} {} {})",
            parenthesize(left, source),
            operator,
            parenthesize(right, source)
        ),
        Expr::Unary {
            operator, operand, ..
        } => format!("({}{})", operator, parenthesize(operand, source)),
        Expr::Filter { value, filter, .. } => format!(
            "({} | {})",
            parenthesize(value, source),
            parenthesize(filter, source)
        ),
        Expr::Member {
            object, property, ..
        } => format!("({}.{})", parenthesize(object, source), property.name),
        Expr::Subscript { object, index, .. } => format!(
            "({}[{}])",
            parenthesize(object, source),
            parenthesize(index, source)
        ),
        Expr::Call {
            function,
            arguments,
            ..
        } => {
            let args: Vec<String> = arguments
                .iter()
                .map(|argument| match &argument.name {
                    Some(name) => {
                        format!("{:?}: {}", name.value, parenthesize(&argument.value, source))
                    }
                    None => parenthesize(&argument.value, source),
                })
                .collect();
            format!("{}({})", parenthesize(function, source), args.join(", "))
        }
        Expr::Parenthesized { expression, .. } => parenthesize(expression, source),
    }
}
