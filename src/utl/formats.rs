//! S-expression rendering of syntax trees
//!
//! A compact, indentation-structured rendering with one node per line,
//! field labels on labeled children, and the kind names of the catalog.
//! Meant for golden assertions in tests and quick inspection from the CLI;
//! JSON/YAML serialization of the same tree goes through serde instead.

use crate::utl::ast::{
    Argument, CodeItem, ElseClause, Expr, HashKey, IfBody, Parameter, Statement, TopLevel,
};
use crate::utl::tree::SyntaxTree;

/// Render the whole tree as an s-expression.
pub fn to_sexp(tree: &SyntaxTree) -> String {
    let mut writer = SexpWriter::new();
    writer.open("source_file");
    for node in &tree.root().nodes {
        match node {
            TopLevel::Content(_) => writer.leaf("content"),
            TopLevel::Comment(_) => writer.leaf("comment"),
            TopLevel::Directive(directive) => {
                writer.open("directive");
                if let Some(code) = &directive.code {
                    writer.open("code");
                    for item in &code.items {
                        match item {
                            CodeItem::Statement(statement) => writer.statement(statement),
                            CodeItem::Expression(expr) => writer.expr(None, expr),
                        }
                    }
                    writer.close();
                }
                writer.close();
            }
        }
    }
    writer.close();
    writer.finish()
}

struct SexpWriter {
    out: String,
    depth: usize,
}

impl SexpWriter {
    fn new() -> Self {
        SexpWriter {
            out: String::new(),
            depth: 0,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
    }

    fn open(&mut self, kind: &str) {
        self.line(&format!("({}", kind));
        self.depth += 1;
    }

    fn open_labeled(&mut self, label: &str, kind: &str) {
        self.line(&format!("{}: ({}", label, kind));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.out.push(')');
    }

    fn leaf(&mut self, kind: &str) {
        self.line(&format!("({})", kind));
    }

    fn labeled_leaf(&mut self, label: &str, kind: &str) {
        self.line(&format!("{}: ({})", label, kind));
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Comment(_) => self.leaf("comment"),
            Statement::Assignment { target, value, .. } => {
                self.open("assignment_statement");
                self.expr(Some("target"), target);
                self.expr(Some("value"), value);
                self.close();
            }
            Statement::Echo { value, .. } => {
                self.open("echo_statement");
                self.expr(Some("value"), value);
                self.close();
            }
            Statement::Return { value, .. } => match value {
                Some(value) => {
                    self.open("return_statement");
                    self.expr(Some("value"), value);
                    self.close();
                }
                None => self.leaf("return_statement"),
            },
            Statement::Break { .. } => self.leaf("break_statement"),
            Statement::Continue { .. } => self.leaf("continue_statement"),
            Statement::Call { value, .. } => {
                self.open("call_statement");
                self.expr(Some("value"), value);
                self.close();
            }
            Statement::Include { value, .. } => {
                self.open("include_statement");
                self.expr(Some("value"), value);
                self.close();
            }
            Statement::If {
                condition, body, ..
            } => {
                self.open("if_statement");
                self.expr(Some("condition"), condition);
                match body {
                    IfBody::Block {
                        statements,
                        else_clause,
                    } => {
                        for statement in statements {
                            self.statement(statement);
                        }
                        if let Some(clause) = else_clause {
                            self.else_clause(clause);
                        }
                    }
                    IfBody::Then { statement } => self.statement(statement),
                }
                self.close();
            }
            Statement::Foreach {
                iterable,
                binding,
                value_binding,
                body,
                ..
            } => {
                self.open("foreach_statement");
                self.expr(Some("iterable"), iterable);
                self.labeled_leaf("binding", "identifier");
                if value_binding.is_some() {
                    self.labeled_leaf("value_binding", "identifier");
                }
                for statement in body {
                    self.statement(statement);
                }
                self.close();
            }
            Statement::While {
                condition, body, ..
            } => {
                self.open("while_statement");
                self.expr(Some("condition"), condition);
                for statement in body {
                    self.statement(statement);
                }
                self.close();
            }
            Statement::For {
                from,
                to,
                body,
                ..
            } => {
                self.open("for_statement");
                self.expr(Some("from"), from);
                self.expr(Some("to"), to);
                self.labeled_leaf("binding", "identifier");
                for statement in body {
                    self.statement(statement);
                }
                self.close();
            }
            Statement::MacroDefinition {
                parameters, body, ..
            } => {
                self.open("macro_definition");
                self.labeled_leaf("name", "identifier");
                for parameter in parameters {
                    self.parameter(parameter);
                }
                for statement in body {
                    self.statement(statement);
                }
                self.close();
            }
            Statement::SplitIfStart { condition, .. } => {
                self.open("split_if_start");
                self.expr(Some("condition"), condition);
                self.close();
            }
            Statement::SplitElse { .. } => self.leaf("split_else"),
            Statement::SplitElseIf { condition, .. } => {
                self.open("split_else_if");
                self.expr(Some("condition"), condition);
                self.close();
            }
            Statement::SplitForeachStart {
                iterable,
                value_binding,
                ..
            } => {
                self.open("split_foreach_start");
                self.expr(Some("iterable"), iterable);
                self.labeled_leaf("binding", "identifier");
                if value_binding.is_some() {
                    self.labeled_leaf("value_binding", "identifier");
                }
                self.close();
            }
            Statement::SplitWhileStart { condition, .. } => {
                self.open("split_while_start");
                self.expr(Some("condition"), condition);
                self.close();
            }
            Statement::SplitForStart { from, to, .. } => {
                self.open("split_for_start");
                self.expr(Some("from"), from);
                self.expr(Some("to"), to);
                self.labeled_leaf("binding", "identifier");
                self.close();
            }
            Statement::SplitMacroStart { parameters, .. } => {
                self.open("split_macro_start");
                self.labeled_leaf("name", "identifier");
                for parameter in parameters {
                    self.parameter(parameter);
                }
                self.close();
            }
            Statement::SplitEnd { .. } => self.leaf("split_end"),
            Statement::ExpressionStatement { expression, .. } => {
                self.open("expression_statement");
                self.expr(None, expression);
                self.close();
            }
            Statement::Error(_) => self.leaf("error"),
        }
    }

    fn else_clause(&mut self, clause: &ElseClause) {
        self.open("else_clause");
        if let Some(condition) = &clause.condition {
            self.expr(Some("condition"), condition);
        }
        for statement in &clause.body {
            self.statement(statement);
        }
        if let Some(next) = &clause.else_clause {
            self.else_clause(next);
        }
        self.close();
    }

    fn parameter(&mut self, parameter: &Parameter) {
        match &parameter.default {
            Some(default) => {
                self.open("parameter");
                self.labeled_leaf("name", "identifier");
                self.expr(Some("default"), default);
                self.close();
            }
            None => self.leaf("parameter"),
        }
    }

    fn argument(&mut self, argument: &Argument) {
        self.open("argument");
        if argument.is_named() {
            self.labeled_leaf("name", "string");
        }
        self.expr(Some("value"), &argument.value);
        self.close();
    }

    fn expr(&mut self, label: Option<&str>, expr: &Expr) {
        let kind = match expr {
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
        };
        let is_leaf = matches!(
            expr,
            Expr::Identifier(_)
                | Expr::Number { .. }
                | Expr::String { .. }
                | Expr::Boolean { .. }
                | Expr::Null { .. }
        );
        if is_leaf {
            match label {
                Some(label) => self.labeled_leaf(label, kind),
                None => self.leaf(kind),
            }
            return;
        }
        match label {
            Some(label) => self.open_labeled(label, kind),
            None => self.open(kind),
        }
        match expr {
            Expr::ArrayLiteral { elements, .. } => {
                for element in elements {
                    self.expr(None, element);
                }
            }
            Expr::HashLiteral { pairs, .. } => {
                for pair in pairs {
                    self.open("hash_pair");
                    match &pair.key {
                        HashKey::String(_) => self.labeled_leaf("key", "string"),
                        HashKey::Identifier(_) => self.labeled_leaf("key", "identifier"),
                    }
                    self.expr(Some("value"), &pair.value);
                    self.close();
                }
            }
            Expr::Binary { left, right, .. } => {
                self.expr(Some("left"), left);
                self.expr(Some("right"), right);
            }
            Expr::Unary { operand, .. } => self.expr(Some("operand"), operand),
            Expr::Filter { value, filter, .. } => {
                self.expr(Some("value"), value);
                self.expr(Some("filter"), filter);
            }
            Expr::Member { object, .. } => {
                self.expr(Some("object"), object);
                self.labeled_leaf("property", "identifier");
            }
            Expr::Subscript { object, index, .. } => {
                self.expr(Some("object"), object);
                self.expr(Some("index"), index);
            }
            Expr::Call {
                function,
                arguments,
                ..
            } => {
                self.expr(Some("function"), function);
                for argument in arguments {
                    self.argument(argument);
                }
            }
            Expr::Parenthesized { expression, .. } => self.expr(None, expression),
            _ => {}
        }
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utl::tree::parse;

    #[test]
    fn test_echo_sexp() {
        let tree = parse("[% echo user.name; %]");
        let expected = "\
(source_file
  (directive
    (code
      (echo_statement
        value: (member_expression
          object: (identifier)
          property: (identifier))))))";
        assert_eq!(to_sexp(&tree), expected);
    }

    #[test]
    fn test_content_and_comment_sexp() {
        let tree = parse("/* c */hi [% x; %]");
        let expected = "\
(source_file
  (comment)
  (content)
  (directive
    (code
      (expression_statement
        (identifier)))))";
        assert_eq!(to_sexp(&tree), expected);
    }

    #[test]
    fn test_error_node_sexp() {
        let tree = parse("[% echo ; %]");
        assert!(to_sexp(&tree).contains("(error)"));
    }
}
