//! Statement grammar tests: simple statements, assignments, block forms,
//! inline `then`, else-chains, and bare expressions.

use utl::utl::ast::{AssignOp, CodeItem, IfBody, Statement};
use utl::utl::testing::{directive_items, parse_clean, single_statement};

#[test]
fn echo_statement() {
    match single_statement("[% echo user.name; %]") {
        Statement::Echo { .. } => {}
        other => panic!("expected echo, got {:?}", other),
    }
}

#[test]
fn return_with_and_without_value() {
    match single_statement("[% return x + 1; %]") {
        Statement::Return { value: Some(_), .. } => {}
        other => panic!("expected return with value, got {:?}", other),
    }
    match single_statement("[% return; %]") {
        Statement::Return { value: None, .. } => {}
        other => panic!("expected bare return, got {:?}", other),
    }
}

#[test]
fn loop_control_statements() {
    assert!(matches!(
        single_statement("[% break; %]"),
        Statement::Break { .. }
    ));
    assert!(matches!(
        single_statement("[% continue; %]"),
        Statement::Continue { .. }
    ));
}

#[test]
fn call_and_include_statements() {
    assert!(matches!(
        single_statement("[% call render(page); %]"),
        Statement::Call { .. }
    ));
    assert!(matches!(
        single_statement("[% include \"header.utl\"; %]"),
        Statement::Include { .. }
    ));
}

#[test]
fn assignment_operators() {
    let cases = [
        ("[% x = 1; %]", AssignOp::Assign),
        ("[% x += 1; %]", AssignOp::AddAssign),
        ("[% x -= 1; %]", AssignOp::SubAssign),
    ];
    for (source, expected) in cases {
        match single_statement(source) {
            Statement::Assignment { operator, .. } => {
                assert_eq!(operator, expected, "input: {}", source)
            }
            other => panic!("expected assignment in {}, got {:?}", source, other),
        }
    }
}

#[test]
fn assignment_targets() {
    parse_clean("[% a.b = 1; %]");
    parse_clean("[% a[0] = 1; %]");
    parse_clean("[% a.b[i].c = 1; %]");

    // Calls and literals are not assignable.
    assert!(utl::parse("[% f() = 1; %]").error_count() > 0);
    assert!(utl::parse("[% 3 = 1; %]").error_count() > 0);
}

#[test]
fn missing_semicolon_demotes_block_to_split_forms() {
    parse_clean("[% if x; f(y); end; %]");

    // Without the `;` the body statement fails, so the header falls back
    // to its split form, `f(y)` becomes a bare expression, and the `end`
    // stands alone. Still a clean parse.
    let items = directive_items("[% if x; f(y) end; %]");
    assert_eq!(items.len(), 3);
    assert!(matches!(
        items[0],
        CodeItem::Statement(Statement::SplitIfStart { .. })
    ));
    assert!(matches!(items[1], CodeItem::Expression(_)));
    assert!(matches!(
        items[2],
        CodeItem::Statement(Statement::SplitEnd { .. })
    ));
}

#[test]
fn bare_expressions_anywhere_in_code() {
    let items = directive_items("[% x + 1 echo y; z %]");
    assert_eq!(items.len(), 3);
    assert!(matches!(items[0], CodeItem::Expression(_)));
    assert!(matches!(
        items[1],
        CodeItem::Statement(Statement::Echo { .. })
    ));
    assert!(matches!(items[2], CodeItem::Expression(_)));
}

#[test]
fn if_block_form() {
    match single_statement("[% if x > 0; echo x; end; %]") {
        Statement::If {
            body: IfBody::Block {
                statements,
                else_clause,
            },
            ..
        } => {
            assert_eq!(statements.len(), 1);
            assert!(else_clause.is_none());
        }
        other => panic!("expected block if, got {:?}", other),
    }
}

#[test]
fn if_then_inline_form() {
    match single_statement("[% if x then echo x; %]") {
        Statement::If {
            body: IfBody::Then { statement },
            ..
        } => assert!(matches!(*statement, Statement::Echo { .. })),
        other => panic!("expected then-form if, got {:?}", other),
    }
}

#[test]
fn if_else_chain() {
    let source = "[% if a; echo 1; else if b; echo 2; else; echo 3; end; %]";
    match single_statement(source) {
        Statement::If {
            body: IfBody::Block { else_clause, .. },
            ..
        } => {
            let first = else_clause.expect("first else");
            assert!(first.condition.is_some());
            let second = first.else_clause.expect("final else");
            assert!(second.condition.is_none());
            assert!(second.else_clause.is_none());
        }
        other => panic!("expected if with else-chain, got {:?}", other),
    }
}

#[test]
fn dangling_else_binds_to_innermost_if() {
    let source = "[% if a; if b; echo 1; else; echo 2; end; end; %]";
    match single_statement(source) {
        Statement::If {
            body:
                IfBody::Block {
                    statements,
                    else_clause,
                },
            ..
        } => {
            assert!(else_clause.is_none(), "outer if must not take the else");
            match &statements[0] {
                Statement::If {
                    body: IfBody::Block { else_clause, .. },
                    ..
                } => assert!(else_clause.is_some(), "inner if takes the else"),
                other => panic!("expected nested if, got {:?}", other),
            }
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn foreach_block_form() {
    match single_statement("[% foreach items as item; echo item; end; %]") {
        Statement::Foreach {
            value_binding,
            body,
            ..
        } => {
            assert!(value_binding.is_none());
            assert_eq!(body.len(), 1);
        }
        other => panic!("expected foreach, got {:?}", other),
    }
}

#[test]
fn foreach_with_value_binding() {
    match single_statement("[% foreach map as k, v; echo v; end; %]") {
        Statement::Foreach {
            binding,
            value_binding,
            ..
        } => {
            assert_eq!(binding.name, "k");
            assert_eq!(value_binding.expect("value binding").name, "v");
        }
        other => panic!("expected foreach, got {:?}", other),
    }
}

#[test]
fn while_block_form() {
    match single_statement("[% while n > 0; n -= 1; end; %]") {
        Statement::While { body, .. } => assert_eq!(body.len(), 1),
        other => panic!("expected while, got {:?}", other),
    }
}

#[test]
fn for_range_form() {
    match single_statement("[% for 1..count as i; echo i; end; %]") {
        Statement::For { binding, body, .. } => {
            assert_eq!(binding.name, "i");
            assert_eq!(body.len(), 1);
        }
        other => panic!("expected for, got {:?}", other),
    }
}

#[test]
fn macro_definition_with_defaults() {
    let source = "[% macro link(href, label = \"here\"); echo href; end; %]";
    match single_statement(source) {
        Statement::MacroDefinition {
            name, parameters, ..
        } => {
            assert_eq!(name.name, "link");
            assert_eq!(parameters.len(), 2);
            assert!(parameters[0].default.is_none());
            assert!(parameters[1].default.is_some());
        }
        other => panic!("expected macro, got {:?}", other),
    }
}

#[test]
fn macro_with_no_parameters() {
    match single_statement("[% macro footer(); echo 1; end; %]") {
        Statement::MacroDefinition { parameters, .. } => assert!(parameters.is_empty()),
        other => panic!("expected macro, got {:?}", other),
    }
}

#[test]
fn nested_blocks() {
    let source = "[% foreach rows as row; if row.ok; echo row; end; end; %]";
    match single_statement(source) {
        Statement::Foreach { body, .. } => {
            assert!(matches!(body[0], Statement::If { .. }));
        }
        other => panic!("expected foreach, got {:?}", other),
    }
}

#[test]
fn statement_comments_in_code() {
    let items = directive_items("[% /* note */ echo x; %]");
    assert_eq!(items.len(), 2);
    assert!(matches!(
        items[0],
        CodeItem::Statement(Statement::Comment(_))
    ));
}

#[test]
fn trim_markers_are_recorded_without_changing_the_parse() {
    let tree = parse_clean("a [%- echo x; -%] b");
    match &tree.root().nodes[1] {
        utl::utl::ast::TopLevel::Directive(directive) => {
            assert!(directive.trim_open);
            assert!(directive.close.as_ref().expect("close").trim);
        }
        other => panic!("expected directive, got {:?}", other),
    }
    let plain = parse_clean("a [% echo x; %] b");
    assert!(matches!(
        &plain.root().nodes[1],
        utl::utl::ast::TopLevel::Directive(d) if !d.trim_open
    ));
}

#[test]
fn statement_spans_cover_their_text() {
    let source = "[% echo a + b; %]";
    let statement = single_statement(source);
    assert_eq!(&source[statement.span().clone()], "echo a + b;");
}
