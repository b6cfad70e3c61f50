//! Expression grammar tests: precedence, associativity, and operand
//! restrictions, asserted through a fully parenthesized re-rendering.

use rstest::rstest;
use utl::utl::ast::Expr;
use utl::utl::testing::{expr_kind, parenthesize, parse_expression};

fn parenthesized(source: &str) -> String {
    let expr = parse_expression(source);
    parenthesize(&expr, &format!("[% echo {}; %]", source))
}

#[rstest]
#[case("a + b * c", "(a + (b * c))")]
#[case("a * b + c", "((a * b) + c)")]
#[case("a - b - c", "((a - b) - c)")]
#[case("a / b % c", "((a / b) % c)")]
#[case("a || b && c", "(a || (b && c))")]
#[case("a && b || c", "((a && b) || c)")]
#[case("a == b || c != d", "((a == b) || (c != d))")]
#[case("a < b == c", "((a < b) == c)")]
#[case("!a && b", "((!a) && b)")]
#[case("-a * b", "((-a) * b)")]
#[case("-a.b", "(-(a.b))")]
#[case("!f(x)", "(!f(x))")]
#[case("(a + b) * c", "((a + b) * c)")]
fn binary_precedence(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(parenthesized(source), expected, "input: {}", source);
}

#[rstest]
// The filter binds tighter than comparison but looser than arithmetic.
#[case("a + b | f", "((a + b) | f)")]
// The filter target is just a name; the `+` binds outside the filter.
#[case("a | f + b", "((a | f) + b)")]
#[case("a == b | f", "(a == (b | f))")]
#[case("a | f == b", "((a | f) == b)")]
#[case("a | f | g", "((a | f) | g)")]
#[case("a | f(x, 2)", "(a | f(x, 2))")]
fn filter_precedence(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(parenthesized(source), expected, "input: {}", source);
}

#[rstest]
#[case("a.b.c", "((a.b).c)")]
#[case("a[0][1]", "((a[0])[1])")]
#[case("a.b[0].c", "(((a.b)[0]).c)")]
#[case("f(x).y", "(f(x).y)")]
#[case("a.b(x)", "(a.b)(x)")]
fn postfix_chains(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(parenthesized(source), expected, "input: {}", source);
}

#[test]
fn call_callee_restricted_to_identifier_or_member() {
    // `(f)(x)` is not a call: the parenthesized expression cannot be a
    // callee, so the trailing `(x)` makes the statement ill-formed and
    // the tree carries an error node instead.
    let tree = utl::parse("[% echo (f)(x); %]");
    assert!(tree.error_count() > 0);
}

#[test]
fn subscript_callee_is_not_callable() {
    let tree = utl::parse("[% echo a[0](x); %]");
    assert!(tree.error_count() > 0);
}

#[test]
fn filter_rhs_must_be_name_or_call() {
    let tree = utl::parse("[% echo a | 3; %]");
    assert!(tree.error_count() > 0);

    let tree = utl::parse("[% echo a | f.g; %]");
    assert!(tree.error_count() > 0);
}

#[test]
fn filter_call_with_member_function() {
    // `a | ns.f(x)` is fine: the filter is a call whose callee is a member.
    let expr = parse_expression("a | ns.f(x)");
    match expr {
        Expr::Filter { filter, .. } => assert_eq!(expr_kind(&filter), "call_expression"),
        other => panic!("expected filter, got {:?}", other),
    }
}

#[rstest]
#[case("42", "number")]
#[case("3.25", "number")]
#[case("\"hi\"", "string")]
#[case("'hi'", "string")]
#[case("true", "boolean")]
#[case("false", "boolean")]
#[case("null", "null")]
#[case("name", "identifier")]
#[case("[]", "array_literal")]
#[case("[1, 2]", "array_literal")]
#[case("[a: 1]", "hash_literal")]
#[case("[\"a\": 1, b: 2]", "hash_literal")]
fn literal_kinds(#[case] source: &str, #[case] expected: &str) {
    let expr = parse_expression(source);
    assert_eq!(expr_kind(&expr), expected, "input: {}", source);
}

#[test]
fn hash_requires_key_colon_lookahead() {
    // A leading identifier without `:` keeps the bracket an array.
    let expr = parse_expression("[a, b]");
    assert_eq!(expr_kind(&expr), "array_literal");

    // A subscripted first element stays an array too.
    let expr = parse_expression("[a[0], b]");
    assert_eq!(expr_kind(&expr), "array_literal");
}

#[test]
fn hash_keys_accept_strings_and_identifiers() {
    let expr = parse_expression("[\"k\": 1, name: v + 1]");
    match expr {
        Expr::HashLiteral { pairs, .. } => {
            assert_eq!(pairs.len(), 2);
            assert_eq!(expr_kind(&pairs[1].value), "binary_expression");
        }
        other => panic!("expected hash, got {:?}", other),
    }
}

#[test]
fn named_and_positional_arguments_interleave() {
    let expr = parse_expression("f(1, \"k\": 2, 3, \"j\": x)");
    match expr {
        Expr::Call { arguments, .. } => {
            let named: Vec<bool> = arguments.iter().map(|a| a.is_named()).collect();
            assert_eq!(named, vec![false, true, false, true]);
            assert_eq!(arguments[1].name.as_ref().unwrap().value, "k");
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn trailing_commas_accepted() {
    assert_eq!(expr_kind(&parse_expression("f(1, 2,)")), "call_expression");
    assert_eq!(expr_kind(&parse_expression("[1, 2,]")), "array_literal");
    assert_eq!(expr_kind(&parse_expression("[a: 1,]")), "hash_literal");
}

#[test]
fn string_escapes_are_cooked() {
    let expr = parse_expression(r#""a\n\t\"b\\""#);
    match expr {
        Expr::String { value, .. } => assert_eq!(value, "a\n\t\"b\\"),
        other => panic!("expected string, got {:?}", other),
    }
}

#[test]
fn number_text_is_preserved() {
    let expr = parse_expression("007.500");
    match expr {
        Expr::Number { value, .. } => assert_eq!(value, "007.500"),
        other => panic!("expected number, got {:?}", other),
    }
}

#[test]
fn range_dots_do_not_lex_as_float() {
    // `1..5` must stay number, dot-dot, number for the `for` header.
    let tree = utl::parse("[% for 1..5 as i; echo i; end; %]");
    assert_eq!(tree.error_count(), 0);
}

#[test]
fn exponent_and_hex_numbers_are_rejected() {
    assert!(utl::parse("[% echo 1e5; %]").error_count() > 0);
    assert!(utl::parse("[% echo 0x1f; %]").error_count() > 0);
}

#[test]
fn deep_nesting_degrades_to_an_error_node() {
    let mut source = String::from("[% echo ");
    for _ in 0..300 {
        source.push('(');
    }
    source.push('1');
    for _ in 0..300 {
        source.push(')');
    }
    source.push_str("; %]");
    let tree = utl::parse(&source);
    assert!(tree.error_count() > 0);
}
