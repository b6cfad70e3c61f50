//! Property-based tests for the parser
//!
//! Core guarantees under random input: parsing never panics, top-level
//! spans always tile the buffer exactly, well-formed generated templates
//! parse without error nodes, and incremental reparse always matches a
//! full parse.

use proptest::prelude::*;
use utl::utl::ast::TopLevel;
use utl::{parse, reparse, Edit};

/// Arbitrary template-ish text, biased toward delimiter fragments.
fn template_soup() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("[%".to_string()),
        Just("%]".to_string()),
        Just("[%-".to_string()),
        Just("-%]".to_string()),
        Just("/*".to_string()),
        Just("*/".to_string()),
        Just(";".to_string()),
        Just("echo x".to_string()),
        Just("if a".to_string()),
        Just("end".to_string()),
        Just("\"str\"".to_string()),
        Just("plain text ".to_string()),
        "[a-z ]{0,8}",
    ];
    prop::collection::vec(fragment, 0..16).prop_map(|parts| parts.concat())
}

/// A well-formed statement for clean-parse generation. Identifiers carry a
/// `v` prefix so they can never collide with a keyword.
fn clean_statement() -> impl Strategy<Value = String> {
    prop_oneof![
        "v[a-z]{0,5}".prop_map(|name| format!("echo {};", name)),
        ("v[a-z]{0,5}", 0u32..1000).prop_map(|(name, n)| format!("{} = {};", name, n)),
        "v[a-z]{0,5}".prop_map(|name| format!("if {}; echo {}; end;", name, name)),
        "v[a-z]{0,5}".prop_map(|name| format!("foreach xs as {}; echo {}; end;", name, name)),
        Just("break;".to_string()),
        Just("return 1 + 2 * 3;".to_string()),
    ]
}

fn clean_template() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z .,!]{0,12}",
            clean_statement().prop_map(|statement| format!("[% {} %]", statement)),
        ],
        0..8,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn parse_never_panics(source in template_soup()) {
        let _ = parse(&source);
    }

    #[test]
    fn top_level_spans_tile_the_buffer(source in template_soup()) {
        let tree = parse(&source);
        let mut pos = 0;
        for node in &tree.root().nodes {
            prop_assert_eq!(node.span().start, pos, "gap before node in {:?}", source);
            prop_assert!(node.span().end > pos, "empty node in {:?}", source);
            pos = node.span().end;
        }
        prop_assert_eq!(pos, source.len(), "tail not covered in {:?}", source);
    }

    #[test]
    fn content_never_swallows_an_open_marker(source in template_soup()) {
        let tree = parse(&source);
        for node in &tree.root().nodes {
            if let TopLevel::Content(content) = node {
                prop_assert!(
                    !tree.text(&content.span).contains("[%"),
                    "content covering a directive marker in {:?}",
                    source
                );
            }
        }
    }

    #[test]
    fn well_formed_templates_parse_cleanly(source in clean_template()) {
        let tree = parse(&source);
        prop_assert_eq!(tree.error_count(), 0, "errors in {:?}: {:?}", source, tree.errors());
    }

    #[test]
    fn reparse_always_matches_full_parse(
        source in template_soup(),
        insert_at in 0usize..64,
        insertion in prop_oneof![
            Just("x".to_string()),
            Just("[%".to_string()),
            Just("%]".to_string()),
            Just("; echo y".to_string()),
            Just(" ".to_string()),
            Just("/*".to_string()),
            Just("*/".to_string()),
        ],
    ) {
        let old = parse(&source);
        // Clamp to a char boundary.
        let mut at = insert_at.min(source.len());
        while !source.is_char_boundary(at) {
            at -= 1;
        }
        let mut new_source = String::new();
        new_source.push_str(&source[..at]);
        new_source.push_str(&insertion);
        new_source.push_str(&source[at..]);
        let edit = Edit {
            start_byte: at,
            old_end_byte: at,
            new_end_byte: at + insertion.len(),
        };
        let incremental = reparse(&new_source, &old, &[edit]);
        prop_assert_eq!(incremental, parse(&new_source), "edit at {} in {:?}", at, source);
    }
}
