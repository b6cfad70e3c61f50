//! Full and incremental parsing of whole template buffers
//!
//! [`parse`] runs the top-level loop: at each position a directive open
//! marker wins, then a complete `/* ... */` comment, then a run of literal
//! content. [`reparse`] reuses the unchanged prefix of a previous tree and
//! rescans from the first edited region; its result is always identical to
//! a full parse of the new buffer.

use crate::utl::ast::{
    Code, CodeItem, Comment, ContentSpan, Directive, ErrorKind, ErrorNode, SourceFile, Statement,
    TopLevel,
};
use crate::utl::lexer;
use crate::utl::parser::Parser;
use crate::utl::scanner;

/// Longest delimiter the top-level scan looks ahead for (`[%-` / `-%]`).
/// A node ending at least this far before the first edit is unaffected by
/// it, with one exception handled in [`reparse`]: comment termination
/// looks arbitrarily far ahead.
const DELIMITER_LOOKAHEAD: usize = 3;

/// A parsed template buffer: the source text and its syntax tree.
///
/// Trees are immutable; [`reparse`] builds a fresh tree and leaves the old
/// one untouched, so superseded trees stay valid for diffing.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    source: String,
    root: SourceFile,
}

impl SyntaxTree {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &SourceFile {
        &self.root
    }

    /// The source text covered by a node span.
    pub fn text(&self, span: &crate::utl::ast::Span) -> &str {
        &self.source[span.clone()]
    }

    /// All error nodes in the tree, in document order.
    pub fn errors(&self) -> Vec<&ErrorNode> {
        let mut out = Vec::new();
        for node in &self.root.nodes {
            if let TopLevel::Directive(directive) = node {
                if let Some(code) = &directive.code {
                    for item in &code.items {
                        if let CodeItem::Statement(statement) = item {
                            statement.collect_errors(&mut out);
                        }
                    }
                }
            }
        }
        out
    }

    /// Error-node count; zero means the buffer parsed cleanly.
    pub fn error_count(&self) -> usize {
        self.errors().len()
    }
}

/// A buffer edit, in byte offsets of the old and new source respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
}

/// Parse a complete buffer.
pub fn parse(source: &str) -> SyntaxTree {
    let root = parse_source_file(source, 0, Vec::new());
    SyntaxTree {
        source: source.to_string(),
        root,
    }
}

/// Re-parse after edits, reusing the old tree's unchanged prefix.
///
/// `source` is the complete new buffer; `edits` describe how it differs
/// from `old.source()`. Top-level nodes of the old tree ending at least
/// [`DELIMITER_LOOKAHEAD`] bytes before the first edit are carried over
/// verbatim; scanning resumes at the reuse boundary. The top-level scan
/// carries no state across nodes besides the cursor, with one caveat: a
/// content node opening with `/*` was only content because no `*/`
/// followed anywhere in the old buffer, so its classification depends on
/// the edited suffix and reuse stops there. With that exclusion the
/// result is byte-identical to `parse(source)`.
pub fn reparse(source: &str, old: &SyntaxTree, edits: &[Edit]) -> SyntaxTree {
    let min_start = match edits.iter().map(|edit| edit.start_byte).min() {
        Some(min_start) => min_start,
        None => return parse(source),
    };
    let mut nodes = Vec::new();
    let mut pos = 0;
    for node in &old.root.nodes {
        let end = node.span().end;
        if end + DELIMITER_LOOKAHEAD > min_start {
            break;
        }
        if let TopLevel::Content(content) = node {
            // An edit past this node may supply the `*/` that was missing
            // when this run failed to scan as a comment.
            if old.source[content.span.clone()].starts_with("/*") {
                break;
            }
        }
        nodes.push(node.clone());
        pos = end;
    }
    let root = parse_source_file(source, pos, nodes);
    SyntaxTree {
        source: source.to_string(),
        root,
    }
}

fn parse_source_file(source: &str, start: usize, mut nodes: Vec<TopLevel>) -> SourceFile {
    let mut pos = start;
    while pos < source.len() {
        if scanner::scan_open_marker(source, pos).is_some() {
            let (node, next) = parse_directive(source, pos);
            nodes.push(node);
            pos = next;
        } else if let Some((span, next)) = scanner::scan_comment(source, pos) {
            nodes.push(TopLevel::Comment(Comment { span }));
            pos = next;
        } else if let Some((span, next)) = scanner::scan_content(source, pos) {
            nodes.push(TopLevel::Content(ContentSpan { span }));
            pos = next;
        } else {
            // Unreachable: one of the three scans always advances.
            break;
        }
    }
    SourceFile {
        span: 0..source.len(),
        nodes,
    }
}

/// Parse one directive starting at its open marker.
///
/// An unterminated directive extends to the end of the buffer and carries
/// a delimiter error node after its code items.
fn parse_directive(source: &str, pos: usize) -> (TopLevel, usize) {
    let (open_span, trim_open) = match scanner::scan_open_marker(source, pos) {
        Some(open) => open,
        // Callers check the marker first; treat anything else as an
        // unterminated empty directive.
        None => (pos..pos, false),
    };
    let lexed = lexer::lex_directive_code(source, open_span.end);
    let mut parser = Parser::new(&lexed.tokens);
    let mut items = parser.parse_code_items();

    let (close, next) = match lexed.close {
        Some((trim, span)) => {
            let next = span.end;
            (
                Some(crate::utl::ast::CloseMarker { span, trim }),
                next,
            )
        }
        None => {
            let error_start = lexed
                .tokens
                .last()
                .map(|(_, span)| span.end)
                .unwrap_or(open_span.end);
            items.push(CodeItem::Statement(Statement::Error(ErrorNode {
                span: error_start..source.len(),
                kind: ErrorKind::Delimiter,
                message: "missing closing '%]'".to_string(),
            })));
            (None, source.len())
        }
    };

    let code = if items.is_empty() {
        None
    } else {
        let code_span = items[0].span().start..items[items.len() - 1].span().end;
        Some(Code {
            span: code_span,
            items,
        })
    };

    let directive = Directive {
        span: open_span.start..next,
        trim_open,
        code,
        close,
    };
    (TopLevel::Directive(directive), next)
}
