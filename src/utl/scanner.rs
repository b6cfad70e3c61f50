//! Content scanner for the UTL template language
//!
//! Recognizes the lexical units that live outside directive code: runs of
//! literal template text, `/* ... */` comments, and the directive open
//! markers. Each scan is a pure function of `(source, position)` returning
//! the recognized span and the new cursor; the cursor is the only scanner
//! state, so concurrent parses on independent buffers share nothing.
//!
//! Comment recognition only wins over content at a unit boundary (start of
//! buffer, or immediately after a directive or comment). A `/*` in the
//! middle of a literal run stays literal text, and an unterminated `/*`
//! falls through to content scanning.

use crate::utl::ast::Span;

/// Scan a run of literal content starting at `pos`.
///
/// Consumes raw bytes up to (but not including) the next `[%` marker or the
/// end of the buffer. Returns `None` on a zero-length run, so adjacent
/// directives yield no content node. `[%` and `[%-` share the two-byte
/// prefix this scan stops at, so longest-match resolution of the open
/// marker is left to [`scan_open_marker`].
pub fn scan_content(source: &str, pos: usize) -> Option<(Span, usize)> {
    let end = match source[pos..].find("[%") {
        Some(offset) => pos + offset,
        None => source.len(),
    };
    if end == pos {
        return None;
    }
    Some((pos..end, end))
}

/// Scan a `/* ... */` comment starting exactly at `pos`.
///
/// The comment runs to the first `*/`, even across `[%` markers. Returns
/// `None` when `pos` does not start a complete comment; an unterminated
/// `/*` is not a comment.
pub fn scan_comment(source: &str, pos: usize) -> Option<(Span, usize)> {
    let rest = &source[pos..];
    if !rest.starts_with("/*") {
        return None;
    }
    let close = rest[2..].find("*/")?;
    let end = pos + 2 + close + 2;
    Some((pos..end, end))
}

/// Scan a directive open marker at `pos`, longest-match `[%-` over `[%`.
///
/// Returns the marker span and whether it carries the whitespace-trim `-`.
pub fn scan_open_marker(source: &str, pos: usize) -> Option<(Span, bool)> {
    let rest = &source[pos..];
    if rest.starts_with("[%-") {
        Some((pos..pos + 3, true))
    } else if rest.starts_with("[%") {
        Some((pos..pos + 2, false))
    } else {
        None
    }
}
