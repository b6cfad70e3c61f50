//! # utl
//!
//! An error-tolerant parser for the UTL template language: literal content
//! interleaved with `[% ... %]` directive blocks of imperative code.
//!
//! The parser never fails. Malformed regions become error nodes in
//! statement position and parsing resumes at the next boundary; the
//! error-node count is the only failure signal. [`reparse`] re-parses an
//! edited buffer incrementally with a result guaranteed identical to a
//! full [`parse`].

pub mod utl;

pub use utl::ast;
pub use utl::tree::{parse, reparse, Edit, SyntaxTree};
