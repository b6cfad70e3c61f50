//! UTL parsing pipeline
//!
//! [`scanner`] recognizes top-level units, [`lexer`] tokenizes directive
//! code, [`parser`] builds statements and expressions with error recovery,
//! and [`tree`] assembles whole buffers (full and incremental). [`ast`]
//! holds the node definitions, [`catalog`] their machine-readable
//! description, [`formats`] the s-expression rendering.

pub mod ast;
pub mod catalog;
pub mod formats;
pub mod lexer;
pub mod parser;
pub mod scanner;
pub mod testing;
pub mod tree;
