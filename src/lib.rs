//! # Introduction
//!
//! ucfront is the front end of a uC compiler: it tokenises uC source,
//! parses it with a hand-written recursive descent parser, and produces an
//! Abstract Syntax Tree in which every node carries its source coordinate.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST
//! ```
//!
//! 1. [`parser::lexer`] — pull-based tokenizer with recoverable lexical
//!    diagnostics.
//! 2. [`parser::parse`] — recursive descent over the token stream; the
//!    first syntax error aborts with no partial tree.
//! 3. [`parser::ast`] — the node model, including an indented tree dump
//!    for inspection and golden tests.
//!
//! ## Example
//!
//! ```
//! use ucfront::parser::parse;
//!
//! let tree = parse("int main() { return 0; }").unwrap();
//! println!("{}", tree.dump(&Default::default()));
//! ```

pub mod parser;

pub use parser::{parse, Coord, LexError, Lexer, Node, ParseError, Parser};
