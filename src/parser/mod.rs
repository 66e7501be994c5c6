//! uC source code parser
//!
//! This module transforms uC source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # The uC Language
//!
//! uC is a small C-like teaching language:
//! - Types: `int`, `char`, `float`, `void`, pointers, arrays
//! - Statements: declarations, assignments, control flow (`if`, `while`,
//!   `for`), plus the built-ins `assert`, `print`, and `read`
//! - Expressions: arithmetic, relational, logical, casts, function calls
//! - No preprocessor, structs, typedefs, or `switch`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one method per precedence
//! level for binary operators. No external parser generator dependencies.
//! Declarators are folded into type chains by a small composition pass in
//! [`compose`] rather than spliced in place.

pub mod ast;
pub mod lexer;
pub mod parse;

mod compose;
mod declarations;
mod expressions;
mod statements;

pub use ast::{Coord, Node, ShowOptions};
pub use lexer::{LexError, LexErrorKind, Lexer, Token};
pub use parse::{ParseError, Parser};

/// Parse uC source into a `Program` node, discarding any recovered
/// lexical diagnostics. Convenience wrapper over [`Parser`].
pub fn parse(source: &str) -> Result<Node, ParseError> {
    Parser::new(source).parse_program()
}
