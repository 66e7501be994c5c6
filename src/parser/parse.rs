//! Parser core
//!
//! Recursive-descent parser over the pre-tokenized stream. This file holds
//! the parser state, the token-cursor helpers, and the program entry point;
//! the grammar productions live in `declarations.rs`, `statements.rs`, and
//! `expressions.rs` as further `impl Parser` blocks.

use super::ast::{Coord, Node};
use super::lexer::{LexError, Lexer, Token};
use std::fmt;
use std::mem;

/// A fatal syntax error. Parsing stops at the first one: no partial tree
/// is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub coord: Coord,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coord.column {
            Some(col) => write!(
                f,
                "Parse error at line {}, column {}: {}",
                self.coord.line, col, self.message
            ),
            None => write!(f, "Parse error at line {}: {}", self.coord.line, self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Recursive-descent parser for uC.
///
/// The whole input is tokenized up front; lexical diagnostics recovered
/// during that pass are collected (or forwarded, see
/// [`Parser::with_error_func`]) and tokenization always runs to the end, so
/// the parser sees the full stream even for lexically broken input.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    lex_errors: Vec<LexError>,
}

impl Parser {
    /// Tokenize `source` and set up the parser, collecting lexical
    /// diagnostics for later inspection via [`Parser::lex_errors`].
    pub fn new(source: &str) -> Self {
        let mut lex_errors: Vec<LexError> = Vec::new();
        let tokens = {
            let mut lexer = Lexer::new(|err: &LexError| lex_errors.push(err.clone()));
            lexer.tokenize(source)
        };
        Self {
            tokens,
            position: 0,
            lex_errors,
        }
    }

    /// Like [`Parser::new`], but lexical diagnostics go straight to the
    /// supplied callback instead of being collected.
    pub fn with_error_func(source: &str, mut error_func: impl FnMut(&LexError)) -> Self {
        let tokens = {
            let mut lexer = Lexer::new(|err: &LexError| error_func(err));
            lexer.tokenize(source)
        };
        Self {
            tokens,
            position: 0,
            lex_errors: Vec::new(),
        }
    }

    /// Lexical diagnostics recovered while tokenizing the input.
    pub fn lex_errors(&self) -> &[LexError] {
        &self.lex_errors
    }

    /// Parse a whole translation unit into a `Program` node.
    pub fn parse_program(&mut self) -> Result<Node, ParseError> {
        let coord = self.current_coord();
        if self.is_at_end() {
            // An empty program is a syntax error, reported at end of input.
            return Err(self.error_near(&self.peek_token()));
        }
        let mut gdecls = Vec::new();
        while !self.is_at_end() {
            gdecls.push(self.global_declaration()?);
        }
        Ok(Node::Program { gdecls, coord })
    }

    // ----- token cursor helpers -----

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> &Token {
        let idx = (self.position + n).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.tokens[self.position].clone();
        if !matches!(tok, Token::Eof(_)) {
            self.position += 1;
        }
        tok
    }

    /// True when the current token has the same variant as `expected`
    /// (payloads are ignored).
    pub(crate) fn check(&self, expected: &Token) -> bool {
        mem::discriminant(self.peek()) == mem::discriminant(expected)
    }

    /// Consume the current token if it matches `expected`.
    pub(crate) fn match_token(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it matches `expected`, or fail with an
    /// error naming the offending token.
    pub(crate) fn expect(&mut self, expected: &Token) -> Result<Token, ParseError> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(self.error_near(&self.peek_token()))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<(String, Coord), ParseError> {
        match self.peek_token() {
            Token::Ident(name, coord) => {
                self.advance();
                Ok((name, coord))
            }
            other => Err(self.error_near(&other)),
        }
    }

    pub(crate) fn current_coord(&self) -> Coord {
        self.peek().coord()
    }

    /// True when the current token opens a type specifier.
    pub(crate) fn at_type_specifier(&self) -> bool {
        matches!(
            self.peek(),
            Token::Void(_) | Token::Char(_) | Token::Int(_) | Token::Float(_)
        )
    }

    pub(crate) fn error_near(&self, tok: &Token) -> ParseError {
        let message = match tok {
            Token::Eof(_) => "error at the end of input".to_string(),
            other => format!("error near the symbol {}", other),
        };
        ParseError {
            message,
            coord: tok.coord(),
        }
    }
}
