//! Lexer (tokenizer) for uC source code
//!
//! Converts raw source text into a pull-based [`Token`] stream consumed by
//! the parser. Lexical errors are reported through a caller-supplied
//! callback and never abort tokenization: the lexer skips past the
//! offending character and resumes, so a single input can surface several
//! diagnostics.

use super::ast::Coord;
use rustc_hash::FxHashMap;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`Coord`] so that parse errors can report an
/// accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntConst(i64, Coord),
    FloatConst(f64, Coord),
    StringConst(String, Coord),

    // Identifiers
    Ident(String, Coord),

    // Keywords
    Assert(Coord),
    Break(Coord),
    Char(Coord),
    Else(Coord),
    Float(Coord),
    For(Coord),
    If(Coord),
    Int(Coord),
    Print(Coord),
    Read(Coord),
    Return(Coord),
    Void(Coord),
    While(Coord),

    // Operators
    Plus(Coord),      // +
    PlusPlus(Coord),  // ++
    Minus(Coord),     // -
    MinusMinus(Coord), // --
    Star(Coord),      // *
    Slash(Coord),     // /
    Question(Coord),  // ?
    Amp(Coord),       // &
    AndAnd(Coord),    // &&
    OrOr(Coord),      // ||
    Bang(Coord),      // !
    NotEq(Coord),     // !=
    EqEq(Coord),      // ==
    Lt(Coord),        // <
    Le(Coord),        // <=
    Gt(Coord),        // >
    Ge(Coord),        // >=
    Eq(Coord),        // =
    StarEq(Coord),    // *=
    SlashEq(Coord),   // /=
    PercentEq(Coord), // %=
    PlusEq(Coord),    // +=
    MinusEq(Coord),   // -=

    // Punctuation
    Semicolon(Coord), // ;
    Comma(Coord),     // ,
    LParen(Coord),    // (
    RParen(Coord),    // )
    LBracket(Coord),  // [
    RBracket(Coord),  // ]
    LBrace(Coord),    // {
    RBrace(Coord),    // }

    // End of input
    Eof(Coord),
}

impl Token {
    /// Returns the source coordinate where this token appears.
    pub fn coord(&self) -> Coord {
        match self {
            Token::IntConst(_, c)
            | Token::FloatConst(_, c)
            | Token::StringConst(_, c)
            | Token::Ident(_, c)
            | Token::Assert(c)
            | Token::Break(c)
            | Token::Char(c)
            | Token::Else(c)
            | Token::Float(c)
            | Token::For(c)
            | Token::If(c)
            | Token::Int(c)
            | Token::Print(c)
            | Token::Read(c)
            | Token::Return(c)
            | Token::Void(c)
            | Token::While(c)
            | Token::Plus(c)
            | Token::PlusPlus(c)
            | Token::Minus(c)
            | Token::MinusMinus(c)
            | Token::Star(c)
            | Token::Slash(c)
            | Token::Question(c)
            | Token::Amp(c)
            | Token::AndAnd(c)
            | Token::OrOr(c)
            | Token::Bang(c)
            | Token::NotEq(c)
            | Token::EqEq(c)
            | Token::Lt(c)
            | Token::Le(c)
            | Token::Gt(c)
            | Token::Ge(c)
            | Token::Eq(c)
            | Token::StarEq(c)
            | Token::SlashEq(c)
            | Token::PercentEq(c)
            | Token::PlusEq(c)
            | Token::MinusEq(c)
            | Token::Semicolon(c)
            | Token::Comma(c)
            | Token::LParen(c)
            | Token::RParen(c)
            | Token::LBracket(c)
            | Token::RBracket(c)
            | Token::LBrace(c)
            | Token::RBrace(c)
            | Token::Eof(c) => *c,
        }
    }
}

impl fmt::Display for Token {
    /// Renders the token's source value, as used in syntax error messages
    /// ("error near the symbol ...").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntConst(v, _) => write!(f, "{}", v),
            Token::FloatConst(v, _) => write!(f, "{:?}", v),
            Token::StringConst(s, _) => write!(f, "\"{}\"", s),
            Token::Ident(s, _) => write!(f, "{}", s),
            Token::Assert(_) => write!(f, "assert"),
            Token::Break(_) => write!(f, "break"),
            Token::Char(_) => write!(f, "char"),
            Token::Else(_) => write!(f, "else"),
            Token::Float(_) => write!(f, "float"),
            Token::For(_) => write!(f, "for"),
            Token::If(_) => write!(f, "if"),
            Token::Int(_) => write!(f, "int"),
            Token::Print(_) => write!(f, "print"),
            Token::Read(_) => write!(f, "read"),
            Token::Return(_) => write!(f, "return"),
            Token::Void(_) => write!(f, "void"),
            Token::While(_) => write!(f, "while"),
            Token::Plus(_) => write!(f, "+"),
            Token::PlusPlus(_) => write!(f, "++"),
            Token::Minus(_) => write!(f, "-"),
            Token::MinusMinus(_) => write!(f, "--"),
            Token::Star(_) => write!(f, "*"),
            Token::Slash(_) => write!(f, "/"),
            Token::Question(_) => write!(f, "?"),
            Token::Amp(_) => write!(f, "&"),
            Token::AndAnd(_) => write!(f, "&&"),
            Token::OrOr(_) => write!(f, "||"),
            Token::Bang(_) => write!(f, "!"),
            Token::NotEq(_) => write!(f, "!="),
            Token::EqEq(_) => write!(f, "=="),
            Token::Lt(_) => write!(f, "<"),
            Token::Le(_) => write!(f, "<="),
            Token::Gt(_) => write!(f, ">"),
            Token::Ge(_) => write!(f, ">="),
            Token::Eq(_) => write!(f, "="),
            Token::StarEq(_) => write!(f, "*="),
            Token::SlashEq(_) => write!(f, "/="),
            Token::PercentEq(_) => write!(f, "%="),
            Token::PlusEq(_) => write!(f, "+="),
            Token::MinusEq(_) => write!(f, "-="),
            Token::Semicolon(_) => write!(f, ";"),
            Token::Comma(_) => write!(f, ","),
            Token::LParen(_) => write!(f, "("),
            Token::RParen(_) => write!(f, ")"),
            Token::LBracket(_) => write!(f, "["),
            Token::RBracket(_) => write!(f, "]"),
            Token::LBrace(_) => write!(f, "{{"),
            Token::RBrace(_) => write!(f, "}}"),
            Token::Eof(_) => write!(f, "end of input"),
        }
    }
}

/// Kinds of recoverable lexical errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    IllegalCharacter(char),
    UnterminatedString,
    UnterminatedComment,
}

/// A lexical diagnostic with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LexErrorKind::IllegalCharacter(ch) => {
                write!(f, "Illegal character '{}'", ch)
            }
            LexErrorKind::UnterminatedString => write!(f, "Unterminated string"),
            LexErrorKind::UnterminatedComment => write!(f, "Unterminated comment"),
        }
    }
}

impl std::error::Error for LexError {}

/// Lexer for uC source code.
///
/// Create one with an error callback, feed it text with [`Lexer::input`],
/// and pull tokens with [`Lexer::token`]. Re-supplying text restarts the
/// lexer from line 1. All state, including the keyword table, is owned by
/// the instance, so independent lexers never share anything mutable.
pub struct Lexer<'a> {
    input: Vec<char>,
    position: usize,
    line: usize,
    keywords: FxHashMap<&'static str, fn(Coord) -> Token>,
    error_func: Box<dyn FnMut(&LexError) + 'a>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer. `error_func` receives every lexical diagnostic
    /// while tokenization continues.
    pub fn new(error_func: impl FnMut(&LexError) + 'a) -> Self {
        let mut keywords: FxHashMap<&'static str, fn(Coord) -> Token> = FxHashMap::default();
        keywords.insert("assert", Token::Assert as fn(Coord) -> Token);
        keywords.insert("break", Token::Break);
        keywords.insert("char", Token::Char);
        keywords.insert("else", Token::Else);
        keywords.insert("float", Token::Float);
        keywords.insert("for", Token::For);
        keywords.insert("if", Token::If);
        keywords.insert("int", Token::Int);
        keywords.insert("print", Token::Print);
        keywords.insert("read", Token::Read);
        keywords.insert("return", Token::Return);
        keywords.insert("void", Token::Void);
        keywords.insert("while", Token::While);

        Self {
            input: Vec::new(),
            position: 0,
            line: 1,
            keywords,
            error_func: Box::new(error_func),
        }
    }

    /// Supply source text, restarting the lexer from line 1.
    pub fn input(&mut self, text: &str) {
        self.input = text.chars().collect();
        self.position = 0;
        self.line = 1;
    }

    /// Pull the next token, or `None` at end of input.
    pub fn token(&mut self) -> Option<Token> {
        'scan: loop {
            loop {
                match self.peek()? {
                    ' ' | '\t' | '\n' => {
                        self.advance();
                    }
                    '/' if self.peek_ahead(1) == Some('/') => {
                        self.skip_line_comment();
                    }
                    '/' if self.peek_ahead(1) == Some('*') => {
                        self.skip_block_comment();
                    }
                    _ => break,
                }
            }

            let start = self.position;
            let coord = self.coord_at(start);
            let ch = self.peek()?;

            if ch == '"' {
                match self.string_const(coord) {
                    Some(tok) => return Some(tok),
                    None => continue 'scan,
                }
            }
            if ch.is_ascii_digit()
                || (ch == '.' && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()))
            {
                return Some(self.number_const(coord));
            }
            if ch.is_ascii_alphabetic() || ch == '_' {
                return Some(self.identifier_or_keyword(coord));
            }

            self.advance();
            let token = match ch {
                '+' => {
                    if self.eat('+') {
                        Token::PlusPlus(coord)
                    } else if self.eat('=') {
                        Token::PlusEq(coord)
                    } else {
                        Token::Plus(coord)
                    }
                }
                '-' => {
                    if self.eat('-') {
                        Token::MinusMinus(coord)
                    } else if self.eat('=') {
                        Token::MinusEq(coord)
                    } else {
                        Token::Minus(coord)
                    }
                }
                '*' => {
                    if self.eat('=') {
                        Token::StarEq(coord)
                    } else {
                        Token::Star(coord)
                    }
                }
                '/' => {
                    if self.eat('=') {
                        Token::SlashEq(coord)
                    } else {
                        Token::Slash(coord)
                    }
                }
                // Bare '%' is not part of the uC token set; only '%=' is.
                '%' if self.peek() == Some('=') => {
                    self.advance();
                    Token::PercentEq(coord)
                }
                '=' => {
                    if self.eat('=') {
                        Token::EqEq(coord)
                    } else {
                        Token::Eq(coord)
                    }
                }
                '!' => {
                    if self.eat('=') {
                        Token::NotEq(coord)
                    } else {
                        Token::Bang(coord)
                    }
                }
                '<' => {
                    if self.eat('=') {
                        Token::Le(coord)
                    } else {
                        Token::Lt(coord)
                    }
                }
                '>' => {
                    if self.eat('=') {
                        Token::Ge(coord)
                    } else {
                        Token::Gt(coord)
                    }
                }
                '&' => {
                    if self.eat('&') {
                        Token::AndAnd(coord)
                    } else {
                        Token::Amp(coord)
                    }
                }
                // Bare '|' is not a token either; '||' is.
                '|' if self.peek() == Some('|') => {
                    self.advance();
                    Token::OrOr(coord)
                }
                '?' => Token::Question(coord),
                ';' => Token::Semicolon(coord),
                ',' => Token::Comma(coord),
                '(' => Token::LParen(coord),
                ')' => Token::RParen(coord),
                '[' => Token::LBracket(coord),
                ']' => Token::RBracket(coord),
                '{' => Token::LBrace(coord),
                '}' => Token::RBrace(coord),
                other => {
                    self.report(LexErrorKind::IllegalCharacter(other), coord);
                    continue 'scan;
                }
            };
            return Some(token);
        }
    }

    /// Tokenize `text` from the start, appending a final [`Token::Eof`].
    pub fn tokenize(&mut self, text: &str) -> Vec<Token> {
        self.input(text);
        let mut tokens = Vec::new();
        while let Some(tok) = self.token() {
            tokens.push(tok);
        }
        let eof_coord = self.coord_at(self.position);
        tokens.push(Token::Eof(eof_coord));
        tokens
    }

    /// Debug scanner: tokenize `text` and render each token. Used by tests
    /// and tooling to inspect the raw stream.
    pub fn scan(&mut self, text: &str) -> Vec<String> {
        self.input(text);
        let mut lines = Vec::new();
        while let Some(tok) = self.token() {
            lines.push(format!("{:?}", tok));
        }
        lines
    }

    /// Lex a string literal. Returns `None` when the string is
    /// unterminated; the error has then been reported and the position
    /// reset to just past the opening quote.
    fn string_const(&mut self, coord: Coord) -> Option<Token> {
        let start = self.position;
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return Some(Token::StringConst(value, coord));
                }
                // The string pattern does not cross lines.
                Some('\n') | None => {
                    self.report(LexErrorKind::UnterminatedString, coord);
                    self.position = start + 1;
                    return None;
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }
    }

    /// Lex an integer or float literal starting at the current position.
    ///
    /// Floats require a decimal point (`[0-9]*.[0-9]+` or `[0-9]+.`).
    /// Integers are `0` or `[1-9][0-9]*`: a multi-digit literal with a
    /// leading zero is not a single token, so `0123` lexes as `0` followed
    /// by `123`. That quirk is part of the observed language.
    fn number_const(&mut self, coord: Coord) -> Token {
        let mut digits = String::new();
        let mut lookahead = self.position;
        while let Some(ch) = self.input.get(lookahead).copied() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                lookahead += 1;
            } else {
                break;
            }
        }

        if self.input.get(lookahead).copied() == Some('.') {
            // Float: leading digits (possibly none), a mandatory point, and
            // trailing digits (required when there are no leading digits).
            let mut text = digits;
            for _ in 0..text.len() {
                self.advance();
            }
            text.push('.');
            self.advance(); // the point
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() {
                    text.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            let value = text.parse::<f64>().unwrap_or(0.0);
            return Token::FloatConst(value, coord);
        }

        if digits.len() > 1 && digits.starts_with('0') {
            // Leading-zero quirk: only the '0' is consumed.
            self.advance();
            return Token::IntConst(0, coord);
        }

        let mut value: i64 = 0;
        for ch in digits.chars() {
            let d = (ch as u8 - b'0') as i64;
            value = value.saturating_mul(10).saturating_add(d);
            self.advance();
        }
        Token::IntConst(value, coord)
    }

    fn identifier_or_keyword(&mut self, coord: Coord) -> Token {
        let mut ident = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        match self.keywords.get(ident.as_str()) {
            Some(make) => make(coord),
            None => Token::Ident(ident, coord),
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip a `/* ... */` comment, which may span lines. An unterminated
    /// comment is reported at the opening `/*` and recovery resumes one
    /// character past it.
    fn skip_block_comment(&mut self) {
        let start = self.position;
        let start_line = self.line;
        let coord = self.coord_at(start);
        self.advance(); // '/'
        self.advance(); // '*'
        while self.peek().is_some() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
        self.report(LexErrorKind::UnterminatedComment, coord);
        self.position = start + 1;
        self.line = start_line;
    }

    fn report(&mut self, kind: LexErrorKind, coord: Coord) {
        let err = LexError {
            kind,
            line: coord.line,
            column: coord.column.unwrap_or(0),
        };
        (self.error_func)(&err);
    }

    /// Column of an absolute character offset: distance to the most recent
    /// newline before it (1-based when the offset starts a line).
    fn coord_at(&self, offset: usize) -> Coord {
        let mut last_cr: isize = -1;
        for i in (0..offset.min(self.input.len())).rev() {
            if self.input[i] == '\n' {
                last_cr = i as isize;
                break;
            }
        }
        let column = (offset as isize - last_cr) as usize;
        Coord::new(self.line, column)
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }
}
