//! Statement productions
//!
//! Compound statements, control flow, and the uC built-in statements
//! (`assert`, `print`, `read`). Expression statements have no wrapper
//! node: the expression itself is the statement.

use super::ast::{Coord, Node};
use super::lexer::Token;
use super::parse::{ParseError, Parser};

impl Parser {
    pub(crate) fn statement(&mut self) -> Result<Node, ParseError> {
        match self.peek_token() {
            Token::LBrace(_) => self.compound_statement(),
            Token::If(_) => self.if_statement(),
            Token::While(_) => self.while_statement(),
            Token::For(_) => self.for_statement(),
            Token::Break(coord) => {
                self.advance();
                self.expect(&Token::Semicolon(Coord::line_only(0)))?;
                Ok(Node::Break { coord })
            }
            Token::Return(coord) => {
                self.advance();
                let expr = if self.check(&Token::Semicolon(Coord::line_only(0))) {
                    None
                } else {
                    Some(Box::new(self.expression()?))
                };
                self.expect(&Token::Semicolon(Coord::line_only(0)))?;
                Ok(Node::Return { expr, coord })
            }
            Token::Assert(coord) => {
                self.advance();
                let expr = Box::new(self.expression()?);
                self.expect(&Token::Semicolon(Coord::line_only(0)))?;
                Ok(Node::Assert { expr, coord })
            }
            Token::Print(coord) => {
                self.advance();
                self.expect(&Token::LParen(Coord::line_only(0)))?;
                let expr = if self.check(&Token::RParen(Coord::line_only(0))) {
                    None
                } else {
                    Some(Box::new(self.expression()?))
                };
                self.expect(&Token::RParen(Coord::line_only(0)))?;
                self.expect(&Token::Semicolon(Coord::line_only(0)))?;
                Ok(Node::Print { expr, coord })
            }
            Token::Read(coord) => {
                self.advance();
                self.expect(&Token::LParen(Coord::line_only(0)))?;
                let args = Box::new(self.argument_expression()?);
                self.expect(&Token::RParen(Coord::line_only(0)))?;
                self.expect(&Token::Semicolon(Coord::line_only(0)))?;
                Ok(Node::Read { args, coord })
            }
            Token::Semicolon(coord) => {
                self.advance();
                Ok(Node::EmptyStatement { coord })
            }
            _ => {
                let expr = self.expression()?;
                self.expect(&Token::Semicolon(Coord::line_only(0)))?;
                Ok(expr)
            }
        }
    }

    /// A braced block. Declarations among the block items contribute their
    /// `Decl` nodes directly (a multi-declarator declaration flattens into
    /// several items). The block's coordinate keeps the opening brace's
    /// line but pins the column to 1.
    pub(crate) fn compound_statement(&mut self) -> Result<Node, ParseError> {
        let brace = self.expect(&Token::LBrace(Coord::line_only(0)))?;
        let coord = Coord::new(brace.coord().line, 1);
        let mut items = Vec::new();
        while !self.check(&Token::RBrace(Coord::line_only(0))) {
            if self.is_at_end() {
                return Err(self.error_near(&self.peek_token()));
            }
            if self.at_type_specifier() {
                items.extend(self.declaration()?);
            } else {
                items.push(self.statement()?);
            }
        }
        self.advance(); // closing brace
        Ok(Node::Compound { items, coord })
    }

    fn if_statement(&mut self) -> Result<Node, ParseError> {
        let coord = self.advance().coord();
        self.expect(&Token::LParen(Coord::line_only(0)))?;
        let cond = Box::new(self.expression()?);
        self.expect(&Token::RParen(Coord::line_only(0)))?;
        let iftrue = Box::new(self.statement()?);
        let iffalse = if self.match_token(&Token::Else(Coord::line_only(0))) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Node::If {
            cond,
            iftrue,
            iffalse,
            coord,
        })
    }

    fn while_statement(&mut self) -> Result<Node, ParseError> {
        let coord = self.advance().coord();
        self.expect(&Token::LParen(Coord::line_only(0)))?;
        let cond = Box::new(self.expression()?);
        self.expect(&Token::RParen(Coord::line_only(0)))?;
        let body = Box::new(self.statement()?);
        Ok(Node::While { cond, body, coord })
    }

    /// Both `for` forms: a declaration initializer becomes a `DeclList`
    /// carrying the `for` keyword's coordinate.
    fn for_statement(&mut self) -> Result<Node, ParseError> {
        let coord = self.advance().coord();
        self.expect(&Token::LParen(Coord::line_only(0)))?;

        let init = if self.at_type_specifier() {
            let decls = self.declaration()?; // consumes the semicolon
            Some(Box::new(Node::DeclList { decls, coord }))
        } else if self.match_token(&Token::Semicolon(Coord::line_only(0))) {
            None
        } else {
            let expr = self.expression()?;
            self.expect(&Token::Semicolon(Coord::line_only(0)))?;
            Some(Box::new(expr))
        };

        let cond = if self.check(&Token::Semicolon(Coord::line_only(0))) {
            None
        } else {
            Some(Box::new(self.expression()?))
        };
        self.expect(&Token::Semicolon(Coord::line_only(0)))?;

        let next = if self.check(&Token::RParen(Coord::line_only(0))) {
            None
        } else {
            Some(Box::new(self.expression()?))
        };
        self.expect(&Token::RParen(Coord::line_only(0)))?;

        let body = Box::new(self.statement()?);
        Ok(Node::For {
            init,
            cond,
            next,
            body,
            coord,
        })
    }
}
