//! Expression productions
//!
//! One method per precedence level, from the comma operator down to
//! primary expressions. Binary operators are all left-associative;
//! assignment is right-associative and only accepted when its left side
//! has an lvalue shape.

use super::ast::{AssignOp, BinOp, ConstValue, Coord, Node, UnOp};
use super::lexer::Token;
use super::parse::{ParseError, Parser};

impl Parser {
    /// Full expression, including the comma operator. A lone expression
    /// stays bare; only an actual comma creates an `ExprList`.
    pub(crate) fn expression(&mut self) -> Result<Node, ParseError> {
        let first = self.assignment_expression()?;
        if !matches!(self.peek(), Token::Comma(_)) {
            return Ok(first);
        }
        let coord = first.coord();
        let mut exprs = vec![first];
        while self.match_token(&Token::Comma(Coord::line_only(0))) {
            exprs.push(self.assignment_expression()?);
        }
        Ok(Node::ExprList { exprs, coord })
    }

    /// Assignment, right-associative. The left side must be lvalue-shaped
    /// (an identifier, array reference, or dereference); anything else in
    /// front of an assignment operator is a syntax error at that operator.
    pub(crate) fn assignment_expression(&mut self) -> Result<Node, ParseError> {
        let lhs = self.logical_or_expression()?;
        let op = match self.peek() {
            Token::Eq(_) => AssignOp::Assign,
            Token::StarEq(_) => AssignOp::MulAssign,
            Token::SlashEq(_) => AssignOp::DivAssign,
            Token::PercentEq(_) => AssignOp::ModAssign,
            Token::PlusEq(_) => AssignOp::AddAssign,
            Token::MinusEq(_) => AssignOp::SubAssign,
            _ => return Ok(lhs),
        };
        if !is_lvalue_shaped(&lhs) {
            return Err(self.error_near(&self.peek_token()));
        }
        self.advance();
        let rvalue = self.assignment_expression()?;
        let coord = lhs.coord();
        Ok(Node::Assignment {
            op,
            lvalue: Box::new(lhs),
            rvalue: Box::new(rvalue),
            coord,
        })
    }

    /// Array dimensions and other constant positions: binary expressions
    /// only, no assignment and no comma operator.
    pub(crate) fn constant_expression(&mut self) -> Result<Node, ParseError> {
        self.logical_or_expression()
    }

    fn logical_or_expression(&mut self) -> Result<Node, ParseError> {
        let mut left = self.logical_and_expression()?;
        while matches!(self.peek(), Token::OrOr(_)) {
            self.advance();
            let right = self.logical_and_expression()?;
            left = binary(BinOp::Or, left, right);
        }
        Ok(left)
    }

    fn logical_and_expression(&mut self) -> Result<Node, ParseError> {
        let mut left = self.equality_expression()?;
        while matches!(self.peek(), Token::AndAnd(_)) {
            self.advance();
            let right = self.equality_expression()?;
            left = binary(BinOp::And, left, right);
        }
        Ok(left)
    }

    fn equality_expression(&mut self) -> Result<Node, ParseError> {
        let mut left = self.relational_expression()?;
        loop {
            let op = match self.peek() {
                Token::EqEq(_) => BinOp::Eq,
                Token::NotEq(_) => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.relational_expression()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn relational_expression(&mut self) -> Result<Node, ParseError> {
        let mut left = self.additive_expression()?;
        loop {
            let op = match self.peek() {
                Token::Lt(_) => BinOp::Lt,
                Token::Le(_) => BinOp::Le,
                Token::Gt(_) => BinOp::Gt,
                Token::Ge(_) => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.additive_expression()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn additive_expression(&mut self) -> Result<Node, ParseError> {
        let mut left = self.multiplicative_expression()?;
        loop {
            let op = match self.peek() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.multiplicative_expression()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn multiplicative_expression(&mut self) -> Result<Node, ParseError> {
        let mut left = self.cast_expression()?;
        loop {
            let op = match self.peek() {
                Token::Star(_) => BinOp::Mul,
                Token::Slash(_) => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.cast_expression()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// `(type) expr` casts. A parenthesis only opens a cast when a type
    /// keyword follows it; otherwise it belongs to a primary expression.
    fn cast_expression(&mut self) -> Result<Node, ParseError> {
        if matches!(self.peek(), Token::LParen(_))
            && matches!(
                self.peek_ahead(1),
                Token::Void(_) | Token::Char(_) | Token::Int(_) | Token::Float(_)
            )
        {
            let coord = self.advance().coord(); // '('
            let new_ty = self.type_specifier()?;
            self.expect(&Token::RParen(Coord::line_only(0)))?;
            let expr = self.cast_expression()?;
            return Ok(Node::Cast {
                new_ty: Box::new(new_ty),
                expr: Box::new(expr),
                coord,
            });
        }
        self.unary_expression()
    }

    /// Prefix operators. Unary nodes take the coordinate of their operand.
    fn unary_expression(&mut self) -> Result<Node, ParseError> {
        let op = match self.peek() {
            Token::PlusPlus(_) => Some(UnOp::PreInc),
            Token::MinusMinus(_) => Some(UnOp::PreDec),
            Token::Amp(_) => Some(UnOp::AddrOf),
            Token::Star(_) => Some(UnOp::Deref),
            Token::Plus(_) => Some(UnOp::Plus),
            Token::Minus(_) => Some(UnOp::Neg),
            Token::Bang(_) => Some(UnOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let expr = match op {
                UnOp::PreInc | UnOp::PreDec => self.unary_expression()?,
                _ => self.cast_expression()?,
            };
            let coord = expr.coord();
            return Ok(Node::UnaryOp {
                op,
                expr: Box::new(expr),
                coord,
            });
        }
        self.postfix_expression()
    }

    /// Postfix suffixes: calls, subscripts, and `++`/`--`.
    fn postfix_expression(&mut self) -> Result<Node, ParseError> {
        let mut expr = self.primary_expression()?;
        loop {
            match self.peek() {
                Token::LBracket(_) => {
                    self.advance();
                    let subscript = self.expression()?;
                    self.expect(&Token::RBracket(Coord::line_only(0)))?;
                    let coord = expr.coord();
                    expr = Node::ArrayRef {
                        array: Box::new(expr),
                        subscript: Box::new(subscript),
                        coord,
                    };
                }
                Token::LParen(_) => {
                    self.advance();
                    let args = if matches!(self.peek(), Token::RParen(_)) {
                        None
                    } else {
                        Some(Box::new(self.argument_expression()?))
                    };
                    self.expect(&Token::RParen(Coord::line_only(0)))?;
                    let coord = expr.coord();
                    expr = Node::FuncCall {
                        callee: Box::new(expr),
                        args,
                        coord,
                    };
                }
                Token::PlusPlus(_) => {
                    self.advance();
                    let coord = expr.coord();
                    expr = Node::UnaryOp {
                        op: UnOp::PostInc,
                        expr: Box::new(expr),
                        coord,
                    };
                }
                Token::MinusMinus(_) => {
                    self.advance();
                    let coord = expr.coord();
                    expr = Node::UnaryOp {
                        op: UnOp::PostDec,
                        expr: Box::new(expr),
                        coord,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Call and `read` arguments: a single argument stays bare, two or
    /// more become an `ExprList`.
    pub(crate) fn argument_expression(&mut self) -> Result<Node, ParseError> {
        let first = self.assignment_expression()?;
        if !matches!(self.peek(), Token::Comma(_)) {
            return Ok(first);
        }
        let coord = first.coord();
        let mut exprs = vec![first];
        while self.match_token(&Token::Comma(Coord::line_only(0))) {
            exprs.push(self.assignment_expression()?);
        }
        Ok(Node::ExprList { exprs, coord })
    }

    fn primary_expression(&mut self) -> Result<Node, ParseError> {
        match self.peek_token() {
            Token::Ident(name, coord) => {
                self.advance();
                Ok(Node::Id { name, coord })
            }
            Token::IntConst(value, coord) => {
                self.advance();
                Ok(Node::Constant {
                    value: ConstValue::Int(value),
                    coord,
                })
            }
            Token::FloatConst(value, coord) => {
                self.advance();
                Ok(Node::Constant {
                    value: ConstValue::Float(value),
                    coord,
                })
            }
            Token::StringConst(value, coord) => {
                self.advance();
                Ok(Node::Constant {
                    value: ConstValue::Str(value),
                    coord,
                })
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.expression()?;
                self.expect(&Token::RParen(Coord::line_only(0)))?;
                Ok(expr)
            }
            other => Err(self.error_near(&other)),
        }
    }
}

fn binary(op: BinOp, left: Node, right: Node) -> Node {
    let coord = left.coord();
    Node::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
        coord,
    }
}

fn is_lvalue_shaped(node: &Node) -> bool {
    matches!(
        node,
        Node::Id { .. }
            | Node::ArrayRef { .. }
            | Node::UnaryOp { op: UnOp::Deref, .. }
    )
}
