//! Declaration productions
//!
//! Global declarations, type specifiers, declarators, parameter lists,
//! initializers, and function definitions. Declarators are parsed into a
//! flat [`Declarator`] descriptor and folded into a type chain by
//! `compose_declaration`; see `compose.rs` for the binding rules.

use super::ast::{Coord, Node};
use super::compose::{compose_declaration, Declarator, Modifier};
use super::lexer::Token;
use super::parse::{ParseError, Parser};

impl Parser {
    /// One global declaration: either a declaration proper or a function
    /// definition. The two share their prefix (specifier and first
    /// declarator), so the split happens after the declarator based on
    /// what follows it.
    pub(crate) fn global_declaration(&mut self) -> Result<Node, ParseError> {
        if !self.at_type_specifier() {
            // No specifier: either a function definition with an implicit
            // void return type, or an untyped declaration (which the
            // composer defaults to int for function declarators and
            // rejects otherwise).
            let declarator = self.declarator()?;
            if self.check(&Token::LBrace(Coord::line_only(0))) || self.at_type_specifier() {
                return self.function_definition(None, declarator);
            }
            let head_coord = declarator.head_coord();
            let decls = self.finish_declaration(None, declarator)?;
            let coord = decls.first().map(Node::coord).unwrap_or(head_coord);
            return Ok(Node::GlobalDecl { decls, coord });
        }

        let spec = self.type_specifier()?;
        let spec_coord = spec.coord();

        if self.check(&Token::Semicolon(Coord::line_only(0))) {
            // A bare specifier declares nothing, but is legal.
            self.advance();
            return Ok(Node::GlobalDecl {
                decls: Vec::new(),
                coord: spec_coord,
            });
        }

        let declarator = self.declarator()?;

        // A '{' or a K&R-style parameter declaration after the declarator
        // means this is a function definition, not a declaration.
        if self.check(&Token::LBrace(Coord::line_only(0))) || self.at_type_specifier() {
            return self.function_definition(Some(spec), declarator);
        }

        let decls = self.finish_declaration(Some(spec), declarator)?;
        let coord = decls.first().map(Node::coord).unwrap_or(spec_coord);
        Ok(Node::GlobalDecl { decls, coord })
    }

    /// `void`, `char`, `int`, or `float`, as a `Type` node.
    pub(crate) fn type_specifier(&mut self) -> Result<Node, ParseError> {
        let (name, coord) = match self.peek_token() {
            Token::Void(c) => ("void", c),
            Token::Char(c) => ("char", c),
            Token::Int(c) => ("int", c),
            Token::Float(c) => ("float", c),
            other => return Err(self.error_near(&other)),
        };
        self.advance();
        Ok(Node::Type {
            names: vec![name.to_string()],
            coord,
        })
    }

    /// A complete declaration starting at its specifier, for block items
    /// and `for` initializers. Returns the list of `Decl` nodes; a bare
    /// specifier (`int;`) yields an empty list.
    pub(crate) fn declaration(&mut self) -> Result<Vec<Node>, ParseError> {
        let spec = self.type_specifier()?;
        if self.match_token(&Token::Semicolon(Coord::line_only(0))) {
            return Ok(Vec::new());
        }
        let declarator = self.declarator()?;
        self.finish_declaration(Some(spec), declarator)
    }

    /// The init-declarator list after the first declarator has been read,
    /// through the closing semicolon. `spec` is `None` for an untyped
    /// declaration, which only the composer's defaulting rules can save.
    fn finish_declaration(
        &mut self,
        spec: Option<Node>,
        first: Declarator,
    ) -> Result<Vec<Node>, ParseError> {
        let spec: Vec<Node> = spec.into_iter().collect();
        let mut decls = Vec::new();
        let mut declarator = first;
        loop {
            let init = if self.match_token(&Token::Eq(Coord::line_only(0))) {
                Some(self.initializer()?)
            } else {
                None
            };
            decls.push(compose_declaration(&spec, declarator, init)?);
            if !self.match_token(&Token::Comma(Coord::line_only(0))) {
                break;
            }
            declarator = self.declarator()?;
        }
        self.expect(&Token::Semicolon(Coord::line_only(0)))?;
        Ok(decls)
    }

    /// A declarator: optional pointer prefix, then a direct declarator.
    ///
    /// Within one `*` group the rightmost star binds loosest, so the group
    /// is appended to the modifier list in reverse.
    pub(crate) fn declarator(&mut self) -> Result<Declarator, ParseError> {
        let mut star_coords = Vec::new();
        while let Token::Star(c) = self.peek_token() {
            star_coords.push(c);
            self.advance();
        }
        let mut declarator = self.direct_declarator()?;
        for coord in star_coords.into_iter().rev() {
            declarator.push_modifier(Modifier::Pointer { coord });
        }
        Ok(declarator)
    }

    /// A direct declarator: a name or a parenthesized declarator, followed
    /// by any number of array and function suffixes. Each suffix carries
    /// the coordinate of the chain it extends.
    fn direct_declarator(&mut self) -> Result<Declarator, ParseError> {
        let mut declarator = match self.peek_token() {
            Token::Ident(name, coord) => {
                self.advance();
                Declarator::new(name, coord)
            }
            Token::LParen(_) => {
                self.advance();
                let inner = self.declarator()?;
                self.expect(&Token::RParen(Coord::line_only(0)))?;
                inner
            }
            other => return Err(self.error_near(&other)),
        };

        loop {
            if self.match_token(&Token::LBracket(Coord::line_only(0))) {
                let dim = if self.check(&Token::RBracket(Coord::line_only(0))) {
                    None
                } else {
                    Some(self.constant_expression()?)
                };
                self.expect(&Token::RBracket(Coord::line_only(0)))?;
                let coord = declarator.head_coord();
                declarator.push_modifier(Modifier::Array { dim, coord });
            } else if self.match_token(&Token::LParen(Coord::line_only(0))) {
                let args = if self.check(&Token::RParen(Coord::line_only(0))) {
                    None
                } else if self.at_type_specifier() {
                    Some(self.parameter_list()?)
                } else {
                    Some(self.identifier_list()?)
                };
                self.expect(&Token::RParen(Coord::line_only(0)))?;
                let coord = declarator.head_coord();
                declarator.push_modifier(Modifier::Function { args, coord });
            } else {
                break;
            }
        }
        Ok(declarator)
    }

    /// `type declarator (, type declarator)*` as a `ParamList` whose
    /// parameters are fully composed `Decl` nodes.
    fn parameter_list(&mut self) -> Result<Node, ParseError> {
        let mut params = Vec::new();
        loop {
            let spec = self.type_specifier()?;
            let declarator = self.declarator()?;
            params.push(compose_declaration(&[spec], declarator, None)?);
            if !self.match_token(&Token::Comma(Coord::line_only(0))) {
                break;
            }
        }
        let coord = params[0].coord();
        Ok(Node::ParamList { params, coord })
    }

    /// K&R-style bare identifier list inside a function declarator, as a
    /// `ParamList` of `Id` nodes.
    fn identifier_list(&mut self) -> Result<Node, ParseError> {
        let mut params = Vec::new();
        loop {
            let (name, coord) = self.expect_identifier()?;
            params.push(Node::Id { name, coord });
            if !self.match_token(&Token::Comma(Coord::line_only(0))) {
                break;
            }
        }
        let coord = params[0].coord();
        Ok(Node::ParamList { params, coord })
    }

    /// An initializer: an assignment expression or a braced initializer
    /// list. A trailing comma before the closing brace is accepted, and
    /// `{}` yields an empty `InitList`.
    pub(crate) fn initializer(&mut self) -> Result<Node, ParseError> {
        if let Token::LBrace(brace_coord) = self.peek_token() {
            self.advance();
            if self.match_token(&Token::RBrace(Coord::line_only(0))) {
                return Ok(Node::InitList {
                    exprs: Vec::new(),
                    coord: brace_coord,
                });
            }
            let first = self.initializer()?;
            let coord = first.coord();
            let mut exprs = vec![first];
            while self.match_token(&Token::Comma(Coord::line_only(0))) {
                if self.check(&Token::RBrace(Coord::line_only(0))) {
                    break;
                }
                exprs.push(self.initializer()?);
            }
            self.expect(&Token::RBrace(Coord::line_only(0)))?;
            return Ok(Node::InitList { exprs, coord });
        }
        self.assignment_expression()
    }

    /// A function definition, after its specifier (if any) and declarator
    /// have been read. A missing specifier defaults the return type to
    /// void.
    fn function_definition(
        &mut self,
        spec: Option<Node>,
        declarator: Declarator,
    ) -> Result<Node, ParseError> {
        let spec = match spec {
            Some(spec) => spec,
            None => Node::Type {
                names: vec!["void".to_string()],
                coord: declarator.head_coord(),
            },
        };
        let decl = compose_declaration(&[spec.clone()], declarator, None)?;
        let coord = decl.coord();

        // K&R parameter declarations between the declarator and the body.
        let param_decls = if self.at_type_specifier() {
            let mut decls = Vec::new();
            while self.at_type_specifier() {
                decls.extend(self.declaration()?);
            }
            Some(decls)
        } else {
            None
        };

        let body = self.compound_statement()?;
        Ok(Node::FuncDef {
            spec: Box::new(spec),
            decl: Box::new(decl),
            param_decls,
            body: Box::new(body),
            coord,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::ConstValue;

    fn program(source: &str) -> Node {
        Parser::new(source).parse_program().unwrap()
    }

    fn first_gdecl(source: &str) -> Node {
        match program(source) {
            Node::Program { mut gdecls, .. } => gdecls.remove(0),
            _ => panic!("expected Program"),
        }
    }

    fn first_decl(source: &str) -> Node {
        match first_gdecl(source) {
            Node::GlobalDecl { mut decls, .. } => decls.remove(0),
            other => panic!("expected GlobalDecl, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_declaration() {
        let decl = first_decl("int x;");
        match decl {
            Node::Decl { name, ty, init, .. } => {
                assert_eq!(name, "x");
                assert!(init.is_none());
                assert!(matches!(*ty, Node::VarDecl { .. }));
            }
            _ => panic!("expected Decl"),
        }
    }

    #[test]
    fn test_multiple_declarators_share_the_specifier() {
        let gdecl = first_gdecl("int a, b = 2, *c;");
        let decls = match gdecl {
            Node::GlobalDecl { decls, .. } => decls,
            _ => panic!("expected GlobalDecl"),
        };
        assert_eq!(decls.len(), 3);
        assert!(matches!(decls[1], Node::Decl { ref init, .. } if init.is_some()));
        assert!(
            matches!(decls[2], Node::Decl { ref ty, .. } if matches!(**ty, Node::PtrDecl { .. }))
        );
    }

    #[test]
    fn test_bare_specifier_declares_nothing() {
        let gdecl = first_gdecl("int;");
        assert!(matches!(gdecl, Node::GlobalDecl { ref decls, .. } if decls.is_empty()));
    }

    #[test]
    fn test_array_of_pointers() {
        // The suffix binds before the pointer prefix.
        let decl = first_decl("int *a[5];");
        let ty = match decl {
            Node::Decl { ty, .. } => *ty,
            _ => panic!("expected Decl"),
        };
        match ty {
            Node::ArrayDecl { ty, dim, .. } => {
                assert!(matches!(
                    dim.as_deref(),
                    Some(Node::Constant { value: ConstValue::Int(5), .. })
                ));
                assert!(matches!(*ty, Node::PtrDecl { .. }));
            }
            other => panic!("expected ArrayDecl, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_pointer_declarator() {
        let decl = first_decl("int (*a)[5];");
        let ty = match decl {
            Node::Decl { ty, .. } => *ty,
            _ => panic!("expected Decl"),
        };
        assert!(matches!(
            ty,
            Node::PtrDecl { ref ty, .. } if matches!(**ty, Node::ArrayDecl { .. })
        ));
    }

    #[test]
    fn test_double_pointer() {
        let decl = first_decl("int **a;");
        let ty = match decl {
            Node::Decl { ty, .. } => *ty,
            _ => panic!("expected Decl"),
        };
        assert!(matches!(
            ty,
            Node::PtrDecl { ref ty, .. } if matches!(**ty, Node::PtrDecl { .. })
        ));
    }

    #[test]
    fn test_unsized_array_with_init_list() {
        let decl = first_decl("int v[] = {1, 2, 3};");
        match decl {
            Node::Decl { ty, init, .. } => {
                assert!(matches!(*ty, Node::ArrayDecl { ref dim, .. } if dim.is_none()));
                match init.as_deref() {
                    Some(Node::InitList { exprs, .. }) => assert_eq!(exprs.len(), 3),
                    other => panic!("expected InitList, got {:?}", other),
                }
            }
            _ => panic!("expected Decl"),
        }
    }

    #[test]
    fn test_empty_and_trailing_comma_init_lists() {
        let decl = first_decl("int v[] = {};");
        assert!(matches!(
            decl,
            Node::Decl { ref init, .. }
                if matches!(init.as_deref(), Some(Node::InitList { exprs, .. }) if exprs.is_empty())
        ));

        let decl = first_decl("int w[] = {1, 2,};");
        assert!(matches!(
            decl,
            Node::Decl { ref init, .. }
                if matches!(init.as_deref(), Some(Node::InitList { exprs, .. }) if exprs.len() == 2)
        ));
    }

    #[test]
    fn test_function_definition() {
        let fd = first_gdecl("int main() { return 0; }");
        match fd {
            Node::FuncDef { spec, decl, param_decls, body, .. } => {
                assert!(matches!(*spec, Node::Type { ref names, .. } if names == &["int"]));
                assert!(param_decls.is_none());
                assert!(matches!(*body, Node::Compound { .. }));
                assert!(
                    matches!(*decl, Node::Decl { ref ty, .. } if matches!(**ty, Node::FuncDecl { .. }))
                );
            }
            other => panic!("expected FuncDef, got {:?}", other),
        }
    }

    #[test]
    fn test_untyped_function_definition_defaults_to_void() {
        let fd = first_gdecl("main() { return; }");
        match fd {
            Node::FuncDef { spec, .. } => {
                assert!(matches!(*spec, Node::Type { ref names, .. } if names == &["void"]));
            }
            other => panic!("expected FuncDef, got {:?}", other),
        }
    }

    #[test]
    fn test_typed_parameters() {
        let fd = first_gdecl("int add(int a, int b) { return a + b; }");
        let decl = match fd {
            Node::FuncDef { decl, .. } => *decl,
            other => panic!("expected FuncDef, got {:?}", other),
        };
        let func = match decl {
            Node::Decl { ty, .. } => *ty,
            _ => panic!("expected Decl"),
        };
        match func {
            Node::FuncDecl { args, .. } => match args.as_deref() {
                Some(Node::ParamList { params, .. }) => {
                    assert_eq!(params.len(), 2);
                    assert!(matches!(params[0], Node::Decl { ref name, .. } if name == "a"));
                }
                other => panic!("expected ParamList, got {:?}", other),
            },
            other => panic!("expected FuncDecl, got {:?}", other),
        }
    }

    #[test]
    fn test_knr_parameter_declarations() {
        let fd = first_gdecl("int f(a, b) int a; int b; { return a; }");
        match fd {
            Node::FuncDef { decl, param_decls, .. } => {
                let func = match *decl {
                    Node::Decl { ty, .. } => *ty,
                    _ => panic!("expected Decl"),
                };
                match func {
                    Node::FuncDecl { args, .. } => {
                        assert!(matches!(
                            args.as_deref(),
                            Some(Node::ParamList { params, .. }) if params.len() == 2
                        ));
                    }
                    other => panic!("expected FuncDecl, got {:?}", other),
                }
                assert_eq!(param_decls.map(|d| d.len()), Some(2));
            }
            other => panic!("expected FuncDef, got {:?}", other),
        }
    }

    #[test]
    fn test_untyped_declaration_is_missing_its_type() {
        let err = Parser::new("*p;").parse_program().unwrap_err();
        assert_eq!(err.message, "Missing type in declaration");
    }

    #[test]
    fn test_untyped_prototype_defaults_to_int() {
        let decl = first_decl("f();");
        match decl {
            Node::Decl { ty, .. } => match *ty {
                Node::FuncDecl { ty, .. } => match *ty {
                    Node::VarDecl { ty, .. } => {
                        assert!(matches!(*ty, Node::Type { ref names, .. } if names == &["int"]));
                    }
                    other => panic!("expected VarDecl leaf, got {:?}", other),
                },
                other => panic!("expected FuncDecl, got {:?}", other),
            },
            _ => panic!("expected Decl"),
        }
    }
}
