//! Declarator composition
//!
//! A uC declaration splits into a type specifier (`int`) and a declarator
//! (`*a[5]`) whose modifiers nest in C's famously awkward order: suffix
//! operators (`[]`, `()`) bind before a pointer prefix unless parentheses
//! say otherwise. The parser collects the modifiers of one declarator into
//! a flat, outermost-first list; [`compose_declaration`] then folds that
//! list together with the specifier into a single immutable type chain and
//! binds the declared name.
//!
//! Appending a modifier places it directly above the name leaf, so the
//! list grows innermost-last; the final chain is built once, innermost to
//! outermost, and never mutated afterwards.

use super::ast::{Coord, Node};
use super::parse::ParseError;

/// One declarator modifier, in source order of meaning rather than of
/// appearance.
#[derive(Debug, Clone)]
pub(crate) enum Modifier {
    Pointer { coord: Coord },
    Array { dim: Option<Node>, coord: Coord },
    Function { args: Option<Node>, coord: Coord },
}

/// A parsed declarator: the declared name plus its modifier list, ordered
/// outermost-first. Appending a modifier makes it bind tightest, which is
/// exactly the splice rule of the declaration grammar.
#[derive(Debug, Clone)]
pub(crate) struct Declarator {
    pub name: String,
    pub name_coord: Coord,
    pub modifiers: Vec<Modifier>,
}

impl Declarator {
    pub fn new(name: String, name_coord: Coord) -> Self {
        Self {
            name,
            name_coord,
            modifiers: Vec::new(),
        }
    }

    /// Coordinate of the chain head: the outermost modifier, or the name
    /// itself for a bare identifier declarator.
    pub fn head_coord(&self) -> Coord {
        match self.modifiers.first() {
            Some(Modifier::Pointer { coord })
            | Some(Modifier::Array { coord, .. })
            | Some(Modifier::Function { coord, .. }) => *coord,
            None => self.name_coord,
        }
    }

    /// Append a modifier so that it binds directly above the name leaf.
    pub fn push_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }
}

/// Fold a type-specifier list and a declarator into a `Decl` node.
///
/// The specifier list holds the basic `Type` nodes of the declaration
/// (the grammar produces at most one). An empty list is only legal for a
/// function declarator, whose base type then defaults to `int`; note that
/// an untyped function *definition* never reaches this default because the
/// definition production substitutes a `void` specifier first. The two
/// defaults are intentionally distinct.
pub(crate) fn compose_declaration(
    spec: &[Node],
    declarator: Declarator,
    init: Option<Node>,
) -> Result<Node, ParseError> {
    let decl_coord = declarator.head_coord();
    let base = base_type(spec, &declarator, decl_coord)?;

    let mut ty = Node::VarDecl {
        name: declarator.name.clone(),
        ty: Box::new(base),
        coord: declarator.name_coord,
    };
    for modifier in declarator.modifiers.into_iter().rev() {
        ty = match modifier {
            Modifier::Pointer { coord } => Node::PtrDecl {
                ty: Box::new(ty),
                coord,
            },
            Modifier::Array { dim, coord } => Node::ArrayDecl {
                ty: Box::new(ty),
                dim: dim.map(Box::new),
                coord,
            },
            Modifier::Function { args, coord } => Node::FuncDecl {
                args: args.map(Box::new),
                ty: Box::new(ty),
                coord,
            },
        };
    }

    Ok(Node::Decl {
        name: declarator.name,
        ty: Box::new(ty),
        init: init.map(Box::new),
        coord: decl_coord,
    })
}

fn base_type(spec: &[Node], declarator: &Declarator, decl_coord: Coord) -> Result<Node, ParseError> {
    for node in spec {
        if !matches!(node, Node::Type { .. }) {
            if spec.len() > 1 {
                return Err(ParseError {
                    message: "Invalid multiple types specified".to_string(),
                    coord: node.coord(),
                });
            }
            return Ok(node.clone());
        }
    }

    if spec.is_empty() {
        // Only a function declarator may omit its specifier; it then
        // defaults to returning int.
        if !matches!(declarator.modifiers.first(), Some(Modifier::Function { .. })) {
            return Err(ParseError {
                message: "Missing type in declaration".to_string(),
                coord: decl_coord,
            });
        }
        return Ok(Node::Type {
            names: vec!["int".to_string()],
            coord: decl_coord,
        });
    }

    // A single basic specifier: the declaration's base type keeps the
    // specifier's first name and coordinate.
    match &spec[0] {
        Node::Type { names, coord } => Ok(Node::Type {
            names: vec![names[0].clone()],
            coord: *coord,
        }),
        _ => unreachable!("non-Type specifiers are handled above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::ConstValue;

    fn int_type() -> Node {
        Node::Type {
            names: vec!["int".to_string()],
            coord: Coord::new(1, 1),
        }
    }

    fn dim(v: i64) -> Node {
        Node::Constant {
            value: ConstValue::Int(v),
            coord: Coord::new(1, 1),
        }
    }

    #[test]
    fn test_bare_identifier() {
        let d = Declarator::new("x".to_string(), Coord::new(1, 5));
        let decl = compose_declaration(&[int_type()], d, None).unwrap();
        match decl {
            Node::Decl { name, ty, init, .. } => {
                assert_eq!(name, "x");
                assert!(init.is_none());
                match *ty {
                    Node::VarDecl { ref name, ref ty, .. } => {
                        assert_eq!(name, "x");
                        assert!(
                            matches!(**ty, Node::Type { ref names, .. } if names == &["int"])
                        );
                    }
                    _ => panic!("expected VarDecl leaf"),
                }
            }
            _ => panic!("expected Decl"),
        }
    }

    #[test]
    fn test_array_of_pointer() {
        // int *a[5]; => ArrayDecl(dim=5, PtrDecl(VarDecl(a, int)))
        let mut d = Declarator::new("a".to_string(), Coord::new(1, 6));
        d.push_modifier(Modifier::Array {
            dim: Some(dim(5)),
            coord: Coord::new(1, 6),
        });
        d.push_modifier(Modifier::Pointer {
            coord: Coord::new(1, 5),
        });
        let decl = compose_declaration(&[int_type()], d, None).unwrap();
        let ty = match decl {
            Node::Decl { ty, .. } => *ty,
            _ => panic!("expected Decl"),
        };
        let inner = match ty {
            Node::ArrayDecl { ty, dim, .. } => {
                assert!(matches!(
                    dim.as_deref(),
                    Some(Node::Constant { value: ConstValue::Int(5), .. })
                ));
                *ty
            }
            other => panic!("expected ArrayDecl at the head, got {:?}", other),
        };
        let leaf = match inner {
            Node::PtrDecl { ty, .. } => *ty,
            other => panic!("expected PtrDecl under the array, got {:?}", other),
        };
        assert!(matches!(leaf, Node::VarDecl { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_pointer_to_array() {
        // int (*a)[5]; => PtrDecl(ArrayDecl(dim=5, VarDecl(a, int)))
        let mut d = Declarator::new("a".to_string(), Coord::new(1, 7));
        d.push_modifier(Modifier::Pointer {
            coord: Coord::new(1, 6),
        });
        d.push_modifier(Modifier::Array {
            dim: Some(dim(5)),
            coord: Coord::new(1, 6),
        });
        let decl = compose_declaration(&[int_type()], d, None).unwrap();
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
    fn test_invalid_multiple_types() {
        // A second, non-Type specifier entry poisons the declaration; the
        // error points at the stray node.
        let stray = Node::Id {
            name: "x".to_string(),
            coord: Coord::new(3, 9),
        };
        let d = Declarator::new("v".to_string(), Coord::new(3, 1));
        let err = compose_declaration(&[int_type(), stray], d, None).unwrap_err();
        assert_eq!(err.message, "Invalid multiple types specified");
        assert_eq!(err.coord, Coord::new(3, 9));
    }

    #[test]
    fn test_missing_type_in_declaration() {
        let d = Declarator::new("x".to_string(), Coord::new(2, 1));
        let err = compose_declaration(&[], d, None).unwrap_err();
        assert_eq!(err.message, "Missing type in declaration");
        assert_eq!(err.coord.line, 2);
    }

    #[test]
    fn test_function_declarator_defaults_to_int() {
        let mut d = Declarator::new("f".to_string(), Coord::new(1, 1));
        d.push_modifier(Modifier::Function {
            args: None,
            coord: Coord::new(1, 1),
        });
        let decl = compose_declaration(&[], d, None).unwrap();
        let leaf_ty = match decl {
            Node::Decl { ty, .. } => match *ty {
                Node::FuncDecl { ty, .. } => match *ty {
                    Node::VarDecl { ty, .. } => *ty,
                    other => panic!("expected VarDecl leaf, got {:?}", other),
                },
                other => panic!("expected FuncDecl head, got {:?}", other),
            },
            _ => panic!("expected Decl"),
        };
        assert!(matches!(leaf_ty, Node::Type { ref names, .. } if names == &["int"]));
    }
}
