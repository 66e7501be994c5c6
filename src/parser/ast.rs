// AST (Abstract Syntax Tree) definitions for the uC front end

use std::fmt;

/// Source coordinate of a syntactic element: a line number and, for
/// elements produced from a concrete token, a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coord {
    pub line: usize,
    pub column: Option<usize>,
}

impl Coord {
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column: Some(column),
        }
    }

    pub fn line_only(line: usize) -> Self {
        Self { line, column: None }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(col) => write!(f, "   @ {}:{}", self.line, col),
            None => write!(f, "   @ {}", self.line),
        }
    }
}

/// Binary operators, in the spelling the grammar uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `%` never survives lexing in uC (only `%=` is a token), so this
    /// variant is carried for the precedence table but never parsed.
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        };
        f.write_str(s)
    }
}

/// Unary operators. The postfix increment/decrement forms display with a
/// `p` prefix (`p++`, `p--`) to keep them distinct from the prefix forms
/// in tree dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    AddrOf,  // &x
    Deref,   // *x
    Plus,    // +x
    Neg,     // -x
    Not,     // !x
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnOp::AddrOf => "&",
            UnOp::Deref => "*",
            UnOp::Plus => "+",
            UnOp::Neg => "-",
            UnOp::Not => "!",
            UnOp::PreInc => "++",
            UnOp::PreDec => "--",
            UnOp::PostInc => "p++",
            UnOp::PostDec => "p--",
        };
        f.write_str(s)
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,    // =
    MulAssign, // *=
    DivAssign, // /=
    ModAssign, // %=
    AddAssign, // +=
    SubAssign, // -=
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssignOp::Assign => "=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
        };
        f.write_str(s)
    }
}

/// Semantic value of a literal constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ConstValue {
    /// Kind name as shown in tree dumps.
    pub fn kind(&self) -> &'static str {
        match self {
            ConstValue::Int(_) => "int",
            ConstValue::Float(_) => "float",
            ConstValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(v) => write!(f, "{}", v),
            ConstValue::Float(v) => write!(f, "{:?}", v),
            ConstValue::Str(v) => write!(f, "{}", v),
        }
    }
}

/// AST nodes for uC programs.
///
/// The tree is built once by the parser and never mutated afterwards.
/// Declarator chains (`PtrDecl`/`ArrayDecl`/`FuncDecl`) always terminate in
/// exactly one `VarDecl` leaf whose `ty` holds the base `Type`.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Program {
        gdecls: Vec<Node>,
        coord: Coord,
    },
    /// Wraps one file-scope declaration. A single declaration statement can
    /// declare several names, hence the list.
    GlobalDecl {
        decls: Vec<Node>,
        coord: Coord,
    },
    Decl {
        name: String,
        ty: Box<Node>,
        init: Option<Box<Node>>,
        coord: Coord,
    },
    FuncDef {
        spec: Box<Node>,
        decl: Box<Node>,
        param_decls: Option<Vec<Node>>,
        body: Box<Node>,
        coord: Coord,
    },
    VarDecl {
        name: String,
        ty: Box<Node>,
        coord: Coord,
    },
    PtrDecl {
        ty: Box<Node>,
        coord: Coord,
    },
    ArrayDecl {
        ty: Box<Node>,
        dim: Option<Box<Node>>,
        coord: Coord,
    },
    FuncDecl {
        args: Option<Box<Node>>,
        ty: Box<Node>,
        coord: Coord,
    },
    ParamList {
        params: Vec<Node>,
        coord: Coord,
    },
    DeclList {
        decls: Vec<Node>,
        coord: Coord,
    },
    Type {
        names: Vec<String>,
        coord: Coord,
    },
    Constant {
        value: ConstValue,
        coord: Coord,
    },
    Id {
        name: String,
        coord: Coord,
    },
    Assignment {
        op: AssignOp,
        lvalue: Box<Node>,
        rvalue: Box<Node>,
        coord: Coord,
    },
    UnaryOp {
        op: UnOp,
        expr: Box<Node>,
        coord: Coord,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
        coord: Coord,
    },
    Cast {
        new_ty: Box<Node>,
        expr: Box<Node>,
        coord: Coord,
    },
    ExprList {
        exprs: Vec<Node>,
        coord: Coord,
    },
    InitList {
        exprs: Vec<Node>,
        coord: Coord,
    },
    FuncCall {
        callee: Box<Node>,
        args: Option<Box<Node>>,
        coord: Coord,
    },
    ArrayRef {
        array: Box<Node>,
        subscript: Box<Node>,
        coord: Coord,
    },
    Compound {
        items: Vec<Node>,
        coord: Coord,
    },
    If {
        cond: Box<Node>,
        iftrue: Box<Node>,
        iffalse: Option<Box<Node>>,
        coord: Coord,
    },
    While {
        cond: Box<Node>,
        body: Box<Node>,
        coord: Coord,
    },
    For {
        init: Option<Box<Node>>,
        cond: Option<Box<Node>>,
        next: Option<Box<Node>>,
        body: Box<Node>,
        coord: Coord,
    },
    Break {
        coord: Coord,
    },
    Return {
        expr: Option<Box<Node>>,
        coord: Coord,
    },
    Assert {
        expr: Box<Node>,
        coord: Coord,
    },
    Print {
        expr: Option<Box<Node>>,
        coord: Coord,
    },
    Read {
        args: Box<Node>,
        coord: Coord,
    },
    EmptyStatement {
        coord: Coord,
    },
}

/// Configuration for [`Node::show`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowOptions {
    /// Show attributes as `name=value` pairs instead of bare values.
    pub attr_names: bool,
    /// Show each child's field name next to its node name.
    pub node_names: bool,
    /// Append each node's coordinate.
    pub show_coord: bool,
}

impl Node {
    /// Variant name as shown in tree dumps.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Program { .. } => "Program",
            Node::GlobalDecl { .. } => "GlobalDecl",
            Node::Decl { .. } => "Decl",
            Node::FuncDef { .. } => "FuncDef",
            Node::VarDecl { .. } => "VarDecl",
            Node::PtrDecl { .. } => "PtrDecl",
            Node::ArrayDecl { .. } => "ArrayDecl",
            Node::FuncDecl { .. } => "FuncDecl",
            Node::ParamList { .. } => "ParamList",
            Node::DeclList { .. } => "DeclList",
            Node::Type { .. } => "Type",
            Node::Constant { .. } => "Constant",
            Node::Id { .. } => "ID",
            Node::Assignment { .. } => "Assignment",
            Node::UnaryOp { .. } => "UnaryOp",
            Node::BinaryOp { .. } => "BinaryOp",
            Node::Cast { .. } => "Cast",
            Node::ExprList { .. } => "ExprList",
            Node::InitList { .. } => "InitList",
            Node::FuncCall { .. } => "FuncCall",
            Node::ArrayRef { .. } => "ArrayRef",
            Node::Compound { .. } => "Compound",
            Node::If { .. } => "If",
            Node::While { .. } => "While",
            Node::For { .. } => "For",
            Node::Break { .. } => "Break",
            Node::Return { .. } => "Return",
            Node::Assert { .. } => "Assert",
            Node::Print { .. } => "Print",
            Node::Read { .. } => "Read",
            Node::EmptyStatement { .. } => "EmptyStatement",
        }
    }

    /// Source coordinate of this node.
    pub fn coord(&self) -> Coord {
        match self {
            Node::Program { coord, .. }
            | Node::GlobalDecl { coord, .. }
            | Node::Decl { coord, .. }
            | Node::FuncDef { coord, .. }
            | Node::VarDecl { coord, .. }
            | Node::PtrDecl { coord, .. }
            | Node::ArrayDecl { coord, .. }
            | Node::FuncDecl { coord, .. }
            | Node::ParamList { coord, .. }
            | Node::DeclList { coord, .. }
            | Node::Type { coord, .. }
            | Node::Constant { coord, .. }
            | Node::Id { coord, .. }
            | Node::Assignment { coord, .. }
            | Node::UnaryOp { coord, .. }
            | Node::BinaryOp { coord, .. }
            | Node::Cast { coord, .. }
            | Node::ExprList { coord, .. }
            | Node::InitList { coord, .. }
            | Node::FuncCall { coord, .. }
            | Node::ArrayRef { coord, .. }
            | Node::Compound { coord, .. }
            | Node::If { coord, .. }
            | Node::While { coord, .. }
            | Node::For { coord, .. }
            | Node::Break { coord, .. }
            | Node::Return { coord, .. }
            | Node::Assert { coord, .. }
            | Node::Print { coord, .. }
            | Node::Read { coord, .. }
            | Node::EmptyStatement { coord, .. } => *coord,
        }
    }

    /// Displayed attributes of this node as `(name, rendered value)` pairs.
    pub fn display_attrs(&self) -> Vec<(&'static str, String)> {
        match self {
            Node::Decl { name, .. } => vec![("name", name.clone())],
            Node::VarDecl { name, .. } => vec![("declname", name.clone())],
            Node::Type { names, .. } => vec![("names", names.join(" "))],
            Node::Constant { value, .. } => vec![
                ("type", value.kind().to_string()),
                ("value", value.to_string()),
            ],
            Node::Id { name, .. } => vec![("name", name.clone())],
            Node::Assignment { op, .. } => vec![("op", op.to_string())],
            Node::UnaryOp { op, .. } => vec![("op", op.to_string())],
            Node::BinaryOp { op, .. } => vec![("op", op.to_string())],
            _ => Vec::new(),
        }
    }

    /// Child nodes, each labelled with its field name. Sequence children
    /// carry an index, e.g. `gdecls[0]`.
    pub fn children(&self) -> Vec<(String, &Node)> {
        fn seq<'a>(out: &mut Vec<(String, &'a Node)>, name: &str, nodes: &'a [Node]) {
            for (i, n) in nodes.iter().enumerate() {
                out.push((format!("{}[{}]", name, i), n));
            }
        }
        fn one<'a>(out: &mut Vec<(String, &'a Node)>, name: &str, node: &'a Node) {
            out.push((name.to_string(), node));
        }
        fn opt<'a>(out: &mut Vec<(String, &'a Node)>, name: &str, node: &'a Option<Box<Node>>) {
            if let Some(n) = node {
                out.push((name.to_string(), n));
            }
        }

        let mut out = Vec::new();
        match self {
            Node::Program { gdecls, .. } => seq(&mut out, "gdecls", gdecls),
            Node::GlobalDecl { decls, .. } => seq(&mut out, "decls", decls),
            Node::Decl { ty, init, .. } => {
                one(&mut out, "type", ty);
                opt(&mut out, "init", init);
            }
            Node::FuncDef {
                spec,
                decl,
                param_decls,
                body,
                ..
            } => {
                one(&mut out, "spec", spec);
                one(&mut out, "decl", decl);
                if let Some(decls) = param_decls {
                    seq(&mut out, "param_decls", decls);
                }
                one(&mut out, "body", body);
            }
            Node::VarDecl { ty, .. } => one(&mut out, "type", ty),
            Node::PtrDecl { ty, .. } => one(&mut out, "type", ty),
            Node::ArrayDecl { ty, dim, .. } => {
                one(&mut out, "type", ty);
                opt(&mut out, "dim", dim);
            }
            Node::FuncDecl { args, ty, .. } => {
                opt(&mut out, "args", args);
                one(&mut out, "type", ty);
            }
            Node::ParamList { params, .. } => seq(&mut out, "params", params),
            Node::DeclList { decls, .. } => seq(&mut out, "decls", decls),
            Node::Type { .. } | Node::Constant { .. } | Node::Id { .. } => {}
            Node::Assignment { lvalue, rvalue, .. } => {
                one(&mut out, "lvalue", lvalue);
                one(&mut out, "rvalue", rvalue);
            }
            Node::UnaryOp { expr, .. } => one(&mut out, "expr", expr),
            Node::BinaryOp { left, right, .. } => {
                one(&mut out, "left", left);
                one(&mut out, "right", right);
            }
            Node::Cast { new_ty, expr, .. } => {
                one(&mut out, "to_type", new_ty);
                one(&mut out, "expr", expr);
            }
            Node::ExprList { exprs, .. } => seq(&mut out, "exprs", exprs),
            Node::InitList { exprs, .. } => seq(&mut out, "exprs", exprs),
            Node::FuncCall { callee, args, .. } => {
                one(&mut out, "name", callee);
                opt(&mut out, "args", args);
            }
            Node::ArrayRef {
                array, subscript, ..
            } => {
                one(&mut out, "name", array);
                one(&mut out, "subscript", subscript);
            }
            Node::Compound { items, .. } => seq(&mut out, "block_items", items),
            Node::If {
                cond,
                iftrue,
                iffalse,
                ..
            } => {
                one(&mut out, "cond", cond);
                one(&mut out, "iftrue", iftrue);
                opt(&mut out, "iffalse", iffalse);
            }
            Node::While { cond, body, .. } => {
                one(&mut out, "cond", cond);
                one(&mut out, "body", body);
            }
            Node::For {
                init,
                cond,
                next,
                body,
                ..
            } => {
                opt(&mut out, "init", init);
                opt(&mut out, "cond", cond);
                opt(&mut out, "next", next);
                one(&mut out, "body", body);
            }
            Node::Break { .. } => {}
            Node::Return { expr, .. } => opt(&mut out, "expr", expr),
            Node::Assert { expr, .. } => one(&mut out, "expr", expr),
            Node::Print { expr, .. } => opt(&mut out, "expr", expr),
            Node::Read { args, .. } => one(&mut out, "names", args),
            Node::EmptyStatement { .. } => {}
        }
        out
    }

    /// Pretty print this node and its subtree into `buf`.
    ///
    /// Children are indented four spaces per level. The output is
    /// deterministic for a fixed tree, which makes it usable for regression
    /// comparison against expected dumps.
    pub fn show(&self, buf: &mut String, opts: &ShowOptions) {
        self.show_at(buf, opts, 0, None);
    }

    /// [`Node::show`] into a fresh string.
    pub fn dump(&self, opts: &ShowOptions) -> String {
        let mut buf = String::new();
        self.show(&mut buf, opts);
        buf
    }

    fn show_at(&self, buf: &mut String, opts: &ShowOptions, offset: usize, field: Option<&str>) {
        for _ in 0..offset {
            buf.push(' ');
        }
        match field {
            Some(name) if opts.node_names => {
                buf.push_str(self.kind_name());
                buf.push_str(" <");
                buf.push_str(name);
                buf.push_str(">: ");
            }
            _ => {
                buf.push_str(self.kind_name());
                buf.push_str(": ");
            }
        }

        let attrs = self.display_attrs();
        let rendered: Vec<String> = if opts.attr_names {
            attrs.iter().map(|(n, v)| format!("{}={}", n, v)).collect()
        } else {
            attrs.iter().map(|(_, v)| v.clone()).collect()
        };
        buf.push_str(&rendered.join(", "));

        if opts.show_coord {
            buf.push_str(&self.coord().to_string());
        }
        buf.push('\n');

        for (name, child) in self.children() {
            child.show_at(buf, opts, offset + 4, Some(&name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_const(v: i64) -> Node {
        Node::Constant {
            value: ConstValue::Int(v),
            coord: Coord::new(1, 1),
        }
    }

    #[test]
    fn test_dump_binary_op() {
        let tree = Node::BinaryOp {
            op: BinOp::Add,
            left: Box::new(int_const(1)),
            right: Box::new(int_const(2)),
            coord: Coord::new(1, 1),
        };
        let dump = tree.dump(&ShowOptions::default());
        assert_eq!(dump, "BinaryOp: +\n    Constant: int, 1\n    Constant: int, 2\n");
    }

    #[test]
    fn test_dump_with_node_names_and_coords() {
        let tree = Node::UnaryOp {
            op: UnOp::PostInc,
            expr: Box::new(Node::Id {
                name: "i".to_string(),
                coord: Coord::new(2, 5),
            }),
            coord: Coord::new(2, 5),
        };
        let dump = tree.dump(&ShowOptions {
            attr_names: true,
            node_names: true,
            show_coord: true,
        });
        assert_eq!(
            dump,
            "UnaryOp: op=p++   @ 2:5\n    ID <expr>: name=i   @ 2:5\n"
        );
    }

    #[test]
    fn test_coord_display() {
        assert_eq!(Coord::new(3, 7).to_string(), "   @ 3:7");
        assert_eq!(Coord::line_only(3).to_string(), "   @ 3");
    }
}
