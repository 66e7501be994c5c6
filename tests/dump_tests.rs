// Golden tests for the AST tree dump

use ucfront::parser::{parse, ShowOptions};

fn dump(source: &str, opts: ShowOptions) -> String {
    parse(source).expect("Parsing failed").dump(&opts)
}

#[test]
fn test_function_definition_dump() {
    let out = dump("int main() {\n    return 0;\n}\n", ShowOptions::default());
    let expected = "\
Program:
    FuncDef:
        Type: int
        Decl: main
            FuncDecl:
                VarDecl: main
                    Type: int
        Compound:
            Return:
                Constant: int, 0
";
    assert_eq!(out, expected);
}

#[test]
fn test_array_of_pointers_dump() {
    // The array suffix binds before the pointer prefix.
    let out = dump("int *a[5];", ShowOptions::default());
    let expected = "\
Program:
    GlobalDecl:
        Decl: a
            ArrayDecl:
                PtrDecl:
                    VarDecl: a
                        Type: int
                Constant: int, 5
";
    assert_eq!(out, expected);
}

#[test]
fn test_dump_with_coordinates() {
    let opts = ShowOptions {
        show_coord: true,
        ..Default::default()
    };
    let out = dump("int x;", opts);
    let expected = "\
Program:    @ 1:1
    GlobalDecl:    @ 1:5
        Decl: x   @ 1:5
            VarDecl: x   @ 1:5
                Type: int   @ 1:1
";
    assert_eq!(out, expected);
}

#[test]
fn test_dump_with_names() {
    let opts = ShowOptions {
        attr_names: true,
        node_names: true,
        show_coord: false,
    };
    let out = dump("int x;", opts);
    let expected = "\
Program:
    GlobalDecl <gdecls[0]>:
        Decl <decls[0]>: name=x
            VarDecl <type>: declname=x
                Type <type>: names=int
";
    assert_eq!(out, expected);
}

#[test]
fn test_for_loop_dump() {
    let out = dump(
        "void f() {\nfor (int k = 1; k < 10; k++)\n    i += k;\n}\n",
        ShowOptions::default(),
    );
    let expected = "\
Program:
    FuncDef:
        Type: void
        Decl: f
            FuncDecl:
                VarDecl: f
                    Type: void
        Compound:
            For:
                DeclList:
                    Decl: k
                        VarDecl: k
                            Type: int
                        Constant: int, 1
                BinaryOp: <
                    ID: k
                    Constant: int, 10
                UnaryOp: p++
                    ID: k
                Assignment: +=
                    ID: i
                    ID: k
";
    assert_eq!(out, expected);
}
