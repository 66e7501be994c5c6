// Integration tests for the uC front end

use ucfront::parser::{parse, Node, Parser};

#[test]
fn test_simple_program() {
    let source = r#"
        int main() {
            int x = 5;
            int y = 10;
            int z = x + y;
            return z;
        }
    "#;

    let program = parse(source).expect("Parsing failed");
    let gdecls = match program {
        Node::Program { gdecls, .. } => gdecls,
        _ => panic!("expected Program at the root"),
    };
    assert_eq!(gdecls.len(), 1);
    assert!(matches!(gdecls[0], Node::FuncDef { .. }));
}

#[test]
fn test_function_calls_and_globals() {
    let source = r#"
        int counter;

        int add(int a, int b) {
            return a + b;
        }

        int main() {
            counter = add(3, 4);
            return counter;
        }
    "#;

    let program = parse(source).expect("Parsing failed");
    let gdecls = match program {
        Node::Program { gdecls, .. } => gdecls,
        _ => panic!("expected Program at the root"),
    };
    assert_eq!(gdecls.len(), 3);
    assert!(matches!(gdecls[0], Node::GlobalDecl { .. }));
    assert!(matches!(gdecls[1], Node::FuncDef { .. }));
    assert!(matches!(gdecls[2], Node::FuncDef { .. }));
}

#[test]
fn test_control_flow_and_builtins() {
    let source = r#"
        void report(int n) {
            if (n < 0)
                print("negative");
            else
                print(n);
        }

        int main() {
            int total = 0;
            int n;
            read(n);
            for (int k = 1; k <= n; k++) {
                total += k;
            }
            while (total > 100)
                total = total / 2;
            assert total >= 0;
            report(total);
            return 0;
        }
    "#;

    parse(source).expect("Parsing failed");
}

#[test]
fn test_pointers_arrays_and_casts() {
    let source = r#"
        int main() {
            float f = 3.25;
            int v[] = {1, 2, 3};
            int *p;
            int *q[2];
            int (*r)[2];
            p = &v[0];
            *p = (int) f;
            v[1] = v[0] * 2;
            return *p;
        }
    "#;

    parse(source).expect("Parsing failed");
}

#[test]
fn test_missing_semicolon_reports_offending_token() {
    let source = "int main() { return 0 }";
    let err = parse(source).expect_err("parse should fail");
    assert_eq!(err.message, "error near the symbol }");
    assert_eq!(err.coord.line, 1);
}

#[test]
fn test_unclosed_block_reports_end_of_input() {
    let source = "int main() { return 0;";
    let err = parse(source).expect_err("parse should fail");
    assert_eq!(err.message, "error at the end of input");
}

#[test]
fn test_no_partial_tree_on_syntax_error() {
    // A syntax error in the second function poisons the whole parse.
    let source = r#"
        int ok() { return 1; }
        int bad() { return }
    "#;
    assert!(parse(source).is_err());
}

#[test]
fn test_lexical_errors_do_not_abort_parsing() {
    let mut parser = Parser::new("int x; @ int y;");
    let program = parser.parse_program().expect("Parsing failed");
    assert_eq!(parser.lex_errors().len(), 1);
    assert_eq!(parser.lex_errors()[0].to_string(), "Illegal character '@'");
    let gdecls = match program {
        Node::Program { gdecls, .. } => gdecls,
        _ => panic!("expected Program at the root"),
    };
    assert_eq!(gdecls.len(), 2);
}

#[test]
fn test_empty_source_is_rejected() {
    let err = parse("").expect_err("parse should fail");
    assert_eq!(err.message, "error at the end of input");

    let err = parse("   \n  // just a comment\n").expect_err("parse should fail");
    assert_eq!(err.message, "error at the end of input");
}
