// Integration tests for the Hiss parser
//
// These tests verify the parser against complete source snippets: the
// shape of the produced syntax tree, the structured syntax errors with
// their expected-token alternatives and consumed-token history, and the
// indented tree dump used by `hiss run --dump-ast`.

use hiss::ast::{dump_program, ArithOp, CmpOp, Expr, Stmt};
use hiss::errors::{Expected, HissError, SyntaxError};
use hiss::lexer::TokenKind;
use hiss::parser::parse_source;
use pretty_assertions::assert_eq;

fn parse_ok(code: &str) -> Vec<Stmt> {
    parse_source(code).expect("source should parse")
}

fn parse_syntax_err(code: &str) -> SyntaxError {
    match parse_source(code).expect_err("source should not parse") {
        HissError::Syntax(err) => *err,
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_assignment_produces_assign_node() {
    let program = parse_ok("x = 3\n");
    assert_eq!(program.len(), 1);
    match &program[0] {
        Stmt::Assign { name, value } => {
            assert_eq!(name, "x");
            assert_eq!(value, &Expr::Int(3));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_precedence_shapes_the_tree() {
    // 1 + 2 * 3 must hang the multiplication under the addition.
    let program = parse_ok("x = 1 + 2 * 3\n");
    match &program[0] {
        Stmt::Assign { value, .. } => match value {
            Expr::Arith { op: ArithOp::Add, left, right } => {
                assert_eq!(left.as_ref(), &Expr::Int(1));
                match right.as_deref() {
                    Some(Expr::Arith { op: ArithOp::Mul, .. }) => {}
                    other => panic!("expected multiplication on the right, got {:?}", other),
                }
            }
            other => panic!("expected addition at the root, got {:?}", other),
        },
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_parentheses_override_precedence() {
    let program = parse_ok("x = (1 + 2) * 3\n");
    match &program[0] {
        Stmt::Assign { value, .. } => match value {
            Expr::Arith { op: ArithOp::Mul, left, .. } => match left.as_ref() {
                Expr::Arith { op: ArithOp::Add, .. } => {}
                other => panic!("expected addition inside parentheses, got {:?}", other),
            },
            other => panic!("expected multiplication at the root, got {:?}", other),
        },
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_chained_comparison_nests_to_the_left() {
    let program = parse_ok("x = 1 < 2 < 3\n");
    match &program[0] {
        Stmt::Assign { value, .. } => match value {
            Expr::Comparison { op: CmpOp::Lt, left, right } => {
                assert!(matches!(left.as_ref(), Expr::Comparison { op: CmpOp::Lt, .. }));
                assert_eq!(right.as_ref(), &Expr::Int(3));
            }
            other => panic!("expected comparison at the root, got {:?}", other),
        },
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_print_accepts_a_testlist() {
    let program = parse_ok("print 1, \"two\", x\n");
    match &program[0] {
        Stmt::Print(exprs) => {
            assert_eq!(exprs.len(), 3);
            assert_eq!(exprs[2], Expr::Variable("x".to_string()));
        }
        other => panic!("expected print, got {:?}", other),
    }
}

#[test]
fn test_if_elif_else_structure() {
    let code = "\
if a < 1:
    print \"low\"
elif a < 2:
    print \"mid\"
elif a < 3:
    print \"high\"
else:
    print \"off the scale\"
";
    let program = parse_ok(code);
    match &program[0] {
        Stmt::If { elifs, else_body, .. } => {
            assert_eq!(elifs.len(), 2);
            assert!(else_body.is_some());
        }
        other => panic!("expected if statement, got {:?}", other),
    }
}

#[test]
fn test_if_without_else_leaves_none() {
    let code = "\
if a < 1:
    print a
";
    let program = parse_ok(code);
    match &program[0] {
        Stmt::If { elifs, else_body, .. } => {
            assert!(elifs.is_empty());
            assert!(else_body.is_none());
        }
        other => panic!("expected if statement, got {:?}", other),
    }
}

#[test]
fn test_statement_after_if_is_not_swallowed() {
    // The token that ends the elif scan must be handed back so the next
    // statement still parses.
    let code = "\
if a < 1:
    print a
x = 2
";
    let program = parse_ok(code);
    assert_eq!(program.len(), 2);
    assert!(matches!(&program[1], Stmt::Assign { .. }));
}

#[test]
fn test_for_range_collects_all_arguments() {
    let code = "\
for i in range(1, 10, 2):
    print i
";
    let program = parse_ok(code);
    match &program[0] {
        Stmt::ForRange { var, args, body } => {
            assert_eq!(var, "i");
            assert_eq!(args.len(), 3);
            assert_eq!(body.len(), 1);
        }
        other => panic!("expected for statement, got {:?}", other),
    }
}

#[test]
fn test_func_def_with_and_without_params() {
    let code = "\
def pair(a, b):
    return a + b
def nullary():
    return 0
";
    let program = parse_ok(code);
    match &program[0] {
        Stmt::FuncDef { name, params, .. } => {
            assert_eq!(name, "pair");
            assert_eq!(params, &["a".to_string(), "b".to_string()]);
        }
        other => panic!("expected function definition, got {:?}", other),
    }
    match &program[1] {
        Stmt::FuncDef { params, .. } => assert!(params.is_empty()),
        other => panic!("expected function definition, got {:?}", other),
    }
}

#[test]
fn test_bare_call_statement_and_call_expression() {
    let code = "\
greet()
x = add(1, 2)
";
    let program = parse_ok(code);
    match &program[0] {
        Stmt::Call { name, args } => {
            assert_eq!(name, "greet");
            assert!(args.is_empty());
        }
        other => panic!("expected call statement, got {:?}", other),
    }
    match &program[1] {
        Stmt::Assign { value, .. } => {
            assert!(matches!(value, Expr::Call { .. }));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_return_without_value() {
    let code = "\
def f():
    return
";
    let program = parse_ok(code);
    match &program[0] {
        Stmt::FuncDef { body, .. } => assert_eq!(body[0], Stmt::Return(None)),
        other => panic!("expected function definition, got {:?}", other),
    }
}

#[test]
fn test_last_statement_may_omit_trailing_newline() {
    let program = parse_ok("x = 1");
    assert_eq!(program.len(), 1);
}

#[test]
fn test_name_followed_by_literal_reports_the_alternatives() {
    let err = parse_syntax_err("x 5\n");
    assert_eq!(err.production, "assign_stmt");
    assert!(err.expected.contains(&Expected::AssignOp));
    assert!(err.expected.contains(&Expected::OpenParen));
    assert_eq!(err.found.kind, TokenKind::Int(5));
    // The history replays everything consumed before the failure.
    assert!(err
        .history
        .iter()
        .any(|tok| tok.kind == TokenKind::Name("x".to_string())));
}

#[test]
fn test_missing_colon_after_if_guard() {
    let code = "\
if a < 1
    print a
";
    let err = parse_syntax_err(code);
    assert!(err.expected.contains(&Expected::Colon));
}

#[test]
fn test_missing_body_after_for_header() {
    let code = "\
for i in range(3):
print i
";
    let err = parse_syntax_err(code);
    assert!(err.expected.contains(&Expected::Indent));
}

#[test]
fn test_unclosed_parenthesis_in_expression() {
    let err = parse_syntax_err("x = (1 + 2\n");
    assert!(err.expected.contains(&Expected::CloseParen));
}

#[test]
fn test_stray_token_at_top_level_names_the_program_production() {
    let err = parse_syntax_err("= 5\n");
    assert_eq!(err.production, "program");
}

#[test]
fn test_else_without_if_is_rejected() {
    let code = "\
else:
    print 1
";
    assert!(parse_source(code).is_err());
}

#[test]
fn test_tab_indentation_is_rejected() {
    let code = "if a < 1:\n\tprint a\n";
    assert!(matches!(parse_source(code), Err(HissError::Lex { .. })));
}

#[test]
fn test_inconsistent_dedent_is_rejected() {
    let code = "\
if a < 1:
        print a
    print a
";
    assert!(matches!(parse_source(code), Err(HissError::Lex { .. })));
}

#[test]
fn test_dump_renders_an_indented_tree() {
    let program = parse_ok("x = 1 + 2\n");
    let dump = dump_program(&program);
    assert_eq!(dump, "Assign x\n  Arith +\n    Int 1\n    Int 2\n");
}

#[test]
fn test_dump_labels_unary_minus_as_negate() {
    let program = parse_ok("x = -y\n");
    let dump = dump_program(&program);
    assert_eq!(dump, "Assign x\n  Negate -\n    Variable y\n");
}
