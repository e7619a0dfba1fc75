// Integration tests for the Hiss interpreter
//
// These tests verify the interpreter's behavior by running complete Hiss
// programs and checking the results. Tests cover:
// - Variable assignment and frame-stack scoping
// - Arithmetic, comparison, and boolean evaluation
// - Control flow (if/elif/else, for-range loops)
// - Functions, return, and call errors
// - Printing
// - Runtime error reporting

use hiss::errors::{CallFailure, HissError};
use hiss::interpreter::{Interpreter, Value};
use hiss::parser;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn run_code(code: &str) -> (Interpreter, String) {
    let program = parser::parse_source(code).expect("program should parse");
    let output = Arc::new(Mutex::new(Vec::new()));
    let mut interp = Interpreter::new();
    interp.set_output(Arc::clone(&output));
    interp.run(&program).expect("program should run");
    let captured = String::from_utf8(output.lock().unwrap().clone()).unwrap();
    (interp, captured)
}

fn run_err(code: &str) -> HissError {
    let program = parser::parse_source(code).expect("program should parse");
    let output = Arc::new(Mutex::new(Vec::new()));
    let mut interp = Interpreter::new();
    interp.set_output(output);
    interp.run(&program).expect_err("program should fail")
}

#[test]
fn test_assign_and_print_variable() {
    let (interp, out) = run_code("x = 5\nprint x\n");
    assert_eq!(out, "5\n");
    assert_eq!(interp.env.get("x"), Some(Value::Int(5)));
}

#[test]
fn test_print_joins_arguments_with_spaces() {
    let (_, out) = run_code("print 1, 2.5, \"snake\"\n");
    assert_eq!(out, "1 2.5 snake\n");
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let (interp, _) = run_code("a = 1 + 2 * 3\nb = (1 + 2) * 3\n");
    assert_eq!(interp.env.get("a"), Some(Value::Int(7)));
    assert_eq!(interp.env.get("b"), Some(Value::Int(9)));
}

#[test]
fn test_subtraction_is_left_associative() {
    let (interp, _) = run_code("x = 10 - 3 - 2\n");
    assert_eq!(interp.env.get("x"), Some(Value::Int(5)));
}

#[test]
fn test_unary_minus() {
    let (interp, _) = run_code("x = -4 + 1\ny = -2.5\n");
    assert_eq!(interp.env.get("x"), Some(Value::Int(-3)));
    assert_eq!(interp.env.get("y"), Some(Value::Float(-2.5)));
}

#[test]
fn test_integer_division_truncates() {
    let (interp, _) = run_code("q = 7 / 2\nr = 7 % 2\nn = -7 / 2\n");
    assert_eq!(interp.env.get("q"), Some(Value::Int(3)));
    assert_eq!(interp.env.get("r"), Some(Value::Int(1)));
    assert_eq!(interp.env.get("n"), Some(Value::Int(-3)));
}

#[test]
fn test_mixed_arithmetic_promotes_to_float() {
    let (interp, _) = run_code("x = 1 + 2.5\ny = 5 / 2.0\n");
    assert_eq!(interp.env.get("x"), Some(Value::Float(3.5)));
    assert_eq!(interp.env.get("y"), Some(Value::Float(2.5)));
}

#[test]
fn test_string_concatenation() {
    let (_, out) = run_code("s = \"hi\" + \"ss\"\nprint s\n");
    assert_eq!(out, "hiss\n");
}

#[test]
fn test_division_by_zero_is_reported() {
    assert!(matches!(run_err("x = 1 / 0\n"), HissError::DivisionByZero));
    assert!(matches!(run_err("x = 1 % 0\n"), HissError::DivisionByZero));
}

#[test]
fn test_adding_int_and_string_is_a_type_error() {
    match run_err("x = 1 + \"one\"\n") {
        HissError::Type { op, operands } => {
            assert_eq!(op, "+");
            assert_eq!(operands, "int and string");
        }
        other => panic!("expected type error, got {:?}", other),
    }
}

#[test]
fn test_undefined_variable_is_reported() {
    match run_err("print ghost\n") {
        HissError::UndefinedVariable { name } => assert_eq!(name, "ghost"),
        other => panic!("expected undefined variable, got {:?}", other),
    }
}

#[test]
fn test_chained_comparison_is_pairwise_left_to_right() {
    // 1 < 2 yields true, which coerces to 1 for the second comparison,
    // so the whole chain collapses to 1 < 0.
    let (interp, _) = run_code("x = 1 < 2 < 0\ny = 0 < 1 < 2\n");
    assert_eq!(interp.env.get("x"), Some(Value::Bool(false)));
    assert_eq!(interp.env.get("y"), Some(Value::Bool(true)));
}

#[test]
fn test_string_comparison_is_lexicographic() {
    let (interp, _) = run_code("x = \"apple\" < \"banana\"\ny = \"a\" == \"a\"\n");
    assert_eq!(interp.env.get("x"), Some(Value::Bool(true)));
    assert_eq!(interp.env.get("y"), Some(Value::Bool(true)));
}

#[test]
fn test_boolean_connectives_short_circuit() {
    // The right operand of `or` would divide by zero if it ran.
    let code = "x = 1 == 1 or 1 / 0 == 0\ny = 1 == 2 and 1 / 0 == 0\n";
    let (interp, _) = run_code(code);
    assert_eq!(interp.env.get("x"), Some(Value::Bool(true)));
    assert_eq!(interp.env.get("y"), Some(Value::Bool(false)));
}

#[test]
fn test_not_requires_boolean_operand() {
    match run_err("x = not 3\n") {
        HissError::Type { op, .. } => assert_eq!(op, "not"),
        other => panic!("expected type error, got {:?}", other),
    }
}

#[test]
fn test_if_dispatches_on_true_branch() {
    let code = "\
x = 10
if x > 5:
    print \"big\"
else:
    print \"small\"
";
    let (_, out) = run_code(code);
    assert_eq!(out, "big\n");
}

#[test]
fn test_if_dispatches_on_else_branch() {
    let code = "\
x = 2
if x > 5:
    print \"big\"
else:
    print \"small\"
";
    let (_, out) = run_code(code);
    assert_eq!(out, "small\n");
}

#[test]
fn test_elif_chain_takes_first_matching_arm() {
    let code = "\
x = 7
if x > 10:
    print \"large\"
elif x > 5:
    print \"medium\"
elif x > 0:
    print \"small\"
else:
    print \"none\"
";
    let (_, out) = run_code(code);
    assert_eq!(out, "medium\n");
}

#[test]
fn test_if_without_else_can_fall_through() {
    let code = "\
if 1 == 2:
    print \"never\"
print \"after\"
";
    let (_, out) = run_code(code);
    assert_eq!(out, "after\n");
}

#[test]
fn test_non_boolean_guard_is_a_type_error() {
    let code = "\
if 3:
    print \"no\"
";
    match run_err(code) {
        HissError::Type { op, .. } => assert_eq!(op, "if"),
        other => panic!("expected type error, got {:?}", other),
    }
}

#[test]
fn test_for_range_single_argument_counts_from_zero() {
    let code = "\
for i in range(3):
    print i
";
    let (_, out) = run_code(code);
    assert_eq!(out, "0\n1\n2\n");
}

#[test]
fn test_for_range_start_and_end() {
    let code = "\
for i in range(2, 5):
    print i
";
    let (_, out) = run_code(code);
    assert_eq!(out, "2\n3\n4\n");
}

#[test]
fn test_for_range_with_negative_step() {
    let code = "\
for i in range(5, 0, -2):
    print i
";
    let (_, out) = run_code(code);
    assert_eq!(out, "5\n3\n1\n");
}

#[test]
fn test_for_range_empty_when_step_points_away() {
    let code = "\
for i in range(5, 0):
    print i
print \"done\"
";
    let (_, out) = run_code(code);
    assert_eq!(out, "done\n");
}

#[test]
fn test_for_range_zero_step_is_rejected() {
    let code = "\
for i in range(0, 10, 0):
    print i
";
    assert!(matches!(run_err(code), HissError::InvalidRangeStep));
}

#[test]
fn test_for_range_non_integer_argument_is_a_type_error() {
    let code = "\
for i in range(2.5):
    print i
";
    match run_err(code) {
        HissError::Type { op, .. } => assert_eq!(op, "range"),
        other => panic!("expected type error, got {:?}", other),
    }
}

#[test]
fn test_loop_variable_stays_bound_after_loop() {
    let code = "\
for i in range(3):
    x = i
print i, x
";
    let (_, out) = run_code(code);
    assert_eq!(out, "2 2\n");
}

#[test]
fn test_for_body_accumulates_in_enclosing_scope() {
    let code = "\
total = 0
for i in range(1, 5):
    total = total + i
print total
";
    let (_, out) = run_code(code);
    assert_eq!(out, "10\n");
}

#[test]
fn test_function_call_returns_value() {
    let code = "\
def double(n):
    return n * 2
x = double(21)
print x
";
    let (_, out) = run_code(code);
    assert_eq!(out, "42\n");
}

#[test]
fn test_function_parameters_live_in_their_own_frame() {
    let code = "\
n = 1
def shadow(n):
    n = n + 10
    return n
x = shadow(5)
print n, x
";
    let (_, out) = run_code(code);
    assert_eq!(out, "1 15\n");
}

#[test]
fn test_function_body_reads_outer_variables() {
    let code = "\
base = 100
def bump(n):
    return base + n
print bump(5)
";
    let (_, out) = run_code(code);
    assert_eq!(out, "105\n");
}

#[test]
fn test_bare_return_ends_the_call() {
    let code = "\
def greet(name):
    print \"hello\", name
    return
    print \"unreachable\"
greet(\"world\")
";
    let (_, out) = run_code(code);
    assert_eq!(out, "hello world\n");
}

#[test]
fn test_return_unwinds_out_of_a_loop() {
    let code = "\
def first_above(limit):
    for i in range(100):
        if i > limit:
            return i
    return -1
print first_above(3)
";
    let (_, out) = run_code(code);
    assert_eq!(out, "4\n");
}

#[test]
fn test_recursive_function() {
    let code = "\
def fact(n):
    if n < 2:
        return 1
    return n * fact(n - 1)
print fact(6)
";
    let (_, out) = run_code(code);
    assert_eq!(out, "720\n");
}

#[test]
fn test_call_to_unknown_function_is_reported() {
    match run_err("x = missing(1)\n") {
        HissError::Call { name, reason } => {
            assert_eq!(name, "missing");
            assert!(matches!(reason, CallFailure::UnknownFunction));
        }
        other => panic!("expected call error, got {:?}", other),
    }
}

#[test]
fn test_arity_mismatch_is_reported() {
    let code = "\
def pair(a, b):
    return a + b
x = pair(1)
";
    match run_err(code) {
        HissError::Call { name, reason } => {
            assert_eq!(name, "pair");
            assert!(matches!(reason, CallFailure::ArityMismatch { expected: 2, got: 1 }));
        }
        other => panic!("expected call error, got {:?}", other),
    }
}

#[test]
fn test_value_less_call_in_expression_position_is_reported() {
    let code = "\
def shout(msg):
    print msg
x = shout(\"hi\")
";
    match run_err(code) {
        HissError::Call { name, reason } => {
            assert_eq!(name, "shout");
            assert!(matches!(reason, CallFailure::NoValue));
        }
        other => panic!("expected call error, got {:?}", other),
    }
}

#[test]
fn test_value_less_call_as_statement_is_fine() {
    let code = "\
def shout(msg):
    print msg
shout(\"hi\")
";
    let (_, out) = run_code(code);
    assert_eq!(out, "hi\n");
}

#[test]
fn test_return_at_top_level_is_rejected() {
    assert!(matches!(run_err("return 1\n"), HissError::ReturnOutsideFunction));
}

#[test]
fn test_redefining_a_function_replaces_it() {
    let code = "\
def f():
    return 1
def f():
    return 2
print f()
";
    let (_, out) = run_code(code);
    assert_eq!(out, "2\n");
}

#[test]
fn test_float_formatting_in_print() {
    let (_, out) = run_code("print 1.5, 2.0\n");
    assert_eq!(out, "1.5 2\n");
}

#[test]
fn test_assignment_overwrites_previous_value() {
    let (interp, _) = run_code("x = 1\nx = \"now a string\"\n");
    assert_eq!(interp.env.get("x"), Some(Value::Str("now a string".to_string())));
}

#[test]
fn test_nested_blocks_combine_loops_and_conditionals() {
    let code = "\
evens = 0
odds = 0
for i in range(6):
    if i % 2 == 0:
        evens = evens + 1
    else:
        odds = odds + 1
print evens, odds
";
    let (_, out) = run_code(code);
    assert_eq!(out, "3 3\n");
}
