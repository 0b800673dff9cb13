use culebra::interpreter::{InterpretError, RuntimeError};
use culebra::Value;

mod common;
use common::{eval_error, eval_source};

// ============================================================================
// while
// ============================================================================

#[test]
fn test_while_loop_runs_until_condition_is_false() {
    let source = "
        mut i = 0
        mut total = 0
        while i < 5 {
            i = i + 1
            total = total + i
        }
        total
    ";
    assert_eq!(eval_source(source), Value::Long(15));
}

#[test]
fn test_while_itself_evaluates_to_undefined() {
    assert_eq!(
        eval_source("mut i = 0; while i < 3 { i = i + 1 }"),
        Value::Undefined
    );
}

#[test]
fn test_while_with_false_condition_never_runs() {
    assert_eq!(eval_source("mut n = 0; while false { n = 1 }; n"), Value::Long(0));
}

#[test]
fn test_while_condition_must_be_boolish() {
    let error = eval_error("while 'x' { 1 }");
    assert!(matches!(
        error,
        InterpretError::Runtime(RuntimeError::TypeError { .. })
    ));
}

// ============================================================================
// if / else if / else
// ============================================================================

#[test]
fn test_if_returns_the_body_value() {
    assert_eq!(eval_source("if true { 42 }"), Value::Long(42));
    assert_eq!(eval_source("if true { 1; 2 }"), Value::Long(2));
}

#[test]
fn test_if_without_match_returns_undefined() {
    assert_eq!(eval_source("if false { 42 }"), Value::Undefined);
    assert_eq!(eval_source("if true { }"), Value::Undefined);
}

#[test]
fn test_else_if_chain_picks_the_first_truthy_clause() {
    let source = "
        x = 7
        if x < 5 { 'small' } else if x < 10 { 'medium' } else { 'large' }
    ";
    assert_eq!(eval_source(source), Value::String("medium".into()));
}

#[test]
fn test_trailing_else_runs_when_no_clause_matches() {
    let source = "if false { 1 } else if false { 2 } else { 3 }";
    assert_eq!(eval_source(source), Value::Long(3));
}

#[test]
fn test_later_clauses_are_not_evaluated_after_a_match() {
    let source = "
        mut n = 0
        if true { 1 } else if (n = 1) == 1 { 2 }
        n
    ";
    assert_eq!(eval_source(source), Value::Long(0));
}

#[test]
fn test_if_condition_must_be_boolish() {
    let error = eval_error("if 'x' { 1 }");
    assert!(matches!(
        error,
        InterpretError::Runtime(RuntimeError::TypeError { .. })
    ));
}

// ============================================================================
// statements
// ============================================================================

#[test]
fn test_program_evaluates_to_the_last_statement() {
    assert_eq!(eval_source("1; 2; 3"), Value::Long(3));
}

#[test]
fn test_empty_program_evaluates_to_undefined() {
    assert_eq!(eval_source(""), Value::Undefined);
    assert_eq!(eval_source("  // just a comment\n"), Value::Undefined);
}

#[test]
fn test_semicolons_are_optional() {
    assert_eq!(eval_source("mut a = 1\na = a + 1\na"), Value::Long(2));
}
