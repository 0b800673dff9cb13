use culebra::interpreter::{InterpretError, RuntimeError};
use culebra::Value;

mod common;
use common::{eval_error, eval_source};

// ============================================================================
// Definition and application
// ============================================================================

#[test]
fn test_function_literal_and_call() {
    assert_eq!(eval_source("add = fn(a, b) { a + b }; add(2, 3)"), Value::Long(5));
}

#[test]
fn test_function_body_returns_its_last_statement() {
    assert_eq!(eval_source("f = fn() { 1; 2; 3 }; f()"), Value::Long(3));
}

#[test]
fn test_empty_body_returns_undefined() {
    assert_eq!(eval_source("f = fn() { }; f()"), Value::Undefined);
}

#[test]
fn test_calling_a_non_function_fails() {
    let error = eval_error("x = 5; x(1)");
    assert!(matches!(
        error,
        InterpretError::Runtime(RuntimeError::TypeError { .. })
    ));
}

#[test]
fn test_too_few_arguments() {
    let error = eval_error("f = fn(a, b) { a }; f(1)");
    assert_eq!(error.to_string(), "too few arguments: expected 2, got 1");
}

#[test]
fn test_extra_arguments_are_ignored_and_not_evaluated() {
    // `boom` is undefined; the call still succeeds because arguments beyond
    // the parameter count are never evaluated.
    assert_eq!(eval_source("f = fn(a) { a }; f(1, boom())"), Value::Long(1));
}

#[test]
fn test_arguments_are_evaluated_in_the_caller_environment() {
    let source = "
        x = 10
        f = fn(a) { a }
        g = fn() { f(x + 1) }
        g()
    ";
    assert_eq!(eval_source(source), Value::Long(11));
}

// ============================================================================
// Parameters and mutability
// ============================================================================

#[test]
fn test_mut_parameter_can_be_reassigned() {
    assert_eq!(eval_source("f = fn(mut a) { a = a + 1; a }; f(10)"), Value::Long(11));
}

#[test]
fn test_immutable_parameter_cannot_be_reassigned() {
    let error = eval_error("f = fn(a) { a = 2 }; f(1)");
    assert!(matches!(
        error,
        InterpretError::Runtime(RuntimeError::ImmutableAssignment { .. })
    ));
}

#[test]
fn test_bindings_made_in_a_call_do_not_leak() {
    let error = eval_error("f = fn() { y = 1; y }; f(); y");
    assert!(matches!(
        error,
        InterpretError::Runtime(RuntimeError::UndefinedVariable { .. })
    ));
}

// ============================================================================
// Closures and scoping
// ============================================================================

#[test]
fn test_counter_closure() {
    let source = "
        make = fn() {
            mut n = 0
            fn() { n = n + 1; n }
        }
        counter = make()
        counter()
        counter()
    ";
    assert_eq!(eval_source(source), Value::Long(2));
}

#[test]
fn test_closures_share_their_defining_frame() {
    let source = "
        make = fn() {
            mut n = 0
            [fn() { n = n + 1; n }, fn() { n }]
        }
        pair = make()
        pair[0]()
        pair[0]()
        pair[1]()
    ";
    assert_eq!(eval_source(source), Value::Long(2));
}

#[test]
fn test_assignment_mutates_the_defining_frame_not_a_shadow() {
    assert_eq!(eval_source("mut x = 1; f = fn() { x = 5 }; f(); x"), Value::Long(5));
}

#[test]
fn test_nearest_frame_wins_on_lookup() {
    let source = "
        x = 'outer'
        f = fn(x) { x }
        f('inner')
    ";
    assert_eq!(eval_source(source), Value::String("inner".into()));
}

// ============================================================================
// self, this and call site bindings
// ============================================================================

#[test]
fn test_self_enables_recursion() {
    let source = "
        fact = fn(n) { if n == 0 { 1 } else { n * self(n - 1) } }
        fact(5)
    ";
    assert_eq!(eval_source(source), Value::Long(120));
}

#[test]
fn test_self_is_immutable() {
    let error = eval_error("f = fn() { self = 1 }; f()");
    assert!(matches!(
        error,
        InterpretError::Runtime(RuntimeError::ImmutableAssignment { .. })
    ));
}

#[test]
fn test_line_and_column_track_the_call_site() {
    assert_eq!(eval_source("f = fn() { __LINE__ }\nf()"), Value::Long(2));
    assert_eq!(eval_source("f = fn() { __COLUMN__ }\n  f()"), Value::Long(3));
}

#[test]
fn test_this_is_bound_in_method_calls() {
    let source = "
        o = {value: 41, bump: fn() { this.value + 1 }}
        o.bump()
    ";
    assert_eq!(eval_source(source), Value::Long(42));
}

#[test]
fn test_method_mutation_is_visible_through_the_receiver() {
    let source = "
        o = {items: [1, 2], add: fn() { this.items.push(3) }}
        o.add()
        o.items.size()
    ";
    assert_eq!(eval_source(source), Value::Long(3));
}

#[test]
fn test_intrinsics_do_not_shadow_own_properties() {
    assert_eq!(eval_source("o = {size: 99}; o.size"), Value::Long(99));
    assert_eq!(eval_source("o = {a: 1, b: 2}; o.size()"), Value::Long(2));
}
