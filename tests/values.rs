use culebra::interpreter::{InterpretError, RuntimeError};
use culebra::Value;

mod common;
use common::{eval_error, eval_source};

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_primitive_literals() {
    assert_eq!(eval_source("42"), Value::Long(42));
    assert_eq!(eval_source("true"), Value::Bool(true));
    assert_eq!(eval_source("false"), Value::Bool(false));
    assert_eq!(eval_source("undefined"), Value::Undefined);
    assert_eq!(eval_source("'hello'"), Value::String("hello".into()));
}

#[test]
fn test_single_element_array_literal_collapses_to_its_element() {
    // Only PARAMETERS, ARGUMENTS and OBJECT survive single-child hoisting,
    // so a one-element array literal is the element itself.
    assert_eq!(eval_source("[5]"), Value::Long(5));
}

#[test]
fn test_duplicate_object_keys_overwrite() {
    assert_eq!(eval_source("o = {a: 1, a: 2}; o.a"), Value::Long(2));
    assert_eq!(eval_source("o = {a: 1, a: 2}; o.size()"), Value::Long(1));
}

// ============================================================================
// Display
// ============================================================================

#[test]
fn test_primitive_display() {
    assert_eq!(eval_source("undefined").to_string(), "undefined");
    assert_eq!(eval_source("true").to_string(), "true");
    assert_eq!(eval_source("0 - 5").to_string(), "-5");
    assert_eq!(eval_source("'raw text'").to_string(), "raw text");
}

#[test]
fn test_array_display() {
    assert_eq!(eval_source("[1, 'x', true]").to_string(), "[1, x, true]");
    assert_eq!(eval_source("[[1, 2], [3, 4]]").to_string(), "[[1, 2], [3, 4]]");
    assert_eq!(eval_source("[1, 2, 3]").to_string(), "[1, 2, 3]");
}

#[test]
fn test_object_display_uses_sorted_keys() {
    assert_eq!(
        eval_source("{b: 2, a: 1}").to_string(),
        "{\"a\": 1, \"b\": 2}"
    );
    assert_eq!(eval_source("{}").to_string(), "{}");
}

#[test]
fn test_function_display() {
    assert_eq!(eval_source("fn() { }").to_string(), "[function]");
}

// ============================================================================
// Aliasing
// ============================================================================

#[test]
fn test_arrays_are_shared_by_reference() {
    assert_eq!(
        eval_source("a = [1, 2]; b = a; b.push(3); a.size()"),
        Value::Long(3)
    );
}

#[test]
fn test_arrays_nested_in_objects_are_shared() {
    let source = "
        items = [1, 2]
        o = {items: items}
        items.push(3)
        o.items.size()
    ";
    assert_eq!(eval_source(source), Value::Long(3));
}

// ============================================================================
// Indexing and property access
// ============================================================================

#[test]
fn test_array_indexing() {
    assert_eq!(eval_source("[10, 20, 30][1]"), Value::Long(20));
    assert_eq!(eval_source("a = [10, 20]; a[0]"), Value::Long(10));
}

#[test]
fn test_out_of_range_index_is_a_silent_no_op() {
    // The working value is left unchanged, so the result is the array.
    assert_eq!(eval_source("a = [1, 2]; a[5]"), eval_source("[1, 2]"));
    assert_eq!(eval_source("a = [1, 2]; a[5].size()"), Value::Long(2));
    assert_eq!(eval_source("a = [1, 2]; a[0 - 1].size()"), Value::Long(2));
}

#[test]
fn test_indexing_a_non_array_fails() {
    let error = eval_error("5[0]");
    assert!(matches!(
        error,
        InterpretError::Runtime(RuntimeError::TypeError { .. })
    ));
}

#[test]
fn test_index_must_be_a_long() {
    let error = eval_error("a = [1, 2]; a['x']");
    assert!(matches!(
        error,
        InterpretError::Runtime(RuntimeError::TypeError { .. })
    ));
}

#[test]
fn test_object_property_access() {
    assert_eq!(eval_source("{name: 'ada'}.name"), Value::String("ada".into()));
}

#[test]
fn test_unknown_property_fails() {
    let error = eval_error("{a: 1}.b");
    assert_eq!(error.to_string(), "type error: undefined property 'b'");
}

#[test]
fn test_property_access_on_a_primitive_fails() {
    let error = eval_error("x = 5; x.size()");
    assert!(matches!(
        error,
        InterpretError::Runtime(RuntimeError::TypeError { .. })
    ));
}

#[test]
fn test_object_size_intrinsic() {
    assert_eq!(eval_source("{}.size()"), Value::Long(0));
    assert_eq!(eval_source("{a: 1, b: 2, c: 3}.size()"), Value::Long(3));
}

#[test]
fn test_array_size_and_push_intrinsics() {
    assert_eq!(eval_source("[1, 2].size()"), Value::Long(2));
    assert_eq!(eval_source("a = [1, 2]; a.push(3); a.size()"), Value::Long(3));
    assert_eq!(eval_source("a = [1, 2]; a.push(3)"), Value::Undefined);
}
