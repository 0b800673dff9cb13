use culebra::Value;

mod common;
use common::{eval_error, eval_source};

#[test]
fn test_plain_text() {
    assert_eq!(eval_source("\"hello\""), Value::String("hello".into()));
    assert_eq!(eval_source("\"\""), Value::String("".into()));
}

#[test]
fn test_embedded_expression() {
    assert_eq!(
        eval_source("name = 'world'; \"hello, {name}!\""),
        Value::String("hello, world!".into())
    );
}

#[test]
fn test_embedded_arithmetic() {
    assert_eq!(
        eval_source("\"sum: {1 + 2}!\""),
        Value::String("sum: 3!".into())
    );
}

#[test]
fn test_parts_use_display_form() {
    assert_eq!(
        eval_source("\"items: {[1, 2]} flag: {true} none: {undefined}.\""),
        Value::String("items: [1, 2] flag: true none: undefined.".into())
    );
}

#[test]
fn test_a_single_embedded_expression_yields_the_value_itself() {
    // A one-part interpolated string is hoisted to that part, so the
    // embedded value is returned unconverted.
    assert_eq!(eval_source("\"{5}\""), Value::Long(5));
    assert_eq!(eval_source("\"{[1, 2]}\""), eval_source("[1, 2]"));
}

#[test]
fn test_whitespace_inside_braces_is_trivia() {
    assert_eq!(
        eval_source("n = 7; \"n is { n }!\""),
        Value::String("n is 7!".into())
    );
}

#[test]
fn test_nested_interpolation() {
    assert_eq!(
        eval_source("\"a{\"b{1}c\"}d\""),
        Value::String("ab1cd".into())
    );
}

#[test]
fn test_closing_brace_is_plain_content() {
    assert_eq!(eval_source("\"a}b\""), Value::String("a}b".into()));
}

#[test]
fn test_unterminated_interpolation_is_a_parse_error() {
    assert!(matches!(
        eval_error("\"a{1"),
        culebra::interpreter::InterpretError::Parse(_)
    ));
}

#[test]
fn test_empty_braces_are_a_parse_error() {
    assert!(matches!(
        eval_error("\"a{}b\""),
        culebra::interpreter::InterpretError::Parse(_)
    ));
}
