//! Tree-walking evaluation of the parsed program.
//!
//! Each grammar production maps to one rule. Function application builds a
//! fresh call frame seeded with `self`, the bound parameters and the call
//! site position, then hands the frame to the function closure; script
//! closures splice their defining environment onto the frame with
//! `append_outer` before evaluating the body. A property access that
//! resolves to a function produces a bound method: a wrapper closure that
//! seeds `this` with the receiver before delegating.

use std::cmp::Ordering;
use std::rc::Rc;

use super::builtins;
use super::environment::{EnvRef, Environment};
use super::error::RuntimeError;
use crate::ast::{Node, Tag};
use crate::diagnostic::Span;
use crate::value::{ArrayValue, EvalFn, FunctionValue, ObjectValue, Parameter, Value};

pub fn eval(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    match node.tag {
        Tag::Statements => eval_statements(node, env),
        Tag::While => eval_while(node, env),
        Tag::If => eval_if(node, env),
        Tag::Function => eval_function(node, env),
        Tag::Call => eval_call(node, env),
        Tag::Block => Ok(Value::Undefined),
        Tag::Assignment => eval_assignment(node, env),
        Tag::LogicalOr => eval_logical_or(node, env),
        Tag::LogicalAnd => eval_logical_and(node, env),
        Tag::Condition => eval_condition(node, env),
        Tag::UnaryPlus => eval_unary_plus(node, env),
        Tag::UnaryMinus => eval_unary_minus(node, env),
        Tag::UnaryNot => eval_unary_not(node, env),
        Tag::Additive | Tag::Multiplicative => eval_bin_expression(node, env),
        Tag::Identifier => env
            .borrow()
            .get(node.token_text())
            .map_err(|e| e.with_span(node.span)),
        Tag::Object => eval_object(node, env),
        Tag::Array => eval_array(node, env),
        Tag::Undefined => Ok(Value::Undefined),
        Tag::Boolean => Ok(Value::Bool(node.token_text() == "true")),
        Tag::Number => eval_number(node),
        Tag::String | Tag::InterpolatedContent => match &node.token {
            Some(token) => Ok(Value::String(Rc::clone(token))),
            None => Err(RuntimeError::internal("string node without a token")),
        },
        Tag::Interpolated => eval_interpolated(node, env),
        _ => Err(RuntimeError::internal(format!(
            "unexpected {} node",
            node.tag.name()
        ))),
    }
}

fn child<'n>(node: &'n Rc<Node>, index: usize) -> Result<&'n Rc<Node>, RuntimeError> {
    node.children.get(index).ok_or_else(|| {
        RuntimeError::internal(format!(
            "{} node is missing child {}",
            node.tag.name(),
            index
        ))
    })
}

fn truthy(value: &Value, span: Span) -> Result<bool, RuntimeError> {
    value.to_bool().map_err(|e| e.with_span(span))
}

fn eval_statements(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let mut value = Value::Undefined;
    for statement in &node.children {
        value = eval(statement, env)?;
    }
    Ok(value)
}

fn eval_while(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let condition = child(node, 0)?;
    let body = child(node, 1)?;
    loop {
        let value = eval(condition, env)?;
        if !truthy(&value, condition.span)? {
            break;
        }
        eval(body, env)?;
    }
    Ok(Value::Undefined)
}

fn eval_if(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let nodes = &node.children;
    let mut i = 0;
    while i < nodes.len() {
        if i + 1 == nodes.len() {
            // trailing else
            return eval(&nodes[i], env);
        }
        let condition = eval(&nodes[i], env)?;
        if truthy(&condition, nodes[i].span)? {
            return eval(&nodes[i + 1], env);
        }
        i += 2;
    }
    Ok(Value::Undefined)
}

fn eval_function(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let parameters = child(node, 0)?;
    let mut params = Vec::with_capacity(parameters.children.len());
    for parameter in &parameters.children {
        let mutable = child(parameter, 0)?.token_text() == "mut";
        let name = child(parameter, 1)?.token_text();
        params.push(Parameter {
            name: Rc::from(name),
            mutable,
        });
    }

    let body = Rc::clone(child(node, 1)?);
    let defining_env = Rc::clone(env);
    let closure: EvalFn = Rc::new(move |call_env: &EnvRef| {
        call_env
            .borrow_mut()
            .append_outer(Rc::clone(&defining_env));
        eval(&body, call_env)
    });

    Ok(Value::Function(FunctionValue::new(params, closure)))
}

fn eval_call(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let mut value = eval(child(node, 0)?, env)?;
    for postfix in node.children.iter().skip(1) {
        value = match postfix.original_tag {
            Tag::Arguments => apply_arguments(node, postfix, value, env)?,
            Tag::Index => apply_index(postfix, value, env)?,
            Tag::Dot => apply_property(postfix, value)?,
            _ => {
                return Err(RuntimeError::internal(format!(
                    "unexpected {} call postfix",
                    postfix.tag.name()
                )))
            }
        };
    }
    Ok(value)
}

fn apply_arguments(
    call: &Rc<Node>,
    arguments: &Rc<Node>,
    callee: Value,
    env: &EnvRef,
) -> Result<Value, RuntimeError> {
    let function = match callee.as_function() {
        Some(function) => function.clone(),
        None => {
            return Err(RuntimeError::type_error_at(
                format!("{} is not callable", callee.kind()),
                call.span,
            ))
        }
    };
    if arguments.children.len() < function.params.len() {
        return Err(RuntimeError::arity_error(
            function.params.len(),
            arguments.children.len(),
            call.span,
        ));
    }

    let call_env = Environment::new_ref();
    call_env.borrow_mut().initialize("self", callee, false);
    // Arguments are evaluated left-to-right in the caller's environment;
    // arguments beyond the parameter count are never evaluated.
    for (param, argument) in function.params.iter().zip(arguments.children.iter()) {
        let value = eval(argument, env)?;
        call_env
            .borrow_mut()
            .initialize(&param.name, value, param.mutable);
    }
    {
        let mut frame = call_env.borrow_mut();
        frame.initialize("__LINE__", Value::Long(call.line as i64), false);
        frame.initialize("__COLUMN__", Value::Long(call.column as i64), false);
    }

    (function.eval)(&call_env)
}

fn apply_index(index: &Rc<Node>, value: Value, env: &EnvRef) -> Result<Value, RuntimeError> {
    if value.as_array().is_none() {
        return Err(RuntimeError::type_error_at(
            format!("cannot index into {}", value.kind()),
            index.span,
        ));
    }
    let idx = eval(index, env)?
        .to_long()
        .map_err(|e| e.with_span(index.span))?;
    if let Value::Array(array) = &value {
        let values = array.values.borrow();
        if idx >= 0 && (idx as usize) < values.len() {
            return Ok(values[idx as usize].clone());
        }
    }
    // An out-of-range index leaves the working value unchanged.
    Ok(value)
}

fn apply_property(dot: &Rc<Node>, value: Value) -> Result<Value, RuntimeError> {
    let name = dot.token_text();
    let property = lookup_property(&value, name, dot.span)?;
    if let Value::Function(method) = &property {
        let receiver = value.clone();
        let inner = method.clone();
        let bound: EvalFn = Rc::new(move |call_env: &EnvRef| {
            call_env
                .borrow_mut()
                .initialize("this", receiver.clone(), false);
            (inner.eval)(call_env)
        });
        return Ok(Value::Function(FunctionValue {
            params: Rc::clone(&method.params),
            eval: bound,
        }));
    }
    Ok(property)
}

fn lookup_property(value: &Value, name: &str, span: Span) -> Result<Value, RuntimeError> {
    match value {
        Value::Object(object) => {
            // Own properties shadow the intrinsic table.
            if let Some(property) = object.properties.borrow().get(name) {
                return Ok(property.clone());
            }
            builtins::object::intrinsic(name).ok_or_else(|| {
                RuntimeError::type_error_at(format!("undefined property '{}'", name), span)
            })
        }
        Value::Array(_) => builtins::array::intrinsic(name).ok_or_else(|| {
            RuntimeError::type_error_at(format!("undefined property '{}'", name), span)
        }),
        other => Err(RuntimeError::type_error_at(
            format!("{} has no properties", other.kind()),
            span,
        )),
    }
}

fn eval_assignment(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let mutable = child(node, 0)?.token_text() == "mut";
    let name = child(node, 1)?.token_text();
    let value = eval(child(node, 2)?, env)?;

    let defined = env.borrow().has(name);
    if defined {
        env.borrow_mut()
            .assign(name, value.clone())
            .map_err(|e| e.with_span(node.span))?;
    } else {
        env.borrow_mut().initialize(name, value.clone(), mutable);
    }
    Ok(value)
}

fn eval_logical_or(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let mut value = Value::Undefined;
    for operand in &node.children {
        value = eval(operand, env)?;
        if truthy(&value, operand.span)? {
            return Ok(value);
        }
    }
    Ok(value)
}

fn eval_logical_and(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let mut value = Value::Undefined;
    for operand in &node.children {
        value = eval(operand, env)?;
        if !truthy(&value, operand.span)? {
            return Ok(value);
        }
    }
    Ok(value)
}

fn eval_condition(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    if node.children.len() != 3 {
        return Err(RuntimeError::internal(
            "comparison chains are not supported",
        ));
    }
    let lhs = eval(&node.children[0], env)?;
    let op = node.children[1].token_text();
    let rhs = eval(&node.children[2], env)?;

    let result = match op {
        "==" => lhs.equals(&rhs).map_err(|e| e.with_span(node.span))?,
        "!=" => !lhs.equals(&rhs).map_err(|e| e.with_span(node.span))?,
        other => {
            let ordering = lhs.ordering(&rhs).map_err(|e| e.with_span(node.span))?;
            match other {
                "<" => matches!(ordering, Some(Ordering::Less)),
                "<=" => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                ">" => matches!(ordering, Some(Ordering::Greater)),
                ">=" => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
                _ => {
                    return Err(RuntimeError::internal(format!(
                        "unknown comparison operator '{}'",
                        other
                    )))
                }
            }
        }
    };
    Ok(Value::Bool(result))
}

fn eval_unary_plus(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let operand = child(node, 1)?;
    let n = eval(operand, env)?
        .to_long()
        .map_err(|e| e.with_span(operand.span))?;
    Ok(Value::Long(n))
}

fn eval_unary_minus(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let operand = child(node, 1)?;
    let n = eval(operand, env)?
        .to_long()
        .map_err(|e| e.with_span(operand.span))?;
    Ok(Value::Long(n.wrapping_neg()))
}

fn eval_unary_not(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let operand = child(node, 1)?;
    let value = eval(operand, env)?;
    Ok(Value::Bool(!truthy(&value, operand.span)?))
}

fn eval_bin_expression(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let first = child(node, 0)?;
    let mut acc = eval(first, env)?
        .to_long()
        .map_err(|e| e.with_span(first.span))?;

    let mut i = 1;
    while i + 1 < node.children.len() {
        let op_node = &node.children[i];
        let operand_node = &node.children[i + 1];
        let operand = eval(operand_node, env)?
            .to_long()
            .map_err(|e| e.with_span(operand_node.span))?;
        acc = match op_node.token_text() {
            "+" => acc.wrapping_add(operand),
            "-" => acc.wrapping_sub(operand),
            "*" => acc.wrapping_mul(operand),
            "/" => {
                if operand == 0 {
                    return Err(RuntimeError::division_by_zero(op_node.span));
                }
                acc.wrapping_div(operand)
            }
            "%" => {
                if operand == 0 {
                    return Err(RuntimeError::division_by_zero(op_node.span));
                }
                acc.wrapping_rem(operand)
            }
            other => {
                return Err(RuntimeError::internal(format!(
                    "unknown arithmetic operator '{}'",
                    other
                )))
            }
        };
        i += 2;
    }
    Ok(Value::Long(acc))
}

fn eval_number(node: &Rc<Node>) -> Result<Value, RuntimeError> {
    node.token_text()
        .parse::<i64>()
        .map(Value::Long)
        .map_err(|_| {
            RuntimeError::internal(format!(
                "malformed number literal '{}'",
                node.token_text()
            ))
        })
}

fn eval_object(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let object = ObjectValue::new();
    for property in &node.children {
        let key = child(property, 0)?.token_text().to_string();
        let value = eval(child(property, 1)?, env)?;
        // Duplicate keys overwrite.
        object.properties.borrow_mut().insert(key, value);
    }
    Ok(Value::Object(object))
}

fn eval_array(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let array = ArrayValue::new();
    for element in &node.children {
        let value = eval(element, env)?;
        array.values.borrow_mut().push(value);
    }
    Ok(Value::Array(array))
}

fn eval_interpolated(node: &Rc<Node>, env: &EnvRef) -> Result<Value, RuntimeError> {
    let mut text = String::new();
    for part in &node.children {
        let value = eval(part, env)?;
        text.push_str(&value.to_string());
    }
    Ok(Value::String(Rc::from(text)))
}
