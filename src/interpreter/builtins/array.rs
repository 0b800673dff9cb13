//! Array intrinsics.

use std::rc::Rc;

use super::super::environment::EnvRef;
use super::super::error::RuntimeError;
use crate::value::{ArrayValue, FunctionValue, Parameter, Value};

pub fn intrinsic(name: &str) -> Option<Value> {
    match name {
        "size" => Some(size()),
        "push" => Some(push()),
        _ => None,
    }
}

fn this_array(env: &EnvRef) -> Result<ArrayValue, RuntimeError> {
    let receiver = env.borrow().get("this")?;
    match receiver.as_array() {
        Some(array) => Ok(array.clone()),
        None => Err(RuntimeError::type_error(format!(
            "{} is not an array",
            receiver.kind()
        ))),
    }
}

fn size() -> Value {
    Value::Function(FunctionValue::new(
        Vec::new(),
        Rc::new(|env: &EnvRef| {
            let array = this_array(env)?;
            let len = array.values.borrow().len();
            Ok(Value::Long(len as i64))
        }),
    ))
}

fn push() -> Value {
    Value::Function(FunctionValue::new(
        vec![Parameter {
            name: Rc::from("arg"),
            mutable: false,
        }],
        Rc::new(|env: &EnvRef| {
            let array = this_array(env)?;
            let arg = env.borrow().get("arg")?;
            array.values.borrow_mut().push(arg);
            Ok(Value::Undefined)
        }),
    ))
}
