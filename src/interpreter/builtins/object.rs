//! Object intrinsics.

use std::rc::Rc;

use super::super::environment::EnvRef;
use super::super::error::RuntimeError;
use crate::value::{FunctionValue, Value};

pub fn intrinsic(name: &str) -> Option<Value> {
    match name {
        "size" => Some(size()),
        _ => None,
    }
}

fn size() -> Value {
    Value::Function(FunctionValue::new(
        Vec::new(),
        Rc::new(|env: &EnvRef| {
            let receiver = env.borrow().get("this")?;
            match receiver.as_object() {
                Some(object) => {
                    let len = object.properties.borrow().len();
                    Ok(Value::Long(len as i64))
                }
                None => Err(RuntimeError::type_error(format!(
                    "{} is not an object",
                    receiver.kind()
                ))),
            }
        }),
    ))
}
