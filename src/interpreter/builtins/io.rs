//! Output built-ins.

use std::io::Write;
use std::rc::Rc;

use super::super::environment::EnvRef;
use crate::value::{FunctionValue, Parameter, Value};

/// `puts(arg)` prints the display form of `arg` and a newline to stdout.
pub fn puts() -> Value {
    Value::Function(FunctionValue::new(
        vec![Parameter {
            name: Rc::from("arg"),
            mutable: true,
        }],
        Rc::new(|env: &EnvRef| {
            let value = env.borrow().get("arg")?;
            println!("{}", value);
            std::io::stdout().flush().ok();
            Ok(Value::Undefined)
        }),
    ))
}
