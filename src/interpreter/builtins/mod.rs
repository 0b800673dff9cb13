//! Built-in surface visible to guest programs.
//!
//! `puts` and `assert` are seeded into the root environment as immutable
//! bindings. `size` and `push` are intrinsics: they are reachable through
//! property access on the matching composite kind but never shadow an own
//! property.

pub mod array;
pub mod io;
pub mod object;

use std::rc::Rc;

use super::environment::EnvRef;
use super::error::RuntimeError;
use crate::value::{FunctionValue, Parameter, Value};

/// Seeds the built-in bindings into the root environment.
pub fn install(env: &EnvRef) {
    let mut frame = env.borrow_mut();
    frame.initialize("puts", io::puts(), false);
    frame.initialize("assert", assert_function(), false);
}

/// `assert(arg)` aborts the run when `arg` is falsy, reporting the call
/// site position bound into the call frame.
fn assert_function() -> Value {
    Value::Function(FunctionValue::new(
        vec![Parameter {
            name: Rc::from("arg"),
            mutable: true,
        }],
        Rc::new(|env: &EnvRef| {
            let frame = env.borrow();
            let condition = frame.get("arg")?.to_bool()?;
            if !condition {
                let line = frame.get("__LINE__")?.to_long()?;
                let column = frame.get("__COLUMN__")?.to_long()?;
                return Err(RuntimeError::assertion_failed(line, column));
            }
            Ok(Value::Undefined)
        }),
    ))
}
