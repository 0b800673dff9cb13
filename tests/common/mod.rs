use culebra::interpreter::{global_env, parse_and_run, InterpretError};
use culebra::Value;

pub fn eval_source(source: &str) -> Value {
    parse_and_run(source, &global_env()).expect("program should succeed")
}

pub fn eval_error(source: &str) -> InterpretError {
    parse_and_run(source, &global_env()).expect_err("program should fail")
}
