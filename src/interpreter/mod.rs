//! The Culebra interpreter: environments, evaluation rules, built-ins and
//! the embedder entry points.

pub mod builtins;
pub mod environment;
pub mod error;
pub mod evaluator;

use std::fmt;

pub use environment::{EnvRef, Environment};
pub use error::RuntimeError;
pub use evaluator::eval;

use crate::diagnostic::Diagnostic;
use crate::parser::{self, ParseError};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum InterpretError {
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl InterpretError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Parse(error) => error.to_diagnostic(),
            Self::Runtime(error) => error.to_diagnostic(),
        }
    }
}

impl fmt::Display for InterpretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(error) => write!(f, "{}", error),
            Self::Runtime(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for InterpretError {}

impl From<ParseError> for InterpretError {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<RuntimeError> for InterpretError {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}

/// A fresh root environment with the built-ins seeded.
pub fn global_env() -> EnvRef {
    let env = Environment::new_ref();
    builtins::install(&env);
    env
}

/// Parses and evaluates `source` against `env`, optionally dumping the
/// parsed tree to stderr first.
pub fn interpret(source: &str, env: &EnvRef, print_ast: bool) -> Result<Value, InterpretError> {
    let ast = parser::parse(source)?;
    if print_ast {
        eprint!("{}", ast.dump());
    }
    Ok(evaluator::eval(&ast, env)?)
}

pub fn parse_and_run(source: &str, env: &EnvRef) -> Result<Value, InterpretError> {
    interpret(source, env, false)
}

/// Language-neutral embedder entry point. `path` only prefixes parse
/// diagnostics; bindings created before a failure stay in `env`.
pub fn run(path: &str, env: &EnvRef, source: &str, print_ast: bool) -> Result<Value, String> {
    interpret(source, env, print_ast).map_err(|error| match error {
        InterpretError::Parse(e) => format!("{}:{}:{}: {}", path, e.line, e.column, e.message),
        InterpretError::Runtime(e) => e.to_string(),
    })
}
