//! The chain of lexical frames a program runs against.
//!
//! Each frame maps names to bindings with a mutability flag and points to an
//! optional outer frame. Lookup walks outward and the first hit wins.
//! `append_outer` attaches an environment at the far end of the chain; it is
//! the only splicing operation and happens once per call, when a function
//! closure attaches its defining environment to the fresh call frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::error::RuntimeError;
use crate::value::Value;

pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    mutable: bool,
}

#[derive(Debug, Default)]
pub struct Environment {
    symbols: HashMap<String, Binding>,
    outer: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_ref() -> EnvRef {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn has(&self, name: &str) -> bool {
        if self.symbols.contains_key(name) {
            return true;
        }
        match &self.outer {
            Some(outer) => outer.borrow().has(name),
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        if let Some(binding) = self.symbols.get(name) {
            return Ok(binding.value.clone());
        }
        match &self.outer {
            Some(outer) => outer.borrow().get(name),
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }

    /// Defines (or overwrites) `name` in this frame.
    pub fn initialize(&mut self, name: &str, value: Value, mutable: bool) {
        self.symbols.insert(name.to_string(), Binding { value, mutable });
    }

    /// Overwrites the nearest definition of `name`. The evaluator only calls
    /// this after `has` confirmed a definition exists.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        if let Some(binding) = self.symbols.get_mut(name) {
            if !binding.mutable {
                return Err(RuntimeError::immutable_assignment(name));
            }
            binding.value = value;
            return Ok(());
        }
        match &self.outer {
            Some(outer) => outer.borrow_mut().assign(name, value),
            None => Err(RuntimeError::internal(format!(
                "assignment to undefined variable '{}'",
                name
            ))),
        }
    }

    /// Attaches `outer` as the outermost parent of the chain.
    pub fn append_outer(&mut self, outer: EnvRef) {
        match &self.outer {
            Some(existing) => existing.borrow_mut().append_outer(outer),
            None => self.outer = Some(outer),
        }
    }
}
