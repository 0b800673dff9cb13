//! Guest values.
//!
//! Primitive kinds are copied by value; `Object`, `Array` and `Function`
//! payloads are shared by handle, so cloning a composite value yields an
//! alias and mutation through one alias is visible through all of them.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::interpreter::environment::EnvRef;
use crate::interpreter::error::RuntimeError;

/// Host closure invoked with the call frame when a function value is applied.
pub type EvalFn = Rc<dyn Fn(&EnvRef) -> Result<Value, RuntimeError>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Rc<str>,
    pub mutable: bool,
}

#[derive(Clone)]
pub struct FunctionValue {
    pub params: Rc<Vec<Parameter>>,
    pub eval: EvalFn,
}

impl FunctionValue {
    pub fn new(params: Vec<Parameter>, eval: EvalFn) -> Self {
        Self {
            params: Rc::new(params),
            eval,
        }
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl PartialEq for FunctionValue {
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectValue {
    pub properties: Rc<RefCell<BTreeMap<String, Value>>>,
}

impl ObjectValue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayValue {
    pub values: Rc<RefCell<Vec<Value>>>,
}

impl ArrayValue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Bool(bool),
    Long(i64),
    String(Rc<str>),
    Object(ObjectValue),
    Array(ArrayValue),
    Function(FunctionValue),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "bool",
            Value::Long(_) => "long",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::Function(_) => "function",
        }
    }

    pub fn to_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Long(n) => Ok(*n != 0),
            other => Err(RuntimeError::type_error(format!(
                "cannot convert {} to bool",
                other.kind()
            ))),
        }
    }

    pub fn to_long(&self) -> Result<i64, RuntimeError> {
        match self {
            Value::Long(n) => Ok(*n),
            Value::Bool(b) => Ok(i64::from(*b)),
            other => Err(RuntimeError::type_error(format!(
                "cannot convert {} to long",
                other.kind()
            ))),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s.as_ref())
        } else {
            None
        }
    }

    pub fn as_function(&self) -> Option<&FunctionValue> {
        if let Value::Function(function) = self {
            Some(function)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        if let Value::Object(object) = self {
            Some(object)
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        if let Value::Array(array) = self {
            Some(array)
        } else {
            None
        }
    }

    /// Guest equality: matching primitive kinds only, anything else is a
    /// type error.
    pub fn equals(&self, other: &Value) -> Result<bool, RuntimeError> {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => Ok(true),
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            (Value::Long(a), Value::Long(b)) => Ok(a == b),
            (Value::String(a), Value::String(b)) => Ok(a == b),
            (a, b) => Err(RuntimeError::type_error(format!(
                "cannot compare {} with {}",
                a.kind(),
                b.kind()
            ))),
        }
    }

    /// Guest ordering: `Undefined` on either side compares false (`None`),
    /// matching primitive kinds compare pairwise, anything else is a type
    /// error.
    pub fn ordering(&self, other: &Value) -> Result<Option<Ordering>, RuntimeError> {
        match (self, other) {
            (Value::Undefined, _) | (_, Value::Undefined) => Ok(None),
            (Value::Bool(a), Value::Bool(b)) => Ok(Some(a.cmp(b))),
            (Value::Long(a), Value::Long(b)) => Ok(Some(a.cmp(b))),
            (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
            (a, b) => Err(RuntimeError::type_error(format!(
                "cannot compare {} with {}",
                a.kind(),
                b.kind()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Long(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Array(array) => {
                f.write_str("[")?;
                for (i, value) in array.values.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
            Value::Object(object) => {
                f.write_str("{")?;
                for (i, (key, value)) in object.properties.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{}\": {}", key, value)?;
                }
                f.write_str("}")
            }
            Value::Function(_) => f.write_str("[function]"),
        }
    }
}
