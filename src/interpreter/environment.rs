use std::collections::HashMap;

use crate::ast::LiteralKind;
use crate::error::RuntimeError;
use crate::interpreter::value::Value;

/// A declared variable. `value` is `None` until the first assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub kind: LiteralKind,
    pub value: Option<Value>,
    pub mutable: bool,
}

/// The single flat variable scope of a program run.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn declare(&mut self, name: &str, binding: Binding) -> Result<(), RuntimeError> {
        if self.contains(name) {
            return Err(RuntimeError::already_exists(name));
        }
        self.values.insert(name.to_string(), binding);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Binding, RuntimeError> {
        self.values
            .get(name)
            .ok_or_else(|| RuntimeError::not_found(name))
    }

    /// Copy of the current value; fails for placeholders.
    pub fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        self.get(name)?
            .value
            .clone()
            .ok_or_else(|| RuntimeError::uninitialized(name))
    }

    /// Replace a value, keeping the binding's kind and mutability.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let binding = self
            .values
            .get_mut(name)
            .ok_or_else(|| RuntimeError::not_found(name))?;
        if binding.kind != value.kind {
            return Err(RuntimeError::type_mismatch(name, binding.kind, value.kind));
        }
        if !binding.mutable {
            return Err(RuntimeError::not_mutable(name));
        }
        binding.value = Some(value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
