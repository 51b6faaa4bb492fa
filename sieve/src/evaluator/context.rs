//! Variable lookup during evaluation
//!
//! Contains the views an expression is evaluated against.

use crate::{BatchResults, Value};
use std::collections::HashMap;

/// Variables visible to one expression
///
/// Two layers:
/// - Parameters supplied by the caller
/// - Results computed so far in the batch (these shadow parameters)
#[derive(Debug, Clone, Copy)]
pub struct Environment<'a> {
    parameters: &'a HashMap<String, Value>,
    results: &'a BatchResults,
}

impl<'a> Environment<'a> {
    pub fn new(parameters: &'a HashMap<String, Value>, results: &'a BatchResults) -> Self {
        Self {
            parameters,
            results,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        match self.results.get(name) {
            Some(result) => Some(Value::Boolean(result)),
            None => self.parameters.get(name).cloned(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.results.contains(name) || self.parameters.contains_key(name)
    }

    /// Boolean-only view of this environment
    pub fn booleans(&self) -> BooleanContext<'a> {
        BooleanContext { environment: *self }
    }
}

/// Read-only view of the boolean entries of an `Environment`.
///
/// Operations use it to look up earlier flags by name without seeing
/// non-boolean parameters.
#[derive(Debug, Clone, Copy)]
pub struct BooleanContext<'a> {
    environment: Environment<'a>,
}

impl BooleanContext<'_> {
    pub fn get(&self, name: &str) -> Option<bool> {
        match self.environment.results.get(name) {
            Some(result) => Some(result),
            None => self
                .environment
                .parameters
                .get(name)
                .and_then(Value::as_boolean),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of all boolean entries, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.environment.results.names().collect();
        names.extend(
            self.environment
                .parameters
                .iter()
                .filter(|(name, value)| {
                    value.as_boolean().is_some() && !self.environment.results.contains(name)
                })
                .map(|(name, _)| name.as_str()),
        );
        names.sort_unstable();
        names
    }
}
