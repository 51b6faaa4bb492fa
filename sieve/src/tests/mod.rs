
// Evaluator tests
mod evaluation;


// Engine tests
mod engine;

use crate::{Engine, SieveError, SieveResult, Value};
use std::collections::HashMap;

pub(crate) fn params(entries: &[(&str, Value)]) -> HashMap<String, Value> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

pub(crate) fn eval(text: &str, entries: &[(&str, Value)]) -> SieveResult<bool> {
    Engine::new().evaluate_expression(text, &params(entries))
}

pub(crate) fn eval_err(text: &str, entries: &[(&str, Value)]) -> SieveError {
    match eval(text, entries) {
        Ok(value) => panic!("expected '{}' to fail, got {}", text, value),
        Err(err) => err,
    }
}
