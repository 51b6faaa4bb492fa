//! Composite operations
//!
//! A composite operation is defined as data: declared arguments, optional
//! constants and an ordered list of named step expressions. Each step sees the
//! constants, the call's arguments and the results of earlier steps; the value
//! of the last step is the result of the call. Unlike a batch, a failing step
//! fails the whole call.

use super::{Arguments, CallContext, Operation, Registry};
use crate::evaluator::context::Environment;
use crate::serializers::value_from_json;
use crate::{parser, BatchResults, Expression, ResourceLimits, SieveError, SieveResult, Value};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Definition of a composite operation, as loaded from JSON
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OperationDefinition {
    pub name: String,
    /// Canonical argument order
    pub args: Vec<String>,
    #[serde(default)]
    pub constants: serde_json::Map<String, serde_json::Value>,
    pub steps: Vec<StepDefinition>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StepDefinition {
    pub name: String,
    pub expression: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Definitions {
    Many(Vec<OperationDefinition>),
    One(OperationDefinition),
}

/// Parse one definition or an array of definitions
pub fn parse_definitions(json: &str) -> SieveResult<Vec<OperationDefinition>> {
    let definitions: Definitions = serde_json::from_str(json)?;
    Ok(match definitions {
        Definitions::Many(definitions) => definitions,
        Definitions::One(definition) => vec![definition],
    })
}

/// A compiled composite operation
#[derive(Debug, Clone)]
pub struct CompositeOperation {
    name: String,
    args: Vec<String>,
    constants: HashMap<String, Value>,
    steps: Vec<(String, Expression)>,
}

impl CompositeOperation {
    /// Validate a definition and compile its steps against `registry`
    pub fn compile(
        definition: &OperationDefinition,
        registry: &Registry,
        limits: &ResourceLimits,
    ) -> SieveResult<Self> {
        let name = &definition.name;
        if name.is_empty() {
            return Err(SieveError::invalid_definition(name, "name must not be empty"));
        }
        if definition.steps.is_empty() {
            return Err(SieveError::invalid_definition(name, "at least one step is required"));
        }

        let mut seen = HashSet::new();
        for arg in &definition.args {
            if !seen.insert(arg.as_str()) {
                return Err(SieveError::invalid_definition(
                    name,
                    format!("argument '{}' is declared twice", arg),
                ));
            }
        }

        let mut constants = HashMap::new();
        for (key, value) in &definition.constants {
            constants.insert(key.clone(), value_from_json(value)?);
        }

        let mut step_names = HashSet::new();
        let mut steps = Vec::with_capacity(definition.steps.len());
        for step in &definition.steps {
            if !step_names.insert(step.name.as_str()) {
                return Err(SieveError::invalid_definition(
                    name,
                    format!("step '{}' is declared twice", step.name),
                ));
            }
            let expression = parser::parse(&step.expression, registry, limits)?;
            steps.push((step.name.clone(), expression));
        }

        Ok(Self {
            name: name.clone(),
            args: definition.args.clone(),
            constants,
            steps,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Compile and register into `registry` under the definition's name
    pub fn register(
        definition: &OperationDefinition,
        registry: &mut Registry,
        limits: &ResourceLimits,
    ) -> SieveResult<()> {
        let operation = Self::compile(definition, registry, limits)?;
        let name = operation.name().to_string();
        let args = operation.args().to_vec();
        registry.register(name, args, operation);
        Ok(())
    }
}

impl Operation for CompositeOperation {
    fn apply(&self, arguments: &Arguments, context: &CallContext<'_>) -> SieveResult<bool> {
        let evaluator = context.evaluator().nested()?;

        let mut parameters = self.constants.clone();
        for arg in &self.args {
            parameters.insert(arg.clone(), arguments.require(arg)?.clone());
        }

        let mut results = BatchResults::new();
        let mut last = false;
        for (step, expression) in &self.steps {
            let environment = Environment::new(&parameters, &results);
            last = evaluator.evaluate_predicate(expression, &environment)?;
            results.insert(step.clone(), last);
        }
        Ok(last)
    }
}
