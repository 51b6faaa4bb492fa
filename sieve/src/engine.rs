use crate::evaluator::context::Environment;
use crate::evaluator::Evaluator;
use crate::registry::composite::{parse_definitions, CompositeOperation};
use crate::reporting::{EvaluationFailure, FailureReporter, TracingReporter};
use crate::{
    parse, BatchResults, Expression, Registry, ResourceLimits, SieveError, SieveResult, Value,
};
use std::collections::HashMap;
use std::sync::Arc;

/// The Sieve evaluation engine.
///
/// Owns the operation registry, the resource limits and the failure reporter.
/// Configure it through `&mut self` first; evaluation only needs `&self`, so a
/// configured engine can be shared between threads.
pub struct Engine {
    registry: Registry,
    limits: ResourceLimits,
    reporter: Arc<dyn FailureReporter>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            registry: Registry::with_builtins(),
            limits: ResourceLimits::default(),
            reporter: Arc::new(TracingReporter),
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom resource limits
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Create an engine around an existing registry (no built-ins are added)
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Replace the failure reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access for registering custom operations before evaluation
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Get the current resource limits
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Compile expression text without evaluating it
    pub fn compile(&self, text: &str) -> SieveResult<Expression> {
        parse(text, &self.registry, &self.limits)
    }

    /// Load composite operation definitions (one object or an array)
    ///
    /// Definitions are compiled in order, so later ones may call earlier ones.
    /// Either every definition is registered or, on the first error, none is.
    /// Returns the names that were registered.
    pub fn load_operations(&mut self, json: &str) -> SieveResult<Vec<String>> {
        let definitions = parse_definitions(json)?;
        let mut registry = self.registry.clone();
        let mut names = Vec::with_capacity(definitions.len());
        for definition in &definitions {
            CompositeOperation::register(definition, &mut registry, &self.limits)?;
            names.push(definition.name.clone());
        }

        self.registry = registry;
        for name in &names {
            tracing::debug!(operation = %name, "registered composite operation");
        }
        Ok(names)
    }

    /// Evaluate a single expression, returning its error instead of reporting it
    pub fn evaluate_expression(
        &self,
        text: &str,
        parameters: &HashMap<String, Value>,
    ) -> SieveResult<bool> {
        let results = BatchResults::new();
        self.evaluate_in(text, parameters, &results)
    }

    /// Evaluate named expressions in order against `parameters`.
    ///
    /// Each expression sees the parameters and every result recorded before it.
    /// A failing expression is reported and recorded as `false`; the batch
    /// always runs to the end.
    pub fn evaluate<I, N, T>(
        &self,
        expressions: I,
        parameters: &HashMap<String, Value>,
    ) -> BatchResults
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: AsRef<str>,
    {
        let mut results = BatchResults::new();

        for (name, text) in expressions {
            let name = name.into();
            let text = text.as_ref();

            if results.contains(&name) {
                self.report(&name, text, SieveError::DuplicateExpression(name.clone()));
                continue;
            }

            let value = match self.evaluate_in(text, parameters, &results) {
                Ok(value) => value,
                Err(error) => {
                    self.report(&name, text, error);
                    false
                }
            };
            tracing::debug!(name = %name, result = value, "recorded expression");
            results.insert(name, value);
        }

        results
    }

    fn evaluate_in(
        &self,
        text: &str,
        parameters: &HashMap<String, Value>,
        results: &BatchResults,
    ) -> SieveResult<bool> {
        let expression = self.compile(text)?;
        let environment = Environment::new(parameters, results);
        Evaluator::new(&self.registry, &self.limits).evaluate_predicate(&expression, &environment)
    }

    fn report(&self, name: &str, text: &str, error: SieveError) {
        self.reporter.report(&EvaluationFailure {
            name: name.to_string(),
            expression: text.to_string(),
            error,
        });
    }
}
