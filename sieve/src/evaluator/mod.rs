//! Expression evaluation
//!
//! Walks a compiled `Expression` against an `Environment`:
//! 1. Literals evaluate to themselves, variables are looked up lazily
//! 2. `!`, `AND`, `OR` and the ternary condition require booleans
//! 3. `AND`/`OR` short-circuit and the ternary evaluates only the taken branch
//! 4. Comparisons and calls dispatch through the registry

pub mod context;

use crate::ast::Expression;
use crate::registry::{Arguments, CallContext, Registry};
use crate::{ResourceLimits, SieveError, SieveResult, Value};
use context::Environment;

/// Evaluates compiled expressions against one registry
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    registry: &'a Registry,
    limits: &'a ResourceLimits,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a Registry, limits: &'a ResourceLimits) -> Self {
        Self {
            registry,
            limits,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn limits(&self) -> &'a ResourceLimits {
        self.limits
    }

    /// An evaluator one composite call deeper
    pub fn nested(&self) -> SieveResult<Evaluator<'a>> {
        let depth = self.depth + 1;
        if depth > self.limits.max_call_depth {
            return Err(SieveError::ResourceLimitExceeded {
                limit_name: "max_call_depth".to_string(),
                limit_value: self.limits.max_call_depth,
                actual_value: depth,
            });
        }
        Ok(Evaluator { depth, ..*self })
    }

    /// Evaluate an expression that must produce a boolean
    pub fn evaluate_predicate(
        &self,
        expression: &Expression,
        environment: &Environment<'_>,
    ) -> SieveResult<bool> {
        match self.evaluate(expression, environment)? {
            Value::Boolean(result) => Ok(result),
            other => Err(SieveError::NonBooleanResult(other.describe())),
        }
    }

    pub fn evaluate(
        &self,
        expression: &Expression,
        environment: &Environment<'_>,
    ) -> SieveResult<Value> {
        match expression {
            Expression::Literal { value } => Ok(value.clone()),

            Expression::Variable { name } => environment
                .lookup(name)
                .ok_or_else(|| SieveError::UndefinedVariable(name.clone())),

            Expression::List { items } => items
                .iter()
                .map(|item| self.evaluate(item, environment))
                .collect::<SieveResult<Vec<_>>>()
                .map(Value::List),

            Expression::Not { operand } => {
                let operand = self.evaluate(operand, environment)?;
                Ok(Value::Boolean(!operand.expect_boolean("operand of NOT")?))
            }

            Expression::And { left, right } => {
                if !self.evaluate(left, environment)?.expect_boolean("left operand of AND")? {
                    return Ok(Value::Boolean(false));
                }
                let right = self.evaluate(right, environment)?;
                Ok(Value::Boolean(right.expect_boolean("right operand of AND")?))
            }

            Expression::Or { left, right } => {
                if self.evaluate(left, environment)?.expect_boolean("left operand of OR")? {
                    return Ok(Value::Boolean(true));
                }
                let right = self.evaluate(right, environment)?;
                Ok(Value::Boolean(right.expect_boolean("right operand of OR")?))
            }

            Expression::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self
                    .evaluate(condition, environment)?
                    .expect_boolean("ternary condition")?;
                if condition {
                    self.evaluate(then_branch, environment)
                } else {
                    self.evaluate(else_branch, environment)
                }
            }

            Expression::Comparison {
                operation,
                left,
                right,
                ..
            } => self.evaluate_comparison(operation, left, right, environment),

            Expression::Call {
                operation,
                arguments,
            } => {
                let registered = self
                    .registry
                    .lookup(operation)
                    .ok_or_else(|| SieveError::UnknownOperation(operation.clone()))?;

                let mut values = Arguments::new();
                for argument in arguments {
                    values.insert(
                        argument.name.clone(),
                        self.evaluate(&argument.value, environment)?,
                    );
                }

                let context = CallContext::new(environment.booleans(), self);
                registered.apply(&values, &context).map(Value::Boolean)
            }
        }
    }

    fn evaluate_comparison(
        &self,
        operation: &str,
        left: &Expression,
        right: &Expression,
        environment: &Environment<'_>,
    ) -> SieveResult<Value> {
        let registered = self
            .registry
            .lookup(operation)
            .ok_or_else(|| SieveError::UnknownOperation(operation.to_string()))?;

        let (left_name, right_name) = match registered.canonical_args() {
            [left_name, right_name, ..] => (left_name.clone(), right_name.clone()),
            args => {
                return Err(SieveError::ArityMismatch {
                    operation: operation.to_string(),
                    expected: args.len(),
                    actual: 2,
                })
            }
        };

        let mut arguments = Arguments::new();
        arguments.insert(left_name, self.evaluate(left, environment)?);
        arguments.insert(right_name, self.evaluate(right, environment)?);

        let context = CallContext::new(environment.booleans(), self);
        registered.apply(&arguments, &context).map(Value::Boolean)
    }
}
