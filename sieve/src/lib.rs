//! # Sieve Engine
//!
//! **Boolean expressions over named parameters**
//!
//! Sieve compiles short textual expressions such as `age >= 18 && contains(name, "an")`
//! and evaluates them to a boolean. Expressions are evaluated in named batches:
//! each one can refer to the results of the expressions before it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sieve::{Engine, Value};
//! use std::collections::HashMap;
//!
//! let engine = Engine::new();
//! let parameters = HashMap::from([("age".to_string(), Value::from(21))]);
//!
//! let results = engine.evaluate(
//!     [
//!         ("isAdult", "age >= 18"),
//!         ("canVote", "isAdult && age >= 18"),
//!     ],
//!     &parameters,
//! );
//!
//! assert_eq!(results.get("canVote"), Some(true));
//! ```
//!
//! ## Core Concepts
//!
//! ### Operations
//! Every call and comparison dispatches to an operation in the `Registry`. An
//! operation has a canonical argument order, so `equals("a", "b")` and
//! `equals(left="a", right="b")` are the same call.
//!
//! ### Batches
//! `Engine::evaluate` never fails. A broken expression is reported to the
//! engine's `FailureReporter` and recorded as `false`, and the batch carries on.
//!
//! ### Composite operations
//! Operations can also be defined as data: an ordered list of named steps
//! loaded from JSON with `Engine::load_operations`.

pub mod ast;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod registry;
pub mod reporting;
pub mod resource_limits;
pub mod response;
pub mod serializers;
pub mod value;

pub use ast::{Argument, ComparisonOperator, Expression, Span};
pub use engine::Engine;
pub use error::SieveError;
pub use evaluator::context::{BooleanContext, Environment};
pub use evaluator::Evaluator;
pub use parser::parse;
pub use registry::composite::{CompositeOperation, OperationDefinition, StepDefinition};
pub use registry::{Arguments, CallContext, Operation, RegisteredOperation, Registry};
pub use reporting::{CollectingReporter, EvaluationFailure, FailureReporter, TracingReporter};
pub use resource_limits::ResourceLimits;
pub use response::BatchResults;
pub use value::Value;

/// Result type for Sieve operations
pub type SieveResult<T> = Result<T, SieveError>;

#[cfg(test)]
mod tests;
