//! Operation registry
//!
//! Maps operation names to an implementation and its canonical argument order.
//! The registry is an ordinary value owned by the embedder (usually through
//! `Engine`); it is populated before evaluation and only read afterwards.

pub mod builtins;
pub mod composite;

use crate::evaluator::context::BooleanContext;
use crate::evaluator::Evaluator;
use crate::{SieveError, SieveResult, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An operation callable from expression text
///
/// Implementations receive their arguments bound by name. Positional calls are
/// bound through the canonical argument order before `apply` runs; named calls
/// arrive as written, so implementations must not assume every name is present.
pub trait Operation: Send + Sync {
    fn apply(&self, arguments: &Arguments, context: &CallContext<'_>) -> SieveResult<bool>;
}

/// Adapter that lets a closure act as an `Operation`
pub struct FnOperation<F>(pub F);

impl<F> Operation for FnOperation<F>
where
    F: Fn(&Arguments, &CallContext<'_>) -> SieveResult<bool> + Send + Sync,
{
    fn apply(&self, arguments: &Arguments, context: &CallContext<'_>) -> SieveResult<bool> {
        (self.0)(arguments, context)
    }
}

/// Arguments of one call, keyed by parameter name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: HashMap<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Look up an argument that the operation cannot do without
    pub fn require(&self, name: &str) -> SieveResult<&Value> {
        self.values.get(name).ok_or_else(|| {
            SieveError::type_mismatch(format!("argument '{}' is missing", name))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// What an operation can see of the evaluation that invoked it
pub struct CallContext<'a> {
    booleans: BooleanContext<'a>,
    evaluator: &'a Evaluator<'a>,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(booleans: BooleanContext<'a>, evaluator: &'a Evaluator<'a>) -> Self {
        Self {
            booleans,
            evaluator,
        }
    }

    /// Boolean entries of the calling expression's environment
    pub fn booleans(&self) -> &BooleanContext<'a> {
        &self.booleans
    }

    /// The evaluator running the call, for operations that evaluate expressions themselves
    pub fn evaluator(&self) -> &'a Evaluator<'a> {
        self.evaluator
    }
}

/// A registry entry
#[derive(Clone)]
pub struct RegisteredOperation {
    name: String,
    canonical_args: Vec<String>,
    implementation: Arc<dyn Operation>,
}

impl RegisteredOperation {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter names, in the order positional arguments bind to them
    pub fn canonical_args(&self) -> &[String] {
        &self.canonical_args
    }

    pub fn arity(&self) -> usize {
        self.canonical_args.len()
    }

    pub fn apply(&self, arguments: &Arguments, context: &CallContext<'_>) -> SieveResult<bool> {
        self.implementation.apply(arguments, context)
    }
}

impl fmt::Debug for RegisteredOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredOperation")
            .field("name", &self.name)
            .field("canonical_args", &self.canonical_args)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for RegisteredOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.canonical_args.join(", "))
    }
}

/// Table of operations by name
#[derive(Debug, Clone, Default)]
pub struct Registry {
    operations: HashMap<String, RegisteredOperation>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in operations
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Register an operation, replacing any previous entry with the same name
    pub fn register<I, S, O>(&mut self, name: impl Into<String>, canonical_args: I, operation: O)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        O: Operation + 'static,
    {
        self.register_shared(name, canonical_args, Arc::new(operation));
    }

    /// Register a closure as an operation
    pub fn register_fn<I, S, F>(&mut self, name: impl Into<String>, canonical_args: I, function: F)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Arguments, &CallContext<'_>) -> SieveResult<bool> + Send + Sync + 'static,
    {
        self.register(name, canonical_args, FnOperation(function));
    }

    /// Register an already shared implementation (used for aliases)
    pub fn register_shared<I, S>(
        &mut self,
        name: impl Into<String>,
        canonical_args: I,
        implementation: Arc<dyn Operation>,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let canonical_args = canonical_args.into_iter().map(Into::into).collect();
        self.operations.insert(
            name.clone(),
            RegisteredOperation {
                name,
                canonical_args,
                implementation,
            },
        );
    }

    /// Find an operation by exact name, falling back to its lowercase spelling
    pub fn lookup(&self, name: &str) -> Option<&RegisteredOperation> {
        self.operations
            .get(name)
            .or_else(|| self.operations.get(&name.to_ascii_lowercase()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All entries, sorted by name
    pub fn operations(&self) -> Vec<&RegisteredOperation> {
        let mut operations: Vec<&RegisteredOperation> = self.operations.values().collect();
        operations.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
