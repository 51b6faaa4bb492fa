//! Failure reporting for batch evaluation
//!
//! The batch driver never returns errors; every per-expression failure is handed
//! to a `FailureReporter` instead, and the expression is recorded as `false`.

use crate::SieveError;
use std::sync::Mutex;

/// One failed expression in a batch
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationFailure {
    pub name: String,
    pub expression: String,
    pub error: SieveError,
}

/// Receives one notification per failed expression
pub trait FailureReporter: Send + Sync {
    fn report(&self, failure: &EvaluationFailure);
}

/// Emits every failure as a structured `tracing` error event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, failure: &EvaluationFailure) {
        tracing::error!(
            name = %failure.name,
            expression = %failure.expression,
            kind = failure.error.kind(),
            error = %failure.error,
            "expression evaluation failed"
        );
    }
}

/// Keeps failures in memory so callers can inspect them after a batch
#[derive(Debug, Default)]
pub struct CollectingReporter {
    failures: Mutex<Vec<EvaluationFailure>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the failures reported so far
    pub fn failures(&self) -> Vec<EvaluationFailure> {
        match self.failures.lock() {
            Ok(failures) => failures.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.failures().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return the failures reported so far
    pub fn take(&self) -> Vec<EvaluationFailure> {
        match self.failures.lock() {
            Ok(mut failures) => std::mem::take(&mut *failures),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl FailureReporter for CollectingReporter {
    fn report(&self, failure: &EvaluationFailure) {
        match self.failures.lock() {
            Ok(mut failures) => failures.push(failure.clone()),
            Err(poisoned) => poisoned.into_inner().push(failure.clone()),
        }
    }
}
