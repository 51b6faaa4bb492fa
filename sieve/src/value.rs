//! Runtime values and the numeric coercion rule

use crate::{SieveError, SieveResult};
use serde::Serialize;
use std::fmt;

/// A value flowing through the evaluator
///
/// There is no null: a missing variable is an error, never a false-like value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Provides a descriptive string for error messages
    pub fn describe(&self) -> String {
        match self {
            Value::Text(s) => format!("text value \"{}\"", s),
            Value::Number(n) => format!("number {}", n),
            Value::Boolean(b) => format!("boolean {}", b),
            Value::List(items) => format!("list of {} item(s)", items.len()),
        }
    }

    /// Coerce to a number for the comparison operators.
    ///
    /// Numbers pass through, text must parse strictly (no surrounding whitespace)
    /// to a finite number. Everything else is a type mismatch.
    pub fn to_number(&self) -> SieveResult<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(s) => match s.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(n),
                _ => Err(SieveError::type_mismatch(format!(
                    "cannot convert {} to a number",
                    self.describe()
                ))),
            },
            _ => Err(SieveError::type_mismatch(format!(
                "cannot convert {} to a number",
                self.describe()
            ))),
        }
    }

    /// Require a boolean, naming what it is needed for in the error
    pub fn expect_boolean(&self, context: &str) -> SieveResult<bool> {
        self.as_boolean().ok_or_else(|| {
            SieveError::type_mismatch(format!(
                "{} must be a boolean, got {}",
                context,
                self.describe()
            ))
        })
    }
}

/// Numeric coercion of an optional (possibly missing) argument
pub fn coerce_number(value: Option<&Value>, argument: &str) -> SieveResult<f64> {
    match value {
        Some(value) => value.to_number(),
        None => Err(SieveError::type_mismatch(format!(
            "argument '{}' is missing, expected a number",
            argument
        ))),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "\"{}\"", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
