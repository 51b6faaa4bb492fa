//! Built-in operations
//!
//! Text predicates (`contains`, `isSubstringOf`, the matching family) answer
//! `false` when an operand is not text. Numeric comparisons coerce both operands.

use super::{Arguments, CallContext, Operation, Registry};
use crate::ast::ComparisonOperator;
use crate::value::coerce_number;
use crate::{SieveError, SieveResult};
use regex::Regex;
use std::sync::Arc;

const BINARY: [&str; 2] = ["left", "right"];

/// Register every built-in operation
pub fn register_all(registry: &mut Registry) {
    registry.register_fn("equals", BINARY, equals);
    registry.register_fn("contains", BINARY, contains);
    registry.register_fn("oneOf", ["value", "set"], one_of);
    registry.register_fn("isSubstringOf", BINARY, is_substring_of);

    let comparisons = [
        ("gt", ComparisonOperator::GreaterThan),
        ("lt", ComparisonOperator::LessThan),
        ("ge", ComparisonOperator::GreaterThanOrEqual),
        ("le", ComparisonOperator::LessThanOrEqual),
        ("eq", ComparisonOperator::Equal),
        ("ne", ComparisonOperator::NotEqual),
    ];
    for (name, operator) in comparisons {
        let implementation: Arc<dyn Operation> = Arc::new(NumericComparison(operator));
        registry.register_shared(name, BINARY, implementation.clone());
        registry.register_shared(operator.symbol(), BINARY, implementation);
    }

    registry.register_fn("not", ["value"], not);
    registry.register_fn("and", BINARY, and);
    registry.register_fn("or", BINARY, or);
    registry.register_fn("ref", ["name"], reference);

    registry.register_fn("equalsIgnoreCase", BINARY, equals_ignore_case);
    registry.register_fn("matches", ["value", "pattern"], matches);
    registry.register_fn("matchesAny", ["value", "patterns"], matches_any);
}

/// Numeric comparison of `left` and `right` after coercion
#[derive(Debug, Clone, Copy)]
pub struct NumericComparison(pub ComparisonOperator);

impl Operation for NumericComparison {
    fn apply(&self, arguments: &Arguments, _context: &CallContext<'_>) -> SieveResult<bool> {
        let left = coerce_number(arguments.get("left"), "left")?;
        let right = coerce_number(arguments.get("right"), "right")?;
        Ok(self.0.compare(left, right))
    }
}

fn equals(arguments: &Arguments, _context: &CallContext<'_>) -> SieveResult<bool> {
    Ok(arguments.require("left")? == arguments.require("right")?)
}

fn contains(arguments: &Arguments, _context: &CallContext<'_>) -> SieveResult<bool> {
    let left = arguments.require("left")?.as_text();
    let right = arguments.require("right")?.as_text();
    Ok(match (left, right) {
        (Some(haystack), Some(needle)) => haystack.contains(needle),
        _ => false,
    })
}

fn is_substring_of(arguments: &Arguments, _context: &CallContext<'_>) -> SieveResult<bool> {
    let left = arguments.require("left")?.as_text();
    let right = arguments.require("right")?.as_text();
    Ok(match (left, right) {
        (Some(needle), Some(haystack)) => haystack.contains(needle),
        _ => false,
    })
}

fn one_of(arguments: &Arguments, _context: &CallContext<'_>) -> SieveResult<bool> {
    let value = arguments.require("value")?;
    let set = arguments.require("set")?;
    let items = set.as_list().ok_or_else(|| {
        SieveError::type_mismatch(format!("oneOf expects a list for 'set', got {}", set.describe()))
    })?;
    Ok(items.contains(value))
}

fn not(arguments: &Arguments, _context: &CallContext<'_>) -> SieveResult<bool> {
    Ok(!arguments.require("value")?.expect_boolean("argument 'value' of not")?)
}

fn and(arguments: &Arguments, _context: &CallContext<'_>) -> SieveResult<bool> {
    let left = arguments.require("left")?.expect_boolean("argument 'left' of and")?;
    let right = arguments.require("right")?.expect_boolean("argument 'right' of and")?;
    Ok(left && right)
}

fn or(arguments: &Arguments, _context: &CallContext<'_>) -> SieveResult<bool> {
    let left = arguments.require("left")?.expect_boolean("argument 'left' of or")?;
    let right = arguments.require("right")?.expect_boolean("argument 'right' of or")?;
    Ok(left || right)
}

/// Look up an earlier boolean result by name
fn reference(arguments: &Arguments, context: &CallContext<'_>) -> SieveResult<bool> {
    let name = arguments.require("name")?;
    let name = name.as_text().ok_or_else(|| {
        SieveError::type_mismatch(format!("ref expects a text name, got {}", name.describe()))
    })?;
    context
        .booleans()
        .get(name)
        .ok_or_else(|| SieveError::UndefinedVariable(name.to_string()))
}

fn equals_ignore_case(arguments: &Arguments, _context: &CallContext<'_>) -> SieveResult<bool> {
    let left = arguments.require("left")?.as_text();
    let right = arguments.require("right")?.as_text();
    Ok(match (left, right) {
        (Some(left), Some(right)) => left.to_lowercase() == right.to_lowercase(),
        _ => false,
    })
}

fn matches(arguments: &Arguments, _context: &CallContext<'_>) -> SieveResult<bool> {
    let value = arguments.require("value")?.as_text();
    let pattern = arguments.require("pattern")?.as_text();
    match (value, pattern) {
        (Some(value), Some(pattern)) => Ok(whole_match(pattern)?.is_match(value)),
        _ => Ok(false),
    }
}

fn matches_any(arguments: &Arguments, _context: &CallContext<'_>) -> SieveResult<bool> {
    let Some(value) = arguments.require("value")?.as_text() else {
        return Ok(false);
    };
    let patterns = arguments.require("patterns")?;
    let patterns = patterns.as_list().ok_or_else(|| {
        SieveError::type_mismatch(format!(
            "matchesAny expects a list for 'patterns', got {}",
            patterns.describe()
        ))
    })?;
    for pattern in patterns.iter().filter_map(|p| p.as_text()) {
        if whole_match(pattern)?.is_match(value) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Compile a pattern that must match the entire value
fn whole_match(pattern: &str) -> SieveResult<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| SieveError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
