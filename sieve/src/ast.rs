//! Expression tree types
//!
//! This module contains the types produced by the parser and walked by the evaluator:
//! - `Span` for tracking source locations in parse errors
//! - `Expression`, the explicit expression tree
//! - `ComparisonOperator` and `Argument`, the pieces a tree is built from

use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// Span representing a location in expression text
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn from_pest_span(span: pest::Span) -> Self {
        let (line, col) = span.start_pos().line_col();
        Self {
            start: span.start(),
            end: span.end(),
            line,
            col,
        }
    }

    /// Span covering a single position (used for errors reported by pest)
    pub fn at(pos: usize, line: usize, col: usize) -> Self {
        Self {
            start: pos,
            end: pos,
            line,
            col,
        }
    }
}

/// A compiled expression.
///
/// Calls are stored with their arguments already bound to parameter names,
/// so positional and named calls to the same operation compile to the same tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    Literal {
        value: Value,
    },
    Variable {
        name: String,
    },
    List {
        items: Vec<Expression>,
    },
    Call {
        operation: String,
        arguments: Vec<Argument>,
    },
    Not {
        operand: Box<Expression>,
    },
    And {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Or {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `operation` is the registry entry the operator token resolved to, so
    /// `x gt 5` calls `gt` and `x > 5` calls `>`
    Comparison {
        operator: ComparisonOperator,
        operation: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Ternary {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
}

/// A call argument bound to its parameter name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    pub name: String,
    pub value: Expression,
}

/// Comparison operators
///
/// Word aliases (`gt`, `lt`, ...) share an operator with their symbol but
/// dispatch to their own registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Equal,
    NotEqual,
}

impl ComparisonOperator {
    /// Parse an operator token, symbol or word alias (case-insensitive)
    pub fn from_token(token: &str) -> Option<Self> {
        let operator = match token.to_ascii_lowercase().as_str() {
            ">" | "gt" => ComparisonOperator::GreaterThan,
            "<" | "lt" => ComparisonOperator::LessThan,
            ">=" | "ge" => ComparisonOperator::GreaterThanOrEqual,
            "<=" | "le" => ComparisonOperator::LessThanOrEqual,
            "==" | "eq" => ComparisonOperator::Equal,
            "!=" | "ne" => ComparisonOperator::NotEqual,
            _ => return None,
        };
        Some(operator)
    }

    /// The symbol spelling, which is also the symbol's registry name
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        }
    }

    pub fn compare(&self, left: f64, right: f64) -> bool {
        match self {
            ComparisonOperator::GreaterThan => left > right,
            ComparisonOperator::LessThan => left < right,
            ComparisonOperator::GreaterThanOrEqual => left >= right,
            ComparisonOperator::LessThanOrEqual => left <= right,
            ComparisonOperator::Equal => left == right,
            ComparisonOperator::NotEqual => left != right,
        }
    }
}

impl Expression {
    // Binding strength in the grammar, loosest first
    fn precedence(&self) -> u8 {
        match self {
            Expression::Ternary { .. } => 0,
            Expression::Or { .. } => 1,
            Expression::And { .. } => 2,
            Expression::Comparison { .. } => 3,
            Expression::Not { .. } => 4,
            _ => 5,
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal {
            value: value.into(),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable { name: name.into() }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

// An operand position that binds at least `min_precedence`
struct Operand<'a> {
    expression: &'a Expression,
    min_precedence: u8,
}

fn operand(expression: &Expression, min_precedence: u8) -> Operand<'_> {
    Operand {
        expression,
        min_precedence,
    }
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expression.precedence() < self.min_precedence {
            write!(f, "({})", self.expression)
        } else {
            write!(f, "{}", self.expression)
        }
    }
}

// Parentheses appear only where the grammar needs them, so the output
// re-parses to the same tree and is never nested deeper than its source.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal { value } => write!(f, "{}", value),
            Expression::Variable { name } => write!(f, "{}", name),
            Expression::List { items } => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Expression::Call {
                operation,
                arguments,
            } => {
                write!(f, "{}(", operation)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
            Expression::Not { operand: inner } => write!(f, "!{}", operand(inner, 4)),
            // AND/OR chains are left-associative
            Expression::And { left, right } => {
                write!(f, "{} && {}", operand(left, 2), operand(right, 3))
            }
            Expression::Or { left, right } => {
                write!(f, "{} || {}", operand(left, 1), operand(right, 2))
            }
            Expression::Comparison {
                operation,
                left,
                right,
                ..
            } => write!(f, "{} {} {}", operand(left, 4), operation, operand(right, 4)),
            Expression::Ternary {
                condition,
                then_branch,
                else_branch,
            } => write!(
                f,
                "{} ? {} : {}",
                operand(condition, 1),
                operand(then_branch, 1),
                operand(else_branch, 1)
            ),
        }
    }
}
