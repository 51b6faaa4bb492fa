use crate::ast::{Expression, Span};
use crate::error::SieveError;
use crate::registry::Registry;
use crate::resource_limits::ResourceLimits;
use crate::SieveResult;
use pest::error::{InputLocation, LineColLocation};
use pest::Parser;
use pest_derive::Parser;

pub mod expressions;

use expressions::ExpressionBuilder;

#[derive(Parser)]
#[grammar = "src/parser/sieve.pest"]
pub struct SieveParser;

/// Parse expression text into an `Expression`.
///
/// Call names are resolved against `registry` here, so unknown operations, arity
/// mismatches and mixed argument styles are reported before anything is evaluated.
pub fn parse(text: &str, registry: &Registry, limits: &ResourceLimits) -> SieveResult<Expression> {
    if text.len() > limits.max_expression_bytes {
        return Err(SieveError::ResourceLimitExceeded {
            limit_name: "max_expression_bytes".to_string(),
            limit_value: limits.max_expression_bytes,
            actual_value: text.len(),
        });
    }

    // pest recurses once per nesting level; refuse deep input before handing it over
    let depth = nesting_depth(text);
    if depth > limits.max_expression_depth {
        return Err(SieveError::ResourceLimitExceeded {
            limit_name: "max_expression_depth".to_string(),
            limit_value: limits.max_expression_depth,
            actual_value: depth,
        });
    }

    let mut pairs = SieveParser::parse(Rule::expression_text, text).map_err(convert_error)?;
    let root = pairs
        .next()
        .ok_or_else(|| SieveError::parse("empty expression", Span::default()))?;
    let expression = root
        .into_inner()
        .find(|pair| pair.as_rule() == Rule::expression)
        .ok_or_else(|| SieveError::parse("empty expression", Span::default()))?;

    ExpressionBuilder::new(registry, limits.max_expression_depth).build_expression(expression)
}

/// Deepest bracket nesting, counting a run of `!` as nesting too. String
/// contents are skipped.
fn nesting_depth(text: &str) -> usize {
    let mut brackets = 0usize;
    let mut negations = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            in_string = c != '"';
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '[' => brackets += 1,
            ')' | ']' => brackets = brackets.saturating_sub(1),
            '!' if chars.peek() != Some(&'=') => negations += 1,
            c if c.is_whitespace() => continue,
            _ => negations = 0,
        }
        deepest = deepest.max(brackets + negations);
    }
    deepest
}

fn convert_error(error: pest::error::Error<Rule>) -> SieveError {
    let error = error.renamed_rules(|rule| rule_description(rule).to_string());
    let position = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    let (line, col) = match error.line_col {
        LineColLocation::Pos(line_col) => line_col,
        LineColLocation::Span(start, _) => start,
    };
    SieveError::parse(error.variant.message(), Span::at(position, line, col))
}

fn rule_description(rule: &Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::expression_text | Rule::expression | Rule::positional_argument => "expression",
        Rule::or_expression
        | Rule::and_expression
        | Rule::comparison
        | Rule::unary
        | Rule::primary => "operand",
        Rule::or_keyword => "OR",
        Rule::and_keyword => "AND",
        Rule::comparison_operator => "comparison operator",
        Rule::not_operator => "NOT",
        Rule::list_literal => "list",
        Rule::boolean_literal => "boolean",
        Rule::number_literal => "number",
        Rule::string_literal | Rule::string_content => "string",
        Rule::identifier => "identifier",
        Rule::call => "call",
        Rule::named_argument => "named argument",
        _ => "input",
    }
}
