use crate::ast::{Argument, ComparisonOperator, Expression, Span};
use crate::error::SieveError;
use crate::parser::Rule;
use crate::registry::Registry;
use crate::value::Value;
use crate::SieveResult;
use pest::iterators::{Pair, Pairs};
use std::collections::HashSet;

/// Turns pest pairs into an `Expression`, resolving calls against the registry
pub(crate) struct ExpressionBuilder<'r> {
    registry: &'r Registry,
    max_depth: usize,
    depth: usize,
}

// Pull the next pair out of a rule we know the shape of
fn next_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    span: &Span,
    what: &str,
) -> SieveResult<Pair<'i, Rule>> {
    pairs
        .next()
        .ok_or_else(|| SieveError::parse(format!("expected {}", what), span.clone()))
}

impl<'r> ExpressionBuilder<'r> {
    pub(crate) fn new(registry: &'r Registry, max_depth: usize) -> Self {
        Self {
            registry,
            max_depth,
            depth: 0,
        }
    }

    fn push_depth(&mut self) -> SieveResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(SieveError::ResourceLimitExceeded {
                limit_name: "max_expression_depth".to_string(),
                limit_value: self.max_depth,
                actual_value: self.depth,
            });
        }
        Ok(())
    }

    fn pop_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Build an `expression` pair (the ternary level)
    pub(crate) fn build_expression(&mut self, pair: Pair<Rule>) -> SieveResult<Expression> {
        self.push_depth()?;
        let result = self.build_ternary(pair);
        self.pop_depth();
        result
    }

    fn build_ternary(&mut self, pair: Pair<Rule>) -> SieveResult<Expression> {
        let span = Span::from_pest_span(pair.as_span());
        let mut inner = pair.into_inner();
        let condition = self.build_or(next_pair(&mut inner, &span, "an expression")?)?;

        match inner.next() {
            None => Ok(condition),
            Some(then_pair) => {
                let then_branch = self.build_or(then_pair)?;
                let else_branch = self.build_or(next_pair(&mut inner, &span, "':' branch")?)?;
                Ok(Expression::Ternary {
                    condition: Box::new(condition),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                })
            }
        }
    }

    fn build_or(&mut self, pair: Pair<Rule>) -> SieveResult<Expression> {
        let span = Span::from_pest_span(pair.as_span());
        // Keyword spellings of the operator show up as their own pairs
        let mut operands = pair
            .into_inner()
            .filter(|p| p.as_rule() == Rule::and_expression);

        let first = operands
            .next()
            .ok_or_else(|| SieveError::parse("expected an operand", span))?;
        let mut result = self.build_and(first)?;
        for operand in operands {
            let right = self.build_and(operand)?;
            result = Expression::Or {
                left: Box::new(result),
                right: Box::new(right),
            };
        }
        Ok(result)
    }

    fn build_and(&mut self, pair: Pair<Rule>) -> SieveResult<Expression> {
        let span = Span::from_pest_span(pair.as_span());
        let mut operands = pair
            .into_inner()
            .filter(|p| p.as_rule() == Rule::comparison);

        let first = operands
            .next()
            .ok_or_else(|| SieveError::parse("expected an operand", span))?;
        let mut result = self.build_comparison(first)?;
        for operand in operands {
            let right = self.build_comparison(operand)?;
            result = Expression::And {
                left: Box::new(result),
                right: Box::new(right),
            };
        }
        Ok(result)
    }

    fn build_comparison(&mut self, pair: Pair<Rule>) -> SieveResult<Expression> {
        let span = Span::from_pest_span(pair.as_span());
        let mut inner = pair.into_inner();
        let left = self.build_unary(next_pair(&mut inner, &span, "an operand")?)?;

        let Some(operator_pair) = inner.next() else {
            return Ok(left);
        };
        let operator_span = Span::from_pest_span(operator_pair.as_span());
        let operator = ComparisonOperator::from_token(operator_pair.as_str()).ok_or_else(|| {
            SieveError::parse(
                format!("unknown comparison operator '{}'", operator_pair.as_str()),
                operator_span,
            )
        })?;
        let operation = self.resolve_comparison(operator_pair.as_str())?;
        let right = self.build_unary(next_pair(&mut inner, &span, "a right operand")?)?;

        Ok(Expression::Comparison {
            operator,
            operation,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    // Each spelling of an operator dispatches to the operation registered under it
    fn resolve_comparison(&self, token: &str) -> SieveResult<String> {
        let operation = self
            .registry
            .lookup(token)
            .ok_or_else(|| SieveError::UnknownOperation(token.to_string()))?;
        if operation.arity() < 2 {
            return Err(SieveError::ArityMismatch {
                operation: operation.name().to_string(),
                expected: operation.arity(),
                actual: 2,
            });
        }
        Ok(operation.name().to_string())
    }

    fn build_unary(&mut self, pair: Pair<Rule>) -> SieveResult<Expression> {
        let span = Span::from_pest_span(pair.as_span());
        let mut inner = pair.into_inner();
        let first = next_pair(&mut inner, &span, "an operand")?;

        match first.as_rule() {
            Rule::not_operator => {
                self.push_depth()?;
                let operand = next_pair(&mut inner, &span, "an operand after NOT")
                    .and_then(|operand| self.build_unary(operand));
                self.pop_depth();
                Ok(Expression::Not {
                    operand: Box::new(operand?),
                })
            }
            _ => self.build_primary(first),
        }
    }

    fn build_primary(&mut self, pair: Pair<Rule>) -> SieveResult<Expression> {
        let span = Span::from_pest_span(pair.as_span());
        let inner = next_pair(&mut pair.into_inner(), &span, "an operand")?;

        match inner.as_rule() {
            Rule::expression => self.build_expression(inner),
            Rule::list_literal => {
                let items = inner
                    .into_inner()
                    .map(|item| self.build_expression(item))
                    .collect::<SieveResult<Vec<_>>>()?;
                Ok(Expression::List { items })
            }
            Rule::string_literal => {
                let content = inner
                    .into_inner()
                    .next()
                    .map(|content| content.as_str())
                    .unwrap_or_default();
                Ok(Expression::literal(content))
            }
            Rule::number_literal => parse_number(&inner).map(Expression::literal),
            Rule::boolean_literal => Ok(Expression::literal(
                inner.as_str().eq_ignore_ascii_case("true"),
            )),
            Rule::call => self.build_call(inner),
            Rule::identifier => Ok(Expression::variable(inner.as_str())),
            other => Err(SieveError::parse(
                format!("unexpected {:?}", other),
                Span::from_pest_span(inner.as_span()),
            )),
        }
    }

    fn build_call(&mut self, pair: Pair<Rule>) -> SieveResult<Expression> {
        let span = Span::from_pest_span(pair.as_span());
        let mut inner = pair.into_inner();
        let name = next_pair(&mut inner, &span, "an operation name")?.as_str();

        let mut positional = Vec::new();
        let mut named = Vec::new();
        for argument in inner {
            match argument.as_rule() {
                Rule::named_argument => named.push(argument),
                _ => positional.push(argument),
            }
        }

        if !positional.is_empty() && !named.is_empty() {
            return Err(SieveError::MixedArgumentStyle(name.to_string()));
        }

        let registry = self.registry;
        let operation = registry
            .lookup(name)
            .ok_or_else(|| SieveError::UnknownOperation(name.to_string()))?;
        let operation_name = operation.name().to_string();

        let arguments = if named.is_empty() {
            let canonical = operation.canonical_args().to_vec();
            if positional.len() != canonical.len() {
                return Err(SieveError::ArityMismatch {
                    operation: operation_name,
                    expected: canonical.len(),
                    actual: positional.len(),
                });
            }
            let mut arguments = Vec::with_capacity(canonical.len());
            for (parameter, argument) in canonical.into_iter().zip(positional) {
                let argument_span = Span::from_pest_span(argument.as_span());
                let value = next_pair(&mut argument.into_inner(), &argument_span, "an argument")?;
                arguments.push(Argument {
                    name: parameter,
                    value: self.build_expression(value)?,
                });
            }
            arguments
        } else {
            let mut seen = HashSet::new();
            let mut arguments = Vec::with_capacity(named.len());
            for argument in named {
                let argument_span = Span::from_pest_span(argument.as_span());
                let mut parts = argument.into_inner();
                let key = next_pair(&mut parts, &argument_span, "an argument name")?.as_str();
                if !seen.insert(key) {
                    return Err(SieveError::parse(
                        format!("argument '{}' given twice in call to '{}'", key, name),
                        argument_span,
                    ));
                }
                let value = next_pair(&mut parts, &argument_span, "an argument value")?;
                arguments.push(Argument {
                    name: key.to_string(),
                    value: self.build_expression(value)?,
                });
            }
            arguments
        };

        Ok(Expression::Call {
            operation: operation_name,
            arguments,
        })
    }
}

fn parse_number(pair: &Pair<Rule>) -> SieveResult<Value> {
    match pair.as_str().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Value::Number(n)),
        _ => Err(SieveError::parse(
            format!("number '{}' is out of range", pair.as_str()),
            Span::from_pest_span(pair.as_span()),
        )),
    }
}
