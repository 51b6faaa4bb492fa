use crate::ast::Span;
use thiserror::Error;

/// Error types for compiling and evaluating Sieve expressions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SieveError {
    /// Malformed syntax: unmatched parenthesis, unknown operator token, trailing input
    #[error("Parse error: {message} at {}:{}", .span.line, .span.col)]
    Parse { message: String, span: Span },

    /// Identifier used as a call but not present in the registry
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    /// Positional argument count differs from the canonical argument order
    #[error("Operation '{operation}' expects {expected} positional argument(s), got {actual}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    /// Both positional and named arguments in one call
    #[error("Call to '{0}' mixes positional and named arguments")]
    MixedArgumentStyle(String),

    /// Bare identifier that is neither a literal nor a bound variable
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),

    /// Numeric coercion failure, or an operand of the wrong kind
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Top-level expression produced something other than a boolean
    #[error("Expected a boolean result, got {0}")]
    NonBooleanResult(String),

    /// A configured limit from `ResourceLimits` was exceeded
    #[error("Resource limit exceeded: {limit_name} (limit {limit_value}, actual {actual_value})")]
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: usize,
        actual_value: usize,
    },

    /// The same expression name appeared twice in one batch
    #[error("Duplicate expression name '{0}'")]
    DuplicateExpression(String),

    /// A regular expression given to a matching operation did not compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A composite operation definition was rejected
    #[error("Invalid operation definition '{name}': {message}")]
    InvalidDefinition { name: String, message: String },

    /// Input data (JSON parameters or batch documents) could not be converted
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SieveError {
    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        SieveError::Parse {
            message: message.into(),
            span,
        }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        SieveError::TypeMismatch(message.into())
    }

    pub fn invalid_definition(name: impl Into<String>, message: impl Into<String>) -> Self {
        SieveError::InvalidDefinition {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Short, stable name of the error kind (used in logs and CLI output)
    pub fn kind(&self) -> &'static str {
        match self {
            SieveError::Parse { .. } => "ParseError",
            SieveError::UnknownOperation(_) => "UnknownOperation",
            SieveError::ArityMismatch { .. } => "ArityMismatch",
            SieveError::MixedArgumentStyle(_) => "MixedArgumentStyle",
            SieveError::UndefinedVariable(_) => "UndefinedVariable",
            SieveError::TypeMismatch(_) => "TypeMismatch",
            SieveError::NonBooleanResult(_) => "NonBooleanResult",
            SieveError::ResourceLimitExceeded { .. } => "ResourceLimitExceeded",
            SieveError::DuplicateExpression(_) => "DuplicateExpression",
            SieveError::InvalidPattern { .. } => "InvalidPattern",
            SieveError::InvalidDefinition { .. } => "InvalidDefinition",
            SieveError::InvalidInput(_) => "InvalidInput",
        }
    }

    /// Source location, for errors that have one
    pub fn span(&self) -> Option<&Span> {
        match self {
            SieveError::Parse { span, .. } => Some(span),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SieveError {
    fn from(err: serde_json::Error) -> Self {
        SieveError::InvalidInput(err.to_string())
    }
}
