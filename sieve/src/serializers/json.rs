use crate::{SieveError, SieveResult, Value};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// A batch read from JSON: parameters plus expressions in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchDocument {
    pub parameters: HashMap<String, Value>,
    pub expressions: Vec<(String, String)>,
}

/// Convert a JSON value into a runtime value
///
/// `null` and objects have no runtime counterpart and are rejected.
pub fn value_from_json(value: &JsonValue) -> SieveResult<Value> {
    match value {
        JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
        JsonValue::Number(n) => n.as_f64().map(Value::Number).ok_or_else(|| {
            SieveError::InvalidInput(format!("number {} is not representable as f64", n))
        }),
        JsonValue::String(s) => Ok(Value::Text(s.clone())),
        JsonValue::Array(items) => items
            .iter()
            .map(value_from_json)
            .collect::<SieveResult<Vec<_>>>()
            .map(Value::List),
        JsonValue::Null => Err(SieveError::InvalidInput(
            "null is not a supported value".to_string(),
        )),
        JsonValue::Object(_) => Err(SieveError::InvalidInput(
            "objects are not supported as values".to_string(),
        )),
    }
}

/// Read a JSON object of parameters
pub fn parameters_from_json(value: &JsonValue) -> SieveResult<HashMap<String, Value>> {
    let object = value.as_object().ok_or_else(|| {
        SieveError::InvalidInput(format!("parameters must be a JSON object, got {}", value))
    })?;
    object
        .iter()
        .map(|(name, value)| {
            value_from_json(value)
                .map(|value| (name.clone(), value))
                .map_err(|e| match e {
                    SieveError::InvalidInput(message) => {
                        SieveError::InvalidInput(format!("parameter '{}': {}", name, message))
                    }
                    other => other,
                })
        })
        .collect()
}

/// Read a JSON object of named expressions, keeping document order
pub fn expressions_from_json(value: &JsonValue) -> SieveResult<Vec<(String, String)>> {
    let object = value.as_object().ok_or_else(|| {
        SieveError::InvalidInput(format!("expressions must be a JSON object, got {}", value))
    })?;
    object
        .iter()
        .map(|(name, text)| match text {
            JsonValue::String(text) => Ok((name.clone(), text.clone())),
            other => Err(SieveError::InvalidInput(format!(
                "expression '{}' must be a string, got {}",
                name, other
            ))),
        })
        .collect()
}

/// Parse a batch document of the form `{"params": {..}, "expressions": {..}}`
///
/// Both keys are optional; a missing key reads as empty.
pub fn parse_batch(json: &str) -> SieveResult<BatchDocument> {
    let document: JsonValue = serde_json::from_str(json)?;
    let object = document.as_object().ok_or_else(|| {
        SieveError::InvalidInput("batch document must be a JSON object".to_string())
    })?;

    let parameters = match object.get("params") {
        Some(params) => parameters_from_json(params)?,
        None => HashMap::new(),
    };
    let expressions = match object.get("expressions") {
        Some(expressions) => expressions_from_json(expressions)?,
        None => Vec::new(),
    };

    Ok(BatchDocument {
        parameters,
        expressions,
    })
}
