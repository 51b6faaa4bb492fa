use super::params;
use crate::{CollectingReporter, Engine, ResourceLimits, SieveError, Value};
use std::sync::Arc;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_engine_is_send_and_sync() {
    assert_send_sync::<Engine>();
}

#[test]
fn test_default_engine_has_builtins() {
    let engine = Engine::new();
    assert!(engine.registry().contains("equals"));
    assert_eq!(engine.limits(), &ResourceLimits::default());
}

#[test]
fn test_with_limits_applies_to_compile() {
    let engine = Engine::with_limits(ResourceLimits {
        max_expression_bytes: 4,
        ..ResourceLimits::default()
    });
    assert!(engine.compile("true").is_ok());
    assert!(matches!(
        engine.compile("false").unwrap_err(),
        SieveError::ResourceLimitExceeded { .. }
    ));
}

#[test]
fn test_evaluate_expression_returns_errors() {
    let engine = Engine::new();
    let err = engine
        .evaluate_expression("missing", &params(&[]))
        .unwrap_err();
    assert_eq!(err, SieveError::UndefinedVariable("missing".to_string()));
}

#[test]
fn test_batch_reports_and_continues() {
    let reporter = Arc::new(CollectingReporter::new());
    let engine = Engine::new().with_reporter(reporter.clone());

    let results = engine.evaluate(
        [("bad", "1 +"), ("good", "x > 1")],
        &params(&[("x", Value::from(2))]),
    );

    assert_eq!(results.get("bad"), Some(false));
    assert_eq!(results.get("good"), Some(true));

    let failures = reporter.take();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].name, "bad");
    assert_eq!(failures[0].expression, "1 +");
    assert_eq!(failures[0].error.kind(), "ParseError");
    assert!(reporter.is_empty());
}

#[test]
fn test_load_operations_registers_names() {
    let mut engine = Engine::new();
    let names = engine
        .load_operations(
            r#"{"name": "adult", "args": ["age"], "constants": {"limit": 18},
                "steps": [{"name": "result", "expression": "age >= limit"}]}"#,
        )
        .unwrap();
    assert_eq!(names, vec!["adult".to_string()]);

    let row = params(&[("age", Value::from(20))]);
    assert!(engine.evaluate_expression("adult(age)", &row).unwrap());
    assert!(!engine.evaluate_expression("adult(age=12)", &row).unwrap());
}
