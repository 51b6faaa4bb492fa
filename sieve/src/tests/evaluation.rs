use super::{eval, eval_err};
use crate::{SieveError, Value};

#[test]
fn test_numeric_comparisons() {
    let age = [("age", Value::from(21))];
    assert!(eval("age >= 18", &age).unwrap());
    assert!(eval("age > 20.5", &age).unwrap());
    assert!(!eval("age < 21", &age).unwrap());
    assert!(eval("age le 21", &age).unwrap());
    assert!(eval("age == 21 && age != 22", &age).unwrap());
    assert!(eval("gt(age, 18)", &age).unwrap());
    assert!(eval("ge(left=age, right=21)", &age).unwrap());
}

#[test]
fn test_text_is_coerced_for_comparisons() {
    let score = [("score", Value::from("7.5"))];
    assert!(eval("score > 7", &score).unwrap());
    assert!(eval("score == 7.5", &score).unwrap());
    assert!(eval("\"10\" > \"9\"", &[]).unwrap());
}

#[test]
fn test_failed_coercion_is_type_mismatch() {
    let bad = [("score", Value::from("seven"))];
    assert!(matches!(eval_err("score > 7", &bad), SieveError::TypeMismatch(_)));
    assert!(matches!(eval_err("true > 1", &[]), SieveError::TypeMismatch(_)));
    assert!(matches!(
        eval_err("[1] > 0", &[]),
        SieveError::TypeMismatch(_)
    ));
}

#[test]
fn test_short_circuit() {
    // The right operand would fail with UndefinedVariable if it ran
    assert!(!eval("false && missing", &[]).unwrap());
    assert!(eval("true || missing", &[]).unwrap());
    assert!(eval("true ? true : missing", &[]).unwrap());
    assert!(!eval("false ? missing : false", &[]).unwrap());
}

#[test]
fn test_evaluated_operand_must_exist() {
    assert_eq!(
        eval_err("true && missing", &[]),
        SieveError::UndefinedVariable("missing".to_string())
    );
}

#[test]
fn test_boolean_operands_are_required() {
    let count = [("count", Value::from(3))];
    for text in ["count && true", "true || count", "!count", "count ? true : false"] {
        assert!(
            matches!(eval_err(text, &count), SieveError::TypeMismatch(_)),
            "expected type mismatch for '{}'",
            text
        );
    }
}

#[test]
fn test_top_level_must_be_boolean() {
    let err = eval_err("count", &[("count", Value::from(3))]);
    assert_eq!(err, SieveError::NonBooleanResult("number 3".to_string()));

    let err = eval_err("true ? \"yes\" : \"no\"", &[]);
    assert!(matches!(err, SieveError::NonBooleanResult(_)));
}

#[test]
fn test_ternary_selects_branch() {
    let flags = [("member", Value::from(true)), ("age", Value::from(15))];
    assert!(eval("member ? age > 12 : age > 18", &flags).unwrap());
    assert!(!eval("!member ? age > 12 : age > 18", &flags).unwrap());
}

#[test]
fn test_negation() {
    let flag = [("flag", Value::from(false))];
    assert!(eval("!flag", &flag).unwrap());
    assert!(eval("NOT flag", &flag).unwrap());
    assert!(eval("not(flag)", &flag).unwrap());
    assert!(!eval("!!flag", &flag).unwrap());
}

#[test]
fn test_text_and_list_literals() {
    let row = [("name", Value::from("Daniel")), ("color", Value::from("red"))];
    assert!(eval("contains(name, \"an\")", &row).unwrap());
    assert!(eval("isSubstringOf(\"Dan\", name)", &row).unwrap());
    assert!(eval("oneOf(color, [\"red\", \"green\"])", &row).unwrap());
    assert!(!eval("oneOf(color, [])", &row).unwrap());
    assert!(eval("equals(name, \"Daniel\")", &row).unwrap());
}

#[test]
fn test_boolean_literals_are_case_insensitive() {
    assert!(eval("TRUE", &[]).unwrap());
    assert!(!eval("False", &[]).unwrap());
}

#[test]
fn test_call_arguments_are_evaluated_lazily() {
    // `missing` is only looked up if the false branch is taken
    assert!(eval("true ? true : equals(missing, 1)", &[]).unwrap());
    assert!(matches!(
        eval_err("false ? true : equals(missing, 1)", &[]),
        SieveError::UndefinedVariable(_)
    ));
}
