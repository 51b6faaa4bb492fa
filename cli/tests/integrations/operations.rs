use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cli_operations_lists_builtins() {
    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("operations");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("oneOf"))
        .stdout(predicate::str::contains("value, set"))
        .stdout(predicate::str::contains("isSubstringOf"));
}

#[test]
fn test_cli_operations_includes_loaded_composites() {
    let temp_dir = TempDir::new().unwrap();
    let operations = temp_dir.path().join("ops.json");
    fs::write(
        &operations,
        r#"{"name": "between", "args": ["value", "low", "high"],
            "steps": [{"name": "r", "expression": "value >= low && value <= high"}]}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("operations").arg("-o").arg(&operations);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("between"))
        .stdout(predicate::str::contains("value, low, high"));
}

#[test]
fn test_cli_operations_rejects_bad_definitions() {
    let temp_dir = TempDir::new().unwrap();
    let operations = temp_dir.path().join("ops.json");
    fs::write(
        &operations,
        r#"{"name": "bad", "args": [], "steps": [{"name": "r", "expression": "1 +"}]}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("operations").arg("-o").arg(&operations);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot load operations"));
}
