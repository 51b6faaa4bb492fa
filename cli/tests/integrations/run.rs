use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_batch(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("batch.json");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cli_run_simple_batch() {
    let temp_dir = TempDir::new().unwrap();
    let batch = write_batch(
        &temp_dir,
        r#"{
            "params": {"age": 21},
            "expressions": {
                "isAdult": "age >= 18",
                "canVote": "isAdult && age >= 18"
            }
        }"#,
    );

    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("run").arg(&batch).arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""isAdult": true"#))
        .stdout(predicate::str::contains(r#""canVote": true"#));
}

#[test]
fn test_cli_run_with_param_override() {
    let temp_dir = TempDir::new().unwrap();
    let batch = write_batch(
        &temp_dir,
        r#"{"params": {"age": 21}, "expressions": {"isAdult": "age >= 18"}}"#,
    );

    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("run").arg(&batch).arg("age=12").arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""isAdult": false"#));
}

#[test]
fn test_cli_run_table_output() {
    let temp_dir = TempDir::new().unwrap();
    let batch = write_batch(
        &temp_dir,
        r#"{"expressions": {"always": "true", "never": "false"}}"#,
    );

    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("run").arg(&batch);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Expression"))
        .stdout(predicate::str::contains("always"))
        .stdout(predicate::str::contains("never"));
}

#[test]
fn test_cli_run_reports_failures_and_continues() {
    let temp_dir = TempDir::new().unwrap();
    let batch = write_batch(
        &temp_dir,
        r#"{"expressions": {"bad": "1 +", "good": "true"}}"#,
    );

    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("run").arg(&batch).arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""bad": false"#))
        .stdout(predicate::str::contains(r#""good": true"#))
        .stderr(predicate::str::contains("ParseError"));
}

#[test]
fn test_cli_run_strict_fails_on_errors() {
    let temp_dir = TempDir::new().unwrap();
    let batch = write_batch(&temp_dir, r#"{"expressions": {"bad": "ghost"}}"#);

    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("run").arg(&batch).arg("--strict");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("UndefinedVariable"))
        .stderr(predicate::str::contains("1 expression(s) failed"));
}

#[test]
fn test_cli_run_with_operations_file() {
    let temp_dir = TempDir::new().unwrap();
    let operations = temp_dir.path().join("ops.json");
    fs::write(
        &operations,
        r#"[{"name": "teen", "args": ["age"],
             "steps": [{"name": "result", "expression": "age >= 13 && age <= 19"}]}]"#,
    )
    .unwrap();
    let batch = write_batch(
        &temp_dir,
        r#"{"params": {"age": 15}, "expressions": {"isTeen": "teen(age)"}}"#,
    );

    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("run")
        .arg(&batch)
        .arg("--operations")
        .arg(&operations)
        .arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""isTeen": true"#));
}

#[test]
fn test_cli_run_missing_file() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("run").arg(temp_dir.path().join("missing.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn test_cli_run_invalid_document() {
    let temp_dir = TempDir::new().unwrap();
    let batch = write_batch(&temp_dir, r#"{"params": {"x": null}}"#);

    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("run").arg(&batch);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}
