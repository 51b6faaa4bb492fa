use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_check_prints_canonical_form() {
    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("check").arg("a AND b or not c");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("a && b || !c"));
}

#[test]
fn test_cli_check_binds_positional_arguments() {
    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("check").arg(r#"equals(x, "y")"#);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"equals(left=x, right="y")"#));
}

#[test]
fn test_cli_check_parse_error() {
    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("check").arg("(a && b");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn test_cli_check_unknown_operation() {
    let mut cmd = Command::cargo_bin("sieve").unwrap();
    cmd.arg("check").arg("nope(1)");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown operation 'nope'"));
}
