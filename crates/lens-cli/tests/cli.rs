//! Binary-level tests for the `lens` command.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("lens")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("serve-mock"));
}

#[test]
fn unknown_kind_fails_with_usage_error() {
    Command::cargo_bin("lens")
        .unwrap()
        .args(["list", "grpc/routers"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown resource kind: grpc/routers"));
}

#[test]
fn unreachable_api_reports_error() {
    Command::cargo_bin("lens")
        .unwrap()
        .args(["--api", "http://127.0.0.1:1", "--timeout", "2", "get", "entrypoints", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
