//! Smoke tests for CLI help output and argument wiring.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_subcommands() {
    cargo_bin_cmd!("parley")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Terminal client for a remote chat assistant",
        ))
        .stdout(predicate::str::contains("exec"))
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_sessions_help_shows_commands() {
    cargo_bin_cmd!("parley")
        .args(["sessions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("rename"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_exec_help_shows_options() {
    cargo_bin_cmd!("parley")
        .args(["exec", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--prompt"))
        .stdout(predicate::str::contains("--session"))
        .stdout(predicate::str::contains("--attach"));
}

#[test]
fn test_exec_requires_prompt() {
    cargo_bin_cmd!("parley").arg("exec").assert().failure();
}
