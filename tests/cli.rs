use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn calcline_eval_prints_result() {
    let mut cmd = Command::cargo_bin("calcline").expect("binary exists");
    cmd.arg("eval").arg("123 + 456");
    cmd.assert().success().stdout("579\n");
}

#[test]
fn calcline_eval_division_prints_float() {
    let mut cmd = Command::cargo_bin("calcline").expect("binary exists");
    cmd.arg("eval").arg("7 / 2");
    cmd.assert().success().stdout("3.5\n");
}

#[test]
fn calcline_eval_reports_bad_character() {
    let mut cmd = Command::cargo_bin("calcline").expect("binary exists");
    cmd.arg("eval").arg("5 % 2");
    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unrecognized character `%`"));
}

#[test]
fn calcline_run_continues_after_errors() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("session.calc");
    fs::write(&script, "1 + 1\n\n5 / 0\n6 * 7\n").expect("write script");

    let mut cmd = Command::cargo_bin("calcline").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert()
        .failure()
        .stdout("2\n42\n")
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn calcline_run_missing_file_fails() {
    let dir = tempdir().expect("create temp dir");
    let mut cmd = Command::cargo_bin("calcline").expect("binary exists");
    cmd.arg("run").arg(dir.path().join("absent.calc"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("NotFound"));
}

#[test]
fn calcline_tokens_lists_stream() {
    let mut cmd = Command::cargo_bin("calcline").expect("binary exists");
    cmd.arg("tokens").arg("3 + 5");
    cmd.assert().success().stdout(
        "Token(INTEGER, 3)\nToken(PLUS, '+')\nToken(INTEGER, 5)\nToken(EOF, None)\n",
    );
}
