mod common;

use assert_cmd::Command;
use common::{Sandbox, json_value};
use predicates::prelude::*;
use serde_json::json;
use std::fs;

#[test]
fn no_command_prints_help_and_fails() {
    Command::cargo_bin("sealnote")
        .expect("binary exists")
        .env("NO_COLOR", "1")
        .assert()
        .code(64)
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn help_and_version_succeed() {
    Command::cargo_bin("sealnote")
        .expect("binary exists")
        .arg("--help")
        .assert()
        .success();

    Command::cargo_bin("sealnote")
        .expect("binary exists")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    Command::cargo_bin("sealnote")
        .expect("binary exists")
        .arg("frobnicate")
        .assert()
        .code(64);
}

#[test]
fn config_defaults_without_file() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .cmd()
        .args(["config", "show", "--json"])
        .output()
        .expect("config show output");

    assert!(output.status.success());
    let json = json_value(&output.stdout);
    assert_eq!(
        json["meta"]["settings"],
        json!({
            "origin": "https://sealnote.app/",
            "default_expiry_hours": 24,
            "max_password_attempts": 3,
        })
    );
}

#[test]
fn config_path_honours_env() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "path", "--quiet"])
        .assert()
        .success()
        .stdout(format!("{}\n", sandbox.config_path().display()));
}

#[test]
fn config_set_persists() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args([
            "config",
            "set",
            "--origin",
            "https://notes.example.com/",
            "--default-expiry-hours",
            "0",
        ])
        .assert()
        .success();

    let written = fs::read_to_string(sandbox.config_path()).expect("config written");
    assert!(written.contains("https://notes.example.com/"));

    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_expiry_hours = 0"));
}

#[test]
fn config_set_rejects_bad_values() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "set", "--max-password-attempts", "0"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("at least 1"));

    sandbox
        .cmd()
        .args(["config", "set", "--origin", "sealnote.app"])
        .assert()
        .code(64);

    assert!(!sandbox.config_path().exists());
}

#[test]
fn unparsable_config_fails_commands() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.config_path(), "origin = [").expect("write config");

    sandbox
        .cmd()
        .args(["seal", "--content", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: failed to parse config"));
}

#[test]
fn corrupt_link_store_is_reported() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.data_dir()).expect("data dir");
    fs::write(sandbox.data_dir().join("links.json"), "{not json").expect("write links");

    sandbox
        .cmd()
        .args(["links", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: stored data is corrupt"));
}

#[test]
fn json_log_format_keeps_stdout_clean() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .cmd()
        .env("SEALNOTE_LOG", "debug")
        .env("SEALNOTE_LOG_FORMAT", "json")
        .args(["links", "list", "--json"])
        .output()
        .expect("links output");

    assert!(output.status.success());
    let json = json_value(&output.stdout);
    assert_eq!(json["meta"]["count"], json!(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.lines().all(|line| line.starts_with('{')));
}
