//! CLI binary integration tests using assert_cmd + predicates.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("jsonschema-dnf").expect("binary should exist")
}

fn simple_schema() -> String {
    serde_json::json!({
        "allOf": [
            {"anyOf": [{"type": "string"}, {"type": "integer"}]},
            {"minLength": 1},
        ]
    })
    .to_string()
}

#[test]
fn test_normalize_to_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("schema.json");
    let output = dir.path().join("out.json");
    fs::write(&input, simple_schema()).unwrap();

    cmd()
        .args(["normalize", input.to_str().unwrap()])
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success();

    let content = fs::read_to_string(&output).expect("output file should exist");
    let value: serde_json::Value = serde_json::from_str(&content).expect("output should be valid JSON");
    assert!(value["anyOf"].is_array());
}

#[test]
fn test_normalize_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("schema.json");
    fs::write(&input, simple_schema()).unwrap();

    cmd()
        .args(["normalize", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"anyOf\""));
}

#[test]
fn test_normalize_reads_stdin_when_no_input_given() {
    cmd()
        .arg("normalize")
        .write_stdin(simple_schema())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"anyOf\""));
}

#[test]
fn test_normalize_compact_format_has_no_indentation() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("schema.json");
    fs::write(&input, simple_schema()).unwrap();

    cmd()
        .args(["normalize", input.to_str().unwrap(), "--format", "compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  ").not());
}

#[test]
fn test_normalize_with_check_flag_succeeds_on_well_formed_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("schema.json");
    fs::write(&input, simple_schema()).unwrap();

    cmd()
        .args(["normalize", input.to_str().unwrap(), "--check"])
        .assert()
        .success();
}

#[test]
fn test_check_accepts_well_formed_schema() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("schema.json");
    fs::write(&input, serde_json::json!({"anyOf": [{"type": "string"}]}).to_string()).unwrap();

    cmd()
        .args(["check", input.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("ok"));
}

#[test]
fn test_check_rejects_malformed_schema() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("schema.json");
    fs::write(&input, serde_json::json!({"allOf": [{"type": "string"}]}).to_string()).unwrap();

    cmd().args(["check", input.to_str().unwrap()]).assert().failure();
}

#[test]
fn test_invalid_input_path() {
    cmd()
        .args(["normalize", "/nonexistent/path/schema.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open input file"));
}

#[test]
fn test_malformed_json_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("malformed.json");
    fs::write(&input, "this is not valid JSON at all {{{").unwrap();

    cmd()
        .args(["normalize", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn test_help_output_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("normalize"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_normalize_help_lists_flags() {
    cmd()
        .args(["normalize", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-depth"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--check"));
}

#[test]
fn test_recursive_schema_normalizes_and_checks() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("schema.json");
    let schema = serde_json::json!({
        "$defs": {"Node": {"type": "object", "properties": {"next": {"$ref": "#/$defs/Node"}}}},
        "$ref": "#/$defs/Node",
    });
    fs::write(&input, schema.to_string()).unwrap();

    cmd()
        .args(["normalize", input.to_str().unwrap(), "--check"])
        .assert()
        .success();
}
