//! CLI binary integration tests using assert_cmd + predicates.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("jsonc-heal").expect("binary should exist")
}

fn db_schema() -> String {
    serde_json::json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "default": "app", "description": "application name" },
            "port": { "type": "integer", "default": 1521 },
            "connection": {
                "anyOf": [
                    {
                        "type": "object",
                        "properties": {
                            "kind": { "const": "oracle" },
                            "someOracleParam": { "type": "number", "default": 1 }
                        },
                        "required": ["kind", "someOracleParam"]
                    },
                    {
                        "type": "object",
                        "properties": {
                            "kind": { "const": "mssql" },
                            "someMssqlParam": { "type": "string", "default": "x" }
                        },
                        "required": ["kind", "someMssqlParam"]
                    }
                ]
            }
        },
        "required": ["name", "port", "connection"]
    })
    .to_string()
}

fn setup() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let schema = dir.path().join("schema.json");
    fs::write(&schema, db_schema()).unwrap();
    let schema = schema.to_str().unwrap().to_string();
    (dir, schema)
}

// ── Template ────────────────────────────────────────────────────────────────

#[test]
fn test_template_to_stdout() {
    let (_dir, schema) = setup();

    cmd()
        .args(["template", &schema])
        .assert()
        .success()
        .stdout(predicate::str::contains("// application name"))
        .stdout(predicate::str::contains("\"someOracleParam\": 1"));
}

#[test]
fn test_template_with_hint_to_file() {
    let (dir, schema) = setup();
    let output = dir.path().join("out.jsonc");

    cmd()
        .args(["template", &schema, "--hint", "connection.kind=mssql"])
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success();

    let text = fs::read_to_string(&output).expect("output file should exist");
    assert!(text.contains("\"kind\": \"mssql\""));
    assert!(text.contains("someMssqlParam"));
    assert!(!text.contains("someOracleParam"));
}

#[test]
fn test_malformed_hint_rejected() {
    let (_dir, schema) = setup();

    cmd()
        .args(["template", &schema, "--hint", "no-equals-sign"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PATH=VALUE"));
}

// ── Heal ────────────────────────────────────────────────────────────────────

#[test]
fn test_heal_writes_in_place() {
    let (dir, schema) = setup();
    let config = dir.path().join("config.jsonc");
    fs::write(&config, "{\n    // mine\n    \"port\": 1433\n}\n").unwrap();

    cmd()
        .args(["heal", &schema, config.to_str().unwrap(), "--write"])
        .assert()
        .success();

    let text = fs::read_to_string(&config).unwrap();
    assert!(text.contains("\"port\": 1433"));
    assert!(text.contains("\"name\": \"app\""));
    assert!(text.contains("// mine"));
}

#[test]
fn test_heal_reports_violations_on_stderr() {
    let (dir, schema) = setup();
    let config = dir.path().join("config.jsonc");
    fs::write(&config, r#"{"port": "fifteen twenty one"}"#).unwrap();

    cmd()
        .args(["heal", &schema, config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fifteen twenty one\""))
        .stderr(predicate::str::contains("path=/port"));
}

#[test]
fn test_heal_missing_document_starts_empty() {
    let (dir, schema) = setup();
    let config = dir.path().join("absent.jsonc");

    cmd()
        .args(["heal", &schema, config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"connection\""));
}

// ── Check ───────────────────────────────────────────────────────────────────

#[test]
fn test_check_fails_on_pending_change() {
    let (dir, schema) = setup();
    let config = dir.path().join("config.jsonc");
    fs::write(&config, "{}\n").unwrap();

    cmd()
        .args(["check", &schema, config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not up to date"));

    // `check` never writes.
    assert_eq!(fs::read_to_string(&config).unwrap(), "{}\n");
}

#[test]
fn test_check_passes_on_healed_document() {
    let (dir, schema) = setup();
    let config = dir.path().join("config.jsonc");
    fs::write(&config, "{}\n").unwrap();

    cmd()
        .args(["heal", &schema, config.to_str().unwrap(), "--write"])
        .assert()
        .success();

    cmd()
        .args(["check", &schema, config.to_str().unwrap()])
        .assert()
        .success();
}

// ── Invalid Input ───────────────────────────────────────────────────────────

#[test]
fn test_invalid_schema_path() {
    cmd()
        .args(["template", "/nonexistent/path/schema.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open schema file"));
}

#[test]
fn test_unsupported_schema() {
    let dir = TempDir::new().unwrap();
    let schema = dir.path().join("schema.json");
    fs::write(
        &schema,
        r##"{"type": "object", "properties": {"a": {"$ref": "https://example.com/a.json"}}}"##,
    )
    .unwrap();

    cmd()
        .args(["template", schema.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported schema"));
}

// ── Help Output ─────────────────────────────────────────────────────────────

#[test]
fn test_help_output() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("template"))
        .stdout(predicate::str::contains("heal"))
        .stdout(predicate::str::contains("check"));
}
