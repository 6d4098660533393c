//! CLI end-to-end tests that invoke the compiled `confmesh` binary.

use assert_cmd::Command;
use confmesh_test_utils::ConfTree;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

/// `confmesh` pointed at `tree`, with the ambient environment cleared.
fn confmesh(tree: &ConfTree) -> Command {
    let mut cmd = Command::cargo_bin("confmesh").unwrap();
    cmd.env_remove("CONFMESH_SOURCE")
        .env_remove("CONFMESH_ENV")
        .env_remove("CONFMESH_BASE_ENV")
        .env_remove("RUST_LOG")
        .arg("--source")
        .arg(tree.root());
    cmd
}

fn stdout_json(output: std::process::Output) -> Value {
    assert!(output.status.success(), "command failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_help_exits_zero() {
    Command::cargo_bin("confmesh")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("patterns"));
}

#[test]
fn test_show_applies_environment_overlay() {
    let tree = ConfTree::new()
        .with_file("base/catalog.yml", "a: 1\n")
        .with_file("prod/catalog.yml", "a: 2\nb: 3\n");

    let output = confmesh(&tree)
        .args(["--env", "prod", "show", "catalog"])
        .output()
        .unwrap();

    assert_eq!(stdout_json(output), json!({ "a": 2, "b": 3 }));
}

#[test]
fn test_show_env_from_environment_variable() {
    let tree = ConfTree::new()
        .with_file("base/logging.yml", "level: INFO\n")
        .with_file("staging/logging.yml", "level: DEBUG\n");

    let output = confmesh(&tree)
        .env("CONFMESH_ENV", "staging")
        .args(["show", "logging"])
        .output()
        .unwrap();

    assert_eq!(stdout_json(output), json!({ "level": "DEBUG" }));
}

#[test]
fn test_show_with_runtime_param() {
    let tree = ConfTree::new().with_file("base/parameters.yml", "epochs: 5\nlr: 0.01\n");

    let output = confmesh(&tree)
        .args(["show", "parameters", "--param", "parameters.epochs=20"])
        .output()
        .unwrap();

    assert_eq!(stdout_json(output), json!({ "epochs": 20, "lr": 0.01 }));
}

#[test]
fn test_show_yaml_format() {
    let tree = ConfTree::new().with_file("base/logging.json", r#"{"version": 1}"#);

    confmesh(&tree)
        .args(["show", "logging", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("version: 1"));
}

#[test]
fn test_show_root_layout_skips_known_envs() {
    let tree = ConfTree::new()
        .with_file("catalog.yml", "cars:\n  type: csv\n")
        .with_file("local/catalog.yml", "cars:\n  type: memory\n")
        .with_file("prod/catalog.yml", "cars:\n  type: parquet\n");

    let output = confmesh(&tree)
        .args(["--base-env", "", "--known-env", "local", "--known-env", "prod"])
        .args(["show", "catalog"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(output), json!({ "cars": { "type": "csv" } }));

    let output = confmesh(&tree)
        .args(["--base-env", "", "--known-env", "local", "--known-env", "prod"])
        .args(["--env", "local", "show", "catalog"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(output), json!({ "cars": { "type": "memory" } }));
}

#[test]
fn test_show_without_env_ignores_overlays() {
    let tree = ConfTree::new()
        .with_file("base/catalog.yml", "a: 1\n")
        .with_file("prod/catalog.yml", "a: 2\nb: 3\n");

    let output = confmesh(&tree).args(["show", "catalog"]).output().unwrap();

    assert_eq!(stdout_json(output), json!({ "a": 1 }));
}

#[test]
fn test_param_with_colon_stays_a_string() {
    let tree = ConfTree::new().with_file("base/parameters.yml", "note: none\n");

    let output = confmesh(&tree)
        .args(["show", "parameters", "--param", "parameters.note=todo: fix later"])
        .output()
        .unwrap();

    assert_eq!(stdout_json(output), json!({ "note": "todo: fix later" }));
}

#[test]
fn test_show_missing_section_fails() {
    let tree = ConfTree::new().with_file("base/catalog.yml", "a: 1\n");

    confmesh(&tree)
        .args(["show", "credentials"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No configuration found for section 'credentials'"));
}

#[test]
fn test_show_optional_section_is_empty() {
    let tree = ConfTree::new().with_file("base/catalog.yml", "a: 1\n");

    let output = confmesh(&tree)
        .args(["--optional", "credentials", "show", "credentials"])
        .output()
        .unwrap();

    assert_eq!(stdout_json(output), json!({}));
}

#[test]
fn test_show_unknown_section_fails() {
    let tree = ConfTree::new();

    confmesh(&tree)
        .args(["show", "nonexistent_section"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration section: nonexistent_section"));
}

#[test]
fn test_show_bad_configuration_names_file() {
    let tree = ConfTree::new().with_file("base/catalog.yml", "cars: [unterminated\n");

    confmesh(&tree)
        .args(["show", "catalog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bad configuration"))
        .stderr(predicate::str::contains("catalog.yml"));
}

#[test]
fn test_custom_pattern_registers_section() {
    let tree = ConfTree::new().with_file("base/spark.yml", "master: local\n");

    let output = confmesh(&tree)
        .args(["--pattern", "spark=spark*", "show", "spark"])
        .output()
        .unwrap();

    assert_eq!(stdout_json(output), json!({ "master": "local" }));
}

#[test]
fn test_list_json() {
    let tree = ConfTree::new();

    let output = confmesh(&tree)
        .args(["--pattern", "spark=spark*", "list", "--json"])
        .output()
        .unwrap();

    let listed = stdout_json(output);
    assert_eq!(listed["spark"], json!(["spark*"]));
    assert_eq!(
        listed["catalog"],
        json!(["catalog*", "catalog*/**", "**/catalog*"])
    );
    assert_eq!(listed.as_object().unwrap().len(), 5);
}

#[test]
fn test_list_human_output() {
    let tree = ConfTree::new();

    confmesh(&tree)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("credentials"))
        .stdout(predicate::str::contains("4 sections tracked"));
}

#[test]
fn test_patterns_command() {
    let tree = ConfTree::new();

    confmesh(&tree)
        .args(["patterns", "parameters"])
        .assert()
        .success()
        .stdout("parameters*\nparameters*/**\n**/parameters*\n");
}

#[test]
fn test_invalid_param_is_user_error() {
    let tree = ConfTree::new().with_file("base/parameters.yml", "a: 1\n");

    confmesh(&tree)
        .args(["show", "parameters", "--param", "no-equals-sign"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}
