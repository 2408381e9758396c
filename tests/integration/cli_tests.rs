//! End-to-end tests of the command line interface

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/java")
}

fn searchunused() -> Command {
    Command::cargo_bin("searchunused").expect("binary should be built")
}

/// Copy one fixture into a fresh directory
fn create_project(fixture: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(fixture);
    fs::copy(fixtures_path().join(fixture), &path).unwrap();
    (dir, path)
}

fn json_report(path: &Path) -> serde_json::Value {
    let output = searchunused()
        .arg(path)
        .args(["--format", "json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON report")
}

#[test]
fn test_json_report_over_fixtures() {
    let report = json_report(&fixtures_path());
    assert_eq!(report["total"], 13);

    let findings = report["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 13);
    assert!(findings
        .iter()
        .any(|f| f["code"] == "UV005" && f["name"] == "_ignored"));
    assert!(findings
        .iter()
        .any(|f| f["issue"] == "DeadAssignment" && f["name"] == "value"));
    assert!(findings.iter().all(|f| f["name"] != "handle"));
}

#[test]
fn test_json_report_single_file() {
    let report = json_report(&fixtures_path().join("PureLocal.java"));
    assert_eq!(report["total"], 1);

    let finding = &report["findings"][0];
    assert_eq!(finding["code"], "UV001");
    assert_eq!(finding["symbol_kind"], "local_variable");
    assert_eq!(finding["location"]["line"], 5);
    assert_eq!(
        finding["fixes"][0]["description"],
        "Remove unused local variable 'unused'"
    );
}

#[test]
fn test_json_report_to_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.json");
    searchunused()
        .arg(fixtures_path().join("PublicParam.java"))
        .args(["--format", "json", "--quiet", "--output"])
        .arg(&output)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["findings"][0]["name"], "times");
}

#[test]
fn test_terminal_report_mentions_finding() {
    searchunused()
        .arg(fixtures_path().join("Reassigned.java"))
        .args(["--quiet"])
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("value"))
        .stdout(predicate::str::contains("never read"));
}

#[test]
fn test_dry_run_leaves_file_unchanged() {
    let (_dir, path) = create_project("PureLocal.java");
    let before = fs::read_to_string(&path).unwrap();

    searchunused()
        .arg(&path)
        .args(["--dry-run", "--quiet"])
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Would apply"));

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_fix_rewrites_file() {
    let (dir, path) = create_project("PrivateParam.java");

    searchunused()
        .arg(dir.path())
        .args(["--fix", "--quiet"])
        .assert()
        .success();

    let fixed = fs::read_to_string(&path).unwrap();
    assert!(fixed.contains("return add(1, 3) + add(4, 6);"));
    assert!(fixed.contains("private int add(int a, int c)"));

    // A second run finds nothing left to fix
    assert_eq!(json_report(dir.path())["total"], 0);
}

#[test]
fn test_unparsable_file_is_skipped() {
    let (dir, _path) = create_project("PureLocal.java");
    fs::write(dir.path().join("Broken.java"), "class Broken { void f( { }").unwrap();

    assert_eq!(json_report(dir.path())["total"], 1);
}

#[test]
fn test_unused_prefix_flag() {
    let (dir, _path) = create_project("PureLocal.java");
    let output = searchunused()
        .arg(dir.path())
        .args(["--format", "json", "--quiet", "--unused-prefix", "unused"])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total"], 0);
}

#[test]
fn test_config_file_is_loaded() {
    let (dir, _path) = create_project("PublicParam.java");
    fs::write(
        dir.path().join("searchunused.toml"),
        "[analysis]\ncheck_non_private_parameters = false\n",
    )
    .unwrap();

    assert_eq!(json_report(dir.path())["total"], 0);
}

#[test]
fn test_completions() {
    searchunused()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("searchunused"));
}
