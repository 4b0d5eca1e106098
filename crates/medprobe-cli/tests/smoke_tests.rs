//! Smoke tests for the medprobe CLI
//!
//! These run the binary without a browser: help, scenario listing, and the
//! fixture commands against the bundled workbook.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command for the medprobe binary
fn medprobe() -> Command {
    Command::cargo_bin("medprobe").expect("medprobe binary should exist")
}

/// The workbook the hospital scripts read
fn workbook() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("medprobe")
        .join("data")
        .join("Result.xlsx")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    medprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    medprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("fixture"))
        .stdout(predicate::str::contains("tables"));
}

#[test]
fn test_no_args_shows_help() {
    medprobe().assert().failure(); // Requires a subcommand
}

#[test]
fn test_run_subcommand_help() {
    medprobe()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--fail-fast"))
        .stdout(predicate::str::contains("--report"));
}

// ============================================================================
// Scenario Listing
// ============================================================================

#[test]
fn test_run_list_prints_scenarios_in_order() {
    let output = medprobe().args(["run", "--list"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 17);
    assert!(lines[0].starts_with("TS-1 "));
    assert!(lines[16].starts_with("TS-18 "));
}

#[test]
fn test_run_list_with_filter() {
    medprobe()
        .args(["run", "--list", "--filter", "laboratory"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TS-6"))
        .stdout(predicate::str::contains("TS-15"))
        .stdout(predicate::str::contains("TS-1 ").not());
}

// ============================================================================
// Fixture Commands
// ============================================================================

#[test]
fn test_tables_lists_bundled_sheets() {
    medprobe()
        .arg("tables")
        .arg(workbook())
        .assert()
        .success()
        .stdout(predicate::str::contains("Login"))
        .stdout(predicate::str::contains("PatientNames"))
        .stdout(predicate::str::contains("ToolTipText"));
}

#[test]
fn test_fixture_prints_json_records() {
    let output = medprobe()
        .arg("fixture")
        .arg(workbook())
        .args(["PatientNames", "Full Name"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["table"], "PatientNames");
    assert_eq!(json["rows"].as_array().unwrap().len(), 3);
    assert_eq!(json["rows"][0]["Full Name"], "Ram Bahadur Thapa");
}

#[test]
fn test_fixture_first_with_missing_column() {
    let output = medprobe()
        .arg("fixture")
        .arg(workbook())
        .args(["Login", "ValidUserName", "Department", "--first"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ValidUserName"], "admin");
    assert!(json["Department"].is_null());
}

#[test]
fn test_fixture_missing_table_fails() {
    medprobe()
        .arg("fixture")
        .arg(workbook())
        .args(["Pharmacy", "Name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Pharmacy"));
}

#[test]
fn test_tables_missing_file_fails() {
    medprobe()
        .args(["tables", "/nonexistent/Result.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file does not exist"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_applies_file_then_flags() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("suite.yaml");
    fs::write(&path, "base_url: http://from-file.test\nvisible_timeout_ms: 5000\n").unwrap();

    medprobe()
        .arg("config")
        .arg("--config")
        .arg(&path)
        .arg("--no-highlight")
        .env_remove("MEDPROBE_BASE_URL")
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url: http://from-file.test"))
        .stdout(predicate::str::contains("visible_timeout_ms: 5000"))
        .stdout(predicate::str::contains("highlight: false"));
}

#[test]
fn test_config_reads_environment() {
    medprobe()
        .arg("config")
        .env("MEDPROBE_BASE_URL", "https://his.example.org")
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url: https://his.example.org"));
}

#[test]
fn test_config_rejects_bad_url() {
    medprobe()
        .args(["config", "--base-url", "not-a-url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}
