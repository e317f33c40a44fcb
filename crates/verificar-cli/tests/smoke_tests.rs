//! Smoke tests for the verificador CLI.
//!
//! These exercise argument handling and scenario listing; nothing here
//! launches a browser.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the verificador binary
fn verificador() -> Command {
    Command::cargo_bin("verificador").expect("verificador binary should exist")
}

// ============================================================================
// Basic CLI tests
// ============================================================================

#[test]
fn test_version_flag() {
    verificador()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.3.1"));
}

#[test]
fn test_help_flag() {
    verificador()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("verification"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_no_args_requires_subcommand() {
    verificador().assert().failure();
}

#[test]
fn test_run_subcommand_help() {
    verificador()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--scenario"))
        .stdout(predicate::str::contains("--spec-dir"))
        .stdout(predicate::str::contains("--headful"));
}

// ============================================================================
// Scenario listing
// ============================================================================

#[test]
fn test_list_shows_builtin_scenarios() {
    verificador()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("character-creator"))
        .stdout(predicate::str::contains("cataclysm-demo"))
        .stdout(predicate::str::contains("biome-canvas"))
        .stdout(predicate::str::contains("delta-load"));
}

#[test]
fn test_list_includes_spec_dir_scenarios() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("smoke.yaml"),
        "name: extra-smoke\ndescription: loads the root page\nsteps:\n  - action: navigate\n    url: http://localhost:5174/\n",
    )
    .unwrap();

    verificador()
        .args(["list", "--spec-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("extra-smoke"))
        .stdout(predicate::str::contains("character-creator"));
}

#[test]
fn test_list_with_bad_spec_dir_fails() {
    verificador()
        .args(["list", "--spec-dir", "/nonexistent/specs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// Run argument handling (no browser launched on these paths)
// ============================================================================

#[test]
fn test_run_unknown_scenario_fails_fast() {
    verificador()
        .args(["run", "--scenario", "definitely-not-a-scenario"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown scenario"));
}

#[test]
fn test_run_with_malformed_spec_file_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.yaml"), "name: [unclosed").unwrap();

    verificador()
        .args(["run", "--spec-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
