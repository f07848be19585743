// crates/infra-gate-cli/tests/cli.rs
// ============================================================================
// Module: CLI Binary Tests
// Description: Runs the infra-gate binary against checkout fixtures.
// Purpose: Ensure exit codes and output formats match the run outcome.
// Dependencies: infra-gate binary, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Spawns the built `infra-gate` binary in an empty working directory so the
//! default configuration applies, then inspects stdout and the exit status.
//! Every run is `--offline`, so no AWS call is attempted.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Path of the conforming checkout shared with the artifact suite tests.
fn conforming_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../infra-gate-artifacts/tests/fixtures/conforming")
}

/// Runs the binary with `args` from `cwd` with config and language env cleared.
fn run_cli(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_infra-gate"))
        .args(args)
        .current_dir(cwd)
        .env_remove("INFRA_GATE_CONFIG")
        .env_remove("INFRA_GATE_LANG")
        .output()
        .unwrap()
}

/// Returns stdout as UTF-8 text.
fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

// ============================================================================
// SECTION: Check
// ============================================================================

/// Confirms a conforming checkout passes offline with a JSON report.
#[test]
fn offline_check_of_conforming_checkout_succeeds() {
    let cwd = TempDir::new().unwrap();
    let root = conforming_root();
    let output = run_cli(
        cwd.path(),
        &["check", "--offline", "--root", root.to_str().unwrap(), "--format", "json"],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["summary"]["failed"], 0);
    assert_eq!(report["suites"].as_array().unwrap().len(), 5);
}

/// Confirms missing artifacts fail the run with a non-zero exit code.
#[test]
fn offline_check_of_empty_checkout_fails() {
    let cwd = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let output = run_cli(
        cwd.path(),
        &["check", "--offline", "--root", root.path().to_str().unwrap(), "--suite", "readme"],
    );

    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("FAIL readme_exists"));
    assert!(text.contains("Project README [readme]"));
    assert!(!text.contains("[bootstrap]"));
}

/// Confirms a missing root is refused before any suite runs.
#[test]
fn missing_root_is_refused() {
    let cwd = TempDir::new().unwrap();
    let missing = cwd.path().join("absent");
    let output = run_cli(cwd.path(), &["check", "--offline", "--root", missing.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not a directory"));
}

/// Confirms unknown suite requests are refused.
#[test]
fn unknown_suite_request_is_refused() {
    let cwd = TempDir::new().unwrap();
    let root = conforming_root();
    let output = run_cli(
        cwd.path(),
        &["check", "--offline", "--root", root.to_str().unwrap(), "--suite", "lint"],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Check run refused"));
}

// ============================================================================
// SECTION: Catalog and Config
// ============================================================================

/// Confirms the catalog lists artifact suites before live suites.
#[test]
fn suites_list_json_lists_every_suite() {
    let cwd = TempDir::new().unwrap();
    let output = run_cli(cwd.path(), &["suites", "list", "--format", "json"]);

    assert!(output.status.success());
    let catalog: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let ids: Vec<&str> = catalog
        .as_array()
        .unwrap()
        .iter()
        .map(|suite| suite["suite_id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "bootstrap",
            "terraform_monitoring",
            "ci_pipeline",
            "cd_pipeline",
            "readme",
            "network",
            "storage",
            "tables",
            "monitoring",
            "cost",
        ]
    );
}

/// Confirms the printed example validates.
#[test]
fn config_example_validates() {
    let cwd = TempDir::new().unwrap();
    let example = run_cli(cwd.path(), &["config", "example"]);
    assert!(example.status.success());
    let path = cwd.path().join("infra-gate.toml");
    std::fs::write(&path, &example.stdout).unwrap();

    let output = run_cli(cwd.path(), &["config", "validate", "--config", path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output), "Config valid.\n");
}

/// Confirms the Catalan locale prints the disclaimer and localized output.
#[test]
fn catalan_locale_localizes_validation() {
    let cwd = TempDir::new().unwrap();
    let output = run_cli(cwd.path(), &["--lang", "ca", "config", "validate"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Configuració vàlida.\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("traduïda automàticament"));
}
