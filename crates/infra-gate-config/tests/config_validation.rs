//! Config validation tests for infra-gate-config.
// crates/infra-gate-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Section-level validation and the canonical example.
// Purpose: Ensure invalid settings are rejected with precise messages.
// =============================================================================

use infra_gate_config::InfraGateConfig;
use infra_gate_config::config_toml_example;

type TestResult = Result<(), String>;

fn assert_rejected(toml: &str, needle: &str) -> TestResult {
    match InfraGateConfig::from_toml(toml) {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err(format!("expected rejection of:\n{toml}")),
    }
}

#[test]
fn example_parses_to_defaults() -> TestResult {
    let config =
        InfraGateConfig::from_toml(&config_toml_example()).map_err(|err| err.to_string())?;
    if config != InfraGateConfig::default() {
        return Err("example config should spell out the defaults".to_string());
    }
    Ok(())
}

#[test]
fn http_endpoint_requires_opt_in() -> TestResult {
    assert_rejected("[aws]\nendpoint = \"http://localhost:4566\"\n", "without allow_http")?;
    InfraGateConfig::from_toml("[aws]\nendpoint = \"http://localhost:4566\"\nallow_http = true\n")
        .map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn endpoint_requires_scheme() -> TestResult {
    assert_rejected("[aws]\nendpoint = \"localhost:4566\"\n", "must include http:// or https://")
}

#[test]
fn blank_profile_is_rejected() -> TestResult {
    assert_rejected("[aws]\nprofile = \" \"\n", "aws.profile must be non-empty")
}

#[test]
fn fixture_tokens_are_validated() -> TestResult {
    assert_rejected("[fixture]\nproject = \"\"\n", "fixture project")
}

#[test]
fn zero_counts_are_rejected() -> TestResult {
    assert_rejected("[expectations.network]\nsubnet_count = 0\n", "network.subnet_count")
}

#[test]
fn artifact_limit_is_bounded() -> TestResult {
    assert_rejected("[artifacts]\nmax_bytes = 0\n", "artifacts.max_bytes")
}

#[test]
fn empty_allowlist_is_rejected() -> TestResult {
    assert_rejected("[selection]\nallowlist = []\n", "selection.allowlist")
}

#[test]
fn blank_logging_path_is_rejected() -> TestResult {
    assert_rejected("[logging]\npath = \"\"\n", "logging.path must be non-empty")
}

#[test]
fn logging_defaults_to_enabled_stderr() -> TestResult {
    let config = InfraGateConfig::from_toml("").map_err(|err| err.to_string())?;
    if !config.logging.enabled || config.logging.path.is_some() {
        return Err("logging should default to enabled without a path".to_string());
    }
    Ok(())
}

#[test]
fn unknown_selection_ids_are_reported() -> TestResult {
    let config = InfraGateConfig::from_toml("[selection]\ndenylist = [\"cost\", \"lint\"]\n")
        .map_err(|err| err.to_string())?;
    let unknown = config.unknown_selection_ids(&["cost", "network"]);
    if unknown != vec!["lint".to_string()] {
        return Err(format!("unexpected unknown ids: {}", unknown.join(", ")));
    }
    Ok(())
}
