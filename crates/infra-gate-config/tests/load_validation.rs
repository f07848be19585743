//! Config load validation tests for infra-gate-config.
// crates/infra-gate-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use infra_gate_config::ConfigError;
use infra_gate_config::ConfigSource;
use infra_gate_config::InfraGateConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<InfraGateConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(InfraGateConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(InfraGateConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_config(&vec![b'#'; 1_048_577])?;
    assert_invalid(InfraGateConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_config(&[0xFF, 0xFE, 0xFF])?;
    assert_invalid(InfraGateConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_missing_explicit_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(InfraGateConfig::load(Some(&path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config(b"[fixture\nproject = ")?;
    assert_invalid(InfraGateConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_sections() -> TestResult {
    let file = write_config(b"[server]\nbind = \"127.0.0.1:8080\"\n")?;
    assert_invalid(InfraGateConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_applies_defaults_for_empty_file() -> TestResult {
    let file = write_config(b"")?;
    let (config, source) =
        InfraGateConfig::load_with_source(Some(file.path())).map_err(|err| err.to_string())?;
    if config != InfraGateConfig::default() {
        return Err("empty config should equal defaults".to_string());
    }
    if source != ConfigSource::File(file.path().to_path_buf()) {
        return Err("explicit path should be reported as the source".to_string());
    }
    Ok(())
}

#[test]
fn load_reads_fixture_overrides() -> TestResult {
    let file = write_config(b"[fixture]\nproject = \"acme\"\nenvironment = \"prod\"\n")?;
    let config = InfraGateConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.fixture.project != "acme" || config.fixture.environment != "prod" {
        return Err("fixture overrides not applied".to_string());
    }
    if config.fixture.region != "us-east-1" {
        return Err("unset fixture fields should keep defaults".to_string());
    }
    Ok(())
}
