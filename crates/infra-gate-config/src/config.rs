// crates/infra-gate-config/src/config.rs
// ============================================================================
// Module: Infra Gate Configuration
// Description: Configuration loading and validation for Infra Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: infra-gate-artifacts, infra-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and falls back to the values of the deployment
//! under test, so an empty file is a valid configuration.
//!
//! Resolution order: an explicit path, then `INFRA_GATE_CONFIG`, then
//! `./infra-gate.toml`. Only the default file may be absent; a missing file
//! named explicitly or through the environment fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use infra_gate_artifacts::ArtifactLayout;
use infra_gate_core::Expectations;
use infra_gate_core::Fixture;
use infra_gate_core::SuiteSelection;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "infra-gate.toml";
/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "INFRA_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of a full path.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a suite id in the selection policy.
pub(crate) const MAX_SUITE_ID_LENGTH: usize = 64;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from the given file.
    File(PathBuf),
    /// No file was named and the default file is absent.
    Defaults,
}

/// Top-level Infra Gate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InfraGateConfig {
    /// Project, environment, and region under test.
    #[serde(default)]
    pub fixture: Fixture,
    /// Locations of the repository artifacts.
    #[serde(default)]
    pub artifacts: ArtifactLayout,
    /// AWS connection settings for live suites.
    #[serde(default)]
    pub aws: AwsConfig,
    /// Constants the checks assert.
    #[serde(default)]
    pub expectations: Expectations,
    /// Suite allow/deny policy.
    #[serde(default)]
    pub selection: SuiteSelection,
    /// Structured check event logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl InfraGateConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_source(path).map(|(config, _)| config)
    }

    /// Loads configuration and reports where it came from.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_with_source(path: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let (resolved, required) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !required && !resolved.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok((config, ConfigSource::Defaults));
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::from_toml(content)?;
        Ok((config, ConfigSource::File(resolved)))
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fixture.validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        self.artifacts.validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        self.expectations.validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        validate_path_string("artifacts.root", &self.artifacts.root.to_string_lossy())?;
        self.aws.validate()?;
        validate_selection(&self.selection)?;
        self.logging.validate()
    }

    /// Returns suite ids named by the selection policy that are not in `known`.
    #[must_use]
    pub fn unknown_selection_ids(&self, known: &[&str]) -> Vec<String> {
        self.selection
            .allowlist
            .iter()
            .flatten()
            .chain(self.selection.denylist.iter())
            .filter(|id| !known.contains(&id.as_str()))
            .cloned()
            .collect()
    }
}

/// AWS connection settings.
///
/// # Invariants
/// - Region always comes from the fixture.
/// - Plain `http://` endpoints require `allow_http`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwsConfig {
    /// Optional endpoint override (LocalStack or another AWS-compatible API).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Allow non-TLS endpoints (explicit opt-in).
    #[serde(default)]
    pub allow_http: bool,
    /// Optional named profile from the shared AWS config files.
    #[serde(default)]
    pub profile: Option<String>,
}

impl AwsConfig {
    /// Validates AWS connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for malformed endpoints or profiles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(endpoint) = &self.endpoint {
            let trimmed = endpoint.trim();
            if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
                return Err(ConfigError::Invalid(
                    "aws.endpoint must include http:// or https://".to_string(),
                ));
            }
            if trimmed.starts_with("http://") && !self.allow_http {
                return Err(ConfigError::Invalid(
                    "aws.endpoint uses http:// without allow_http".to_string(),
                ));
            }
        }
        if let Some(profile) = &self.profile
            && profile.trim().is_empty()
        {
            return Err(ConfigError::Invalid("aws.profile must be non-empty".to_string()));
        }
        Ok(())
    }
}

/// Structured check event logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Emit one JSON line per check, suite, and run.
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,
    /// Optional event log path (JSON lines, appended); stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            path: None,
        }
    }
}

impl LoggingConfig {
    /// Validates logging configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("logging.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path and whether the file must exist.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates suite ids named by the selection policy.
fn validate_selection(selection: &SuiteSelection) -> Result<(), ConfigError> {
    if let Some(allowlist) = &selection.allowlist
        && allowlist.is_empty()
    {
        return Err(ConfigError::Invalid(
            "selection.allowlist must name at least one suite".to_string(),
        ));
    }
    let ids = selection.allowlist.iter().flatten().chain(selection.denylist.iter());
    for id in ids {
        let valid = !id.is_empty()
            && id.len() <= MAX_SUITE_ID_LENGTH
            && id.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_');
        if !valid {
            return Err(ConfigError::Invalid(format!("selection suite id `{id}` is invalid")));
        }
    }
    Ok(())
}

/// Default event logging enabled.
pub(crate) const fn default_logging_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================
