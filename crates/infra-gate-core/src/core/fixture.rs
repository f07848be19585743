// crates/infra-gate-core/src/core/fixture.rs
// ============================================================================
// Module: Infra Gate Fixture
// Description: Project, environment, and region constants for a check run.
// Purpose: Derive every resource name the suites look up from three values.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every name the suites query is built by interpolation from the fixture:
//! `{project}-{environment}-{purpose}` for buckets, tables, topics, and
//! dashboards, and `{project}-{environment}` as the alarm name prefix.
//!
//! Invariants:
//! - Fixture tokens are lowercase ASCII alphanumerics and `-`, so derived names
//!   are valid bucket, table, and log group names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default project name.
pub const DEFAULT_PROJECT: &str = "dealfinder";
/// Default environment name.
pub const DEFAULT_ENVIRONMENT: &str = "dev";
/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Maximum length of a single fixture token.
pub const MAX_FIXTURE_TOKEN_LENGTH: usize = 63;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Fixture values scoping one check run.
///
/// # Invariants
/// - Values are not validated on construction; call [`Fixture::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fixture {
    /// Project name (value of the `Project` tag).
    pub project: String,
    /// Environment name (value of the `Environment` tag).
    pub environment: String,
    /// AWS region hosting the deployment.
    pub region: String,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            region: DEFAULT_REGION.to_string(),
        }
    }
}

/// Fixture validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// A fixture field is empty.
    #[error("fixture {field} must not be empty")]
    Empty {
        /// Field name.
        field: &'static str,
    },
    /// A fixture field exceeds the token length limit.
    #[error("fixture {field} exceeds {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
    /// A fixture field contains a character outside `[a-z0-9-]`.
    #[error("fixture {field} must contain only lowercase letters, digits, and '-': {value}")]
    InvalidCharacter {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// A fixture field starts or ends with `-`.
    #[error("fixture {field} must not start or end with '-': {value}")]
    EdgeHyphen {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}

impl Fixture {
    /// Creates a fixture from explicit values.
    #[must_use]
    pub fn new(
        project: impl Into<String>,
        environment: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            environment: environment.into(),
            region: region.into(),
        }
    }

    /// Returns `{project}-{environment}`.
    #[must_use]
    pub fn resource_prefix(&self) -> String {
        format!("{}-{}", self.project, self.environment)
    }

    /// Returns `{project}-{environment}-{purpose}`.
    #[must_use]
    pub fn resource_name(&self, purpose: &str) -> String {
        format!("{}-{}-{}", self.project, self.environment, purpose)
    }

    /// Validates every fixture token.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] for the first invalid field.
    pub fn validate(&self) -> Result<(), FixtureError> {
        validate_token("project", &self.project)?;
        validate_token("environment", &self.environment)?;
        validate_token("region", &self.region)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a single fixture token.
fn validate_token(field: &'static str, value: &str) -> Result<(), FixtureError> {
    if value.is_empty() {
        return Err(FixtureError::Empty {
            field,
        });
    }
    if value.len() > MAX_FIXTURE_TOKEN_LENGTH {
        return Err(FixtureError::TooLong {
            field,
            max: MAX_FIXTURE_TOKEN_LENGTH,
        });
    }
    if !value.bytes().all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-')
    {
        return Err(FixtureError::InvalidCharacter {
            field,
            value: value.to_string(),
        });
    }
    if value.starts_with('-') || value.ends_with('-') {
        return Err(FixtureError::EdgeHyphen {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
