// crates/infra-gate-config/src/lib.rs
// ============================================================================
// Module: Infra Gate Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for infra-gate.toml semantics.
// Dependencies: infra-gate-artifacts, infra-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `infra-gate-config` defines the configuration model for Infra Gate: the
//! fixture under test, artifact locations, AWS connection settings, check
//! expectations, suite selection, and event logging. Validation is strict and
//! fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AwsConfig;
pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::ConfigSource;
pub use config::DEFAULT_CONFIG_NAME;
pub use config::InfraGateConfig;
pub use config::LoggingConfig;
pub use examples::config_toml_example;
