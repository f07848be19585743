// crates/infra-gate-core/src/lib.rs
// ============================================================================
// Module: Infra Gate Core
// Description: Check model, fixtures, reports, and suite orchestration.
// Purpose: Provide the backend-agnostic foundation shared by all check suites.
// Dependencies: regex, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Infra Gate validates one deployed infrastructure project against a fixed
//! set of expectations. This crate owns everything the suites share:
//! - the [`Fixture`] (project, environment, region) and resource naming,
//! - [`Expectations`], the externally supplied constants every suite asserts,
//! - check outcomes and the [`RunReport`] they roll up into,
//! - the [`CheckSuite`] interface and the [`SuiteRegistry`] that runs suites,
//! - structured check events and their sinks.
//!
//! Invariants:
//! - A check stops at its first failed assertion.
//! - Skipped checks never fail a run.
//! - Suites are independent; no state flows between them.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod events;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::expectations::BootstrapExpectations;
pub use crate::core::expectations::Expectations;
pub use crate::core::expectations::ExpectationsError;
pub use crate::core::expectations::MonitoringExpectations;
pub use crate::core::expectations::NetworkExpectations;
pub use crate::core::expectations::PipelineExpectations;
pub use crate::core::expectations::StorageExpectations;
pub use crate::core::expectations::TableExpectations;
pub use crate::core::fixture::Fixture;
pub use crate::core::fixture::FixtureError;
pub use crate::core::identifiers::CheckId;
pub use crate::core::identifiers::SuiteId;
pub use crate::core::outcome::CheckFailure;
pub use crate::core::outcome::CheckOutcome;
pub use crate::core::outcome::CheckResult;
pub use crate::core::outcome::CheckStatus;
pub use crate::core::outcome::RunReport;
pub use crate::core::outcome::RunSummary;
pub use crate::core::outcome::SuiteReport;
pub use crate::events::CheckEvent;
pub use crate::events::CheckEventSink;
pub use crate::events::FileEventSink;
pub use crate::events::NoopEventSink;
pub use crate::events::RunEvent;
pub use crate::events::StderrEventSink;
pub use crate::events::SuiteEvent;
pub use crate::interfaces::CheckDescriptor;
pub use crate::interfaces::CheckSuite;
pub use crate::interfaces::SuiteDescriptor;
pub use crate::interfaces::SuiteKind;
pub use crate::runtime::registry::RegistryError;
pub use crate::runtime::registry::SuiteRegistry;
pub use crate::runtime::registry::SuiteSelection;
pub use crate::runtime::runner::CheckCase;
pub use crate::runtime::runner::CheckFilter;
pub use crate::runtime::runner::SuiteHeader;
