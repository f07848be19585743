// crates/infra-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Infra Gate Runtime
// Description: Assertion helpers, text helpers, check runner, suite registry.
// Purpose: Execute declarative checks and aggregate their outcomes.
// Dependencies: crate::core, crate::events, crate::interfaces, regex
// ============================================================================

//! ## Overview
//! Suites declare their checks as [`runner::CheckCase`] tables and hand them
//! to [`runner::run_cases`]. The [`registry::SuiteRegistry`] selects suites
//! and rolls their reports into a run report.

pub mod assert;
pub mod registry;
pub mod runner;
pub mod text;
