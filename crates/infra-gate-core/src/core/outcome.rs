// crates/infra-gate-core/src/core/outcome.rs
// ============================================================================
// Module: Infra Gate Outcomes
// Description: Check verdicts, per-suite reports, and run summaries.
// Purpose: Give every suite one serializable result shape.
// Dependencies: crate::core::{fixture, identifiers}, serde, thiserror
// ============================================================================

//! ## Overview
//! A check returns [`CheckResult`]: `Ok(())` when every assertion held, or a
//! [`CheckFailure`] carrying the message of the first assertion that did not.
//! Outcomes are collected into [`SuiteReport`]s and then a [`RunReport`].
//!
//! Invariants:
//! - A run succeeds iff no outcome has [`CheckStatus::Failed`].
//! - Report ordering follows suite registration and check declaration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::fixture::Fixture;
use crate::core::identifiers::CheckId;
use crate::core::identifiers::SuiteId;

// ============================================================================
// SECTION: Check Verdicts
// ============================================================================

/// Reason a check did not pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckFailure {
    /// An assertion did not hold.
    #[error("{0}")]
    Assertion(String),
    /// The check could not run in this environment and was skipped.
    #[error("skipped: {0}")]
    Skipped(String),
}

/// Result of a single check.
pub type CheckResult = Result<(), CheckFailure>;

/// Final status of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Every assertion held.
    Passed,
    /// An assertion did not hold.
    Failed,
    /// The check was skipped.
    Skipped,
}

impl CheckStatus {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Recorded outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Check identifier.
    pub check_id: CheckId,
    /// Human-readable description of what the check asserts.
    pub description: String,
    /// Final status.
    pub status: CheckStatus,
    /// Failure or skip message; `None` when passed.
    pub message: Option<String>,
}

impl CheckOutcome {
    /// Converts a check result into an outcome.
    #[must_use]
    pub fn from_result(check_id: CheckId, description: impl Into<String>, result: CheckResult) -> Self {
        let (status, message) = match result {
            Ok(()) => (CheckStatus::Passed, None),
            Err(CheckFailure::Assertion(message)) => (CheckStatus::Failed, Some(message)),
            Err(CheckFailure::Skipped(message)) => (CheckStatus::Skipped, Some(message)),
        };
        Self {
            check_id,
            description: description.into(),
            status,
            message,
        }
    }
}

/// Pass/fail/skip counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Passed checks.
    pub passed: usize,
    /// Failed checks.
    pub failed: usize,
    /// Skipped checks.
    pub skipped: usize,
    /// Total checks executed.
    pub total: usize,
}

impl RunSummary {
    /// Counts one more outcome with the given status.
    pub const fn record(&mut self, status: CheckStatus) {
        match status {
            CheckStatus::Passed => self.passed += 1,
            CheckStatus::Failed => self.failed += 1,
            CheckStatus::Skipped => self.skipped += 1,
        }
        self.total += 1;
    }

    /// Adds another summary into this one.
    pub const fn merge(&mut self, other: Self) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.total += other.total;
    }

    /// Returns true when nothing failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Outcomes of every executed check in one suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite identifier.
    pub suite_id: SuiteId,
    /// Suite title.
    pub title: String,
    /// Outcomes in declaration order.
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    /// Returns the counts for this suite.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for outcome in &self.outcomes {
            summary.record(outcome.status);
        }
        summary
    }

    /// Looks up an outcome by check identifier.
    #[must_use]
    pub fn outcome(&self, check_id: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|outcome| outcome.check_id.as_str() == check_id)
    }
}

/// Full report for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Fixture the run was scoped to.
    pub fixture: Fixture,
    /// Suite reports in registration order.
    pub suites: Vec<SuiteReport>,
    /// Aggregate counts.
    pub summary: RunSummary,
}

impl RunReport {
    /// Builds a report and computes its summary.
    #[must_use]
    pub fn new(fixture: Fixture, suites: Vec<SuiteReport>) -> Self {
        let mut summary = RunSummary::default();
        for suite in &suites {
            summary.merge(suite.summary());
        }
        Self {
            fixture,
            suites,
            summary,
        }
    }

    /// Returns true when no check failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.summary.is_success()
    }

    /// Iterates over failed outcomes with their suite identifiers.
    pub fn failures(&self) -> impl Iterator<Item = (&SuiteId, &CheckOutcome)> {
        self.suites.iter().flat_map(|suite| {
            suite
                .outcomes
                .iter()
                .filter(|outcome| outcome.status == CheckStatus::Failed)
                .map(move |outcome| (&suite.suite_id, outcome))
        })
    }
}
