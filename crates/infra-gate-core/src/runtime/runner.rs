// crates/infra-gate-core/src/runtime/runner.rs
// ============================================================================
// Module: Check Runner
// Description: Executes declarative check tables against a loaded subject.
// Purpose: Give every suite the same filtering, timing, and event emission.
// Dependencies: crate::core, crate::events, crate::interfaces
// ============================================================================

//! ## Overview
//! A suite is a static table of [`CheckCase`]s over one subject type (a loaded
//! artifact or a cloud inventory). [`run_cases`] executes the cases allowed by
//! a [`CheckFilter`] in declaration order and records one event per case.
//!
//! Invariants:
//! - Cases run sequentially; no state flows between them.
//! - Filtered-out cases produce neither an outcome nor an event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::time::Instant;

use crate::core::identifiers::CheckId;
use crate::core::identifiers::SuiteId;
use crate::core::outcome::CheckOutcome;
use crate::core::outcome::CheckResult;
use crate::core::outcome::SuiteReport;
use crate::events::CheckEvent;
use crate::events::CheckEventSink;
use crate::interfaces::CheckDescriptor;
use crate::interfaces::SuiteDescriptor;
use crate::interfaces::SuiteKind;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Static identity of a suite built from a case table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteHeader {
    /// Suite identifier.
    pub suite_id: &'static str,
    /// Suite title.
    pub title: &'static str,
    /// Evidence source.
    pub kind: SuiteKind,
}

/// One declarative check over a subject of type `S`.
pub struct CheckCase<S> {
    /// Check identifier, unique within the suite.
    pub id: &'static str,
    /// What the check asserts.
    pub description: &'static str,
    /// Check body.
    pub run: fn(&S) -> CheckResult,
}

/// Restricts which checks run.
///
/// # Invariants
/// - `None` admits every check.
/// - Entries match either a bare check id or a qualified `suite.check` name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckFilter {
    /// Requested check names.
    only: Option<BTreeSet<String>>,
}

impl CheckFilter {
    /// Admits every check.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            only: None,
        }
    }

    /// Admits only the named checks; an empty list admits every check.
    #[must_use]
    pub fn only<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Self::all();
        }
        Self {
            only: Some(names),
        }
    }

    /// Returns the requested names, if restricted.
    #[must_use]
    pub const fn requested(&self) -> Option<&BTreeSet<String>> {
        self.only.as_ref()
    }

    /// Returns true when the check is admitted.
    #[must_use]
    pub fn allows(&self, suite_id: &str, check_id: &str) -> bool {
        self.only.as_ref().is_none_or(|names| {
            names.contains(check_id) || names.contains(&format!("{suite_id}.{check_id}"))
        })
    }
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Builds the static descriptor for a case table.
#[must_use]
pub fn describe_cases<S>(header: &SuiteHeader, cases: &[CheckCase<S>]) -> SuiteDescriptor {
    SuiteDescriptor {
        suite_id: SuiteId::new(header.suite_id),
        title: header.title.to_string(),
        kind: header.kind,
        checks: cases
            .iter()
            .map(|case| CheckDescriptor {
                check_id: CheckId::new(case.id),
                description: case.description.to_string(),
            })
            .collect(),
    }
}

/// Runs every admitted case against `subject` in declaration order.
#[must_use]
pub fn run_cases<S>(
    header: &SuiteHeader,
    cases: &[CheckCase<S>],
    subject: &S,
    filter: &CheckFilter,
    sink: &dyn CheckEventSink,
) -> SuiteReport {
    let mut outcomes = Vec::new();
    for case in cases.iter().filter(|case| filter.allows(header.suite_id, case.id)) {
        let started = Instant::now();
        let result = (case.run)(subject);
        let elapsed = started.elapsed().as_millis();
        let outcome = CheckOutcome::from_result(CheckId::new(case.id), case.description, result);
        sink.record(&CheckEvent::new(
            header.suite_id,
            case.id,
            outcome.status,
            outcome.message.clone(),
            elapsed,
        ));
        outcomes.push(outcome);
    }
    SuiteReport {
        suite_id: SuiteId::new(header.suite_id),
        title: header.title.to_string(),
        outcomes,
    }
}
