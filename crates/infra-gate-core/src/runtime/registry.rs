// crates/infra-gate-core/src/runtime/registry.rs
// ============================================================================
// Module: Suite Registry
// Description: Ordered registry of check suites with selection policy.
// Purpose: Select, run, and aggregate suites into a run report.
// Dependencies: crate::core, crate::events, crate::interfaces, serde, thiserror
// ============================================================================

//! ## Overview
//! Suites are registered once, in report order. A run resolves the requested
//! suite identifiers against the registry and the [`SuiteSelection`] policy,
//! checks that every requested check name exists, then runs the selected
//! suites one after another.
//!
//! Invariants:
//! - Suite identifiers are unique within the registry.
//! - Requested suites and checks must exist; unknown names fail the run before
//!   any suite executes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::fixture::Fixture;
use crate::core::outcome::RunReport;
use crate::events::CheckEventSink;
use crate::events::RunEvent;
use crate::events::SuiteEvent;
use crate::interfaces::CheckSuite;
use crate::interfaces::SuiteDescriptor;
use crate::runtime::runner::CheckFilter;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Suite registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A suite identifier was registered twice.
    #[error("suite already registered: {0}")]
    DuplicateSuite(String),
    /// A requested suite is not registered.
    #[error("unknown suite: {0}")]
    UnknownSuite(String),
    /// A requested suite is excluded by the selection policy.
    #[error("suite excluded by selection policy: {0}")]
    SuiteNotAllowed(String),
    /// A requested check matches no check of the selected suites.
    #[error("unknown check: {0}")]
    UnknownCheck(String),
    /// Nothing is left to run.
    #[error("no suites selected")]
    EmptySelection,
}

// ============================================================================
// SECTION: Selection Policy
// ============================================================================

/// Policy controlling which suites may run.
///
/// # Invariants
/// - `denylist` overrides `allowlist` when both are present.
/// - If `allowlist` is `None`, all suites are allowed unless denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteSelection {
    /// Optional allowlist of suite identifiers.
    pub allowlist: Option<BTreeSet<String>>,
    /// Explicit denylist of suite identifiers.
    pub denylist: BTreeSet<String>,
}

impl SuiteSelection {
    /// Returns a policy that permits all suites.
    #[must_use]
    pub const fn allow_all() -> Self {
        Self {
            allowlist: None,
            denylist: BTreeSet::new(),
        }
    }

    /// Returns true when the suite is allowed by policy.
    #[must_use]
    pub fn is_allowed(&self, suite_id: &str) -> bool {
        if self.denylist.contains(suite_id) {
            return false;
        }
        if let Some(allowlist) = &self.allowlist {
            return allowlist.contains(suite_id);
        }
        true
    }
}

impl Default for SuiteSelection {
    fn default() -> Self {
        Self::allow_all()
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Boxed suite stored by the registry.
type BoxedSuite = Box<dyn CheckSuite + Send + Sync>;

/// Ordered suite registry with policy enforcement.
///
/// # Invariants
/// - Suites run in registration order.
pub struct SuiteRegistry {
    /// Registered suites in registration order.
    suites: Vec<BoxedSuite>,
    /// Selection policy applied to every run.
    selection: SuiteSelection,
}

impl SuiteRegistry {
    /// Creates an empty registry with the provided policy.
    #[must_use]
    pub const fn new(selection: SuiteSelection) -> Self {
        Self {
            suites: Vec::new(),
            selection,
        }
    }

    /// Registers a suite after every previously registered one.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateSuite`] when the identifier is taken.
    pub fn register(
        &mut self,
        suite: impl CheckSuite + Send + Sync + 'static,
    ) -> Result<(), RegistryError> {
        let suite_id = suite.descriptor().suite_id;
        if self.contains(suite_id.as_str()) {
            return Err(RegistryError::DuplicateSuite(suite_id.to_string()));
        }
        self.suites.push(Box::new(suite));
        Ok(())
    }

    /// Returns true when a suite with this identifier is registered.
    #[must_use]
    pub fn contains(&self, suite_id: &str) -> bool {
        self.suites.iter().any(|suite| suite.descriptor().suite_id.as_str() == suite_id)
    }

    /// Returns descriptors of every registered suite in registration order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<SuiteDescriptor> {
        self.suites.iter().map(|suite| suite.descriptor()).collect()
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn selection(&self) -> &SuiteSelection {
        &self.selection
    }

    /// Runs the requested suites (all allowed suites when `requested` is empty).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when a requested suite or check is unknown,
    /// a requested suite is denied by policy, or nothing is selected.
    pub fn run(
        &self,
        fixture: &Fixture,
        requested: &[String],
        filter: &CheckFilter,
        sink: &dyn CheckEventSink,
    ) -> Result<RunReport, RegistryError> {
        let selected = self.select(requested)?;
        if selected.is_empty() {
            return Err(RegistryError::EmptySelection);
        }
        let descriptors: Vec<SuiteDescriptor> =
            selected.iter().map(|suite| suite.descriptor()).collect();
        ensure_known_checks(&descriptors, filter)?;

        let mut reports = Vec::with_capacity(selected.len());
        for (suite, descriptor) in selected.iter().zip(&descriptors) {
            let admitted = descriptor
                .checks
                .iter()
                .filter(|check| {
                    filter.allows(descriptor.suite_id.as_str(), check.check_id.as_str())
                })
                .count();
            if admitted == 0 {
                continue;
            }
            sink.record_suite(&SuiteEvent::new(
                descriptor.suite_id.as_str(),
                descriptor.kind,
                admitted,
            ));
            reports.push(suite.run(filter, sink));
        }

        let report = RunReport::new(fixture.clone(), reports);
        sink.record_run(&RunEvent::new(
            fixture.resource_prefix(),
            fixture.region.clone(),
            report.summary,
        ));
        Ok(report)
    }

    /// Resolves requested identifiers to registered, allowed suites.
    fn select(&self, requested: &[String]) -> Result<Vec<&BoxedSuite>, RegistryError> {
        if requested.is_empty() {
            return Ok(self
                .suites
                .iter()
                .filter(|suite| self.selection.is_allowed(suite.descriptor().suite_id.as_str()))
                .collect());
        }
        for suite_id in requested {
            if !self.contains(suite_id) {
                return Err(RegistryError::UnknownSuite(suite_id.clone()));
            }
            if !self.selection.is_allowed(suite_id) {
                return Err(RegistryError::SuiteNotAllowed(suite_id.clone()));
            }
        }
        Ok(self
            .suites
            .iter()
            .filter(|suite| {
                let suite_id = suite.descriptor().suite_id;
                requested.iter().any(|requested_id| requested_id == suite_id.as_str())
            })
            .collect())
    }
}

/// Fails when a requested check name matches nothing in the selected suites.
fn ensure_known_checks(
    descriptors: &[SuiteDescriptor],
    filter: &CheckFilter,
) -> Result<(), RegistryError> {
    let Some(requested) = filter.requested() else {
        return Ok(());
    };
    for name in requested {
        let known = descriptors.iter().any(|descriptor| {
            descriptor.checks.iter().any(|check| {
                name == check.check_id.as_str()
                    || *name == check.check_id.qualified(&descriptor.suite_id)
            })
        });
        if !known {
            return Err(RegistryError::UnknownCheck(name.clone()));
        }
    }
    Ok(())
}
