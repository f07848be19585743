// crates/infra-gate-aws/src/cost.rs
// ============================================================================
// Module: Cost Suite
// Description: Live check for a cost anomaly monitor.
// Purpose: Confirm cost management is configured for the project.
// Dependencies: infra-gate-core
// ============================================================================

//! ## Overview
//! Cost Explorer is not enabled in every account. When the monitor listing
//! fails the check is skipped rather than failed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use infra_gate_core::CheckCase;
use infra_gate_core::CheckEventSink;
use infra_gate_core::CheckFilter;
use infra_gate_core::CheckResult;
use infra_gate_core::CheckSuite;
use infra_gate_core::Fixture;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteHeader;
use infra_gate_core::SuiteKind;
use infra_gate_core::SuiteReport;
use infra_gate_core::runtime::assert::ensure;
use infra_gate_core::runtime::assert::skip;
use infra_gate_core::runtime::runner::describe_cases;
use infra_gate_core::runtime::runner::run_cases;

use crate::inventory::CloudInventory;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suite identity.
const HEADER: SuiteHeader = SuiteHeader {
    suite_id: "cost",
    title: "Cost management",
    kind: SuiteKind::Live,
};

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Live cost suite.
pub struct CostSuite {
    /// Resource source.
    inventory: Arc<dyn CloudInventory>,
    /// Project scope.
    fixture: Fixture,
}

impl CostSuite {
    /// Creates the suite for the fixture's project.
    #[must_use]
    pub fn new(inventory: Arc<dyn CloudInventory>, fixture: Fixture) -> Self {
        Self {
            inventory,
            fixture,
        }
    }
}

/// Returns the static suite descriptor.
#[must_use]
pub fn descriptor() -> SuiteDescriptor {
    describe_cases(&HEADER, CASES)
}

impl CheckSuite for CostSuite {
    fn descriptor(&self) -> SuiteDescriptor {
        descriptor()
    }

    fn run(&self, filter: &CheckFilter, sink: &dyn CheckEventSink) -> SuiteReport {
        run_cases(&HEADER, CASES, self, filter, sink)
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Declared checks in report order.
const CASES: &[CheckCase<CostSuite>] = &[CheckCase {
    id: "cost_anomaly_monitor_exists",
    description: "a cost anomaly monitor covers the project",
    run: cost_anomaly_monitor_exists,
}];

/// Monitor name containing the project, case-insensitively.
fn cost_anomaly_monitor_exists(suite: &CostSuite) -> CheckResult {
    let monitors = match suite.inventory.anomaly_monitors() {
        Ok(monitors) => monitors,
        Err(err) => return skip(format!("cost explorer unavailable: {err}")),
    };
    let project = suite.fixture.project.to_lowercase();
    ensure(
        monitors.iter().any(|name| name.to_lowercase().contains(project.as_str())),
        format!("a cost anomaly monitor name must contain `{project}`"),
    )
}
