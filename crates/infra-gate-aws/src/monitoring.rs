// crates/infra-gate-aws/src/monitoring.rs
// ============================================================================
// Module: Monitoring Suite
// Description: Live checks over CloudWatch logs, alarms, dashboards, and SNS.
// Purpose: Confirm the monitoring module was applied for the deployment.
// Dependencies: infra-gate-core
// ============================================================================

//! ## Overview
//! Log groups follow three naming schemes: `/aws/{project}/{environment}/application`,
//! `/aws/lambda/{project}-{environment}`, and `/aws/ecs/{project}-{environment}`.
//! Alarms share the `{project}-{environment}` prefix; the alarm topic and the
//! dashboard are named by purpose under the same prefix.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use infra_gate_core::CheckCase;
use infra_gate_core::CheckEventSink;
use infra_gate_core::CheckFailure;
use infra_gate_core::CheckFilter;
use infra_gate_core::CheckResult;
use infra_gate_core::CheckSuite;
use infra_gate_core::Fixture;
use infra_gate_core::MonitoringExpectations;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteHeader;
use infra_gate_core::SuiteKind;
use infra_gate_core::SuiteReport;
use infra_gate_core::runtime::assert::ensure;
use infra_gate_core::runtime::assert::ensure_at_least;
use infra_gate_core::runtime::assert::ensure_eq;
use infra_gate_core::runtime::runner::describe_cases;
use infra_gate_core::runtime::runner::run_cases;

use crate::inventory::CloudInventory;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suite identity.
const HEADER: SuiteHeader = SuiteHeader {
    suite_id: "monitoring",
    title: "CloudWatch monitoring",
    kind: SuiteKind::Live,
};

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Live monitoring suite.
pub struct MonitoringSuite {
    /// Resource source.
    inventory: Arc<dyn CloudInventory>,
    /// Name scope.
    fixture: Fixture,
    /// Expected monitoring resources.
    expectations: MonitoringExpectations,
}

impl MonitoringSuite {
    /// Creates the suite for the fixture's monitoring resources.
    #[must_use]
    pub fn new(
        inventory: Arc<dyn CloudInventory>,
        fixture: Fixture,
        expectations: MonitoringExpectations,
    ) -> Self {
        Self {
            inventory,
            fixture,
            expectations,
        }
    }

    /// Returns the expected log group names.
    fn log_group_names(&self) -> [String; 3] {
        let Fixture {
            project,
            environment,
            ..
        } = &self.fixture;
        let prefix = self.fixture.resource_prefix();
        [
            format!("/aws/{project}/{environment}/application"),
            format!("/aws/lambda/{prefix}"),
            format!("/aws/ecs/{prefix}"),
        ]
    }
}

/// Returns the static suite descriptor.
#[must_use]
pub fn descriptor() -> SuiteDescriptor {
    describe_cases(&HEADER, CASES)
}

impl CheckSuite for MonitoringSuite {
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
const CASES: &[CheckCase<MonitoringSuite>] = &[
    CheckCase {
        id: "log_groups_exist",
        description: "application, lambda, and ECS log groups exist",
        run: log_groups_exist,
    },
    CheckCase {
        id: "alarms_exist",
        description: "expected metric alarms exist",
        run: alarms_exist,
    },
    CheckCase {
        id: "sns_topic_exists",
        description: "alarm notification topic exists",
        run: sns_topic_exists,
    },
    CheckCase {
        id: "dashboard_exists",
        description: "monitoring dashboard exists",
        run: dashboard_exists,
    },
];

/// A prefix query per expected group.
fn log_groups_exist(suite: &MonitoringSuite) -> CheckResult {
    for name in suite.log_group_names() {
        let groups = suite.inventory.log_groups(&name)?;
        ensure(!groups.is_empty(), format!("log group {name} must exist"))?;
    }
    Ok(())
}

/// Alarm count and markers.
fn alarms_exist(suite: &MonitoringSuite) -> CheckResult {
    let prefix = suite.fixture.resource_prefix();
    let alarms = suite.inventory.alarm_names(&prefix)?;
    ensure_at_least(alarms.len(), suite.expectations.min_alarms, &format!("alarms prefixed {prefix}"))?;
    for marker in &suite.expectations.alarm_markers {
        ensure(
            alarms.iter().any(|alarm| alarm.contains(marker.as_str())),
            format!("an alarm name must contain `{marker}`"),
        )?;
    }
    Ok(())
}

/// Topic ARN containing the topic name.
fn sns_topic_exists(suite: &MonitoringSuite) -> CheckResult {
    let topic = suite.fixture.resource_name(&suite.expectations.alarm_topic_purpose);
    let arns = suite.inventory.topic_arns()?;
    ensure(
        arns.iter().any(|arn| arn.contains(topic.as_str())),
        format!("SNS topic {topic} must exist"),
    )
}

/// Dashboard lookup by name.
fn dashboard_exists(suite: &MonitoringSuite) -> CheckResult {
    let dashboard = suite.fixture.resource_name(&suite.expectations.dashboard_purpose);
    let reported = suite.inventory.dashboard(&dashboard).map_err(|err| {
        CheckFailure::Assertion(format!("dashboard {dashboard} does not exist: {err}"))
    })?;
    ensure_eq(reported.as_str(), dashboard.as_str(), "dashboard name")
}
