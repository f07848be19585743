// crates/infra-gate-aws/src/tables.rs
// ============================================================================
// Module: Table Suite
// Description: Live checks over the deployment's DynamoDB tables.
// Purpose: Confirm each table is active, on-demand, and encrypted.
// Dependencies: infra-gate-core
// ============================================================================

//! ## Overview
//! Table names are `{project}-{environment}-{purpose}`. Existence checks bind
//! to the first three configured purposes in order; the encryption check
//! covers every configured purpose.

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
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteHeader;
use infra_gate_core::SuiteKind;
use infra_gate_core::SuiteReport;
use infra_gate_core::TableExpectations;
use infra_gate_core::runtime::assert::ensure;
use infra_gate_core::runtime::assert::ensure_eq;
use infra_gate_core::runtime::runner::describe_cases;
use infra_gate_core::runtime::runner::run_cases;

use crate::inventory::CloudInventory;
use crate::inventory::TableRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suite identity.
const HEADER: SuiteHeader = SuiteHeader {
    suite_id: "tables",
    title: "DynamoDB tables",
    kind: SuiteKind::Live,
};

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Live table suite.
pub struct TableSuite {
    /// Resource source.
    inventory: Arc<dyn CloudInventory>,
    /// Name scope.
    fixture: Fixture,
    /// Expected table configuration.
    expectations: TableExpectations,
}

impl TableSuite {
    /// Creates the suite for the fixture's tables.
    #[must_use]
    pub fn new(
        inventory: Arc<dyn CloudInventory>,
        fixture: Fixture,
        expectations: TableExpectations,
    ) -> Self {
        Self {
            inventory,
            fixture,
            expectations,
        }
    }

    /// Describes a table, reporting a failed call as a missing table.
    fn describe(&self, table: &str) -> Result<TableRecord, CheckFailure> {
        self.inventory
            .describe_table(table)
            .map_err(|err| CheckFailure::Assertion(format!("table {table} does not exist: {err}")))
    }
}

/// Returns the static suite descriptor.
#[must_use]
pub fn descriptor() -> SuiteDescriptor {
    describe_cases(&HEADER, CASES)
}

impl CheckSuite for TableSuite {
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
const CASES: &[CheckCase<TableSuite>] = &[
    CheckCase {
        id: "deal_state_table_exists",
        description: "deal state table is active and on-demand",
        run: deal_state_table_exists,
    },
    CheckCase {
        id: "agent_state_table_exists",
        description: "agent state table is active and on-demand",
        run: agent_state_table_exists,
    },
    CheckCase {
        id: "user_sessions_table_exists",
        description: "user sessions table is active and on-demand",
        run: user_sessions_table_exists,
    },
    CheckCase {
        id: "tables_have_encryption",
        description: "every table has server-side encryption",
        run: tables_have_encryption,
    },
];

/// Status and billing mode of the purpose at `index`.
fn table_exists(suite: &TableSuite, index: usize) -> CheckResult {
    let Some(purpose) = suite.expectations.table_purposes.get(index) else {
        return Err(CheckFailure::Skipped(format!(
            "no table purpose configured at position {}",
            index + 1
        )));
    };
    let table = suite.fixture.resource_name(purpose);
    let record = suite.describe(&table)?;
    ensure_eq(
        record.status.as_deref().unwrap_or("unknown"),
        suite.expectations.table_status.as_str(),
        &format!("status of table {table}"),
    )?;
    ensure_eq(
        record.billing_mode.as_deref().unwrap_or("unknown"),
        suite.expectations.billing_mode.as_str(),
        &format!("billing mode of table {table}"),
    )
}

/// First purpose.
fn deal_state_table_exists(suite: &TableSuite) -> CheckResult {
    table_exists(suite, 0)
}

/// Second purpose.
fn agent_state_table_exists(suite: &TableSuite) -> CheckResult {
    table_exists(suite, 1)
}

/// Third purpose.
fn user_sessions_table_exists(suite: &TableSuite) -> CheckResult {
    table_exists(suite, 2)
}

/// Accepted encryption status, per table.
fn tables_have_encryption(suite: &TableSuite) -> CheckResult {
    for purpose in &suite.expectations.table_purposes {
        let table = suite.fixture.resource_name(purpose);
        let record = suite.describe(&table)?;
        let status = record.sse_status.as_deref().unwrap_or("DISABLED");
        ensure(
            suite.expectations.sse_statuses.iter().any(|accepted| accepted == status),
            format!(
                "table {table} encryption status must be one of {}, found {status}",
                suite.expectations.sse_statuses.join(", ")
            ),
        )?;
    }
    Ok(())
}
