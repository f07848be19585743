// crates/infra-gate-aws/src/storage.rs
// ============================================================================
// Module: Storage Suite
// Description: Live checks over the deployment's S3 buckets.
// Purpose: Confirm each bucket exists, is encrypted, and keeps versions.
// Dependencies: infra-gate-core
// ============================================================================

//! ## Overview
//! Bucket names are `{project}-{environment}-{purpose}`. The three existence
//! checks bind to the first three configured purposes in order; the
//! encryption and versioning checks cover every configured purpose.

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
use infra_gate_core::StorageExpectations;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteHeader;
use infra_gate_core::SuiteKind;
use infra_gate_core::SuiteReport;
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
    suite_id: "storage",
    title: "S3 storage",
    kind: SuiteKind::Live,
};

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Live storage suite.
pub struct StorageSuite {
    /// Resource source.
    inventory: Arc<dyn CloudInventory>,
    /// Name scope.
    fixture: Fixture,
    /// Expected bucket configuration.
    expectations: StorageExpectations,
}

impl StorageSuite {
    /// Creates the suite for the fixture's buckets.
    #[must_use]
    pub fn new(
        inventory: Arc<dyn CloudInventory>,
        fixture: Fixture,
        expectations: StorageExpectations,
    ) -> Self {
        Self {
            inventory,
            fixture,
            expectations,
        }
    }

    /// Returns the bucket name for the purpose at `index`.
    fn bucket_at(&self, index: usize) -> Result<String, CheckFailure> {
        self.expectations
            .bucket_purposes
            .get(index)
            .map(|purpose| self.fixture.resource_name(purpose))
            .ok_or_else(|| {
                CheckFailure::Skipped(format!("no bucket purpose configured at position {}", index + 1))
            })
    }

    /// Returns every configured bucket name.
    fn buckets(&self) -> Vec<String> {
        self.expectations
            .bucket_purposes
            .iter()
            .map(|purpose| self.fixture.resource_name(purpose))
            .collect()
    }
}

/// Returns the static suite descriptor.
#[must_use]
pub fn descriptor() -> SuiteDescriptor {
    describe_cases(&HEADER, CASES)
}

impl CheckSuite for StorageSuite {
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
const CASES: &[CheckCase<StorageSuite>] = &[
    CheckCase {
        id: "data_lake_bucket_exists",
        description: "data lake bucket exists",
        run: data_lake_bucket_exists,
    },
    CheckCase {
        id: "models_bucket_exists",
        description: "models bucket exists",
        run: models_bucket_exists,
    },
    CheckCase {
        id: "backups_bucket_exists",
        description: "backups bucket exists",
        run: backups_bucket_exists,
    },
    CheckCase {
        id: "bucket_encryption",
        description: "every bucket has default server-side encryption",
        run: bucket_encryption,
    },
    CheckCase {
        id: "bucket_versioning",
        description: "every bucket has versioning enabled",
        run: bucket_versioning,
    },
];

/// Head-bucket on the purpose at `index`.
fn bucket_exists(suite: &StorageSuite, index: usize) -> CheckResult {
    let bucket = suite.bucket_at(index)?;
    suite
        .inventory
        .head_bucket(&bucket)
        .map_err(|err| CheckFailure::Assertion(format!("bucket {bucket} does not exist: {err}")))
}

/// First purpose.
fn data_lake_bucket_exists(suite: &StorageSuite) -> CheckResult {
    bucket_exists(suite, 0)
}

/// Second purpose.
fn models_bucket_exists(suite: &StorageSuite) -> CheckResult {
    bucket_exists(suite, 1)
}

/// Third purpose.
fn backups_bucket_exists(suite: &StorageSuite) -> CheckResult {
    bucket_exists(suite, 2)
}

/// First rule's default algorithm, per bucket.
fn bucket_encryption(suite: &StorageSuite) -> CheckResult {
    for bucket in suite.buckets() {
        let rules = suite.inventory.bucket_encryption(&bucket)?;
        ensure_at_least(rules.len(), 1, &format!("encryption rules on bucket {bucket}"))?;
        let algorithm = rules.first().and_then(Option::as_deref).unwrap_or("none");
        ensure_eq(
            algorithm,
            suite.expectations.sse_algorithm.as_str(),
            &format!("default encryption of bucket {bucket}"),
        )?;
    }
    Ok(())
}

/// Versioning status, per bucket.
fn bucket_versioning(suite: &StorageSuite) -> CheckResult {
    for bucket in suite.buckets() {
        let status = suite.inventory.bucket_versioning(&bucket)?;
        ensure_eq(
            status.as_deref().unwrap_or("unset"),
            suite.expectations.versioning_status.as_str(),
            &format!("versioning of bucket {bucket}"),
        )?;
    }
    Ok(())
}
