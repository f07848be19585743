// crates/infra-gate-aws/tests/live_suites.rs
// ============================================================================
// Module: Live Suite Tests
// Description: Live suites over an in-memory inventory.
// Purpose: Ensure live checks pass on a conforming deployment and report
//          each drift, missing resource, or unavailable API precisely.
// Dependencies: infra-gate-aws, infra-gate-core
// ============================================================================

//! Live suite behavior tests against a fake inventory.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use infra_gate_aws::CloudInventory;
use infra_gate_aws::InventoryError;
use infra_gate_aws::LIVE_SUITE_IDS;
use infra_gate_aws::SubnetRecord;
use infra_gate_aws::TableRecord;
use infra_gate_aws::TagScope;
use infra_gate_aws::VpcEndpointRecord;
use infra_gate_aws::VpcRecord;
use infra_gate_aws::live_catalog;
use infra_gate_aws::register_live_suites;
use infra_gate_core::CheckFilter;
use infra_gate_core::CheckOutcome;
use infra_gate_core::CheckStatus;
use infra_gate_core::Expectations;
use infra_gate_core::Fixture;
use infra_gate_core::NoopEventSink;
use infra_gate_core::RunReport;
use infra_gate_core::SuiteRegistry;
use infra_gate_core::SuiteSelection;

// ============================================================================
// SECTION: Fake Inventory
// ============================================================================

/// In-memory deployment state.
#[derive(Clone)]
struct FakeInventory {
    /// Tagged VPCs.
    vpcs: Vec<VpcRecord>,
    /// Tagged subnets.
    subnets: Vec<SubnetRecord>,
    /// Tagged internet gateway ids.
    gateways: Vec<String>,
    /// Regional VPC endpoints.
    endpoints: Vec<VpcEndpointRecord>,
    /// Buckets by name: encryption rules and versioning status.
    buckets: BTreeMap<String, (Vec<Option<String>>, Option<String>)>,
    /// Tables by name.
    tables: BTreeMap<String, TableRecord>,
    /// Log group names.
    log_groups: Vec<String>,
    /// Alarm names.
    alarms: Vec<String>,
    /// Topic ARNs.
    topics: Vec<String>,
    /// Dashboard names.
    dashboards: Vec<String>,
    /// Anomaly monitor names, or the Cost Explorer error.
    monitors: Result<Vec<String>, InventoryError>,
    /// Tag scopes seen by tagged lookups.
    scopes: Arc<Mutex<Vec<TagScope>>>,
}

impl FakeInventory {
    /// A deployment matching every default expectation for `dealfinder-dev`.
    fn conforming() -> Self {
        let zones = ["us-east-1a", "us-east-1b", "us-east-1c"];
        let subnets = (0 .. 6)
            .map(|index| SubnetRecord {
                subnet_id: format!("subnet-{index}"),
                availability_zone: Some(zones[index % 3].to_string()),
            })
            .collect();
        let buckets = ["data-lake", "models", "backups"]
            .iter()
            .map(|purpose| {
                (
                    format!("dealfinder-dev-{purpose}"),
                    (vec![Some("AES256".to_string())], Some("Enabled".to_string())),
                )
            })
            .collect();
        let tables = ["deal-state", "agent-state", "user-sessions"]
            .iter()
            .map(|purpose| {
                let name = format!("dealfinder-dev-{purpose}");
                let record = TableRecord {
                    name: name.clone(),
                    status: Some("ACTIVE".to_string()),
                    billing_mode: Some("PAY_PER_REQUEST".to_string()),
                    sse_status: Some("ENABLED".to_string()),
                };
                (name, record)
            })
            .collect();
        Self {
            vpcs: vec![VpcRecord {
                vpc_id: "vpc-1".to_string(),
                cidr_block: Some("10.0.0.0/16".to_string()),
            }],
            subnets,
            gateways: vec!["igw-1".to_string()],
            endpoints: vec![
                VpcEndpointRecord {
                    endpoint_id: "vpce-1".to_string(),
                    service_name: Some("com.amazonaws.us-east-1.s3".to_string()),
                },
                VpcEndpointRecord {
                    endpoint_id: "vpce-2".to_string(),
                    service_name: Some("com.amazonaws.us-east-1.dynamodb".to_string()),
                },
            ],
            buckets,
            tables,
            log_groups: vec![
                "/aws/dealfinder/dev/application".to_string(),
                "/aws/lambda/dealfinder-dev".to_string(),
                "/aws/lambda/dealfinder-dev-scraper".to_string(),
                "/aws/ecs/dealfinder-dev".to_string(),
            ],
            alarms: [
                "dynamodb-high-read-capacity",
                "dynamodb-high-write-capacity",
                "lambda-errors",
                "lambda-throttles",
                "s3-storage-size",
            ]
            .iter()
            .map(|marker| format!("dealfinder-dev-{marker}"))
            .collect(),
            topics: vec!["arn:aws:sns:us-east-1:123456789012:dealfinder-dev-alarms".to_string()],
            dashboards: vec!["dealfinder-dev-dashboard".to_string()],
            monitors: Ok(vec!["DealFinder-Dev-Spend".to_string()]),
            scopes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Records a tagged lookup.
    fn record_scope(&self, scope: &TagScope) {
        self.scopes.lock().unwrap().push(scope.clone());
    }
}

/// Builds a not-found API error.
fn not_found(operation: &'static str) -> InventoryError {
    InventoryError::Api {
        operation,
        message: "NotFound".to_string(),
    }
}

impl CloudInventory for FakeInventory {
    fn vpcs(&self, scope: &TagScope) -> Result<Vec<VpcRecord>, InventoryError> {
        self.record_scope(scope);
        Ok(self.vpcs.clone())
    }

    fn subnets(&self, scope: &TagScope) -> Result<Vec<SubnetRecord>, InventoryError> {
        self.record_scope(scope);
        Ok(self.subnets.clone())
    }

    fn internet_gateways(&self, scope: &TagScope) -> Result<Vec<String>, InventoryError> {
        self.record_scope(scope);
        Ok(self.gateways.clone())
    }

    fn vpc_endpoints(&self) -> Result<Vec<VpcEndpointRecord>, InventoryError> {
        Ok(self.endpoints.clone())
    }

    fn head_bucket(&self, bucket: &str) -> Result<(), InventoryError> {
        self.buckets.get(bucket).map(|_| ()).ok_or_else(|| not_found("HeadBucket"))
    }

    fn bucket_encryption(&self, bucket: &str) -> Result<Vec<Option<String>>, InventoryError> {
        self.buckets
            .get(bucket)
            .map(|(rules, _)| rules.clone())
            .ok_or_else(|| not_found("GetBucketEncryption"))
    }

    fn bucket_versioning(&self, bucket: &str) -> Result<Option<String>, InventoryError> {
        self.buckets
            .get(bucket)
            .map(|(_, status)| status.clone())
            .ok_or_else(|| not_found("GetBucketVersioning"))
    }

    fn describe_table(&self, name: &str) -> Result<TableRecord, InventoryError> {
        self.tables.get(name).cloned().ok_or_else(|| not_found("DescribeTable"))
    }

    fn log_groups(&self, prefix: &str) -> Result<Vec<String>, InventoryError> {
        Ok(self.log_groups.iter().filter(|name| name.starts_with(prefix)).cloned().collect())
    }

    fn alarm_names(&self, prefix: &str) -> Result<Vec<String>, InventoryError> {
        Ok(self.alarms.iter().filter(|name| name.starts_with(prefix)).cloned().collect())
    }

    fn topic_arns(&self) -> Result<Vec<String>, InventoryError> {
        Ok(self.topics.clone())
    }

    fn dashboard(&self, name: &str) -> Result<String, InventoryError> {
        self.dashboards
            .iter()
            .find(|dashboard| dashboard.as_str() == name)
            .cloned()
            .ok_or_else(|| not_found("GetDashboard"))
    }

    fn anomaly_monitors(&self) -> Result<Vec<String>, InventoryError> {
        self.monitors.clone()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs every live suite over `inventory`.
fn run_with(inventory: FakeInventory, expectations: &Expectations) -> RunReport {
    let inventory: Arc<dyn CloudInventory> = Arc::new(inventory);
    let fixture = Fixture::default();
    let mut registry = SuiteRegistry::new(SuiteSelection::allow_all());
    register_live_suites(&mut registry, &inventory, &fixture, expectations).unwrap();
    registry.run(&fixture, &[], &CheckFilter::all(), &NoopEventSink).unwrap()
}

/// Runs every live suite with default expectations.
fn run(inventory: FakeInventory) -> RunReport {
    run_with(inventory, &Expectations::default())
}

/// Returns one outcome by suite and check id.
fn outcome<'a>(report: &'a RunReport, suite_id: &str, check_id: &str) -> &'a CheckOutcome {
    report
        .suites
        .iter()
        .find(|suite| suite.suite_id.as_str() == suite_id)
        .and_then(|suite| suite.outcome(check_id))
        .unwrap_or_else(|| panic!("missing outcome {suite_id}.{check_id}"))
}

/// Asserts a check failed with a message containing `fragment`.
fn assert_failed_with(report: &RunReport, suite_id: &str, check_id: &str, fragment: &str) {
    let outcome = outcome(report, suite_id, check_id);
    assert_eq!(outcome.status, CheckStatus::Failed, "{suite_id}.{check_id} should fail");
    let message = outcome.message.as_deref().unwrap_or_default();
    assert!(message.contains(fragment), "{suite_id}.{check_id}: {message:?} lacks {fragment:?}");
}

/// Returns the ids of failed checks as `suite.check`.
fn failed_ids(report: &RunReport) -> Vec<String> {
    report
        .failures()
        .map(|(suite_id, outcome)| format!("{suite_id}.{}", outcome.check_id))
        .collect()
}

// ============================================================================
// SECTION: Conforming Deployment
// ============================================================================

#[test]
fn conforming_deployment_passes_every_live_check() {
    let report = run(FakeInventory::conforming());

    assert!(report.is_success(), "unexpected failures: {:?}", failed_ids(&report));
    let declared: usize = live_catalog().iter().map(|suite| suite.checks.len()).sum();
    assert_eq!(report.summary.total, declared);
    assert_eq!(report.summary.passed, declared);
}

#[test]
fn live_catalog_lists_every_suite_and_check_in_order() {
    let catalog = live_catalog();
    let ids: Vec<&str> = catalog.iter().map(|suite| suite.suite_id.as_str()).collect();
    assert_eq!(ids, LIVE_SUITE_IDS);

    let checks: Vec<Vec<&str>> = catalog
        .iter()
        .map(|suite| suite.checks.iter().map(|check| check.check_id.as_str()).collect())
        .collect();
    assert_eq!(
        checks,
        vec![
            vec!["vpc_exists", "subnets_exist", "internet_gateway_exists", "vpc_endpoints_exist"],
            vec![
                "data_lake_bucket_exists",
                "models_bucket_exists",
                "backups_bucket_exists",
                "bucket_encryption",
                "bucket_versioning",
            ],
            vec![
                "deal_state_table_exists",
                "agent_state_table_exists",
                "user_sessions_table_exists",
                "tables_have_encryption",
            ],
            vec!["log_groups_exist", "alarms_exist", "sns_topic_exists", "dashboard_exists"],
            vec!["cost_anomaly_monitor_exists"],
        ]
    );
}

#[test]
fn tagged_lookups_use_fixture_project_and_environment() {
    let inventory = FakeInventory::conforming();
    let scopes = Arc::clone(&inventory.scopes);
    let _ = run(inventory);

    let scopes = scopes.lock().unwrap();
    assert_eq!(scopes.len(), 3);
    for scope in scopes.iter() {
        assert_eq!(scope.project, "dealfinder");
        assert_eq!(scope.environment, "dev");
    }
}

// ============================================================================
// SECTION: Network
// ============================================================================

#[test]
fn vpc_with_wrong_cidr_fails() {
    let mut inventory = FakeInventory::conforming();
    inventory.vpcs[0].cidr_block = Some("10.1.0.0/16".to_string());
    let report = run(inventory);

    assert_failed_with(&report, "network", "vpc_exists", "expected `10.0.0.0/16`, found `10.1.0.0/16`");
}

#[test]
fn two_tagged_vpcs_fail_the_count() {
    let mut inventory = FakeInventory::conforming();
    let extra = inventory.vpcs[0].clone();
    inventory.vpcs.push(extra);
    let report = run(inventory);

    assert_failed_with(&report, "network", "vpc_exists", "expected exactly 1, found 2");
}

#[test]
fn subnets_in_two_zones_fail() {
    let mut inventory = FakeInventory::conforming();
    for subnet in &mut inventory.subnets {
        if subnet.availability_zone.as_deref() == Some("us-east-1c") {
            subnet.availability_zone = Some("us-east-1a".to_string());
        }
    }
    let report = run(inventory);

    assert_failed_with(&report, "network", "subnets_exist", "distinct availability zones");
}

#[test]
fn missing_gateway_and_dynamodb_endpoint_fail() {
    let mut inventory = FakeInventory::conforming();
    inventory.gateways.clear();
    inventory.endpoints.truncate(1);
    let report = run(inventory);

    assert_failed_with(&report, "network", "internet_gateway_exists", "expected exactly 1, found 0");
    assert_failed_with(&report, "network", "vpc_endpoints_exist", "`dynamodb`");
}

// ============================================================================
// SECTION: Storage
// ============================================================================

#[test]
fn missing_models_bucket_fails_existence_and_per_bucket_checks() {
    let mut inventory = FakeInventory::conforming();
    inventory.buckets.remove("dealfinder-dev-models");
    let report = run(inventory);

    assert_failed_with(
        &report,
        "storage",
        "models_bucket_exists",
        "bucket dealfinder-dev-models does not exist",
    );
    assert_failed_with(&report, "storage", "bucket_encryption", "GetBucketEncryption failed");
    assert_failed_with(&report, "storage", "bucket_versioning", "GetBucketVersioning failed");
    assert_eq!(outcome(&report, "storage", "data_lake_bucket_exists").status, CheckStatus::Passed);
}

#[test]
fn kms_encryption_and_suspended_versioning_fail() {
    let mut inventory = FakeInventory::conforming();
    let bucket = inventory.buckets.get_mut("dealfinder-dev-backups").unwrap();
    bucket.0 = vec![Some("aws:kms".to_string())];
    bucket.1 = Some("Suspended".to_string());
    let report = run(inventory);

    assert_failed_with(&report, "storage", "bucket_encryption", "found `aws:kms`");
    assert_failed_with(&report, "storage", "bucket_versioning", "found `Suspended`");
}

#[test]
fn bucket_without_rules_fails_encryption() {
    let mut inventory = FakeInventory::conforming();
    inventory.buckets.get_mut("dealfinder-dev-data-lake").unwrap().0.clear();
    let report = run(inventory);

    assert_failed_with(&report, "storage", "bucket_encryption", "encryption rules on bucket");
}

#[test]
fn fewer_bucket_purposes_skip_unbound_existence_checks() {
    let mut expectations = Expectations::default();
    expectations.storage.bucket_purposes.truncate(1);
    let report = run_with(FakeInventory::conforming(), &expectations);

    assert_eq!(outcome(&report, "storage", "data_lake_bucket_exists").status, CheckStatus::Passed);
    assert_eq!(outcome(&report, "storage", "models_bucket_exists").status, CheckStatus::Skipped);
    assert_eq!(outcome(&report, "storage", "backups_bucket_exists").status, CheckStatus::Skipped);
    assert!(report.is_success());
}

// ============================================================================
// SECTION: Tables
// ============================================================================

#[test]
fn provisioned_table_fails_billing_mode() {
    let mut inventory = FakeInventory::conforming();
    inventory.tables.get_mut("dealfinder-dev-agent-state").unwrap().billing_mode =
        Some("PROVISIONED".to_string());
    let report = run(inventory);

    assert_failed_with(
        &report,
        "tables",
        "agent_state_table_exists",
        "billing mode of table dealfinder-dev-agent-state",
    );
}

#[test]
fn creating_table_fails_status() {
    let mut inventory = FakeInventory::conforming();
    inventory.tables.get_mut("dealfinder-dev-deal-state").unwrap().status =
        Some("CREATING".to_string());
    let report = run(inventory);

    assert_failed_with(&report, "tables", "deal_state_table_exists", "found `CREATING`");
}

#[test]
fn enabling_encryption_is_accepted_and_missing_encryption_fails() {
    let mut inventory = FakeInventory::conforming();
    inventory.tables.get_mut("dealfinder-dev-deal-state").unwrap().sse_status =
        Some("ENABLING".to_string());
    let passing = run(inventory.clone());
    assert_eq!(outcome(&passing, "tables", "tables_have_encryption").status, CheckStatus::Passed);

    inventory.tables.get_mut("dealfinder-dev-user-sessions").unwrap().sse_status = None;
    let failing = run(inventory);
    assert_failed_with(&failing, "tables", "tables_have_encryption", "found DISABLED");
}

#[test]
fn missing_table_fails_with_name() {
    let mut inventory = FakeInventory::conforming();
    inventory.tables.remove("dealfinder-dev-user-sessions");
    let report = run(inventory);

    assert_failed_with(
        &report,
        "tables",
        "user_sessions_table_exists",
        "table dealfinder-dev-user-sessions does not exist",
    );
}

// ============================================================================
// SECTION: Monitoring
// ============================================================================

#[test]
fn missing_ecs_log_group_fails() {
    let mut inventory = FakeInventory::conforming();
    inventory.log_groups.retain(|name| !name.starts_with("/aws/ecs/"));
    let report = run(inventory);

    assert_failed_with(&report, "monitoring", "log_groups_exist", "/aws/ecs/dealfinder-dev");
}

#[test]
fn alarm_count_and_markers_are_enforced() {
    let mut inventory = FakeInventory::conforming();
    inventory.alarms.retain(|name| !name.ends_with("lambda-throttles"));
    let too_few = run(inventory.clone());
    assert_failed_with(&too_few, "monitoring", "alarms_exist", "expected at least 5, found 4");

    inventory.alarms.push("dealfinder-dev-api-latency".to_string());
    let missing_marker = run(inventory);
    assert_failed_with(&missing_marker, "monitoring", "alarms_exist", "`lambda-throttles`");
}

#[test]
fn alarms_of_another_environment_do_not_count() {
    let mut inventory = FakeInventory::conforming();
    for alarm in &mut inventory.alarms {
        *alarm = alarm.replace("dealfinder-dev", "dealfinder-prod");
    }
    let report = run(inventory);

    assert_failed_with(&report, "monitoring", "alarms_exist", "found 0");
}

#[test]
fn missing_topic_and_dashboard_fail() {
    let mut inventory = FakeInventory::conforming();
    inventory.topics = vec!["arn:aws:sns:us-east-1:123456789012:other".to_string()];
    inventory.dashboards.clear();
    let report = run(inventory);

    assert_failed_with(&report, "monitoring", "sns_topic_exists", "dealfinder-dev-alarms");
    assert_failed_with(
        &report,
        "monitoring",
        "dashboard_exists",
        "dashboard dealfinder-dev-dashboard does not exist",
    );
}

// ============================================================================
// SECTION: Cost
// ============================================================================

#[test]
fn unavailable_cost_api_skips_without_failing_the_run() {
    let mut inventory = FakeInventory::conforming();
    inventory.monitors = Err(InventoryError::Api {
        operation: "GetAnomalyMonitors",
        message: "AccessDeniedException".to_string(),
    });
    let report = run(inventory);

    let cost = outcome(&report, "cost", "cost_anomaly_monitor_exists");
    assert_eq!(cost.status, CheckStatus::Skipped);
    assert!(cost.message.as_deref().unwrap_or_default().contains("AccessDeniedException"));
    assert!(report.is_success());
    assert_eq!(report.summary.skipped, 1);
}

#[test]
fn monitor_without_project_name_fails() {
    let mut inventory = FakeInventory::conforming();
    inventory.monitors = Ok(vec!["account-wide".to_string()]);
    let report = run(inventory);

    assert_failed_with(&report, "cost", "cost_anomaly_monitor_exists", "`dealfinder`");
}
