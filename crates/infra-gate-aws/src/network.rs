// crates/infra-gate-aws/src/network.rs
// ============================================================================
// Module: Network Suite
// Description: Live checks over the tagged VPC and its networking resources.
// Purpose: Confirm the deployment's VPC, subnets, gateway, and endpoints.
// Dependencies: infra-gate-core
// ============================================================================

//! ## Overview
//! Tagged resources are scoped by `Project` and `Environment` tags taken from
//! the fixture. VPC endpoints are not tagged, so the endpoint check looks at
//! every endpoint in the region.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use infra_gate_core::CheckCase;
use infra_gate_core::CheckEventSink;
use infra_gate_core::CheckFilter;
use infra_gate_core::CheckResult;
use infra_gate_core::CheckSuite;
use infra_gate_core::Fixture;
use infra_gate_core::NetworkExpectations;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteHeader;
use infra_gate_core::SuiteKind;
use infra_gate_core::SuiteReport;
use infra_gate_core::runtime::assert::ensure;
use infra_gate_core::runtime::assert::ensure_count;
use infra_gate_core::runtime::assert::ensure_eq;
use infra_gate_core::runtime::assert::fail;
use infra_gate_core::runtime::runner::describe_cases;
use infra_gate_core::runtime::runner::run_cases;

use crate::inventory::CloudInventory;
use crate::inventory::TagScope;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suite identity.
const HEADER: SuiteHeader = SuiteHeader {
    suite_id: "network",
    title: "VPC networking",
    kind: SuiteKind::Live,
};

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Live network suite.
pub struct NetworkSuite {
    /// Resource source.
    inventory: Arc<dyn CloudInventory>,
    /// Tag filter for the deployment.
    scope: TagScope,
    /// Expected network shape.
    expectations: NetworkExpectations,
}

impl NetworkSuite {
    /// Creates the suite for the fixture's tagged resources.
    #[must_use]
    pub fn new(
        inventory: Arc<dyn CloudInventory>,
        fixture: &Fixture,
        expectations: NetworkExpectations,
    ) -> Self {
        Self {
            inventory,
            scope: TagScope {
                project: fixture.project.clone(),
                environment: fixture.environment.clone(),
            },
            expectations,
        }
    }
}

/// Returns the static suite descriptor.
#[must_use]
pub fn descriptor() -> SuiteDescriptor {
    describe_cases(&HEADER, CASES)
}

impl CheckSuite for NetworkSuite {
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
const CASES: &[CheckCase<NetworkSuite>] = &[
    CheckCase {
        id: "vpc_exists",
        description: "exactly one tagged VPC with the expected CIDR",
        run: vpc_exists,
    },
    CheckCase {
        id: "subnets_exist",
        description: "tagged subnets span the expected availability zones",
        run: subnets_exist,
    },
    CheckCase {
        id: "internet_gateway_exists",
        description: "exactly one tagged internet gateway",
        run: internet_gateway_exists,
    },
    CheckCase {
        id: "vpc_endpoints_exist",
        description: "gateway endpoints exist for the expected services",
        run: vpc_endpoints_exist,
    },
];

/// One VPC, expected CIDR.
fn vpc_exists(suite: &NetworkSuite) -> CheckResult {
    let vpcs = suite.inventory.vpcs(&suite.scope)?;
    ensure_count(vpcs.len(), 1, "tagged VPCs")?;
    let Some(vpc) = vpcs.first() else {
        return fail("tagged VPC must exist");
    };
    let cidr = vpc.cidr_block.as_deref().unwrap_or_default();
    ensure_eq(cidr, suite.expectations.vpc_cidr.as_str(), "VPC CIDR block")
}

/// Subnet count and distinct zones.
fn subnets_exist(suite: &NetworkSuite) -> CheckResult {
    let subnets = suite.inventory.subnets(&suite.scope)?;
    ensure_count(subnets.len(), suite.expectations.subnet_count, "tagged subnets")?;
    let zones: BTreeSet<&str> =
        subnets.iter().filter_map(|subnet| subnet.availability_zone.as_deref()).collect();
    ensure_count(zones.len(), suite.expectations.availability_zones, "distinct availability zones")
}

/// One internet gateway.
fn internet_gateway_exists(suite: &NetworkSuite) -> CheckResult {
    let gateways = suite.inventory.internet_gateways(&suite.scope)?;
    ensure_count(gateways.len(), 1, "tagged internet gateways")
}

/// An endpoint per expected service fragment.
fn vpc_endpoints_exist(suite: &NetworkSuite) -> CheckResult {
    let endpoints = suite.inventory.vpc_endpoints()?;
    for service in &suite.expectations.endpoint_services {
        let present = endpoints.iter().any(|endpoint| {
            endpoint.service_name.as_deref().is_some_and(|name| name.contains(service.as_str()))
        });
        ensure(present, format!("a VPC endpoint for service `{service}` must exist"))?;
    }
    Ok(())
}
