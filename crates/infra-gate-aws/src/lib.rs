// crates/infra-gate-aws/src/lib.rs
// ============================================================================
// Module: Infra Gate AWS
// Description: Live check suites over deployed AWS resources.
// Purpose: Verify networking, storage, tables, monitoring, and cost controls.
// Dependencies: aws-config, aws-sdk-*, infra-gate-core, thiserror, tokio
// ============================================================================

//! ## Overview
//! Live suites read AWS state through the [`CloudInventory`] seam. The
//! production implementation is [`AwsInventory`]; tests substitute fakes.
//!
//! Invariants:
//! - Every call is read-only; nothing is created, modified, or deleted.
//! - Resource names derive from the fixture as `{project}-{environment}-{purpose}`.
//! - An unavailable cost API skips its check; every other API error fails
//!   the check that made the call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use infra_gate_core::Expectations;
use infra_gate_core::Fixture;
use infra_gate_core::RegistryError;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteRegistry;

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cost;
pub mod inventory;
pub mod monitoring;
pub mod network;
pub mod sdk;
pub mod storage;
pub mod tables;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cost::CostSuite;
pub use inventory::CloudInventory;
pub use inventory::InventoryError;
pub use inventory::SubnetRecord;
pub use inventory::TableRecord;
pub use inventory::TagScope;
pub use inventory::VpcEndpointRecord;
pub use inventory::VpcRecord;
pub use monitoring::MonitoringSuite;
pub use network::NetworkSuite;
pub use sdk::AwsInventory;
pub use sdk::AwsOptions;
pub use storage::StorageSuite;
pub use tables::TableSuite;

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Suite ids registered by [`register_live_suites`], in order.
pub const LIVE_SUITE_IDS: &[&str] = &["network", "storage", "tables", "monitoring", "cost"];

/// Registers every live suite over one shared inventory.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateSuite`] when a live suite is already
/// registered.
pub fn register_live_suites(
    registry: &mut SuiteRegistry,
    inventory: &Arc<dyn CloudInventory>,
    fixture: &Fixture,
    expectations: &Expectations,
) -> Result<(), RegistryError> {
    registry.register(NetworkSuite::new(
        Arc::clone(inventory),
        fixture,
        expectations.network.clone(),
    ))?;
    registry.register(StorageSuite::new(
        Arc::clone(inventory),
        fixture.clone(),
        expectations.storage.clone(),
    ))?;
    registry.register(TableSuite::new(
        Arc::clone(inventory),
        fixture.clone(),
        expectations.tables.clone(),
    ))?;
    registry.register(MonitoringSuite::new(
        Arc::clone(inventory),
        fixture.clone(),
        expectations.monitoring.clone(),
    ))?;
    registry.register(CostSuite::new(Arc::clone(inventory), fixture.clone()))
}

/// Returns descriptors of every live suite without contacting AWS.
#[must_use]
pub fn live_catalog() -> Vec<SuiteDescriptor> {
    vec![
        network::descriptor(),
        storage::descriptor(),
        tables::descriptor(),
        monitoring::descriptor(),
        cost::descriptor(),
    ]
}
