// crates/infra-gate-artifacts/src/lib.rs
// ============================================================================
// Module: Infra Gate Artifacts
// Description: Static check suites over repository artifacts.
// Purpose: Verify the bootstrap script, Terraform module, workflows, and README.
// Dependencies: infra-gate-core, regex, serde, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Artifact suites read files from a repository checkout described by an
//! [`ArtifactLayout`] and assert literal or pattern expectations over them.
//! They never touch the network, so they are the suites an offline run keeps.
//!
//! Invariants:
//! - Every suite reads its files once per run.
//! - A file that fails to load fails the suite's existence check with the
//!   load error and every other check with "artifact unavailable".

// ============================================================================
// SECTION: Imports
// ============================================================================

use infra_gate_core::Expectations;
use infra_gate_core::Fixture;
use infra_gate_core::RegistryError;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteRegistry;

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod bootstrap;
pub mod pipeline;
pub mod readme;
pub mod source;
pub mod terraform;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use bootstrap::BootstrapSuite;
pub use pipeline::PipelineKind;
pub use pipeline::PipelineSuite;
pub use readme::ReadmeSuite;
pub use source::ArtifactError;
pub use source::ArtifactLayout;
pub use terraform::TerraformMonitoringSuite;

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Suite ids registered by [`register_artifact_suites`], in order.
pub const ARTIFACT_SUITE_IDS: &[&str] =
    &["bootstrap", "terraform_monitoring", "ci_pipeline", "cd_pipeline", "readme"];

/// Registers every artifact suite for the given layout.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateSuite`] when an artifact suite is
/// already registered.
pub fn register_artifact_suites(
    registry: &mut SuiteRegistry,
    layout: &ArtifactLayout,
    fixture: &Fixture,
    expectations: &Expectations,
) -> Result<(), RegistryError> {
    registry.register(BootstrapSuite::new(
        layout,
        fixture.clone(),
        expectations.bootstrap.clone(),
    ))?;
    registry.register(TerraformMonitoringSuite::new(
        layout,
        fixture.clone(),
        expectations.monitoring.clone(),
    ))?;
    registry.register(PipelineSuite::new(
        PipelineKind::Ci,
        layout,
        fixture.clone(),
        expectations.pipelines.clone(),
    ))?;
    registry.register(PipelineSuite::new(
        PipelineKind::Cd,
        layout,
        fixture.clone(),
        expectations.pipelines.clone(),
    ))?;
    registry.register(ReadmeSuite::new(layout))
}

/// Returns descriptors of every artifact suite without reading any file.
#[must_use]
pub fn artifact_catalog() -> Vec<SuiteDescriptor> {
    vec![
        bootstrap::descriptor(),
        terraform::descriptor(),
        pipeline::descriptor(PipelineKind::Ci),
        pipeline::descriptor(PipelineKind::Cd),
        readme::descriptor(),
    ]
}
