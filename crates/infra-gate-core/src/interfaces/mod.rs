// crates/infra-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Infra Gate Interfaces
// Description: Contract implemented by every check suite.
// Purpose: Let the registry run artifact and live suites uniformly.
// Dependencies: crate::core, crate::events, crate::runtime, serde
// ============================================================================

//! ## Overview
//! A suite is a named, ordered list of checks over one artifact or one AWS
//! service area. Suites describe themselves statically (so the catalog can be
//! listed without touching disk or the network) and run against a filter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CheckId;
use crate::core::identifiers::SuiteId;
use crate::core::outcome::SuiteReport;
use crate::events::CheckEventSink;
use crate::runtime::runner::CheckFilter;

// ============================================================================
// SECTION: Descriptors
// ============================================================================

/// Where a suite reads its evidence from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteKind {
    /// Files in the repository.
    Artifact,
    /// Live AWS APIs.
    Live,
}

impl SuiteKind {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Artifact => "artifact",
            Self::Live => "live",
        }
    }
}

/// Static description of a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDescriptor {
    /// Check identifier.
    pub check_id: CheckId,
    /// What the check asserts.
    pub description: String,
}

/// Static description of a suite and its checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteDescriptor {
    /// Suite identifier.
    pub suite_id: SuiteId,
    /// Suite title.
    pub title: String,
    /// Evidence source.
    pub kind: SuiteKind,
    /// Checks in declaration order.
    pub checks: Vec<CheckDescriptor>,
}

// ============================================================================
// SECTION: Check Suite
// ============================================================================

/// A runnable group of checks.
pub trait CheckSuite {
    /// Returns the suite's static descriptor.
    fn descriptor(&self) -> SuiteDescriptor;

    /// Runs every check allowed by `filter`, emitting one event per check.
    fn run(&self, filter: &CheckFilter, sink: &dyn CheckEventSink) -> SuiteReport;
}
