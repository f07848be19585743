// crates/infra-gate-core/src/core/mod.rs
// ============================================================================
// Module: Infra Gate Core Model
// Description: Data types shared by every check suite.
// Purpose: Group fixtures, identifiers, expectations, and outcomes.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Plain data types: nothing in this module performs I/O.

pub mod expectations;
pub mod fixture;
pub mod identifiers;
pub mod outcome;
